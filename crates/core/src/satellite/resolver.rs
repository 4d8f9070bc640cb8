//! Resolves the NORAD id of an observation from its TLE or an explicit override.

use regex_lite::Regex;
use thiserror::Error;

use super::types::{NoradId, Resolution, WaitPolicy};

/// Line one of a TLE starts with "1 ", followed by the catalog number and
/// the "U" (unclassified) marker.
const TLE_CATALOG_PATTERN: &str = r"1 (\d*)U";

/// Errors that can occur while resolving a satellite id.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// Neither a usable TLE nor an override was supplied.
    #[error("No satellite id could be resolved from the TLE or --sat-id")]
    Unresolved,
}

/// Extracts the catalog number from a TLE text block.
///
/// Returns `None` when the block has no "1 <digits>U" run or the digit run
/// is empty.
pub fn catalog_number_from_tle(tle: &str) -> Option<NoradId> {
    let re = Regex::new(TLE_CATALOG_PATTERN).ok()?;
    let caps = re.captures(tle)?;
    caps.get(1)?.as_str().parse::<NoradId>().ok()
}

/// Resolves the satellite id for an observation.
///
/// A non-empty TLE defers processing; an explicit override always wins and
/// makes processing immediate.
pub fn resolve(tle: Option<&str>, sat_id_override: Option<NoradId>) -> Result<Resolution, ResolveError> {
    let tle = tle.map(str::trim).filter(|t| !t.is_empty());

    if let Some(norad_id) = sat_id_override {
        return Ok(Resolution {
            norad_id,
            wait: WaitPolicy::Immediate,
        });
    }

    let norad_id = tle
        .and_then(catalog_number_from_tle)
        .ok_or(ResolveError::Unresolved)?;

    Ok(Resolution {
        norad_id,
        wait: WaitPolicy::Deferred,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const M2_2_TLE: &str = "METEOR-M2 2 \
        1 44387U 19038A   19321.52896989  .00000016  00000-0  26307-4 0  9993 \
        2 44387  98.5695 358.4564 0002141 111.7917 248.3490 14.23327622 17546";

    #[test]
    fn test_catalog_number_from_full_tle() {
        assert_eq!(catalog_number_from_tle(M2_2_TLE), Some(44387));
    }

    #[test]
    fn test_catalog_number_from_bare_line() {
        assert_eq!(catalog_number_from_tle("1 40069U 14037A"), Some(40069));
        assert_eq!(catalog_number_from_tle("1 7U"), Some(7));
    }

    #[test]
    fn test_catalog_number_missing() {
        assert_eq!(catalog_number_from_tle("no orbital elements here"), None);
        assert_eq!(catalog_number_from_tle("2 44387  98.5695"), None);
        assert_eq!(catalog_number_from_tle("1 U"), None);
    }

    #[test]
    fn test_resolve_from_tle_defers() {
        let resolution = resolve(Some(M2_2_TLE), None).unwrap();
        assert_eq!(resolution.norad_id, 44387);
        assert_eq!(resolution.wait, WaitPolicy::Deferred);
    }

    #[test]
    fn test_override_wins_over_tle() {
        let resolution = resolve(Some(M2_2_TLE), Some(40069)).unwrap();
        assert_eq!(resolution.norad_id, 40069);
        assert_eq!(resolution.wait, WaitPolicy::Immediate);
    }

    #[test]
    fn test_override_without_tle() {
        let resolution = resolve(None, Some(12345)).unwrap();
        assert_eq!(resolution.norad_id, 12345);
        assert_eq!(resolution.wait, WaitPolicy::Immediate);
    }

    #[test]
    fn test_unresolved() {
        assert_eq!(resolve(None, None), Err(ResolveError::Unresolved));
        assert_eq!(resolve(Some("   "), None), Err(ResolveError::Unresolved));
        assert_eq!(
            resolve(Some("garbage tle text"), None),
            Err(ResolveError::Unresolved)
        );
    }
}
