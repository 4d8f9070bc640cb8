//! Blocking-until-exit invocation of external binaries.

use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::info;

use super::error::ToolError;

/// Runs `binary` with `args` to completion and returns its exit code.
///
/// stdin is closed, stderr is inherited, stdout goes to `stdout`. There is
/// no timeout.
pub(crate) async fn run(
    tool: &str,
    binary: &Path,
    args: &[String],
    stdout: Stdio,
) -> Result<Option<i32>, ToolError> {
    info!("{} {}", binary.display(), args.join(" "));

    let status = Command::new(binary)
        .args(args)
        .stdin(Stdio::null())
        .stdout(stdout)
        .status()
        .await
        .map_err(|e| ToolError::from_spawn(tool, binary, e))?;

    match status.code() {
        Some(code) => info!("{} returned {}", tool, code),
        None => info!("{} was terminated by a signal", tool),
    }

    Ok(status.code())
}

/// Checks that a binary given as a path exists. Bare command names are
/// looked up on `$PATH` at spawn time and are not checked here.
pub(crate) fn check_binary(tool: &str, binary: &Path) -> Result<(), ToolError> {
    let is_path = binary.is_absolute() || binary.components().count() > 1;
    if is_path && !binary.is_file() {
        return Err(ToolError::NotFound {
            tool: tool.to_string(),
            path: binary.to_path_buf(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_binary_bare_name_passes() {
        assert!(check_binary("convert", Path::new("convert")).is_ok());
    }

    #[test]
    fn test_check_binary_missing_path() {
        let result = check_binary("medet", Path::new("/nonexistent/bin/medet_arm"));
        assert!(matches!(result, Err(ToolError::NotFound { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_reports_exit_code() {
        let code = run("false", Path::new("false"), &[], Stdio::null())
            .await
            .unwrap();
        assert_eq!(code, Some(1));
    }

    #[tokio::test]
    async fn test_run_missing_binary() {
        let result = run(
            "meteor_demod",
            Path::new("/nonexistent/bin/meteor_demod"),
            &[],
            Stdio::null(),
        )
        .await;
        assert!(matches!(result, Err(ToolError::NotFound { .. })));
    }
}
