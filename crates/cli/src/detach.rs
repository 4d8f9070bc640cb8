//! Re-launching the binary in the background.

use std::ffi::OsString;
use std::io;
use std::process::{Command, Stdio};

/// Marker passed to the background process so it does not detach again.
pub const DETACHED_FLAG: &str = "--detached";

/// Builds the argument list for the background process.
///
/// The marker goes first: `--tle` takes every following word, so anything
/// appended after it would be read as part of the TLE.
pub fn background_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    std::iter::once(OsString::from(DETACHED_FLAG))
        .chain(args)
        .collect()
}

/// Spawns a copy of this process with the same arguments and returns its pid.
///
/// The child gets a null stdin and, on Unix, its own process group, so it
/// survives the caller exiting. It is never waited on.
pub fn spawn_background() -> io::Result<u32> {
    let exe = std::env::current_exe()?;

    let mut command = Command::new(exe);
    command
        .args(background_args(std::env::args_os().skip(1)))
        .stdin(Stdio::null());

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        command.process_group(0);
    }

    let child = command.spawn()?;
    Ok(child.id())
}
