//! Process runner - invoke an external program and capture its output

use crate::error::{Error, Result};
use std::ffi::OsStr;
use std::process::Command;

/// Run an argument vector and capture both streams.
///
/// Returns `(stdout, stderr)` on success. A non-zero exit becomes
/// [`Error::Invocation`] carrying the exit code and both captured streams.
/// Nothing is retried.
pub fn run<S: AsRef<OsStr>>(argv: &[S]) -> Result<(String, String)> {
    let (program, args) = argv.split_first().ok_or(Error::EmptyCommand)?;
    let command = display_argv(argv);
    log::debug!("Running: {command}");

    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|source| Error::Spawn {
            program: program.as_ref().to_string_lossy().into_owned(),
            source,
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        return Err(Error::Invocation {
            command,
            code: output.status.code(),
            stdout,
            stderr,
        });
    }

    Ok((stdout, stderr))
}

/// Join an argument vector for display
pub fn display_argv<S: AsRef<OsStr>>(argv: &[S]) -> String {
    argv.iter()
        .map(|a| a.as_ref().to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}
