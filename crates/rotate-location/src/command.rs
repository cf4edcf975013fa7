//! Running external programs

use std::process::{Command, Output, Stdio};

use crate::LocationError;

/// Quote one argument for a POSIX shell
///
/// Arguments made of safe characters pass through unchanged.
pub fn quote(arg: &str) -> String {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "@%+=:,./-_".contains(c));
    if safe {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

/// Quote a full argument vector into one shell command line
pub fn quote_command(argv: &[String]) -> String {
    argv.iter().map(|arg| quote(arg)).collect::<Vec<_>>().join(" ")
}

/// Prefix `argv` with `sudo` when privilege elevation is enabled
pub fn elevate(argv: Vec<String>, sudo: bool) -> Vec<String> {
    if sudo {
        let mut elevated = Vec::with_capacity(argv.len() + 1);
        elevated.push("sudo".to_string());
        elevated.extend(argv);
        elevated
    } else {
        argv
    }
}

/// `find` invocation listing the entries under `directory`, NUL separated
///
/// Non-recursive listings return every direct child; recursive listings
/// return regular files at any depth.
pub fn find_command(directory: &str, recursive: bool) -> Vec<String> {
    let mut argv = vec!["find".to_string(), directory.to_string(), "-mindepth".to_string(), "1".to_string()];
    if recursive {
        argv.extend(["-type".to_string(), "f".to_string()]);
    } else {
        argv.extend(["-maxdepth".to_string(), "1".to_string()]);
    }
    argv.push("-print0".to_string());
    argv
}

/// Split NUL separated `find -print0` output into paths
pub fn split_nul(stdout: &[u8]) -> Vec<String> {
    stdout
        .split(|b| *b == 0)
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect()
}

/// Run `argv`, capturing output, and fail on a non-zero exit status
pub fn run(argv: &[String]) -> Result<Output, LocationError> {
    let output = spawn(argv)?;
    if output.status.success() {
        Ok(output)
    } else {
        Err(LocationError::Command {
            command: quote_command(argv),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Run `argv` and report whether it exited successfully
pub fn succeeds(argv: &[String]) -> bool {
    match spawn(argv) {
        Ok(output) => output.status.success(),
        Err(e) => {
            tracing::debug!("{}", e);
            false
        }
    }
}

fn spawn(argv: &[String]) -> Result<Output, LocationError> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| LocationError::InvalidSpec("empty command line".to_string()))?;
    tracing::debug!("Executing {}", quote_command(argv));
    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| LocationError::Spawn {
            program: program.clone(),
            source,
        })
}
