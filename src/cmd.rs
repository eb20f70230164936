use std::{
    fs::OpenOptions,
    io::{self, Write},
    process::{Command, Stdio},
    thread,
    time::Duration,
};

use crate::{error::InstallerError, transcript, ui};

// ── Internal helpers ──────────────────────────────────────────────────────────

fn not_found_or_io(program: &str, err: io::Error) -> InstallerError {
    if err.kind() == io::ErrorKind::NotFound {
        InstallerError::CommandNotFound(program.to_string())
    } else {
        InstallerError::Io(err)
    }
}

fn print_captured_output(stdout: &[u8], stderr: &[u8]) {
    let out = String::from_utf8_lossy(stdout);
    let err = String::from_utf8_lossy(stderr);
    if !out.trim().is_empty() {
        eprintln!("{}", out.trim());
        transcript::record(out.trim());
    }
    if !err.trim().is_empty() {
        eprintln!("{}", err.trim());
        transcript::record(err.trim());
    }
}

/// In dry-run mode every command is replaced by a short pause, so the full
/// flow can be walked through on a machine that is not the live ISO.
fn simulate(program: &str, args: &[&str]) {
    transcript::record(&format!("dry-run: {} {}", program, args.join(" ")));
    thread::sleep(Duration::from_millis(300));
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Run a command that **takes over the terminal** (stdin/stdout/stderr inherited).
/// Use for programs that stream progress: `pacstrap`, `arch-chroot` + pacman.
pub fn run_interactive(program: &str, args: &[&str]) -> Result<(), InstallerError> {
    if crate::is_dry_run() {
        simulate(program, args);
        return Ok(());
    }
    transcript::record_command(program, args);

    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(|e| not_found_or_io(program, e))?;

    if !status.success() {
        return Err(InstallerError::CommandFailed(
            program.to_string(),
            status.code().unwrap_or(-1),
        ));
    }
    Ok(())
}

/// Run a command **silently** while displaying a spinner.
/// On success prints `done_msg` with a ✓.
/// On failure prints captured output and returns an error.
pub fn run_with_spinner(
    program: &str,
    args: &[&str],
    spin_msg: &str,
    done_msg: &str,
) -> Result<(), InstallerError> {
    if crate::is_dry_run() {
        let pb = ui::spinner(spin_msg);
        simulate(program, args);
        ui::done_spinner(pb, done_msg);
        return Ok(());
    }
    transcript::record_command(program, args);

    let pb = ui::spinner(spin_msg);
    let result = Command::new(program)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| not_found_or_io(program, e));
    pb.finish_and_clear();

    match result {
        Err(e) => Err(e),
        Ok(output) if !output.status.success() => {
            print_captured_output(&output.stdout, &output.stderr);
            Err(InstallerError::CommandFailed(
                program.to_string(),
                output.status.code().unwrap_or(-1),
            ))
        }
        Ok(_) => {
            ui::print_success(done_msg);
            Ok(())
        }
    }
}

/// Run a command, capture its stdout, and return it as a `String`.
pub fn run_capture(program: &str, args: &[&str]) -> Result<String, InstallerError> {
    if crate::is_dry_run() {
        simulate(program, args);
        return Ok(String::new());
    }
    transcript::record_command(program, args);

    let output = Command::new(program)
        .args(args)
        .stderr(Stdio::inherit())
        .output()
        .map_err(|e| not_found_or_io(program, e))?;

    if !output.status.success() {
        return Err(InstallerError::CommandFailed(
            program.to_string(),
            output.status.code().unwrap_or(-1),
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Run a command and **append** its stdout to a file (equivalent to `>> path`).
pub fn run_append_to_file(
    program: &str,
    args: &[&str],
    file_path: &str,
) -> Result<(), InstallerError> {
    if crate::is_dry_run() {
        simulate(program, args);
        return Ok(());
    }
    transcript::record_command(program, args);

    let file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(file_path)?;

    let status = Command::new(program)
        .args(args)
        .stdout(file)
        .stderr(Stdio::piped())
        .status()
        .map_err(|e| not_found_or_io(program, e))?;

    if !status.success() {
        return Err(InstallerError::CommandFailed(
            program.to_string(),
            status.code().unwrap_or(-1),
        ));
    }
    Ok(())
}

/// Run a command silently with `input` piped to its stdin.
/// Used for `chpasswd`, so a password never appears in an argument list.
/// The input is deliberately NOT recorded in the transcript.
pub fn run_with_input(
    program: &str,
    args: &[&str],
    input: &str,
) -> Result<(), InstallerError> {
    if crate::is_dry_run() {
        simulate(program, args);
        return Ok(());
    }
    transcript::record_command(program, args);

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| not_found_or_io(program, e))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(input.as_bytes())?;
    }

    let output = child.wait_with_output()?;
    if !output.status.success() {
        print_captured_output(&[], &output.stderr);
        return Err(InstallerError::CommandFailed(
            program.to_string(),
            output.status.code().unwrap_or(-1),
        ));
    }
    Ok(())
}
