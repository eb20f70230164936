use std::{
    fs::{File, OpenOptions},
    io::Write,
    sync::{Mutex, OnceLock},
};

/// Well-known location of the run transcript. Everything printed to the
/// terminal and every command the installer executes is appended here for
/// post-mortem diagnosis. The file is append-only and never read back.
pub const TRANSCRIPT_PATH: &str = "/var/log/archup-install.log";

static TRANSCRIPT: OnceLock<Option<Mutex<File>>> = OnceLock::new();

fn handle() -> &'static Option<Mutex<File>> {
    TRANSCRIPT.get_or_init(|| {
        // Best-effort: a read-only or missing /var/log must never stop an
        // install, it just leaves us without a transcript.
        OpenOptions::new()
            .append(true)
            .create(true)
            .open(TRANSCRIPT_PATH)
            .ok()
            .map(Mutex::new)
    })
}

/// Appends one line to the transcript. Failures are swallowed.
pub fn record(line: &str) {
    if let Some(file) = handle() {
        if let Ok(mut f) = file.lock() {
            let _ = writeln!(f, "{}", line);
        }
    }
}

/// Records an executed command in a greppable `$ prog arg…` form.
pub fn record_command(program: &str, args: &[&str]) {
    record(&format!("$ {} {}", program, args.join(" ")));
}
