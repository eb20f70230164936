mod cmd;
mod config;
mod error;
mod hwdetect;
mod patch;
mod prompts;
mod resolve;
mod sequencer;
mod steps;
mod transcript;
mod ui;
mod validate;

use std::sync::atomic::{AtomicBool, Ordering};

use error::InstallerError;

// ── Global dry-run flag ───────────────────────────────────────────────────────

/// When `true`, no system command is actually executed and no target file is
/// written. All privileged operations are simulated with a short delay.
/// Set by passing `--dry-run` on the command line.
pub static DRY_RUN: AtomicBool = AtomicBool::new(false);

#[inline]
pub fn is_dry_run() -> bool {
    DRY_RUN.load(Ordering::Relaxed)
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Parse the only supported flag before doing anything else.
    if std::env::args().any(|a| a == "--dry-run") {
        DRY_RUN.store(true, Ordering::Relaxed);
    }

    match run() {
        Ok(()) => {}
        // Declining to proceed is not a failure.
        Err(InstallerError::Cancelled) => {
            println!();
            ui::print_warning("Installation cancelled — nothing was changed.");
        }
        Err(e) => {
            println!();
            ui::print_error(&format!("{}", e));
            ui::print_info(&format!("Full transcript: {}", transcript::TRANSCRIPT_PATH));
            std::process::exit(1);
        }
    }
}

fn run() -> Result<(), InstallerError> {
    ui::print_banner();

    if is_dry_run() {
        ui::print_warning("DRY-RUN MODE — no command will run, no file will be written.");
    }

    ui::print_info("This wizard provisions an already-partitioned, mounted target");
    ui::print_info(&format!(
        "at {} into a bootable Arch Linux system.",
        validate::TARGET_ROOT
    ));

    // ── Step 1: Preconditions ─────────────────────────────────────────────────
    ui::print_step(1, 13, "Environment Preconditions");
    let esp_mount_path = validate::run()?;

    // ── Step 2: Configuration ─────────────────────────────────────────────────
    ui::print_step(2, 13, "Configuration");
    let config = prompts::collect(esp_mount_path)?;

    // ── Step 3: Package plan ──────────────────────────────────────────────────
    ui::print_step(3, 13, "Package Resolution");
    let plan = resolve::resolve(&config);
    ui::print_info(&format!("{} packages selected.", plan.packages.len()));
    if let Some(dm) = plan.display_manager {
        ui::print_info(&format!("Display manager: {}.", dm));
    }

    // ── Steps 4–13: Provisioning ──────────────────────────────────────────────
    sequencer::run(&config, &plan)?;

    println!();
    ui::print_success("Installation complete.");
    ui::print_info("Unmount and reboot when you are ready:");
    ui::print_info("  umount -R /mnt && reboot");
    println!();

    Ok(())
}
