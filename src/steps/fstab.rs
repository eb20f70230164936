use crate::{cmd, error::InstallerError, ui, validate};

/// Phase 2: generates `/mnt/etc/fstab` from the currently active mounts.
///
/// Equivalent to: `genfstab -U /mnt >> /mnt/etc/fstab`. Runs after the bulk
/// install (so `/mnt/etc` exists) and before any chroot-side work.
pub fn generate() -> Result<(), InstallerError> {
    let fstab = format!("{}/etc/fstab", validate::TARGET_ROOT);

    if !crate::is_dry_run() {
        // pacstrap creates /mnt/etc, but guard just in case.
        std::fs::create_dir_all(format!("{}/etc", validate::TARGET_ROOT))?;
    }

    let pb = ui::spinner("Generating fstab (UUID-based)…");
    let result = cmd::run_append_to_file("genfstab", &["-U", validate::TARGET_ROOT], &fstab);

    if result.is_ok() {
        ui::done_spinner(pb, &format!("fstab written to {}.", fstab));
    } else {
        pb.finish_and_clear();
    }

    result
}
