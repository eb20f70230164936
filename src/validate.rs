use std::path::{Path, PathBuf};

use crate::{
    error::{InstallerError, PreconditionError},
    ui,
};

/// Where the target root must already be mounted.
pub const TARGET_ROOT: &str = "/mnt";

/// Candidate ESP mount points under the target root, in preference order.
pub const ESP_CANDIDATES: [&str; 2] = ["/mnt/boot/efi", "/mnt/boot"];

/// Verifies every environment precondition before a single byte is written.
/// Checks run in order and stop at the first failure; each failure carries
/// a remediation hint in its message. On success returns the resolved ESP
/// mount path.
pub fn run() -> Result<PathBuf, InstallerError> {
    if crate::is_dry_run() {
        ui::print_success("Dry run: preconditions assumed satisfied.");
        return Ok(PathBuf::from(ESP_CANDIDATES[0]));
    }

    // 1. Root privileges.
    if effective_uid() != 0 {
        return Err(PreconditionError::InsufficientPrivilege.into());
    }
    ui::print_success("Running as root.");

    let mounts = std::fs::read_to_string("/proc/self/mounts")?;

    // 2. Target root mounted.
    if !is_mount_point(&mounts, TARGET_ROOT) {
        return Err(PreconditionError::TargetNotMounted(TARGET_ROOT.to_string()).into());
    }
    ui::print_success(&format!("Target root mounted at {}.", TARGET_ROOT));

    // 3. UEFI boot mode. A BIOS-booted live system cannot produce the EFI
    //    boot entries this installer writes, so legacy mode is fatal.
    if !Path::new("/sys/firmware/efi/efivars").exists() {
        return Err(PreconditionError::UnsupportedBootMode.into());
    }
    ui::print_success("UEFI boot mode detected.");

    // 4. ESP mounted under the target at one of the two canonical paths.
    let esp = match find_esp(&mounts) {
        Some(p) => p,
        None => {
            return Err(PreconditionError::BootPartitionNotMounted(
                ESP_CANDIDATES[0].to_string(),
                ESP_CANDIDATES[1].to_string(),
            )
            .into())
        }
    };
    ui::print_success(&format!("EFI system partition mounted at {}.", esp));

    Ok(PathBuf::from(esp))
}

fn effective_uid() -> u32 {
    // Second field of the Uid: line is the effective UID.
    std::fs::read_to_string("/proc/self/status")
        .ok()
        .and_then(|s| {
            s.lines()
                .find(|l| l.starts_with("Uid:"))
                .and_then(|l| l.split_whitespace().nth(2))
                .and_then(|v| v.parse::<u32>().ok())
        })
        .unwrap_or(u32::MAX) // treat an unreadable status as non-root
}

// ── Mount-table inspection ────────────────────────────────────────────────────
//
// /proc/self/mounts lines look like:
//   /dev/sda3 /mnt ext4 rw,relatime 0 0
// The mount point is the second field, with spaces escaped as \040.

fn is_mount_point(mounts: &str, path: &str) -> bool {
    mounts
        .lines()
        .filter_map(mount_point_of)
        .any(|mp| mp == path)
}

/// Returns the first ESP candidate that is an active mount point.
fn find_esp(mounts: &str) -> Option<&'static str> {
    ESP_CANDIDATES
        .into_iter()
        .find(|c| is_mount_point(mounts, c))
}

fn mount_point_of(line: &str) -> Option<String> {
    let raw = line.split_whitespace().nth(1)?;
    Some(unescape_mount_path(raw))
}

fn unescape_mount_path(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        // Octal escape, e.g. \040 for a space in the mount path.
        let digits: String = chars.by_ref().take(3).collect();
        match u8::from_str_radix(&digits, 8) {
            Ok(b) => out.push(b as char),
            Err(_) => {
                out.push('\\');
                out.push_str(&digits);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOUNTS_READY: &str = "\
proc /proc proc rw,nosuid 0 0
/dev/sda3 /mnt ext4 rw,relatime 0 0
/dev/sda1 /mnt/boot/efi vfat rw,relatime 0 0
";

    const MOUNTS_NO_TARGET: &str = "\
proc /proc proc rw,nosuid 0 0
/dev/sda1 /boot vfat rw,relatime 0 0
";

    #[test]
    fn detects_mounted_target() {
        assert!(is_mount_point(MOUNTS_READY, "/mnt"));
    }

    #[test]
    fn unmounted_target_is_rejected() {
        assert!(!is_mount_point(MOUNTS_NO_TARGET, "/mnt"));
    }

    #[test]
    fn prefix_match_is_not_a_mount() {
        // /mnt/boot/efi being mounted does not make /mnt/boot a mount point.
        assert!(!is_mount_point(MOUNTS_READY, "/mnt/boot"));
    }

    #[test]
    fn esp_resolves_to_mounted_candidate() {
        assert_eq!(find_esp(MOUNTS_READY), Some("/mnt/boot/efi"));
    }

    #[test]
    fn esp_falls_back_to_boot() {
        let mounts = "/dev/sda3 /mnt ext4 rw 0 0\n/dev/sda1 /mnt/boot vfat rw 0 0\n";
        assert_eq!(find_esp(mounts), Some("/mnt/boot"));
    }

    #[test]
    fn no_esp_candidate_mounted() {
        assert_eq!(find_esp(MOUNTS_NO_TARGET), None);
    }

    #[test]
    fn unescapes_octal_spaces() {
        assert_eq!(unescape_mount_path(r"/mnt/my\040disk"), "/mnt/my disk");
        assert_eq!(unescape_mount_path("/mnt"), "/mnt");
    }
}
