use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use crate::{cmd, error::InstallerError, transcript};

/// The execution-context boundary between the live system and the target.
///
/// Everything that must happen "inside" the new installation goes through
/// this handle: commands are wrapped in `arch-chroot <root>`, file edits
/// address target paths relative to the root. Phases 1–3 run host-side;
/// once a `Chroot` is constructed the remaining writers run target-side.
pub struct Chroot {
    root: PathBuf,
}

impl Chroot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Chroot { root: root.into() }
    }

    /// Host-side path of a target file, e.g. `etc/hostname` → `/mnt/etc/hostname`.
    pub fn host_path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    /// Translates a host-side mount path under the root into the path the
    /// target itself sees (`/mnt/boot/efi` → `/boot/efi`).
    pub fn target_path(&self, host: &Path) -> String {
        match host.strip_prefix(&self.root) {
            Ok(rel) => format!("/{}", rel.display()),
            Err(_) => host.display().to_string(),
        }
    }

    // ── Command execution inside the target ───────────────────────────────────

    fn chroot_args<'a>(&'a self, program: &'a str, args: &[&'a str]) -> Vec<&'a str> {
        let root = self.root.to_str().expect("target root is valid UTF-8");
        let mut full = Vec::with_capacity(args.len() + 2);
        full.push(root);
        full.push(program);
        full.extend_from_slice(args);
        full
    }

    /// Silent run with a spinner; fails the phase on a non-zero exit.
    pub fn run(
        &self,
        program: &str,
        args: &[&str],
        spin_msg: &str,
        done_msg: &str,
    ) -> Result<(), InstallerError> {
        let full = self.chroot_args(program, args);
        cmd::run_with_spinner("arch-chroot", &full, spin_msg, done_msg)
    }

    /// Terminal handover for commands that stream output (pacman, mkinitcpio).
    pub fn run_interactive(&self, program: &str, args: &[&str]) -> Result<(), InstallerError> {
        let full = self.chroot_args(program, args);
        cmd::run_interactive("arch-chroot", &full)
    }

    /// Pipes `input` to the command's stdin (passwords via chpasswd).
    pub fn run_with_input(
        &self,
        program: &str,
        args: &[&str],
        input: &str,
    ) -> Result<(), InstallerError> {
        let full = self.chroot_args(program, args);
        cmd::run_with_input("arch-chroot", &full, input)
    }

    /// True when `target_abs` (a target-side absolute path) is an active
    /// mount point as seen from inside the target. Mount visibility is not
    /// guaranteed to propagate across the context boundary, so callers that
    /// depend on a mount re-check it here rather than trusting the
    /// validator's host-side answer.
    pub fn is_mounted(&self, target_abs: &str) -> bool {
        if crate::is_dry_run() {
            return true;
        }
        let root = match self.root.to_str() {
            Some(r) => r,
            None => return false,
        };
        transcript::record_command("arch-chroot", &[root, "findmnt", target_abs]);
        Command::new("arch-chroot")
            .args([root, "findmnt", target_abs])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    // ── Target file mutation (host-side writes under the root) ────────────────

    /// Overwrites a target file.
    pub fn write(&self, rel: &str, content: &str) -> Result<(), InstallerError> {
        let path = self.host_path(rel);
        transcript::record(&format!("write {}", path.display()));
        if crate::is_dry_run() {
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    /// Overwrites a target file and restricts its permissions (e.g. 0o440
    /// for sudoers drop-ins).
    pub fn write_mode(&self, rel: &str, content: &str, mode: u32) -> Result<(), InstallerError> {
        use std::os::unix::fs::PermissionsExt;

        self.write(rel, content)?;
        if crate::is_dry_run() {
            return Ok(());
        }
        let path = self.host_path(rel);
        fs::set_permissions(&path, fs::Permissions::from_mode(mode))?;
        Ok(())
    }

    /// Appends to a target file, creating it if needed.
    pub fn append(&self, rel: &str, content: &str) -> Result<(), InstallerError> {
        let path = self.host_path(rel);
        transcript::record(&format!("append {}", path.display()));
        if crate::is_dry_run() {
            return Ok(());
        }
        let mut file = OpenOptions::new().append(true).create(true).open(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }

    /// Reads a target file; `Ok(None)` when it does not exist.
    pub fn read(&self, rel: &str) -> Result<Option<String>, InstallerError> {
        if crate::is_dry_run() {
            return Ok(None);
        }
        match fs::read_to_string(self.host_path(rel)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_path_joins_under_root() {
        let ch = Chroot::new("/mnt");
        assert_eq!(ch.host_path("etc/hostname"), PathBuf::from("/mnt/etc/hostname"));
    }

    #[test]
    fn target_path_strips_the_root() {
        let ch = Chroot::new("/mnt");
        assert_eq!(ch.target_path(Path::new("/mnt/boot/efi")), "/boot/efi");
        assert_eq!(ch.target_path(Path::new("/mnt/boot")), "/boot");
    }

    #[test]
    fn write_and_append_address_target_files() {
        let dir = tempfile::tempdir().unwrap();
        let ch = Chroot::new(dir.path());

        ch.write("etc/hostname", "archbox\n").unwrap();
        ch.append("etc/fstab", "/swapfile none swap defaults 0 0\n").unwrap();

        assert_eq!(
            std::fs::read_to_string(dir.path().join("etc/hostname")).unwrap(),
            "archbox\n"
        );
        assert_eq!(
            std::fs::read_to_string(dir.path().join("etc/fstab")).unwrap(),
            "/swapfile none swap defaults 0 0\n"
        );
    }

    #[test]
    fn write_mode_restricts_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let ch = Chroot::new(dir.path());
        ch.write_mode("etc/sudoers.d/10-wheel", "%wheel ALL=(ALL:ALL) ALL\n", 0o440)
            .unwrap();

        let meta = std::fs::metadata(dir.path().join("etc/sudoers.d/10-wheel")).unwrap();
        assert_eq!(meta.permissions().mode() & 0o777, 0o440);
    }

    #[test]
    fn read_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let ch = Chroot::new(dir.path());
        assert!(ch.read("etc/pacman.conf").unwrap().is_none());
    }
}
