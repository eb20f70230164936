use crate::{config::Config, error::InstallerError, steps::chroot::Chroot, ui};

/// Sudoers drop-in granting the wheel group full elevation.
const WHEEL_SUDOERS: &str = "%wheel ALL=(ALL:ALL) ALL\n";

/// Creates the primary user with wheel membership and sets passwords.
/// The root password is only touched when one was configured; otherwise
/// the root account stays locked.
pub fn create(chroot: &Chroot, config: &Config) -> Result<(), InstallerError> {
    chroot.run(
        "useradd",
        &["-m", "-G", "wheel", &config.username],
        &format!("Creating user {}…", config.username),
        &format!("User {} created (group: wheel).", config.username),
    )?;

    // chpasswd reads `user:password` from stdin; the secret never shows up
    // in an argument list or the transcript.
    chroot.run_with_input(
        "chpasswd",
        &[],
        &format!("{}:{}\n", config.username, config.user_password),
    )?;
    ui::print_success("User password set.");

    if let Some(ref root_password) = config.root_password {
        chroot.run_with_input("chpasswd", &[], &format!("root:{}\n", root_password))?;
        ui::print_success("Root password set.");
    }

    Ok(())
}

/// Writes the privilege-escalation policy: wheel may run anything, file
/// readable only by root (sudo refuses world-readable drop-ins).
pub fn grant_sudo(chroot: &Chroot) -> Result<(), InstallerError> {
    chroot.write_mode("etc/sudoers.d/10-wheel", WHEEL_SUDOERS, 0o440)?;
    ui::print_success("Sudo access granted to the wheel group.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sudoers_drop_in_content_and_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let chroot = Chroot::new(dir.path());
        grant_sudo(&chroot).unwrap();

        let path = dir.path().join("etc/sudoers.d/10-wheel");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), WHEEL_SUDOERS);
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o440);
    }
}
