use crate::{error::InstallerError, steps::chroot::Chroot};

/// Enables NetworkManager for the next boot. Declarative enable only — the
/// service is not started inside the chroot.
pub fn enable(chroot: &Chroot) -> Result<(), InstallerError> {
    chroot.run(
        "systemctl",
        &["enable", "NetworkManager"],
        "Enabling NetworkManager…",
        "NetworkManager enabled for next boot.",
    )
}
