use crate::{config::Config, error::InstallerError, resolve, steps::chroot::Chroot, ui};

/// Installs the gaming stack: a full package-index refresh, Steam, then the
/// per-GPU 32-bit compatibility packages. Steam itself is required to
/// succeed; the compatibility extras are enhancements and any one of them
/// failing is logged and swallowed.
pub fn install(chroot: &Chroot, config: &Config) -> Result<(), InstallerError> {
    if !config.gaming {
        return Ok(());
    }

    ui::print_info("Refreshing package databases (multilib now active)…");
    println!();
    chroot.run_interactive("pacman", &["-Syu", "--noconfirm"])?;

    ui::print_info("Installing Steam…");
    println!();
    chroot.run_interactive("pacman", &["-S", "--noconfirm", "steam"])?;
    ui::print_success("Steam installed.");

    for pkg in resolve::gaming_compat_packages(config.gpu) {
        let result = chroot.run(
            "pacman",
            &["-S", "--noconfirm", "--needed", pkg],
            &format!("Installing {}…", pkg),
            &format!("{} installed.", pkg),
        );
        if let Err(e) = result {
            ui::print_warning(&format!("Optional package {} failed: {} — continuing.", pkg, e));
        }
    }

    Ok(())
}
