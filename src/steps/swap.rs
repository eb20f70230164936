use crate::{config::Config, error::InstallerError, steps::chroot::Chroot, ui};

const SWAPFILE: &str = "/swapfile";

/// Creates, activates and persists the swapfile. A size of 0 means the user
/// opted out: nothing is written and no fstab entry is appended.
pub fn configure(chroot: &Chroot, config: &Config) -> Result<(), InstallerError> {
    if config.swap_gb == 0 {
        ui::print_info("No swapfile requested — skipping.");
        return Ok(());
    }

    let size = format!("{}G", config.swap_gb);
    chroot.run(
        "fallocate",
        &["-l", &size, SWAPFILE],
        &format!("Allocating {} swapfile…", size),
        &format!("{} swapfile allocated.", size),
    )?;
    chroot.run(
        "chmod",
        &["600", SWAPFILE],
        "Restricting swapfile permissions…",
        "Swapfile permissions restricted (600).",
    )?;
    chroot.run(
        "mkswap",
        &[SWAPFILE],
        "Formatting swapfile…",
        "Swapfile formatted.",
    )?;
    chroot.run(
        "swapon",
        &[SWAPFILE],
        "Activating swap…",
        "Swap activated.",
    )?;

    chroot.append("etc/fstab", &fstab_entry())?;
    ui::print_success("Swapfile entry appended to fstab.");
    Ok(())
}

fn fstab_entry() -> String {
    format!("{} none swap defaults 0 0\n", SWAPFILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CpuVendor, DesktopEnvironment, GpuVendor, KernelVariant};
    use std::path::PathBuf;

    #[test]
    fn fstab_entry_is_a_swap_line() {
        assert_eq!(fstab_entry(), "/swapfile none swap defaults 0 0\n");
    }

    #[test]
    fn zero_size_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let chroot = Chroot::new(dir.path());
        let config = Config {
            hostname: "archbox".into(),
            username: "arch".into(),
            user_password: "hunter2".into(),
            root_password: None,
            timezone: "UTC".into(),
            locales: vec![("en_US.UTF-8".into(), "UTF-8".into())],
            language: "en_US.UTF-8".into(),
            keymap: "us".into(),
            kernels: vec![KernelVariant::Stable],
            desktop: DesktopEnvironment::None,
            gpu: GpuVendor::Skip,
            cpu: CpuVendor::Unknown,
            swap_gb: 0,
            gaming: false,
            esp_mount_path: PathBuf::from("/mnt/boot/efi"),
        };

        configure(&chroot, &config).unwrap();

        // No fstab entry appended, no swapfile allocated.
        assert!(!dir.path().join("etc/fstab").exists());
        assert!(!dir.path().join("swapfile").exists());
    }
}
