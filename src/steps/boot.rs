use crate::{
    config::Config,
    error::{InstallerError, PreconditionError},
    steps::chroot::Chroot,
    ui,
};

/// Kernel-module option enabling NVIDIA kernel mode setting. Required for
/// Wayland sessions and smooth VT switching on the proprietary driver.
const NVIDIA_MODESET: &str = "options nvidia-drm modeset=1\n";

/// Writes the NVIDIA modeset drop-in when the proprietary driver is in play.
/// Must run before the initramfs rebuild so the option is baked in.
pub fn gpu_modeset(chroot: &Chroot, config: &Config) -> Result<(), InstallerError> {
    if !config.gpu.uses_proprietary_nvidia() {
        return Ok(());
    }
    chroot.write("etc/modprobe.d/nvidia.conf", NVIDIA_MODESET)?;
    ui::print_success("NVIDIA kernel mode setting enabled.");
    Ok(())
}

/// Rebuilds the initial RAM filesystem for every installed kernel.
/// Runs after the module configuration tweak and before the bootloader,
/// which references the freshly built images.
pub fn initramfs(chroot: &Chroot) -> Result<(), InstallerError> {
    ui::print_info("Rebuilding initramfs for all installed kernels…");
    println!();
    // mkinitcpio -P streams per-preset progress — keep it interactive.
    chroot.run_interactive("mkinitcpio", &["-P"])?;
    ui::print_success("Initramfs images built.");
    Ok(())
}

/// Installs GRUB into the EFI system partition and generates its config.
///
/// The ESP mount is re-verified from inside the target first: the
/// validator's host-side check does not guarantee the mount is visible
/// across the context boundary.
pub fn bootloader(chroot: &Chroot, config: &Config) -> Result<(), InstallerError> {
    let esp = chroot.target_path(&config.esp_mount_path);

    if !chroot.is_mounted(&esp) {
        return Err(PreconditionError::BootPartitionLost(esp).into());
    }

    chroot.run(
        "grub-install",
        &[
            "--target=x86_64-efi",
            "--efi-directory",
            &esp,
            "--bootloader-id=GRUB",
        ],
        "Installing GRUB into the EFI partition…",
        &format!("GRUB installed to {}.", esp),
    )?;
    chroot.run(
        "grub-mkconfig",
        &["-o", "/boot/grub/grub.cfg"],
        "Generating GRUB configuration…",
        "Boot configuration written to /boot/grub/grub.cfg.",
    )
}
