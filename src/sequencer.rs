use crate::{
    config::Config,
    error::InstallerError,
    resolve::Plan,
    steps::{self, chroot::Chroot},
    ui, validate,
};

const TOTAL_STEPS: u8 = 13;

/// Runs the provisioning pipeline: host-side phases first, then the
/// target-side writers through the chroot boundary, in a fixed order that
/// encodes the real dependencies (fstab needs the installed tree, the
/// multilib toggle must precede chroot-side pacman, the initramfs rebuild
/// must follow the module tweak and precede the bootloader).
///
/// Strictly fail-fast: the first failing phase aborts everything after it,
/// tagged with the phase name. Nothing is retried and nothing is rolled
/// back — a failed run leaves the target partially configured.
pub fn run(config: &Config, plan: &Plan) -> Result<(), InstallerError> {
    // ── Host-side ─────────────────────────────────────────────────────────────

    ui::print_step(4, TOTAL_STEPS, "Bulk Package Installation");
    steps::install::run(plan).map_err(|e| e.in_phase("bulk-install"))?;

    ui::print_step(5, TOTAL_STEPS, "Filesystem Table");
    steps::fstab::generate().map_err(|e| e.in_phase("fstab"))?;

    // The configuration hand-off: from here on every mutation runs inside
    // the target root.
    let chroot = Chroot::new(validate::TARGET_ROOT);

    ui::print_step(6, TOTAL_STEPS, "Multilib Repository");
    if plan.needs_multilib {
        steps::multilib::enable(&chroot).map_err(|e| e.in_phase("multilib-toggle"))?;
    } else {
        ui::print_info("Multilib not required — skipping.");
    }

    // ── Target-side ───────────────────────────────────────────────────────────

    ui::print_step(7, TOTAL_STEPS, "Timezone & Locale");
    steps::system::timezone(&chroot, config).map_err(|e| e.in_phase("timezone"))?;
    steps::system::locale(&chroot, config).map_err(|e| e.in_phase("locale"))?;
    steps::system::hostname(&chroot, config).map_err(|e| e.in_phase("hostname"))?;

    ui::print_step(8, TOTAL_STEPS, "Users & Sudo");
    steps::users::create(&chroot, config).map_err(|e| e.in_phase("users"))?;
    steps::users::grant_sudo(&chroot).map_err(|e| e.in_phase("sudoers"))?;

    ui::print_step(9, TOTAL_STEPS, "Network");
    steps::network::enable(&chroot).map_err(|e| e.in_phase("network"))?;

    ui::print_step(10, TOTAL_STEPS, "Swapfile");
    steps::swap::configure(&chroot, config).map_err(|e| e.in_phase("swap"))?;

    ui::print_step(11, TOTAL_STEPS, "Initramfs & Bootloader");
    steps::boot::gpu_modeset(&chroot, config).map_err(|e| e.in_phase("gpu-modeset"))?;
    steps::boot::initramfs(&chroot).map_err(|e| e.in_phase("initramfs"))?;
    steps::boot::bootloader(&chroot, config).map_err(|e| e.in_phase("bootloader"))?;

    ui::print_step(12, TOTAL_STEPS, "Display Manager");
    steps::desktop::enable_display_manager(&chroot, plan)
        .map_err(|e| e.in_phase("display-manager"))?;

    ui::print_step(13, TOTAL_STEPS, "Gaming Stack");
    if config.gaming {
        steps::gaming::install(&chroot, config).map_err(|e| e.in_phase("gaming-stack"))?;
    } else {
        ui::print_info("Gaming stack not requested — skipping.");
    }

    Ok(())
}
