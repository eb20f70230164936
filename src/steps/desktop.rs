use crate::{error::InstallerError, resolve::Plan, steps::chroot::Chroot, ui};

/// Enables the display manager recorded in the plan, if any. A console-only
/// install records no service and this step is a no-op.
pub fn enable_display_manager(chroot: &Chroot, plan: &Plan) -> Result<(), InstallerError> {
    let dm = match plan.display_manager {
        Some(dm) => dm,
        None => {
            ui::print_info("No display manager to enable.");
            return Ok(());
        }
    };

    chroot.run(
        "systemctl",
        &["enable", dm],
        &format!("Enabling {}…", dm),
        &format!("{} enabled for next boot.", dm),
    )
}
