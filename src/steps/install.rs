use crate::{cmd, error::InstallerError, resolve::Plan, ui, validate};

/// Phase 1: installs every package in the plan into the target root.
///
/// pacman tolerates duplicate package names in one invocation, so the plan
/// is passed through exactly as resolved. A failure here is unrecoverable
/// within this run — there is no partial-install repair.
pub fn run(plan: &Plan) -> Result<(), InstallerError> {
    ui::print_info(&format!(
        "Installing {} packages into {}…",
        plan.packages.len(),
        validate::TARGET_ROOT
    ));
    println!();

    let mut args: Vec<&str> = vec!["-K", validate::TARGET_ROOT];
    args.extend(plan.packages.iter().map(String::as_str));

    // pacstrap streams download progress — keep it interactive.
    cmd::run_interactive("pacstrap", &args)?;

    ui::print_success("Package installation complete.");
    Ok(())
}
