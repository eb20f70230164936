use crate::{error::InstallerError, steps::chroot::Chroot, ui};

/// Phase 3: enables the multilib repository in the target's pacman.conf.
///
/// Must complete before any chroot-side package installation: the gaming
/// stack depends on lib32-* packages that only exist once multilib is
/// active. Idempotent by construction — an already-enabled config or a
/// missing file leaves everything untouched.
pub fn enable(chroot: &Chroot) -> Result<(), InstallerError> {
    if crate::is_dry_run() {
        ui::print_success("Dry run: multilib toggle simulated.");
        return Ok(());
    }

    let content = match chroot.read("etc/pacman.conf")? {
        Some(c) => c,
        None => {
            ui::print_warning("pacman.conf not found in target — skipping multilib toggle.");
            return Ok(());
        }
    };

    let (patched, changed) = enable_multilib(&content);
    if changed == 0 {
        ui::print_success("Multilib repository already enabled.");
        return Ok(());
    }

    chroot.write("etc/pacman.conf", &patched)?;
    ui::print_success("Multilib repository enabled.");
    Ok(())
}

/// Uncomments the `[multilib]` section header and its `Include` line.
/// Any other commented repository block is left alone: the `Include` is
/// only touched inside the multilib block. The block state is seeded from
/// an already-active header as well, so a half-toggled config (active
/// header, commented `Include`) is completed rather than left broken.
fn enable_multilib(content: &str) -> (String, usize) {
    let mut out = String::with_capacity(content.len());
    let mut in_block = false;
    let mut changed = 0;

    for line in content.lines() {
        let trimmed = line.trim_start();

        if let Some(rest) = trimmed.strip_prefix('#').map(str::trim_start) {
            if rest.starts_with("[multilib]") {
                out.push_str(rest);
                changed += 1;
                in_block = true;
            } else if in_block && rest.starts_with("Include") {
                out.push_str(rest);
                changed += 1;
                in_block = false;
            } else {
                out.push_str(line);
                in_block = false;
            }
        } else {
            if trimmed.starts_with("[multilib]") {
                in_block = true;
            } else if !trimmed.is_empty() {
                in_block = false;
            }
            out.push_str(line);
        }
        out.push('\n');
    }

    (out, changed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PACMAN_CONF: &str = "\
[core]
Include = /etc/pacman.d/mirrorlist

[extra]
Include = /etc/pacman.d/mirrorlist

#[multilib]
#Include = /etc/pacman.d/mirrorlist

#[custom]
#Include = /etc/pacman.d/custom
";

    #[test]
    fn enables_the_multilib_block_only() {
        let (out, changed) = enable_multilib(PACMAN_CONF);
        assert_eq!(changed, 2);
        assert!(out.contains("\n[multilib]\nInclude = /etc/pacman.d/mirrorlist\n"));
        // Unrelated commented block stays commented.
        assert!(out.contains("#[custom]"));
        assert!(out.contains("#Include = /etc/pacman.d/custom"));
        // Active repos untouched.
        assert!(out.contains("[core]\nInclude = /etc/pacman.d/mirrorlist"));
    }

    #[test]
    fn second_toggle_is_byte_identical() {
        let (once, _) = enable_multilib(PACMAN_CONF);
        let (twice, changed) = enable_multilib(&once);
        assert_eq!(once, twice);
        assert_eq!(changed, 0);
    }

    #[test]
    fn already_enabled_config_is_untouched() {
        let conf = "[multilib]\nInclude = /etc/pacman.d/mirrorlist\n";
        let (out, changed) = enable_multilib(conf);
        assert_eq!(out, conf);
        assert_eq!(changed, 0);
    }

    #[test]
    fn half_toggled_config_is_completed() {
        // Active header with the Include still commented, as left by an
        // interrupted or hand-edited toggle.
        let conf = "[multilib]\n#Include = /etc/pacman.d/mirrorlist\n";
        let (out, changed) = enable_multilib(conf);
        assert_eq!(out, "[multilib]\nInclude = /etc/pacman.d/mirrorlist\n");
        assert_eq!(changed, 1);

        let (again, changed2) = enable_multilib(&out);
        assert_eq!(again, out);
        assert_eq!(changed2, 0);
    }

    #[test]
    fn active_header_does_not_leak_into_other_blocks() {
        let conf = "\
[multilib]
Include = /etc/pacman.d/mirrorlist

#[custom]
#Include = /etc/pacman.d/custom
";
        let (out, changed) = enable_multilib(conf);
        assert_eq!(out, conf);
        assert_eq!(changed, 0);
    }
}
