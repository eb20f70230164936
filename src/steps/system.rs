use crate::{config::Config, error::InstallerError, patch, steps::chroot::Chroot, ui};

// ── Timezone ──────────────────────────────────────────────────────────────────

/// Links `/etc/localtime` to the chosen zone and syncs the hardware clock.
pub fn timezone(chroot: &Chroot, config: &Config) -> Result<(), InstallerError> {
    let zone = format!("/usr/share/zoneinfo/{}", config.timezone);
    chroot.run(
        "ln",
        &["-sf", &zone, "/etc/localtime"],
        &format!("Setting timezone to {}…", config.timezone),
        &format!("Timezone set to {}.", config.timezone),
    )?;
    chroot.run(
        "hwclock",
        &["--systohc"],
        "Syncing hardware clock…",
        "Hardware clock synced.",
    )
}

// ── Locale ────────────────────────────────────────────────────────────────────

/// Activates the requested locales in `locale.gen`, regenerates the locale
/// database, and writes the default language and console keymap.
///
/// A requested locale with no matching commented entry in locale.gen is
/// skipped with a warning but does not fail the install.
pub fn locale(chroot: &Chroot, config: &Config) -> Result<(), InstallerError> {
    if let Some(content) = chroot.read("etc/locale.gen")? {
        let (patched, missing) = activate_locales(&content, &config.locales);
        for name in &missing {
            ui::print_warning(&format!(
                "Locale '{}' has no entry in locale.gen — skipped.",
                name
            ));
        }
        chroot.write("etc/locale.gen", &patched)?;
    }

    chroot.run(
        "locale-gen",
        &[],
        "Generating locales…",
        "Locales generated.",
    )?;

    chroot.write("etc/locale.conf", &format!("LANG={}\n", config.language))?;
    chroot.write("etc/vconsole.conf", &format!("KEYMAP={}\n", config.keymap))?;
    ui::print_success(&format!(
        "Default language {} · keymap {}.",
        config.language, config.keymap
    ));
    Ok(())
}

/// Uncomments every requested `name encoding` entry. Returns the patched
/// content and the locales that matched nothing (neither commented nor
/// already active).
fn activate_locales(content: &str, locales: &[(String, String)]) -> (String, Vec<String>) {
    let mut current = content.to_string();
    let mut missing = Vec::new();

    for (name, encoding) in locales {
        let needle = format!("{} {}", name, encoding);
        let (next, changed) = patch::uncomment_matching(&current, |l| l.starts_with(&needle));

        let already_active = changed == 0
            && current
                .lines()
                .any(|l| l.trim_start().starts_with(&needle));
        if changed == 0 && !already_active {
            missing.push(name.clone());
        }
        current = next;
    }

    (current, missing)
}

// ── Hostname / hosts ──────────────────────────────────────────────────────────

/// Writes `/etc/hostname` and the loopback entries in `/etc/hosts`.
pub fn hostname(chroot: &Chroot, config: &Config) -> Result<(), InstallerError> {
    chroot.write("etc/hostname", &format!("{}\n", config.hostname))?;
    chroot.write("etc/hosts", &hosts_file(&config.hostname))?;
    ui::print_success(&format!("Hostname set to {}.", config.hostname));
    Ok(())
}

fn hosts_file(hostname: &str) -> String {
    format!(
        "127.0.0.1\tlocalhost\n\
         ::1\t\tlocalhost\n\
         127.0.1.1\t{h}.localdomain\t{h}\n",
        h = hostname
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCALE_GEN: &str = "\
#  Configuration file for locale-gen
#
#en_US.UTF-8 UTF-8
#en_US ISO-8859-1
#de_DE.UTF-8 UTF-8
ja_JP.UTF-8 UTF-8
";

    fn pairs(entries: &[(&str, &str)]) -> Vec<(String, String)> {
        entries
            .iter()
            .map(|(n, e)| (n.to_string(), e.to_string()))
            .collect()
    }

    #[test]
    fn activates_matching_commented_entries() {
        let (out, missing) =
            activate_locales(LOCALE_GEN, &pairs(&[("en_US.UTF-8", "UTF-8")]));
        assert!(out.contains("\nen_US.UTF-8 UTF-8\n"));
        // The ISO variant stays commented.
        assert!(out.contains("#en_US ISO-8859-1"));
        assert!(missing.is_empty());
    }

    #[test]
    fn unmatched_locale_is_a_silent_skip() {
        let (out, missing) =
            activate_locales(LOCALE_GEN, &pairs(&[("xx_XX.UTF-8", "UTF-8")]));
        assert_eq!(out, format!("{}", LOCALE_GEN));
        assert_eq!(missing, vec!["xx_XX.UTF-8".to_string()]);
    }

    #[test]
    fn already_active_locale_is_not_reported_missing() {
        let (out, missing) =
            activate_locales(LOCALE_GEN, &pairs(&[("ja_JP.UTF-8", "UTF-8")]));
        assert!(out.contains("\nja_JP.UTF-8 UTF-8\n"));
        assert!(missing.is_empty());
    }

    #[test]
    fn multiple_locales_activate_in_one_pass() {
        let (out, missing) = activate_locales(
            LOCALE_GEN,
            &pairs(&[("en_US.UTF-8", "UTF-8"), ("de_DE.UTF-8", "UTF-8")]),
        );
        assert!(out.contains("\nen_US.UTF-8 UTF-8\n"));
        assert!(out.contains("\nde_DE.UTF-8 UTF-8\n"));
        assert!(missing.is_empty());
    }

    #[test]
    fn hosts_file_has_loopback_and_fqdn() {
        let hosts = hosts_file("archbox");
        assert!(hosts.contains("127.0.0.1\tlocalhost"));
        assert!(hosts.contains("::1"));
        assert!(hosts.contains("127.0.1.1\tarchbox.localdomain\tarchbox"));
    }
}
