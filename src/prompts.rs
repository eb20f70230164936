use std::path::{Path, PathBuf};

use dialoguer::{Confirm, Input, MultiSelect, Password, Select};

use crate::{
    cmd,
    config::{Config, CpuVendor, DesktopEnvironment, GpuVendor, KernelVariant},
    error::InstallerError,
    hwdetect, ui,
};

/// Locale presets offered at the prompt: name, encoding, console keymap.
const LOCALE_PRESETS: [(&str, &str, &str); 8] = [
    ("en_US.UTF-8", "UTF-8", "us"),
    ("de_DE.UTF-8", "UTF-8", "de"),
    ("fr_FR.UTF-8", "UTF-8", "fr"),
    ("es_ES.UTF-8", "UTF-8", "es"),
    ("it_IT.UTF-8", "UTF-8", "it"),
    ("pt_BR.UTF-8", "UTF-8", "br-abnt2"),
    ("ru_RU.UTF-8", "UTF-8", "ru"),
    ("ja_JP.UTF-8", "UTF-8", "jp106"),
];

/// Collects the full configuration interactively. Every value is validated
/// at the prompt (re-asking locally on bad input), so the rest of the
/// installer can treat the returned record as trusted. Ends with a summary
/// and a confirmation gate; declining returns `Cancelled`.
pub fn collect(esp_mount_path: PathBuf) -> Result<Config, InstallerError> {
    let hostname: String = nonempty_input("Hostname", "archbox")?;
    let username: String = nonempty_input("Username for the primary user", "arch")?;

    let user_password = Password::new()
        .with_prompt(format!("Password for {}", username))
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()?;

    let root_password = if Confirm::new()
        .with_prompt("Set a separate root password? (otherwise root stays locked)")
        .default(false)
        .interact()?
    {
        Some(
            Password::new()
                .with_prompt("Root password")
                .with_confirmation("Confirm root password", "Passwords do not match")
                .interact()?,
        )
    } else {
        None
    };

    let timezone = ask_timezone()?;
    let (locales, language, keymap) = ask_locales()?;
    let kernels = ask_kernels()?;
    let desktop = ask_desktop()?;
    let cpu = ask_cpu()?;
    let gpu = ask_gpu()?;
    let swap_gb = ask_swap()?;

    let gaming = Confirm::new()
        .with_prompt("Install the gaming stack (Steam + 32-bit libraries)?")
        .default(false)
        .interact()?;

    let config = Config {
        hostname,
        username,
        user_password,
        root_password,
        timezone,
        locales,
        language,
        keymap,
        kernels,
        desktop,
        gpu,
        cpu,
        swap_gb,
        gaming,
        esp_mount_path,
    };

    confirm_summary(&config)?;
    Ok(config)
}

// ── Scalar prompts ────────────────────────────────────────────────────────────

fn nonempty_input(prompt: &str, default: &str) -> Result<String, InstallerError> {
    let value: String = Input::new()
        .with_prompt(prompt)
        .default(default.to_string())
        .validate_with(|v: &String| {
            if v.trim().is_empty() {
                Err("value must not be empty")
            } else {
                Ok(())
            }
        })
        .interact_text()?;
    Ok(value.trim().to_string())
}

/// Where the timezone database lives on the target and the live system.
const ZONEINFO_DIR: &str = "/usr/share/zoneinfo";

/// Asks for a timezone until the answer exists in the host's timezone
/// database. An invalid entry never aborts — it just re-prompts.
///
/// Membership is checked against `timedatectl list-timezones`; when that is
/// unavailable the zoneinfo directory itself is consulted instead, so a
/// broken timedatectl never turns validation off.
fn ask_timezone() -> Result<String, InstallerError> {
    let known = list_timezones();
    if known.is_empty() && !crate::is_dry_run() {
        ui::print_warning("timedatectl unavailable — validating against /usr/share/zoneinfo.");
    }

    loop {
        let tz: String = Input::new()
            .with_prompt("Timezone (e.g. Europe/Berlin)")
            .default("UTC".to_string())
            .interact_text()?;
        let tz = tz.trim().to_string();

        if tz.is_empty() {
            continue;
        }
        if crate::is_dry_run() || timezone_in_database(&known, Path::new(ZONEINFO_DIR), &tz) {
            return Ok(tz);
        }
        ui::print_warning(&format!("'{}' is not a known timezone — try again.", tz));
    }
}

fn list_timezones() -> Vec<String> {
    cmd::run_capture("timedatectl", &["list-timezones"])
        .map(|out| out.lines().map(str::to_string).collect())
        .unwrap_or_default()
}

/// True when `tz` exists in the timezone database: a member of the
/// `timedatectl` list when one was obtained, otherwise an actual zone file
/// under the zoneinfo directory. An empty list never accepts blindly.
fn timezone_in_database(known: &[String], zoneinfo_dir: &Path, tz: &str) -> bool {
    if !known.is_empty() {
        return known.iter().any(|k| k == tz);
    }
    zoneinfo_dir.join(tz).is_file()
}

// ── Locale set ────────────────────────────────────────────────────────────────

fn ask_locales() -> Result<(Vec<(String, String)>, String, String), InstallerError> {
    let labels: Vec<String> = LOCALE_PRESETS
        .iter()
        .map(|(name, enc, _)| format!("{} ({})", name, enc))
        .collect();

    let picked = loop {
        let mut defaults = vec![false; LOCALE_PRESETS.len()];
        defaults[0] = true;

        let picked = MultiSelect::new()
            .with_prompt("Locales to generate (space to toggle, enter to accept)")
            .items(&labels)
            .defaults(&defaults)
            .interact()?;

        if !picked.is_empty() {
            break picked;
        }
        ui::print_warning("Select at least one locale.");
    };

    let locales: Vec<(String, String)> = picked
        .iter()
        .map(|&i| {
            let (name, enc, _) = LOCALE_PRESETS[i];
            (name.to_string(), enc.to_string())
        })
        .collect();

    // Default system language: one of the locales just selected.
    let language = if locales.len() == 1 {
        locales[0].0.clone()
    } else {
        let names: Vec<&str> = locales.iter().map(|(n, _)| n.as_str()).collect();
        let idx = Select::new()
            .with_prompt("Default system language")
            .items(&names)
            .default(0)
            .interact()?;
        locales[idx].0.clone()
    };

    let suggested_keymap = LOCALE_PRESETS[picked[0]].2;
    let keymap = nonempty_input("Console keymap", suggested_keymap)?;

    Ok((locales, language, keymap))
}

// ── Enumerated choices ────────────────────────────────────────────────────────

fn ask_kernels() -> Result<Vec<KernelVariant>, InstallerError> {
    ui::print_kv_box(
        "Kernel variants",
        &[
            ("stable", "latest mainline kernel — best hardware support"),
            ("lts", "long-term support — stability over features"),
            ("zen", "performance-tuned, lower latency — gaming/desktop"),
        ],
    );
    println!();

    let labels: Vec<&str> = KernelVariant::ALL.iter().map(|k| k.display_name()).collect();

    loop {
        let picked = MultiSelect::new()
            .with_prompt("Kernels to install (at least one)")
            .items(&labels)
            .defaults(&[true, false, false])
            .interact()?;

        if !picked.is_empty() {
            return Ok(picked.into_iter().map(|i| KernelVariant::ALL[i]).collect());
        }
        ui::print_warning("Select at least one kernel.");
    }
}

fn ask_desktop() -> Result<DesktopEnvironment, InstallerError> {
    let labels: Vec<&str> = DesktopEnvironment::ALL
        .iter()
        .map(|d| d.display_name())
        .collect();

    let idx = Select::new()
        .with_prompt("Desktop environment")
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(DesktopEnvironment::ALL[idx])
}

fn ask_cpu() -> Result<CpuVendor, InstallerError> {
    let detected = hwdetect::detect_cpu_vendor();
    if detected != CpuVendor::Unknown {
        ui::print_info(&format!("Detected CPU vendor: {}", detected.display_name()));
    }

    let choices = [CpuVendor::Intel, CpuVendor::Amd, CpuVendor::Unknown];
    let labels = ["Intel", "AMD", "Other / skip microcode"];
    let default = choices.iter().position(|&c| c == detected).unwrap_or(2);

    let idx = Select::new()
        .with_prompt("CPU vendor (selects the microcode package)")
        .items(&labels)
        .default(default)
        .interact()?;

    Ok(choices[idx])
}

fn ask_gpu() -> Result<GpuVendor, InstallerError> {
    let detected = hwdetect::detect_gpu_vendor();
    if detected != GpuVendor::Unknown {
        ui::print_info(&format!("Detected GPU: {}", detected.display_name()));
    }

    let labels: Vec<&str> = GpuVendor::CHOICES.iter().map(|g| g.display_name()).collect();
    let default = GpuVendor::CHOICES
        .iter()
        .position(|&g| g == detected)
        .unwrap_or(GpuVendor::CHOICES.len() - 1); // unknown → suggest "skip"

    let idx = Select::new()
        .with_prompt("Graphics driver")
        .items(&labels)
        .default(default)
        .interact()?;

    Ok(GpuVendor::CHOICES[idx])
}

fn ask_swap() -> Result<u8, InstallerError> {
    const SIZES: [u8; 4] = [0, 2, 4, 8];
    let labels = ["No swapfile", "2 GiB", "4 GiB", "8 GiB"];

    let idx = Select::new()
        .with_prompt("Swapfile size")
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(SIZES[idx])
}

// ── Confirmation gate ─────────────────────────────────────────────────────────

fn confirm_summary(config: &Config) -> Result<(), InstallerError> {
    let kernels = config
        .kernels
        .iter()
        .map(|k| k.package_name())
        .collect::<Vec<_>>()
        .join(", ");
    let locales = config
        .locales
        .iter()
        .map(|(n, _)| n.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let swap = if config.swap_gb == 0 {
        "none".to_string()
    } else {
        format!("{} GiB", config.swap_gb)
    };
    let esp = config.esp_mount_path.display().to_string();

    println!();
    ui::print_kv_box(
        "Installation Summary",
        &[
            ("Hostname", config.hostname.as_str()),
            ("User", config.username.as_str()),
            ("Timezone", config.timezone.as_str()),
            ("Locales", locales.as_str()),
            ("Language", config.language.as_str()),
            ("Keymap", config.keymap.as_str()),
            ("Kernels", kernels.as_str()),
            ("Desktop", config.desktop.display_name()),
            ("GPU", config.gpu.display_name()),
            ("CPU", config.cpu.display_name()),
            ("Swap", swap.as_str()),
            ("Gaming", if config.gaming { "yes" } else { "no" }),
            ("ESP", esp.as_str()),
        ],
    );
    println!();

    if !Confirm::new()
        .with_prompt("Proceed with the installation?")
        .default(false)
        .interact()?
    {
        return Err(InstallerError::Cancelled);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known(zones: &[&str]) -> Vec<String> {
        zones.iter().map(|z| z.to_string()).collect()
    }

    #[test]
    fn timezone_list_membership_decides() {
        let zones = known(&["Europe/Berlin", "UTC"]);
        let dir = Path::new("/nonexistent");
        assert!(timezone_in_database(&zones, dir, "Europe/Berlin"));
        assert!(!timezone_in_database(&zones, dir, "Mars/Olympus"));
    }

    #[test]
    fn empty_list_does_not_accept_blindly() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!timezone_in_database(&[], dir.path(), "Mars/Olympus"));
    }

    #[test]
    fn empty_list_falls_back_to_zoneinfo_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("Europe")).unwrap();
        std::fs::write(dir.path().join("Europe/Berlin"), b"TZif2").unwrap();

        assert!(timezone_in_database(&[], dir.path(), "Europe/Berlin"));
        assert!(!timezone_in_database(&[], dir.path(), "Europe/Atlantis"));
        // A region directory is not a zone.
        assert!(!timezone_in_database(&[], dir.path(), "Europe"));
    }

    #[test]
    fn list_takes_precedence_over_zoneinfo() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Local"), b"TZif2").unwrap();
        // Present on disk but absent from the authoritative list.
        assert!(!timezone_in_database(&known(&["UTC"]), dir.path(), "Local"));
    }
}
