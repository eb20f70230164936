use crate::config::{Config, CpuVendor, DesktopEnvironment, GpuVendor};

/// Packages installed on every system regardless of configuration:
/// core system, bootloader tooling, firmware blobs, essential editors,
/// the network manager and the privilege-escalation tool.
pub const BASE_PACKAGES: [&str; 9] = [
    "base",
    "base-devel",
    "linux-firmware",
    "grub",
    "efibootmgr",
    "nano",
    "vim",
    "networkmanager",
    "sudo",
];

/// Minimal display-server bootstrap, installed for any desktop choice.
const XORG_PACKAGES: [&str; 2] = ["xorg-server", "xorg-xinit"];

const INTEL_GPU_PACKAGES: [&str; 2] = ["xf86-video-intel", "vulkan-intel"];
const AMD_GPU_PACKAGES: [&str; 2] = ["xf86-video-amdgpu", "vulkan-radeon"];
const NVIDIA_GPU_PACKAGES: [&str; 4] =
    ["dkms", "nvidia-dkms", "nvidia-utils", "nvidia-settings"];

/// The derived installation plan: what phase 1 feeds to pacstrap, plus the
/// facts later phases need. Built exactly once, right after the configuration
/// is confirmed, and consumed exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub packages: Vec<String>,
    pub display_manager: Option<&'static str>,
    pub microcode: Option<&'static str>,
    /// The multilib repository must be enabled before any chroot-side
    /// package installation runs.
    pub needs_multilib: bool,
}

/// Derives the package plan from a configuration. Pure and deterministic:
/// the same configuration always yields a byte-identical plan.
///
/// Composition is strictly additive and NOT deduplicated — pacman treats a
/// package listed twice as a no-op, and deduplicating here could mask an
/// omission in one of the tables.
pub fn resolve(config: &Config) -> Plan {
    let mut packages: Vec<&str> = Vec::new();

    packages.extend_from_slice(&BASE_PACKAGES);

    // One kernel + its own headers package per selected variant.
    for kernel in &config.kernels {
        packages.push(kernel.package_name());
        packages.push(kernel.headers_package());
    }

    let microcode = config.cpu.microcode_package();
    if let Some(ucode) = microcode {
        packages.push(ucode);
    }

    if config.desktop != DesktopEnvironment::None {
        packages.extend_from_slice(&XORG_PACKAGES);
    }

    // Baseline userspace driver stack, useful for every vendor.
    packages.push("mesa");

    match config.gpu {
        GpuVendor::Intel => packages.extend_from_slice(&INTEL_GPU_PACKAGES),
        GpuVendor::Amd => packages.extend_from_slice(&AMD_GPU_PACKAGES),
        GpuVendor::Nvidia => packages.extend_from_slice(&NVIDIA_GPU_PACKAGES),
        GpuVendor::IntelNvidia => {
            packages.extend_from_slice(&INTEL_GPU_PACKAGES);
            packages.extend_from_slice(&NVIDIA_GPU_PACKAGES);
            packages.push("nvidia-prime");
        }
        GpuVendor::Nouveau => packages.push("xf86-video-nouveau"),
        GpuVendor::Skip | GpuVendor::Unknown => {}
    }

    packages.extend_from_slice(config.desktop.packages());

    Plan {
        packages: packages.into_iter().map(String::from).collect(),
        display_manager: config.desktop.display_manager(),
        microcode,
        needs_multilib: config.gaming,
    }
}

/// 32-bit compatibility packages for the gaming stack, by GPU vendor.
/// These are enhancements, installed best-effort after the main stack.
pub fn gaming_compat_packages(gpu: GpuVendor) -> Vec<&'static str> {
    let mut extras = vec!["lib32-mesa"];
    match gpu {
        GpuVendor::Intel => extras.push("lib32-vulkan-intel"),
        GpuVendor::Amd => extras.push("lib32-vulkan-radeon"),
        GpuVendor::Nvidia | GpuVendor::IntelNvidia => extras.push("lib32-nvidia-utils"),
        GpuVendor::Nouveau | GpuVendor::Skip | GpuVendor::Unknown => {}
    }
    extras
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KernelVariant;
    use std::path::PathBuf;

    fn config() -> Config {
        Config {
            hostname: "archbox".into(),
            username: "arch".into(),
            user_password: "hunter2".into(),
            root_password: None,
            timezone: "Europe/Berlin".into(),
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
        }
    }

    #[test]
    fn identical_configs_yield_identical_plans() {
        let mut c = config();
        c.kernels = vec![KernelVariant::Zen, KernelVariant::Lts];
        c.desktop = DesktopEnvironment::Plasma;
        c.gpu = GpuVendor::IntelNvidia;
        c.cpu = CpuVendor::Intel;
        c.gaming = true;

        assert_eq!(resolve(&c), resolve(&c.clone()));
    }

    #[test]
    fn one_headers_package_per_selected_kernel() {
        let mut c = config();
        c.kernels = vec![KernelVariant::Stable, KernelVariant::Zen];
        let plan = resolve(&c);

        assert!(plan.packages.contains(&"linux-headers".to_string()));
        assert!(plan.packages.contains(&"linux-zen-headers".to_string()));
        assert!(!plan.packages.contains(&"linux-lts-headers".to_string()));
        assert!(!plan.packages.contains(&"linux-lts".to_string()));
    }

    #[test]
    fn hybrid_is_superset_of_intel_and_nvidia_plus_one_helper() {
        let mut intel = config();
        intel.gpu = GpuVendor::Intel;
        let mut nvidia = config();
        nvidia.gpu = GpuVendor::Nvidia;
        let mut hybrid = config();
        hybrid.gpu = GpuVendor::IntelNvidia;

        let hybrid_plan = resolve(&hybrid);
        for pkg in resolve(&intel)
            .packages
            .iter()
            .chain(resolve(&nvidia).packages.iter())
        {
            assert!(
                hybrid_plan.packages.contains(pkg),
                "hybrid plan missing {}",
                pkg
            );
        }

        let helpers = hybrid_plan
            .packages
            .iter()
            .filter(|p| *p == "nvidia-prime")
            .count();
        assert_eq!(helpers, 1);
    }

    #[test]
    fn no_desktop_means_no_xorg_and_no_display_manager() {
        let plan = resolve(&config());
        assert_eq!(plan.display_manager, None);
        assert!(!plan.packages.contains(&"xorg-server".to_string()));
        assert!(!plan.packages.contains(&"xorg-xinit".to_string()));
    }

    #[test]
    fn desktop_brings_xorg_bootstrap_and_service() {
        let mut c = config();
        c.desktop = DesktopEnvironment::Gnome;
        let plan = resolve(&c);

        assert_eq!(plan.display_manager, Some("gdm"));
        assert!(plan.packages.contains(&"xorg-server".to_string()));
        assert!(plan.packages.contains(&"gnome".to_string()));
    }

    #[test]
    fn minimal_amd_scenario() {
        let mut c = config();
        c.kernels = vec![KernelVariant::Stable];
        c.desktop = DesktopEnvironment::None;
        c.gpu = GpuVendor::Amd;
        c.cpu = CpuVendor::Amd;
        let plan = resolve(&c);

        for pkg in BASE_PACKAGES {
            assert!(plan.packages.contains(&pkg.to_string()));
        }
        assert!(plan.packages.contains(&"linux".to_string()));
        assert!(plan.packages.contains(&"linux-headers".to_string()));
        assert!(plan.packages.contains(&"amd-ucode".to_string()));
        assert!(plan.packages.contains(&"vulkan-radeon".to_string()));
        assert!(plan.packages.contains(&"mesa".to_string()));
        assert_eq!(plan.display_manager, None);
        assert_eq!(plan.microcode, Some("amd-ucode"));
        assert!(!plan.needs_multilib);
    }

    #[test]
    fn gaming_sets_multilib_flag() {
        let mut c = config();
        c.gaming = true;
        assert!(resolve(&c).needs_multilib);
    }

    #[test]
    fn unknown_cpu_has_no_microcode() {
        let plan = resolve(&config());
        assert_eq!(plan.microcode, None);
        assert!(!plan.packages.iter().any(|p| p.ends_with("-ucode")));
    }

    #[test]
    fn compat_packages_follow_gpu_vendor() {
        assert!(gaming_compat_packages(GpuVendor::Amd).contains(&"lib32-vulkan-radeon"));
        assert!(gaming_compat_packages(GpuVendor::Nvidia).contains(&"lib32-nvidia-utils"));
        assert_eq!(gaming_compat_packages(GpuVendor::Skip), vec!["lib32-mesa"]);
    }
}
