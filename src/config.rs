use std::path::PathBuf;

/// Everything the installer needs to know about the system being built.
/// Collected once, confirmed by the user, and never mutated afterwards:
/// both the resolver and the sequencer only ever borrow it.
#[derive(Debug, Clone)]
pub struct Config {
    pub hostname: String,
    pub username: String,
    pub user_password: String,
    /// `None` leaves the root account locked.
    pub root_password: Option<String>,
    pub timezone: String,
    /// Ordered `(locale name, encoding)` pairs to activate in locale.gen.
    pub locales: Vec<(String, String)>,
    /// System default language (written to locale.conf).
    pub language: String,
    pub keymap: String,
    /// At least one kernel is always selected.
    pub kernels: Vec<KernelVariant>,
    pub desktop: DesktopEnvironment,
    pub gpu: GpuVendor,
    pub cpu: CpuVendor,
    /// 0 means no swapfile.
    pub swap_gb: u8,
    /// Steam + 32-bit compatibility layer; requires the multilib repository.
    pub gaming: bool,
    /// Where the EFI system partition is mounted, as found by the validator.
    pub esp_mount_path: PathBuf,
}

// ── Kernel ────────────────────────────────────────────────────────────────────

/// Which Linux kernel variants to install.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelVariant {
    Stable,
    Lts,
    Zen,
}

impl KernelVariant {
    pub const ALL: [KernelVariant; 3] =
        [KernelVariant::Stable, KernelVariant::Lts, KernelVariant::Zen];

    /// The pacman package name for this variant.
    pub fn package_name(self) -> &'static str {
        match self {
            KernelVariant::Stable => "linux",
            KernelVariant::Lts => "linux-lts",
            KernelVariant::Zen => "linux-zen",
        }
    }

    /// Every kernel variant ships its own headers package; there is no
    /// shared headers package between variants.
    pub fn headers_package(self) -> &'static str {
        match self {
            KernelVariant::Stable => "linux-headers",
            KernelVariant::Lts => "linux-lts-headers",
            KernelVariant::Zen => "linux-zen-headers",
        }
    }

    /// Human-readable label shown to the user.
    pub fn display_name(self) -> &'static str {
        match self {
            KernelVariant::Stable => "Linux stable",
            KernelVariant::Lts => "Linux LTS (long-term support)",
            KernelVariant::Zen => "Linux Zen (performance-optimized)",
        }
    }
}

// ── Desktop environment ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesktopEnvironment {
    None,
    Gnome,
    Plasma,
    Xfce,
    Cinnamon,
}

impl DesktopEnvironment {
    pub const ALL: [DesktopEnvironment; 5] = [
        DesktopEnvironment::None,
        DesktopEnvironment::Gnome,
        DesktopEnvironment::Plasma,
        DesktopEnvironment::Xfce,
        DesktopEnvironment::Cinnamon,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            DesktopEnvironment::None => "None (console only)",
            DesktopEnvironment::Gnome => "GNOME",
            DesktopEnvironment::Plasma => "KDE Plasma",
            DesktopEnvironment::Xfce => "Xfce",
            DesktopEnvironment::Cinnamon => "Cinnamon",
        }
    }

    /// Package bundle installed for this environment.
    pub fn packages(self) -> &'static [&'static str] {
        match self {
            DesktopEnvironment::None => &[],
            DesktopEnvironment::Gnome => &["gnome", "gnome-tweaks"],
            DesktopEnvironment::Plasma => &["plasma", "konsole", "dolphin"],
            DesktopEnvironment::Xfce => {
                &["xfce4", "xfce4-goodies", "lightdm", "lightdm-gtk-greeter"]
            }
            DesktopEnvironment::Cinnamon => {
                &["cinnamon", "lightdm", "lightdm-gtk-greeter"]
            }
        }
    }

    /// The display-manager service to enable, if any.
    pub fn display_manager(self) -> Option<&'static str> {
        match self {
            DesktopEnvironment::None => None,
            DesktopEnvironment::Gnome => Some("gdm"),
            DesktopEnvironment::Plasma => Some("sddm"),
            DesktopEnvironment::Xfce | DesktopEnvironment::Cinnamon => Some("lightdm"),
        }
    }
}

// ── GPU vendor ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpuVendor {
    Intel,
    Amd,
    Nvidia,
    /// Laptop hybrid graphics: Intel iGPU + discrete NVIDIA.
    IntelNvidia,
    /// Open-source NVIDIA driver.
    Nouveau,
    Skip,
    Unknown,
}

impl GpuVendor {
    /// Choices offered at the prompt (Unknown is a detector result, not an option).
    pub const CHOICES: [GpuVendor; 6] = [
        GpuVendor::Intel,
        GpuVendor::Amd,
        GpuVendor::Nvidia,
        GpuVendor::IntelNvidia,
        GpuVendor::Nouveau,
        GpuVendor::Skip,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            GpuVendor::Intel => "Intel",
            GpuVendor::Amd => "AMD",
            GpuVendor::Nvidia => "NVIDIA (proprietary)",
            GpuVendor::IntelNvidia => "Intel + NVIDIA hybrid",
            GpuVendor::Nouveau => "NVIDIA (nouveau, open source)",
            GpuVendor::Skip => "Skip driver installation",
            GpuVendor::Unknown => "Unknown",
        }
    }

    /// True for configurations that load the proprietary NVIDIA kernel module
    /// and therefore need the modeset tweak and DKMS rebuilds.
    pub fn uses_proprietary_nvidia(self) -> bool {
        matches!(self, GpuVendor::Nvidia | GpuVendor::IntelNvidia)
    }
}

// ── CPU vendor ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuVendor {
    Intel,
    Amd,
    Unknown,
}

impl CpuVendor {
    pub fn display_name(self) -> &'static str {
        match self {
            CpuVendor::Intel => "Intel",
            CpuVendor::Amd => "AMD",
            CpuVendor::Unknown => "Unknown",
        }
    }

    /// The microcode update package for this vendor, if any.
    pub fn microcode_package(self) -> Option<&'static str> {
        match self {
            CpuVendor::Intel => Some("intel-ucode"),
            CpuVendor::Amd => Some("amd-ucode"),
            CpuVendor::Unknown => None,
        }
    }
}
