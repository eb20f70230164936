//! Best-effort hardware classification. A live ISO on exotic hardware must
//! still reach the prompts, so every probe degrades to `Unknown` instead of
//! failing, and the result is only a prompt default: the user's explicit
//! choice always wins.

use crate::{
    cmd,
    config::{CpuVendor, GpuVendor},
};

/// Classifies the CPU vendor from `/proc/cpuinfo`.
pub fn detect_cpu_vendor() -> CpuVendor {
    match std::fs::read_to_string("/proc/cpuinfo") {
        Ok(text) => classify_cpu(&text),
        Err(_) => CpuVendor::Unknown,
    }
}

/// Classifies the GPU vendor from `lspci` output.
pub fn detect_gpu_vendor() -> GpuVendor {
    match cmd::run_capture("lspci", &[]) {
        Ok(text) => classify_gpu(&text),
        Err(_) => GpuVendor::Unknown,
    }
}

// ── Pure classifiers ──────────────────────────────────────────────────────────

fn classify_cpu(cpuinfo: &str) -> CpuVendor {
    let vendor_id = cpuinfo
        .lines()
        .find(|l| l.starts_with("vendor_id"))
        .and_then(|l| l.split(':').nth(1))
        .map(str::trim)
        .unwrap_or("");

    match vendor_id {
        "GenuineIntel" => CpuVendor::Intel,
        "AuthenticAMD" => CpuVendor::Amd,
        _ => CpuVendor::Unknown,
    }
}

fn classify_gpu(lspci: &str) -> GpuVendor {
    // Only display controllers count; an Intel USB controller must not
    // classify the machine as having an Intel GPU.
    let display_lines: Vec<String> = lspci
        .lines()
        .filter(|l| {
            let lower = l.to_ascii_lowercase();
            lower.contains(" vga ")
                || lower.contains("vga compatible")
                || lower.contains("3d controller")
                || lower.contains("display controller")
        })
        .map(|l| l.to_ascii_lowercase())
        .collect();

    let has_intel = display_lines.iter().any(|l| l.contains("intel"));
    let has_nvidia = display_lines.iter().any(|l| l.contains("nvidia"));
    let has_amd = display_lines
        .iter()
        .any(|l| l.contains("amd") || l.contains("ati") || l.contains("radeon"));

    match (has_intel, has_nvidia, has_amd) {
        (true, true, _) => GpuVendor::IntelNvidia,
        (_, true, _) => GpuVendor::Nvidia,
        (_, _, true) => GpuVendor::Amd,
        (true, _, _) => GpuVendor::Intel,
        _ => GpuVendor::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_intel_cpu() {
        let cpuinfo = "processor\t: 0\nvendor_id\t: GenuineIntel\nmodel name\t: 12th Gen\n";
        assert_eq!(classify_cpu(cpuinfo), CpuVendor::Intel);
    }

    #[test]
    fn classifies_amd_cpu() {
        let cpuinfo = "processor\t: 0\nvendor_id\t: AuthenticAMD\n";
        assert_eq!(classify_cpu(cpuinfo), CpuVendor::Amd);
    }

    #[test]
    fn unknown_cpu_vendor_is_not_an_error() {
        assert_eq!(classify_cpu(""), CpuVendor::Unknown);
        assert_eq!(classify_cpu("vendor_id : SomethingElse\n"), CpuVendor::Unknown);
    }

    #[test]
    fn classifies_amd_gpu() {
        let lspci = "07:00.0 VGA compatible controller: Advanced Micro Devices, Inc. [AMD/ATI] Navi 23\n";
        assert_eq!(classify_gpu(lspci), GpuVendor::Amd);
    }

    #[test]
    fn classifies_nvidia_gpu() {
        let lspci = "01:00.0 VGA compatible controller: NVIDIA Corporation GA104 [GeForce RTX 3070]\n";
        assert_eq!(classify_gpu(lspci), GpuVendor::Nvidia);
    }

    #[test]
    fn classifies_hybrid_graphics() {
        let lspci = "\
00:02.0 VGA compatible controller: Intel Corporation Alder Lake-P GT2 [Iris Xe Graphics]
01:00.0 3D controller: NVIDIA Corporation GA107M [GeForce RTX 3050 Mobile]
";
        assert_eq!(classify_gpu(lspci), GpuVendor::IntelNvidia);
    }

    #[test]
    fn non_display_devices_are_ignored() {
        let lspci = "\
00:14.0 USB controller: Intel Corporation Tiger Lake-LP USB 3.2
00:1f.3 Audio device: Intel Corporation Tiger Lake-LP Smart Sound
";
        assert_eq!(classify_gpu(lspci), GpuVendor::Unknown);
    }
}
