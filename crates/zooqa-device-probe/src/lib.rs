//! Host CPU capability probing for backend test gating.
//!
//! Quantized (int8/qdq) model execution produces reference outputs only on
//! CPUs with the AVX-512 VNNI extension; the test orchestrator consults this
//! crate to decide whether running such a model is meaningful on the current
//! host.
//!
//! Results are deterministic within a process lifetime, so callers may cache
//! them, though nothing here requires it.

// ── CPU capabilities ─────────────────────────────────────────────────────────

/// CPU capabilities detected at runtime.
///
/// Obtained by calling [`probe_cpu`].
///
/// `ZOOQA_CPU_FAKE` supports a comma-separated feature list (`avx2`,
/// `avx512f`, `avx512vnni`, `neon`) for deterministic testing; `none` clears
/// every flag. Strict mode (`ZOOQA_STRICT_MODE=1`) ignores `ZOOQA_CPU_FAKE`
/// and probes real hardware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuCapabilities {
    /// Number of logical CPU cores available to the process (always ≥ 1).
    pub core_count: usize,
    /// AVX2 SIMD extension available on this CPU (`x86_64` only).
    pub has_avx2: bool,
    /// AVX-512 foundation extension available (`x86_64` only).
    pub has_avx512f: bool,
    /// AVX-512 VNNI extension available — required for faithful int8/qdq
    /// kernel execution (`x86_64` only).
    pub has_avx512vnni: bool,
    /// NEON SIMD extension available (always `true` on `AArch64`, `false`
    /// elsewhere).
    pub has_neon: bool,
}

/// Probe the current CPU and return its capabilities.
///
/// `core_count` is derived from [`std::thread::available_parallelism`] and is
/// guaranteed to be ≥ 1. SIMD flags are detected via
/// `is_x86_feature_detected!` (`x86_64`) or compile-time cfg (`aarch64`).
/// Honours `ZOOQA_CPU_FAKE` unless `ZOOQA_STRICT_MODE=1` is set.
///
/// # Examples
///
/// ```
/// use zooqa_device_probe::probe_cpu;
///
/// let caps = probe_cpu();
/// assert!(caps.core_count >= 1);
/// // NEON and AVX flags are mutually exclusive across architectures.
/// assert!(!(caps.has_avx2 && caps.has_neon));
/// ```
pub fn probe_cpu() -> CpuCapabilities {
    let core_count =
        std::thread::available_parallelism().map(std::num::NonZero::get).unwrap_or(1);

    if let Some(fake) = fake_cpu_features() {
        return CpuCapabilities {
            core_count,
            has_avx2: fake.contains("avx2"),
            has_avx512f: fake.contains("avx512f"),
            has_avx512vnni: fake.contains("avx512vnni"),
            has_neon: fake.contains("neon"),
        };
    }

    #[cfg(target_arch = "x86_64")]
    let (has_avx2, has_avx512f, has_avx512vnni, has_neon) = (
        is_x86_feature_detected!("avx2"),
        is_x86_feature_detected!("avx512f"),
        is_x86_feature_detected!("avx512vnni"),
        false,
    );

    #[cfg(target_arch = "aarch64")]
    let (has_avx2, has_avx512f, has_avx512vnni, has_neon) = (false, false, false, true);

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    let (has_avx2, has_avx512f, has_avx512vnni, has_neon) = (false, false, false, false);

    CpuCapabilities { core_count, has_avx2, has_avx512f, has_avx512vnni, has_neon }
}

/// Check whether the host can execute int8/qdq quantized kernels faithfully.
///
/// Returns `true` iff the CPU reports the AVX-512 VNNI extension. Reference
/// outputs for quantized models are produced on VNNI hardware; hosts without
/// it diverge numerically, so execution there is not meaningful.
///
/// # Examples
///
/// ```
/// let vnni = zooqa_device_probe::has_vnni_support();
/// println!("avx512vnni={vnni}");
/// ```
pub fn has_vnni_support() -> bool {
    probe_cpu().has_avx512vnni
}

fn strict_mode_enabled() -> bool {
    std::env::var("ZOOQA_STRICT_MODE")
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(false)
}

fn fake_cpu_features() -> Option<std::collections::HashSet<String>> {
    if strict_mode_enabled() {
        return None;
    }

    let fake = std::env::var("ZOOQA_CPU_FAKE").ok()?;
    let normalized = fake.trim().to_ascii_lowercase();

    if normalized == "none" {
        return Some(std::collections::HashSet::new());
    }

    let set = normalized
        .split([',', ';', '|', ' '])
        .filter(|part| !part.is_empty())
        .map(ToOwned::to_owned)
        .collect();

    Some(set)
}
