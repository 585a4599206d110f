#[cfg(all(target_arch = "aarch64", not(feature = "no-simd")))]
mod aarch64_neon;
mod scalar;
#[cfg(all(target_arch = "x86_64", not(feature = "no-simd")))]
mod x86_avx2;

/// Number of `G`/`C` symbols in `seq`, either case.
#[allow(unreachable_code)]
pub fn count_gc(seq: &[u8]) -> u64 {
    #[cfg(all(target_arch = "x86_64", not(feature = "no-simd")))]
    {
        if std::arch::is_x86_feature_detected!("avx2") {
            // SAFETY: avx2 availability checked above.
            return unsafe { x86_avx2::count_gc_avx2(seq) };
        }
    }
    #[cfg(all(target_arch = "aarch64", not(feature = "no-simd")))]
    {
        // SAFETY: neon is mandatory on aarch64.
        return unsafe { aarch64_neon::count_gc_neon(seq) };
    }
    scalar::count_gc(seq)
}
