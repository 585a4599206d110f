#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
pub unsafe fn count_gc_neon(seq: &[u8]) -> u64 {
    let mut gc = 0u64;
    let mut i = 0usize;
    let len = seq.len();

    let upper_mask = vdupq_n_u8(0xDF);
    let vc = vdupq_n_u8(b'C');
    let vg = vdupq_n_u8(b'G');
    let ones = vdupq_n_u8(1);

    while i + 16 <= len {
        let v = unsafe { vld1q_u8(seq.as_ptr().add(i)) };
        let v = vandq_u8(v, upper_mask);
        let hits = vorrq_u8(vceqq_u8(v, vc), vceqq_u8(v, vg));
        // At most 16 lanes of 1, so the horizontal add cannot overflow u8.
        gc += vaddvq_u8(vandq_u8(hits, ones)) as u64;
        i += 16;
    }

    for &b in &seq[i..] {
        if matches!(b & 0xDF, b'C' | b'G') {
            gc += 1;
        }
    }

    gc
}
