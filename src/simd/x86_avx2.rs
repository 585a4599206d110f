#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
pub unsafe fn count_gc_avx2(seq: &[u8]) -> u64 {
    let mut gc = 0u64;
    let mut i = 0usize;
    let len = seq.len();

    let upper_mask = _mm256_set1_epi8(0xDFu8 as i8);
    let vc = _mm256_set1_epi8(b'C' as i8);
    let vg = _mm256_set1_epi8(b'G' as i8);

    while i + 32 <= len {
        let ptr = unsafe { seq.as_ptr().add(i) as *const __m256i };
        let mut v = unsafe { _mm256_loadu_si256(ptr) };
        v = _mm256_and_si256(v, upper_mask);
        let hits = _mm256_or_si256(_mm256_cmpeq_epi8(v, vc), _mm256_cmpeq_epi8(v, vg));
        gc += (_mm256_movemask_epi8(hits) as u32).count_ones() as u64;
        i += 32;
    }

    for &b in &seq[i..] {
        if matches!(b & 0xDF, b'C' | b'G') {
            gc += 1;
        }
    }

    gc
}
