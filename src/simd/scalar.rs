pub fn count_gc(seq: &[u8]) -> u64 {
    let mut gc = 0u64;
    for &b in seq {
        if matches!(b & 0xDF, b'C' | b'G') {
            gc += 1;
        }
    }
    gc
}
