//! N- and L-statistics over a descending contig length list.

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Threshold {
    Half,
    ThreeQuarters,
    NinetyPercent,
}

impl Threshold {
    pub const ALL: [Threshold; 3] = [
        Threshold::Half,
        Threshold::ThreeQuarters,
        Threshold::NinetyPercent,
    ];

    /// Threshold as an exact fraction `(num, den)`.
    pub fn fraction(self) -> (u128, u128) {
        match self {
            Threshold::Half => (1, 2),
            Threshold::ThreeQuarters => (3, 4),
            Threshold::NinetyPercent => (9, 10),
        }
    }

    fn reached(self, acc: u64, total: u64) -> bool {
        let (num, den) = self.fraction();
        acc as u128 * den >= total as u128 * num
    }
}

/// N-value and L-value at one threshold.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct NxLx {
    pub n: u64,
    pub l: u64,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct AssemblyMetrics {
    pub n50: u64,
    pub n75: u64,
    pub n90: u64,
    pub l50: u64,
    pub l75: u64,
    pub l90: u64,
}

/// Walks `lengths` (must be sorted descending) until the running sum reaches
/// the threshold fraction of `total`. An empty list yields zeros.
pub fn nx_lx(lengths: &[u64], total: u64, threshold: Threshold) -> NxLx {
    let mut acc = 0u64;
    for (i, &len) in lengths.iter().enumerate() {
        acc += len;
        if threshold.reached(acc, total) {
            return NxLx {
                n: len,
                l: i as u64 + 1,
            };
        }
    }
    // Only reachable when `total` exceeds the sum of `lengths`.
    match lengths.last() {
        Some(&len) => NxLx {
            n: len,
            l: lengths.len() as u64,
        },
        None => NxLx::default(),
    }
}

/// All three thresholds in a single pass.
pub fn assembly_metrics(lengths: &[u64], total: u64) -> AssemblyMetrics {
    debug_assert!(lengths.windows(2).all(|w| w[0] >= w[1]));
    let mut out = [NxLx::default(); 3];
    let mut next = 0usize;
    let mut acc = 0u64;
    for (i, &len) in lengths.iter().enumerate() {
        acc += len;
        while next < Threshold::ALL.len() && Threshold::ALL[next].reached(acc, total) {
            out[next] = NxLx {
                n: len,
                l: i as u64 + 1,
            };
            next += 1;
        }
        if next == Threshold::ALL.len() {
            break;
        }
    }
    for (slot, threshold) in out.iter_mut().zip(Threshold::ALL).skip(next) {
        *slot = nx_lx(lengths, total, threshold);
    }
    AssemblyMetrics {
        n50: out[0].n,
        n75: out[1].n,
        n90: out[2].n,
        l50: out[0].l,
        l75: out[1].l,
        l90: out[2].l,
    }
}
