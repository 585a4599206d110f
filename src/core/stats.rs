use crate::core::assembly;
use crate::core::fasta::Contig;
use crate::core::model::SampleMetrics;
use crate::simd;

/// Length and composition summary of one sample's contigs.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ContigStats {
    /// Contig lengths, longest first.
    pub lengths: Vec<u64>,
    pub total_length: u64,
    pub gc_bases: u64,
}

impl ContigStats {
    pub fn from_contigs(contigs: &[Contig]) -> Self {
        let mut lengths: Vec<u64> = contigs.iter().map(|c| c.len() as u64).collect();
        lengths.sort_by(|a, b| b.cmp(a));
        let total_length = lengths.iter().sum();
        let gc_bases = contigs.iter().map(|c| simd::count_gc(&c.seq)).sum();
        Self {
            lengths,
            total_length,
            gc_bases,
        }
    }

    pub fn num_contigs(&self) -> u64 {
        self.lengths.len() as u64
    }

    /// 0 when the sample has no contigs.
    pub fn longest_contig(&self) -> u64 {
        self.lengths.first().copied().unwrap_or(0)
    }

    pub fn gc_percent(&self) -> f64 {
        gc_percent(self.gc_bases, self.total_length)
    }
}

/// GC share of `total` symbols as a percentage with two decimals.
/// Rounds half away from zero; no symbols gives 0.0.
pub fn gc_percent(gc_bases: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_two_decimals(gc_bases as f64 * 100.0 / total as f64)
}

pub fn round_two_decimals(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn sample_metrics(name: &str, contigs: &[Contig]) -> SampleMetrics {
    let stats = ContigStats::from_contigs(contigs);
    if stats.lengths.is_empty() {
        log::warn!("sample {} has no contigs; metrics are zero-filled", name);
    }
    let asm = assembly::assembly_metrics(&stats.lengths, stats.total_length);
    SampleMetrics {
        name: name.to_string(),
        total_length: stats.total_length,
        num_contigs: stats.num_contigs(),
        longest_contig: stats.longest_contig(),
        n50: asm.n50,
        n75: asm.n75,
        n90: asm.n90,
        l50: asm.l50,
        l75: asm.l75,
        l90: asm.l90,
        gc_percent: stats.gc_percent(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contig(name: &str, seq: &str) -> Contig {
        Contig {
            name: name.to_string(),
            seq: seq.as_bytes().to_vec(),
        }
    }

    fn of_lengths(lengths: &[usize]) -> Vec<Contig> {
        lengths
            .iter()
            .enumerate()
            .map(|(i, &len)| contig(&format!("c{i}"), &"ACGT".repeat(len / 4 + 1)[..len]))
            .collect()
    }

    #[test]
    fn lengths_sorted_descending_and_summed() {
        let stats = ContigStats::from_contigs(&of_lengths(&[8, 40, 15]));
        assert_eq!(stats.lengths, vec![40, 15, 8]);
        assert_eq!(stats.total_length, 63);
        assert_eq!(stats.num_contigs(), 3);
        assert_eq!(stats.longest_contig(), 40);
    }

    #[test]
    fn no_contigs_are_zero_filled() {
        let m = sample_metrics("empty", &[]);
        assert_eq!(m.total_length, 0);
        assert_eq!(m.num_contigs, 0);
        assert_eq!(m.longest_contig, 0);
        assert_eq!((m.n50, m.n75, m.n90, m.l50, m.l75, m.l90), (0, 0, 0, 0, 0, 0));
        assert_eq!(m.gc_percent, 0.0);
    }

    #[test]
    fn gc_fixtures_are_exact() {
        assert_eq!(ContigStats::from_contigs(&[contig("a", "ACGT")]).gc_percent(), 50.0);
        assert_eq!(ContigStats::from_contigs(&[contig("a", "AATC")]).gc_percent(), 25.0);
        assert_eq!(ContigStats::from_contigs(&[contig("a", "GGCA")]).gc_percent(), 75.0);
    }

    #[test]
    fn gc_spans_all_contigs_and_ignores_case() {
        let upper = ContigStats::from_contigs(&[contig("a", "GGGG"), contig("b", "AAAATTTT")]);
        let lower = ContigStats::from_contigs(&[contig("a", "gggg"), contig("b", "aaaatttt")]);
        assert_eq!(upper.gc_percent(), 33.33);
        assert_eq!(upper, lower);
    }

    #[test]
    fn gc_counts_n_in_denominator() {
        assert_eq!(gc_percent(1, 8), 12.5);
        assert_eq!(ContigStats::from_contigs(&[contig("a", "GCNN")]).gc_percent(), 50.0);
    }

    #[test]
    fn rounding_goes_half_away_from_zero() {
        assert_eq!(gc_percent(2, 3), 66.67);
        assert_eq!(gc_percent(1, 800), 0.13);
        assert_eq!(round_two_decimals(12.344), 12.34);
    }

    #[test]
    fn longest_contig_matches_max() {
        let contigs = of_lengths(&[3, 99, 0, 12, 99]);
        let m = sample_metrics("s", &contigs);
        assert_eq!(m.longest_contig, contigs.iter().map(|c| c.len() as u64).max().unwrap());
        assert_eq!(m.total_length, 213);
    }
}
