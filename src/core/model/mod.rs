pub const SAMPLE_COLUMN: &str = "SampleName";

/// Assembly features computed for one sample.
///
/// `n90` and `l90` are 0 when the table was loaded from a standard-layout
/// report, which does not carry them; see [`SampleTable::schema`].
#[derive(Clone, Debug, PartialEq)]
pub struct SampleMetrics {
    pub name: String,
    pub total_length: u64,
    pub num_contigs: u64,
    pub longest_contig: u64,
    pub n50: u64,
    pub n75: u64,
    pub n90: u64,
    pub l50: u64,
    pub l75: u64,
    pub l90: u64,
    pub gc_percent: f64,
}

impl SampleMetrics {
    pub fn feature(&self, feature: Feature) -> f64 {
        match feature {
            Feature::TotalLength => self.total_length as f64,
            Feature::NumContigs => self.num_contigs as f64,
            Feature::LongestContig => self.longest_contig as f64,
            Feature::N50 => self.n50 as f64,
            Feature::N75 => self.n75 as f64,
            Feature::N90 => self.n90 as f64,
            Feature::L50 => self.l50 as f64,
            Feature::L75 => self.l75 as f64,
            Feature::L90 => self.l90 as f64,
            Feature::GcPercent => self.gc_percent,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Feature {
    TotalLength,
    NumContigs,
    LongestContig,
    N50,
    N75,
    N90,
    L50,
    L75,
    L90,
    GcPercent,
}

impl Feature {
    pub fn column(self) -> &'static str {
        match self {
            Feature::TotalLength => "TotalLength",
            Feature::NumContigs => "NumContigs",
            Feature::LongestContig => "LongestContig",
            Feature::N50 => "N50",
            Feature::N75 => "N75",
            Feature::N90 => "N90",
            Feature::L50 => "L50",
            Feature::L75 => "L75",
            Feature::L90 => "L90",
            Feature::GcPercent => "GC%",
        }
    }
}

const STANDARD_FEATURES: [Feature; 8] = [
    Feature::TotalLength,
    Feature::NumContigs,
    Feature::LongestContig,
    Feature::N50,
    Feature::N75,
    Feature::L50,
    Feature::L75,
    Feature::GcPercent,
];

const EXTENDED_FEATURES: [Feature; 10] = [
    Feature::TotalLength,
    Feature::NumContigs,
    Feature::LongestContig,
    Feature::N50,
    Feature::N75,
    Feature::L50,
    Feature::L75,
    Feature::N90,
    Feature::L90,
    Feature::GcPercent,
];

/// Named, ordered feature columns handed to the classifier.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum FeatureSchema {
    #[default]
    Standard,
    /// Standard plus N90 and L90.
    Extended,
}

impl FeatureSchema {
    pub fn features(self) -> &'static [Feature] {
        match self {
            FeatureSchema::Standard => &STANDARD_FEATURES,
            FeatureSchema::Extended => &EXTENDED_FEATURES,
        }
    }

    /// Report header line, without the trailing newline.
    pub fn header(self) -> String {
        let mut header = String::from(SAMPLE_COLUMN);
        for feature in self.features() {
            header.push(',');
            header.push_str(feature.column());
        }
        header
    }

    pub fn from_header(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        [FeatureSchema::Standard, FeatureSchema::Extended]
            .into_iter()
            .find(|schema| schema.header() == line)
    }

    /// True when every feature of `other` is present in `self`.
    pub fn covers(self, other: FeatureSchema) -> bool {
        other.features().iter().all(|f| self.features().contains(f))
    }
}

/// Per-sample metrics in discovery order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SampleTable {
    schema: FeatureSchema,
    samples: Vec<SampleMetrics>,
}

impl SampleTable {
    pub fn new(schema: FeatureSchema, samples: Vec<SampleMetrics>) -> Self {
        Self { schema, samples }
    }

    /// Features that hold real values in this table.
    pub fn schema(&self) -> FeatureSchema {
        self.schema
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SampleMetrics> {
        self.samples.iter()
    }

    pub fn get(&self, name: &str) -> Option<&SampleMetrics> {
        self.samples.iter().find(|s| s.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.samples.iter().map(|s| s.name.as_str())
    }

    /// One row per sample with the features of `schema`, in schema order.
    /// `None` when this table does not carry every feature of `schema`.
    pub fn feature_matrix(&self, schema: FeatureSchema) -> Option<Vec<Vec<f64>>> {
        if !self.schema.covers(schema) {
            return None;
        }
        Some(
            self.samples
                .iter()
                .map(|s| schema.features().iter().map(|&f| s.feature(f)).collect())
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a SampleTable {
    type Item = &'a SampleMetrics;
    type IntoIter = std::slice::Iter<'a, SampleMetrics>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
