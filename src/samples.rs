use crate::engine::RecordProcessor;
use crate::error::Result;
use crate::model::{SampleCall, Zygosity, ratio};
use crate::nucleotide::{Base, Substitution};
use crate::reader::record::Record;

/// Depths outside this window are treated as caller errors and ignored.
pub const MIN_COVERAGE: i32 = 0;
pub const MAX_COVERAGE: i32 = 1000;

/// Which calls count towards zygosity and ti/tv, fixed for a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterPolicy {
    #[default]
    PassOnly,
    FailOnly,
    Both,
}

impl FilterPolicy {
    pub fn includes(self, passing: bool) -> bool {
        match self {
            FilterPolicy::PassOnly => passing,
            FilterPolicy::FailOnly => !passing,
            FilterPolicy::Both => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SampleConfig {
    pub policy: FilterPolicy,
    /// Indel data has no single-base substitutions, so ti/tv is skipped.
    pub indel: bool,
}

/// Running totals of one sample across the stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SampleBucket {
    pub genotypes_with_depth: u64,
    pub passing_variants: u64,
    pub ref_calls: u64,
    pub het: u64,
    pub var: u64,
    pub missing: u64,
    pub transitions: u64,
    pub transversions: u64,
    pub total_coverage: u64,
}

impl SampleBucket {
    pub fn add_depth(&mut self, depth: Option<i32>) {
        if let Some(depth) = depth
            && (MIN_COVERAGE..=MAX_COVERAGE).contains(&depth)
        {
            self.total_coverage += depth as u64;
            self.genotypes_with_depth += 1;
        }
    }

    pub fn add_substitution(&mut self, substitution: Option<Substitution>) {
        match substitution {
            Some(Substitution::Transition) => self.transitions += 1,
            Some(Substitution::Transversion) => self.transversions += 1,
            None => {}
        }
    }
}

/// Per-sample summary at the end of the stream.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRow {
    pub sample: String,
    pub bucket: SampleBucket,
    pub n_sites: u64,
}

impl SampleRow {
    pub fn variant_count(&self) -> u64 {
        self.bucket.het + self.bucket.var
    }

    pub fn ti_tv_ratio(&self) -> f64 {
        ratio(self.bucket.transitions, self.bucket.transversions)
    }

    pub fn het_hom_ratio(&self) -> f64 {
        ratio(self.bucket.het, self.bucket.var)
    }

    pub fn missing_rate(&self) -> f64 {
        ratio(self.bucket.missing, self.n_sites)
    }

    pub fn average_coverage(&self) -> f64 {
        ratio(self.bucket.total_coverage, self.bucket.genotypes_with_depth)
    }
}

/// Accumulates one [`SampleBucket`] per sample.
pub struct SampleSummary {
    samples: Vec<String>,
    config: SampleConfig,
    buckets: Vec<SampleBucket>,
    n_sites: u64,
}

impl SampleSummary {
    pub fn new(config: SampleConfig, samples: &[String]) -> Self {
        Self {
            samples: samples.to_vec(),
            config,
            buckets: vec![SampleBucket::default(); samples.len()],
            n_sites: 0,
        }
    }

    fn observe(&mut self, sample: usize, call: &SampleCall, record: &Record, ref_base: Option<Base>) {
        let config = self.config;
        let bucket = &mut self.buckets[sample];
        bucket.add_depth(call.depth);

        let passing = call.filter_category().is_passing();
        if !config.policy.includes(passing) {
            return;
        }

        // Non-reference allele copies that take part in ti/tv
        let (first, second) = (call.genotype.first, call.genotype.second);
        let zygosity = call.genotype.zygosity();
        let observed: [Option<u32>; 2] = match zygosity {
            Zygosity::HomRef => {
                bucket.ref_calls += 1;
                [None, None]
            }
            Zygosity::Missing => {
                bucket.missing += 1;
                [None, None]
            }
            Zygosity::Het => {
                bucket.het += 1;
                if second == Some(0) {
                    [first, None]
                } else {
                    [second, None]
                }
            }
            Zygosity::HomVar => {
                bucket.var += 1;
                [first, second]
            }
        };

        if passing && matches!(zygosity, Zygosity::Het | Zygosity::HomVar) {
            bucket.passing_variants += 1;
        }
        if config.indel {
            return;
        }
        for allele in observed.into_iter().flatten() {
            let alt_base = record.allele(allele).and_then(Base::from_allele);
            let substitution = ref_base
                .zip(alt_base)
                .and_then(|(r, a)| Substitution::between(r, a));
            bucket.add_substitution(substitution);
        }
    }
}

impl RecordProcessor for SampleSummary {
    type Row = ();
    type Report = Vec<SampleRow>;

    fn step(&mut self, record: &mut Record) -> Result<Option<()>> {
        self.n_sites += 1;
        let ref_base = Base::from_allele(record.reference());
        for (sample, call) in record.calls().iter().enumerate() {
            self.observe(sample, call, record, ref_base);
        }
        Ok(None)
    }

    fn finish(self) -> Vec<SampleRow> {
        let n_sites = self.n_sites;
        self.samples
            .into_iter()
            .zip(self.buckets)
            .map(|(sample, bucket)| SampleRow {
                sample,
                bucket,
                n_sites,
            })
            .collect()
    }
}
