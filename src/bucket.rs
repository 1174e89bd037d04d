//! Per-record scratch tables. Everything here is built fresh for one record and
//! dropped once that record has been processed.

use crate::classify::{CategoryKey, classify};
use crate::error::Result;
use crate::model::{FilterCategory, GenotypeCategory, SampleCall, Zygosity};

const N_FILTER: usize = FilterCategory::ALL.len();
const N_GENOTYPE: usize = GenotypeCategory::ALL.len();

/// Sample counts per (filter, allele, allele) category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountTable {
    cells: [[[u32; N_GENOTYPE]; N_GENOTYPE]; N_FILTER],
}

impl CountTable {
    pub fn new() -> Self {
        Self {
            cells: [[[0; N_GENOTYPE]; N_GENOTYPE]; N_FILTER],
        }
    }

    /// Classifies every call of one record. Fails without a partial table if
    /// any call carries an allele outside the category range.
    pub fn from_calls(calls: &[SampleCall]) -> Result<Self> {
        let mut table = Self::new();
        for call in calls {
            table.increment(classify(call)?);
        }
        Ok(table)
    }

    pub fn increment(&mut self, key: CategoryKey) {
        self.cells[key.filter.index()][key.first.index()][key.second.index()] += 1;
    }

    pub fn get(&self, key: CategoryKey) -> u32 {
        self.cells[key.filter.index()][key.first.index()][key.second.index()]
    }

    pub fn total(&self) -> u64 {
        self.cells.iter().flatten().flatten().map(|&n| n as u64).sum()
    }

    pub fn nonzero(&self) -> impl Iterator<Item = (CategoryKey, u32)> + '_ {
        CategoryKey::all()
            .map(|key| (key, self.get(key)))
            .filter(|&(_, count)| count != 0)
    }
}

impl Default for CountTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Allele observations across the samples of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlleleFrequencyTable {
    counts: [u32; Self::MAX_ALLELES],
    out_of_range: u32,
}

impl AlleleFrequencyTable {
    pub const MAX_ALLELES: usize = 256;

    pub fn new() -> Self {
        Self {
            counts: [0; Self::MAX_ALLELES],
            out_of_range: 0,
        }
    }

    /// Returns false, without counting, for an index past [`Self::MAX_ALLELES`].
    pub fn observe(&mut self, allele: u32) -> bool {
        match self.counts.get_mut(allele as usize) {
            Some(count) => {
                *count += 1;
                true
            }
            None => {
                self.out_of_range += 1;
                false
            }
        }
    }

    pub fn count(&self, allele: usize) -> u32 {
        self.counts.get(allele).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&n| n as u64).sum()
    }

    pub fn out_of_range(&self) -> u32 {
        self.out_of_range
    }

    /// True iff every observed allele is allele 1.
    pub fn is_monomorphic(&self) -> bool {
        self.count(0) == 0 && self.count(1) > 0 && self.counts[2..].iter().all(|&n| n == 0)
    }

    /// Share of allele 1 among all observed alleles; `None` when nothing was observed.
    pub fn alt_frequency(&self) -> Option<f64> {
        match self.total() {
            0 => None,
            total => Some(self.count(1) as f64 / total as f64),
        }
    }
}

impl Default for AlleleFrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Zygosity counts of one record, split by whether the call passed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZygosityCounts {
    pub pass_ref: u64,
    pub pass_het: u64,
    pub pass_hom: u64,
    pub fail_ref: u64,
    pub fail_het: u64,
    pub fail_hom: u64,
    pub missing: u64,
}

impl ZygosityCounts {
    pub fn add(&mut self, zygosity: Zygosity, passing: bool) {
        let slot = match (zygosity, passing) {
            (Zygosity::HomRef, true) => &mut self.pass_ref,
            (Zygosity::Het, true) => &mut self.pass_het,
            (Zygosity::HomVar, true) => &mut self.pass_hom,
            (Zygosity::HomRef, false) => &mut self.fail_ref,
            (Zygosity::Het, false) => &mut self.fail_het,
            (Zygosity::HomVar, false) => &mut self.fail_hom,
            (Zygosity::Missing, _) => &mut self.missing,
        };
        *slot += 1;
    }

    pub fn merge(&mut self, other: &Self) {
        self.pass_ref += other.pass_ref;
        self.pass_het += other.pass_het;
        self.pass_hom += other.pass_hom;
        self.fail_ref += other.fail_ref;
        self.fail_het += other.fail_het;
        self.fail_hom += other.fail_hom;
        self.missing += other.missing;
    }

    pub fn total(&self) -> u64 {
        self.pass_ref
            + self.pass_het
            + self.pass_hom
            + self.fail_ref
            + self.fail_het
            + self.fail_hom
            + self.missing
    }
}

/// Site-summary view of one record.
#[derive(Debug, Clone)]
pub struct SiteSummary {
    pub zygosity: ZygosityCounts,
    pub alleles: AlleleFrequencyTable,
}

impl SiteSummary {
    /// Alleles past [`AlleleFrequencyTable::MAX_ALLELES`] are left out of the
    /// allele table and the call counts as missing.
    pub fn from_calls(calls: &[SampleCall]) -> Self {
        let mut zygosity = ZygosityCounts::default();
        let mut alleles = AlleleFrequencyTable::new();
        for call in calls {
            let mut representable = true;
            for allele in call.genotype.alleles() {
                representable &= alleles.observe(allele);
            }
            let class = if representable {
                call.genotype.zygosity()
            } else {
                Zygosity::Missing
            };
            zygosity.add(class, call.filter_category().is_passing());
        }
        Self { zygosity, alleles }
    }

    pub fn is_monomorphic(&self) -> bool {
        self.alleles.is_monomorphic()
    }

    pub fn minor_allele_freq(&self) -> Option<f64> {
        self.alleles.alt_frequency()
    }
}
