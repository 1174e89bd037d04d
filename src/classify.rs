use crate::error::Result;
use crate::model::{FilterCategory, Genotype, GenotypeCategory, SampleCall};

/// One cell of the per-record count table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CategoryKey {
    pub filter: FilterCategory,
    pub first: GenotypeCategory,
    pub second: GenotypeCategory,
}

impl CategoryKey {
    pub fn new(filter: FilterCategory, first: GenotypeCategory, second: GenotypeCategory) -> Self {
        Self {
            filter,
            first,
            second,
        }
    }

    /// Every key, in filter-major order.
    pub fn all() -> impl Iterator<Item = CategoryKey> {
        itertools::iproduct!(
            FilterCategory::ALL,
            GenotypeCategory::ALL,
            GenotypeCategory::ALL
        )
        .map(|(filter, first, second)| CategoryKey::new(filter, first, second))
    }

    /// INFO field name, e.g. `PASS_01_3` for a 3-sample set.
    pub fn annotation_id(&self, n_samples: usize) -> String {
        format!(
            "{}_{}{}_{}",
            self.filter.label(),
            self.first.label(),
            self.second.label(),
            n_samples
        )
    }
}

/// Maps one sample's raw fields to its filter and genotype categories.
///
/// Fails only for allele indices above [`GenotypeCategory::MAX_ALLELE`].
pub fn classify(call: &SampleCall) -> Result<CategoryKey> {
    Ok(CategoryKey::new(
        call.filter_category(),
        GenotypeCategory::from_allele(call.genotype.first)?,
        GenotypeCategory::from_allele(call.genotype.second)?,
    ))
}

/// Result of the depth-based filter correction for one sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correction {
    pub filter: String,
    pub genotype: Genotype,
}

impl Correction {
    fn keep(filter: &str, genotype: Genotype) -> Self {
        Self {
            filter: filter.to_string(),
            genotype,
        }
    }
}

/// Decides a filter value for samples whose FT is still `.`.
///
/// Samples with an FT already decided are returned unchanged, so applying this
/// twice is the same as applying it once. An absent FT is treated as `.`.
pub fn correct_filter(call: &SampleCall, min_depth: i32) -> Correction {
    let genotype = call.genotype;
    match call.filter.as_deref() {
        Some(text) if text != "." => return Correction::keep(text, genotype),
        _ => {}
    }

    match (genotype.first, genotype.second) {
        (Some(0), Some(0)) => {
            // Unavailable depth cannot vouch for a reference call
            let covered = call.depth.is_some_and(|depth| depth >= min_depth);
            if covered {
                Correction::keep("No_var", genotype)
            } else {
                Correction::keep("No_data", Genotype::MISSING)
            }
        }
        (Some(_), Some(_)) => Correction::keep("PASS", genotype),
        (None, None) => Correction::keep("No_data", genotype),
        _ => Correction::keep(".", genotype),
    }
}
