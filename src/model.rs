use crate::error::{CustomError, Result};

/// Per-sample quality decision, derived from the FT text.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterCategory {
    Pass = 0,
    Fail = 1,
    NoVariant = 2,
    NoData = 3,
    NoFilter = 4,
}

impl FilterCategory {
    pub const ALL: [FilterCategory; 5] = [
        FilterCategory::Pass,
        FilterCategory::Fail,
        FilterCategory::NoVariant,
        FilterCategory::NoData,
        FilterCategory::NoFilter,
    ];

    /// Exact match against the known FT values; anything else fails.
    pub fn from_text(text: &str) -> Self {
        match text {
            "PASS" => FilterCategory::Pass,
            "No_var" => FilterCategory::NoVariant,
            "No_data" => FilterCategory::NoData,
            "." => FilterCategory::NoFilter,
            _ => FilterCategory::Fail,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FilterCategory::Pass => "PASS",
            FilterCategory::Fail => "FAIL",
            FilterCategory::NoVariant => "NVAR",
            FilterCategory::NoData => "NDAT",
            FilterCategory::NoFilter => "NFLT",
        }
    }

    /// `PASS` and `No_var` both count as usable calls.
    pub fn is_passing(self) -> bool {
        matches!(self, FilterCategory::Pass | FilterCategory::NoVariant)
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Category of a single allele of a genotype call.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenotypeCategory {
    Missing = 0,
    Allele0 = 1,
    Allele1 = 2,
    Allele2 = 3,
    Allele3 = 4,
}

impl GenotypeCategory {
    pub const ALL: [GenotypeCategory; 5] = [
        GenotypeCategory::Missing,
        GenotypeCategory::Allele0,
        GenotypeCategory::Allele1,
        GenotypeCategory::Allele2,
        GenotypeCategory::Allele3,
    ];

    pub const MAX_ALLELE: u32 = 3;

    pub fn from_allele(allele: Option<u32>) -> Result<Self> {
        match allele {
            None => Ok(GenotypeCategory::Missing),
            Some(0) => Ok(GenotypeCategory::Allele0),
            Some(1) => Ok(GenotypeCategory::Allele1),
            Some(2) => Ok(GenotypeCategory::Allele2),
            Some(3) => Ok(GenotypeCategory::Allele3),
            Some(allele) => Err(CustomError::AlleleOutOfRange {
                allele,
                max: Self::MAX_ALLELE,
            }),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GenotypeCategory::Missing => ".",
            GenotypeCategory::Allele0 => "0",
            GenotypeCategory::Allele1 => "1",
            GenotypeCategory::Allele2 => "2",
            GenotypeCategory::Allele3 => "3",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zygosity {
    HomRef,
    Het,
    HomVar,
    Missing,
}

/// A diploid call as two optional allele indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Genotype {
    pub first: Option<u32>,
    pub second: Option<u32>,
}

impl Genotype {
    pub const MISSING: Genotype = Genotype {
        first: None,
        second: None,
    };

    pub fn new(first: Option<u32>, second: Option<u32>) -> Self {
        Self { first, second }
    }

    /// Parses a GT value such as `0/1`, `1|1`, `./.` or `1`.
    ///
    /// Unparsable allele tokens read as missing; haploid calls have a missing
    /// second allele and only the first two alleles of a polyploid call are kept.
    pub fn parse(text: &str) -> Self {
        let mut alleles = text.split(['/', '|']).map(|token| token.parse::<u32>().ok());
        let first = alleles.next().flatten();
        let second = alleles.next().flatten();
        Self { first, second }
    }

    pub fn zygosity(self) -> Zygosity {
        match (self.first, self.second) {
            (Some(0), Some(0)) => Zygosity::HomRef,
            (Some(a), Some(b)) if a != b => Zygosity::Het,
            (Some(_), Some(_)) => Zygosity::HomVar,
            _ => Zygosity::Missing,
        }
    }

    pub fn alleles(self) -> impl Iterator<Item = u32> {
        self.first.into_iter().chain(self.second)
    }
}

impl std::fmt::Display for Genotype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let token = |allele: Option<u32>| match allele {
            Some(a) => a.to_string(),
            None => ".".to_string(),
        };
        write!(f, "{}/{}", token(self.first), token(self.second))
    }
}

/// One sample's raw fields at one record.
///
/// `filter` is `None` when the record carries no FT field at all, and `depth`
/// is `None` when DP is absent or unavailable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleCall {
    pub genotype: Genotype,
    pub filter: Option<String>,
    pub depth: Option<i32>,
}

impl SampleCall {
    pub fn new(genotype: Genotype, filter: Option<&str>, depth: Option<i32>) -> Self {
        Self {
            genotype,
            filter: filter.map(str::to_string),
            depth,
        }
    }

    pub fn filter_category(&self) -> FilterCategory {
        match self.filter.as_deref() {
            Some(text) => FilterCategory::from_text(text),
            None => FilterCategory::NoData,
        }
    }
}

/// Counting ratio; `NaN` when the denominator is zero.
pub fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        f64::NAN
    } else {
        numerator as f64 / denominator as f64
    }
}
