use log::warn;

use crate::bucket::{SiteSummary, ZygosityCounts};
use crate::engine::RecordProcessor;
use crate::error::Result;
use crate::model::ratio;
use crate::reader::record::Record;

/// One output row per record.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantRow {
    pub chrom: String,
    pub pos: u64,
    pub zygosity: ZygosityCounts,
    /// `None` when the record has no observed alleles.
    pub minor_allele_freq: Option<f64>,
    pub is_monomorphic: bool,
}

/// Totals across every sample and record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SiteTotals {
    pub n_samples: usize,
    pub total_sites: u64,
    pub zygosity: ZygosityCounts,
    pub monomorphic_sites: u64,
}

impl SiteTotals {
    pub fn het_hom_ratio(&self) -> f64 {
        let z = &self.zygosity;
        ratio(z.pass_het + z.fail_het, z.pass_hom + z.fail_hom)
    }

    pub fn pass_het_hom_ratio(&self) -> f64 {
        ratio(self.zygosity.pass_het, self.zygosity.pass_hom)
    }

    pub fn fail_het_hom_ratio(&self) -> f64 {
        ratio(self.zygosity.fail_het, self.zygosity.fail_hom)
    }
}

pub struct VariantSummary {
    totals: SiteTotals,
    out_of_range_alleles: u64,
}

impl VariantSummary {
    pub fn new(samples: &[String]) -> Self {
        Self {
            totals: SiteTotals {
                n_samples: samples.len(),
                ..SiteTotals::default()
            },
            out_of_range_alleles: 0,
        }
    }
}

impl RecordProcessor for VariantSummary {
    type Row = VariantRow;
    type Report = SiteTotals;

    fn step(&mut self, record: &mut Record) -> Result<Option<VariantRow>> {
        let summary = SiteSummary::from_calls(&record.calls());
        let out_of_range = summary.alleles.out_of_range();
        if out_of_range > 0 {
            warn!(
                "{}:{} has {} allele(s) with index too large to count; treating those calls as missing",
                record.chrom(),
                record.pos(),
                out_of_range
            );
            self.out_of_range_alleles += out_of_range as u64;
        }

        debug_assert_eq!(summary.zygosity.total(), record.n_samples() as u64);
        let is_monomorphic = summary.is_monomorphic();
        self.totals.total_sites += 1;
        self.totals.zygosity.merge(&summary.zygosity);
        if is_monomorphic {
            self.totals.monomorphic_sites += 1;
        }

        Ok(Some(VariantRow {
            chrom: record.chrom().to_string(),
            pos: record.pos(),
            zygosity: summary.zygosity,
            minor_allele_freq: summary.minor_allele_freq(),
            is_monomorphic,
        }))
    }

    fn finish(self) -> SiteTotals {
        if self.out_of_range_alleles > 0 {
            warn!(
                "{} allele observation(s) were out of range in total",
                self.out_of_range_alleles
            );
        }
        self.totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::testing::read_records;

    fn run(lines: &[&str], n_samples: usize) -> (Vec<VariantRow>, SiteTotals) {
        let samples: Vec<String> = (1..=n_samples).map(|i| format!("S{i}")).collect();
        let mut summary = VariantSummary::new(&samples);
        let mut rows = Vec::new();
        let (_, records) = read_records(n_samples, lines);
        for mut record in records {
            rows.push(summary.step(&mut record).unwrap().unwrap());
        }
        (rows, summary.finish())
    }

    #[test]
    fn rows_and_totals() {
        let (rows, totals) = run(
            &[
                "chr2\t100\t.\tA\tG\t.\t.\t.\tGT:FT\t1/1:PASS\t1/1:No_var\t./.:No_data",
                "chr2\t200\t.\tA\tG\t.\t.\t.\tGT:FT\t0/1:PASS\t0/0:Bad\t1/1:Bad",
            ],
            3,
        );

        assert_eq!(rows[0].chrom, "chr2");
        assert_eq!(rows[0].pos, 100);
        assert!(rows[0].is_monomorphic);
        assert_eq!(rows[0].minor_allele_freq, Some(1.0));
        assert_eq!(rows[0].zygosity.pass_hom, 2);
        assert_eq!(rows[0].zygosity.missing, 1);

        assert!(!rows[1].is_monomorphic);
        assert_eq!(rows[1].minor_allele_freq, Some(0.5));
        assert_eq!(rows[1].zygosity.pass_het, 1);
        assert_eq!(rows[1].zygosity.fail_ref, 1);
        assert_eq!(rows[1].zygosity.fail_hom, 1);

        assert_eq!(totals.n_samples, 3);
        assert_eq!(totals.total_sites, 2);
        assert_eq!(totals.monomorphic_sites, 1);
        assert_eq!(totals.zygosity.pass_hom, 2);
        assert_eq!(totals.zygosity.missing, 1);
        assert_eq!(totals.het_hom_ratio(), 1.0 / 3.0);
        assert_eq!(totals.pass_het_hom_ratio(), 0.5);
        assert_eq!(totals.fail_het_hom_ratio(), 0.0);
    }

    #[test]
    fn reference_only_site_has_zero_frequency() {
        let (rows, _) = run(
            &[
                "1\t10\t.\tA\tG\t.\t.\t.\tGT:FT\t0/0:PASS\t0/0:PASS",
                "1\t20\t.\tA\tG\t.\t.\t.\tGT:FT\t./.:PASS\t./.:PASS",
            ],
            2,
        );
        assert_eq!(rows[0].minor_allele_freq, Some(0.0));
        assert_eq!(rows[0].zygosity.pass_ref, 2);
        assert_eq!(rows[1].minor_allele_freq, None);
        assert_eq!(rows[1].zygosity.missing, 2);
    }

    #[test]
    fn empty_stream_has_undefined_ratios() {
        let (rows, totals) = run(&[], 2);
        assert!(rows.is_empty());
        assert_eq!(totals.total_sites, 0);
        assert!(totals.het_hom_ratio().is_nan());
        assert!(totals.pass_het_hom_ratio().is_nan());
    }
}
