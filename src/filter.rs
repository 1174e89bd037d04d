use noodles::vcf;

use crate::classify::correct_filter;
use crate::engine::RecordProcessor;
use crate::error::Result;
use crate::reader::header::ensure_format;
use crate::reader::record::{FILTER_KEY, GENOTYPE_KEY, Record};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FilterReport {
    pub records: u64,
    pub filters_set: u64,
    pub genotypes_cleared: u64,
}

/// Fills in undecided per-sample FT values from genotype and depth.
pub struct DepthFilter {
    header: vcf::Header,
    min_depth: i32,
    report: FilterReport,
}

impl DepthFilter {
    pub fn new(header: &vcf::Header, min_depth: i32) -> Self {
        let mut header = header.clone();
        ensure_format(&mut header, FILTER_KEY);
        Self {
            header,
            min_depth,
            report: FilterReport::default(),
        }
    }

    pub fn header(&self) -> &vcf::Header {
        &self.header
    }
}

impl RecordProcessor for DepthFilter {
    type Row = ();
    type Report = FilterReport;

    fn step(&mut self, record: &mut Record) -> Result<Option<()>> {
        self.report.records += 1;
        let mut filters = Vec::new();
        let mut genotypes = Vec::new();
        for (sample, call) in record.calls().into_iter().enumerate() {
            let corrected = correct_filter(&call, self.min_depth);
            if call.filter.as_deref() != Some(corrected.filter.as_str()) {
                filters.push((sample, corrected.filter));
            }
            if corrected.genotype != call.genotype {
                genotypes.push((sample, corrected.genotype.to_string()));
            }
        }
        self.report.filters_set += filters.len() as u64;
        self.report.genotypes_cleared += genotypes.len() as u64;
        record.set_sample_values(FILTER_KEY, &filters);
        record.set_sample_values(GENOTYPE_KEY, &genotypes);
        Ok(Some(()))
    }

    fn finish(self) -> FilterReport {
        self.report
    }
}
