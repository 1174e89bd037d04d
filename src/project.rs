//! Projections of per-record classifications: count annotations written back
//! into the record, and numeric dosages for matrix export.

use log::warn;
use noodles::vcf::{
    self,
    header::record::value::{
        Map,
        map::{
            Info,
            info::{Number, Type},
        },
    },
};

use crate::bucket::CountTable;
use crate::classify::CategoryKey;
use crate::engine::RecordProcessor;
use crate::error::{CustomError, Result};
use crate::model::{SampleCall, Zygosity};
use crate::reader::header::declare_info;
use crate::reader::record::Record;

/// INFO declarations for every possible count cell of an `n_samples` set.
pub fn count_schema(n_samples: usize) -> Vec<(String, Map<Info>)> {
    CategoryKey::all()
        .map(|key| {
            let description = format!(
                "Count of samples w/filter {} and genotype {}/{} in {}-sample set",
                key.filter.label(),
                key.first.label(),
                key.second.label(),
                n_samples
            );
            (
                key.annotation_id(n_samples),
                Map::<Info>::new(Number::Unknown, Type::Integer, description),
            )
        })
        .collect()
}

/// Key/value pairs for the non-zero cells of `table`.
pub fn count_annotations(table: &CountTable, n_samples: usize) -> Vec<(String, u32)> {
    table
        .nonzero()
        .map(|(key, count)| (key.annotation_id(n_samples), count))
        .collect()
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AnnotateReport {
    pub records: u64,
    pub skipped: u64,
}

/// Attaches FT/GT combination counts to every record.
pub struct CountAnnotator {
    header: vcf::Header,
    n_samples: usize,
    report: AnnotateReport,
}

impl CountAnnotator {
    /// Declares the full key space up front; failing to do so aborts the run.
    pub fn new(header: &vcf::Header) -> Result<Self> {
        let n_samples = header.sample_names().len();
        let mut header = header.clone();
        for (id, definition) in count_schema(n_samples) {
            declare_info(&mut header, &id, definition)?;
        }
        Ok(Self {
            header,
            n_samples,
            report: AnnotateReport::default(),
        })
    }

    pub fn header(&self) -> &vcf::Header {
        &self.header
    }
}

impl RecordProcessor for CountAnnotator {
    type Row = ();
    type Report = AnnotateReport;

    fn step(&mut self, record: &mut Record) -> Result<Option<()>> {
        self.report.records += 1;
        let table = match CountTable::from_calls(&record.calls()) {
            Ok(table) => table,
            Err(CustomError::AlleleOutOfRange { allele, max }) => {
                warn!(
                    "{}:{} has allele index {} (max {}); writing it without counts",
                    record.chrom(),
                    record.pos(),
                    allele,
                    max
                );
                self.report.skipped += 1;
                return Ok(Some(()));
            }
            Err(e) => return Err(e),
        };
        debug_assert_eq!(table.total(), self.n_samples as u64);

        for (id, count) in count_annotations(&table, self.n_samples) {
            let count = i32::try_from(count).unwrap_or(i32::MAX);
            record.set_info(&self.header, &id, count)?;
        }
        Ok(Some(()))
    }

    fn finish(self) -> AnnotateReport {
        self.report
    }
}

/// Single-number encoding of a call for matrix export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dosage {
    Unusable,
    HomRef,
    Het,
    HomVar,
}

impl Dosage {
    pub fn from_call(call: &SampleCall) -> Self {
        if !call.filter_category().is_passing() {
            return Dosage::Unusable;
        }
        match call.genotype.zygosity() {
            Zygosity::HomRef => Dosage::HomRef,
            Zygosity::Het => Dosage::Het,
            Zygosity::HomVar => Dosage::HomVar,
            Zygosity::Missing => Dosage::Unusable,
        }
    }

    pub fn value(self) -> f32 {
        match self {
            Dosage::Unusable => -10.0,
            Dosage::HomRef => 0.0,
            Dosage::Het => 0.5,
            Dosage::HomVar => 1.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Dosage::Unusable => "-10",
            Dosage::HomRef => "0",
            Dosage::Het => "0.5",
            Dosage::HomVar => "1",
        }
    }
}

/// Emits one dosage per sample per record, in header sample order.
pub struct DosageExporter {
    records: u64,
}

impl DosageExporter {
    pub fn new() -> Self {
        Self { records: 0 }
    }
}

impl RecordProcessor for DosageExporter {
    type Row = Vec<Dosage>;
    type Report = u64;

    fn step(&mut self, record: &mut Record) -> Result<Option<Vec<Dosage>>> {
        self.records += 1;
        Ok(Some(record.calls().iter().map(Dosage::from_call).collect()))
    }

    fn finish(self) -> u64 {
        self.records
    }
}
