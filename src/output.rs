use ndarray::Array2;
use ndarray_npy::NpzWriter;
use noodles::vcf::{self, variant::io::Write as _};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{CustomError, Result};
use crate::project::Dosage;
use crate::reader::record::Record;
use crate::samples::SampleRow;
use crate::sites::{SiteTotals, VariantRow};

pub const SAMPLE_SUMMARY_COLUMNS: [&str; 13] = [
    "sample",
    "variant_count",
    "passing_variant_count",
    "ti_tv_ratio",
    "homref",
    "hetvar",
    "homvar",
    "missing",
    "het_hom_ratio",
    "missing_rate",
    "average_coverage",
    "coverage_numerator",
    "coverage_denominator",
];

pub const VARIANT_SUMMARY_COLUMNS: [&str; 11] = [
    "chr",
    "pos",
    "pass_homref",
    "pass_hetvar",
    "pass_homvar",
    "fail_homref",
    "fail_hetvar",
    "fail_homvar",
    "missing",
    "minor_allele_freq",
    "is_monomorphic",
];

pub const VARIANT_TOTALS_COLUMNS: [&str; 12] = [
    "num_samples",
    "num_variant_sites",
    "pass_homref",
    "pass_hetvar",
    "pass_homvar",
    "fail_homref",
    "fail_hetvar",
    "fail_homvar",
    "het_hom_ratio",
    "pass_het_hom_ratio",
    "fail_het_hom_ratio",
    "monomorphic_sites",
];

/// Six decimals; an undefined ratio prints as `NaN`.
pub fn format_ratio(value: f64) -> String {
    format!("{value:.6}")
}

/// Plain-text VCF output sharing one header across every record.
pub struct VcfWriter {
    out: vcf::io::Writer<BufWriter<File>>,
    header: vcf::Header,
    path: PathBuf,
}

impl VcfWriter {
    pub fn create(path: &impl AsRef<Path>, header: &vcf::Header) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let f = File::create(&path).map_err(|e| CustomError::Write {
            source: e,
            path: path.clone(),
        })?;
        let mut writer = Self {
            out: vcf::io::Writer::new(BufWriter::new(f)),
            header: header.clone(),
            path,
        };
        let written = writer.out.write_header(&writer.header);
        writer.check(written)?;
        Ok(writer)
    }

    pub fn write_record(&mut self, record: &Record) -> Result<()> {
        let written = self
            .out
            .write_variant_record(&self.header, record.as_record_buf());
        self.check(written)
    }

    pub fn finish(mut self) -> Result<()> {
        let flushed = self.out.get_mut().flush();
        self.check(flushed)
    }

    fn check(&self, result: std::io::Result<()>) -> Result<()> {
        result.map_err(|e| CustomError::Write {
            source: e,
            path: self.path.clone(),
        })
    }
}

pub fn write_sample_summary(rows: &[SampleRow], path: &impl AsRef<Path>) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(SAMPLE_SUMMARY_COLUMNS)?;
    for row in rows {
        let b = &row.bucket;
        wtr.write_record([
            row.sample.clone(),
            row.variant_count().to_string(),
            b.passing_variants.to_string(),
            format_ratio(row.ti_tv_ratio()),
            b.ref_calls.to_string(),
            b.het.to_string(),
            b.var.to_string(),
            b.missing.to_string(),
            format_ratio(row.het_hom_ratio()),
            format_ratio(row.missing_rate()),
            format_ratio(row.average_coverage()),
            b.total_coverage.to_string(),
            b.genotypes_with_depth.to_string(),
        ])?;
    }
    wtr.flush().map_err(|e| CustomError::Write {
        source: e,
        path: path.as_ref().to_path_buf(),
    })?;
    Ok(())
}

pub struct VariantSummaryWriter {
    wtr: csv::Writer<File>,
    path: PathBuf,
}

impl VariantSummaryWriter {
    pub fn create(path: &impl AsRef<Path>) -> Result<Self> {
        let mut wtr = csv::Writer::from_path(path)?;
        wtr.write_record(VARIANT_SUMMARY_COLUMNS)?;
        Ok(Self {
            wtr,
            path: path.as_ref().to_path_buf(),
        })
    }

    pub fn write_row(&mut self, row: &VariantRow) -> Result<()> {
        self.wtr.write_record(variant_fields(row))?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<()> {
        self.wtr.flush().map_err(|e| CustomError::Write {
            source: e,
            path: self.path,
        })
    }
}

/// A site with no observed alleles prints its frequency as a bare `0`.
fn variant_fields(row: &VariantRow) -> [String; 11] {
    let z = &row.zygosity;
    let maf = row
        .minor_allele_freq
        .map_or_else(|| "0".to_string(), format_ratio);
    let monomorphic = if row.is_monomorphic { "True" } else { "False" };
    [
        row.chrom.clone(),
        row.pos.to_string(),
        z.pass_ref.to_string(),
        z.pass_het.to_string(),
        z.pass_hom.to_string(),
        z.fail_ref.to_string(),
        z.fail_het.to_string(),
        z.fail_hom.to_string(),
        z.missing.to_string(),
        maf,
        monomorphic.to_string(),
    ]
}

pub fn write_variant_totals(totals: &SiteTotals, path: &impl AsRef<Path>) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(VARIANT_TOTALS_COLUMNS)?;
    let z = &totals.zygosity;
    wtr.write_record([
        totals.n_samples.to_string(),
        totals.total_sites.to_string(),
        z.pass_ref.to_string(),
        z.pass_het.to_string(),
        z.pass_hom.to_string(),
        z.fail_ref.to_string(),
        z.fail_het.to_string(),
        z.fail_hom.to_string(),
        format_ratio(totals.het_hom_ratio()),
        format_ratio(totals.pass_het_hom_ratio()),
        format_ratio(totals.fail_het_hom_ratio()),
        totals.monomorphic_sites.to_string(),
    ])?;
    wtr.flush().map_err(|e| CustomError::Write {
        source: e,
        path: path.as_ref().to_path_buf(),
    })?;
    Ok(())
}

pub struct DosageCsvWriter {
    wtr: csv::Writer<File>,
    path: PathBuf,
}

impl DosageCsvWriter {
    pub fn create(path: &impl AsRef<Path>, samples: &[String]) -> Result<Self> {
        let mut wtr = csv::Writer::from_path(path)?;
        wtr.write_record(samples)?;
        Ok(Self {
            wtr,
            path: path.as_ref().to_path_buf(),
        })
    }

    pub fn write_row(&mut self, row: &[Dosage]) -> Result<()> {
        self.wtr.write_record(row.iter().map(|d| d.label()))?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<()> {
        self.wtr.flush().map_err(|e| CustomError::Write {
            source: e,
            path: self.path,
        })
    }
}

/// Writes a records x samples dosage matrix and the sample order beside it.
pub fn write_dosage_npz(
    values: Vec<f32>,
    samples: &[String],
    npz_path: &impl AsRef<Path>,
    samples_path: &impl AsRef<Path>,
) -> Result<()> {
    let n_samples = samples.len();
    let n_records = if n_samples == 0 { 0 } else { values.len() / n_samples };
    let dosages = Array2::from_shape_vec((n_records, n_samples), values)?;

    let f = File::create(npz_path).map_err(|e| CustomError::Write {
        source: e,
        path: npz_path.as_ref().to_path_buf(),
    })?;
    let mut npz = NpzWriter::new(f);
    npz.add_array("dosages", &dosages)?;
    npz.finish()?;

    let f = File::create(samples_path).map_err(|e| CustomError::Write {
        source: e,
        path: samples_path.as_ref().to_path_buf(),
    })?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer(&mut w, samples)?;
    w.flush().map_err(|e| CustomError::Write {
        source: e,
        path: samples_path.as_ref().to_path_buf(),
    })?;
    Ok(())
}
