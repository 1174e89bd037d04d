use clap::Subcommand;
use log::{info, warn};
use std::path::{Path, PathBuf};

use crate::engine::{RecordProcessor, drive};
use crate::error::{CustomError, Result};
use crate::filter::DepthFilter;
use crate::output::{
    DosageCsvWriter, VariantSummaryWriter, VcfWriter, write_dosage_npz, write_sample_summary,
    write_variant_totals,
};
use crate::project::{CountAnnotator, DosageExporter};
use crate::reader::RecordSource;
use crate::reader::variant::VariantReader;
use crate::samples::{FilterPolicy, SampleConfig, SampleSummary};
use crate::sites::VariantSummary;

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Fill in undecided per-sample FT values from genotype and read depth.
    FilterDepth {
        /// Calls with DP below this are marked No_data.
        #[arg(short, long)]
        min_depth: i32,
    },

    /// Annotate every record with counts of samples per FT/GT combination.
    CountGenotypes,

    /// Summarize zygosity, ti/tv, missingness and coverage per sample.
    SampleSummary {
        /// Count failing calls instead of passing ones.
        #[arg(long, conflicts_with = "both")]
        fail: bool,

        /// Count every call regardless of its filter.
        #[arg(long)]
        both: bool,

        /// Input holds indels; skip ti/tv.
        #[arg(long)]
        indel: bool,
    },

    /// Summarize zygosity and allele frequency per record and overall.
    VariantSummary,

    /// Export a records x samples dosage matrix.
    Dosage {
        /// Write dosages.npz and samples.json instead of dosages.csv.
        #[arg(long)]
        npz: bool,
    },
}

impl Mode {
    pub fn sample_config(fail: bool, both: bool, indel: bool) -> SampleConfig {
        let policy = if both {
            FilterPolicy::Both
        } else if fail {
            FilterPolicy::FailOnly
        } else {
            FilterPolicy::PassOnly
        };
        SampleConfig { policy, indel }
    }
}

pub fn open_source(input: &Path) -> Result<Box<dyn RecordSource>> {
    info!("Reading {}", input.display());
    let reader = VariantReader::open(&input)?;
    let n_samples = reader.samples().len();
    if n_samples == 0 {
        return Err(CustomError::SampleCount { n_samples });
    }
    info!("{} samples in header", n_samples);
    Ok(Box::new(reader))
}

pub fn run(source: &mut dyn RecordSource, mode: &Mode, output_dir: impl AsRef<Path>) -> Result<()> {
    let output_dir = output_dir.as_ref();
    match *mode {
        Mode::FilterDepth { min_depth } => run_filter_depth(source, min_depth, output_dir),
        Mode::CountGenotypes => run_count_genotypes(source, output_dir),
        Mode::SampleSummary { fail, both, indel } => {
            run_sample_summary(source, Mode::sample_config(fail, both, indel), output_dir)
        }
        Mode::VariantSummary => run_variant_summary(source, output_dir),
        Mode::Dosage { npz } => run_dosage(source, npz, output_dir),
    }
}

fn announce(path: &Path, what: &str) {
    info!("Writing {} to {}...", what, path.display());
}

fn run_filter_depth(source: &mut dyn RecordSource, min_depth: i32, output_dir: &Path) -> Result<()> {
    let mut filter = DepthFilter::new(source.header(), min_depth);
    let vcf_path = output_dir.join("filtered.vcf");
    announce(&vcf_path, "depth-filtered records");

    let mut writer = VcfWriter::create(&vcf_path, filter.header())?;
    drive(source, &mut filter, |record, ()| writer.write_record(record))?;
    writer.finish()?;

    let report = filter.finish();
    info!(
        "{} records; {} filter values set, {} genotypes cleared",
        report.records, report.filters_set, report.genotypes_cleared
    );
    Ok(())
}

fn run_count_genotypes(source: &mut dyn RecordSource, output_dir: &Path) -> Result<()> {
    let mut annotator = CountAnnotator::new(source.header())?;
    let vcf_path = output_dir.join("annotated.vcf");
    announce(&vcf_path, "annotated records");

    let mut writer = VcfWriter::create(&vcf_path, annotator.header())?;
    drive(source, &mut annotator, |record, ()| writer.write_record(record))?;
    writer.finish()?;

    let report = annotator.finish();
    info!("{} records annotated", report.records - report.skipped);
    if report.skipped > 0 {
        warn!(
            "{} records had unsupported allele indices and were written without counts",
            report.skipped
        );
    }
    Ok(())
}

fn run_sample_summary(
    source: &mut dyn RecordSource,
    config: SampleConfig,
    output_dir: &Path,
) -> Result<()> {
    let mut summary = SampleSummary::new(config, source.samples());
    let n_records = drive(source, &mut summary, |_, ()| Ok(()))?;
    info!("{} records processed", n_records);

    let csv_path = output_dir.join("sample_summary.csv");
    announce(&csv_path, "per-sample summary");
    write_sample_summary(&summary.finish(), &csv_path)
}

fn run_variant_summary(source: &mut dyn RecordSource, output_dir: &Path) -> Result<()> {
    let mut summary = VariantSummary::new(source.samples());
    let rows_path = output_dir.join("variant_summary.csv");
    announce(&rows_path, "per-variant summary");

    let mut writer = VariantSummaryWriter::create(&rows_path)?;
    drive(source, &mut summary, |_, row| writer.write_row(&row))?;
    writer.finish()?;

    let totals = summary.finish();
    info!(
        "{} records processed, {} monomorphic",
        totals.total_sites, totals.monomorphic_sites
    );
    let totals_path = output_dir.join("variant_totals.csv");
    announce(&totals_path, "variant totals");
    write_variant_totals(&totals, &totals_path)
}

fn run_dosage(source: &mut dyn RecordSource, npz: bool, output_dir: &Path) -> Result<()> {
    let samples = source.samples().to_vec();
    let mut exporter = DosageExporter::new();

    if npz {
        let npz_path: PathBuf = output_dir.join("dosages.npz");
        let samples_path = output_dir.join("samples.json");
        let mut values = Vec::new();
        drive(source, &mut exporter, |_, row| {
            values.extend(row.iter().map(|d| d.value()));
            Ok(())
        })?;
        announce(&npz_path, "dosage matrix");
        write_dosage_npz(values, &samples, &npz_path, &samples_path)?;
    } else {
        let csv_path = output_dir.join("dosages.csv");
        announce(&csv_path, "dosages");
        let mut writer = DosageCsvWriter::create(&csv_path, &samples)?;
        drive(source, &mut exporter, |_, row| writer.write_row(&row))?;
        writer.finish()?;
    }

    info!("{} records exported", exporter.finish());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_flags_select_policy() {
        assert_eq!(
            Mode::sample_config(false, false, false).policy,
            FilterPolicy::PassOnly
        );
        assert_eq!(
            Mode::sample_config(true, false, false).policy,
            FilterPolicy::FailOnly
        );
        assert_eq!(Mode::sample_config(false, true, true).policy, FilterPolicy::Both);
        assert!(Mode::sample_config(false, false, true).indel);
    }
}
