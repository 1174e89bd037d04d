#![allow(dead_code)]

use flate2::Compression;
use flate2::write::GzEncoder;
use noodles::bcf;
use noodles::vcf::{self, variant::io::Write as _};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

pub const SAMPLES: [&str; 3] = ["S1", "S2", "S3"];

const META: [&str; 7] = [
    "##fileformat=VCFv4.2",
    "##FILTER=<ID=PASS,Description=\"All filters passed\">",
    "##contig=<ID=1>",
    "##contig=<ID=2>",
    "##FORMAT=<ID=GT,Number=1,Type=String,Description=\"Genotype\">",
    "##FORMAT=<ID=FT,Number=1,Type=String,Description=\"Sample genotype filter\">",
    "##FORMAT=<ID=DP,Number=1,Type=Integer,Description=\"Read depth\">",
];

/// Four records covering passing, failing, undecided and multi-allelic calls.
pub const RECORDS: [&str; 4] = [
    "1\t100\t.\tA\tG\t.\tPASS\t.\tGT:FT:DP\t0/0:PASS:50\t0/1:PASS:60\t1/1:PASS:5",
    "1\t200\t.\tC\tA\t.\tPASS\t.\tGT:FT:DP\t0/1:LowQual:20\t1/1:PASS:30\t./.:No_data:.",
    "1\t300\t.\tT\tC\t.\tPASS\t.\tGT:FT:DP\t0/0:.:40\t0/1:.:3\t0/0:.:5",
    "2\t400\t.\tG\tA,T\t.\tPASS\t.\tGT:FT:DP\t1/2:PASS:10\t0/0:No_var:12\t2/2:PASS:8",
];

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

#[derive(Clone, Copy)]
pub enum Compressed {
    Plain,
    Gzip,
    Bcf,
}

pub struct Dataset {
    pub input: PathBuf,
    pub output_dir: PathBuf,
}

pub fn header_text() -> String {
    let mut text = META.join("\n");
    text.push_str("\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\t");
    text.push_str(&SAMPLES.join("\t"));
    text.push('\n');
    text
}

pub fn vcf_text(records: &[&str]) -> String {
    let mut text = header_text();
    for record in records {
        text.push_str(record);
        text.push('\n');
    }
    text
}

pub fn create_dataset(label: &str, text: &str, compressed: Compressed) -> io::Result<Dataset> {
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    let base_dir = std::env::temp_dir().join("gtsummary-tests").join(format!(
        "{}-{}-{}",
        std::process::id(),
        id,
        label
    ));
    if base_dir.exists() {
        fs::remove_dir_all(&base_dir)?;
    }
    fs::create_dir_all(&base_dir)?;

    let output_dir = base_dir.join("output");
    let input = match compressed {
        Compressed::Plain => {
            let path = base_dir.join("input.vcf");
            fs::write(&path, text)?;
            path
        }
        Compressed::Gzip => {
            let path = base_dir.join("input.vcf.gz");
            let mut encoder = GzEncoder::new(File::create(&path)?, Compression::default());
            encoder.write_all(text.as_bytes())?;
            encoder.finish()?;
            path
        }
        Compressed::Bcf => {
            let path = base_dir.join("input.bcf");
            write_bcf(text, &path)?;
            path
        }
    };
    Ok(Dataset { input, output_dir })
}

pub fn standard_dataset(label: &str) -> Dataset {
    create_dataset(label, &vcf_text(&RECORDS), Compressed::Plain).unwrap()
}

/// Re-encodes VCF text as BGZF-compressed BCF.
fn write_bcf(text: &str, path: &Path) -> io::Result<()> {
    let mut reader = vcf::io::Reader::new(text.as_bytes());
    let header = reader.read_header()?;
    let mut writer = bcf::io::Writer::new(File::create(path)?);
    writer.write_header(&header)?;
    for result in reader.record_bufs(&header) {
        let record = result?;
        writer.write_variant_record(&header, &record)?;
    }
    Ok(())
}

/// Pads every sample column to the FORMAT key count with `.` so records
/// compare equal whether or not trailing missing values were written.
pub fn normalize_record(line: &str) -> String {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() <= 9 {
        return line.to_string();
    }
    let n_keys = fields[8].split(':').count();
    let mut out: Vec<String> = fields[..9].iter().map(|f| f.to_string()).collect();
    for column in &fields[9..] {
        let mut values: Vec<&str> = column.split(':').collect();
        values.resize(n_keys, ".");
        out.push(values.join(":"));
    }
    out.join("\t")
}
