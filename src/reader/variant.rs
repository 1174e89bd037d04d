use flate2::read::MultiGzDecoder;
use noodles::{bcf, vcf};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use crate::error::{CustomError, Result};
use crate::reader::RecordSource;
use crate::reader::record::Record;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const BCF_MAGIC: &[u8] = b"BCF";

enum Inner {
    Vcf(vcf::io::Reader<Box<dyn BufRead>>),
    Bcf(bcf::io::Reader<Box<dyn Read>>),
}

/// Reads VCF (plain or gzip/BGZF) or BGZF-compressed BCF records.
pub struct VariantReader {
    inner: Inner,
    path: PathBuf,
    header: vcf::Header,
    samples: Vec<String>,
    n_records: u64,
    poisoned: bool,
}

impl VariantReader {
    /// Opens `path`, choosing the format from its leading bytes rather than
    /// its extension.
    pub fn open(path: &impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let read_error = |e: io::Error| CustomError::ReadWithPath {
            source: e,
            path: path.to_path_buf(),
        };
        let mut reader = BufReader::new(File::open(path).map_err(read_error)?);
        let is_gzip = reader.fill_buf().map_err(read_error)?.starts_with(&GZIP_MAGIC);

        if !is_gzip {
            return Self::from_vcf(Box::new(reader), &path);
        }

        // BCF is always BGZF compressed, so peek past the first block
        let mut decoded = BufReader::new(MultiGzDecoder::new(reader));
        let is_bcf = decoded.fill_buf().map_err(read_error)?.starts_with(BCF_MAGIC);
        if is_bcf {
            let reader = BufReader::new(File::open(path).map_err(read_error)?);
            Self::from_bcf(Box::new(reader), &path)
        } else {
            Self::from_vcf(Box::new(decoded), &path)
        }
    }

    /// Reads uncompressed VCF text.
    pub fn from_vcf(lines: Box<dyn BufRead>, path: &impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut reader = vcf::io::Reader::new(lines);
        let header = reader
            .read_header()
            .map_err(|e| CustomError::VariantHeader {
                source: e,
                path: path.clone(),
            })?;
        Ok(Self::with_header(Inner::Vcf(reader), path, header))
    }

    /// Reads BGZF-compressed BCF.
    pub fn from_bcf(bytes: Box<dyn Read>, path: &impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let header_error = |e: io::Error| CustomError::VariantHeader {
            source: e,
            path: path.clone(),
        };
        let mut reader = bcf::io::reader::Builder::default()
            .build_from_reader(bytes)
            .map_err(header_error)?;
        let header = reader.read_header().map_err(header_error)?;
        Ok(Self::with_header(Inner::Bcf(reader), path, header))
    }

    fn with_header(inner: Inner, path: PathBuf, header: vcf::Header) -> Self {
        let samples = header.sample_names().iter().cloned().collect();
        Self {
            inner,
            path,
            header,
            samples,
            n_records: 0,
            poisoned: false,
        }
    }
}

impl RecordSource for VariantReader {
    fn header(&self) -> &vcf::Header {
        &self.header
    }

    fn samples(&self) -> &[String] {
        &self.samples
    }
}

impl Iterator for VariantReader {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.poisoned {
            return None;
        }

        let mut buf = vcf::variant::record_buf::RecordBuf::default();
        let n_read = match &mut self.inner {
            Inner::Vcf(reader) => reader.read_record_buf(&self.header, &mut buf),
            Inner::Bcf(reader) => reader.read_record_buf(&self.header, &mut buf),
        };
        match n_read {
            Ok(0) => None,
            Ok(_) => {
                self.n_records += 1;
                Some(Ok(Record::new(buf)))
            }
            Err(e) => {
                // Poison iterator to prevent further reads
                self.poisoned = true;
                Some(Err(CustomError::VariantRecord {
                    source: e,
                    record_num: self.n_records + 1,
                    path: self.path.clone(),
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VCF: &str = "##fileformat=VCFv4.3\n\
##FORMAT=<ID=GT,Number=1,Type=String,Description=\"Genotype\">\n\
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tS1\tS2\n\
1\t10\t.\tA\tG\t.\tPASS\t.\tGT\t0/1\t1/1\n\
1\t20\t.\tC\tT\t.\tPASS\t.\tGT\t0/0\t./.\n";

    fn reader(text: &'static str) -> Result<VariantReader> {
        VariantReader::from_vcf(Box::new(text.as_bytes()), &"test.vcf")
    }

    #[test]
    fn reads_header_and_records() {
        let reader = reader(VCF).unwrap();
        assert_eq!(reader.samples(), &["S1".to_string(), "S2".to_string()]);
        assert!(reader.header().formats().contains_key("GT"));

        let records: Vec<Record> = reader.collect::<Result<_>>().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].pos(), 10);
        assert_eq!(records[1].reference(), "C");
        assert_eq!(records[1].calls()[1].genotype.to_string(), "./.");
    }

    #[test]
    fn malformed_record_reports_number_and_stops() {
        let text = "##fileformat=VCFv4.3\n\
##FORMAT=<ID=GT,Number=1,Type=String,Description=\"Genotype\">\n\
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tS1\n\
1\t10\t.\tA\tG\t.\tPASS\t.\tGT\t0/1\n\
1\tten\t.\tA\tG\t.\tPASS\t.\tGT\t0/1\n\
1\t12\t.\tA\tG\t.\tPASS\t.\tGT\t0/1\n";
        let mut reader = reader(text).unwrap();
        assert!(matches!(reader.next(), Some(Ok(_))));
        match reader.next() {
            Some(Err(CustomError::VariantRecord { record_num, .. })) => assert_eq!(record_num, 2),
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(reader.next().is_none());
    }
}
