pub mod header;
pub mod record;
pub mod variant;

use noodles::vcf;

use crate::error::Result;
use crate::reader::record::Record;

/// An ordered stream of records sharing one header and sample list.
pub trait RecordSource: Iterator<Item = Result<Record>> {
    fn header(&self) -> &vcf::Header;

    fn samples(&self) -> &[String];
}

#[cfg(test)]
pub(crate) mod testing {
    use noodles::vcf;

    use crate::reader::RecordSource;
    use crate::reader::record::Record;
    use crate::reader::variant::VariantReader;

    const META: &str = "##fileformat=VCFv4.3\n\
##FORMAT=<ID=GT,Number=1,Type=String,Description=\"Genotype\">\n\
##FORMAT=<ID=FT,Number=1,Type=String,Description=\"Sample genotype filter\">\n\
##FORMAT=<ID=DP,Number=1,Type=Integer,Description=\"Read depth\">\n";

    pub fn vcf_text(n_samples: usize, lines: &[&str]) -> String {
        let mut text = META.to_string();
        text.push_str("#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO");
        if n_samples > 0 {
            text.push_str("\tFORMAT");
        }
        for i in 1..=n_samples {
            text.push_str(&format!("\tS{i}"));
        }
        text.push('\n');
        for line in lines {
            text.push_str(line);
            text.push('\n');
        }
        text
    }

    /// Reads `lines` under a header with samples `S1..=Sn`.
    pub fn read_records(n_samples: usize, lines: &[&str]) -> (vcf::Header, Vec<Record>) {
        let text = vcf_text(n_samples, lines);
        let reader = VariantReader::from_vcf(Box::new(std::io::Cursor::new(text)), &"test.vcf")
            .unwrap();
        let header = reader.header().clone();
        let records = reader.collect::<crate::error::Result<Vec<_>>>().unwrap();
        (header, records)
    }

    pub fn header_with_samples(n_samples: usize) -> vcf::Header {
        read_records(n_samples, &[]).0
    }
}
