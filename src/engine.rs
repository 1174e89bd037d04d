use indicatif::{ProgressBar, ProgressStyle};

use crate::error::Result;
use crate::reader::RecordSource;
use crate::reader::record::Record;

/// A single-pass consumer of a record stream.
///
/// Constructing a processor is the start of the stream. `step` is called once
/// per record in stream order and may rewrite the record in place; a returned
/// row goes to the caller's sink together with the (possibly rewritten)
/// record. `finish` is called once after the last record.
pub trait RecordProcessor {
    type Row;
    type Report;

    fn step(&mut self, record: &mut Record) -> Result<Option<Self::Row>>;

    fn finish(self) -> Self::Report;
}

/// Feeds every record of `source` through `processor`, handing emitted rows
/// to `sink`. Returns the number of records read.
pub fn drive<P, F>(source: &mut dyn RecordSource, processor: &mut P, mut sink: F) -> Result<u64>
where
    P: RecordProcessor,
    F: FnMut(&Record, P::Row) -> Result<()>,
{
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template(
        "[{elapsed_precise}] {spinner} {pos} records",
    )?);

    let mut n_records = 0u64;
    for record in source {
        let mut record = record?;
        if let Some(row) = processor.step(&mut record)? {
            sink(&record, row)?;
        }
        n_records += 1;
        pb.inc(1);
    }
    pb.abandon();
    Ok(n_records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::variant::VariantReader;

    struct PositionSum {
        total: u64,
    }

    impl RecordProcessor for PositionSum {
        type Row = u64;
        type Report = u64;

        fn step(&mut self, record: &mut Record) -> Result<Option<u64>> {
            self.total += record.pos();
            Ok((record.pos() % 2 == 0).then_some(record.pos()))
        }

        fn finish(self) -> u64 {
            self.total
        }
    }

    #[test]
    fn drives_records_in_order() {
        let text = "##fileformat=VCFv4.3\n\
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n\
1\t1\t.\tA\tG\t.\t.\t.\n\
1\t2\t.\tA\tG\t.\t.\t.\n\
1\t4\t.\tA\tG\t.\t.\t.\n";
        let mut reader = VariantReader::from_vcf(Box::new(text.as_bytes()), &"t.vcf").unwrap();
        let mut processor = PositionSum { total: 0 };
        let mut rows = Vec::new();
        let n = drive(&mut reader, &mut processor, |_, row| {
            rows.push(row);
            Ok(())
        })
        .unwrap();
        assert_eq!(n, 3);
        assert_eq!(rows, vec![2, 4]);
        assert_eq!(processor.finish(), 7);
    }
}
