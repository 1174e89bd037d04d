use noodles::vcf::{
    self,
    variant::record_buf::{
        RecordBuf, Samples,
        info::field::Value as InfoValue,
        samples::{Keys, sample::Value},
    },
};

use crate::error::{CustomError, Result};
use crate::model::{Genotype, SampleCall};

pub const GENOTYPE_KEY: &str = "GT";
pub const FILTER_KEY: &str = "FT";
pub const DEPTH_KEY: &str = "DP";

const MISSING: &str = ".";

/// One variant record, read from VCF or BCF.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    buf: RecordBuf,
}

impl Record {
    pub fn new(buf: RecordBuf) -> Self {
        Self { buf }
    }

    pub fn as_record_buf(&self) -> &RecordBuf {
        &self.buf
    }

    pub fn chrom(&self) -> &str {
        self.buf.reference_sequence_name()
    }

    /// 1-based position, 0 for telomeric records.
    pub fn pos(&self) -> u64 {
        self.buf.variant_start().map_or(0, |p| usize::from(p) as u64)
    }

    pub fn reference(&self) -> &str {
        self.buf.reference_bases()
    }

    /// Allele text by VCF index: 0 is REF, 1.. index into ALT.
    pub fn allele(&self, index: u32) -> Option<&str> {
        match index {
            0 => Some(self.reference()),
            i => self
                .buf
                .alternate_bases()
                .as_ref()
                .get(i as usize - 1)
                .map(String::as_str),
        }
    }

    pub fn n_samples(&self) -> usize {
        self.buf.samples().values().count()
    }

    /// GT, FT and DP of every sample, in sample order.
    ///
    /// An absent GT key reads as `./.`, an absent FT key as `None`, and an
    /// FT value dropped from the end of a column as `.`.
    pub fn calls(&self) -> Vec<SampleCall> {
        self.buf
            .samples()
            .values()
            .map(|sample| {
                let genotype = match sample.get(GENOTYPE_KEY) {
                    Some(Some(value)) => genotype_from(value),
                    _ => Genotype::MISSING,
                };
                let filter = match sample.get(FILTER_KEY) {
                    None => None,
                    Some(None) => Some(MISSING),
                    Some(Some(Value::String(text))) => Some(text.as_str()),
                    // Anything else cannot name a filter and counts as failing
                    Some(Some(_)) => Some(""),
                };
                let depth = match sample.get(DEPTH_KEY) {
                    Some(Some(Value::Integer(n))) => Some(*n),
                    Some(Some(Value::String(text))) => text.parse::<i32>().ok(),
                    _ => None,
                };
                SampleCall::new(genotype, filter, depth)
            })
            .collect()
    }

    /// Overwrites FORMAT `key` for the given samples, adding the key to the
    /// record if it does not carry it yet.
    pub fn set_sample_values(&mut self, key: &str, updates: &[(usize, String)]) {
        if updates.is_empty() {
            return;
        }

        let samples = self.buf.samples();
        let mut keys: Vec<String> = samples.keys().as_ref().iter().cloned().collect();
        let idx = match keys.iter().position(|k| k == key) {
            Some(idx) => idx,
            None => {
                keys.push(key.to_string());
                keys.len() - 1
            }
        };

        let mut values: Vec<Vec<Option<Value>>> =
            samples.values().map(|sample| sample.values().to_vec()).collect();
        for column in &mut values {
            if column.len() < keys.len() {
                column.resize(keys.len(), None);
            }
        }
        for (sample, value) in updates {
            values[*sample][idx] = Some(Value::String(value.clone()));
        }

        *self.buf.samples_mut() = Samples::new(keys.into_iter().collect::<Keys>(), values);
    }

    /// Sets an integer INFO value. The key must already be declared in `header`.
    pub fn set_info(&mut self, header: &vcf::Header, key: &str, value: i32) -> Result<()> {
        if !header.infos().contains_key(key) {
            return Err(CustomError::InfoUndeclared {
                id: key.to_string(),
            });
        }
        self.buf
            .info_mut()
            .insert(key.to_string(), Some(InfoValue::Integer(value)));
        Ok(())
    }
}

fn genotype_from(value: &Value) -> Genotype {
    match value {
        Value::Genotype(genotype) => {
            let mut positions = genotype
                .as_ref()
                .iter()
                .map(|allele| allele.position().and_then(|p| u32::try_from(p).ok()));
            Genotype::new(positions.next().flatten(), positions.next().flatten())
        }
        Value::String(text) => Genotype::parse(text),
        _ => Genotype::MISSING,
    }
}
