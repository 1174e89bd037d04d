use thiserror::Error;

#[derive(Debug, Error)]
pub enum CustomError {
    #[error("could not read {path}")]
    ReadWithPath {
        #[source]
        source: std::io::Error,
        path: std::path::PathBuf,
    },

    #[error("could not write to {path}")]
    Write {
        #[source]
        source: std::io::Error,
        path: std::path::PathBuf,
    },

    #[error("could not create output directory")]
    OutputDir {
        #[source]
        source: std::io::Error,
    },

    #[error("could not write to CSV")]
    CsvWrite(#[from] csv::Error),

    #[error("could not write NPZ archive")]
    NpzWrite(#[from] ndarray_npy::WriteNpzError),

    #[error("dosage matrix has inconsistent shape")]
    DosageShape(#[from] ndarray::ShapeError),

    #[error("could not write sample list")]
    Json(#[from] serde_json::Error),

    #[error("invalid progress bar template")]
    ProgressTemplate(#[from] indicatif::style::TemplateError),

    #[error("could not read variant header from {path}")]
    VariantHeader {
        #[source]
        source: std::io::Error,
        path: std::path::PathBuf,
    },

    #[error("could not read record {record_num} of {path}")]
    VariantRecord {
        #[source]
        source: std::io::Error,
        record_num: u64,
        path: std::path::PathBuf,
    },

    #[error("INFO field \"{id}\" is already declared with a different definition")]
    InfoConflict { id: String },

    #[error("INFO field \"{id}\" was attached to a record before being declared in the header")]
    InfoUndeclared { id: String },

    #[error("allele index {allele} exceeds the largest supported index ({max})")]
    AlleleOutOfRange { allele: u32, max: u32 },

    #[error("need at least 1 sample (got {n_samples})")]
    SampleCount { n_samples: usize },
}

pub type Result<T> = std::result::Result<T, CustomError>;
