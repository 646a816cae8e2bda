//! Integrity checks on arguments, run in order before any handler touches
//! the filesystem. The first failing check is reported.

use std::path::{Path, PathBuf};

use pipeline::Span;

/// Extensions accepted for the grey-matter mask.
const MASK_EXTENSIONS: [&str; 2] = [".mnc", ".nii"];

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{flag}: invalid or nonexistent file: {path:?}")]
    MissingFile { flag: &'static str, path: PathBuf },
    #[error("Pipeline file not found: {0:?}")]
    MissingPipeline(PathBuf),
    #[error("--mask: file is not MINC (.mnc) or NIfTI (.nii): {0:?}")]
    MaskFormat(PathBuf),
    #[error("{flag}: {value} is smaller than {min}")]
    TooSmall {
        flag: &'static str,
        value: i64,
        min: i64,
    },
    #[error("{flag}: one element of [begin] [step] [end] is smaller than 1: {span}")]
    SpanBelowOne { flag: &'static str, span: Span },
    #[error("{flag}: [begin] is greater than [end]: {span}")]
    SpanReversed { flag: &'static str, span: Span },
    #[error("--p-value: p-value not between 0 and 1: {0}")]
    PValue(f64),
    #[error("--jobs-indices: one of the elements is smaller than 1: {0:?}")]
    JobIndex(Vec<i64>),
    #[error("--jobs-indices: {0} is larger than the maximum job index 4294967295")]
    JobIndexTooLarge(i64),
}

pub fn file_exists(flag: &'static str, path: &Path) -> Result<(), Error> {
    if path.is_file() {
        Ok(())
    } else {
        Err(Error::MissingFile {
            flag,
            path: path.to_path_buf(),
        })
    }
}

pub fn pipeline_exists(path: &Path) -> Result<(), Error> {
    if path.is_file() {
        Ok(())
    } else {
        Err(Error::MissingPipeline(path.to_path_buf()))
    }
}

pub fn mask_format(mask: &Path) -> Result<(), Error> {
    let name = mask.to_string_lossy();
    if MASK_EXTENSIONS.iter().any(|ext| name.ends_with(ext)) {
        Ok(())
    } else {
        Err(Error::MaskFormat(mask.to_path_buf()))
    }
}

pub fn at_least(flag: &'static str, value: i64, min: i64) -> Result<(), Error> {
    if value < min {
        Err(Error::TooSmall { flag, value, min })
    } else {
        Ok(())
    }
}

pub fn span(flag: &'static str, span: Span) -> Result<(), Error> {
    if span.has_value_below_one() {
        Err(Error::SpanBelowOne { flag, span })
    } else if span.is_reversed() {
        Err(Error::SpanReversed { flag, span })
    } else {
        Ok(())
    }
}

pub fn p_value(p: f64) -> Result<(), Error> {
    // NaN is outside the range too:
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(Error::PValue(p))
    }
}

/// Check all indices are >= 1 and convert them.
pub fn job_indices(indices: &[i64]) -> Result<Vec<u32>, Error> {
    if indices.iter().any(|&i| i < 1) {
        return Err(Error::JobIndex(indices.to_vec()));
    }
    indices
        .iter()
        .map(|&i| u32::try_from(i).map_err(|_| Error::JobIndexTooLarge(i)))
        .collect()
}
