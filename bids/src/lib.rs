//! BIDS naming rules for functional MRI files, and the identifiers
//! SPARK derives from them to name its outputs.

mod parse;
pub use parse::{parse_func_filename, Extension, FuncName, Suffix};

mod validator;
pub use validator::{BidsValidator, FuncValidator};

mod derive;
pub use derive::{base_name, derive, derive_with, normalize_token, BidsRun};

/// Session id used when the filename has no `ses-` entity.
pub const PLACEHOLDER_SESSION: &str = "ses_cspark_1";
/// Run id used when the filename has no `run-` entity.
pub const PLACEHOLDER_RUN: &str = "run_cspark_1";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Path has no valid UTF-8 filename: {0:?}")]
    NoFilename(std::path::PathBuf),
    #[error("Invalid BIDS file, the filename does not start with 'sub-X_': {0}")]
    MissingSubject(String),
    #[error("Invalid BIDS filename '{name}' (at byte {pos}): {msg}")]
    Parse { name: String, pos: usize, msg: String },
    #[error("Invalid BIDS path '{path}': {reason}")]
    Path { path: String, reason: &'static str },
}
