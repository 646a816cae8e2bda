use std::path::{Path, PathBuf};

use crate::{BidsValidator, Error, FuncValidator, PLACEHOLDER_RUN, PLACEHOLDER_SESSION};

/// Identifiers derived once from an fMRI filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidsRun {
    /// Filename without its extension, e.g. `sub-01_task-rest_bold`.
    pub base_name: String,
    pub subject: String,
    pub session: String,
    pub run: String,
    /// The fMRI file this was derived from.
    pub source: PathBuf,
}

impl BidsRun {
    /// Fragment the SPARK application embeds in the names of its raw outputs.
    pub fn internal_name(&self) -> String {
        format!("{}_{}_{}", self.subject, self.session, self.run)
    }
}

/// Derive identifiers from `fmri` using the default `FuncValidator`.
pub fn derive(fmri: &Path) -> Result<BidsRun, Error> {
    derive_with(fmri, &FuncValidator)
}

/// Derive identifiers from `fmri`, validating its name with `validator`.
pub fn derive_with<V: BidsValidator + ?Sized>(fmri: &Path, validator: &V) -> Result<BidsRun, Error> {
    let filename = file_name(fmri)?;
    let tokens: Vec<&str> = filename.split('_').collect();

    let subject = tokens[0];
    if !subject.starts_with("sub-") {
        return Err(Error::MissingSubject(filename.to_owned()));
    }
    let session = tokens.get(1).copied().filter(|t| t.starts_with("ses-"));

    let mut relative = String::with_capacity(filename.len() * 2);
    relative.push('/');
    relative.push_str(subject);
    if let Some(session) = session {
        relative.push('/');
        relative.push_str(session);
    }
    relative.push_str("/func/");
    relative.push_str(filename);
    validator.validate(&relative)?;

    let run = tokens
        .len()
        .checked_sub(2)
        .and_then(|i| tokens.get(i))
        .copied()
        .filter(|t| t.starts_with("run-"));

    let derived = BidsRun {
        base_name: strip_extension(filename).to_owned(),
        subject: normalize_token(subject),
        session: session.map_or_else(|| PLACEHOLDER_SESSION.to_owned(), normalize_token),
        run: run.map_or_else(|| PLACEHOLDER_RUN.to_owned(), normalize_token),
        source: fmri.to_path_buf(),
    };
    log::debug!("derived {derived:?} from {relative}");
    Ok(derived)
}

/// Filename of `fmri` without the extension of its final `_` token.
///
/// This is the name shared by the analysis directory and the pipeline files,
/// and is computed without validating the filename.
pub fn base_name(fmri: &Path) -> Result<String, Error> {
    Ok(strip_extension(file_name(fmri)?).to_owned())
}

/// Replace each run of characters that are not alphanumeric or `_` with a single `_`.
pub fn normalize_token(token: &str) -> String {
    let mut out = String::with_capacity(token.len());
    let mut in_run = false;
    for c in token.chars() {
        if c.is_alphanumeric() || c == '_' {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }
    out
}

fn file_name(path: &Path) -> Result<&str, Error> {
    path.file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| Error::NoFilename(path.to_path_buf()))
}

fn strip_extension(filename: &str) -> &str {
    let last_token_start = filename.rfind('_').map_or(0, |i| i + 1);
    match filename[last_token_start..].find('.') {
        Some(dot) => &filename[..last_token_start + dot],
        None => filename,
    }
}
