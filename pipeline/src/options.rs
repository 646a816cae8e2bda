use std::path::Path;

use bids::BidsRun;
use util::path_str;

use crate::{DictInitMethod, Error, ResamplingMethod, SparseCodingMethod, Span};

/// Option names, in the order they are written.
pub mod keys {
    pub const PIPE_FILE: &str = "pipe_file";
    pub const FMRI_DATA: &str = "fmri_data";
    pub const OUT_DIR: &str = "out_dir";
    pub const MASK: &str = "mask";
    pub const NB_RESAMPLINGS: &str = "nb_resamplings";
    pub const NETWORK_SCALES: &str = "network_scales";
    pub const NB_ITERATIONS: &str = "nb_iterations";
    pub const P_VALUE: &str = "p_value";
    pub const RESAMPLING_METHOD: &str = "resampling_method";
    pub const BLOCK_WINDOW_LENGTH: &str = "block_window_length";
    pub const DICT_INIT_METHOD: &str = "dict_init_method";
    pub const SPARSE_CODING_METHOD: &str = "sparse_coding_method";
    pub const PRESERVE_DC_ATOM: &str = "preserve_dc_atom";
    pub const VERBOSE: &str = "verbose";
}

/// Everything the SPARK application needs to create a pipeline.
#[derive(Debug)]
pub struct PipelineOptions<'a> {
    /// `.mat` file the application will create
    pub pipe_file: &'a Path,
    pub fmri: &'a BidsRun,
    /// Analysis directory, `<out_dir>/<bids base name>`
    pub out_dir: &'a Path,
    pub mask: &'a Path,
    pub nb_resamplings: i64,
    pub network_scales: Span,
    pub nb_iterations: i64,
    pub p_value: f64,
    pub resampling_method: ResamplingMethod,
    pub block_window_length: Span,
    pub dict_init_method: DictInitMethod,
    pub sparse_coding_method: SparseCodingMethod,
    pub preserve_dc_atom: bool,
    pub verbose: bool,
}

impl PipelineOptions<'_> {
    /// Write the options file contents into `strbuf` (cleared first).
    /// Lines always end in `\n`.
    pub fn write_to(&self, strbuf: &mut String) -> Result<(), Error> {
        use keys::*;
        strbuf.clear();

        push_line(strbuf, PIPE_FILE, path_str(self.pipe_file)?);
        push_line(
            strbuf,
            FMRI_DATA,
            &format!(
                "{} {} {} {}",
                self.fmri.subject,
                self.fmri.session,
                self.fmri.run,
                path_str(&self.fmri.source)?,
            ),
        );
        push_line(strbuf, OUT_DIR, path_str(self.out_dir)?);
        push_line(strbuf, MASK, path_str(self.mask)?);
        push_line(strbuf, NB_RESAMPLINGS, &self.nb_resamplings.to_string());
        push_line(strbuf, NETWORK_SCALES, &self.network_scales.to_string());
        push_line(strbuf, NB_ITERATIONS, &self.nb_iterations.to_string());
        push_line(strbuf, P_VALUE, &self.p_value.to_string());
        push_line(strbuf, RESAMPLING_METHOD, self.resampling_method.as_str());
        push_line(strbuf, BLOCK_WINDOW_LENGTH, &self.block_window_length.to_string());
        push_line(strbuf, DICT_INIT_METHOD, self.dict_init_method.as_str());
        push_line(strbuf, SPARSE_CODING_METHOD, self.sparse_coding_method.as_str());
        push_line(strbuf, PRESERVE_DC_ATOM, flag(self.preserve_dc_atom));
        push_line(strbuf, VERBOSE, flag(self.verbose));
        Ok(())
    }
}

fn push_line(strbuf: &mut String, key: &str, value: &str) {
    strbuf.push_str(key);
    strbuf.push(' ');
    strbuf.push_str(value);
    strbuf.push('\n');
}

fn flag(b: bool) -> &'static str {
    if b {
        "1"
    } else {
        "0"
    }
}

/// A pipeline options file read back from disk.
#[derive(Debug, Default)]
pub struct OptionsFile {
    entries: Vec<(String, String)>,
}

impl OptionsFile {
    /// Parse `key value...` lines. Blank lines are skipped; a key may only appear once.
    pub fn parse(text: &str) -> Result<Self, Error> {
        let mut entries: Vec<(String, String)> = Vec::with_capacity(16);
        for line in text.lines() {
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }
            let (key, value) = line.split_once(' ').unwrap_or((line, ""));
            if entries.iter().any(|(k, _)| k == key) {
                return Err(Error::DuplicateKey(key.to_owned()));
            }
            entries.push((key.to_owned(), value.to_owned()));
        }
        log::trace!("read {} pipeline options", entries.len());
        Ok(Self { entries })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Filename fragment the SPARK application used to name its raw outputs:
    /// the first three words of `fmri_data`, joined with `_`.
    pub fn internal_name(&self) -> Result<String, Error> {
        let fmri_data = self
            .get(keys::FMRI_DATA)
            .ok_or(Error::MissingKey(keys::FMRI_DATA))?;
        let words: Vec<&str> = fmri_data.split_whitespace().take(3).collect();
        if words.is_empty() {
            return Err(Error::MissingKey(keys::FMRI_DATA));
        }
        Ok(words.join("_"))
    }
}
