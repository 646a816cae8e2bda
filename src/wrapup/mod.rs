use std::path::PathBuf;

use anyhow::{Context, Result};

use pipeline::OptionsFile;

use crate::fs::Fs;
use crate::settings::WrapUpSettings;
use crate::ui::Ui;
use crate::validate;

/// Renaming raw outputs to the BIDS base name
mod rename;
use rename::Renamer;

/// Moving outputs up into the output directory
mod relocate;
use relocate::relocate;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Staging directory {0:?} already exists; remove it and retry --move-outputs")]
    StagingExists(PathBuf),
}

/// Gives the outputs of a finished analysis their BIDS names.
pub struct WrapUp<'a> {
    settings: &'a WrapUpSettings,
    fs: Fs,
    ui: &'a mut Ui,
}

impl<'a> WrapUp<'a> {
    pub fn new(settings: &'a WrapUpSettings, ui: &'a mut Ui) -> Self {
        let fs = Fs::new(&settings.out_dir);
        Self { settings, fs, ui }
    }

    pub fn run(self) -> Result<()> {
        let base = bids::base_name(&self.settings.fmri)?;

        let mut opt_file = PathBuf::new();
        self.fs.options_file(&base, &mut opt_file);
        validate::pipeline_exists(&opt_file)?;

        let mut strbuf = String::with_capacity(1024);
        self.fs.read_to_buf(&opt_file, &mut strbuf)?;
        let internal = OptionsFile::parse(&strbuf)
            .and_then(|opts| opts.internal_name())
            .with_context(|| format!("while reading {opt_file:?}"))?;

        let mut analysis_dir = PathBuf::new();
        self.fs.analysis_dir(&base, &mut analysis_dir);

        self.ui.verbose_progress_debug("Renaming outputs", &analysis_dir);
        let renamed = Renamer::new(&self.fs, &internal, &base).rename_tree(&analysis_dir)?;
        self.ui.done();
        log::info!("renamed {renamed} entries from {internal} to {base}");

        if self.settings.move_outputs {
            let mut staging_dir = PathBuf::new();
            self.fs.staging_dir(&base, &mut staging_dir);

            self.ui.verbose_progress_debug("Moving outputs to", self.fs.output_prefix());
            let moved = relocate(&self.fs, &analysis_dir, &staging_dir)?;
            self.ui.done();
            log::info!("moved {moved} files to {:?}", self.fs.output_prefix());
        }

        self.ui.success(&format!("Outputs of {base} wrapped up"));
        Ok(())
    }
}
