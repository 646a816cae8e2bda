use std::path::PathBuf;

use anyhow::{Context, Result};

use pipeline::PipelineOptions;

use crate::exec::{self, Exe};
use crate::fs::Fs;
use crate::settings::SetupSettings;
use crate::ui::Ui;
use crate::validate;

/// Writes the options file for one fMRI run and has the SPARK application
/// turn it into a pipeline file.
pub struct Setup<'a> {
    settings: &'a SetupSettings,
    exe: &'a Exe,
    fs: Fs,
    ui: &'a mut Ui,
}

impl<'a> Setup<'a> {
    pub fn new(settings: &'a SetupSettings, exe: &'a Exe, ui: &'a mut Ui) -> Self {
        let fs = Fs::new(&settings.out_dir);
        Self { settings, exe, fs, ui }
    }

    pub fn run(mut self) -> Result<()> {
        self.validate()?;
        let s = self.settings;

        let fmri = bids::derive(&s.fmri)?;
        let base = fmri.base_name.as_str();
        log::info!("BIDS base name {base}, SPARK name {}", fmri.internal_name());

        let mut analysis_dir = PathBuf::new();
        let mut pipelines_dir = PathBuf::new();
        let mut pipe_file = PathBuf::new();
        let mut opt_file = PathBuf::new();
        let mut logs_dir = PathBuf::new();
        self.fs.analysis_dir(base, &mut analysis_dir);
        self.fs.pipelines_dir(base, &mut pipelines_dir);
        self.fs.pipeline_file(base, &mut pipe_file);
        self.fs.options_file(base, &mut opt_file);
        self.fs.logs_dir(base, &mut logs_dir);

        self.ui.verbose_progress_debug("Creating directory", &pipelines_dir);
        self.fs.ensure_dir(&analysis_dir)?;
        self.fs.ensure_dir(&pipelines_dir)?;
        self.ui.done();

        let options = PipelineOptions {
            pipe_file: &pipe_file,
            fmri: &fmri,
            out_dir: &analysis_dir,
            mask: &s.mask,
            nb_resamplings: s.nb_resamplings,
            network_scales: s.network_scales,
            nb_iterations: s.nb_iterations,
            p_value: s.p_value,
            resampling_method: s.resampling_method,
            block_window_length: s.block_window_length,
            dict_init_method: s.dict_init_method,
            sparse_coding_method: s.sparse_coding_method,
            preserve_dc_atom: s.preserve_dc_atom,
            verbose: self.ui.verbose,
        };
        let mut strbuf = String::with_capacity(1024);
        options.write_to(&mut strbuf)?;

        self.ui.verbose_progress_debug("Writing options file", &opt_file);
        self.fs
            .write_file(&opt_file, &strbuf)
            .context("while writing the pipeline options file")?;
        self.ui.done();

        let line = self.exe.setup_line(&opt_file)?;
        let label = format!("{base}.setup");
        exec::execute(&line, &pipelines_dir, &logs_dir, &label, &self.fs, self.ui)?;

        self.ui.success(&format!("Pipeline created: {pipe_file:?}"));
        Ok(())
    }

    fn validate(&self) -> Result<(), validate::Error> {
        let s = self.settings;
        validate::file_exists("--exe", self.exe.path())?;
        validate::file_exists("--fmri", &s.fmri)?;
        validate::file_exists("--mask", &s.mask)?;
        validate::mask_format(&s.mask)?;
        validate::at_least("--nb-resamplings", s.nb_resamplings, 2)?;
        validate::span("--network-scales", s.network_scales)?;
        validate::at_least("--nb-iterations", s.nb_iterations, 2)?;
        validate::p_value(s.p_value)?;
        validate::span("--block-window-length", s.block_window_length)?;
        Ok(())
    }
}
