use std::path::PathBuf;

use anyhow::Result;

use pipeline::JobFilter;

use crate::exec::{self, Exe};
use crate::fs::Fs;
use crate::settings::RunSettings;
use crate::ui::Ui;
use crate::validate;

/// Runs one stage of a pipeline created by `Setup`.
pub struct Runner<'a> {
    settings: &'a RunSettings,
    exe: &'a Exe,
    fs: Fs,
    ui: &'a mut Ui,
}

impl<'a> Runner<'a> {
    pub fn new(settings: &'a RunSettings, exe: &'a Exe, ui: &'a mut Ui) -> Self {
        let fs = Fs::new(&settings.out_dir);
        Self { settings, exe, fs, ui }
    }

    pub fn run(mut self) -> Result<()> {
        let s = self.settings;
        let base = bids::base_name(&s.fmri)?;

        let mut pipe_file = PathBuf::new();
        let mut logs_dir = PathBuf::new();
        self.fs.pipeline_file(&base, &mut pipe_file);
        self.fs.logs_dir(&base, &mut logs_dir);

        validate::file_exists("--exe", self.exe.path())?;
        validate::pipeline_exists(&pipe_file)?;
        let indices = validate::job_indices(&s.jobs_indices)?;

        let jobs = JobFilter::new(indices, s.jobs_patterns.clone());
        log::debug!("stage {} with jobs {jobs:?}", s.stage);

        let line = self.exe.run_line(&pipe_file, s.stage, &jobs)?;
        let label = format!("{base}.run-{}", s.stage);
        exec::execute(&line, &s.out_dir, &logs_dir, &label, &self.fs, self.ui)?;

        self.ui.success(&format!("Stage {} finished", s.stage));
        Ok(())
    }
}
