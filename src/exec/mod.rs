use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use anyhow::Result;

use pipeline::{JobFilter, Stage};
use util::{path_str, PathEncodingError};

use crate::fs::Fs;
use crate::ui::Ui;

/// Run a subprocess
mod run_cmd;
use run_cmd::run_cmd;

/// Quoting for the shell command line
mod shell;
pub use shell::ShellLine;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("The SPARK application returned a non-zero exit status ({0})")]
    SubprocessFailed(ExitStatus),
    #[error("Cannot attach to child {0}")]
    NoPipe(&'static str),
    #[error("Error joining {0} thread")]
    LogThread(&'static str),
}

/// The SPARK standalone application and its command-line contract.
#[derive(Debug)]
pub struct Exe {
    path: PathBuf,
}

impl Exe {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `<exe> setup <options file>`
    pub fn setup_line(&self, options_file: &Path) -> Result<ShellLine, PathEncodingError> {
        let mut line = ShellLine::new(path_str(&self.path)?);
        line.arg("setup").arg(path_str(options_file)?);
        Ok(line)
    }

    /// `<exe> run <pipeline file> <stage> <job filter...>`
    pub fn run_line(
        &self,
        pipeline_file: &Path,
        stage: Stage,
        jobs: &JobFilter,
    ) -> Result<ShellLine, PathEncodingError> {
        let mut line = ShellLine::new(path_str(&self.path)?);
        line.arg("run").arg(path_str(pipeline_file)?).arg(stage.as_str());
        for job_arg in jobs.to_args() {
            line.arg(&job_arg);
        }
        Ok(line)
    }
}

/// Run `line` in `cwd`, saving its output under `logs_dir` as `<label>.stdout.txt`
/// and `<label>.stderr.txt`. A non-zero exit is an error.
pub fn execute(
    line: &ShellLine,
    cwd: &Path,
    logs_dir: &Path,
    label: &str,
    fs: &Fs,
    ui: &mut Ui,
) -> Result<()> {
    fs.create_dir(logs_dir)?;
    log::info!("running `{line}` in {cwd:?}");

    let mut cmd = line.to_command();
    cmd.current_dir(cwd);

    ui.start_timer();
    let status = run_cmd(&mut cmd, &logs_dir.join(label), fs, ui.verbose)?;
    ui.print_elapsed("SPARK application");

    if !status.success() {
        return Err(Error::SubprocessFailed(status).into());
    }
    Ok(())
}
