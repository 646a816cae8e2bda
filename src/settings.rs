use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use pipeline::{DictInitMethod, ResamplingMethod, SparseCodingMethod, Span, Stage};

use crate::args::{Args, Mode, RunArgs, SetupArgs, WrapUpArgs};

/// Name of the SPARK standalone application expected next to this program.
pub const DEFAULT_EXE_NAME: &str = "spark_samapp";

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Nothing to do: specify one of --SETUP, --RUN or --WRAP-UP")]
    NoMode,
    #[error("Unable to locate this program to find the default --exe")]
    NoDefaultExe,
}

/// Settings are like Args, except paths are absolute and defaults are resolved.
#[derive(Debug)]
pub struct Settings {
    /// The SPARK standalone application
    pub exe: PathBuf,
    pub verbose: u8,
    pub command: Command,
}

/// Exactly one of these is selected per invocation.
#[derive(Debug)]
pub enum Command {
    Setup(SetupSettings),
    Run(RunSettings),
    WrapUp(WrapUpSettings),
}

#[derive(Debug)]
pub struct SetupSettings {
    pub fmri: PathBuf,
    pub out_dir: PathBuf,
    pub mask: PathBuf,
    pub nb_resamplings: i64,
    pub network_scales: Span,
    pub nb_iterations: i64,
    pub p_value: f64,
    pub resampling_method: ResamplingMethod,
    pub block_window_length: Span,
    pub dict_init_method: DictInitMethod,
    pub sparse_coding_method: SparseCodingMethod,
    pub preserve_dc_atom: bool,
}

#[derive(Debug)]
pub struct RunSettings {
    pub stage: Stage,
    pub fmri: PathBuf,
    pub out_dir: PathBuf,
    pub jobs_patterns: Vec<String>,
    pub jobs_indices: Vec<i64>,
}

#[derive(Debug)]
pub struct WrapUpSettings {
    pub fmri: PathBuf,
    pub out_dir: PathBuf,
    pub move_outputs: bool,
}

impl TryFrom<Args> for Settings {
    type Error = anyhow::Error;
    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let exe = match args.exe {
            Some(exe) => absolute(&exe)?,
            None => default_exe()?,
        };

        let command = match args.mode.ok_or(Error::NoMode)? {
            Mode::Setup(setup) => Command::Setup(setup.try_into()?),
            Mode::Run(run) => Command::Run(run.try_into()?),
            Mode::WrapUp(wrapup) => Command::WrapUp(wrapup.try_into()?),
        };

        Ok(Self {
            exe,
            verbose: args.verbose,
            command,
        })
    }
}

impl TryFrom<SetupArgs> for SetupSettings {
    type Error = anyhow::Error;
    fn try_from(args: SetupArgs) -> Result<Self, Self::Error> {
        Ok(Self {
            fmri: absolute(&args.fmri)?,
            out_dir: absolute(&args.out_dir)?,
            mask: absolute(&args.mask)?,
            nb_resamplings: args.nb_resamplings,
            network_scales: Span::try_from(&args.network_scales[..])
                .context("--network-scales")?,
            nb_iterations: args.nb_iterations,
            p_value: args.p_value,
            resampling_method: args.resampling_method,
            block_window_length: Span::try_from(&args.block_window_length[..])
                .context("--block-window-length")?,
            dict_init_method: args.dict_init_method,
            sparse_coding_method: args.sparse_coding_method,
            preserve_dc_atom: args.preserve_dc_atom,
        })
    }
}

impl TryFrom<RunArgs> for RunSettings {
    type Error = anyhow::Error;
    fn try_from(args: RunArgs) -> Result<Self, Self::Error> {
        Ok(Self {
            stage: args.stage,
            fmri: absolute(&args.fmri)?,
            out_dir: absolute(&args.out_dir)?,
            jobs_patterns: args.jobs_patterns,
            jobs_indices: args.jobs_indices,
        })
    }
}

impl TryFrom<WrapUpArgs> for WrapUpSettings {
    type Error = anyhow::Error;
    fn try_from(args: WrapUpArgs) -> Result<Self, Self::Error> {
        Ok(Self {
            fmri: absolute(&args.fmri)?,
            out_dir: absolute(&args.out_dir)?,
            move_outputs: args.move_outputs,
        })
    }
}

/// Absolute version of `path`; the path does not need to exist.
fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).with_context(|| format!("resolving path {path:?}"))
}

fn default_exe() -> Result<PathBuf> {
    let this = std::env::current_exe().context("locating this program")?;
    let dir = this.parent().ok_or(Error::NoDefaultExe)?;
    Ok(dir.join(DEFAULT_EXE_NAME))
}
