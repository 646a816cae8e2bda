use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use pipeline::{DictInitMethod, ResamplingMethod, SparseCodingMethod, Stage};

const CMD_NAME: &str = "spark";

/// SParsity-based Analysis of Reliable K-hubness (SPARK) for brain fMRI functional connectivity
#[derive(Parser, Debug)]
#[command(name = CMD_NAME, version, about, long_about = None)]
#[command(disable_help_subcommand = true)]
pub struct Args {
    #[command(subcommand)]
    pub mode: Option<Mode>,

    /// Path to the SPARK standalone application [default: spark_samapp next to this program]
    #[arg(long, value_name = "FILE", global = true)]
    #[arg(env = "SPARK_EXE")]
    pub exe: Option<PathBuf>,

    /// Print additional details (repeat for more)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

/// The three modes are mutually exclusive. Each is also reachable by its
/// bare name (`setup`, `run`, `wrap-up`).
#[derive(Subcommand, Debug)]
pub enum Mode {
    /// Set up a SPARK pipeline for one fMRI file
    #[command(long_flag = "SETUP")]
    Setup(SetupArgs),
    /// Run a SPARK sub-pipeline
    #[command(long_flag = "RUN")]
    Run(RunArgs),
    /// Rename (and optionally move) the outputs of a SPARK analysis
    #[command(long_flag = "WRAP-UP")]
    WrapUp(WrapUpArgs),
}

#[derive(clap::Args, Debug)]
pub struct SetupArgs {
    /// fMRI file of a BIDS dataset; its name is used to name the outputs
    #[arg(long, value_name = "FILE")]
    pub fmri: PathBuf,

    /// Output directory; a directory named after --fmri is created inside it
    #[arg(long, value_name = "DIR")]
    pub out_dir: PathBuf,

    /// Grey-matter mask (MINC .mnc or NIfTI .nii)
    #[arg(long, value_name = "FILE")]
    pub mask: PathBuf,

    /// Number of bootstrap resamplings at the individual level (>= 2)
    #[arg(long, value_name = "N", default_value_t = 100, allow_negative_numbers = true)]
    pub nb_resamplings: i64,

    /// Range of network scales to test; an optimal scale is estimated from it (each >= 1)
    #[arg(long, num_args = 3, value_names = ["BEGIN", "STEP", "END"])]
    #[arg(default_values_t = [10, 2, 30], allow_negative_numbers = true, action = ArgAction::Set)]
    pub network_scales: Vec<i64>,

    /// Number of iterations for the sparse dictionary learning (>= 2)
    #[arg(long, value_name = "N", default_value_t = 20, allow_negative_numbers = true)]
    pub nb_iterations: i64,

    /// Z-test significance level for removing inconsistent sparse coefficients (0 to 1)
    #[arg(long, value_name = "P", default_value_t = 0.05, allow_negative_numbers = true)]
    pub p_value: f64,

    /// Resampling method under the null hypothesis
    #[arg(long, value_enum, value_name = "METHOD", default_value_t = ResamplingMethod::Cbb)]
    pub resampling_method: ResamplingMethod,

    /// Window lengths (in time points) for the circular block bootstrap (each >= 1)
    #[arg(long, num_args = 3, value_names = ["BEGIN", "STEP", "END"])]
    #[arg(default_values_t = [10, 1, 30], allow_negative_numbers = true, action = ArgAction::Set)]
    pub block_window_length: Vec<i64>,

    /// Dictionary initialization method
    #[arg(long, value_enum, value_name = "METHOD", default_value_t = DictInitMethod::GivenMatrix)]
    pub dict_init_method: DictInitMethod,

    /// Sparse coding method for the dictionary learning
    #[arg(long, value_enum, value_name = "METHOD", default_value_t = SparseCodingMethod::Thresholding)]
    pub sparse_coding_method: SparseCodingMethod,

    /// Keep the first atom constant while the others are trained
    #[arg(long)]
    pub preserve_dc_atom: bool,
}

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Sub-pipeline to run
    #[arg(long, value_enum)]
    pub stage: Stage,

    /// fMRI file the pipeline was set up for
    #[arg(long, value_name = "FILE")]
    pub fmri: PathBuf,

    /// Output directory previously set up with --SETUP
    #[arg(long, value_name = "DIR")]
    pub out_dir: PathBuf,

    /// Only run jobs matching these strings (takes precedence over --jobs-indices)
    #[arg(long, num_args = 1.., value_name = "PATTERN")]
    pub jobs_patterns: Vec<String>,

    /// Only run jobs with these 1-based indices
    #[arg(long, num_args = 1.., value_name = "N", allow_negative_numbers = true)]
    pub jobs_indices: Vec<i64>,
}

#[derive(clap::Args, Debug)]
pub struct WrapUpArgs {
    /// fMRI file the pipeline was set up for
    #[arg(long, value_name = "FILE")]
    pub fmri: PathBuf,

    /// Output directory populated by --SETUP and --RUN
    #[arg(long, value_name = "DIR")]
    pub out_dir: PathBuf,

    /// Move all outputs of this analysis into --out-dir itself
    #[arg(long)]
    pub move_outputs: bool,
}

#[cfg(test)]
mod test {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_setup_defaults() {
        let args = Args::try_parse_from([
            "spark", "--SETUP", "--fmri", "f.nii", "--out-dir", "out", "--mask", "m.nii",
        ])
        .unwrap();
        let Some(Mode::Setup(setup)) = args.mode else {
            panic!("expected setup mode");
        };
        assert_eq!(100, setup.nb_resamplings);
        assert_eq!(vec![10, 2, 30], setup.network_scales);
        assert_eq!(vec![10, 1, 30], setup.block_window_length);
        assert_eq!(20, setup.nb_iterations);
        assert_eq!(0.05, setup.p_value);
        assert_eq!(ResamplingMethod::Cbb, setup.resampling_method);
        assert_eq!(SparseCodingMethod::Thresholding, setup.sparse_coding_method);
        assert!(!setup.preserve_dc_atom);
    }

    #[test]
    fn test_setup_values() {
        let args = Args::try_parse_from([
            "spark", "--exe", "/opt/app", "--SETUP", "--fmri", "f.nii", "--out-dir", "out",
            "--mask", "m.nii", "--network-scales", "12", "1", "12", "--nb-resamplings", "-3",
            "--resampling-method", "AR1B", "-vv",
        ])
        .unwrap();
        assert_eq!(Some(PathBuf::from("/opt/app")), args.exe);
        assert_eq!(2, args.verbose);
        let Some(Mode::Setup(setup)) = args.mode else {
            panic!("expected setup mode");
        };
        assert_eq!(vec![12, 1, 12], setup.network_scales);
        assert_eq!(-3, setup.nb_resamplings);
        assert_eq!(ResamplingMethod::Ar1b, setup.resampling_method);
    }

    #[test]
    fn test_modes_are_exclusive() {
        assert!(Args::try_parse_from([
            "spark", "--SETUP", "--RUN", "--fmri", "f.nii", "--out-dir", "out", "--mask", "m",
        ])
        .is_err());
    }

    #[test]
    fn test_run_and_wrapup() {
        let args = Args::try_parse_from([
            "spark", "--RUN", "--stage", "B", "--fmri", "f.nii", "--out-dir", "out",
            "--jobs-indices", "1", "3",
        ])
        .unwrap();
        let Some(Mode::Run(run)) = args.mode else {
            panic!("expected run mode");
        };
        assert_eq!(Stage::B, run.stage);
        assert_eq!(vec![1, 3], run.jobs_indices);
        assert!(run.jobs_patterns.is_empty());

        assert!(Args::try_parse_from([
            "spark", "--RUN", "--stage", "D", "--fmri", "f.nii", "--out-dir", "out",
        ])
        .is_err());

        let args = Args::try_parse_from([
            "spark", "--WRAP-UP", "--fmri", "f.nii", "--out-dir", "out", "--move-outputs",
        ])
        .unwrap();
        assert!(matches!(args.mode, Some(Mode::WrapUp(WrapUpArgs { move_outputs: true, .. }))));
    }

    #[test]
    fn test_no_mode() {
        let args = Args::try_parse_from(["spark"]).unwrap();
        assert!(args.mode.is_none());
    }

    #[test]
    fn test_bare_mode_names() {
        let args = Args::try_parse_from([
            "spark", "wrap-up", "--fmri", "f.nii", "--out-dir", "out",
        ])
        .unwrap();
        assert!(matches!(args.mode, Some(Mode::WrapUp(_))));

        // no `help` subcommand competing with the modes:
        assert!(Args::try_parse_from(["spark", "help"]).is_err());
    }
}
