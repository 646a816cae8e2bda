#![cfg(unix)]

use anyhow::Result;
use clap::Parser;
use spark_cli::Args;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{LazyLock, Mutex};
use tempfile::{tempdir, TempDir};

// executing a script another thread is still writing fails with ETXTBSY:
static EXE_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::default());

const FMRI_NAME: &str = "sub-01_ses-02_task-rest_run-1_bold.nii.gz";
const BASE: &str = "sub-01_ses-02_task-rest_run-1_bold";
const INTERNAL: &str = "sub_01_ses_02_run_1";

/// Stands in for the SPARK application: `setup` creates the pipeline file,
/// `run` writes one output named with the internal name.
const STUB_EXE: &str = r#"#!/bin/sh
case "$1" in
  setup)
    touch "${2%.opt}.mat"
    ;;
  run)
    base=$(dirname "$(dirname "$2")")
    tag=$(awk '$1 == "fmri_data" { print $2 "_" $3 "_" $4 }' "${2%.mat}.opt")
    mkdir -p "$base/$tag"
    touch "$base/$tag/kmap_${tag}_$3.mat"
    ;;
  *)
    exit 1
    ;;
esac
echo "$*"
"#;

const FAILING_EXE: &str = "#!/bin/sh\necho boom >&2\nexit 7\n";

struct Fixture {
    dir: TempDir,
    exe: PathBuf,
}

impl Fixture {
    fn new(script: &str) -> Result<Self> {
        let dir = tempdir()?;
        let exe = dir.path().join("spark_samapp");
        {
            let _lock = EXE_LOCK.lock();
            std::fs::write(&exe, script)?;
            std::fs::set_permissions(&exe, std::fs::Permissions::from_mode(0o755))?;
        }

        std::fs::create_dir(dir.path().join("data"))?;
        std::fs::write(dir.path().join("data").join(FMRI_NAME), "")?;
        std::fs::write(dir.path().join("data/mask.nii"), "")?;
        std::fs::write(dir.path().join("data/mask.txt"), "")?;
        Ok(Self { dir, exe })
    }

    fn path(&self, rel: &str) -> String {
        self.dir.path().join(rel).to_str().unwrap().to_owned()
    }

    fn out(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    fn run(&self, mode: &str, extra: &[&str]) -> Result<()> {
        self.run_for(FMRI_NAME, mode, extra)
    }

    fn run_for(&self, fmri_name: &str, mode: &str, extra: &[&str]) -> Result<()> {
        let argv = self.argv(fmri_name, mode, extra);
        let args = Args::try_parse_from(argv)?;

        let _lock = EXE_LOCK.lock();
        spark_cli::run_with(args)
    }

    /// Full command line for one mode, with the stub executable.
    fn argv(&self, fmri_name: &str, mode: &str, extra: &[&str]) -> Vec<String> {
        let fmri = self.path(&format!("data/{fmri_name}"));
        let out = self.path("out");
        let mut argv = vec![
            "spark",
            "--exe",
            self.exe.to_str().unwrap(),
            mode,
            "--fmri",
            fmri.as_str(),
            "--out-dir",
            out.as_str(),
        ];
        argv.extend_from_slice(extra);
        argv.into_iter().map(str::to_owned).collect()
    }

    fn setup(&self, extra: &[&str]) -> Result<()> {
        self.setup_for(FMRI_NAME, extra)
    }

    fn setup_for(&self, fmri_name: &str, extra: &[&str]) -> Result<()> {
        let mask = self.path("data/mask.nii");
        let mut argv = vec!["--mask", mask.as_str()];
        argv.extend_from_slice(extra);
        self.run_for(fmri_name, "--SETUP", &argv)
    }

    /// Run the installed binary itself and return its exit code.
    fn exit_code(&self, argv: &[String]) -> Result<Option<i32>> {
        let _lock = EXE_LOCK.lock();
        let output = Command::new(env!("CARGO_BIN_EXE_spark"))
            .args(&argv[1..])
            .env_remove("SPARK_EXE")
            .output()?;
        Ok(output.status.code())
    }
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

#[test]
fn test_setup_run_wrap_up() -> Result<()> {
    let fx = Fixture::new(STUB_EXE)?;
    let analysis = fx.out().join(BASE);
    let pipelines = analysis.join("pipelines");

    fx.setup(&[])?;
    assert!(pipelines.join(format!("{BASE}.mat")).is_file(), "pipeline file created");
    let opt = read(&pipelines.join(format!("{BASE}.opt")));
    let fmri = fx.path(&format!("data/{FMRI_NAME}"));
    assert!(opt.contains(&format!("fmri_data sub_01 ses_02 run_1 {fmri}\n")));
    assert!(opt.contains(&format!("out_dir {}\n", analysis.display())));
    assert!(read(&pipelines.join(format!("logs/{BASE}.setup.stdout.txt"))).starts_with("setup "));

    fx.run("--RUN", &["--stage", "A", "--jobs-indices", "1", "2"])?;
    assert!(analysis.join(INTERNAL).join(format!("kmap_{INTERNAL}_A.mat")).is_file());
    assert!(read(&pipelines.join(format!("logs/{BASE}.run-A.stdout.txt"))).ends_with(" A 1;2;\n"));

    fx.run("--WRAP-UP", &[])?;
    assert!(analysis.join(BASE).join(format!("kmap_{BASE}_A.mat")).is_file());
    assert!(!analysis.join(INTERNAL).exists());
    Ok(())
}

#[test]
fn test_wrap_up_move_outputs() -> Result<()> {
    let fx = Fixture::new(STUB_EXE)?;
    fx.setup(&[])?;
    fx.run("--RUN", &["--stage", "B"])?;
    fx.run("--WRAP-UP", &["--move-outputs"])?;

    let out = fx.out();
    assert!(out.join(BASE).join(format!("kmap_{BASE}_B.mat")).is_file());
    assert!(out.join("pipelines").join(format!("{BASE}.opt")).is_file());
    assert!(out.join(format!("pipelines/logs/{BASE}.run-B.stdout.txt")).is_file());
    assert!(!out.join(BASE).join("pipelines").exists());
    assert!(!out.join(format!(".{BASE}.relocating")).exists());
    Ok(())
}

#[test]
fn test_setup_validation() -> Result<()> {
    let fx = Fixture::new(STUB_EXE)?;
    let mask_txt = fx.path("data/mask.txt");

    let err = fx.run("--SETUP", &["--mask", mask_txt.as_str()]).unwrap_err();
    assert!(format!("{err:#}").contains("--mask"));

    let err = fx.setup(&["--nb-resamplings", "1"]).unwrap_err();
    assert!(format!("{err:#}").contains("--nb-resamplings"));

    let err = fx.setup(&["--network-scales", "30", "2", "10"]).unwrap_err();
    assert!(format!("{err:#}").contains("greater than"));

    let err = fx.setup(&["--p-value", "-0.5"]).unwrap_err();
    assert!(format!("{err:#}").contains("--p-value"));
    assert!(!fx.out().exists(), "nothing written before validation passes");

    fx.setup(&["--nb-resamplings", "2", "--network-scales", "10", "2", "30"])?;
    Ok(())
}

#[test]
fn test_run_without_pipeline() -> Result<()> {
    let fx = Fixture::new(STUB_EXE)?;
    let err = fx.run("--RUN", &["--stage", "C"]).unwrap_err();
    assert!(format!("{err:#}").contains("Pipeline file not found"));

    let err = fx.run("--WRAP-UP", &[]).unwrap_err();
    assert!(format!("{err:#}").contains(&format!("{BASE}.opt")));
    Ok(())
}

#[test]
fn test_failing_exe() -> Result<()> {
    let fx = Fixture::new(FAILING_EXE)?;
    let err = fx.setup(&[]).unwrap_err();
    assert!(format!("{err:#}").contains("non-zero exit status"));

    let logs = fx.out().join(BASE).join("pipelines/logs");
    assert_eq!("boom\n", read(&logs.join(format!("{BASE}.setup.stderr.txt"))));
    Ok(())
}

#[test]
fn test_no_mode_is_not_an_error() -> Result<()> {
    let args = Args::try_parse_from(["spark"])?;
    spark_cli::run_with(args)
}

#[test]
fn test_merged_analyses_keep_their_logs() -> Result<()> {
    let fx = Fixture::new(STUB_EXE)?;
    let other = "sub-02_task-rest_bold.nii.gz";
    let other_base = "sub-02_task-rest_bold";
    std::fs::write(fx.dir.path().join("data").join(other), "")?;

    fx.setup(&[])?;
    fx.run("--WRAP-UP", &["--move-outputs"])?;
    fx.setup_for(other, &[])?;
    fx.run_for(other, "--WRAP-UP", &["--move-outputs"])?;

    let logs = fx.out().join("pipelines/logs");
    let first = read(&logs.join(format!("{BASE}.setup.stdout.txt")));
    let second = read(&logs.join(format!("{other_base}.setup.stdout.txt")));
    assert!(first.contains(&format!("{BASE}.opt")));
    assert!(second.contains(&format!("{other_base}.opt")));
    assert!(fx.out().join("pipelines").join(format!("{BASE}.opt")).is_file());
    assert!(fx.out().join("pipelines").join(format!("{other_base}.opt")).is_file());
    Ok(())
}

#[test]
fn test_exit_codes() -> Result<()> {
    let fx = Fixture::new(STUB_EXE)?;
    let spark = |args: &[&str]| {
        let mut argv = vec!["spark".to_owned()];
        argv.extend(args.iter().map(|a| a.to_string()));
        argv
    };

    assert_eq!(Some(0), fx.exit_code(&spark(&[]))?, "no mode prints help");
    assert_eq!(Some(0), fx.exit_code(&spark(&["--help"]))?);
    assert_eq!(Some(0), fx.exit_code(&spark(&["--version"]))?);
    assert_eq!(Some(1), fx.exit_code(&spark(&["--SETUP", "--RUN"]))?, "usage error");
    assert_eq!(Some(1), fx.exit_code(&spark(&["--WRAP-UP", "--bogus"]))?);

    let mask = fx.path("data/mask.nii");
    let argv = fx.argv(FMRI_NAME, "--SETUP", &["--mask", mask.as_str(), "--nb-resamplings", "1"]);
    assert_eq!(Some(1), fx.exit_code(&argv)?, "validation error");
    assert!(!fx.out().exists());

    let argv = fx.argv(FMRI_NAME, "--SETUP", &["--mask", mask.as_str()]);
    assert_eq!(Some(0), fx.exit_code(&argv)?);
    assert!(fx.out().join(BASE).join("pipelines").join(format!("{BASE}.mat")).is_file());
    Ok(())
}
