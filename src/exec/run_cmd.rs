use std::fs::File;
use std::io::{stderr, stdout, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::fs::Fs;

use super::Error;

/// Run a subprocess, echoing its stdout and stderr to ours while also saving
/// them to `<log_prefix>.stdout.txt` and `<log_prefix>.stderr.txt`.
pub fn run_cmd(cmd: &mut Command, log_prefix: &Path, fs: &Fs, verbose: bool) -> Result<ExitStatus> {
    let (out_file, err_file) = make_log_files(fs, log_prefix)?;

    if verbose {
        eprintln!("{}", "Running SPARK application...".magenta());
    }
    let mut child = cmd
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| {
            format!(
                "failed to execute child process {:?} {:?}",
                cmd.get_program(),
                cmd.get_args().collect::<Vec<_>>(),
            )
        })?;

    let child_out = child.stdout.take().ok_or(Error::NoPipe("stdout"))?;
    let child_err = child.stderr.take().ok_or(Error::NoPipe("stderr"))?;

    let thread_out = thread::spawn(move || communicate(child_out, out_file, stdout()));
    let thread_err = thread::spawn(move || communicate(child_err, err_file, stderr()));

    let out_result = thread_out.join().map_err(|_| Error::LogThread("stdout"))?;
    let err_result = thread_err.join().map_err(|_| Error::LogThread("stderr"))?;

    // wait before reporting copy errors, so the child is never left unreaped:
    let status = child.wait().context("failed to wait on child process")?;
    out_result.context("copying child stdout")?;
    err_result.context("copying child stderr")?;

    if verbose {
        eprintln!("\n{} with {status}.", "Process finished".green());
    }
    Ok(status)
}

fn communicate<R: Read, W: Write>(
    mut stream: R,
    mut file: File,
    mut output: W,
) -> std::io::Result<()> {
    let mut buf = [0u8; 1024];
    loop {
        let num_read = stream.read(&mut buf)?;
        if num_read == 0 {
            break;
        }

        let buf = &buf[..num_read];
        file.write_all(buf)?;
        output.write_all(buf)?;
    }

    Ok(())
}

fn make_log_files(fs: &Fs, log_prefix: &Path) -> Result<(File, File)> {
    let out_file = fs
        .create_file(with_suffix(log_prefix, ".stdout.txt"))
        .context("creating stdout log file")?;

    let err_file = fs
        .create_file(with_suffix(log_prefix, ".stderr.txt"))
        .context("creating stderr log file")?;

    Ok((out_file, err_file))
}

fn with_suffix(prefix: &Path, suffix: &str) -> PathBuf {
    let mut path = prefix.as_os_str().to_os_string();
    path.push(suffix);
    PathBuf::from(path)
}
