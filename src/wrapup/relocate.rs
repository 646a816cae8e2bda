use std::path::Path;

use anyhow::{Context, Result};

use crate::fs::Fs;

use super::Error;

/// Move the contents of `analysis_dir` up into the output directory,
/// then remove the emptied tree. `staging_dir` is where the analysis
/// directory is parked while it is emptied.
///
/// Returns the number of moved files.
pub fn relocate(fs: &Fs, analysis_dir: &Path, staging_dir: &Path) -> Result<usize> {
    if fs.exists(staging_dir) {
        return Err(Error::StagingExists(staging_dir.to_path_buf()).into());
    }
    fs.rename(analysis_dir, staging_dir)?;

    let mut moved = 0;
    move_children(fs, staging_dir, fs.output_prefix(), &mut moved)?;
    fs.remove_dir(staging_dir)?;
    Ok(moved)
}

fn move_children(fs: &Fs, from: &Path, to: &Path, moved: &mut usize) -> Result<()> {
    let entries = fs
        .read_dir(from)
        .with_context(|| format!("while listing {from:?}"))?;

    for entry in entries {
        let target = to.join(&entry.name);
        if entry.is_dir {
            fs.create_dir(&target)?;
            move_children(fs, &entry.path, &target, moved)?;
            fs.remove_dir(&entry.path)?;
        } else {
            fs.rename(&entry.path, &target)?;
            *moved += 1;
        }
    }
    Ok(())
}
