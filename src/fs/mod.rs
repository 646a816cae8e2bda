use std::path::{Path, PathBuf};
use std::{fs, io};

use anyhow::{Context, Result};

use util::path_str;

/// Defines fns for creating common paths in the output directory
mod paths;

/// Directory listing helpers
mod ops;
pub use ops::{list_dir, DirEntry};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Specified output directory \"{0}\" is not a directory")]
    NotDirectory(String),
    #[error("Can't perform IO operation: \"{0}\" is outside the output directory")]
    NotWhitelisted(String),
}

/// All file operations in the crate should go through this struct.
///
/// All destructive operations check that the path in question is inside the
/// output directory, otherwise they will not be performed. The SPARK
/// application itself is not bound by this rule.
#[derive(Debug)]
pub struct Fs {
    /// The directory we are allowed to modify
    output_prefix: PathBuf,
}

impl Fs {
    /// Create a new `Fs` with the given (absolute) output directory.
    pub fn new(output_prefix: &Path) -> Self {
        Self {
            output_prefix: output_prefix.to_path_buf(),
        }
    }

    pub fn output_prefix(&self) -> &Path {
        &self.output_prefix
    }

    /// Check if path exists on disk.
    pub fn exists<T: AsRef<Path>>(&self, path: T) -> bool {
        let path = path.as_ref();
        path.exists() || path.is_symlink()
    }

    /// Create a directory and its parents.
    /// Returns false if it already existed, in which case old files may get replaced.
    pub fn ensure_dir<T: AsRef<Path>>(&self, path: T) -> Result<bool> {
        let path = path.as_ref();
        self.check_whitelist(path)?;
        if path.is_dir() {
            log::warn!("Old files might get replaced in the already existing directory {path:?}");
            Ok(false)
        } else if self.exists(path) {
            Err(Error::NotDirectory(path_str(path)?.to_owned()).into())
        } else {
            log::debug!("creating directory {path:?}");
            fs::create_dir_all(path).with_context(|| format!("creating directory {path:?}"))?;
            Ok(true)
        }
    }

    /// Create a directory and its parents, silently accepting an existing one.
    pub fn create_dir<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        let path = path.as_ref();
        self.check_whitelist(path)?;
        fs::create_dir_all(path).with_context(|| format!("creating directory {path:?}"))?;
        Ok(())
    }

    /// Create a file, and return a writable `File` handle.
    pub fn create_file<T: AsRef<Path>>(&self, path: T) -> Result<fs::File> {
        let path = path.as_ref();
        self.check_whitelist(path)?;
        let f = fs::File::create(path).with_context(|| format!("creating file {path:?}"))?;
        Ok(f)
    }

    /// Write entire str to a file.
    pub fn write_file<T: AsRef<Path>>(&self, path: T, text: &str) -> Result<()> {
        let path = path.as_ref();
        self.check_whitelist(path)?;
        fs::write(path, text).with_context(|| format!("writing file {path:?}"))?;
        Ok(())
    }

    /// Read entire file into a String.
    pub fn read_to_buf<T: AsRef<Path>>(&self, path: T, strbuf: &mut String) -> Result<()> {
        use std::io::Read;
        let path = path.as_ref();
        strbuf.clear();
        let mut f = fs::File::open(path).with_context(|| format!("opening {path:?}"))?;
        f.read_to_string(strbuf)
            .with_context(|| format!("reading {path:?}"))?;
        Ok(())
    }

    /// Move a file or directory. Both paths must be inside the output directory.
    pub fn rename<T: AsRef<Path>, U: AsRef<Path>>(&self, from: T, to: U) -> Result<()> {
        let (from, to) = (from.as_ref(), to.as_ref());
        self.check_whitelist(from)?;
        self.check_whitelist(to)?;
        log::trace!("moving {from:?} to {to:?}");
        fs::rename(from, to).with_context(|| format!("moving {from:?} to {to:?}"))?;
        Ok(())
    }

    /// Remove an empty directory.
    pub fn remove_dir<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        let path = path.as_ref();
        self.check_whitelist(path)?;
        fs::remove_dir(path).with_context(|| format!("removing directory {path:?}"))?;
        Ok(())
    }

    /// List entries in a directory, sorted by name.
    pub fn read_dir<T: AsRef<Path>>(&self, path: T) -> Result<Vec<DirEntry>, io::Error> {
        list_dir(path.as_ref())
    }

    fn is_whitelisted(&self, path: &Path) -> bool {
        path.starts_with(&self.output_prefix)
    }

    fn check_whitelist(&self, path: &Path) -> Result<()> {
        if self.is_whitelisted(path) {
            Ok(())
        } else {
            Err(Error::NotWhitelisted(path_str(path)?.to_owned()).into())
        }
    }
}
