use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A directory entry, without following symlinks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub path: PathBuf,
    pub name: OsString,
    pub is_dir: bool,
}

/// List the entries of `dir`, sorted by name so walks are deterministic.
pub fn list_dir(dir: &Path) -> io::Result<Vec<DirEntry>> {
    let mut entries = Vec::with_capacity(16);
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        entries.push(DirEntry {
            path: entry.path(),
            name: entry.file_name(),
            // symlinks to dirs are treated like files, so walks never leave the tree:
            is_dir: entry.file_type()?.is_dir(),
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_list_dir_sorted() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("b.txt"), "")?;
        fs::create_dir(dir.path().join("a"))?;
        fs::write(dir.path().join("c.mat"), "")?;

        let entries = list_dir(dir.path())?;
        let names: Vec<_> = entries.iter().map(|e| e.name.to_str().unwrap()).collect();
        assert_eq!(vec!["a", "b.txt", "c.mat"], names);
        assert!(entries[0].is_dir);
        assert!(!entries[1].is_dir);
        assert_eq!(dir.path().join("c.mat"), entries[2].path);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_dir_is_not_a_dir() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir(dir.path().join("real"))?;
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("link"))?;
        let entries = list_dir(dir.path())?;
        assert_eq!("link", entries[0].name);
        assert!(!entries[0].is_dir);
        Ok(())
    }
}
