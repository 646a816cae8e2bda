use std::path::Path;

use anyhow::{Context, Result};

use crate::fs::Fs;

/// Replaces the SPARK application's internal name with the BIDS base name
/// throughout an analysis directory.
pub struct Renamer<'a> {
    fs: &'a Fs,
    from: &'a str,
    to: &'a str,
    renamed: usize,
}

impl<'a> Renamer<'a> {
    pub fn new(fs: &'a Fs, from: &'a str, to: &'a str) -> Self {
        Self {
            fs,
            from,
            to,
            renamed: 0,
        }
    }

    /// Rename everything below `root` (but not `root` itself).
    /// Returns the number of renamed entries.
    pub fn rename_tree(mut self, root: &Path) -> Result<usize> {
        if self.from.is_empty() || self.from == self.to {
            log::debug!("nothing to rename: {:?} -> {:?}", self.from, self.to);
            return Ok(0);
        }
        self.rename_children(root)?;
        Ok(self.renamed)
    }

    fn rename_children(&mut self, dir: &Path) -> Result<()> {
        let entries = self
            .fs
            .read_dir(dir)
            .with_context(|| format!("while listing {dir:?}"))?;

        for entry in entries {
            let Some(name) = entry.name.to_str() else {
                log::warn!("skipping non UTF-8 name {:?}", entry.path);
                continue;
            };

            if entry.is_dir {
                // contents first, so their paths stay valid:
                self.rename_children(&entry.path)?;
                if name == self.from {
                    self.rename(&entry.path, dir, self.to)?;
                }
            } else if name.contains(self.from) {
                let new_name = name.replace(self.from, self.to);
                self.rename(&entry.path, dir, &new_name)?;
            }
        }
        Ok(())
    }

    fn rename(&mut self, path: &Path, parent: &Path, new_name: &str) -> Result<()> {
        let target = parent.join(new_name);
        log::debug!("renaming {path:?} to {new_name}");
        self.fs.rename(path, &target)?;
        self.renamed += 1;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_file_and_dir_renamed() -> Result<()> {
        let dir = tempdir()?;
        let root = dir.path().join("bidsBase");
        fs::create_dir_all(root.join("internalTag"))?;
        fs::write(root.join("internalTag/foo_internalTag_bar.mat"), "k")?;

        let fs_ = Fs::new(dir.path());
        let count = Renamer::new(&fs_, "internalTag", "bidsBase").rename_tree(&root)?;

        assert_eq!(2, count);
        assert!(root.join("bidsBase/foo_bidsBase_bar.mat").is_file());
        assert!(!root.join("internalTag").exists());
        Ok(())
    }

    #[test]
    fn test_nested_and_partial_matches() -> Result<()> {
        let dir = tempdir()?;
        let root = dir.path().join("base");
        // a dir merely containing the fragment keeps its name:
        fs::create_dir_all(root.join("tag/x_tag_dir/tag"))?;
        fs::write(root.join("tag/x_tag_dir/tag/a_tag_tag.mat"), "")?;
        fs::write(root.join("untouched.txt"), "")?;

        let fs_ = Fs::new(dir.path());
        let count = Renamer::new(&fs_, "tag", "B").rename_tree(&root)?;

        assert_eq!(3, count);
        assert!(root.join("B/x_tag_dir/B/a_B_B.mat").is_file());
        assert!(root.join("untouched.txt").is_file());
        Ok(())
    }

    #[test]
    fn test_root_never_renamed() -> Result<()> {
        let dir = tempdir()?;
        let root = dir.path().join("tag");
        fs::create_dir_all(&root)?;

        let fs_ = Fs::new(dir.path());
        assert_eq!(0, Renamer::new(&fs_, "tag", "B").rename_tree(&root)?);
        assert!(root.is_dir());
        Ok(())
    }
}
