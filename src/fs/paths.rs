use std::path::{Path, PathBuf};

use super::Fs;

/// Utility fns for making the paths of one analysis.
/// Every handler locates the same artifacts through these.
impl Fs {
    /// $OUTPUT/base
    pub fn analysis_dir<'a>(&self, base: &str, buf: &'a mut PathBuf) -> &'a Path {
        self.parts2(&self.output_prefix, base, buf)
    }

    /// $OUTPUT/base/pipelines
    pub fn pipelines_dir<'a>(&self, base: &str, buf: &'a mut PathBuf) -> &'a Path {
        self.parts3(&self.output_prefix, base, "pipelines", buf)
    }

    /// $OUTPUT/base/pipelines/base.opt
    pub fn options_file<'a>(&self, base: &str, buf: &'a mut PathBuf) -> &'a Path {
        self.pipelines_dir(base, buf);
        buf.push(format!("{base}.opt"));
        &*buf
    }

    /// $OUTPUT/base/pipelines/base.mat
    pub fn pipeline_file<'a>(&self, base: &str, buf: &'a mut PathBuf) -> &'a Path {
        self.pipelines_dir(base, buf);
        buf.push(format!("{base}.mat"));
        &*buf
    }

    /// $OUTPUT/base/pipelines/logs
    /// (log names start with the base name, so merged analyses keep theirs)
    pub fn logs_dir<'a>(&self, base: &str, buf: &'a mut PathBuf) -> &'a Path {
        self.pipelines_dir(base, buf);
        buf.push("logs");
        &*buf
    }

    /// $OUTPUT/.base.relocating
    pub fn staging_dir<'a>(&self, base: &str, buf: &'a mut PathBuf) -> &'a Path {
        self.parts2(&self.output_prefix, format!(".{base}.relocating"), buf)
    }

    fn parts2<'a, T, U>(&self, p1: T, p2: U, buf: &'a mut PathBuf) -> &'a Path
    where
        T: AsRef<Path>,
        U: AsRef<Path>,
    {
        buf.clear();
        buf.push(p1);
        buf.push(p2);
        &*buf
    }

    fn parts3<'a, T, U, V>(&self, p1: T, p2: U, p3: V, buf: &'a mut PathBuf) -> &'a Path
    where
        T: AsRef<Path>,
        U: AsRef<Path>,
        V: AsRef<Path>,
    {
        buf.clear();
        buf.push(p1);
        buf.push(p2);
        buf.push(p3);
        &*buf
    }
}
