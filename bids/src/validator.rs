use crate::{parse_func_filename, Error};

/// Decides whether a dataset-relative path (e.g. `/sub-01/func/sub-01_task-rest_bold.nii.gz`)
/// names valid functional data.
///
/// Derivation only depends on this trait, so the rule set can be swapped for a
/// stricter or more permissive one.
pub trait BidsValidator {
    fn validate(&self, relative: &str) -> Result<(), Error>;
}

/// Default rule set: `/sub-<label>/[ses-<label>/]func/<filename>`, where the
/// filename follows the BIDS `func` grammar and its `sub`/`ses` entities match
/// the enclosing directories.
#[derive(Debug, Default, Clone, Copy)]
pub struct FuncValidator;

impl BidsValidator for FuncValidator {
    fn validate(&self, relative: &str) -> Result<(), Error> {
        let invalid = |reason| Error::Path {
            path: relative.to_owned(),
            reason,
        };

        let parts: Vec<&str> = relative
            .strip_prefix('/')
            .ok_or_else(|| invalid("path must start with '/'"))?
            .split('/')
            .collect();

        let (sub_dir, ses_dir, filename) = match parts.as_slice() {
            [sub, "func", file] => (*sub, None, *file),
            [sub, ses, "func", file] => (*sub, Some(*ses), *file),
            _ => return Err(invalid("expected sub-<label>/[ses-<label>/]func/<file>")),
        };

        let name = parse_func_filename(filename)?;

        if sub_dir.strip_prefix("sub-") != Some(name.subject.as_str()) {
            return Err(invalid("subject directory does not match the filename"));
        }
        match (ses_dir, name.session.as_deref()) {
            (None, None) => {}
            (Some(dir), Some(ses)) if dir.strip_prefix("ses-") == Some(ses) => {}
            _ => return Err(invalid("session directory does not match the filename")),
        }

        log::trace!("valid BIDS path {relative}");
        Ok(())
    }
}
