use std::path::{Path, PathBuf};

/// Resolve `program` to an absolute executable path
///
/// Paths and bare names found in `in_dir` resolve there first. Otherwise the
/// name is looked up in PATH.
pub fn find_executable_path<P>(program: &str, in_dir: P) -> Result<PathBuf, which::Error>
where
    P: AsRef<Path>,
{
    let local = which::which_in_global(program, Some(in_dir.as_ref().as_os_str()))
        .ok()
        .and_then(|mut found| found.next());

    match local {
        Some(path) => Ok(path),
        None => which::which(program),
    }
}
