use std::io::{self, Write};
use std::path::Path;
use tempfile::{Builder, NamedTempFile};

const STAGING_PREFIX: &str = ".tabsplit-";

/// Writes `contents` to `target`, replacing any existing file.
///
/// Bytes go to a temporary file next to the target first, so a failed or
/// interrupted write never leaves a truncated file at the final path.
pub fn write_atomically(
    target: &Path,
    contents: impl FnOnce(&mut NamedTempFile) -> io::Result<()>,
) -> io::Result<()> {
    let dir = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = Builder::new()
        .prefix(STAGING_PREFIX)
        .suffix(".part")
        .tempfile_in(dir)?;

    contents(&mut tmp)?;
    tmp.flush()?;
    tmp.persist(target).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn replaces_existing_file_whole() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("out.csv");
        fs::write(&target, "old contents that are longer").unwrap();

        write_atomically(&target, |f| f.write_all(b"new")).unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "new");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn failed_write_leaves_no_file_behind() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("out.csv");
        let err = write_atomically(&target, |_| Err(io::Error::other("boom"))).unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert!(!target.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("missing").join("out.csv");
        assert!(write_atomically(&target, |f| f.write_all(b"x")).is_err());
    }
}
