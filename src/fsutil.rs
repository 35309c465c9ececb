use std::io;
use std::path::{Path, PathBuf};

/// Error that occurs when listing a directory fails.
#[derive(Debug, thiserror::Error)]
#[error("failed to list directory `{path}`: {source}")]
pub struct ReadDirError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Error that occurs when reading a file fails.
#[derive(Debug, thiserror::Error)]
#[error("failed to read file `{path}`: {source}")]
pub struct FileReadError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Lists the names of all entries of the directory at `path`.
///
/// Entry names that are not valid UTF-8 are skipped and logged, since neither
/// pod identifiers nor unit names can contain them.
///
/// # Errors
///
/// Returns a [`ReadDirError`] if the directory cannot be opened or if reading
/// any entry fails. A partial listing is never returned.
///
/// # Example
/// ```no_run
/// # use scope_reaper::fsutil;
/// let names = fsutil::read_dir_names("/var/lib/kubelet/pods")?;
/// # Ok::<(), fsutil::ReadDirError>(())
/// ```
pub fn read_dir_names(path: impl AsRef<Path>) -> Result<Vec<String>, ReadDirError> {
    let path = path.as_ref();
    let to_err = |source| ReadDirError {
        path: path.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in std::fs::read_dir(path).map_err(to_err)? {
        let entry = entry.map_err(to_err)?;
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(name) => log::debug!(
                "Skipping non UTF-8 entry `{}` in `{}`",
                name.to_string_lossy(),
                path.display()
            ),
        }
    }

    Ok(names)
}

/// Reads the file at `path` into a string, replacing invalid UTF-8 sequences.
///
/// # Errors
///
/// Returns a [`FileReadError`] if the file cannot be read.
pub fn read_to_string_lossy(path: impl AsRef<Path>) -> Result<String, FileReadError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| FileReadError {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_read_dir_names_success() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        std::fs::create_dir(tmp.path().join("a")).unwrap();
        std::fs::write(tmp.path().join("b"), "").unwrap();

        let mut names = read_dir_names(tmp.path()).expect("should list temp dir");
        names.sort();
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_read_dir_names_error() {
        let result = read_dir_names("/definitely/does/not/exist");
        let err = result.unwrap_err();
        assert_eq!(err.path, PathBuf::from("/definitely/does/not/exist"));
        assert_eq!(err.source.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn test_read_to_string_lossy_replaces_invalid_utf8() {
        let tmp = tempfile::NamedTempFile::new().expect("failed to create temp file");
        std::fs::write(tmp.path(), b"abc\xffdef").unwrap();

        let contents = read_to_string_lossy(tmp.path()).unwrap();
        assert_eq!(contents, "abc\u{FFFD}def");
    }

    #[test]
    fn test_read_to_string_lossy_error() {
        let err = read_to_string_lossy("/definitely/does/not/exist").unwrap_err();
        assert_eq!(err.source.kind(), std::io::ErrorKind::NotFound);
    }
}
