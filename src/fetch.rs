//! URL fetch for `text/x-url` parts.
//!
//! Single streaming GET via libcurl, body written straight into the target
//! file. No retries and no partial-file cleanup; a failed fetch propagates
//! and leaves whatever was written.

use crate::error::PartError;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

/// Downloads `url` into `dest`, truncating any existing file.
/// Returns the number of bytes written.
pub fn fetch_to_file(url: &str, dest: &Path) -> Result<u64, PartError> {
    let mut file = File::create(dest).map_err(|e| PartError::Write {
        path: dest.to_path_buf(),
        source: e,
    })?;

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(Duration::from_secs(30))?;
    easy.timeout(Duration::from_secs(300))?;

    let mut written: u64 = 0;
    let mut write_err: Option<std::io::Error> = None;
    let perform_result = {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| match file.write_all(data) {
            Ok(()) => {
                written += data.len() as u64;
                Ok(data.len())
            }
            Err(e) => {
                write_err = Some(e);
                Ok(0) // abort transfer
            }
        })?;
        transfer.perform()
    };

    // A file-write failure aborts the transfer; report it rather than the
    // curl "aborted by callback" error it causes.
    if let Some(e) = write_err {
        return Err(PartError::Write {
            path: dest.to_path_buf(),
            source: e,
        });
    }
    perform_result?;

    // Non-HTTP schemes (e.g. file://) report status 0.
    let code = easy.response_code()?;
    if code != 0 && !(200..300).contains(&code) {
        return Err(PartError::Http {
            url: url.to_string(),
            code,
        });
    }

    tracing::debug!(url, dest = %dest.display(), written, "fetched URL part");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_url(path: &Path) -> String {
        format!("file://{}", path.display())
    }

    #[test]
    fn fetch_file_url() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.txt");
        std::fs::write(&src, b"served bytes").unwrap();

        let dest = dir.path().join("dest.txt");
        let n = fetch_to_file(&file_url(&src), &dest).unwrap();
        assert_eq!(n, 12);
        assert_eq!(std::fs::read(&dest).unwrap(), b"served bytes");
    }

    #[test]
    fn fetch_overwrites_existing_dest() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.txt");
        std::fs::write(&src, b"new").unwrap();

        let dest = dir.path().join("dest.txt");
        std::fs::write(&dest, b"old old old").unwrap();
        fetch_to_file(&file_url(&src), &dest).unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"new");
    }

    #[test]
    fn fetch_missing_source_errors() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("no-such-file");
        let dest = dir.path().join("dest.txt");
        assert!(fetch_to_file(&file_url(&src), &dest).is_err());
    }
}
