//! Part dispatch and file materialization.
//!
//! The part processor calls `handle` once per MIME part. Lifecycle markers
//! are no-ops; data parts are written, decoded, or fetched into
//! `<base_dir>/<filename>`.

use crate::content_type::{ContentType, ACCEPTED_TYPES};
use crate::decode::decode_octet_stream;
use crate::error::PartError;
use crate::fetch::fetch_to_file;
use crate::part::Part;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Fixed mode for the base directory.
pub const DIR_MODE: u32 = 0o700;

/// Plugin contract with the boot-time part processor: one query for the
/// declared types, one operation per delivered part.
pub trait PartHandler {
    /// Content types this handler accepts.
    fn accepted_types(&self) -> &'static [ContentType];

    /// Handles one part. Lifecycle markers must produce no side effects.
    fn handle(&self, part: &Part) -> Result<(), PartError>;
}

/// Handler that materializes parts as files under a single base directory.
#[derive(Debug, Clone)]
pub struct CloudConfHandler {
    base_dir: PathBuf,
}

impl CloudConfHandler {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        CloudConfHandler {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Creates the base directory with mode `DIR_MODE` if it does not exist.
    /// Pre-existence is fine; any other failure surfaces.
    fn ensure_base_dir(&self) -> Result<(), PartError> {
        let mut builder = fs::DirBuilder::new();
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(DIR_MODE);
        }
        match builder.create(&self.base_dir) {
            Ok(()) => {
                tracing::info!(dir = %self.base_dir.display(), "created base directory");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(()),
            Err(e) => Err(PartError::CreateDir {
                path: self.base_dir.clone(),
                source: e,
            }),
        }
    }

    /// Target path for a part. Joined verbatim: a crafted filename like
    /// "../x" escapes the base directory. User-data comes from the instance
    /// owner via the provisioner, so the filename is trusted. Known gap,
    /// kept as-is.
    fn target_path(&self, filename: &str) -> PathBuf {
        self.base_dir.join(filename)
    }

    fn write_target(&self, target: &Path, bytes: &[u8]) -> Result<(), PartError> {
        fs::write(target, bytes).map_err(|e| PartError::Write {
            path: target.to_path_buf(),
            source: e,
        })
    }
}

impl PartHandler for CloudConfHandler {
    fn accepted_types(&self) -> &'static [ContentType] {
        ACCEPTED_TYPES
    }

    fn handle(&self, part: &Part) -> Result<(), PartError> {
        match part.content_type {
            // Sequence markers carry no data; no filesystem effects.
            ContentType::Begin | ContentType::End => Ok(()),
            ContentType::TextPlain => {
                self.ensure_base_dir()?;
                let target = self.target_path(&part.filename);
                tracing::info!(file = %target.display(), bytes = part.payload.len(), "writing text part");
                self.write_target(&target, &part.payload)
            }
            ContentType::OctetStream => {
                self.ensure_base_dir()?;
                let target = self.target_path(&part.filename);
                let raw = decode_octet_stream(&part.payload)?;
                tracing::info!(file = %target.display(), bytes = raw.len(), "writing binary part");
                self.write_target(&target, &raw)
            }
            ContentType::UrlReference => {
                self.ensure_base_dir()?;
                let target = self.target_path(&part.filename);
                let url = std::str::from_utf8(&part.payload)?.trim();
                url::Url::parse(url)?;
                tracing::info!(url, file = %target.display(), "downloading URL part");
                fetch_to_file(url, &target)?;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use tempfile::TempDir;

    fn handler(tmp: &TempDir) -> CloudConfHandler {
        CloudConfHandler::new(tmp.path().join("cloudconf"))
    }

    #[test]
    fn sentinels_have_no_effects() {
        let tmp = tempfile::tempdir().unwrap();
        let h = handler(&tmp);
        for ct in [ContentType::Begin, ContentType::End] {
            h.handle(&Part::new(ct, "ignored", Vec::new())).unwrap();
        }
        // Not even the base directory is created.
        assert!(!h.base_dir().exists());
    }

    #[test]
    fn text_part_written_verbatim() {
        let tmp = tempfile::tempdir().unwrap();
        let h = handler(&tmp);
        let part = Part::new(ContentType::TextPlain, "app.properties", b"a=1\nb=2\n".to_vec());
        h.handle(&part).unwrap();
        let written = fs::read(h.base_dir().join("app.properties")).unwrap();
        assert_eq!(written, b"a=1\nb=2\n");
    }

    #[cfg(unix)]
    #[test]
    fn base_dir_created_with_fixed_mode() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = tempfile::tempdir().unwrap();
        let h = handler(&tmp);
        h.handle(&Part::new(ContentType::TextPlain, "f", b"x".to_vec()))
            .unwrap();
        let mode = fs::metadata(h.base_dir()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, DIR_MODE);
    }

    #[test]
    fn octet_stream_double_decoded() {
        let tmp = tempfile::tempdir().unwrap();
        let h = handler(&tmp);
        let raw = [0u8, 159, 146, 150, 255];
        let wire = STANDARD.encode(STANDARD.encode(raw)).into_bytes();
        h.handle(&Part::new(ContentType::OctetStream, "blob.bin", wire))
            .unwrap();
        assert_eq!(fs::read(h.base_dir().join("blob.bin")).unwrap(), raw);
    }

    #[test]
    fn malformed_octet_stream_propagates() {
        let tmp = tempfile::tempdir().unwrap();
        let h = handler(&tmp);
        let err = h
            .handle(&Part::new(ContentType::OctetStream, "blob.bin", b"%%%".to_vec()))
            .unwrap_err();
        assert!(matches!(err, PartError::Decode(_)));
        assert!(!h.base_dir().join("blob.bin").exists());
    }

    #[test]
    fn url_part_downloaded_into_target() {
        let tmp = tempfile::tempdir().unwrap();
        let h = handler(&tmp);
        let src = tmp.path().join("served.bin");
        fs::write(&src, b"remote content").unwrap();
        let url = format!("file://{}\n", src.display());
        h.handle(&Part::new(ContentType::UrlReference, "fetched", url.into_bytes()))
            .unwrap();
        assert_eq!(
            fs::read(h.base_dir().join("fetched")).unwrap(),
            b"remote content"
        );
    }

    #[test]
    fn url_part_rejects_non_url_payload() {
        let tmp = tempfile::tempdir().unwrap();
        let h = handler(&tmp);
        let err = h
            .handle(&Part::new(
                ContentType::UrlReference,
                "f",
                b"not a url".to_vec(),
            ))
            .unwrap_err();
        assert!(matches!(err, PartError::InvalidUrl(_)));
    }

    #[test]
    fn handling_twice_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let h = handler(&tmp);
        let part = Part::new(ContentType::TextPlain, "f", b"payload".to_vec());
        h.handle(&part).unwrap();
        h.handle(&part).unwrap();
        assert_eq!(fs::read(h.base_dir().join("f")).unwrap(), b"payload");
    }

    #[test]
    fn rewrite_truncates_longer_previous_content() {
        let tmp = tempfile::tempdir().unwrap();
        let h = handler(&tmp);
        h.handle(&Part::new(ContentType::TextPlain, "f", b"a much longer payload".to_vec()))
            .unwrap();
        h.handle(&Part::new(ContentType::TextPlain, "f", b"short".to_vec()))
            .unwrap();
        assert_eq!(fs::read(h.base_dir().join("f")).unwrap(), b"short");
    }

    #[test]
    fn base_dir_creation_failure_surfaces() {
        let tmp = tempfile::tempdir().unwrap();
        // A regular file where the parent directory should be makes creation
        // fail with something other than AlreadyExists.
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, b"in the way").unwrap();
        let h = CloudConfHandler::new(blocker.join("cloudconf"));
        let err = h
            .handle(&Part::new(ContentType::TextPlain, "f", b"x".to_vec()))
            .unwrap_err();
        assert!(matches!(err, PartError::CreateDir { .. }));
    }

    #[test]
    fn url_part_rejects_non_utf8_payload() {
        let tmp = tempfile::tempdir().unwrap();
        let h = handler(&tmp);
        let err = h
            .handle(&Part::new(ContentType::UrlReference, "f", vec![0xff, 0xfe]))
            .unwrap_err();
        assert!(matches!(err, PartError::Utf8(_)));
    }

    #[test]
    fn pre_existing_base_dir_is_fine() {
        let tmp = tempfile::tempdir().unwrap();
        let h = handler(&tmp);
        fs::create_dir_all(h.base_dir()).unwrap();
        h.handle(&Part::new(ContentType::TextPlain, "f", b"x".to_vec()))
            .unwrap();
        assert_eq!(fs::read(h.base_dir().join("f")).unwrap(), b"x");
    }

    // Documents the unsanitized join: a "../" filename writes outside the
    // base directory. Intentional (trusted input), not a feature.
    #[test]
    fn traversal_filename_escapes_base_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let h = handler(&tmp);
        h.handle(&Part::new(
            ContentType::TextPlain,
            "../escaped.txt",
            b"outside".to_vec(),
        ))
        .unwrap();
        assert!(tmp.path().join("escaped.txt").exists());
        assert!(!h.base_dir().join("escaped.txt").exists());
    }

    #[test]
    fn accepted_types_are_the_data_types() {
        let tmp = tempfile::tempdir().unwrap();
        let h = handler(&tmp);
        let types = h.accepted_types();
        assert_eq!(types.len(), 3);
        assert!(types.contains(&ContentType::TextPlain));
        assert!(types.contains(&ContentType::OctetStream));
        assert!(types.contains(&ContentType::UrlReference));
    }
}
