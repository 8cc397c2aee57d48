//! Upload path classification.
//!
//! Only one layout is restorable: `<content-root>/<uploads>/<year>/<month>/<file>`.
//! Classification is pure string work and never touches the filesystem.

mod decode;
mod target;

pub use decode::{decode_file_name, os_file_name};
pub use target::RestoreTarget;

use std::ffi::OsString;
use thiserror::Error;

/// Number of segments in a restorable upload path.
pub const UPLOAD_SEGMENTS: usize = 5;

/// Path segments with leading/trailing slashes trimmed and empty segments dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegments(Vec<String>);

impl PathSegments {
    pub fn from_path(path: &str) -> Self {
        Self(
            path.trim_matches('/')
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// A request that names a file inside the uploads tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPath {
    pub uploads: String,
    pub year: String,
    pub month: String,
    /// URL-decoded file name, byte for byte as it appears on disk.
    pub file_name: OsString,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ShapeError {
    #[error("expected {} path segments, got {0}", UPLOAD_SEGMENTS)]
    SegmentCount(usize),
    #[error("first segment {0:?} is not the content root")]
    ContentRoot(String),
    #[error("second segment {0:?} is not the uploads folder")]
    Uploads(String),
    #[error("segment {0:?} cannot be used as a path component")]
    Component(String),
}

/// Classifies `segments` against the upload layout.
pub fn classify(
    segments: &PathSegments,
    content_root_label: &str,
    uploads_label: &str,
) -> Result<UploadPath, ShapeError> {
    let [root, uploads, year, month, raw_name] = segments.as_slice() else {
        return Err(ShapeError::SegmentCount(segments.len()));
    };
    if root != content_root_label {
        return Err(ShapeError::ContentRoot(root.clone()));
    }
    if uploads != uploads_label {
        return Err(ShapeError::Uploads(uploads.clone()));
    }
    for dir in [year, month] {
        if !is_plain_component(dir.as_bytes()) {
            return Err(ShapeError::Component(dir.clone()));
        }
    }
    let file_name = decode_file_name(raw_name);
    if !is_plain_component(&file_name) {
        return Err(ShapeError::Component(
            String::from_utf8_lossy(&file_name).into_owned(),
        ));
    }

    Ok(UploadPath {
        uploads: uploads.clone(),
        year: year.clone(),
        month: month.clone(),
        file_name: os_file_name(file_name),
    })
}

/// Rejects anything that would escape or alias its parent directory once joined.
fn is_plain_component(s: &[u8]) -> bool {
    !s.is_empty()
        && s != b"."
        && s != b".."
        && !s.iter().any(|b| matches!(b, b'/' | b'\\' | b'\0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_path(path: &str) -> Result<UploadPath, ShapeError> {
        classify(&PathSegments::from_path(path), "wp-content", "uploads")
    }

    #[test]
    fn segments_trim_and_drop_empties() {
        let s = PathSegments::from_path("//wp-content//uploads/2019/04/a.jpg/");
        assert_eq!(s.len(), 5);
        assert_eq!(s.as_slice()[0], "wp-content");
        assert_eq!(s.as_slice()[4], "a.jpg");
        assert!(PathSegments::from_path("/").is_empty());
    }

    #[test]
    fn classifies_upload_path() {
        let up = classify_path("/wp-content/uploads/2019/04/photo.jpg").unwrap();
        assert_eq!(up.uploads, "uploads");
        assert_eq!(up.year, "2019");
        assert_eq!(up.month, "04");
        assert_eq!(up.file_name, "photo.jpg");
    }

    #[test]
    fn wrong_segment_counts() {
        assert_eq!(
            ShapeError::SegmentCount(4).to_string(),
            format!("expected {UPLOAD_SEGMENTS} path segments, got 4")
        );
        assert_eq!(
            classify_path("/wp-content/uploads/2019/photo.jpg"),
            Err(ShapeError::SegmentCount(4))
        );
        assert_eq!(
            classify_path("/wp-content/uploads/2019/04/extra/photo.jpg"),
            Err(ShapeError::SegmentCount(6))
        );
        assert_eq!(classify_path("/"), Err(ShapeError::SegmentCount(0)));
    }

    #[test]
    fn wrong_labels() {
        assert_eq!(
            classify_path("/static/uploads/2019/04/x.jpg"),
            Err(ShapeError::ContentRoot("static".into()))
        );
        assert_eq!(
            classify_path("/wp-content/media/2019/04/x.jpg"),
            Err(ShapeError::Uploads("media".into()))
        );
    }

    #[test]
    fn file_name_is_decoded() {
        let up = classify_path("/wp-content/uploads/2019/04/my%20file.png").unwrap();
        assert_eq!(up.file_name, "my file.png");
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_file_name_keeps_bytes() {
        use std::os::unix::ffi::OsStrExt;
        let up = classify_path("/wp-content/uploads/2019/04/caf%E9.jpg").unwrap();
        assert_eq!(up.file_name.as_bytes(), b"caf\xe9.jpg");
    }

    #[test]
    fn encoded_separators_are_rejected() {
        assert!(matches!(
            classify_path("/wp-content/uploads/2019/04/..%2F..%2Fwp-config.php"),
            Err(ShapeError::Component(_))
        ));
        assert!(matches!(
            classify_path("/wp-content/uploads/2019/04/%2E%2E"),
            Err(ShapeError::Component(_))
        ));
        assert!(matches!(
            classify_path("/wp-content/uploads/2019/04/a%00b"),
            Err(ShapeError::Component(_))
        ));
    }

    #[test]
    fn dot_directories_are_rejected() {
        assert!(matches!(
            classify_path("/wp-content/uploads/../04/x.jpg"),
            Err(ShapeError::Component(_))
        ));
    }
}
