//! Archive and canonical locations for a classified upload.

use super::UploadPath;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Filesystem locations involved in restoring one file. Computed per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestoreTarget {
    /// `<content>/<uploads>/<backup>/<year>/<month>/<file>`
    pub archive_path: PathBuf,
    /// `<content>/<uploads>/<year>/<month>/<file>`
    pub canonical_path: PathBuf,
    /// `<content>/<uploads>/<year>/<month>`
    pub canonical_dir: PathBuf,
}

impl RestoreTarget {
    pub fn compute(content_dir: &Path, backup_folder: &str, upload: &UploadPath) -> Self {
        let uploads_dir = content_dir.join(&upload.uploads);
        let canonical_dir = uploads_dir.join(&upload.year).join(&upload.month);
        let archive_path = uploads_dir
            .join(backup_folder)
            .join(&upload.year)
            .join(&upload.month)
            .join(&upload.file_name);
        let canonical_path = canonical_dir.join(&upload.file_name);
        Self {
            archive_path,
            canonical_path,
            canonical_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computes_archive_and_canonical_paths() {
        let upload = UploadPath {
            uploads: "uploads".into(),
            year: "2019".into(),
            month: "04".into(),
            file_name: "my file.png".into(),
        };
        let t = RestoreTarget::compute(Path::new("/srv/wp-content"), "__backup__", &upload);
        assert_eq!(
            t.archive_path,
            PathBuf::from("/srv/wp-content/uploads/__backup__/2019/04/my file.png")
        );
        assert_eq!(
            t.canonical_path,
            PathBuf::from("/srv/wp-content/uploads/2019/04/my file.png")
        );
        assert_eq!(t.canonical_dir, PathBuf::from("/srv/wp-content/uploads/2019/04"));
    }
}
