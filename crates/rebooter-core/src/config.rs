use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Folder under the uploads directory that the year folders were moved into.
pub const BACKUP_FOLDER: &str = "__vendi_uploads_rebooter__";

/// Query key appended to redirects; a request carrying it is never reprocessed.
pub const GUARD_KEY: &str = "vur_reboot_attempt";

/// First URL segment of an upload request.
pub const CONTENT_ROOT_LABEL: &str = "wp-content";

/// Second URL segment of an upload request, and the uploads folder name on disk.
pub const UPLOADS_LABEL: &str = "uploads";

const DEFAULT_CONTENT_DIR: &str = "/var/www/html/wp-content";

/// Restorer configuration loaded from `~/.config/uploads-rebooter/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebooterConfig {
    /// Absolute directory the content-root URL segment maps to.
    pub content_dir: PathBuf,
    /// Expected first URL segment.
    #[serde(default = "default_content_root_label")]
    pub content_root_label: String,
    /// Expected second URL segment.
    #[serde(default = "default_uploads_label")]
    pub uploads_label: String,
    /// Archive folder inside the uploads directory.
    #[serde(default = "default_backup_folder")]
    pub backup_folder: String,
    /// Loop-guard query key.
    #[serde(default = "default_guard_key")]
    pub guard_key: String,
}

fn default_content_root_label() -> String {
    CONTENT_ROOT_LABEL.to_string()
}

fn default_uploads_label() -> String {
    UPLOADS_LABEL.to_string()
}

fn default_backup_folder() -> String {
    BACKUP_FOLDER.to_string()
}

fn default_guard_key() -> String {
    GUARD_KEY.to_string()
}

impl Default for RebooterConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from(DEFAULT_CONTENT_DIR),
            content_root_label: default_content_root_label(),
            uploads_label: default_uploads_label(),
            backup_folder: default_backup_folder(),
            guard_key: default_guard_key(),
        }
    }
}

impl RebooterConfig {
    /// Config rooted at `content_dir` with every other field at its default.
    pub fn with_content_dir(content_dir: impl Into<PathBuf>) -> Self {
        Self {
            content_dir: content_dir.into(),
            ..Self::default()
        }
    }

    /// Reject settings that would make computed paths or redirect URLs ambiguous.
    pub fn validate(&self) -> Result<()> {
        if !self.content_dir.is_absolute() {
            bail!(
                "content_dir must be absolute: {}",
                self.content_dir.display()
            );
        }
        check_component("content_root_label", &self.content_root_label)?;
        check_component("uploads_label", &self.uploads_label)?;
        check_component("backup_folder", &self.backup_folder)?;
        if self.guard_key.is_empty()
            || !self
                .guard_key
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~'))
        {
            bail!("guard_key must be non-empty and URL-safe: {:?}", self.guard_key);
        }
        Ok(())
    }
}

fn check_component(field: &str, value: &str) -> Result<()> {
    if value.is_empty()
        || value == "."
        || value == ".."
        || value.contains(&['/', '\\', '\0'][..])
    {
        bail!("{field} must be a single path component: {value:?}");
    }
    Ok(())
}

fn xdg_dirs() -> Result<xdg::BaseDirectories> {
    xdg::BaseDirectories::with_prefix("uploads-rebooter").context("locate XDG directories")
}

pub fn config_path() -> Result<PathBuf> {
    xdg_dirs()?
        .place_config_file("config.toml")
        .context("prepare config directory")
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<RebooterConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = RebooterConfig::default();
        let toml = toml::to_string_pretty(&default_cfg).context("serialize default config")?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create config dir {}", parent.display()))?;
        }
        fs::write(&path, toml)
            .with_context(|| format!("write default config {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load `path` if given, else the XDG config file if one exists, else defaults.
/// Never writes to disk.
pub fn load_existing(path: Option<&Path>) -> Result<RebooterConfig> {
    if let Some(path) = path {
        return load_from(path);
    }
    match xdg_dirs()?.find_config_file("config.toml") {
        Some(found) => load_from(&found),
        None => Ok(RebooterConfig::default()),
    }
}

/// Load configuration from an explicit file.
pub fn load_from(path: &Path) -> Result<RebooterConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg: RebooterConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = RebooterConfig::default();
        assert_eq!(cfg.content_dir, PathBuf::from("/var/www/html/wp-content"));
        assert_eq!(cfg.content_root_label, "wp-content");
        assert_eq!(cfg.uploads_label, "uploads");
        assert_eq!(cfg.backup_folder, "__vendi_uploads_rebooter__");
        assert_eq!(cfg.guard_key, "vur_reboot_attempt");
        cfg.validate().unwrap();
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = RebooterConfig::with_content_dir("/srv/site/wp-content");
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: RebooterConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_toml_only_content_dir() {
        let toml = r#"
            content_dir = "/srv/blog/wp-content"
        "#;
        let cfg: RebooterConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.content_dir, PathBuf::from("/srv/blog/wp-content"));
        assert_eq!(cfg.backup_folder, BACKUP_FOLDER);
        assert_eq!(cfg.guard_key, GUARD_KEY);
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            content_dir = "/srv/site/content"
            content_root_label = "content"
            uploads_label = "media"
            backup_folder = "_archive"
            guard_key = "restored"
        "#;
        let cfg: RebooterConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.content_root_label, "content");
        assert_eq!(cfg.uploads_label, "media");
        assert_eq!(cfg.backup_folder, "_archive");
        assert_eq!(cfg.guard_key, "restored");
        cfg.validate().unwrap();
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "content_dir = \"/srv/a/wp-content\"\n").unwrap();
        let cfg = load_from(&path).unwrap();
        assert_eq!(cfg.content_dir, PathBuf::from("/srv/a/wp-content"));
        assert!(load_from(&dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn load_existing_prefers_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "content_dir = \"/srv/b/wp-content\"\n").unwrap();
        let cfg = load_existing(Some(&path)).unwrap();
        assert_eq!(cfg.content_dir, PathBuf::from("/srv/b/wp-content"));

        let missing = dir.path().join("missing.toml");
        assert!(load_existing(Some(&missing)).is_err());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn validate_rejects_relative_content_dir() {
        let cfg = RebooterConfig::with_content_dir("wp-content");
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_components() {
        let mut cfg = RebooterConfig::default();
        cfg.backup_folder = "a/b".to_string();
        assert!(cfg.validate().is_err());

        let mut cfg = RebooterConfig::default();
        cfg.uploads_label = "..".to_string();
        assert!(cfg.validate().is_err());

        let mut cfg = RebooterConfig::default();
        cfg.content_root_label = String::new();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_unsafe_guard_key() {
        let mut cfg = RebooterConfig::default();
        cfg.guard_key = "a b".to_string();
        assert!(cfg.validate().is_err());
        cfg.guard_key = "x&y=1".to_string();
        assert!(cfg.validate().is_err());
        cfg.guard_key = String::new();
        assert!(cfg.validate().is_err());
    }
}
