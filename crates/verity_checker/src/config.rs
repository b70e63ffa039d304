//! `verity.toml` から読み込む検証設定。
//!
//! ```toml
//! [verifier]
//! target_release = 17
//! fold_repeatable = true
//!
//! [logging]
//! level = "debug"
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 注釈を持つクラスファイルを出力できる最初の Java リリース。
pub const ANNOTATIONS_MIN_RELEASE: u32 = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("設定ファイルの読み込みに失敗しました ({}): {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML の解析に失敗しました: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("`{key}` の値が不正です: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

/// 検証パスの各検査の有効・無効。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VerifierConfig {
    /// バイトコード出力が対象とする Java リリース。
    pub target_release: u32,
    pub check_targets: bool,
    pub fold_repeatable: bool,
    pub verify_overrides: bool,
    pub check_annotation_members: bool,
}

impl VerifierConfig {
    pub fn annotations_supported(&self) -> bool {
        self.target_release >= ANNOTATIONS_MIN_RELEASE
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.target_release == 0 {
            return Err(ConfigError::InvalidValue {
                key: "verifier.target_release",
                reason: "正の Java リリース番号を指定してください".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            target_release: 17,
            check_targets: true,
            fold_repeatable: true,
            verify_overrides: true,
            check_annotation_members: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `RUST_LOG` が未設定のときに使う `tracing` のフィルタ指定。
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// `verity.toml` の内容。
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VerityConfig {
    pub verifier: VerifierConfig,
    pub logging: LoggingConfig,
}

impl VerityConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: VerityConfig = toml::from_str(contents)?;
        config.verifier.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = VerityConfig::from_toml_str("").expect("empty config");
        assert_eq!(config, VerityConfig::default());
        assert_eq!(config.verifier.target_release, 17);
        assert_eq!(config.logging.level, "warn");
        assert!(config.verifier.annotations_supported());
    }

    #[test]
    fn partial_tables_keep_remaining_defaults() {
        let config = VerityConfig::from_toml_str(
            "[verifier]\ntarget_release = 4\nverify_overrides = false\n",
        )
        .expect("valid config");
        assert_eq!(config.verifier.target_release, 4);
        assert!(!config.verifier.verify_overrides);
        assert!(config.verifier.fold_repeatable);
        assert!(!config.verifier.annotations_supported());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let error = VerityConfig::from_toml_str("[verifier]\nstrict = true\n")
            .expect_err("unknown key");
        assert!(matches!(error, ConfigError::Parse(_)));
        assert!(error.to_string().contains("strict"));
    }

    #[test]
    fn zero_release_is_invalid() {
        let error = VerityConfig::from_toml_str("[verifier]\ntarget_release = 0\n")
            .expect_err("invalid release");
        assert!(matches!(
            error,
            ConfigError::InvalidValue {
                key: "verifier.target_release",
                ..
            }
        ));
    }
}
