use crate::error::{ClassifyError, Result};
use doc_classify_common::validate_base_url;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 環境変数でベースURLを上書きする場合の変数名
pub const BASE_URL_ENV: &str = "DOC_CLASSIFY_BASE_URL";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ClassifyError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("doc-classify").join("config.json"))
    }

    /// 使用するベースURLを決定
    ///
    /// 優先順位: コマンドライン引数 > 環境変数 > 設定ファイル
    pub fn resolve_base_url(&self, flag: Option<&str>) -> Result<String> {
        let env = std::env::var(BASE_URL_ENV).ok();
        let chosen = flag
            .map(str::to_string)
            .or(env.filter(|v| !v.trim().is_empty()))
            .unwrap_or_else(|| self.base_url.clone());
        validate_base_url(&chosen)?;
        Ok(chosen.trim().trim_end_matches('/').to_string())
    }

    pub fn set_base_url(&mut self, url: String) -> Result<()> {
        validate_base_url(&url)?;
        self.base_url = url.trim().trim_end_matches('/').to_string();
        self.save()
    }
}
