// ==========================================
// 生产批次导入 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、环境变量覆写
// 优先级: 环境变量 > 配置文件 > 内置默认值
// 默认位置: <用户配置目录>/bed-import/config.toml
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use crate::importer::segmenter::ColumnLayout;
use crate::matcher::DEFAULT_SEARCH_LIMIT;
use crate::uploader::batch_uploader::{
    DEFAULT_FALLBACK_ERROR, DEFAULT_MAX_BATCH_SIZE, DEFAULT_SUCCESS_MESSAGE,
};
use crate::uploader::UploadSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

// ==========================================
// 环境变量键
// ==========================================
pub mod config_keys {
    pub const API_URL: &str = "BED_IMPORT_API_URL";
    pub const TOKEN: &str = "BED_IMPORT_TOKEN";
    pub const USERNAME: &str = "BED_IMPORT_USERNAME";
    pub const MAX_BATCH_SIZE: &str = "BED_IMPORT_MAX_BATCH_SIZE";
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {message}")]
    ReadError { path: String, message: String },

    #[error("配置文件格式错误: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("配置值格式错误 (key: {key}, value: {value})")]
    InvalidValue { key: String, value: String },
}

// ==========================================
// ImportConfig - 配置项全集
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    // ===== 分段 =====
    pub material_name_column: usize,
    pub quantity_column: usize,
    pub rate_column: usize,

    // ===== 匹配 =====
    pub search_limit: usize,

    // ===== 上传 =====
    pub max_batch_size: usize,
    pub success_message: String,
    pub fallback_error: String,
    pub username: String,

    // ===== 接口 =====
    pub api_base_url: Option<String>,
    pub inventory_path: String,
    pub production_path: String,
    pub api_token: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for ImportConfig {
    fn default() -> Self {
        let layout = ColumnLayout::default();
        Self {
            material_name_column: layout.material_name,
            quantity_column: layout.quantity,
            rate_column: layout.rate,
            search_limit: DEFAULT_SEARCH_LIMIT,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            success_message: DEFAULT_SUCCESS_MESSAGE.to_string(),
            fallback_error: DEFAULT_FALLBACK_ERROR.to_string(),
            username: String::new(),
            api_base_url: None,
            inventory_path: "/inventory".to_string(),
            production_path: "/production/create".to_string(),
            api_token: None,
            request_timeout_secs: 30,
        }
    }
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    config: ImportConfig,
    source: Option<PathBuf>,
}

impl ConfigManager {
    /// 由已有配置创建（不读文件、不读环境变量）
    pub fn from_config(config: ImportConfig) -> Self {
        Self {
            config,
            source: None,
        }
    }

    /// 默认配置文件路径
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("bed-import").join("config.toml"))
    }

    /// 加载配置
    ///
    /// # 参数
    /// - path: 显式指定的配置文件（必须存在）; None 时尝试默认路径（不存在则用默认值）
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let source = match path {
            Some(p) => Some(p.to_path_buf()),
            None => Self::default_config_path().filter(|p| p.exists()),
        };

        let config = match &source {
            Some(p) => Self::read_file(p)?,
            None => {
                debug!("未找到配置文件，使用默认配置");
                ImportConfig::default()
            }
        };

        let mut manager = Self { config, source };
        manager.apply_overrides(|key| std::env::var(key).ok())?;
        info!(source = ?manager.source, "配置加载完成");
        Ok(manager)
    }

    fn read_file(path: &Path) -> Result<ImportConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config: ImportConfig = toml::from_str(&content)?;
        if config.max_batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_batch_size".to_string(),
                value: config.max_batch_size.to_string(),
            });
        }
        Ok(config)
    }

    /// 应用覆写（键值来源可替换，便于测试）
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(config_keys::API_URL) {
            self.config.api_base_url = Some(url);
        }
        if let Some(token) = lookup(config_keys::TOKEN) {
            self.config.api_token = Some(token);
        }
        if let Some(username) = lookup(config_keys::USERNAME) {
            self.config.username = username;
        }
        if let Some(raw) = lookup(config_keys::MAX_BATCH_SIZE) {
            self.config.max_batch_size = raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: config_keys::MAX_BATCH_SIZE.to_string(),
                    value: raw.clone(),
                })?;
        }
        Ok(())
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    fn join_url(&self, path: &str) -> Option<String> {
        self.config.api_base_url.as_ref().map(|base| {
            format!(
                "{}/{}",
                base.trim_end_matches('/'),
                path.trim_start_matches('/')
            )
        })
    }
}

impl ImportConfigReader for ConfigManager {
    fn get_column_layout(&self) -> ColumnLayout {
        ColumnLayout {
            material_name: self.config.material_name_column,
            quantity: self.config.quantity_column,
            rate: self.config.rate_column,
        }
    }

    fn get_search_limit(&self) -> usize {
        self.config.search_limit
    }

    fn get_upload_settings(&self) -> UploadSettings {
        UploadSettings {
            max_batch_size: self.config.max_batch_size,
            success_message: self.config.success_message.clone(),
            fallback_error: self.config.fallback_error.clone(),
            username: self.config.username.clone(),
        }
    }

    fn get_inventory_url(&self) -> Option<String> {
        self.join_url(&self.config.inventory_path)
    }

    fn get_production_url(&self) -> Option<String> {
        self.join_url(&self.config.production_path)
    }

    fn get_api_token(&self) -> Option<String> {
        self.config.api_token.clone()
    }

    fn get_request_timeout_secs(&self) -> u64 {
        self.config.request_timeout_secs
    }
}
