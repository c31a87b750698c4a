//! Application configuration module / 应用配置模块
//!
//! Configuration is loaded from config.json once at startup and passed by
//! reference to every component. Creates default config file on first run
//! / 首次运行时创建默认配置文件

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{IndexerError, Result};

/// Environment variable overriding the index service address / 覆盖服务地址的环境变量
pub const ES_URL_ENV: &str = "ES_URL";

/// Application configuration / 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Index service connection / 索引服务连接配置
    #[serde(default)]
    pub elasticsearch: ElasticConfig,
    /// Target index / 目标索引
    #[serde(default)]
    pub index: IndexConfig,
    /// Ingestion configuration / 导入配置
    #[serde(default)]
    pub ingest: IngestConfig,
    /// Search configuration / 搜索配置
    #[serde(default)]
    pub search: SearchConfig,
}

/// Index service connection / 索引服务连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElasticConfig {
    /// Service host including scheme / 服务地址（含协议）
    pub host: String,
    /// Service port / 服务端口
    pub port: u16,
    /// Request timeout in seconds / 请求超时（秒）
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Full address, takes precedence over host/port when set / 完整地址
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    pub name: String,
}

/// Ingestion configuration / 导入配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Data source root / 数据源根目录
    pub data_dir: String,
    /// Number of archives taken from the data root / 从数据目录读取的压缩包数量
    pub num_archives: usize,
    /// Documents per bulk request / 每批文档数
    pub batch_size: usize,
    /// Maximum documents indexed per run / 单次运行最多索引的文档数
    pub max_docs: usize,
}

/// Search configuration / 搜索配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Default number of hits returned / 默认返回结果数
    pub default_size: usize,
}

fn default_timeout_secs() -> u64 { 60 }

impl Default for ElasticConfig {
    fn default() -> Self {
        Self {
            host: "http://127.0.0.1".to_string(),
            port: 9200,
            timeout_secs: default_timeout_secs(),
            url: None,
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            name: "esindex-v1.0".to_string(),
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            data_dir: "free-news-datasets/News_Datasets".to_string(),
            num_archives: 5000,
            batch_size: 500,
            max_docs: 2_000_000,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { default_size: 10 }
    }
}

impl ElasticConfig {
    /// Get the service base URL without trailing slash / 获取服务地址
    pub fn url(&self) -> String {
        match &self.url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("{}:{}", self.host.trim_end_matches('/'), self.port),
        }
    }
}

impl AppConfig {
    /// Get the data root directory / 获取数据根目录
    pub fn get_data_dir(&self) -> PathBuf {
        PathBuf::from(&self.ingest.data_dir)
    }

    /// Apply environment overrides / 应用环境变量覆盖
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(ES_URL_ENV) {
            if !url.trim().is_empty() {
                self.elasticsearch.url = Some(url);
            }
        }
    }

    /// Check values that would make a run meaningless / 校验配置
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.elasticsearch.url())
            .map_err(|e| IndexerError::Config(format!("invalid service address {}: {}", self.elasticsearch.url(), e)))?;
        if self.index.name.trim().is_empty() {
            return Err(IndexerError::Config("index name must not be empty".to_string()));
        }
        if self.ingest.batch_size == 0 {
            return Err(IndexerError::Config("batch_size must be greater than 0".to_string()));
        }
        if self.search.default_size == 0 {
            return Err(IndexerError::Config("default_size must be greater than 0".to_string()));
        }
        Ok(())
    }
}

/// Get the default config file path / 获取配置文件路径
pub fn default_config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("config.json")
}

/// Load configuration from file, or create default if not exists / 加载配置文件，不存在则创建默认配置
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let mut config = if path.exists() {
        let content = std::fs::read_to_string(path)
            .map_err(|e| IndexerError::Config(format!("Failed to read config file: {}", e)))?;

        let config: AppConfig = serde_json::from_str(&content)
            .map_err(|e| IndexerError::Config(format!("Failed to parse config file: {}", e)))?;

        tracing::info!("Loaded configuration from {:?}", path);
        config
    } else {
        let config = AppConfig::default();
        save_config(path, &config)?;
        tracing::info!("Created default configuration at {:?}", path);
        config
    };

    config.apply_env();
    config.validate()?;
    Ok(config)
}

/// Save configuration to file / 保存配置到文件
pub fn save_config(path: &Path, config: &AppConfig) -> Result<()> {
    let content = serde_json::to_string_pretty(config)
        .map_err(|e| IndexerError::Config(format!("Failed to serialize config: {}", e)))?;

    std::fs::write(path, content)
        .map_err(|e| IndexerError::Config(format!("Failed to write config file: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_url() {
        let config = AppConfig::default();
        assert_eq!(config.elasticsearch.url(), "http://127.0.0.1:9200");
    }

    #[test]
    fn test_explicit_url_wins() {
        let mut config = AppConfig::default();
        config.elasticsearch.url = Some("http://search.local:9201/".to_string());
        assert_eq!(config.elasticsearch.url(), "http://search.local:9201");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"index": {"name": "news"}}"#).unwrap();
        assert_eq!(config.index.name, "news");
        assert_eq!(config.ingest.batch_size, 500);
        assert_eq!(config.search.default_size, 10);
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let mut config = AppConfig::default();
        config.ingest.batch_size = 0;
        assert!(matches!(config.validate(), Err(IndexerError::Config(_))));
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = load_config(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.index.name, "esindex-v1.0");
    }
}
