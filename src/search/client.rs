//! Index service client / 索引服务客户端
//!
//! The search engine itself is external. Everything this crate needs from it
//! goes through the `IndexService` trait; `ElasticClient` speaks its HTTP API.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{error, info};

use super::types::{BulkAction, BulkResponse, SearchResponse};
use crate::config::ElasticConfig;
use crate::error::{IndexerError, Result};

const USER_AGENT: &str = concat!("news-indexer/", env!("CARGO_PKG_VERSION"));

/// Operations the external index service provides / 外部索引服务能力
#[async_trait]
pub trait IndexService: Send + Sync {
    /// Health check / 健康检查
    async fn ping(&self) -> bool;

    async fn index_exists(&self, index: &str) -> Result<bool>;

    /// Create an index from a settings + mappings body / 创建索引
    async fn create_index(&self, index: &str, body: &Value) -> Result<()>;

    async fn delete_index(&self, index: &str) -> Result<()>;

    /// Submit one ordered bulk request / 提交一次批量写入
    async fn bulk(&self, actions: &[BulkAction]) -> Result<BulkResponse>;

    /// Run a query body against an index / 执行查询
    async fn search(&self, index: &str, body: &Value, size: usize) -> Result<SearchResponse>;
}

/// HTTP client for an Elasticsearch-compatible service / HTTP 客户端
pub struct ElasticClient {
    client: Client,
    base_url: String,
}

impl ElasticClient {
    pub fn new(config: &ElasticConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.url(),
        })
    }

    /// Create the client and verify the service answers / 创建客户端并检查连接
    pub async fn connect(config: &ElasticConfig) -> Result<Self> {
        let client = Self::new(config)?;
        info!("Connecting to Elasticsearch at {}", client.base_url);
        if client.ping().await {
            info!("Successfully connected to Elasticsearch");
            Ok(client)
        } else {
            error!("Error connecting to Elasticsearch at {}", client.base_url);
            Err(IndexerError::Unreachable(client.base_url.clone()))
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Turn non-2xx responses into errors / 处理非成功状态码
    async fn check(resp: Response) -> Result<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(IndexerError::Service { status: status.as_u16(), body })
    }
}

/// Serialize actions as newline-delimited action/source pairs / 序列化批量请求体
pub fn bulk_body(actions: &[BulkAction]) -> Result<String> {
    let mut body = String::new();
    for action in actions {
        let header = serde_json::json!({"index": {"_index": action.index, "_id": action.id}});
        body.push_str(&serde_json::to_string(&header)?);
        body.push('\n');
        body.push_str(&serde_json::to_string(&action.source)?);
        body.push('\n');
    }
    Ok(body)
}

#[async_trait]
impl IndexService for ElasticClient {
    async fn ping(&self) -> bool {
        match self.client.head(self.url("/")).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                error!("Ping failed: {}", e);
                false
            }
        }
    }

    async fn index_exists(&self, index: &str) -> Result<bool> {
        let resp = self.client.head(self.url(index)).send().await?;
        match resp.status() {
            StatusCode::NOT_FOUND => Ok(false),
            _ => Self::check(resp).await.map(|_| true),
        }
    }

    async fn create_index(&self, index: &str, body: &Value) -> Result<()> {
        let resp = self.client.put(self.url(index)).json(body).send().await?;
        Self::check(resp).await?;
        Ok(())
    }

    async fn delete_index(&self, index: &str) -> Result<()> {
        let resp = self.client.delete(self.url(index)).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        Self::check(resp).await?;
        Ok(())
    }

    async fn bulk(&self, actions: &[BulkAction]) -> Result<BulkResponse> {
        let resp = self.client
            .post(self.url("/_bulk"))
            .header(reqwest::header::CONTENT_TYPE, "application/x-ndjson")
            .body(bulk_body(actions)?)
            .send()
            .await?;
        let resp = Self::check(resp).await?;
        Ok(resp.json().await?)
    }

    async fn search(&self, index: &str, body: &Value, size: usize) -> Result<SearchResponse> {
        let resp = self.client
            .post(self.url(&format!("{}/_search", index)))
            .query(&[("size", size)])
            .json(body)
            .send()
            .await?;
        let resp = Self::check(resp).await?;
        Ok(resp.json().await?)
    }
}
