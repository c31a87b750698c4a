//! Wire types exchanged with the index service / 与索引服务交互的数据结构

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ingest::NewsDocument;

/// One write action of a bulk request / 批量写入中的单个操作
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkAction {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_source")]
    pub source: NewsDocument,
}

/// Bulk response (only the fields we look at) / 批量写入响应
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BulkResponse {
    #[serde(default)]
    pub errors: bool,
    #[serde(default)]
    pub items: Vec<BulkItem>,
}

/// Per-document outcome, keyed by operation name (`index`, `create`, ...)
#[derive(Debug, Clone, Deserialize)]
pub struct BulkItem(pub Map<String, Value>);

impl BulkItem {
    /// Error reason if the service rejected this document / 被拒绝时的原因
    pub fn error(&self) -> Option<String> {
        let result = self.0.values().next()?;
        let error = result.get("error")?;
        let reason = error
            .get("reason")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        let id = result.get("_id").and_then(Value::as_str).unwrap_or("?");
        Some(format!("{}: {}", id, reason))
    }
}

impl BulkResponse {
    /// Reasons for every rejected document / 所有失败原因
    pub fn failures(&self) -> Vec<String> {
        if !self.errors {
            return Vec::new();
        }
        self.items.iter().filter_map(BulkItem::error).collect()
    }
}

/// Search result envelope / 搜索结果
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub hits: Hits,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Hits {
    #[serde(default)]
    pub total: Option<HitsTotal>,
    #[serde(default)]
    pub hits: Vec<SearchHit>,
}

/// `hits.total` is a bare number on old servers and `{value, relation}` on new ones
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum HitsTotal {
    Count(u64),
    Object {
        value: u64,
        #[serde(default)]
        relation: Option<String>,
    },
}

impl HitsTotal {
    pub fn value(&self) -> u64 {
        match self {
            HitsTotal::Count(n) => *n,
            HitsTotal::Object { value, .. } => *value,
        }
    }
}

impl SearchResponse {
    /// Total hit count, whichever form it was reported in / 命中总数
    pub fn total(&self) -> u64 {
        self.hits.total.as_ref().map(HitsTotal::value).unwrap_or(self.hits.hits.len() as u64)
    }
}

/// A single ranked hit / 单条命中
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,
    #[serde(rename = "_source", default)]
    pub source: Map<String, Value>,
}
