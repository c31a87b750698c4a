//! News document schema and projection / 新闻文档结构与投影
//!
//! Source records are loosely typed JSON objects. They are narrowed into
//! `NewsDocument` here and nowhere else.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// News document - the unit stored in and returned by the index / 新闻文档
///
/// Optional fields hold the source value unchanged, whatever its JSON type.
/// Absent fields serialize as `null` rather than being omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsDocument {
    /// Document identifier, same as the bulk `_id` / 文档唯一标识
    pub uuid: String,
    pub title: Option<Value>,
    pub text: Option<Value>,
    pub author: Option<Value>,
    /// Date string or epoch millis / 发布时间
    pub published: Option<Value>,
    pub language: Option<Value>,
    pub sentiment: Option<Value>,
    /// Single label or list of labels / 分类（单个或列表）
    pub categories: Option<Value>,
    pub url: Option<Value>,
}

impl NewsDocument {
    /// Project a raw record into a document / 将原始记录投影为文档
    ///
    /// `fallback_id` is only evaluated when the record carries neither
    /// `uuid` nor `thread.uuid`.
    pub fn from_record(record: &Map<String, Value>, fallback_id: impl FnOnce() -> String) -> Self {
        let uuid = derive_id(record).unwrap_or_else(fallback_id);
        Self {
            uuid,
            title: field(record, "title"),
            text: field(record, "text"),
            author: field(record, "author"),
            published: field(record, "published"),
            language: field(record, "language"),
            sentiment: field(record, "sentiment"),
            categories: field(record, "categories"),
            url: field(record, "url"),
        }
    }
}

/// Derive the identifier from `uuid`, then `thread.uuid` / 提取文档ID
///
/// Empty identifiers count as missing.
pub fn derive_id(record: &Map<String, Value>) -> Option<String> {
    id_value(record.get("uuid")).or_else(|| {
        record
            .get("thread")
            .and_then(Value::as_object)
            .and_then(|thread| id_value(thread.get("uuid")))
    })
}

fn id_value(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn field(record: &Map<String, Value>, key: &str) -> Option<Value> {
    match record.get(key)? {
        Value::Null => None,
        other => Some(other.clone()),
    }
}
