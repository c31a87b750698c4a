//! Boolean query over the searchable fields / 多字段布尔查询

use serde_json::{json, Value};
use tracing::{debug, error};

use super::client::IndexService;
use super::types::SearchResponse;

/// Fields the query string is evaluated against / 查询字段
pub const SEARCH_FIELDS: [&str; 6] = ["title", "text", "author", "language", "url", "categories"];

/// Build the query-string body; the expression is passed through untouched / 构建查询体
pub fn build_query_body(query_text: &str) -> Value {
    json!({
        "query": {
            "query_string": {
                "query": query_text,
                "fields": SEARCH_FIELDS
            }
        }
    })
}

/// Execute a boolean/query_string search and return the raw results / 执行布尔查询
///
/// Service errors are logged and turned into `None`, which means "no answer"
/// and is distinct from an empty hit list.
pub async fn search_boolean<S>(service: &S, query_text: &str, index_name: &str, size: usize) -> Option<SearchResponse>
where
    S: IndexService + ?Sized,
{
    let body = build_query_body(query_text);
    debug!("Searching {} (size={}): {}", index_name, size, query_text);
    match service.search(index_name, &body, size).await {
        Ok(results) => Some(results),
        Err(e) => {
            error!("Error querying Elasticsearch: {}", e);
            None
        }
    }
}
