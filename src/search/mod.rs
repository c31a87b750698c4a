//! Search module - index schema, service client, querying and display / 搜索模块
//!
//! The index itself lives in an external service; this module only describes
//! it (schema), talks to it (client) and presents what it returns.

pub mod client;
pub mod display;
pub mod query;
pub mod schema;
pub mod types;

pub use client::{ElasticClient, IndexService};
pub use display::{display_search_results, format_search_results};
pub use query::{build_query_body, search_boolean, SEARCH_FIELDS};
pub use schema::MAPPING;
pub use types::{BulkAction, BulkResponse, HitsTotal, SearchHit, SearchResponse};

use tracing::info;

use crate::error::Result;

/// Create the index with `MAPPING` unless it already exists / 索引不存在时创建
///
/// Returns whether the index was created.
pub async fn ensure_index<S>(service: &S, index_name: &str) -> Result<bool>
where
    S: IndexService + ?Sized,
{
    if service.index_exists(index_name).await? {
        info!("Index {} already exists", index_name);
        return Ok(false);
    }
    service.create_index(index_name, &MAPPING).await?;
    info!("Created index {}", index_name);
    Ok(true)
}
