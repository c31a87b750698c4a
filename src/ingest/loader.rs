//! Batch loader - groups documents into fixed-size bulk requests / 批量导入
//!
//! Batches are submitted strictly one after another; the next batch is not
//! read until the previous submission returned. A failed submission ends the
//! run, batches already sent stay committed.

use tracing::{debug, info};

use super::document::NewsDocument;
use crate::error::{IndexerError, Result};
use crate::search::{BulkAction, IndexService};

/// Bulk index documents, returns the number of documents indexed / 批量索引文档
pub async fn bulk_index<S, I>(service: &S, index_name: &str, docs: I, batch_size: usize) -> Result<usize>
where
    S: IndexService + ?Sized,
    I: IntoIterator<Item = (String, NewsDocument)>,
{
    if batch_size == 0 {
        return Err(IndexerError::Config("batch_size must be greater than 0".to_string()));
    }

    let mut actions: Vec<BulkAction> = Vec::with_capacity(batch_size);
    let mut total = 0usize;
    let mut batches = 0usize;

    for (doc_id, doc) in docs {
        actions.push(BulkAction {
            index: index_name.to_string(),
            id: doc_id,
            source: doc,
        });

        if actions.len() >= batch_size {
            total += submit(service, &actions).await?;
            batches += 1;
            debug!("Batch {} submitted, {} documents so far", batches, total);
            actions.clear();
        }
    }

    // 提交剩余文档
    if !actions.is_empty() {
        total += submit(service, &actions).await?;
        batches += 1;
    }

    info!("Indexed {} documents into {} in {} batches", total, index_name, batches);
    Ok(total)
}

/// Submit one batch; any rejected document fails the run / 提交单个批次
async fn submit<S>(service: &S, actions: &[BulkAction]) -> Result<usize>
where
    S: IndexService + ?Sized,
{
    let response = service.bulk(actions).await?;
    let failures = response.failures();
    if let Some(first) = failures.first() {
        return Err(IndexerError::BulkRejected {
            failed: failures.len(),
            batch: actions.len(),
            reason: first.clone(),
        });
    }
    Ok(actions.len())
}
