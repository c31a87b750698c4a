use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Mutex;

use news_indexer::ingest::{bulk_index, JsonSource, NewsDocument};
use news_indexer::search::{
    ensure_index, search_boolean, BulkAction, BulkResponse, IndexService, SearchResponse, MAPPING,
};
use news_indexer::{IndexerError, Result};

/// In-memory stand-in for the index service
#[derive(Default)]
struct FakeService {
    batches: Mutex<Vec<Vec<BulkAction>>>,
    created: Mutex<Vec<(String, Value)>>,
    searches: Mutex<Vec<(String, Value, usize)>>,
    existing: Vec<String>,
    fail_bulk_after: Option<usize>,
    reject_id: Option<String>,
    fail_search: bool,
}

impl FakeService {
    fn batch_sizes(&self) -> Vec<usize> {
        self.batches.lock().unwrap().iter().map(Vec::len).collect()
    }
}

#[async_trait]
impl IndexService for FakeService {
    async fn ping(&self) -> bool {
        true
    }

    async fn index_exists(&self, index: &str) -> Result<bool> {
        Ok(self.existing.iter().any(|name| name == index))
    }

    async fn create_index(&self, index: &str, body: &Value) -> Result<()> {
        self.created.lock().unwrap().push((index.to_string(), body.clone()));
        Ok(())
    }

    async fn delete_index(&self, _index: &str) -> Result<()> {
        Ok(())
    }

    async fn bulk(&self, actions: &[BulkAction]) -> Result<BulkResponse> {
        let mut batches = self.batches.lock().unwrap();
        if Some(batches.len()) == self.fail_bulk_after {
            return Err(IndexerError::Service { status: 503, body: "unavailable".to_string() });
        }
        batches.push(actions.to_vec());

        let items: Vec<Value> = actions
            .iter()
            .map(|a| {
                if Some(&a.id) == self.reject_id.as_ref() {
                    json!({"index": {"_id": a.id, "status": 400, "error": {"reason": "bad date"}}})
                } else {
                    json!({"index": {"_id": a.id, "status": 201}})
                }
            })
            .collect();
        let errors = self.reject_id.as_ref().map(|id| actions.iter().any(|a| &a.id == id)).unwrap_or(false);
        Ok(serde_json::from_value(json!({"errors": errors, "items": items}))?)
    }

    async fn search(&self, index: &str, body: &Value, size: usize) -> Result<SearchResponse> {
        self.searches.lock().unwrap().push((index.to_string(), body.clone(), size));
        if self.fail_search {
            return Err(IndexerError::Service { status: 400, body: "query_shard_exception".to_string() });
        }
        Ok(serde_json::from_value(json!({
            "hits": {"total": {"value": 1, "relation": "eq"}, "hits": [
                {"_id": "doc-1", "_score": 3.2, "_source": {"title": "Central bank holds rates"}}
            ]}
        }))?)
    }
}

fn docs(n: usize) -> Vec<(String, NewsDocument)> {
    (0..n)
        .map(|i| {
            let record = json!({"uuid": format!("doc-{}", i), "title": format!("Story {}", i)});
            let doc = NewsDocument::from_record(record.as_object().unwrap(), String::new);
            (doc.uuid.clone(), doc)
        })
        .collect()
}

#[tokio::test]
async fn test_two_full_batches_and_remainder() {
    let service = FakeService::default();
    let total = bulk_index(&service, "news", docs(2 * 4 + 1), 4).await.unwrap();
    assert_eq!(total, 9);
    assert_eq!(service.batch_sizes(), vec![4, 4, 1]);
}

#[tokio::test]
async fn test_exact_multiple_has_no_trailing_batch() {
    let service = FakeService::default();
    let total = bulk_index(&service, "news", docs(6), 3).await.unwrap();
    assert_eq!(total, 6);
    assert_eq!(service.batch_sizes(), vec![3, 3]);
}

#[tokio::test]
async fn test_empty_stream_submits_nothing() {
    let service = FakeService::default();
    let total = bulk_index(&service, "news", docs(0), 10).await.unwrap();
    assert_eq!(total, 0);
    assert!(service.batch_sizes().is_empty());
}

#[tokio::test]
async fn test_actions_carry_index_and_id_in_order() {
    let service = FakeService::default();
    bulk_index(&service, "news", docs(3), 2).await.unwrap();
    let batches = service.batches.lock().unwrap();
    let ids: Vec<&str> = batches.iter().flatten().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["doc-0", "doc-1", "doc-2"]);
    assert!(batches.iter().flatten().all(|a| a.index == "news" && a.source.uuid == a.id));
}

#[tokio::test]
async fn test_failed_submission_is_fatal() {
    let service = FakeService { fail_bulk_after: Some(1), ..Default::default() };
    let err = bulk_index(&service, "news", docs(5), 2).await.unwrap_err();
    assert!(matches!(err, IndexerError::Service { status: 503, .. }));
    // the first batch stays committed
    assert_eq!(service.batch_sizes(), vec![2]);
}

#[tokio::test]
async fn test_rejected_document_fails_the_run() {
    let service = FakeService { reject_id: Some("doc-3".to_string()), ..Default::default() };
    let err = bulk_index(&service, "news", docs(5), 2).await.unwrap_err();
    match err {
        IndexerError::BulkRejected { failed, batch, reason } => {
            assert_eq!(failed, 1);
            assert_eq!(batch, 2);
            assert_eq!(reason, "doc-3: bad date");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn test_zero_batch_size_rejected() {
    let service = FakeService::default();
    let err = bulk_index(&service, "news", docs(1), 0).await.unwrap_err();
    assert!(matches!(err, IndexerError::Config(_)));
}

#[tokio::test]
async fn test_directory_to_index_skips_corrupt_item() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.json"), r#"{"uuid": "first", "text": "alpha"}"#).unwrap();
    std::fs::write(dir.path().join("b.json"), r#"{"uuid": "#).unwrap();
    std::fs::write(dir.path().join("c.json"), r#"{"thread": {"uuid": "third"}}"#).unwrap();

    let service = FakeService::default();
    let mut source = JsonSource::open(dir.path());
    let total = bulk_index(&service, "news", source.by_ref(), 500).await.unwrap();

    assert_eq!(total, 2);
    assert_eq!(source.failures().len(), 1);
    let batches = service.batches.lock().unwrap();
    let ids: Vec<&str> = batches[0].iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["first", "third"]);
}

#[tokio::test]
async fn test_search_passes_size_and_index() {
    let service = FakeService::default();
    let results = search_boolean(&service, "rates AND bank", "news", 7).await.unwrap();
    assert_eq!(results.total(), 1);
    assert_eq!(results.hits.hits[0].id, "doc-1");

    let searches = service.searches.lock().unwrap();
    let (index, body, size) = &searches[0];
    assert_eq!(index, "news");
    assert_eq!(*size, 7);
    assert_eq!(body["query"]["query_string"]["query"], "rates AND bank");
}

#[tokio::test]
async fn test_search_failure_returns_none() {
    let service = FakeService { fail_search: true, ..Default::default() };
    assert!(search_boolean(&service, "title:(", "news", 10).await.is_none());
}

#[tokio::test]
async fn test_ensure_index_creates_once() {
    let service = FakeService::default();
    assert!(ensure_index(&service, "news").await.unwrap());
    let created = service.created.lock().unwrap();
    assert_eq!(created[0].0, "news");
    assert_eq!(created[0].1, *MAPPING);

    let existing = FakeService { existing: vec!["news".to_string()], ..Default::default() };
    assert!(!ensure_index(&existing, "news").await.unwrap());
    assert!(existing.created.lock().unwrap().is_empty());
}
