//! Ingestion module - source extraction and bulk loading / 导入模块
//!
//! Data flow / 数据流：
//! path → `JsonSource` → `(id, NewsDocument)` → `bulk_index` → index service

pub mod document;
pub mod extractor;
pub mod loader;
pub mod sources;
pub mod utils;

pub use document::NewsDocument;
pub use extractor::{iter_jsons_in_path, parse_item, ItemFailure, JsonSource};
pub use loader::bulk_index;
pub use sources::{archives_in, documents};
