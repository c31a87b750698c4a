//! Data root discovery / 数据目录扫描

use std::path::{Path, PathBuf};

use super::document::NewsDocument;
use super::extractor::JsonSource;
use crate::error::Result;

/// First `limit` zip archives directly under `data_dir`, sorted by name / 获取前 N 个压缩包
pub fn archives_in(data_dir: &Path, limit: usize) -> Result<Vec<PathBuf>> {
    let mut archives: Vec<PathBuf> = std::fs::read_dir(data_dir)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("zip"))
                    .unwrap_or(false)
        })
        .collect();
    archives.sort();
    archives.truncate(limit);
    Ok(archives)
}

/// Chain the documents of several sources, capped at `max_docs` / 串联多个数据源
///
/// Each source is only opened once the previous one is exhausted.
pub fn documents(paths: Vec<PathBuf>, max_docs: usize) -> impl Iterator<Item = (String, NewsDocument)> {
    paths
        .into_iter()
        .flat_map(|path| JsonSource::open(&path))
        .take(max_docs)
}
