//! Document extractor - walks a directory, zip archive or single JSON file
//! and yields `(id, NewsDocument)` pairs on demand / 文档提取器
//!
//! - Directory: every `*.json` below it, recursive, in sorted path order
//! - Zip: every `*.json` member, in the archive's listing order
//! - Single `.json` file: one item
//!
//! A failing item is reported and skipped, the rest of the source continues.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::document::NewsDocument;
use crate::error::Result as IndexResult;
use super::utils::{decode_text, file_stem, is_json_name, source_kind, SourceKind};

/// A source item that could not be turned into a document / 提取失败的条目
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFailure {
    /// File path, or member name and archive path / 失败条目
    pub item: String,
    pub reason: String,
}

enum SourceState {
    Files {
        root: PathBuf,
        root_name: String,
        files: std::vec::IntoIter<PathBuf>,
    },
    Zip {
        path: PathBuf,
        stem: String,
        archive: zip::ZipArchive<BufReader<File>>,
        next: usize,
    },
    Single(Option<PathBuf>),
    Done,
}

/// Lazy `(id, document)` sequence over one ingestion path / 惰性文档序列
///
/// Each call to [`JsonSource::open`] re-scans the path, so the same input can
/// be enumerated any number of times.
pub struct JsonSource {
    state: SourceState,
    failures: Vec<ItemFailure>,
}

/// Yield `(doc_id, doc)` for every JSON item found at `path` / 遍历路径下的 JSON 文档
pub fn iter_jsons_in_path(path: &Path) -> JsonSource {
    JsonSource::open(path)
}

impl JsonSource {
    pub fn open(path: &Path) -> Self {
        let mut failures = Vec::new();
        let state = match source_kind(path) {
            SourceKind::Directory => {
                let mut files = Vec::new();
                collect_json_files(path, &mut files, &mut failures);
                files.sort();
                debug!("Found {} JSON files under {:?}", files.len(), path);
                SourceState::Files {
                    root: path.to_path_buf(),
                    root_name: container_name(path),
                    files: files.into_iter(),
                }
            }
            SourceKind::Zip => match open_zip(path) {
                Ok(archive) => SourceState::Zip {
                    path: path.to_path_buf(),
                    stem: file_stem(path),
                    archive,
                    next: 0,
                },
                Err(e) => {
                    let failure = ItemFailure { item: path.display().to_string(), reason: e.to_string() };
                    warn!("Failed reading {}: {}", failure.item, failure.reason);
                    failures.push(failure);
                    SourceState::Done
                }
            },
            SourceKind::JsonFile => SourceState::Single(Some(path.to_path_buf())),
            SourceKind::Unsupported => {
                warn!("Skipping unsupported path type: {}", path.display());
                SourceState::Done
            }
        };
        Self { state, failures }
    }

    /// Items skipped so far / 已跳过的条目
    pub fn failures(&self) -> &[ItemFailure] {
        &self.failures
    }

    /// Next item, failures included / 读取下一个条目（包含失败）
    fn next_item(&mut self) -> Option<Result<(String, NewsDocument), ItemFailure>> {
        match &mut self.state {
            SourceState::Files { root, root_name, files } => {
                let file = files.next()?;
                let relative = file
                    .strip_prefix(root.as_path())
                    .unwrap_or(&file)
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
                    .join("/");
                let fallback = format!("{}/{}", root_name, relative);
                Some(read_file_item(&file, fallback))
            }
            SourceState::Zip { path, stem, archive, next } => loop {
                if *next >= archive.len() {
                    return None;
                }
                let index = *next;
                *next += 1;

                let mut entry = match archive.by_index(index) {
                    Ok(entry) => entry,
                    Err(e) => {
                        return Some(Err(ItemFailure {
                            item: format!("#{} in {}", index, path.display()),
                            reason: e.to_string(),
                        }))
                    }
                };
                if entry.is_dir() || !is_json_name(entry.name()) {
                    continue;
                }
                let name = entry.name().to_string();
                let item = format!("{} in {}", name, path.display());

                // declared sizes are untrusted, let the reader grow the buffer
                let mut raw = Vec::new();
                if let Err(e) = entry.read_to_end(&mut raw) {
                    return Some(Err(ItemFailure { item, reason: e.to_string() }));
                }
                let fallback = format!("{}/{}", stem, name);
                return Some(
                    parse_item(&raw, || fallback)
                        .map(|doc| (doc.uuid.clone(), doc))
                        .map_err(|reason| ItemFailure { item, reason }),
                );
            },
            SourceState::Single(file) => {
                let file = file.take()?;
                let fallback = file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| file.display().to_string());
                Some(read_file_item(&file, fallback))
            }
            SourceState::Done => None,
        }
    }
}

impl Iterator for JsonSource {
    type Item = (String, NewsDocument);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.next_item()? {
                Ok(pair) => return Some(pair),
                Err(failure) => {
                    warn!("Failed reading {}: {}", failure.item, failure.reason);
                    self.failures.push(failure);
                }
            }
        }
    }
}

/// Parse one raw item into a document / 解析单个条目
///
/// Decodes as UTF-8 (Latin-1 fallback), parses JSON and projects it.
pub fn parse_item(raw: &[u8], fallback_id: impl FnOnce() -> String) -> Result<NewsDocument, String> {
    let text = decode_text(raw);
    let value: Value = serde_json::from_str(&text).map_err(|e| e.to_string())?;
    let record = value
        .as_object()
        .ok_or_else(|| "expected a JSON object at top level".to_string())?;
    Ok(NewsDocument::from_record(record, fallback_id))
}

fn read_file_item(file: &Path, fallback: String) -> Result<(String, NewsDocument), ItemFailure> {
    let item = file.display().to_string();
    let raw = std::fs::read(file).map_err(|e| ItemFailure { item: item.clone(), reason: e.to_string() })?;
    parse_item(&raw, || fallback)
        .map(|doc| (doc.uuid.clone(), doc))
        .map_err(|reason| ItemFailure { item, reason })
}

fn open_zip(path: &Path) -> IndexResult<zip::ZipArchive<BufReader<File>>> {
    let file = File::open(path)?;
    Ok(zip::ZipArchive::new(BufReader::new(file))?)
}

fn container_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// 递归收集目录下的 JSON 文件
///
/// Symbolic links are listed but never followed, so a link cycle cannot
/// repeat the tree. Walk errors are recorded and the walk carries on.
fn collect_json_files(dir: &Path, out: &mut Vec<PathBuf>, failures: &mut Vec<ItemFailure>) {
    for entry in WalkDir::new(dir).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let item = e
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| dir.display().to_string());
                let failure = ItemFailure { item, reason: e.to_string() };
                warn!("Failed reading {}: {}", failure.item, failure.reason);
                failures.push(failure);
                continue;
            }
        };
        if entry.file_type().is_file() && is_json_name(&entry.file_name().to_string_lossy()) {
            out.push(entry.into_path());
        }
    }
}
