use std::borrow::Cow;
use std::path::Path;

/// Kind of ingestion source / 数据源类型
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SourceKind {
    Directory,
    Zip,
    JsonFile,
    Unsupported,
}

/// 判断路径对应的数据源类型
pub fn source_kind(path: &Path) -> SourceKind {
    if path.is_dir() {
        return SourceKind::Directory;
    }
    let name = path.file_name().map(|n| n.to_string_lossy().to_lowercase()).unwrap_or_default();
    if name.ends_with(".zip") {
        SourceKind::Zip
    } else if path.is_file() && is_json_name(&name) {
        SourceKind::JsonFile
    } else {
        SourceKind::Unsupported
    }
}

/// 是否为 JSON 文件名（不区分大小写）
pub fn is_json_name(name: &str) -> bool {
    name.to_lowercase().ends_with(".json")
}

/// 解码原始字节：先尝试 UTF-8，失败则按 Latin-1 解码
///
/// Latin-1 maps every byte to a code point, so this never fails.
pub fn decode_text(raw: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(raw) {
        Ok(s) => Cow::Borrowed(s),
        Err(_) => encoding_rs::mem::decode_latin1(raw),
    }
}

/// 文件名去掉扩展名
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
