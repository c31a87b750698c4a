//! Search result formatting / 搜索结果展示

use serde_json::{Map, Value};
use std::fmt;

use super::types::SearchResponse;

/// Snippet length in characters / 摘要长度（字符数）
pub const SNIPPET_CHARS: usize = 200;
const ELLIPSIS: &str = "...";

/// First `SNIPPET_CHARS` characters, with an ellipsis when cut / 截取摘要
pub fn snippet(text: &str) -> String {
    let mut chars = text.char_indices();
    match chars.nth(SNIPPET_CHARS) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text.to_string(),
    }
}

/// Render a source field, or the placeholder when absent or null
fn field(source: &Map<String, Value>, key: &str, placeholder: &str) -> String {
    match source.get(key) {
        None | Some(Value::Null) => placeholder.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
            .collect::<Vec<_>>()
            .join(", "),
        Some(other) => other.to_string(),
    }
}

/// One search response rendered as a report / 搜索结果报告
struct Report<'a> {
    results: &'a SearchResponse,
    query_text: &'a str,
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(70);
        writeln!(f, "\n{}", rule)?;
        writeln!(f, "Query: {}", self.query_text)?;
        writeln!(f, "Total hits: {}", self.results.total())?;
        writeln!(f, "{}\n", rule)?;

        for (i, hit) in self.results.hits.hits.iter().enumerate() {
            let source = &hit.source;
            let score = hit.score.map(|s| s.to_string()).unwrap_or_else(|| "(no score)".to_string());

            writeln!(f, "Result #{}", i + 1)?;
            writeln!(f, "Score : {}", score)?;
            writeln!(f, "ID    : {}", hit.id)?;
            writeln!(f, "Title : {}", field(source, "title", "(no title)"))?;
            writeln!(f, "Snippet:\n{}", snippet(&field(source, "text", "")))?;
            writeln!(f, "Author: {}", field(source, "author", "(no author)"))?;
            writeln!(f, "Published: {}", field(source, "published", "(no date)"))?;
            writeln!(f, "Language: {}", field(source, "language", "(no language)"))?;
            writeln!(f, "URL: {}", field(source, "url", "(no url)"))?;
            writeln!(f, "Categories: {}", field(source, "categories", "(no categories)"))?;
            writeln!(f, "{}\n", "-".repeat(70))?;
        }
        Ok(())
    }
}

/// Format search results as a human-readable report / 格式化搜索结果
pub fn format_search_results(results: Option<&SearchResponse>, query_text: &str) -> String {
    match results {
        Some(results) => Report { results, query_text }.to_string(),
        None => "No results found.\n".to_string(),
    }
}

/// Print formatted results to stdout / 打印搜索结果
pub fn display_search_results(results: Option<&SearchResponse>, query_text: &str) {
    print!("{}", format_search_results(results, query_text));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: Value) -> SearchResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_snippet_truncates_long_text() {
        let text = "a".repeat(250);
        let s = snippet(&text);
        assert_eq!(s, format!("{}...", "a".repeat(200)));
    }

    #[test]
    fn test_snippet_keeps_short_text() {
        let text = "b".repeat(150);
        assert_eq!(snippet(&text), text);
    }

    #[test]
    fn test_snippet_exact_length_not_marked() {
        let text = "c".repeat(200);
        assert_eq!(snippet(&text), text);
    }

    #[test]
    fn test_snippet_counts_characters() {
        let text = "é".repeat(201);
        assert_eq!(snippet(&text), format!("{}...", "é".repeat(200)));
    }

    #[test]
    fn test_none_reports_no_results() {
        assert_eq!(format_search_results(None, "q"), "No results found.\n");
    }

    #[test]
    fn test_total_forms() {
        let bare = response(json!({"hits": {"total": 5, "hits": []}}));
        let object = response(json!({"hits": {"total": {"value": 5, "relation": "eq"}, "hits": []}}));
        assert!(format_search_results(Some(&bare), "q").contains("Total hits: 5\n"));
        assert!(format_search_results(Some(&object), "q").contains("Total hits: 5\n"));
    }

    #[test]
    fn test_hits_numbered_with_placeholders() {
        let resp = response(json!({"hits": {"total": 2, "hits": [
            {"_id": "first", "_score": 2.5, "_source": {
                "title": "Rates rise", "text": "x".repeat(250), "author": "A. Writer",
                "published": "2024-01-02", "language": "english",
                "url": "https://example.com/1", "categories": ["Finance", "Economy"]
            }},
            {"_id": "second", "_score": 1.0, "_source": {"title": null}}
        ]}}));
        let report = format_search_results(Some(&resp), "rates");

        assert!(report.contains("Query: rates\n"));
        assert!(report.contains("Result #1\nScore : 2.5\nID    : first\nTitle : Rates rise\n"));
        assert!(report.contains(&format!("Snippet:\n{}...\n", "x".repeat(200))));
        assert!(report.contains("Categories: Finance, Economy\n"));
        assert!(report.contains("Result #2\nScore : 1\nID    : second\nTitle : (no title)\n"));
        assert!(report.contains("Author: (no author)\n"));
        assert!(report.contains("Published: (no date)\n"));
        assert!(report.contains("URL: (no url)\n"));
        assert!(report.contains("Categories: (no categories)\n"));
        assert!(report.find("Result #1").unwrap() < report.find("Result #2").unwrap());
    }

    #[test]
    fn test_non_string_fields_rendered() {
        let resp = response(json!({"hits": {"total": 1, "hits": [
            {"_id": "n", "_score": null, "_source": {
                "title": ["Part 1", "Part 2"], "text": ["first", "second"], "author": 42
            }}
        ]}}));
        let report = format_search_results(Some(&resp), "q");

        assert!(report.contains("Score : (no score)\n"));
        assert!(report.contains("Title : Part 1, Part 2\n"));
        assert!(report.contains("Snippet:\nfirst, second\n"));
        assert!(report.contains("Author: 42\n"));
    }
}
