//! Search index schema definition / 搜索索引的 Schema 定义
//!
//! Settings and mappings sent once when the index is created. The analyzer
//! strips HTML, normalizes and stems tokens, and indexes 1-3 token shingles
//! so phrase-like queries match without positional queries.

use once_cell::sync::Lazy;
use serde_json::{json, Value};

/// Custom analyzer name / 自定义分析器名称
pub const ANALYZER: &str = "my_analyzer";
pub const STEMMER_FILTER: &str = "my_stemmer";
pub const SHINGLE_FILTER: &str = "my_shingle_filter";

/// Index settings + mappings / 索引设置与映射
pub static MAPPING: Lazy<Value> = Lazy::new(|| {
    json!({
        "settings": {
            "analysis": {
                "filter": {
                    STEMMER_FILTER: {"type": "stemmer", "language": "english"},
                    // bigrams and trigrams alongside single tokens
                    SHINGLE_FILTER: {
                        "type": "shingle",
                        "min_shingle_size": 2,
                        "max_shingle_size": 3,
                        "output_unigrams": true
                    }
                },
                "analyzer": {
                    ANALYZER: {
                        "type": "custom",
                        "tokenizer": "standard",
                        "char_filter": ["html_strip"],
                        // shingles last, on normalized and stemmed unigrams
                        "filter": [
                            "lowercase", "stop", "apostrophe",
                            "decimal_digit", "trim",
                            STEMMER_FILTER, SHINGLE_FILTER
                        ]
                    }
                }
            }
        },
        "mappings": {
            "properties": {
                "uuid": {"type": "keyword"},
                "title": {"type": "text", "analyzer": ANALYZER, "search_analyzer": ANALYZER},
                "text": {"type": "text", "analyzer": ANALYZER, "search_analyzer": ANALYZER},
                "author": {"type": "keyword"},
                "published": {"type": "date", "format": "strict_date_optional_time||epoch_millis"},
                "language": {"type": "keyword"},
                "sentiment": {"type": "keyword"},
                "categories": {"type": "keyword"},
                "url": {"type": "keyword"}
            }
        }
    })
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_chain_order() {
        let filters = &MAPPING["settings"]["analysis"]["analyzer"][ANALYZER]["filter"];
        let names: Vec<&str> = filters.as_array().unwrap().iter().filter_map(Value::as_str).collect();
        assert_eq!(names, vec![
            "lowercase", "stop", "apostrophe", "decimal_digit", "trim", STEMMER_FILTER, SHINGLE_FILTER
        ]);
    }

    #[test]
    fn test_shingle_settings() {
        let shingle = &MAPPING["settings"]["analysis"]["filter"][SHINGLE_FILTER];
        assert_eq!(shingle["min_shingle_size"], 2);
        assert_eq!(shingle["max_shingle_size"], 3);
        assert_eq!(shingle["output_unigrams"], true);
    }

    #[test]
    fn test_field_types() {
        let props = &MAPPING["mappings"]["properties"];
        for field in ["title", "text"] {
            assert_eq!(props[field]["type"], "text");
            assert_eq!(props[field]["analyzer"], ANALYZER);
            assert_eq!(props[field]["search_analyzer"], ANALYZER);
        }
        for field in ["uuid", "author", "language", "sentiment", "categories", "url"] {
            assert_eq!(props[field]["type"], "keyword");
        }
        assert_eq!(props["published"]["format"], "strict_date_optional_time||epoch_millis");
    }
}
