use indexmap::IndexSet;
use regex::Regex;
use std::sync::LazyLock;

static RE_KEYWORD_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s+\-]").expect("Invalid regex"));

/// 通用描述词, 不参与关键词重叠匹配 (比较时忽略大小写)
const STOP_WORDS: &[&str] = &[
    "原创", "lolita", "洋装", "连衣裙", "套装", "复古", "优雅", "华丽", "刺绣", "新款", "春季",
    "秋冬", "纯棉", "页面", "时间", "开始", "截止",
];

fn is_stop_word(token: &str) -> bool {
    let lower = token.to_lowercase();
    STOP_WORDS.iter().any(|w| *w == lower)
}

/// 从核心名称中提取有意义的关键词 (用于模糊匹配)
///
/// 按空白 / `+` / `-` 切分, 保留长度 ≥2 且不是通用词的片段, 去重并保持首次出现顺序。
pub fn extract_keywords(core_name: &str) -> IndexSet<String> {
    RE_KEYWORD_SPLIT
        .split(core_name)
        .map(str::trim)
        .filter(|t| t.chars().count() >= 2 && !is_stop_word(t))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_and_filters() {
        let kw = extract_keywords("星河 JSK-Lolita+复古 a 星河");
        let words: Vec<&str> = kw.iter().map(String::as_str).collect();
        assert_eq!(words, vec!["星河", "JSK"]);
    }

    #[test]
    fn stop_words_are_case_insensitive() {
        assert!(extract_keywords("LOLITA lolita LoLiTa").is_empty());
    }

    #[test]
    fn empty_core_name_has_no_keywords() {
        assert!(extract_keywords("").is_empty());
    }
}
