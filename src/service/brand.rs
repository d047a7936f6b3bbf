use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static RE_LATIN_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]{2,}").expect("Invalid regex"));

/// 2-4 个连续汉字
static RE_CJK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x{4e00}-\x{9fff}]{2,4}").expect("Invalid regex"));

/// 店铺名中的通用词: 原创 独立 设计师 品牌 洋服 洋装 工作室 新款
const GENERIC_SHOP_WORDS: &[&str] = &["原创", "独立", "设计师", "品牌", "洋服", "洋装", "工作室", "新款"];

/// 提取店铺名中的品牌关键词
pub fn brand_keywords(shop_name: &str) -> HashSet<String> {
    let mut keywords: HashSet<String> = RE_LATIN_WORD
        .find_iter(shop_name)
        .map(|m| m.as_str().to_lowercase())
        .collect();
    keywords.extend(
        RE_CJK_RUN
            .find_iter(shop_name)
            .map(|m| m.as_str())
            .filter(|w| !GENERIC_SHOP_WORDS.contains(w))
            .map(str::to_string),
    );
    keywords
}

/// 判断两个店铺名是否属于同一品牌 (同品牌不同店铺名)
///
/// 双方关键词都非空且有交集即认为同品牌。
pub fn shops_are_same_brand(shop_a: &str, shop_b: &str) -> bool {
    let a = brand_keywords(shop_a);
    let b = brand_keywords(shop_b);
    if a.is_empty() || b.is_empty() {
        return false;
    }
    !a.is_disjoint(&b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin_tokens_fold_case() {
        assert!(shops_are_same_brand("Moonlight洋装店", "MOONLIGHT Official"));
    }

    #[test]
    fn cjk_runs_match() {
        assert!(shops_are_same_brand("星河", "星河 二店"));
    }

    #[test]
    fn generic_words_do_not_count() {
        assert!(!shops_are_same_brand("原创", "原创"));
        let kw = brand_keywords("原创 设计师 Studio");
        assert_eq!(kw.len(), 1);
        assert!(kw.contains("studio"));
    }

    #[test]
    fn unrelated_or_empty_shops_differ() {
        assert!(!shops_are_same_brand("星河", "月光"));
        assert!(!shops_are_same_brand("", "星河"));
        assert!(!shops_are_same_brand("a b", "a b"));
    }
}
