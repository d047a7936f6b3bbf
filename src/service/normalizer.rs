//! 商品名文本清理: 核心名称 (配对主键) 与展示名称。

use regex::Regex;
use std::sync::LazyLock;

/// 按顺序执行的 (模式, 替换) 规则
struct Rule {
    pattern: Regex,
    replacement: &'static str,
}

fn rule(pattern: &str, replacement: &'static str) -> Rule {
    Rule {
        pattern: Regex::new(pattern).expect("Invalid regex"),
        replacement,
    }
}

/// 核心名称规则, 顺序敏感: 先去括号段, 再去营销/状态短语, 最后处理分隔符
static CORE_NAME_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        // 括号段: 【预约期包邮】【定金】 ＜不死锦鲤·横公鱼＞ （定金） (208+800)
        rule(r"【[^】]*】", ""),
        rule(r"＜[^＞]*＞", ""),
        rule(r"[《》]", ""), // 书名号只去符号, 保留内容
        rule(r"（[^）]*）", ""),
        rule(r"\([^)]*\)", ""),
        // 定金 / 尾款 / 状态短语
        rule(r"定-?金", ""),
        rule(r"尾款", ""),
        rule(r"意向", ""),
        rule(r"正式", ""),
        rule(r"预约", ""),
        rule(r"CP先行", ""),
        rule(r"加购小物", ""),
        // 批次: 2团 六批
        rule(r"[0-9]+团", ""),
        rule(r"[0-9]+批", ""),
        rule(r"[一二三四五六七八九十]+团", ""),
        rule(r"[一二三四五六七八九十]+批", ""),
        // 需有定金 / 需补尾款 ... 直到分隔符
        rule(r"需有[^*｜|]*", ""),
        rule(r"需补[^*｜|]*", ""),
        rule(r"需要有[^*｜|]*", ""),
        // 品牌前缀
        rule(r"路德\s*", ""),
        // 日期: 12.5日截  1月2日-2月2日
        rule(r"[0-9]+\.[0-9]+日[^*｜|]*", ""),
        rule(r"[0-9]+月[0-9]+日[^*｜|]*", ""),
        rule(r"春季新款|秋冬纯棉|慢团|成团再贩|2024再贩|页面", ""),
        // 分隔符
        rule(r"[｜|*·]", " "),
        rule(r"\s+", " "),
    ]
});

static DISPLAY_NAME_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        rule(r"【[^】]*】", ""),
        rule(r"＜[^＞]*＞", ""),
        rule(r"（定-?金）", ""),
        rule(r"（尾款）", ""),
        rule(r"CP先行", ""),
        rule(r"定-?金", ""),
        rule(r"尾款", ""),
        rule(r"^\s*-\s*", ""),
        rule(r"\s+", " "),
    ]
});

fn apply_rules(rules: &[Rule], input: &str) -> String {
    rules.iter().fold(input.to_string(), |acc, r| {
        r.pattern.replace_all(&acc, r.replacement).into_owned()
    })
}

fn core_name_pass(input: &str) -> String {
    apply_rules(&CORE_NAME_RULES, input)
        .trim()
        .trim_matches(|c: char| c == '-' || c == ' ')
        .to_string()
}

/// 从原始商品名中提取核心产品名 (系列名), 去除所有噪音
///
/// 单次规则处理后仍可能暴露出新的噪声 (例如删除 `尾款` 后拼出 `定金`),
/// 因此重复处理直到结果不再变化, 保证 `core_name(core_name(x)) == core_name(x)`。
/// 每一轮要么删除字符, 要么把分隔符收敛为单个空格, 循环必然终止。
pub fn core_name(raw: &str) -> String {
    let mut current = core_name_pass(raw);
    loop {
        let next = core_name_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// 清理后的展示名称 (用户可编辑), 比核心名称保留更多信息
pub fn display_name(raw: &str) -> String {
    apply_rules(&DISPLAY_NAME_RULES, raw).trim().to_string()
}
