use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// 订单导出文件中的一行商品 (由外部解析器产出, 只读)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawOrderItem {
    pub shop_name: String,
    #[serde(default)]
    pub product_url: String,
    pub raw_name: String,
    #[serde(default)]
    pub style_spec: String,
    pub price: BigDecimal,
    #[serde(default)]
    pub order_time: String,       // "yyyy-MM-dd HH:mm" 或 "yyyy-MM-dd"
    #[serde(default)]
    pub parsed_color: Option<String>,
    #[serde(default)]
    pub parsed_size: Option<String>,
    #[serde(default)]
    pub parsed_type: Option<String>,
}

/// 解析订单时间
///
/// 依次尝试 `%Y-%m-%d %H:%M` 与 `%Y-%m-%d`; 与宽松的日期解析一致,
/// 已识别前缀之后的多余字符 (如秒) 会被忽略。无法解析时返回 `None`。
pub fn parse_order_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok((dt, _)) = NaiveDateTime::parse_and_remainder(raw, "%Y-%m-%d %H:%M") {
        return Some(dt);
    }
    NaiveDate::parse_and_remainder(raw, "%Y-%m-%d")
        .ok()
        .and_then(|(date, _)| date.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minute_precision() {
        let dt = parse_order_time("2024-03-05 14:07").unwrap();
        assert_eq!(dt.to_string(), "2024-03-05 14:07:00");
    }

    #[test]
    fn parses_date_only_as_midnight() {
        let dt = parse_order_time("2024-03-05").unwrap();
        assert_eq!(dt.to_string(), "2024-03-05 00:00:00");
    }

    #[test]
    fn ignores_trailing_seconds() {
        let dt = parse_order_time("2024-03-05 14:07:59").unwrap();
        assert_eq!(dt.to_string(), "2024-03-05 14:07:00");
    }

    #[test]
    fn garbage_is_absent() {
        assert!(parse_order_time("").is_none());
        assert!(parse_order_time("昨天下午").is_none());
        assert!(parse_order_time("2024/03/05").is_none());
    }
}
