use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceType {
    Full,
    DepositBalance,
}

/// 提交后的购买记录 (交给持久化层)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    pub name: String,
    pub brand_id: Option<i64>,
    pub category_id: Option<i64>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub image_url: Option<String>,
    pub price_type: PriceType,
    pub total_price: BigDecimal,
    pub deposit: Option<BigDecimal>,
    pub balance: Option<BigDecimal>,
    pub purchase_date: Option<NaiveDateTime>,
    pub source_indices: Vec<usize>,  // 来源候选项下标
}

/// 导入结果统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub imported_count: usize,
    pub merged_count: usize,  // 定金尾款合并数
    pub skipped_count: usize, // 未完善跳过数
}
