use super::RawOrderItem;
use bigdecimal::BigDecimal;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// 定金 / 尾款
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentRole {
    Deposit,
    Balance,
}

/// 待导入商品的可编辑状态
///
/// `paired_with` 是同一批次列表中的下标, 配对关系始终双向对称。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateItem {
    pub original: RawOrderItem,
    pub name: String,
    pub brand_id: Option<i64>,
    pub category_id: Option<i64>,
    pub color: String,
    pub size: String,
    pub price: BigDecimal,
    pub purchase_date: String,
    pub image_url: Option<String>,
    pub style_spec: String,
    pub payment_role: Option<PaymentRole>,
    pub paired_with: Option<usize>,
    pub core_name: String,
    pub keywords: IndexSet<String>,
}

impl CandidateItem {
    pub fn is_paired(&self) -> bool {
        self.paired_with.is_some()
    }
}

/// 商品编辑补丁, 未填写的字段保持不变
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub brand_id: Option<i64>,
    pub category_id: Option<i64>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub price: Option<BigDecimal>,
    pub purchase_date: Option<String>,
    pub image_url: Option<String>,
}
