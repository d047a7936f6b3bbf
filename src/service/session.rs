use super::catalog::{match_brand, match_category};
use super::normalizer::display_name;
use super::pairing;
use super::role::detect_payment_role;
use crate::error::{ReconcileError, Result};
use crate::models::{
    parse_order_time, Catalog, CandidateItem, ImportSummary, ItemPatch, PaymentRole, PriceType,
    PurchaseRecord, RawOrderItem,
};
use bigdecimal::{BigDecimal, Zero};
use indexmap::IndexSet;
use std::collections::HashSet;

/// 一次导入会话: 候选项列表 + 用户校对 + 提交
///
/// 角色识别与自动配对只在创建时执行一次, 之后只能通过手动操作修改。
#[derive(Debug, Clone)]
pub struct ImportSession {
    items: Vec<CandidateItem>,
}

/// 提交结果
#[derive(Debug, Clone)]
pub struct CommitOutcome {
    pub records: Vec<PurchaseRecord>,
    pub summary: ImportSummary,
}

impl ImportSession {
    pub fn new(raw_items: Vec<RawOrderItem>, catalog: &Catalog) -> Result<Self> {
        if raw_items.is_empty() {
            return Err(ReconcileError::EmptyBatch);
        }

        let mut items: Vec<CandidateItem> = raw_items
            .into_iter()
            .map(|raw| build_candidate(raw, catalog))
            .collect();

        let paired = pairing::auto_match(&mut items);
        tracing::info!("导入会话创建: {} 个候选项, 自动配对 {} 组", items.len(), paired);

        Ok(Self { items })
    }

    pub fn items(&self) -> &[CandidateItem] {
        &self.items
    }

    pub fn item(&self, index: usize) -> Result<&CandidateItem> {
        self.items.get(index).ok_or(ReconcileError::IndexOutOfRange {
            index,
            len: self.items.len(),
        })
    }

    /// 编辑候选项的可修改字段 (不影响角色与配对)
    pub fn update_item(&mut self, index: usize, patch: ItemPatch) -> Result<&CandidateItem> {
        let len = self.items.len();
        let item = self
            .items
            .get_mut(index)
            .ok_or(ReconcileError::IndexOutOfRange { index, len })?;

        if let Some(name) = patch.name {
            item.name = name;
        }
        if let Some(brand_id) = patch.brand_id {
            item.brand_id = Some(brand_id);
        }
        if let Some(category_id) = patch.category_id {
            item.category_id = Some(category_id);
        }
        if let Some(color) = patch.color {
            item.color = color;
        }
        if let Some(size) = patch.size {
            item.size = size;
        }
        if let Some(price) = patch.price {
            item.price = price;
        }
        if let Some(purchase_date) = patch.purchase_date {
            item.purchase_date = purchase_date;
        }
        if let Some(image_url) = patch.image_url {
            item.image_url = Some(image_url);
        }
        Ok(&*item)
    }

    pub fn set_role(&mut self, index: usize, role: Option<PaymentRole>) -> Result<()> {
        pairing::set_role(&mut self.items, index, role)
    }

    pub fn manual_pair(&mut self, a: usize, b: usize) -> Result<()> {
        pairing::manual_pair(&mut self.items, a, b)
    }

    pub fn unpair(&mut self, index: usize) -> Result<()> {
        pairing::unpair(&mut self.items, index)
    }

    /// 可提交的候选项下标
    ///
    /// 已配对的尾款项只需价格有效, 其余项需要品牌和类型。
    pub fn valid_indices(&self) -> HashSet<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| {
                if item.payment_role == Some(PaymentRole::Balance) && item.is_paired() {
                    item.price > BigDecimal::zero()
                } else {
                    item.brand_id.is_some() && item.category_id.is_some()
                }
            })
            .map(|(idx, _)| idx)
            .collect()
    }

    /// 生成购买记录: 配对项合并为一条定金+尾款记录, 其余为全款记录
    pub fn commit(&self) -> Result<CommitOutcome> {
        let valid = self.valid_indices();
        if valid.is_empty() {
            return Err(ReconcileError::NothingToCommit);
        }

        let mut processed: HashSet<usize> = HashSet::new();
        let mut records = Vec::with_capacity(valid.len());
        let mut merged_count = 0;

        for (index, item) in self.items.iter().enumerate() {
            if !valid.contains(&index) || processed.contains(&index) {
                continue;
            }

            let partner = item.paired_with.filter(|&p| {
                valid.contains(&p) && self.items.get(p).and_then(|o| o.paired_with) == Some(index)
            });

            match partner {
                Some(partner) => {
                    let (dep_idx, bal_idx) = self.split_pair(index, partner);
                    records.push(merged_record(&self.items[dep_idx], &self.items[bal_idx], dep_idx, bal_idx));
                    processed.insert(index);
                    processed.insert(partner);
                    merged_count += 1;
                }
                None => {
                    records.push(full_record(item, index));
                    processed.insert(index);
                }
            }
        }

        let summary = ImportSummary {
            imported_count: records.len(),
            merged_count,
            skipped_count: self.items.len() - valid.len(),
        };
        tracing::info!(
            "导入完成: 共 {} 条记录, 定金尾款合并 {} 条, 跳过 {} 项",
            summary.imported_count,
            summary.merged_count,
            summary.skipped_count
        );
        Ok(CommitOutcome { records, summary })
    }

    /// 区分配对中的定金方与尾款方: 定金角色优先, 否则取非尾款方, 否则取前者
    fn split_pair(&self, a: usize, b: usize) -> (usize, usize) {
        let role = |idx: usize| self.items[idx].payment_role;
        if role(b) == Some(PaymentRole::Deposit) && role(a) != Some(PaymentRole::Deposit) {
            (b, a)
        } else if role(a) == Some(PaymentRole::Balance) && role(b) != Some(PaymentRole::Balance) {
            (b, a)
        } else {
            (a, b)
        }
    }
}

fn build_candidate(raw: RawOrderItem, catalog: &Catalog) -> CandidateItem {
    let brand_id = match_brand(&raw.shop_name, &catalog.brands).map(|b| b.id);
    let category_id = match_category(raw.parsed_type.as_deref(), &catalog.categories).map(|c| c.id);

    CandidateItem {
        name: display_name(&raw.raw_name),
        brand_id,
        category_id,
        color: raw.parsed_color.clone().unwrap_or_default(),
        size: raw.parsed_size.clone().unwrap_or_default(),
        price: raw.price.clone(),
        purchase_date: raw.order_time.clone(),
        image_url: None,
        style_spec: raw.style_spec.clone(),
        payment_role: detect_payment_role(&raw.raw_name),
        paired_with: None,
        core_name: String::new(),
        keywords: IndexSet::new(),
        original: raw,
    }
}

fn non_blank(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn full_record(item: &CandidateItem, index: usize) -> PurchaseRecord {
    PurchaseRecord {
        name: item.name.clone(),
        brand_id: item.brand_id,
        category_id: item.category_id,
        color: non_blank(&item.color),
        size: non_blank(&item.size),
        image_url: item.image_url.clone(),
        price_type: PriceType::Full,
        total_price: item.price.clone(),
        deposit: None,
        balance: None,
        purchase_date: parse_order_time(&item.purchase_date),
        source_indices: vec![index],
    }
}

/// 定金尾款合并记录, 以定金项作为主数据源
fn merged_record(deposit: &CandidateItem, balance: &CandidateItem, dep_idx: usize, bal_idx: usize) -> PurchaseRecord {
    PurchaseRecord {
        name: deposit.name.clone(),
        brand_id: deposit.brand_id,
        category_id: deposit.category_id,
        color: non_blank(&deposit.color),
        size: non_blank(&deposit.size),
        image_url: deposit.image_url.clone(),
        price_type: PriceType::DepositBalance,
        total_price: &deposit.price + &balance.price,
        deposit: Some(deposit.price.clone()),
        balance: Some(balance.price.clone()),
        purchase_date: parse_order_time(&deposit.purchase_date),
        source_indices: vec![dep_idx, bal_idx],
    }
}
