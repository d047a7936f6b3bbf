//! 定金尾款自动配对与手动调整
//!
//! 配对关系以列表下标表示 (`paired_with`), 任何操作结束后都满足:
//! `items[a].paired_with == Some(b)` ⟺ `items[b].paired_with == Some(a)`, 且不与自身配对。

use super::brand::shops_are_same_brand;
use super::keywords::extract_keywords;
use super::normalizer::core_name;
use crate::error::{ReconcileError, Result};
use crate::models::{CandidateItem, PaymentRole};

/// 核心名称完全相同
pub const SCORE_CORE_NAME_EQUAL: u32 = 10;
/// 核心名称包含关系
pub const SCORE_CORE_NAME_CONTAINS: u32 = 7;
/// 关键词重叠 (仅在前面得分 < 7 时参与)
pub const SCORE_KEYWORD_OVERLAP: u32 = 6;
/// 商品链接相同
pub const SCORE_URL_EQUAL: u32 = 8;
pub const SCORE_SHOP_EQUAL: u32 = 3;
pub const SCORE_SAME_BRAND: u32 = 2;
/// 至少需要名称匹配或 URL 匹配
pub const PAIR_THRESHOLD: u32 = 8;

const MIN_CONTAINED_LEN: usize = 3;
const MIN_KEYWORD_OVERLAP: usize = 2;

/// 预计算每个项的核心名称和关键词
pub fn compute_signals(items: &mut [CandidateItem]) {
    for item in items.iter_mut() {
        item.core_name = core_name(&item.original.raw_name);
        item.keywords = extract_keywords(&item.core_name);
    }
}

/// 定金项与尾款项的匹配得分
///
/// 各项加分按固定顺序累加, 关键词重叠只在此前得分不足 7 时作为兜底。
pub fn score_pair(deposit: &CandidateItem, balance: &CandidateItem) -> u32 {
    let mut score = 0;
    let (dep_core, bal_core) = (deposit.core_name.as_str(), balance.core_name.as_str());

    if !dep_core.is_empty() && dep_core == bal_core {
        score += SCORE_CORE_NAME_EQUAL;
    } else if !dep_core.is_empty() && !bal_core.is_empty() {
        let (shorter, longer) = if dep_core.chars().count() <= bal_core.chars().count() {
            (dep_core, bal_core)
        } else {
            (bal_core, dep_core)
        };
        if shorter.chars().count() >= MIN_CONTAINED_LEN && longer.contains(shorter) {
            score += SCORE_CORE_NAME_CONTAINS;
        }
    }

    if score < SCORE_CORE_NAME_CONTAINS
        && !deposit.keywords.is_empty()
        && !balance.keywords.is_empty()
    {
        let overlap = deposit.keywords.intersection(&balance.keywords).count();
        let smaller = deposit.keywords.len().min(balance.keywords.len());
        // overlap / smaller >= 0.6
        if overlap >= MIN_KEYWORD_OVERLAP && overlap * 5 >= smaller * 3 {
            score += SCORE_KEYWORD_OVERLAP;
        }
    }

    let dep_url = &deposit.original.product_url;
    if !dep_url.trim().is_empty() && *dep_url == balance.original.product_url {
        score += SCORE_URL_EQUAL;
    }

    let (dep_shop, bal_shop) = (&deposit.original.shop_name, &balance.original.shop_name);
    if !dep_shop.trim().is_empty() && !bal_shop.trim().is_empty() {
        if dep_shop == bal_shop {
            score += SCORE_SHOP_EQUAL;
        } else if shops_are_same_brand(dep_shop, bal_shop) {
            score += SCORE_SAME_BRAND;
        }
    }

    score
}

/// 自动匹配定金尾款配对, 返回新建的配对数
///
/// 按原顺序遍历定金项, 为每个定金项在尚未使用的尾款项中找得分最高者
/// (同分取先出现者), 得分 ≥ [`PAIR_THRESHOLD`] 立即配对。贪心单遍, 不回溯:
/// 先处理的定金项可能占用后面定金项的最佳候选。已有配对的项视为已使用。
pub fn auto_match(items: &mut [CandidateItem]) -> usize {
    compute_signals(items);

    let mut used: Vec<bool> = items.iter().map(CandidateItem::is_paired).collect();
    let deposits: Vec<usize> = indices_with_role(items, PaymentRole::Deposit);
    let balances: Vec<usize> = indices_with_role(items, PaymentRole::Balance);

    let mut paired = 0;
    for &d_idx in &deposits {
        if used[d_idx] {
            continue;
        }

        let mut best: Option<(usize, u32)> = None;
        for &b_idx in &balances {
            if used[b_idx] {
                continue;
            }
            let score = score_pair(&items[d_idx], &items[b_idx]);
            tracing::debug!("score deposit {} × balance {} = {}", d_idx, b_idx, score);
            if score > best.map_or(0, |(_, s)| s) {
                best = Some((b_idx, score));
            }
        }

        if let Some((b_idx, score)) = best {
            if score >= PAIR_THRESHOLD {
                items[d_idx].paired_with = Some(b_idx);
                items[b_idx].paired_with = Some(d_idx);
                used[d_idx] = true;
                used[b_idx] = true;
                paired += 1;
                tracing::debug!("paired deposit {} with balance {} (score {})", d_idx, b_idx, score);
            }
        }
    }

    tracing::info!(
        "定金尾款自动匹配完成: 定金 {} 项, 尾款 {} 项, 配对 {} 组",
        deposits.len(),
        balances.len(),
        paired
    );
    paired
}

fn indices_with_role(items: &[CandidateItem], role: PaymentRole) -> Vec<usize> {
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.payment_role == Some(role))
        .map(|(idx, _)| idx)
        .collect()
}

fn check_index(items: &[CandidateItem], index: usize) -> Result<()> {
    if index < items.len() {
        Ok(())
    } else {
        Err(ReconcileError::IndexOutOfRange { index, len: items.len() })
    }
}

/// 清除 `index` 及其配对方的配对关系
fn detach(items: &mut [CandidateItem], index: usize) {
    if let Some(partner) = items[index].paired_with.take() {
        if let Some(other) = items.get_mut(partner) {
            if other.paired_with == Some(index) {
                other.paired_with = None;
            }
        }
    }
}

/// 手动设置定金/尾款角色, 角色变化时先解除旧配对
pub fn set_role(items: &mut [CandidateItem], index: usize, role: Option<PaymentRole>) -> Result<()> {
    check_index(items, index)?;
    if items[index].payment_role != role {
        detach(items, index);
    }
    items[index].payment_role = role;
    Ok(())
}

/// 手动配对两个项, 先解除双方已有配对
pub fn manual_pair(items: &mut [CandidateItem], a: usize, b: usize) -> Result<()> {
    check_index(items, a)?;
    check_index(items, b)?;
    if a == b {
        return Err(ReconcileError::SelfPair(a));
    }
    detach(items, a);
    detach(items, b);
    items[a].paired_with = Some(b);
    items[b].paired_with = Some(a);
    Ok(())
}

/// 取消配对, 未配对时无操作
pub fn unpair(items: &mut [CandidateItem], index: usize) -> Result<()> {
    check_index(items, index)?;
    detach(items, index);
    Ok(())
}
