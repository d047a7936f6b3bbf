use crate::models::PaymentRole;
use regex::Regex;
use std::sync::LazyLock;

static RE_DEPOSIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"定-?金").expect("Invalid regex"));

/// "尾款*需有定金" / "尾款（需要有定金）" → 尾款页面
static RE_BALANCE_NEEDS_DEPOSIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"尾款.*需有.*定金|尾款.*需要有.*定金").expect("Invalid regex"));

/// "定金页面需补尾款" / "定金*需补尾款" → 定金页面
static RE_DEPOSIT_NEEDS_BALANCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"定-?金.*需补.*尾款|定-?金.*页面.*尾款").expect("Invalid regex"));

const BALANCE_MARKER: &str = "尾款";

/// 根据商品名判断定金 / 尾款角色
///
/// 同时含两种标记时, 先看 "需有/需补" 上下文, 再按先出现者为准。
pub fn detect_payment_role(name: &str) -> Option<PaymentRole> {
    let deposit_at = RE_DEPOSIT.find(name).map(|m| m.start());
    let balance_at = name.find(BALANCE_MARKER);

    match (deposit_at, balance_at) {
        (None, None) => None,
        (Some(_), None) => Some(PaymentRole::Deposit),
        (None, Some(_)) => Some(PaymentRole::Balance),
        (Some(dep), Some(bal)) => {
            if RE_BALANCE_NEEDS_DEPOSIT.is_match(name) {
                Some(PaymentRole::Balance)
            } else if RE_DEPOSIT_NEEDS_BALANCE.is_match(name) {
                Some(PaymentRole::Deposit)
            } else if dep < bal {
                Some(PaymentRole::Deposit)
            } else {
                Some(PaymentRole::Balance)
            }
        }
    }
}
