use crate::models::{Brand, Catalog, Category, CategoryGroup, MissingDataItem, MissingDataType, RawOrderItem};
use std::collections::{BTreeMap, BTreeSet};

/// 类型别名表: 类型名 → 解析出的款式关键词
const CATEGORY_ALIASES: &[(&str, &[&str])] = &[
    ("OP", &["OP", "开襟OP", "堆褶OP", "堆褶开襟OP"]),
    ("SK", &["SK", "拼色SK"]),
    ("JSK", &["JSK"]),
    ("斗篷", &["斗篷", "罩衫斗篷"]),
    ("其他头饰", &["头饰", "蝴蝶结头饰"]),
];

const ACCESSORY_KEYWORDS: &[&str] = &[
    "头饰", "蝴蝶结", "帽子", "KC", "发带", "发夹", "包", "鞋", "袜", "手套", "项链", "耳环", "戒指",
    "胸针", "腰链",
];

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// 按店铺名匹配品牌: 店铺名包含品牌名, 或品牌名包含店铺名
pub fn match_brand<'a>(shop_name: &str, brands: &'a [Brand]) -> Option<&'a Brand> {
    if shop_name.trim().is_empty() {
        return None;
    }
    brands.iter().find(|brand| {
        contains_ignore_case(shop_name, &brand.name) || contains_ignore_case(&brand.name, shop_name)
    })
}

/// 按解析出的款式匹配类型: 先精确匹配, 再查别名表
pub fn match_category<'a>(parsed_type: Option<&str>, categories: &'a [Category]) -> Option<&'a Category> {
    let parsed_type = parsed_type?;
    let lower = parsed_type.to_lowercase();
    if let Some(exact) = categories.iter().find(|c| c.name.to_lowercase() == lower) {
        return Some(exact);
    }
    for (category_name, aliases) in CATEGORY_ALIASES {
        if aliases.iter().any(|alias| contains_ignore_case(parsed_type, alias)) {
            if let Some(found) = categories.iter().find(|c| c.name == *category_name) {
                return Some(found);
            }
        }
    }
    None
}

/// 推测新类型所属分组
pub fn guess_category_group(parsed_type: &str) -> CategoryGroup {
    if ACCESSORY_KEYWORDS.iter().any(|k| contains_ignore_case(parsed_type, k)) {
        CategoryGroup::Accessory
    } else {
        CategoryGroup::Clothing
    }
}

/// 扫描导入前缺失的品牌和类型 (均按名称排序)
pub fn scan_missing(items: &[RawOrderItem], catalog: &Catalog) -> Vec<MissingDataItem> {
    let mut missing_brands: BTreeSet<&str> = BTreeSet::new();
    let mut missing_categories: BTreeMap<&str, CategoryGroup> = BTreeMap::new();

    for item in items {
        if !item.shop_name.trim().is_empty() && match_brand(&item.shop_name, &catalog.brands).is_none() {
            missing_brands.insert(&item.shop_name);
        }
        if let Some(parsed_type) = item.parsed_type.as_deref() {
            if match_category(Some(parsed_type), &catalog.categories).is_none() {
                missing_categories.insert(parsed_type, guess_category_group(parsed_type));
            }
        }
    }

    let brands = missing_brands.into_iter().map(|name| MissingDataItem {
        name: name.to_string(),
        kind: MissingDataType::Brand,
        group: None,
    });
    let categories = missing_categories.into_iter().map(|(name, group)| MissingDataItem {
        name: name.to_string(),
        kind: MissingDataType::Category,
        group: Some(group),
    });
    brands.chain(categories).collect()
}
