use crate::error::Result;
use crate::models::{PriceType, PurchaseRecord};
use bigdecimal::BigDecimal;
use std::fs::File;
use std::path::Path;

const HEADER: [&str; 11] = [
    "name", "brand_id", "category_id", "color", "size", "image_url", "price_type", "total_price",
    "deposit", "balance", "purchase_date",
];

/// 将 Option<BigDecimal> 转换为 CSV 字符串
fn decimal_to_csv(val: &Option<BigDecimal>) -> String {
    val.as_ref().map(|v| v.to_string()).unwrap_or_default()
}

fn id_to_csv(val: Option<i64>) -> String {
    val.map(|v| v.to_string()).unwrap_or_default()
}

fn price_type_to_csv(price_type: PriceType) -> &'static str {
    match price_type {
        PriceType::Full => "FULL",
        PriceType::DepositBalance => "DEPOSIT_BALANCE",
    }
}

/// 导出购买记录到 CSV 文件
pub fn export_to_csv(records: &[PurchaseRecord], output_path: &Path) -> Result<()> {
    let file = File::create(output_path)?;
    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(HEADER)?;

    for record in records {
        writer.write_record(&[
            record.name.clone(),
            id_to_csv(record.brand_id),
            id_to_csv(record.category_id),
            record.color.clone().unwrap_or_default(),
            record.size.clone().unwrap_or_default(),
            record.image_url.clone().unwrap_or_default(),
            price_type_to_csv(record.price_type).to_string(),
            record.total_price.to_string(),
            decimal_to_csv(&record.deposit),
            decimal_to_csv(&record.balance),
            record
                .purchase_date
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        ])?;
    }

    writer.flush()?;
    tracing::info!("导出 {} 条购买记录到 {}", records.len(), output_path.display());
    Ok(())
}
