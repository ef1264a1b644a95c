// ==========================================
// 经销商网络决策支持系统 - 库存记录
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// InventoryRecord - 经销商 × SKU 库存
// ==========================================
// 约束: 每个 (dealer, sku) 至多一条记录
// 约束: quantity >= 0, last_received_date <= today
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub dealer_id: i64,
    pub sku_id: i64,
    pub quantity: i64,
    pub last_received_date: NaiveDate,
}

impl InventoryRecord {
    /// 库龄 (天)，未来日期按 0 处理
    pub fn age_days(&self, today: NaiveDate) -> i64 {
        (today - self.last_received_date).num_days().max(0)
    }
}
