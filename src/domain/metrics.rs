// ==========================================
// 经销商网络决策支持系统 - 库存运营指标
// ==========================================

use serde::{Deserialize, Serialize};

/// 30 天窗口库存运营指标（全网或单个经销商）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InventoryMetrics {
    pub total_inventory_units: i64,
    pub aging_percent: f64,
    pub turnover_ratio: f64,
    pub fill_rate: f64,
}
