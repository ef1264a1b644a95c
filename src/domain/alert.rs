// ==========================================
// 经销商网络决策支持系统 - 库存预警
// ==========================================
// 生命周期: 生成后只读，不再修改
// ==========================================

use crate::domain::types::{AlertType, RecommendedAction};
use serde::{Deserialize, Serialize};

/// 触发预警时的指标快照
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertMetrics {
    pub days_of_cover: f64,
    pub turnover_ratio: f64,
    pub stockout_rate: f64,
    pub aging_percent: f64,
}

/// 经销商 × SKU 预警
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub dealer_id: i64,
    pub dealer_name: String,
    pub sku_id: i64,
    pub sku_name: String,
    pub alert_type: AlertType,
    pub recommended_action: RecommendedAction,
    pub confidence: f64,
    pub reasoning: String,
    pub metrics: AlertMetrics,
}
