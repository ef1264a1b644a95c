// ==========================================
// 经销商网络决策支持系统 - 经销商健康度
// ==========================================

use crate::domain::types::HealthCategory;
use serde::{Deserialize, Serialize};

/// 单个经销商的健康度记录（60 天窗口）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealerHealth {
    pub dealer_id: i64,
    pub dealer_name: String,
    pub region: String,
    pub health_score: f64,
    pub category: HealthCategory,
    pub turnover_ratio: f64,
    pub aging_percent: f64,
    pub stockout_rate: f64,
}
