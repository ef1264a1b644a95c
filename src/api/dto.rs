// ==========================================
// 经销商网络决策支持系统 - API 请求/响应对象
// ==========================================

use serde::{Deserialize, Serialize};

/// 网络概览
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub total_inventory_units: i64,
    pub total_skus: usize,
    pub total_dealers: usize,
    pub stockout_risk_count: usize,
    pub dead_stock_risk_count: usize,
}

/// What-if 模拟请求
///
/// horizon 缺省时使用配置的默认预测天数。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhatIfRequest {
    pub sku_id: i64,
    pub region: String,
    #[serde(default)]
    pub horizon: Option<u32>,
    #[serde(default)]
    pub percent_change: f64,
    #[serde(default)]
    pub event_tag: Option<String>,
}
