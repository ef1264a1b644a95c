// ==========================================
// 经销商网络决策支持系统 - 调拨建议
// ==========================================
// 生命周期: 按 (SKU, 区域) 生成，单次预警计算内缓存，随后丢弃
// ==========================================

use serde::{Deserialize, Serialize};

/// 调拨候选
///
/// 约束: from_dealer_id != to_dealer_id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferCandidate {
    pub from_dealer_id: i64,
    pub from_dealer: String,
    pub to_dealer_id: i64,
    pub to_dealer: String,
    pub sku_id: i64,
    pub sku_name: String,
    pub quantity: i64,
    pub distance_km: f64,
    pub logistics_cost: f64,
    /// (接收方覆盖天数 + 1) / (物流成本 + 1)，越高越紧急且越便宜
    pub score: f64,
    pub explanation: String,
}
