// ==========================================
// 经销商网络决策支持系统 - 买家信号
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 区域级买家兴趣信号
///
/// search_interest 名义范围 0-100；demand_spike 为需求突增指数；
/// event_tag 为自由文本（例如 "Diwali"）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyerSignal {
    pub region: String,
    pub sku_id: i64,
    pub date: NaiveDate,
    pub search_interest: f64,
    pub demand_spike: f64,
    pub event_tag: Option<String>,
}
