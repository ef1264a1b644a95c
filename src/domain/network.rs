// ==========================================
// 经销商网络决策支持系统 - 网络主数据
// ==========================================
// 职责: 经销商 / SKU 只读值对象
// 红线: 不含数据访问逻辑，关系通过仓储显式查询
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// Dealer - 经销商
// ==========================================
// 约束: 每个经销商唯一归属一个区域
// 约束: 纬度 [-90, 90]，经度 [-180, 180]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dealer {
    pub id: i64,
    pub name: String,
    pub region: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Dealer {
    /// 坐标是否落在合法范围内
    pub fn has_valid_coordinates(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

// ==========================================
// Sku - 产品规格
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sku {
    pub id: i64,
    pub name: String,
    pub color_family: String,
    pub size_ltr: f64,    // 规格 (升)
    pub unit_cost: f64,   // 单位成本 (>= 0)
    pub unit_price: f64,  // 单位售价 (>= 0)
}
