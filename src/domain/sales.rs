// ==========================================
// 经销商网络决策支持系统 - 销售观测
// ==========================================
// 说明: 同一天同一 (dealer, sku) 可能存在多条观测，聚合时求和
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 单条销售观测
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesObservation {
    pub dealer_id: i64,
    pub sku_id: i64,
    pub date: NaiveDate,
    pub demand: f64,
    pub fulfilled: f64,
    pub stockout: bool,
}

/// 销售聚合结果 (sum(demand), sum(fulfilled), count, sum(stockout))
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesAggregate {
    pub total_demand: f64,
    pub total_fulfilled: f64,
    pub observation_count: i64,
    pub stockout_count: i64,
}

impl SalesAggregate {
    /// 断货率 = 断货观测数 / 观测数 (无数据为 0)
    pub fn stockout_rate(&self) -> f64 {
        if self.observation_count > 0 {
            self.stockout_count as f64 / self.observation_count as f64
        } else {
            0.0
        }
    }

    /// 周转率 = 已满足量 / 库存量 (无库存为 0)
    pub fn turnover_against(&self, inventory_units: f64) -> f64 {
        if inventory_units > 0.0 {
            self.total_fulfilled / inventory_units
        } else {
            0.0
        }
    }
}

/// 区域日需求点 (按日期汇总后)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyDemand {
    pub date: NaiveDate,
    pub demand: f64,
}
