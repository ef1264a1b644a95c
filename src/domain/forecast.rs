// ==========================================
// 经销商网络决策支持系统 - 预测结果
// ==========================================
// 生命周期: 每次预测请求构造，调用方即时消费后丢弃
// ==========================================

use crate::domain::types::ForecastModelKind;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 单日预测点
///
/// 约束: 0 <= lower <= forecast <= upper
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub forecast: f64,
    pub lower: f64,
    pub upper: f64,
}

impl ForecastPoint {
    /// 三个数值统一乘以系数
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            date: self.date,
            forecast: self.forecast * factor,
            lower: self.lower * factor,
            upper: self.upper * factor,
        }
    }
}

/// 候选模型回测得分
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelScore {
    pub model: ForecastModelKind,
    pub mape: f64,
}

/// 需求预测结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub model: ForecastModelKind,
    pub horizon: u32,
    /// 置信度，取值 [0.55, 0.9]
    pub confidence: f64,
    /// 可审计解释：模型、MAPE、残差标准差、信号调整原因
    pub explanation: String,
    /// 买家信号乘数，取值 [0.8, 1.3]
    pub signal_adjustment: f64,
    /// 各候选模型的回测 MAPE（兜底路径为空）
    pub backtest: Vec<ModelScore>,
    pub points: Vec<ForecastPoint>,
}

impl ForecastResult {
    /// 预测期内的日均预测量
    pub fn mean_daily_forecast(&self) -> f64 {
        if self.horizon == 0 {
            return 0.0;
        }
        self.points.iter().map(|p| p.forecast).sum::<f64>() / self.horizon as f64
    }
}

/// 对外预测包络（预测与 what-if 共用）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEnvelope {
    pub sku_id: i64,
    pub region: String,
    pub model: ForecastModelKind,
    pub horizon: u32,
    pub confidence: f64,
    pub explanation: String,
    pub signal_adjustment: f64,
    pub points: Vec<ForecastPoint>,
}

impl ForecastEnvelope {
    pub fn from_result(sku_id: i64, region: &str, result: ForecastResult) -> Self {
        Self {
            sku_id,
            region: region.to_string(),
            model: result.model,
            horizon: result.horizon,
            confidence: result.confidence,
            explanation: result.explanation,
            signal_adjustment: result.signal_adjustment,
            points: result.points,
        }
    }
}
