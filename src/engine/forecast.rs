// ==========================================
// 经销商网络决策支持系统 - 需求预测引擎
// ==========================================
// 职责: 区域 × SKU 日需求预测
// 输入: 全历史日需求序列 + 近 14 天买家信号
// 输出: ForecastResult (模型 / 置信度 / 置信带 / 可审计解释)
// ==========================================
// 流程:
// 1) 序列 < 10 点 → 均值兜底 (置信度 0.55)
// 2) 80/20 切分回测三个候选模型，MAPE 最小者胜出 (并列取先)
// 3) 胜出模型在全序列上重新拟合并外推
// 4) 买家信号乘数调整 + 残差置信带
// ==========================================

mod core;
mod models;
mod regression;
mod signal;

#[cfg(test)]
mod tests;

pub use self::core::{ForecastEngine, MIN_SERIES_POINTS};
pub use models::{mape, Backtest, CandidateModel};
pub use signal::SignalAdjustment;
