use super::models::{Backtest, CandidateModel};
use super::signal::{SignalAdjustment, SIGNAL_LOOKBACK_DAYS};
use crate::domain::{DailyDemand, ForecastModelKind, ForecastPoint, ForecastResult, ModelScore};
use crate::engine::context::AnalyticsContext;
use crate::repository::{RepositoryError, RepositoryResult};
use chrono::{Duration, NaiveDate};
use tracing::debug;

/// 少于该点数走均值兜底
pub const MIN_SERIES_POINTS: usize = 10;
/// 无任何历史时的兜底日需求
pub const DEFAULT_BASELINE_DEMAND: f64 = 40.0;
/// 兜底路径置信度
pub const FALLBACK_CONFIDENCE: f64 = 0.55;
/// 训练集比例
pub const TRAIN_RATIO: f64 = 0.8;
/// 训练集最少点数
pub const MIN_TRAIN_POINTS: usize = 7;
/// 95% 置信带 z 值
pub const BAND_Z: f64 = 1.96;
/// 验证集残差点数 <= 该值时改用全序列标准差 × 10%
pub const MIN_RESIDUAL_POINTS: usize = 3;
/// 兜底路径置信带相对宽度
pub const FALLBACK_BAND_RATIO: f64 = 0.1;

// ==========================================
// ForecastEngine - 需求预测引擎
// ==========================================
pub struct ForecastEngine {
    // 无状态引擎，每次请求在可用窗口上重新拟合
}

impl ForecastEngine {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 区域 × SKU 需求预测
    ///
    /// # 参数
    /// - `ctx`: 分析上下文（数据源 + 当前日期）
    /// - `sku_id`: SKU
    /// - `region`: 区域名
    /// - `horizon`: 预测天数，必须为正
    ///
    /// # 返回
    /// - Ok(ForecastResult): 数据不足时为均值兜底结果
    /// - Err: horizon 非法或数据访问失败
    pub fn forecast(
        &self,
        ctx: &AnalyticsContext<'_>,
        sku_id: i64,
        region: &str,
        horizon: u32,
    ) -> RepositoryResult<ForecastResult> {
        if horizon == 0 {
            return Err(RepositoryError::ValidationError(
                "forecast horizon must be a positive day count".to_string(),
            ));
        }

        let series = ctx.source().daily_demand_series(sku_id, region)?;
        let signals = ctx.source().buyer_signals(
            sku_id,
            region,
            ctx.window_start(SIGNAL_LOOKBACK_DAYS),
            ctx.today(),
        )?;
        let signal = SignalAdjustment::from_signals(&signals);

        let result = self.forecast_series(&series, &signal, ctx.today(), horizon);
        debug!(
            sku_id,
            region,
            horizon,
            points = series.len(),
            model = %result.model,
            mape = ?result.backtest.iter().find(|b| b.model == result.model).map(|b| b.mape),
            multiplier = result.signal_adjustment,
            "需求预测完成"
        );
        Ok(result)
    }

    /// 在给定序列与信号调整上生成预测（纯计算）
    ///
    /// `today` 仅在序列为空时作为预测起点。
    pub fn forecast_series(
        &self,
        series: &[DailyDemand],
        signal: &SignalAdjustment,
        today: NaiveDate,
        horizon: u32,
    ) -> ForecastResult {
        let anchor = series.last().map(|p| p.date).unwrap_or(today);

        if series.len() < MIN_SERIES_POINTS {
            return self.baseline_forecast(series, signal, anchor, horizon);
        }

        let split = MIN_TRAIN_POINTS.max((series.len() as f64 * TRAIN_RATIO) as usize);
        let (train, validation) = series.split_at(split);

        let backtests: Vec<Backtest> = CandidateModel::candidates()
            .iter()
            .map(|model| model.backtest(train, validation))
            .collect();
        let best = select_best(&backtests);

        let residual_std = {
            let residuals = best.residuals(validation);
            if residuals.len() > MIN_RESIDUAL_POINTS {
                population_std(&residuals)
            } else {
                let values: Vec<f64> = series.iter().map(|p| p.demand).collect();
                population_std(&values) * 0.1
            }
        };

        let future = best.model.predict(series, horizon as usize);
        let points = future
            .iter()
            .enumerate()
            .map(|(i, value)| {
                let forecast = value * signal.multiplier;
                ForecastPoint {
                    date: anchor + Duration::days(i as i64 + 1),
                    forecast,
                    lower: (forecast - BAND_Z * residual_std).max(0.0),
                    upper: forecast + BAND_Z * residual_std,
                }
            })
            .collect();

        let model = best.model.kind();
        ForecastResult {
            model,
            horizon,
            confidence: (1.0 - best.mape).clamp(0.6, 0.9),
            explanation: format!(
                "Selected {} model with MAPE {:.2}. Confidence band derived from residual std {:.2}. {}",
                model, best.mape, residual_std, signal.note
            ),
            signal_adjustment: signal.multiplier,
            backtest: backtests
                .iter()
                .map(|b| ModelScore {
                    model: b.model.kind(),
                    mape: b.mape,
                })
                .collect(),
            points,
        }
    }

    /// 数据不足：历史均值（无数据取 40）平铺，置信带 ±10%
    fn baseline_forecast(
        &self,
        series: &[DailyDemand],
        signal: &SignalAdjustment,
        anchor: NaiveDate,
        horizon: u32,
    ) -> ForecastResult {
        let base = if series.is_empty() {
            DEFAULT_BASELINE_DEMAND
        } else {
            series.iter().map(|p| p.demand).sum::<f64>() / series.len() as f64
        };
        let forecast = base * signal.multiplier;

        let points = (1..=horizon as i64)
            .map(|i| ForecastPoint {
                date: anchor + Duration::days(i),
                forecast,
                lower: forecast * (1.0 - FALLBACK_BAND_RATIO),
                upper: forecast * (1.0 + FALLBACK_BAND_RATIO),
            })
            .collect();

        ForecastResult {
            model: ForecastModelKind::BaselineAverage,
            horizon,
            confidence: FALLBACK_CONFIDENCE,
            explanation: format!(
                "Insufficient historical data; used average demand baseline. {}",
                signal.note
            ),
            signal_adjustment: signal.multiplier,
            backtest: Vec::new(),
            points,
        }
    }
}

impl Default for ForecastEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// MAPE 最小者胜出；并列时保留先出现者（NaN 视为最差）
fn select_best(backtests: &[Backtest]) -> &Backtest {
    let mut best = &backtests[0];
    for candidate in &backtests[1..] {
        let better = match (candidate.mape.is_nan(), best.mape.is_nan()) {
            (true, _) => false,
            (false, true) => true,
            (false, false) => candidate.mape < best.mape,
        };
        if better {
            best = candidate;
        }
    }
    best
}

/// 总体标准差 (除以 n)
fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt()
}
