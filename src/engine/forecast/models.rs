use super::regression::SeasonalRegression;
use crate::domain::{DailyDemand, ForecastModelKind};

/// 移动平均默认窗口
pub const MOVING_AVERAGE_WINDOW: usize = 14;
/// 移动平均最小窗口
pub const MOVING_AVERAGE_MIN_WINDOW: usize = 3;
/// 指数平滑系数
pub const SMOOTHING_ALPHA: f64 = 0.3;

/// 候选预测模型
///
/// 统一契约: 在给定历史上拟合，并向前外推 horizon 天。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CandidateModel {
    MovingAverage { window: usize },
    ExponentialSmoothing { alpha: f64 },
    LinearRegression,
}

/// 单个模型的回测结果
#[derive(Debug, Clone, PartialEq)]
pub struct Backtest {
    pub model: CandidateModel,
    pub predictions: Vec<f64>,
    pub mape: f64,
}

impl Backtest {
    /// 验证集残差 (实际 - 预测)
    pub fn residuals(&self, validation: &[DailyDemand]) -> Vec<f64> {
        validation
            .iter()
            .zip(&self.predictions)
            .map(|(actual, predicted)| actual.demand - predicted)
            .collect()
    }
}

impl CandidateModel {
    /// 按并列优先顺序给出默认参数的候选集
    pub fn candidates() -> [CandidateModel; 3] {
        [
            CandidateModel::MovingAverage {
                window: MOVING_AVERAGE_WINDOW,
            },
            CandidateModel::ExponentialSmoothing {
                alpha: SMOOTHING_ALPHA,
            },
            CandidateModel::LinearRegression,
        ]
    }

    pub fn kind(&self) -> ForecastModelKind {
        match self {
            CandidateModel::MovingAverage { .. } => ForecastModelKind::MovingAverage,
            CandidateModel::ExponentialSmoothing { .. } => ForecastModelKind::ExponentialSmoothing,
            CandidateModel::LinearRegression => ForecastModelKind::LinearRegression,
        }
    }

    /// 在 history 上拟合并外推 horizon 天
    ///
    /// history 为空时返回全 0 预测。
    pub fn predict(&self, history: &[DailyDemand], horizon: usize) -> Vec<f64> {
        if history.is_empty() {
            return vec![0.0; horizon];
        }
        match *self {
            CandidateModel::MovingAverage { window } => {
                let level = moving_average_level(history, window);
                vec![level; horizon]
            }
            CandidateModel::ExponentialSmoothing { alpha } => {
                let level = smoothed_level(history, alpha);
                vec![level; horizon]
            }
            CandidateModel::LinearRegression => {
                SeasonalRegression::fit(history).forecast(history, horizon)
            }
        }
    }

    /// 在 train 上拟合，对 validation 回测
    pub fn backtest(&self, train: &[DailyDemand], validation: &[DailyDemand]) -> Backtest {
        let predictions = self.predict(train, validation.len());
        let actual: Vec<f64> = validation.iter().map(|p| p.demand).collect();
        Backtest {
            model: *self,
            mape: mape(&actual, &predictions),
            predictions,
        }
    }
}

/// 最近 window 个点的均值（窗口下限 3，上限为序列长度）
fn moving_average_level(history: &[DailyDemand], window: usize) -> f64 {
    let window = window
        .min(history.len())
        .max(MOVING_AVERAGE_MIN_WINDOW)
        .min(history.len());
    let tail = &history[history.len() - window..];
    tail.iter().map(|p| p.demand).sum::<f64>() / window as f64
}

/// level_t = α·x_t + (1-α)·level_{t-1}，初值为首个观测
fn smoothed_level(history: &[DailyDemand], alpha: f64) -> f64 {
    let mut iter = history.iter();
    let mut level = match iter.next() {
        Some(first) => first.demand,
        None => return 0.0,
    };
    for point in iter {
        level = alpha * point.demand + (1.0 - alpha) * level;
    }
    level
}

/// 平均绝对百分比误差，分母下限 1.0（避免零需求日除零）
pub fn mape(actual: &[f64], predicted: &[f64]) -> f64 {
    let n = actual.len().min(predicted.len());
    if n == 0 {
        return 0.0;
    }
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs() / a.max(1.0))
        .sum::<f64>()
        / n as f64
}
