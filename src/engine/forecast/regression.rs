use crate::domain::DailyDemand;
use chrono::{Datelike, Duration, NaiveDate};
use nalgebra::{DMatrix, DVector};

const FEATURE_COUNT: usize = 4;

/// 特征: [时间序号, sin(2π·doy/365), cos(2π·doy/365), 月份]
fn features(index: usize, date: NaiveDate) -> [f64; FEATURE_COUNT] {
    let angle = 2.0 * std::f64::consts::PI * date.ordinal() as f64 / 365.0;
    [index as f64, angle.sin(), angle.cos(), date.month() as f64]
}

/// 带截距的季节线性回归
///
/// 先对特征与目标去均值，再用 SVD 求最小范数最小二乘解；
/// 共线特征（例如短序列内月份恒定）对应系数为 0。
#[derive(Debug, Clone, PartialEq)]
pub(super) struct SeasonalRegression {
    intercept: f64,
    coefficients: [f64; FEATURE_COUNT],
}

impl SeasonalRegression {
    pub(super) fn fit(history: &[DailyDemand]) -> Self {
        let n = history.len();
        if n == 0 {
            return Self {
                intercept: 0.0,
                coefficients: [0.0; FEATURE_COUNT],
            };
        }

        let rows: Vec<[f64; FEATURE_COUNT]> = history
            .iter()
            .enumerate()
            .map(|(i, p)| features(i, p.date))
            .collect();

        let mut feature_means = [0.0; FEATURE_COUNT];
        for row in &rows {
            for (mean, value) in feature_means.iter_mut().zip(row) {
                *mean += value / n as f64;
            }
        }
        let target_mean = history.iter().map(|p| p.demand).sum::<f64>() / n as f64;

        let x = DMatrix::from_fn(n, FEATURE_COUNT, |i, j| rows[i][j] - feature_means[j]);
        let y = DVector::from_fn(n, |i, _| history[i].demand - target_mean);

        let svd = x.svd(true, true);
        let largest = svd
            .singular_values
            .iter()
            .cloned()
            .fold(0.0_f64, f64::max);

        let mut coefficients = [0.0; FEATURE_COUNT];
        if largest > 0.0 {
            let tolerance = largest * (n.max(FEATURE_COUNT) as f64) * f64::EPSILON;
            if let Ok(beta) = svd.solve(&y, tolerance) {
                for (c, b) in coefficients.iter_mut().zip(beta.iter()) {
                    *c = if b.is_finite() { *b } else { 0.0 };
                }
            }
        }

        let intercept = target_mean
            - coefficients
                .iter()
                .zip(&feature_means)
                .map(|(c, m)| c * m)
                .sum::<f64>();

        Self {
            intercept,
            coefficients,
        }
    }

    fn predict_one(&self, index: usize, date: NaiveDate) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(features(index, date))
                .map(|(c, f)| c * f)
                .sum::<f64>()
    }

    /// 从 history 最后一天的次日起外推，结果截断为非负
    pub(super) fn forecast(&self, history: &[DailyDemand], horizon: usize) -> Vec<f64> {
        let Some(last) = history.last() else {
            return vec![0.0; horizon];
        };
        let offset = history.len();
        (0..horizon)
            .map(|i| {
                let date = last.date + Duration::days(i as i64 + 1);
                self.predict_one(offset + i, date).max(0.0)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[f64]) -> Vec<DailyDemand> {
        let start = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, v)| DailyDemand {
                date: start + Duration::days(i as i64),
                demand: *v,
            })
            .collect()
    }

    #[test]
    fn test_recovers_linear_trend() {
        let values: Vec<f64> = (0..20).map(|i| 10.0 + 2.0 * i as f64).collect();
        let history = series(&values);
        let model = SeasonalRegression::fit(&history);

        let forecast = model.forecast(&history, 3);
        // 训练区间内月份恒定，季节项近似线性，外推仍应接近趋势
        assert!((forecast[0] - 50.0).abs() < 1.0, "got {:?}", forecast);
        assert!(forecast[2] > forecast[0]);
    }

    #[test]
    fn test_constant_series_predicts_constant() {
        let history = series(&[7.0; 12]);
        let forecast = SeasonalRegression::fit(&history).forecast(&history, 5);
        for value in forecast {
            assert!((value - 7.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_forecast_is_clipped_at_zero() {
        let values: Vec<f64> = (0..15).map(|i| 30.0 - 3.0 * i as f64).map(|v: f64| v.max(0.0)).collect();
        let history = series(&values);
        let forecast = SeasonalRegression::fit(&history).forecast(&history, 10);
        assert!(forecast.iter().all(|v| *v >= 0.0));
    }
}
