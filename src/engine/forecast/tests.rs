use super::*;
use crate::domain::{DailyDemand, ForecastModelKind};
use crate::test_support::TestNetwork;
use chrono::{Duration, NaiveDate};

// ==========================================
// 测试辅助函数
// ==========================================

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn series_from(start: NaiveDate, values: &[f64]) -> Vec<DailyDemand> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| DailyDemand {
            date: start + Duration::days(i as i64),
            demand: *v,
        })
        .collect()
}

/// 确定性的"噪声"序列（不依赖随机数）
fn wobbly(n: usize, base: f64) -> Vec<f64> {
    (0..n)
        .map(|i| base + ((i * 7 + 3) % 5) as f64 - 2.0)
        .collect()
}

// ==========================================
// 兜底路径
// ==========================================

#[test]
fn test_short_series_uses_baseline_average() {
    let engine = ForecastEngine::new();
    let series = series_from(d(2026, 3, 1), &[10.0, 20.0, 30.0]);
    let result = engine.forecast_series(&series, &SignalAdjustment::neutral(), d(2026, 4, 1), 7);

    assert_eq!(result.model, ForecastModelKind::BaselineAverage);
    assert_eq!(result.confidence, 0.55);
    assert_eq!(result.points.len(), 7);
    assert!(result.backtest.is_empty());
    // 预测从最后观测日的次日开始
    assert_eq!(result.points[0].date, d(2026, 3, 4));
    for p in &result.points {
        assert!((p.forecast - 20.0).abs() < 1e-12);
        assert!((p.lower - 18.0).abs() < 1e-9);
        assert!((p.upper - 22.0).abs() < 1e-9);
    }
    assert!(result.explanation.starts_with("Insufficient historical data"));
}

#[test]
fn test_empty_series_defaults_to_forty_from_today() {
    let net = TestNetwork::new();
    net.sku(1);
    let ctx = net.context(d(2026, 5, 10));

    let result = ForecastEngine::new().forecast(&ctx, 1, "Nowhere", 14).unwrap();
    assert_eq!(result.model, ForecastModelKind::BaselineAverage);
    assert_eq!(result.signal_adjustment, 1.0);
    assert_eq!(result.points[0].date, d(2026, 5, 11));
    assert!(result.points.iter().all(|p| p.forecast == 40.0));
    assert!((result.mean_daily_forecast() - 40.0).abs() < 1e-12);
}

#[test]
fn test_baseline_still_applies_signal_multiplier() {
    let net = TestNetwork::new();
    net.dealer(1, "North", 28.6, 77.2);
    net.sku(1);
    net.daily_sales(1, 1, d(2026, 5, 1), 5, |_| 10.0);
    // 1 + (90-50)/200 + 0 = 1.2
    net.signal("North", 1, d(2026, 5, 8), 90.0, 0.0, None);
    let ctx = net.context(d(2026, 5, 10));

    let result = ForecastEngine::new().forecast(&ctx, 1, "North", 10).unwrap();
    assert_eq!(result.model, ForecastModelKind::BaselineAverage);
    assert!((result.signal_adjustment - 1.2).abs() < 1e-12);
    assert!((result.points[0].forecast - 12.0).abs() < 1e-9);
}

#[test]
fn test_zero_horizon_is_rejected() {
    let net = TestNetwork::new();
    let ctx = net.context(d(2026, 5, 10));
    assert!(ForecastEngine::new().forecast(&ctx, 1, "North", 0).is_err());
}

// ==========================================
// 模型选择
// ==========================================

#[test]
fn test_selected_model_has_minimum_mape() {
    let engine = ForecastEngine::new();
    let series = series_from(d(2026, 1, 1), &wobbly(45, 25.0));
    let result = engine.forecast_series(&series, &SignalAdjustment::neutral(), d(2026, 3, 1), 30);

    assert_eq!(result.backtest.len(), 3);
    let min = result
        .backtest
        .iter()
        .map(|s| s.mape)
        .fold(f64::INFINITY, f64::min);
    let winner = result
        .backtest
        .iter()
        .find(|s| s.model == result.model)
        .unwrap();
    assert_eq!(winner.mape, min);
    // 并列时取迭代顺序中的第一个
    let first_min = result.backtest.iter().find(|s| s.mape == min).unwrap();
    assert_eq!(first_min.model, result.model);
}

#[test]
fn test_trending_series_selects_regression() {
    // 均值类模型在强趋势下系统性滞后
    let engine = ForecastEngine::new();
    let values: Vec<f64> = (0..40).map(|i| 10.0 + 3.0 * i as f64).collect();
    let series = series_from(d(2026, 1, 1), &values);
    let result = engine.forecast_series(&series, &SignalAdjustment::neutral(), d(2026, 3, 1), 14);

    assert_eq!(result.model, ForecastModelKind::LinearRegression);
    assert!(result.confidence >= 0.6 && result.confidence <= 0.9);
    // 外推延续趋势
    assert!(result.points[13].forecast > result.points[0].forecast);
    assert!(result.explanation.contains("Selected linear-regression model"));
}

#[test]
fn test_flat_series_tie_goes_to_moving_average() {
    let engine = ForecastEngine::new();
    let series = series_from(d(2026, 1, 1), &[12.0; 20]);
    let result = engine.forecast_series(&series, &SignalAdjustment::neutral(), d(2026, 3, 1), 7);

    assert_eq!(result.model, ForecastModelKind::MovingAverage);
    assert_eq!(result.confidence, 0.9);
    for p in &result.points {
        assert_eq!(p.forecast, 12.0);
    }
}

#[test]
fn test_split_uses_eighty_percent_with_floor() {
    // n = 10 → split = max(7, 8) = 8，验证集 2 点 → 残差标准差改用全序列 × 10%
    let engine = ForecastEngine::new();
    let values = [10.0, 12.0, 8.0, 11.0, 9.0, 10.0, 12.0, 8.0, 30.0, 30.0];
    let series = series_from(d(2026, 1, 1), &values);
    let result = engine.forecast_series(&series, &SignalAdjustment::neutral(), d(2026, 3, 1), 7);

    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let std = (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64).sqrt();
    let expected_half_width = 1.96 * std * 0.1;
    let p = result.points[0];
    assert!((p.upper - p.forecast - expected_half_width).abs() < 1e-9);
}

// ==========================================
// 置信带 / 置信度 / 幂等
// ==========================================

#[test]
fn test_bands_are_ordered_and_non_negative() {
    let engine = ForecastEngine::new();
    let values: Vec<f64> = (0..60)
        .map(|i| if i % 9 == 0 { 0.0 } else { (i % 13) as f64 * 2.0 })
        .collect();
    let series = series_from(d(2026, 1, 1), &values);
    let result = engine.forecast_series(&series, &SignalAdjustment::neutral(), d(2026, 3, 1), 120);

    assert!(result.confidence >= 0.55 && result.confidence <= 0.9);
    for p in &result.points {
        assert!(p.lower >= 0.0);
        assert!(p.lower <= p.forecast);
        assert!(p.forecast <= p.upper);
    }
}

#[test]
fn test_points_are_consecutive_days_after_last_observation() {
    let engine = ForecastEngine::new();
    let series = series_from(d(2026, 2, 1), &wobbly(30, 15.0));
    let result = engine.forecast_series(&series, &SignalAdjustment::neutral(), d(2026, 6, 1), 5);

    let last = series.last().unwrap().date;
    for (i, p) in result.points.iter().enumerate() {
        assert_eq!(p.date, last + Duration::days(i as i64 + 1));
    }
}

#[test]
fn test_forecast_is_idempotent() {
    let net = TestNetwork::new();
    net.dealer(1, "North", 28.6, 77.2);
    net.dealer(2, "North", 30.7, 76.8);
    net.sku(1);
    net.daily_sales(1, 1, d(2026, 3, 1), 40, |i| 10.0 + (i % 4) as f64);
    net.daily_sales(2, 1, d(2026, 3, 1), 40, |i| 5.0 + (i % 3) as f64);
    net.signal("North", 1, d(2026, 4, 5), 65.0, 0.3, Some("Diwali"));
    let ctx = net.context(d(2026, 4, 10));

    let engine = ForecastEngine::new();
    let first = engine.forecast(&ctx, 1, "North", 30).unwrap();
    let second = engine.forecast(&ctx, 1, "North", 30).unwrap();
    assert_eq!(first, second);
    assert!(first.explanation.contains("Event tags observed: Diwali."));
}

#[test]
fn test_signals_outside_lookback_are_ignored() {
    let net = TestNetwork::new();
    net.dealer(1, "North", 28.6, 77.2);
    net.sku(1);
    net.daily_sales(1, 1, d(2026, 3, 1), 20, |_| 10.0);
    net.signal("North", 1, d(2026, 3, 1), 100.0, 1.0, None);
    let ctx = net.context(d(2026, 4, 10));

    let result = ForecastEngine::new().forecast(&ctx, 1, "North", 7).unwrap();
    assert_eq!(result.signal_adjustment, 1.0);
    assert!(result.explanation.contains("No recent buyer-signal data"));
}

#[test]
fn test_mape_floors_denominator_at_one() {
    assert_eq!(mape(&[0.0, 0.0], &[1.0, 0.5]), 0.75);
    assert_eq!(mape(&[10.0], &[5.0]), 0.5);
}
