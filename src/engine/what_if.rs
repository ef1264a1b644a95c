// ==========================================
// 经销商网络决策支持系统 - What-if 模拟
// ==========================================
// 职责: 在基础预测上叠加人工百分比调整与事件冲击
// 乘数 = (1 + percent_change/100) × 事件乘数，统一作用于预测值与上下界
// ==========================================

use crate::domain::{EventShock, ForecastEnvelope, ForecastResult};
use crate::engine::context::AnalyticsContext;
use crate::engine::forecast::ForecastEngine;
use crate::repository::RepositoryResult;
use tracing::debug;

pub struct WhatIfSimulator {
    forecast_engine: ForecastEngine,
}

impl WhatIfSimulator {
    pub fn new() -> Self {
        Self {
            forecast_engine: ForecastEngine::new(),
        }
    }

    /// 模拟需求变化
    ///
    /// # 参数
    /// - `percent_change`: 百分比调整，例如 -10.0 表示下调 10%
    /// - `event_tag`: 事件标签，大小写不敏感子串匹配
    pub fn simulate(
        &self,
        ctx: &AnalyticsContext<'_>,
        sku_id: i64,
        region: &str,
        horizon: u32,
        percent_change: f64,
        event_tag: Option<&str>,
    ) -> RepositoryResult<ForecastEnvelope> {
        let base = self.forecast_engine.forecast(ctx, sku_id, region, horizon)?;
        let envelope = apply_scenario(base, sku_id, region, percent_change, event_tag);
        debug!(
            sku_id,
            region,
            percent_change,
            event_tag = event_tag.unwrap_or(""),
            signal_adjustment = envelope.signal_adjustment,
            "what-if 模拟完成"
        );
        Ok(envelope)
    }
}

impl Default for WhatIfSimulator {
    fn default() -> Self {
        Self::new()
    }
}

/// 在基础预测上应用情景乘数
pub fn apply_scenario(
    base: ForecastResult,
    sku_id: i64,
    region: &str,
    percent_change: f64,
    event_tag: Option<&str>,
) -> ForecastEnvelope {
    let event_tag = event_tag.filter(|t| !t.is_empty());
    let shock = EventShock::from_tag(event_tag);
    let total_multiplier = (1.0 + percent_change / 100.0) * shock.multiplier();

    let mut explanation = format!("What-if change {:+.1}% applied to base forecast.", percent_change);
    if let Some(tag) = event_tag {
        explanation.push_str(&format!(
            " Event shock for '{}' applied ({:.2}x).",
            tag,
            shock.multiplier()
        ));
    }

    ForecastEnvelope {
        sku_id,
        region: region.to_string(),
        model: base.model,
        horizon: base.horizon,
        confidence: base.confidence,
        explanation,
        signal_adjustment: base.signal_adjustment * total_multiplier,
        points: base
            .points
            .iter()
            .map(|p| p.scaled(total_multiplier))
            .collect(),
    }
}
