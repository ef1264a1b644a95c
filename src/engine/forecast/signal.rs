use crate::domain::BuyerSignal;
use std::collections::BTreeSet;

/// 买家信号回看天数
pub const SIGNAL_LOOKBACK_DAYS: i64 = 14;
/// 乘数下限
pub const SIGNAL_MULTIPLIER_MIN: f64 = 0.8;
/// 乘数上限
pub const SIGNAL_MULTIPLIER_MAX: f64 = 1.3;

/// 买家信号调整
///
/// multiplier = clamp(1 + (avg_search - 50)/200 + avg_spike × 0.2, 0.8, 1.3)
#[derive(Debug, Clone, PartialEq)]
pub struct SignalAdjustment {
    pub multiplier: f64,
    pub note: String,
}

impl SignalAdjustment {
    /// 无信号数据：乘数恒为 1.0
    pub fn neutral() -> Self {
        Self {
            multiplier: 1.0,
            note: "No recent buyer-signal data; base forecast used.".to_string(),
        }
    }

    pub fn from_signals(signals: &[BuyerSignal]) -> Self {
        if signals.is_empty() {
            return Self::neutral();
        }

        let n = signals.len() as f64;
        let search_avg = signals.iter().map(|s| s.search_interest).sum::<f64>() / n;
        let spike_avg = signals.iter().map(|s| s.demand_spike).sum::<f64>() / n;

        let raw = 1.0 + (search_avg - 50.0) / 200.0 + spike_avg * 0.2;
        let multiplier = if raw.is_finite() {
            raw.clamp(SIGNAL_MULTIPLIER_MIN, SIGNAL_MULTIPLIER_MAX)
        } else {
            1.0
        };

        let tags: BTreeSet<&str> = signals
            .iter()
            .filter_map(|s| s.event_tag.as_deref())
            .filter(|t| !t.is_empty())
            .collect();
        let tag_note = if tags.is_empty() {
            String::new()
        } else {
            format!(
                " Event tags observed: {}.",
                tags.into_iter().collect::<Vec<_>>().join(", ")
            )
        };

        Self {
            multiplier,
            note: format!(
                "Buyer signals adjusted forecast by {:.2}x based on avg search interest {:.1} and spike index {:.2}.{}",
                multiplier, search_avg, spike_avg, tag_note
            ),
        }
    }
}
