// ==========================================
// 经销商网络决策支持系统 - 领域类型定义
// ==========================================
// 职责: 预测模型 / 健康等级 / 预警类型 / 建议动作 / 事件冲击
// 序列化格式: 与对外展示文本一致 (例如 "At Risk", "Stockout Risk")
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 预测模型 (Forecast Model)
// ==========================================
// 候选模型的迭代顺序即并列时的优先顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ForecastModelKind {
    #[serde(rename = "baseline-average")]
    BaselineAverage, // 数据不足时的均值兜底
    #[serde(rename = "moving-average")]
    MovingAverage, // 移动平均
    #[serde(rename = "exp-smoothing")]
    ExponentialSmoothing, // 单参数指数平滑
    #[serde(rename = "linear-regression")]
    LinearRegression, // 时间 + 季节特征线性回归
}

impl ForecastModelKind {
    /// 参与回测选择的候选模型（按并列优先顺序）
    pub const CANDIDATES: [ForecastModelKind; 3] = [
        ForecastModelKind::MovingAverage,
        ForecastModelKind::ExponentialSmoothing,
        ForecastModelKind::LinearRegression,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastModelKind::BaselineAverage => "baseline-average",
            ForecastModelKind::MovingAverage => "moving-average",
            ForecastModelKind::ExponentialSmoothing => "exp-smoothing",
            ForecastModelKind::LinearRegression => "linear-regression",
        }
    }
}

impl fmt::Display for ForecastModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 经销商健康等级 (Health Category)
// ==========================================
// 阈值: >=70 Healthy, >=40 At Risk, 其余 Critical
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HealthCategory {
    #[serde(rename = "Healthy")]
    Healthy,
    #[serde(rename = "At Risk")]
    AtRisk,
    #[serde(rename = "Critical")]
    Critical,
}

impl HealthCategory {
    pub fn from_score(score: f64) -> Self {
        if score >= 70.0 {
            HealthCategory::Healthy
        } else if score >= 40.0 {
            HealthCategory::AtRisk
        } else {
            HealthCategory::Critical
        }
    }
}

impl fmt::Display for HealthCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthCategory::Healthy => write!(f, "Healthy"),
            HealthCategory::AtRisk => write!(f, "At Risk"),
            HealthCategory::Critical => write!(f, "Critical"),
        }
    }
}

// ==========================================
// 预警类型 (Alert Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertType {
    #[serde(rename = "Stockout Risk")]
    StockoutRisk, // 断货风险
    #[serde(rename = "Dead Stock Risk")]
    DeadStockRisk, // 呆滞风险
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertType::StockoutRisk => write!(f, "Stockout Risk"),
            AlertType::DeadStockRisk => write!(f, "Dead Stock Risk"),
        }
    }
}

// ==========================================
// 建议动作 (Recommended Action)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecommendedAction {
    Transfer, // 网内调拨
    Reorder,  // 补货下单
    Hold,     // 暂停补货 / 本地促销
}

impl fmt::Display for RecommendedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecommendedAction::Transfer => write!(f, "Transfer"),
            RecommendedAction::Reorder => write!(f, "Reorder"),
            RecommendedAction::Hold => write!(f, "Hold"),
        }
    }
}

// ==========================================
// 事件冲击 (Event Shock)
// ==========================================
// 依据事件标签做大小写不敏感的子串匹配
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventShock {
    Festival,     // festival / diwali / holi
    Construction, // construction / boom
    Monsoon,      // monsoon
    Neutral,      // 未识别或未提供
}

impl EventShock {
    /// 由事件标签解析冲击类型
    pub fn from_tag(tag: Option<&str>) -> Self {
        let Some(tag) = tag else {
            return EventShock::Neutral;
        };
        let lower = tag.to_lowercase();
        if ["festival", "diwali", "holi"].iter().any(|k| lower.contains(k)) {
            EventShock::Festival
        } else if ["construction", "boom"].iter().any(|k| lower.contains(k)) {
            EventShock::Construction
        } else if lower.contains("monsoon") {
            EventShock::Monsoon
        } else {
            EventShock::Neutral
        }
    }

    /// 冲击乘数
    pub fn multiplier(&self) -> f64 {
        match self {
            EventShock::Festival => 1.12,
            EventShock::Construction => 1.08,
            EventShock::Monsoon => 0.95,
            EventShock::Neutral => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_category_thresholds() {
        assert_eq!(HealthCategory::from_score(70.0), HealthCategory::Healthy);
        assert_eq!(HealthCategory::from_score(69.99), HealthCategory::AtRisk);
        assert_eq!(HealthCategory::from_score(40.0), HealthCategory::AtRisk);
        assert_eq!(HealthCategory::from_score(39.99), HealthCategory::Critical);
    }

    #[test]
    fn test_event_shock_matching_is_case_insensitive() {
        assert_eq!(EventShock::from_tag(Some("DIWALI week")), EventShock::Festival);
        assert_eq!(EventShock::from_tag(Some("Holi")), EventShock::Festival);
        assert_eq!(EventShock::from_tag(Some("Construction Boom")), EventShock::Construction);
        assert_eq!(EventShock::from_tag(Some("early Monsoon")), EventShock::Monsoon);
        assert_eq!(EventShock::from_tag(Some("cricket final")), EventShock::Neutral);
        assert_eq!(EventShock::from_tag(None), EventShock::Neutral);
        assert_eq!(EventShock::Monsoon.multiplier(), 0.95);
    }

    #[test]
    fn test_serialized_labels() {
        assert_eq!(
            serde_json::to_string(&HealthCategory::AtRisk).unwrap(),
            "\"At Risk\""
        );
        assert_eq!(
            serde_json::to_string(&AlertType::DeadStockRisk).unwrap(),
            "\"Dead Stock Risk\""
        );
        assert_eq!(
            serde_json::to_string(&ForecastModelKind::ExponentialSmoothing).unwrap(),
            "\"exp-smoothing\""
        );
    }
}
