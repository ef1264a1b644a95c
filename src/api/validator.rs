// ==========================================
// 经销商网络决策支持系统 - 请求参数校验
// ==========================================
// 职责: 在调用引擎前拒绝非法请求（InvalidInput）
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::AnalyticsSettings;

/// 区域名最大长度
pub const MAX_REGION_LEN: usize = 80;

/// 校验 id 为正
pub fn validate_id(field: &str, id: i64) -> ApiResult<i64> {
    if id <= 0 {
        return Err(ApiError::InvalidInput(format!("{}必须为正整数: {}", field, id)));
    }
    Ok(id)
}

/// 校验区域名，返回去除首尾空白后的值
pub fn validate_region(region: &str) -> ApiResult<&str> {
    let trimmed = region.trim();
    if trimmed.is_empty() {
        return Err(ApiError::InvalidInput("区域不能为空".to_string()));
    }
    if trimmed.chars().count() > MAX_REGION_LEN {
        return Err(ApiError::InvalidInput(format!(
            "区域名超过{}个字符",
            MAX_REGION_LEN
        )));
    }
    Ok(trimmed)
}

/// 可选区域过滤：None 或空白视为不过滤
pub fn normalize_region_filter(region: Option<&str>) -> ApiResult<Option<&str>> {
    match region.map(str::trim) {
        None | Some("") => Ok(None),
        Some(r) => validate_region(r).map(Some),
    }
}

/// 校验预测天数，缺省取配置默认值
pub fn resolve_horizon(horizon: Option<u32>, settings: &AnalyticsSettings) -> ApiResult<u32> {
    let horizon = horizon.unwrap_or(settings.default_horizon);
    if horizon < settings.min_horizon || horizon > settings.max_horizon {
        return Err(ApiError::InvalidInput(format!(
            "预测天数必须在 [{}, {}] 之间: {}",
            settings.min_horizon, settings.max_horizon, horizon
        )));
    }
    Ok(horizon)
}

/// 校验百分比调整：必须为有限数且不低于 -100%
pub fn validate_percent_change(percent_change: f64) -> ApiResult<f64> {
    if !percent_change.is_finite() || percent_change < -100.0 {
        return Err(ApiError::InvalidInput(format!(
            "百分比调整必须为不低于 -100 的有限数: {}",
            percent_change
        )));
    }
    Ok(percent_change)
}

/// 事件标签：空白视为未提供
pub fn normalize_event_tag(tag: Option<&str>) -> Option<&str> {
    tag.map(str::trim).filter(|t| !t.is_empty())
}
