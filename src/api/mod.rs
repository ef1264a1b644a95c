// ==========================================
// 经销商网络决策支持系统 - API 层
// ==========================================
// 职责: 提供分析接口，供命令行或上层服务调用
// ==========================================

pub mod analytics_api;
pub mod dto;
pub mod error;
pub mod validator;

// 重导出核心类型
pub use analytics_api::AnalyticsApi;
pub use dto::{SummaryResponse, WhatIfRequest};
pub use error::{ApiError, ApiResult};
