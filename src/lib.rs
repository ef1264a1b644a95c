// ==========================================
// 经销商网络决策支持系统 - 核心库
// ==========================================
// 能力: 需求预测 / 经销商健康度 / 调拨建议 / 库存预警 / what-if
// 技术栈: Rust + SQLite
// 系统定位: 决策支持系统 (建议由人工确认执行)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 分析计算
pub mod engine;

// 配置层 - 运行时配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/schema 引导）
pub mod db;

// 日志系统
pub mod logging;

// 性能观测
pub mod perf;

// API 层 - 分析接口
pub mod api;

#[cfg(test)]
mod test_support;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{AlertType, EventShock, ForecastModelKind, HealthCategory, RecommendedAction};

// 领域实体
pub use domain::{
    Alert, BuyerSignal, Dealer, DealerHealth, ForecastEnvelope, ForecastResult, InventoryMetrics,
    InventoryRecord, Sku, TransferCandidate,
};

// 引擎
pub use engine::{
    AlertEngine, AnalyticsContext, DealerHealthEngine, ForecastEngine, InventoryMetricsEngine,
    TransferEngine, WhatIfSimulator,
};

// 数据源
pub use repository::{AnalyticsDataSource, RepositoryError, SqliteDataSource};

// API
pub use api::{AnalyticsApi, ApiError, ApiResult};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "经销商网络决策支持系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
