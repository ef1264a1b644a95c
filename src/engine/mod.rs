// ==========================================
// 经销商网络决策支持系统 - 引擎层
// ==========================================
// 职责: 需求预测 / 健康度 / 调拨 / 预警 / what-if 计算
// 红线: Engine 不拼 SQL，数据一律经 AnalyticsDataSource 读取
// 红线: 引擎无跨调用状态，单次调用内的缓存随调用丢弃
// ==========================================

pub mod alert;
pub mod context;
pub mod forecast;
pub mod geo;
pub mod health;
pub mod inventory_metrics;
pub mod numeric;
pub mod transfer;
pub mod what_if;

// 重导出核心引擎
pub use alert::AlertEngine;
pub use context::AnalyticsContext;
pub use forecast::{ForecastEngine, SignalAdjustment};
pub use health::DealerHealthEngine;
pub use inventory_metrics::InventoryMetricsEngine;
pub use transfer::TransferEngine;
pub use what_if::WhatIfSimulator;
