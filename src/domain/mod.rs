// ==========================================
// 经销商网络决策支持系统 - 领域模型层
// ==========================================
// 职责: 定义只读输入实体与派生结果
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod alert;
pub mod forecast;
pub mod health;
pub mod metrics;
pub mod network;
pub mod sales;
pub mod signal;
pub mod stock;
pub mod transfer;
pub mod types;

// 重导出核心类型
pub use alert::{Alert, AlertMetrics};
pub use forecast::{ForecastEnvelope, ForecastPoint, ForecastResult, ModelScore};
pub use health::DealerHealth;
pub use metrics::InventoryMetrics;
pub use network::{Dealer, Sku};
pub use sales::{DailyDemand, SalesAggregate, SalesObservation};
pub use signal::BuyerSignal;
pub use stock::InventoryRecord;
pub use transfer::TransferCandidate;
pub use types::{AlertType, EventShock, ForecastModelKind, HealthCategory, RecommendedAction};
