// ==========================================
// 经销商网络决策支持系统 - 配置层
// ==========================================
// 职责: 运行时配置读取（预测天数边界、as-of 日期）
// 存储: config_kv 表
// ==========================================
// 评分权重、覆盖天数阈值等策略常量不在此处配置
// ==========================================

pub mod config_manager;

// 重导出核心配置管理器
pub use config_manager::{config_keys, AnalyticsSettings, ConfigManager};
