// ==========================================
// 经销商网络决策支持系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供分析数据查询接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod data_source;
pub mod error;
pub mod sqlite_source;

// 重导出核心仓储
pub use data_source::{AnalyticsDataSource, SalesQuery};
pub use error::{RepositoryError, RepositoryResult};
pub use sqlite_source::SqliteDataSource;
