// ==========================================
// 经销商网络决策支持系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、写入
// 存储: config_kv 表 (scope_id = 'global')
// ==========================================

use crate::db::open_sqlite_connection;
use crate::repository::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// 默认预测天数
pub const DEFAULT_HORIZON: u32 = 30;
/// 预测天数下限
pub const DEFAULT_MIN_HORIZON: u32 = 7;
/// 预测天数上限
pub const DEFAULT_MAX_HORIZON: u32 = 120;

// ==========================================
// AnalyticsSettings - 运行时配置快照
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsSettings {
    pub default_horizon: u32,
    pub min_horizon: u32,
    pub max_horizon: u32,
    /// 固定的"当前日期"，用于可复现的离线分析
    pub as_of_date: Option<NaiveDate>,
}

impl AnalyticsSettings {
    /// 分析使用的当前日期：配置优先，否则取本地日期
    pub fn today(&self) -> NaiveDate {
        self.as_of_date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            default_horizon: DEFAULT_HORIZON,
            min_horizon: DEFAULT_MIN_HORIZON,
            max_horizon: DEFAULT_MAX_HORIZON,
            as_of_date: None,
        }
    }
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取 global scope 的配置值
    pub fn get_global_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 读取正整数配置；缺失或非法时回落默认值
    fn get_u32_or_default(&self, key: &str, default: u32) -> RepositoryResult<u32> {
        let Some(raw) = self.get_global_config_value(key)? else {
            return Ok(default);
        };
        match raw.trim().parse::<u32>() {
            Ok(v) if v > 0 => Ok(v),
            _ => {
                warn!(config_key = key, value = %raw, default, "配置值非法，使用默认值");
                Ok(default)
            }
        }
    }

    /// 加载运行时配置
    ///
    /// 边界不自洽（min > max，或默认值越界）时整体回落默认边界。
    pub fn load_settings(&self) -> RepositoryResult<AnalyticsSettings> {
        let default_horizon = self.get_u32_or_default(config_keys::DEFAULT_HORIZON, DEFAULT_HORIZON)?;
        let min_horizon = self.get_u32_or_default(config_keys::MIN_HORIZON, DEFAULT_MIN_HORIZON)?;
        let max_horizon = self.get_u32_or_default(config_keys::MAX_HORIZON, DEFAULT_MAX_HORIZON)?;

        let as_of_date = match self.get_global_config_value(config_keys::AS_OF_DATE)? {
            Some(raw) if !raw.trim().is_empty() => {
                match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
                    Ok(date) => Some(date),
                    Err(_) => {
                        return Err(RepositoryError::FieldValueError {
                            field: config_keys::AS_OF_DATE.to_string(),
                            message: format!("expected YYYY-MM-DD, got '{}'", raw),
                        })
                    }
                }
            }
            _ => None,
        };

        if min_horizon > max_horizon || !(min_horizon..=max_horizon).contains(&default_horizon) {
            warn!(
                default_horizon,
                min_horizon, max_horizon, "预测天数边界不自洽，使用默认边界"
            );
            return Ok(AnalyticsSettings {
                as_of_date,
                ..AnalyticsSettings::default()
            });
        }

        Ok(AnalyticsSettings {
            default_horizon,
            min_horizon,
            max_horizon,
            as_of_date,
        })
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 预测天数
    pub const DEFAULT_HORIZON: &str = "forecast/default_horizon";
    pub const MIN_HORIZON: &str = "forecast/min_horizon";
    pub const MAX_HORIZON: &str = "forecast/max_horizon";

    // 分析日期 (YYYY-MM-DD)
    pub const AS_OF_DATE: &str = "analytics/as_of_date";
}
