// ==========================================
// 经销商网络决策支持系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发读写时的偶发 busy 错误
// - 提供 schema 引导（存储层本身由外部系统维护，这里只保证表存在）
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::path::PathBuf;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "DEALER_ANALYTICS_DB_PATH";

/// 默认数据库路径
///
/// 优先级：环境变量 DEALER_ANALYTICS_DB_PATH → 用户数据目录 → 当前目录
pub fn default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./dealer_analytics.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("dealer-network-analytics");
        // 目录创建失败时退回当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("dealer_analytics.db");
        }
    }
    path.to_string_lossy().to_string()
}

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let mut conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    crate::perf::install_sqlite_tracing(&mut conn);
    Ok(conn)
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// 初始化 schema（幂等）
///
/// 表:
/// - dealers / skus / inventories / sales_history / buyer_signals: 分析输入
/// - config_kv: 运行时配置
/// - schema_version: 版本标记
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL DEFAULT 'global',
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS dealers (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            region TEXT NOT NULL,
            city TEXT NOT NULL,
            latitude REAL NOT NULL CHECK (latitude BETWEEN -90 AND 90),
            longitude REAL NOT NULL CHECK (longitude BETWEEN -180 AND 180)
        );
        CREATE INDEX IF NOT EXISTS idx_dealers_region ON dealers(region);

        CREATE TABLE IF NOT EXISTS skus (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            color_family TEXT NOT NULL,
            size_ltr REAL NOT NULL,
            unit_cost REAL NOT NULL CHECK (unit_cost >= 0),
            unit_price REAL NOT NULL CHECK (unit_price >= 0)
        );

        CREATE TABLE IF NOT EXISTS inventories (
            id INTEGER PRIMARY KEY,
            dealer_id INTEGER NOT NULL REFERENCES dealers(id) ON DELETE CASCADE,
            sku_id INTEGER NOT NULL REFERENCES skus(id) ON DELETE CASCADE,
            quantity INTEGER NOT NULL CHECK (quantity >= 0),
            last_received_date TEXT NOT NULL,
            UNIQUE (dealer_id, sku_id)
        );

        CREATE TABLE IF NOT EXISTS sales_history (
            id INTEGER PRIMARY KEY,
            dealer_id INTEGER NOT NULL REFERENCES dealers(id) ON DELETE CASCADE,
            sku_id INTEGER NOT NULL REFERENCES skus(id) ON DELETE CASCADE,
            date TEXT NOT NULL,
            demand REAL NOT NULL CHECK (demand >= 0),
            fulfilled REAL NOT NULL CHECK (fulfilled >= 0),
            stockout INTEGER NOT NULL DEFAULT 0
        );
        CREATE INDEX IF NOT EXISTS idx_sales_sku_date ON sales_history(sku_id, date);
        CREATE INDEX IF NOT EXISTS idx_sales_dealer_sku ON sales_history(dealer_id, sku_id);

        CREATE TABLE IF NOT EXISTS buyer_signals (
            id INTEGER PRIMARY KEY,
            region TEXT NOT NULL,
            sku_id INTEGER NOT NULL REFERENCES skus(id) ON DELETE CASCADE,
            date TEXT NOT NULL,
            search_interest REAL NOT NULL,
            demand_spike REAL NOT NULL,
            event_tag TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_signals_region_sku_date ON buyer_signals(region, sku_id, date);
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}
