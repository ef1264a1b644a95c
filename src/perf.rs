// ==========================================
// 经销商网络决策支持系统 - 性能观测
// ==========================================
// 职责: SQLite 语句计数 + 慢查询日志 + 操作耗时
// 输出: tracing target = "perf" / "slow_sql"
// ==========================================
// 背景: 预警计算对每个 (经销商, SKU) 发起多次聚合查询，
//       需要按 API 操作观察查询放大
// ==========================================

use rusqlite::Connection;
use std::cell::Cell;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

static PERF_SQL_ENABLED: AtomicBool = AtomicBool::new(false);
static SLOW_SQL_THRESHOLD_MS: AtomicU64 = AtomicU64::new(0);

thread_local! {
    static ACTIVE_GUARDS: Cell<u32> = Cell::new(0);
    static STATEMENTS: Cell<u64> = Cell::new(0);
    static SLOW_STATEMENTS: Cell<u64> = Cell::new(0);
}

fn env_flag(v: &str) -> bool {
    matches!(
        v.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn shorten_sql(sql: &str, max_chars: usize) -> String {
    let flat = sql.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let head: String = flat.chars().take(max_chars).collect();
    format!("{}…", head)
}

/// 安装 SQLite profile 回调（语句计数 + 慢查询日志）
///
/// 开关：
/// - Debug 默认开启；Release 默认关闭
/// - `DEALER_ANALYTICS_PERF_SQL=1|0` 显式开关
/// - `DEALER_ANALYTICS_SLOW_SQL_MS=50` 慢 SQL 阈值（毫秒）
pub fn install_sqlite_tracing(conn: &mut Connection) {
    let enabled = std::env::var("DEALER_ANALYTICS_PERF_SQL")
        .map(|v| env_flag(&v))
        .unwrap_or(cfg!(debug_assertions));
    PERF_SQL_ENABLED.store(enabled, Ordering::Relaxed);

    if !enabled {
        conn.profile(None);
        return;
    }

    let slow_ms = std::env::var("DEALER_ANALYTICS_SLOW_SQL_MS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(if cfg!(debug_assertions) { 50 } else { 200 });
    SLOW_SQL_THRESHOLD_MS.store(slow_ms, Ordering::Relaxed);

    conn.profile(Some(on_statement_profiled));
}

fn on_statement_profiled(sql: &str, duration: Duration) {
    if !PERF_SQL_ENABLED.load(Ordering::Relaxed) {
        return;
    }

    let measuring = ACTIVE_GUARDS.with(|g| g.get() > 0);
    if measuring {
        STATEMENTS.with(|c| c.set(c.get().saturating_add(1)));
    }

    let ms = duration.as_millis() as u64;
    let threshold = SLOW_SQL_THRESHOLD_MS.load(Ordering::Relaxed);
    if threshold == 0 || ms < threshold {
        return;
    }

    tracing::warn!(
        target: "slow_sql",
        duration_ms = ms,
        sql = %shorten_sql(sql, 400),
        "慢查询"
    );
    if measuring {
        SLOW_STATEMENTS.with(|c| c.set(c.get().saturating_add(1)));
    }
}

/// 操作级性能统计
///
/// Drop 时输出 elapsed_ms / sql_count / slow_sql_count。
///
/// ```ignore
/// let _perf = dealer_network_analytics::perf::PerfGuard::new("generate_alerts");
/// ```
pub struct PerfGuard {
    op: &'static str,
    started: Instant,
    statements_at_start: u64,
    slow_at_start: u64,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        ACTIVE_GUARDS.with(|g| g.set(g.get().saturating_add(1)));
        Self {
            op,
            started: Instant::now(),
            statements_at_start: STATEMENTS.with(|c| c.get()),
            slow_at_start: SLOW_STATEMENTS.with(|c| c.get()),
        }
    }

    /// 自创建以来本线程执行的 SQL 语句数
    pub fn sql_count(&self) -> u64 {
        STATEMENTS
            .with(|c| c.get())
            .saturating_sub(self.statements_at_start)
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        let slow_sql_count = SLOW_STATEMENTS
            .with(|c| c.get())
            .saturating_sub(self.slow_at_start);

        tracing::info!(
            target: "perf",
            op = self.op,
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            sql_count = self.sql_count(),
            slow_sql_count,
            "done"
        );

        ACTIVE_GUARDS.with(|g| g.set(g.get().saturating_sub(1)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_flag() {
        assert!(env_flag(" YES "));
        assert!(env_flag("1"));
        assert!(!env_flag("off"));
    }

    #[test]
    fn test_shorten_sql_flattens_whitespace() {
        let sql = "SELECT *\n    FROM sales_history";
        assert_eq!(shorten_sql(sql, 100), "SELECT * FROM sales_history");
        assert_eq!(shorten_sql(sql, 6), "SELECT…");
    }
}
