// ==========================================
// 单元测试辅助: 内存 SQLite 经销商网络
// ==========================================

use crate::engine::AnalyticsContext;
use crate::repository::SqliteDataSource;
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

/// 内存数据库 + 便捷写入方法
pub struct TestNetwork {
    conn: Arc<Mutex<Connection>>,
    source: SqliteDataSource,
}

impl TestNetwork {
    pub fn new() -> Self {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::configure_sqlite_connection(&conn).unwrap();
        crate::db::init_schema(&conn).unwrap();
        let conn = Arc::new(Mutex::new(conn));
        let source = SqliteDataSource::from_connection(conn.clone());
        Self { conn, source }
    }

    pub fn source(&self) -> &SqliteDataSource {
        &self.source
    }

    pub fn context(&self, today: NaiveDate) -> AnalyticsContext<'_> {
        AnalyticsContext::new(&self.source, today)
    }

    pub fn dealer(&self, id: i64, region: &str, lat: f64, lon: f64) {
        self.conn
            .lock()
            .unwrap()
            .execute(
                "INSERT INTO dealers (id, name, region, city, latitude, longitude) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![id, format!("Dealer {}", id), region, format!("City {}", id), lat, lon],
            )
            .unwrap();
    }

    pub fn sku(&self, id: i64) {
        self.conn
            .lock()
            .unwrap()
            .execute(
                "INSERT INTO skus (id, name, color_family, size_ltr, unit_cost, unit_price) VALUES (?1, ?2, 'White', 10.0, 900.0, 1200.0)",
                params![id, format!("SKU {}", id)],
            )
            .unwrap();
    }

    pub fn inventory(&self, dealer_id: i64, sku_id: i64, quantity: i64, last_received: NaiveDate) {
        self.conn
            .lock()
            .unwrap()
            .execute(
                "INSERT INTO inventories (dealer_id, sku_id, quantity, last_received_date) VALUES (?1, ?2, ?3, ?4)",
                params![dealer_id, sku_id, quantity, last_received],
            )
            .unwrap();
    }

    pub fn sale(
        &self,
        dealer_id: i64,
        sku_id: i64,
        date: NaiveDate,
        demand: f64,
        fulfilled: f64,
        stockout: bool,
    ) {
        self.conn
            .lock()
            .unwrap()
            .execute(
                "INSERT INTO sales_history (dealer_id, sku_id, date, demand, fulfilled, stockout) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![dealer_id, sku_id, date, demand, fulfilled, stockout],
            )
            .unwrap();
    }

    /// 连续 n 天、每天一条观测（第 i 天需求由 demand_fn(i) 给出）
    pub fn daily_sales(
        &self,
        dealer_id: i64,
        sku_id: i64,
        start: NaiveDate,
        days: usize,
        demand_fn: impl Fn(usize) -> f64,
    ) {
        for i in 0..days {
            let date = start + chrono::Duration::days(i as i64);
            let demand = demand_fn(i);
            self.sale(dealer_id, sku_id, date, demand, demand, false);
        }
    }

    pub fn signal(
        &self,
        region: &str,
        sku_id: i64,
        date: NaiveDate,
        search_interest: f64,
        demand_spike: f64,
        event_tag: Option<&str>,
    ) {
        self.conn
            .lock()
            .unwrap()
            .execute(
                "INSERT INTO buyer_signals (region, sku_id, date, search_interest, demand_spike, event_tag) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![region, sku_id, date, search_interest, demand_spike, event_tag],
            )
            .unwrap();
    }

    pub fn set_config(&self, key: &str, value: &str) {
        self.conn
            .lock()
            .unwrap()
            .execute(
                "INSERT OR REPLACE INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)",
                params![key, value],
            )
            .unwrap();
    }

    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        self.conn.clone()
    }
}
