// ==========================================
// 经销商网络决策支持系统 - SQLite 分析数据源
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

use crate::domain::{BuyerSignal, DailyDemand, Dealer, InventoryRecord, SalesAggregate, Sku};
use crate::repository::data_source::{AnalyticsDataSource, SalesQuery};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// SqliteDataSource - 基于 SQLite 的分析数据源
// ==========================================
/// SQLite 分析数据源
/// 职责: 读取 dealers / skus / inventories / sales_history / buyer_signals
/// 红线: 只读，不做任何写入
pub struct SqliteDataSource {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteDataSource {
    /// 打开数据库文件并创建数据源
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建数据源
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

// ==========================================
// 行映射
// ==========================================

fn map_dealer(row: &Row<'_>) -> SqliteResult<Dealer> {
    Ok(Dealer {
        id: row.get(0)?,
        name: row.get(1)?,
        region: row.get(2)?,
        city: row.get(3)?,
        latitude: row.get(4)?,
        longitude: row.get(5)?,
    })
}

fn map_sku(row: &Row<'_>) -> SqliteResult<Sku> {
    Ok(Sku {
        id: row.get(0)?,
        name: row.get(1)?,
        color_family: row.get(2)?,
        size_ltr: row.get(3)?,
        unit_cost: row.get(4)?,
        unit_price: row.get(5)?,
    })
}

fn map_inventory(row: &Row<'_>) -> SqliteResult<InventoryRecord> {
    Ok(InventoryRecord {
        dealer_id: row.get(0)?,
        sku_id: row.get(1)?,
        quantity: row.get(2)?,
        last_received_date: row.get::<_, NaiveDate>(3)?,
    })
}

const DEALER_COLUMNS: &str = "id, name, region, city, latitude, longitude";
const SKU_COLUMNS: &str = "id, name, color_family, size_ltr, unit_cost, unit_price";
const INVENTORY_COLUMNS: &str = "dealer_id, sku_id, quantity, last_received_date";

/// 构建销售聚合的 WHERE 子句与参数
///
/// 区域过滤通过 dealers 关联实现，因此销售表统一别名为 s。
fn build_sales_filter(query: &SalesQuery) -> (String, Vec<Value>) {
    let mut clauses: Vec<&str> = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    if let Some(dealer_id) = query.dealer_id {
        clauses.push("s.dealer_id = ?");
        values.push(Value::Integer(dealer_id));
    }
    if let Some(sku_id) = query.sku_id {
        clauses.push("s.sku_id = ?");
        values.push(Value::Integer(sku_id));
    }
    if let Some(region) = &query.region {
        clauses.push("d.region = ?");
        values.push(Value::Text(region.clone()));
    }
    if let Some(from) = query.date_from {
        clauses.push("s.date >= ?");
        values.push(Value::Text(from.to_string()));
    }
    if let Some(to) = query.date_to {
        clauses.push("s.date <= ?");
        values.push(Value::Text(to.to_string()));
    }

    let where_sql = if clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", clauses.join(" AND "))
    };
    (where_sql, values)
}

impl AnalyticsDataSource for SqliteDataSource {
    fn list_dealers(&self, region: Option<&str>) -> RepositoryResult<Vec<Dealer>> {
        let conn = self.get_conn()?;
        let dealers = match region {
            Some(region) => {
                let sql = format!(
                    "SELECT {} FROM dealers WHERE region = ?1 ORDER BY id ASC",
                    DEALER_COLUMNS
                );
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map(params![region], map_dealer)?
                    .collect::<SqliteResult<Vec<_>>>()?;
                rows
            }
            None => {
                let sql = format!("SELECT {} FROM dealers ORDER BY id ASC", DEALER_COLUMNS);
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map([], map_dealer)?
                    .collect::<SqliteResult<Vec<_>>>()?;
                rows
            }
        };
        Ok(dealers)
    }

    fn find_dealer(&self, dealer_id: i64) -> RepositoryResult<Option<Dealer>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM dealers WHERE id = ?1", DEALER_COLUMNS);
        let dealer = conn
            .query_row(&sql, params![dealer_id], map_dealer)
            .optional()?;
        Ok(dealer)
    }

    fn list_regions(&self) -> RepositoryResult<Vec<String>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT DISTINCT region FROM dealers ORDER BY region ASC")?;
        let regions = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(regions)
    }

    fn list_skus(&self) -> RepositoryResult<Vec<Sku>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM skus ORDER BY id ASC", SKU_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let skus = stmt
            .query_map([], map_sku)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(skus)
    }

    fn find_sku(&self, sku_id: i64) -> RepositoryResult<Option<Sku>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM skus WHERE id = ?1", SKU_COLUMNS);
        let sku = conn.query_row(&sql, params![sku_id], map_sku).optional()?;
        Ok(sku)
    }

    fn find_inventory(
        &self,
        dealer_id: i64,
        sku_id: i64,
    ) -> RepositoryResult<Option<InventoryRecord>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM inventories WHERE dealer_id = ?1 AND sku_id = ?2",
            INVENTORY_COLUMNS
        );
        let record = conn
            .query_row(&sql, params![dealer_id, sku_id], map_inventory)
            .optional()?;
        Ok(record)
    }

    fn list_inventory(&self, dealer_id: Option<i64>) -> RepositoryResult<Vec<InventoryRecord>> {
        let conn = self.get_conn()?;
        let records = match dealer_id {
            Some(dealer_id) => {
                let sql = format!(
                    "SELECT {} FROM inventories WHERE dealer_id = ?1 ORDER BY sku_id ASC",
                    INVENTORY_COLUMNS
                );
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map(params![dealer_id], map_inventory)?
                    .collect::<SqliteResult<Vec<_>>>()?;
                rows
            }
            None => {
                let sql = format!(
                    "SELECT {} FROM inventories ORDER BY dealer_id ASC, sku_id ASC",
                    INVENTORY_COLUMNS
                );
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map([], map_inventory)?
                    .collect::<SqliteResult<Vec<_>>>()?;
                rows
            }
        };
        Ok(records)
    }

    fn aggregate_sales(&self, query: &SalesQuery) -> RepositoryResult<SalesAggregate> {
        let conn = self.get_conn()?;
        let (where_sql, values) = build_sales_filter(query);
        let sql = format!(
            r#"
            SELECT
                COALESCE(SUM(s.demand), 0.0),
                COALESCE(SUM(s.fulfilled), 0.0),
                COUNT(s.id),
                COALESCE(SUM(CASE WHEN s.stockout THEN 1 ELSE 0 END), 0)
            FROM sales_history s
            JOIN dealers d ON d.id = s.dealer_id
            {}
            "#,
            where_sql
        );

        let aggregate = conn.query_row(&sql, params_from_iter(values.iter()), |row| {
            Ok(SalesAggregate {
                total_demand: row.get(0)?,
                total_fulfilled: row.get(1)?,
                observation_count: row.get(2)?,
                stockout_count: row.get(3)?,
            })
        })?;
        Ok(aggregate)
    }

    fn daily_demand_series(&self, sku_id: i64, region: &str) -> RepositoryResult<Vec<DailyDemand>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT s.date, SUM(s.demand)
            FROM sales_history s
            JOIN dealers d ON d.id = s.dealer_id
            WHERE s.sku_id = ?1 AND d.region = ?2
            GROUP BY s.date
            ORDER BY s.date ASC
            "#,
        )?;
        let series = stmt
            .query_map(params![sku_id, region], |row| {
                Ok(DailyDemand {
                    date: row.get::<_, NaiveDate>(0)?,
                    demand: row.get(1)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(series)
    }

    fn buyer_signals(
        &self,
        sku_id: i64,
        region: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepositoryResult<Vec<BuyerSignal>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT region, sku_id, date, search_interest, demand_spike, event_tag
            FROM buyer_signals
            WHERE sku_id = ?1 AND region = ?2 AND date >= ?3 AND date <= ?4
            ORDER BY date ASC, id ASC
            "#,
        )?;
        let signals = stmt
            .query_map(params![sku_id, region, from, to], |row| {
                Ok(BuyerSignal {
                    region: row.get(0)?,
                    sku_id: row.get(1)?,
                    date: row.get::<_, NaiveDate>(2)?,
                    search_interest: row.get(3)?,
                    demand_spike: row.get(4)?,
                    event_tag: row.get(5)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(signals)
    }
}
