// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use dealer_network_analytics::db;
use dealer_network_analytics::domain::{BuyerSignal, Dealer, InventoryRecord, Sku};
use rusqlite::{params, Connection};
use std::error::Error;

// ==========================================
// Dealer 构建器
// ==========================================

pub struct DealerBuilder {
    id: i64,
    name: Option<String>,
    region: String,
    city: String,
    latitude: f64,
    longitude: f64,
}

impl DealerBuilder {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            name: None,
            region: "North".to_string(),
            city: "Delhi".to_string(),
            latitude: 28.61,
            longitude: 77.21,
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn region(mut self, region: &str) -> Self {
        self.region = region.to_string();
        self
    }

    pub fn city(mut self, city: &str) -> Self {
        self.city = city.to_string();
        self
    }

    pub fn at(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self
    }

    pub fn build(self) -> Dealer {
        Dealer {
            id: self.id,
            name: self.name.unwrap_or_else(|| format!("Dealer {}", self.id)),
            region: self.region,
            city: self.city,
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

// ==========================================
// Sku 构建器
// ==========================================

pub struct SkuBuilder {
    id: i64,
    name: Option<String>,
    color_family: String,
    size_ltr: f64,
    unit_cost: f64,
    unit_price: f64,
}

impl SkuBuilder {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            name: None,
            color_family: "White".to_string(),
            size_ltr: 10.0,
            unit_cost: 900.0,
            unit_price: 1200.0,
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn color(mut self, color_family: &str) -> Self {
        self.color_family = color_family.to_string();
        self
    }

    pub fn size(mut self, size_ltr: f64) -> Self {
        self.size_ltr = size_ltr;
        self
    }

    pub fn build(self) -> Sku {
        Sku {
            id: self.id,
            name: self.name.unwrap_or_else(|| format!("SKU {}", self.id)),
            color_family: self.color_family,
            size_ltr: self.size_ltr,
            unit_cost: self.unit_cost,
            unit_price: self.unit_price,
        }
    }
}

// ==========================================
// NetworkSeeder - 向测试库写入数据
// ==========================================

/// 向 tempfile 测试库写入经销商网络数据
pub struct NetworkSeeder {
    conn: Connection,
}

impl NetworkSeeder {
    pub fn open(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = db::open_sqlite_connection(db_path)?;
        db::init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn dealer(&self, dealer: &Dealer) -> Result<(), Box<dyn Error>> {
        self.conn.execute(
            "INSERT INTO dealers (id, name, region, city, latitude, longitude) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                dealer.id,
                dealer.name,
                dealer.region,
                dealer.city,
                dealer.latitude,
                dealer.longitude
            ],
        )?;
        Ok(())
    }

    pub fn sku(&self, sku: &Sku) -> Result<(), Box<dyn Error>> {
        self.conn.execute(
            "INSERT INTO skus (id, name, color_family, size_ltr, unit_cost, unit_price) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                sku.id,
                sku.name,
                sku.color_family,
                sku.size_ltr,
                sku.unit_cost,
                sku.unit_price
            ],
        )?;
        Ok(())
    }

    pub fn inventory(&self, record: &InventoryRecord) -> Result<(), Box<dyn Error>> {
        self.conn.execute(
            "INSERT INTO inventories (dealer_id, sku_id, quantity, last_received_date) VALUES (?1, ?2, ?3, ?4)",
            params![
                record.dealer_id,
                record.sku_id,
                record.quantity,
                record.last_received_date
            ],
        )?;
        Ok(())
    }

    pub fn stock(
        &self,
        dealer_id: i64,
        sku_id: i64,
        quantity: i64,
        last_received_date: NaiveDate,
    ) -> Result<(), Box<dyn Error>> {
        self.inventory(&InventoryRecord {
            dealer_id,
            sku_id,
            quantity,
            last_received_date,
        })
    }

    pub fn sale(
        &self,
        dealer_id: i64,
        sku_id: i64,
        date: NaiveDate,
        demand: f64,
        fulfilled: f64,
        stockout: bool,
    ) -> Result<(), Box<dyn Error>> {
        self.conn.execute(
            "INSERT INTO sales_history (dealer_id, sku_id, date, demand, fulfilled, stockout) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![dealer_id, sku_id, date, demand, fulfilled, stockout],
        )?;
        Ok(())
    }

    /// 从 start 起连续 days 天，每天一条完全满足的观测
    pub fn daily_sales(
        &self,
        dealer_id: i64,
        sku_id: i64,
        start: NaiveDate,
        days: usize,
        demand_fn: impl Fn(usize) -> f64,
    ) -> Result<(), Box<dyn Error>> {
        let tx = self.conn.unchecked_transaction()?;
        for i in 0..days {
            let demand = demand_fn(i);
            tx.execute(
                "INSERT INTO sales_history (dealer_id, sku_id, date, demand, fulfilled, stockout) VALUES (?1, ?2, ?3, ?4, ?4, 0)",
                params![dealer_id, sku_id, start + Duration::days(i as i64), demand],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    pub fn signal(&self, signal: &BuyerSignal) -> Result<(), Box<dyn Error>> {
        self.conn.execute(
            "INSERT INTO buyer_signals (region, sku_id, date, search_interest, demand_spike, event_tag) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                signal.region,
                signal.sku_id,
                signal.date,
                signal.search_interest,
                signal.demand_spike,
                signal.event_tag
            ],
        )?;
        Ok(())
    }

    pub fn config(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        self.conn.execute(
            "INSERT OR REPLACE INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("合法日期")
}
