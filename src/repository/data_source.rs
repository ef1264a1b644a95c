// ==========================================
// 经销商网络决策支持系统 - 分析数据查询接口
// ==========================================
// 职责: 分析引擎读取实体的唯一通道（外部协作方）
// 红线: 接口只读；快照一致性由调用方保证
// ==========================================

use crate::domain::{BuyerSignal, DailyDemand, Dealer, InventoryRecord, SalesAggregate, Sku};
use crate::repository::error::RepositoryResult;
use chrono::NaiveDate;

// ==========================================
// SalesQuery - 销售聚合查询条件
// ==========================================
/// 销售聚合查询条件
///
/// 所有条件均为可选，未设置即不过滤。日期区间为闭区间。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesQuery {
    pub dealer_id: Option<i64>,
    pub sku_id: Option<i64>,
    pub region: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl SalesQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dealer(mut self, dealer_id: i64) -> Self {
        self.dealer_id = Some(dealer_id);
        self
    }

    pub fn sku(mut self, sku_id: i64) -> Self {
        self.sku_id = Some(sku_id);
        self
    }

    pub fn region(mut self, region: &str) -> Self {
        self.region = Some(region.to_string());
        self
    }

    pub fn from(mut self, date: NaiveDate) -> Self {
        self.date_from = Some(date);
        self
    }

    pub fn to(mut self, date: NaiveDate) -> Self {
        self.date_to = Some(date);
        self
    }

    /// 闭区间 [from, to]
    pub fn between(self, from: NaiveDate, to: NaiveDate) -> Self {
        self.from(from).to(to)
    }
}

// ==========================================
// Trait: AnalyticsDataSource
// ==========================================
/// 分析数据源
///
/// 引擎通过该接口读取经销商、SKU、库存、销售与买家信号。
/// 数据访问失败以 `RepositoryError` 返回，分析层不做重试。
pub trait AnalyticsDataSource {
    /// 查询经销商（可按区域过滤），按 id 升序
    fn list_dealers(&self, region: Option<&str>) -> RepositoryResult<Vec<Dealer>>;

    /// 按 id 查询经销商
    fn find_dealer(&self, dealer_id: i64) -> RepositoryResult<Option<Dealer>>;

    /// 去重后的区域列表（升序）
    fn list_regions(&self) -> RepositoryResult<Vec<String>>;

    /// 全部 SKU，按 id 升序
    fn list_skus(&self) -> RepositoryResult<Vec<Sku>>;

    /// 按 id 查询 SKU
    fn find_sku(&self, sku_id: i64) -> RepositoryResult<Option<Sku>>;

    /// 查询 (dealer, sku) 库存记录
    fn find_inventory(&self, dealer_id: i64, sku_id: i64)
        -> RepositoryResult<Option<InventoryRecord>>;

    /// 查询库存记录（可按经销商过滤）
    fn list_inventory(&self, dealer_id: Option<i64>) -> RepositoryResult<Vec<InventoryRecord>>;

    /// 销售聚合 (sum demand, sum fulfilled, count, sum stockout)
    fn aggregate_sales(&self, query: &SalesQuery) -> RepositoryResult<SalesAggregate>;

    /// 区域 × SKU 全历史日需求序列（同日求和，按日期升序）
    fn daily_demand_series(&self, sku_id: i64, region: &str) -> RepositoryResult<Vec<DailyDemand>>;

    /// 区域 × SKU 买家信号，日期闭区间 [from, to]
    fn buyer_signals(
        &self,
        sku_id: i64,
        region: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepositoryResult<Vec<BuyerSignal>>;
}
