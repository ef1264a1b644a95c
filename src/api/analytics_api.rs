// ==========================================
// 经销商网络决策支持系统 - 分析 API
// ==========================================
// 职责: 参数校验 + 存在性检查 + 调用引擎 + 性能观测
// 架构: API 层 → Engine 层 → AnalyticsDataSource
// ==========================================

use std::sync::{Arc, Mutex};

use tracing::{info, instrument};

use crate::api::dto::{SummaryResponse, WhatIfRequest};
use crate::api::error::{ApiError, ApiResult};
use crate::api::validator;
use crate::config::{AnalyticsSettings, ConfigManager};
use crate::domain::{
    Alert, AlertType, DealerHealth, ForecastEnvelope, InventoryMetrics, TransferCandidate,
};
use crate::engine::{
    AlertEngine, AnalyticsContext, DealerHealthEngine, ForecastEngine, InventoryMetricsEngine,
    TransferEngine, WhatIfSimulator,
};
use crate::perf::PerfGuard;
use crate::repository::{AnalyticsDataSource, SqliteDataSource};

// ==========================================
// AnalyticsApi - 分析 API
// ==========================================

/// 分析 API
///
/// 每次调用都基于数据源的当前快照重新计算，API 自身不缓存结果。
pub struct AnalyticsApi {
    source: Arc<dyn AnalyticsDataSource + Send + Sync>,
    settings: AnalyticsSettings,
    forecast_engine: ForecastEngine,
    health_engine: DealerHealthEngine,
    transfer_engine: TransferEngine,
    alert_engine: AlertEngine,
    what_if: WhatIfSimulator,
    metrics_engine: InventoryMetricsEngine,
}

impl AnalyticsApi {
    /// 创建新的 AnalyticsApi 实例
    pub fn new(
        source: Arc<dyn AnalyticsDataSource + Send + Sync>,
        settings: AnalyticsSettings,
    ) -> Self {
        Self {
            source,
            settings,
            forecast_engine: ForecastEngine::new(),
            health_engine: DealerHealthEngine::new(),
            transfer_engine: TransferEngine::new(),
            alert_engine: AlertEngine::new(),
            what_if: WhatIfSimulator::new(),
            metrics_engine: InventoryMetricsEngine::new(),
        }
    }

    /// 打开数据库（必要时初始化 schema）并加载配置
    pub fn open(db_path: &str) -> ApiResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)
            .map_err(|e| ApiError::DatabaseConnectionError(e.to_string()))?;
        crate::db::init_schema(&conn).map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        let conn = Arc::new(Mutex::new(conn));
        let settings = ConfigManager::from_connection(conn.clone()).load_settings()?;
        info!(db_path, ?settings, "分析 API 初始化完成");

        Ok(Self::new(
            Arc::new(SqliteDataSource::from_connection(conn)),
            settings,
        ))
    }

    pub fn settings(&self) -> &AnalyticsSettings {
        &self.settings
    }

    fn context(&self) -> AnalyticsContext<'_> {
        AnalyticsContext::new(self.source.as_ref(), self.settings.today())
    }

    fn ensure_sku_exists(&self, sku_id: i64) -> ApiResult<()> {
        validator::validate_id("sku_id", sku_id)?;
        if self.source.find_sku(sku_id)?.is_none() {
            return Err(ApiError::NotFound(format!("SKU(id={})不存在", sku_id)));
        }
        Ok(())
    }

    fn ensure_dealer_exists(&self, dealer_id: i64) -> ApiResult<()> {
        validator::validate_id("dealer_id", dealer_id)?;
        if self.source.find_dealer(dealer_id)?.is_none() {
            return Err(ApiError::NotFound(format!("经销商(id={})不存在", dealer_id)));
        }
        Ok(())
    }

    // ==========================================
    // 核心分析接口
    // ==========================================

    /// 区域 × SKU 需求预测
    ///
    /// # 参数
    /// - sku_id: SKU ID（不存在返回 NotFound）
    /// - region: 区域名（不能为空）
    /// - horizon: 预测天数，缺省取配置默认值
    #[instrument(skip(self))]
    pub fn forecast(
        &self,
        sku_id: i64,
        region: &str,
        horizon: Option<u32>,
    ) -> ApiResult<ForecastEnvelope> {
        let _perf = PerfGuard::new("forecast");
        let region = validator::validate_region(region)?;
        let horizon = validator::resolve_horizon(horizon, &self.settings)?;
        self.ensure_sku_exists(sku_id)?;

        let result = self
            .forecast_engine
            .forecast(&self.context(), sku_id, region, horizon)?;
        Ok(ForecastEnvelope::from_result(sku_id, region, result))
    }

    /// 全部经销商健康度
    #[instrument(skip(self))]
    pub fn dealer_health(&self) -> ApiResult<Vec<DealerHealth>> {
        let _perf = PerfGuard::new("dealer_health");
        Ok(self.health_engine.evaluate(&self.context())?)
    }

    /// 调拨建议
    ///
    /// # 返回
    /// - Ok(空列表): 无需调拨
    /// - Err(NotFound): SKU 不存在
    #[instrument(skip(self))]
    pub fn recommend_transfers(
        &self,
        sku_id: i64,
        region: Option<&str>,
    ) -> ApiResult<Vec<TransferCandidate>> {
        let _perf = PerfGuard::new("recommend_transfers");
        let region = validator::normalize_region_filter(region)?;
        self.ensure_sku_exists(sku_id)?;

        Ok(self
            .transfer_engine
            .recommend(&self.context(), sku_id, region)?)
    }

    /// 库存预警（可按经销商过滤）
    #[instrument(skip(self))]
    pub fn generate_alerts(&self, dealer_id: Option<i64>) -> ApiResult<Vec<Alert>> {
        let _perf = PerfGuard::new("generate_alerts");
        if let Some(id) = dealer_id {
            self.ensure_dealer_exists(id)?;
        }
        Ok(self.alert_engine.generate(&self.context(), dealer_id)?)
    }

    /// What-if 模拟
    #[instrument(skip(self))]
    pub fn simulate_what_if(&self, request: &WhatIfRequest) -> ApiResult<ForecastEnvelope> {
        let _perf = PerfGuard::new("simulate_what_if");
        let region = validator::validate_region(&request.region)?;
        let horizon = validator::resolve_horizon(request.horizon, &self.settings)?;
        let percent_change = validator::validate_percent_change(request.percent_change)?;
        let event_tag = validator::normalize_event_tag(request.event_tag.as_deref());
        self.ensure_sku_exists(request.sku_id)?;

        Ok(self.what_if.simulate(
            &self.context(),
            request.sku_id,
            region,
            horizon,
            percent_change,
            event_tag,
        )?)
    }

    // ==========================================
    // 概览与运营指标
    // ==========================================

    /// 网络概览（含一次全量预警计算）
    #[instrument(skip(self))]
    pub fn summary(&self) -> ApiResult<SummaryResponse> {
        let _perf = PerfGuard::new("summary");
        let ctx = self.context();

        let total_inventory_units: i64 = self
            .source
            .list_inventory(None)?
            .iter()
            .map(|r| r.quantity)
            .sum();
        let total_skus = self.source.list_skus()?.len();
        let total_dealers = self.source.list_dealers(None)?.len();

        let alerts = self.alert_engine.generate(&ctx, None)?;
        let count = |kind: AlertType| alerts.iter().filter(|a| a.alert_type == kind).count();

        Ok(SummaryResponse {
            total_inventory_units,
            total_skus,
            total_dealers,
            stockout_risk_count: count(AlertType::StockoutRisk),
            dead_stock_risk_count: count(AlertType::DeadStockRisk),
        })
    }

    /// 库存运营指标（30 天窗口）
    #[instrument(skip(self))]
    pub fn inventory_metrics(&self, dealer_id: Option<i64>) -> ApiResult<InventoryMetrics> {
        let _perf = PerfGuard::new("inventory_metrics");
        if let Some(id) = dealer_id {
            self.ensure_dealer_exists(id)?;
        }
        Ok(self.metrics_engine.compute(&self.context(), dealer_id)?)
    }

    /// 区域列表（升序）
    pub fn list_regions(&self) -> ApiResult<Vec<String>> {
        Ok(self.source.list_regions()?)
    }
}
