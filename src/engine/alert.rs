// ==========================================
// 经销商网络决策支持系统 - 库存预警引擎
// ==========================================
// 职责: 对每个 (经销商, SKU) 计算 60 天窗口指标并生成预警
// 输出: Stockout Risk / Dead Stock Risk 预警
// ==========================================
// 缓存: 调拨建议与区域需求按 (SKU, 区域) 在单次调用内缓存，调用结束即丢弃
// 口径: 区域需求份额的分母始终覆盖区域内全部经销商，不受 dealer 过滤影响
// ==========================================

use crate::domain::{
    Alert, AlertMetrics, AlertType, Dealer, InventoryRecord, RecommendedAction, SalesAggregate,
    Sku, TransferCandidate,
};
use crate::engine::context::AnalyticsContext;
use crate::engine::numeric::round_to;
use crate::engine::transfer::{self, TransferEngine};
use crate::repository::{RepositoryResult, SalesQuery};
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::{debug, info};

/// 销售回看窗口 (天)
pub const ALERT_WINDOW_DAYS: i64 = 60;
/// 库龄满该天数视为完全老化
pub const FULL_AGING_DAYS: i64 = 90;
/// 老化比例高于该值且周转 < 1 触发积压预警
pub const DEAD_STOCK_AGING_THRESHOLD: f64 = 0.4;
/// 积压预警相对断货预警的置信度折减
pub const DEAD_STOCK_CONFIDENCE_PENALTY: f64 = 0.05;

/// 置信度 = clamp(0.5 + 观测数/200, 0.55, 0.9)
pub fn alert_confidence(observation_count: i64) -> f64 {
    (0.5 + observation_count as f64 / 200.0).clamp(0.55, 0.9)
}

/// 老化比例: 无库存记录为 0；库龄 > 90 天为 1；否则 库龄/90
pub fn aging_fraction(inventory: Option<&InventoryRecord>, today: NaiveDate) -> f64 {
    match inventory {
        None => 0.0,
        Some(record) => {
            let age = record.age_days(today);
            if age > FULL_AGING_DAYS {
                1.0
            } else {
                age as f64 / FULL_AGING_DAYS as f64
            }
        }
    }
}

/// 单个 (经销商, SKU) 的预警指标
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairAssessment {
    pub quantity: i64,
    pub days_of_cover: f64,
    pub turnover_ratio: f64,
    pub stockout_rate: f64,
    pub aging_percent: f64,
    pub observation_count: i64,
}

impl PairAssessment {
    pub fn is_stockout_risk(&self) -> bool {
        transfer::is_receiver(self.days_of_cover)
    }

    pub fn is_dead_stock_risk(&self) -> bool {
        self.aging_percent > DEAD_STOCK_AGING_THRESHOLD && self.turnover_ratio < 1.0
    }

    pub fn confidence(&self) -> f64 {
        alert_confidence(self.observation_count)
    }

    /// 对外输出的指标快照（两位小数）
    pub fn metrics(&self) -> AlertMetrics {
        AlertMetrics {
            days_of_cover: round_to(self.days_of_cover, 2),
            turnover_ratio: round_to(self.turnover_ratio, 2),
            stockout_rate: round_to(self.stockout_rate, 2),
            aging_percent: round_to(self.aging_percent, 2),
        }
    }
}

/// 区域层面的需求口径（单次调用内按 (SKU, 区域) 缓存）
#[derive(Debug, Clone, Copy)]
struct RegionDemand {
    daily: f64,
    window_total: f64,
}

// ==========================================
// AlertEngine - 预警引擎
// ==========================================
pub struct AlertEngine {
    transfer_engine: TransferEngine,
}

impl AlertEngine {
    pub fn new() -> Self {
        Self {
            transfer_engine: TransferEngine::new(),
        }
    }

    /// 生成预警
    ///
    /// # 参数
    /// - `dealer_id`: 经销商过滤；None 表示全部经销商
    ///
    /// # 返回
    /// 按 (经销商, SKU) 顺序排列的预警；同一对可能同时出现两类预警
    pub fn generate(
        &self,
        ctx: &AnalyticsContext<'_>,
        dealer_id: Option<i64>,
    ) -> RepositoryResult<Vec<Alert>> {
        let today = ctx.today();
        let window_start = ctx.window_start(ALERT_WINDOW_DAYS);

        let dealers: Vec<Dealer> = match dealer_id {
            Some(id) => ctx.source().find_dealer(id)?.into_iter().collect(),
            None => ctx.source().list_dealers(None)?,
        };
        let skus = ctx.source().list_skus()?;

        let mut region_demand: HashMap<(i64, String), RegionDemand> = HashMap::new();
        let mut transfer_memo: HashMap<(i64, String), Vec<TransferCandidate>> = HashMap::new();
        let mut alerts = Vec::new();

        for dealer in &dealers {
            for sku in &skus {
                let inventory = ctx.source().find_inventory(dealer.id, sku.id)?;
                let window = ctx.source().aggregate_sales(
                    &SalesQuery::new()
                        .dealer(dealer.id)
                        .sku(sku.id)
                        .between(window_start, today),
                )?;

                let key = (sku.id, dealer.region.clone());
                let region = match region_demand.get(&key) {
                    Some(region) => *region,
                    None => {
                        let region = self.region_demand(ctx, sku.id, &dealer.region, window_start)?;
                        region_demand.insert(key.clone(), region);
                        region
                    }
                };

                let assessment = assess_pair(
                    inventory.as_ref(),
                    &window,
                    region.daily,
                    region.window_total,
                    dealers.len(),
                    today,
                );

                if assessment.is_stockout_risk() {
                    if transfer_memo.contains_key(&key) {
                        debug!(sku_id = sku.id, region = %dealer.region, "调拨建议缓存命中");
                    } else {
                        debug!(sku_id = sku.id, region = %dealer.region, "调拨建议缓存未命中");
                        let computed =
                            self.transfer_engine
                                .recommend(ctx, sku.id, Some(&dealer.region))?;
                        transfer_memo.insert(key.clone(), computed);
                    }
                    let has_transfer = transfer_memo
                        .get(&key)
                        .map(|list| list.iter().any(|t| t.to_dealer_id == dealer.id))
                        .unwrap_or(false);
                    alerts.push(stockout_alert(dealer, sku, &assessment, has_transfer));
                }

                if assessment.is_dead_stock_risk() {
                    alerts.push(dead_stock_alert(dealer, sku, &assessment));
                }
            }
        }

        info!(
            dealer_id = ?dealer_id,
            dealers = dealers.len(),
            skus = skus.len(),
            alerts = alerts.len(),
            transfer_lookups = transfer_memo.len(),
            "预警生成完成"
        );
        Ok(alerts)
    }

    /// 区域日需求（14 天预测均值）与区域窗口内总需求（自窗口起点起，全部经销商）
    fn region_demand(
        &self,
        ctx: &AnalyticsContext<'_>,
        sku_id: i64,
        region: &str,
        window_start: NaiveDate,
    ) -> RepositoryResult<RegionDemand> {
        let daily = self.transfer_engine.region_daily_demand(ctx, sku_id, region)?;
        let window_total = ctx
            .source()
            .aggregate_sales(&SalesQuery::new().sku(sku_id).region(region).from(window_start))?
            .total_demand;
        Ok(RegionDemand {
            daily,
            window_total,
        })
    }
}

impl Default for AlertEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// 计算单个 (经销商, SKU) 的预警指标
///
/// 区域总需求为 0 时按 1/经销商数 均分。
pub fn assess_pair(
    inventory: Option<&InventoryRecord>,
    window: &SalesAggregate,
    region_daily: f64,
    region_window_total: f64,
    dealer_count: usize,
    today: NaiveDate,
) -> PairAssessment {
    let quantity = inventory.map(|r| r.quantity).unwrap_or(0);

    let share = if region_window_total > 0.0 {
        window.total_demand / region_window_total
    } else {
        1.0 / dealer_count.max(1) as f64
    };
    let daily = transfer::dealer_daily_demand(region_daily, share);

    PairAssessment {
        quantity,
        days_of_cover: transfer::days_of_cover(quantity, daily),
        turnover_ratio: window.turnover_against(quantity as f64),
        stockout_rate: window.stockout_rate(),
        aging_percent: aging_fraction(inventory, today),
        observation_count: window.observation_count,
    }
}

fn stockout_alert(
    dealer: &Dealer,
    sku: &Sku,
    assessment: &PairAssessment,
    has_transfer: bool,
) -> Alert {
    let action = if has_transfer {
        RecommendedAction::Transfer
    } else {
        RecommendedAction::Reorder
    };
    Alert {
        dealer_id: dealer.id,
        dealer_name: dealer.name.clone(),
        sku_id: sku.id,
        sku_name: sku.name.clone(),
        alert_type: AlertType::StockoutRisk,
        recommended_action: action,
        confidence: round_to(assessment.confidence(), 2),
        reasoning: format!(
            "Low cover ({:.1} days) and stockout rate {:.2}. Suggested action: {}.",
            assessment.days_of_cover, assessment.stockout_rate, action
        ),
        metrics: assessment.metrics(),
    }
}

fn dead_stock_alert(dealer: &Dealer, sku: &Sku, assessment: &PairAssessment) -> Alert {
    Alert {
        dealer_id: dealer.id,
        dealer_name: dealer.name.clone(),
        sku_id: sku.id,
        sku_name: sku.name.clone(),
        alert_type: AlertType::DeadStockRisk,
        recommended_action: RecommendedAction::Hold,
        confidence: round_to(assessment.confidence() - DEAD_STOCK_CONFIDENCE_PENALTY, 2),
        reasoning: format!(
            "High aging inventory ({:.0}%) with low turnover ({:.2}). Recommended action: Hold or promote through local campaigns.",
            assessment.aging_percent * 100.0,
            assessment.turnover_ratio
        ),
        metrics: assessment.metrics(),
    }
}
