// ==========================================
// 经销商网络决策支持系统 - 调拨建议引擎
// ==========================================
// 职责: 识别覆盖天数不足的接收方与积压的供货方，生成网内调拨候选
// 输入: SKU + 可选区域过滤
// 输出: TransferCandidate 列表（按 score 降序）
// ==========================================
// 匹配规则: 贪心逐对匹配，不做全局最优
// 供货方的可调出量在同一次调用内不随匹配扣减
// ==========================================

use crate::domain::{Dealer, Sku, TransferCandidate};
use crate::engine::context::AnalyticsContext;
use crate::engine::forecast::ForecastEngine;
use crate::engine::geo::haversine_km;
use crate::engine::numeric::{format_grouped, round_to};
use crate::repository::{RepositoryResult, SalesQuery};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::{debug, info};

/// 覆盖天数低于该值为接收方
pub const RECEIVER_COVER_DAYS: f64 = 7.0;
/// 接收方补足的目标覆盖天数
pub const TARGET_COVER_DAYS: f64 = 14.0;
/// 覆盖天数高于该值为供货方
pub const OVERSTOCK_COVER_DAYS: f64 = 35.0;
/// 每公里物流成本 (₹)
pub const COST_PER_KM: f64 = 2.5;
/// 区域日需求估算所用的预测天数
pub const COVER_FORECAST_HORIZON: u32 = 14;
/// 日需求下限
pub const MIN_DAILY_DEMAND: f64 = 1.0;

/// 接收方判定: 覆盖天数 < 7
pub fn is_receiver(days_of_cover: f64) -> bool {
    days_of_cover < RECEIVER_COVER_DAYS
}

/// 供货方判定: 覆盖天数 > 35
pub fn is_donor(days_of_cover: f64) -> bool {
    days_of_cover > OVERSTOCK_COVER_DAYS
}

/// 经销商日需求 = 区域日需求 × 份额，下限 1.0
pub fn dealer_daily_demand(region_daily: f64, share: f64) -> f64 {
    (region_daily * share).max(MIN_DAILY_DEMAND)
}

/// 覆盖天数 = 库存 / 日需求（日需求非正时为 0）
pub fn days_of_cover(quantity: i64, daily_demand: f64) -> f64 {
    if daily_demand > 0.0 {
        quantity as f64 / daily_demand
    } else {
        0.0
    }
}

/// 单个经销商在某 SKU 上的覆盖状况
#[derive(Debug, Clone, PartialEq)]
pub struct DealerCover<'a> {
    pub dealer: &'a Dealer,
    pub quantity: i64,
    pub daily_demand: f64,
    pub days_of_cover: f64,
}

impl<'a> DealerCover<'a> {
    pub fn new(dealer: &'a Dealer, quantity: i64, daily_demand: f64) -> Self {
        Self {
            dealer,
            quantity,
            daily_demand,
            days_of_cover: days_of_cover(quantity, daily_demand),
        }
    }

    /// 补足到目标覆盖天数所需件数（取整）
    fn need_units(&self) -> i64 {
        (TARGET_COVER_DAYS * self.daily_demand - self.quantity as f64).max(0.0) as i64
    }

    /// 超出积压线的可调出件数（取整）
    fn excess_units(&self) -> i64 {
        (self.quantity as f64 - OVERSTOCK_COVER_DAYS * self.daily_demand).max(0.0) as i64
    }
}

// ==========================================
// TransferEngine - 调拨建议引擎
// ==========================================
pub struct TransferEngine {
    forecast_engine: ForecastEngine,
}

impl TransferEngine {
    pub fn new() -> Self {
        Self {
            forecast_engine: ForecastEngine::new(),
        }
    }

    /// 生成调拨建议
    ///
    /// # 参数
    /// - `sku_id`: SKU；不存在时返回空列表
    /// - `region`: 区域过滤，None 或空串表示全网
    ///
    /// # 返回
    /// 按 score 降序（并列保持生成顺序）的调拨候选
    pub fn recommend(
        &self,
        ctx: &AnalyticsContext<'_>,
        sku_id: i64,
        region: Option<&str>,
    ) -> RepositoryResult<Vec<TransferCandidate>> {
        let Some(sku) = ctx.source().find_sku(sku_id)? else {
            debug!(sku_id, "SKU 不存在，无调拨建议");
            return Ok(Vec::new());
        };

        let region = region.filter(|r| !r.is_empty());
        let dealers = ctx.source().list_dealers(region)?;
        if dealers.is_empty() {
            return Ok(Vec::new());
        }

        // 1. 区域日需求（每个区域预测一次）
        let mut region_daily: HashMap<&str, f64> = HashMap::new();
        for dealer in &dealers {
            if !region_daily.contains_key(dealer.region.as_str()) {
                let daily = self.region_daily_demand(ctx, sku_id, &dealer.region)?;
                region_daily.insert(dealer.region.as_str(), daily);
            }
        }

        // 2. 经销商全历史需求与区域合计
        let mut lifetime_demand = Vec::with_capacity(dealers.len());
        let mut region_totals: HashMap<&str, f64> = HashMap::new();
        for dealer in &dealers {
            let total = ctx
                .source()
                .aggregate_sales(&SalesQuery::new().dealer(dealer.id).sku(sku_id))?
                .total_demand;
            lifetime_demand.push(total);
            *region_totals.entry(dealer.region.as_str()).or_insert(0.0) += total;
        }

        // 3. 覆盖天数
        let mut covers = Vec::with_capacity(dealers.len());
        for (dealer, own_demand) in dealers.iter().zip(&lifetime_demand) {
            let quantity = ctx
                .source()
                .find_inventory(dealer.id, sku_id)?
                .map(|inv| inv.quantity)
                .unwrap_or(0);

            let region_total = region_totals
                .get(dealer.region.as_str())
                .copied()
                .unwrap_or(0.0);
            let share = if region_total > 0.0 {
                own_demand / region_total
            } else {
                1.0 / dealers.len() as f64
            };
            let daily = dealer_daily_demand(
                region_daily
                    .get(dealer.region.as_str())
                    .copied()
                    .unwrap_or(MIN_DAILY_DEMAND),
                share,
            );
            covers.push(DealerCover::new(dealer, quantity, daily));
        }

        let candidates = match_transfers(&sku, &covers);
        info!(
            sku_id,
            region = region.unwrap_or("*"),
            dealers = covers.len(),
            receivers = covers.iter().filter(|c| is_receiver(c.days_of_cover)).count(),
            donors = covers.iter().filter(|c| is_donor(c.days_of_cover)).count(),
            candidates = candidates.len(),
            "调拨建议生成完成"
        );
        Ok(candidates)
    }

    /// 区域日需求 = 14 天预测均值，下限 1.0
    pub fn region_daily_demand(
        &self,
        ctx: &AnalyticsContext<'_>,
        sku_id: i64,
        region: &str,
    ) -> RepositoryResult<f64> {
        let forecast = self
            .forecast_engine
            .forecast(ctx, sku_id, region, COVER_FORECAST_HORIZON)?;
        Ok(forecast.mean_daily_forecast().max(MIN_DAILY_DEMAND))
    }
}

impl Default for TransferEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// 接收方 × 供货方逐对匹配（按经销商输入顺序）
///
/// 数量取 min(需求件数, 可调出件数)，任一为 0 的配对跳过。
pub fn match_transfers(sku: &Sku, covers: &[DealerCover<'_>]) -> Vec<TransferCandidate> {
    let receivers: Vec<&DealerCover> = covers
        .iter()
        .filter(|c| is_receiver(c.days_of_cover))
        .collect();
    let donors: Vec<&DealerCover> = covers
        .iter()
        .filter(|c| is_donor(c.days_of_cover))
        .collect();

    let mut candidates = Vec::new();
    for receiver in &receivers {
        let need = receiver.need_units();
        if need <= 0 {
            continue;
        }

        for donor in &donors {
            if donor.dealer.id == receiver.dealer.id {
                continue;
            }
            let excess = donor.excess_units();
            if excess <= 0 {
                continue;
            }

            let distance = haversine_km(
                donor.dealer.latitude,
                donor.dealer.longitude,
                receiver.dealer.latitude,
                receiver.dealer.longitude,
            );
            let logistics_cost = distance * COST_PER_KM;
            let score = (receiver.days_of_cover + 1.0) / (logistics_cost + 1.0);

            candidates.push(TransferCandidate {
                from_dealer_id: donor.dealer.id,
                from_dealer: donor.dealer.name.clone(),
                to_dealer_id: receiver.dealer.id,
                to_dealer: receiver.dealer.name.clone(),
                sku_id: sku.id,
                sku_name: sku.name.clone(),
                quantity: need.min(excess),
                distance_km: round_to(distance, 1),
                logistics_cost: round_to(logistics_cost, 2),
                score: round_to(score, 3),
                explanation: format!(
                    "Receiver cover {:.1} days; donor cover {:.1} days. Distance {:.0} km; estimated logistics cost ₹{}.",
                    receiver.days_of_cover,
                    donor.days_of_cover,
                    distance,
                    format_grouped(logistics_cost)
                ),
            });
        }
    }

    // 稳定排序：同分保持生成顺序
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    candidates
}
