// ==========================================
// 经销商网络决策支持系统 - 经销商健康度引擎
// ==========================================
// 职责: 60 天窗口内按经销商汇总周转 / 库龄 / 断货，输出综合评分
// 输出: DealerHealth 列表（按经销商 id 升序）
// ==========================================
// 评分权重与分档阈值为固定策略常量，不走运行时配置
// ==========================================

use crate::domain::{DealerHealth, HealthCategory};
use crate::engine::context::AnalyticsContext;
use crate::engine::numeric::round_to;
use crate::repository::{RepositoryResult, SalesQuery};
use tracing::info;

/// 销售回看窗口 (天)
pub const HEALTH_WINDOW_DAYS: i64 = 60;
/// 库龄 >= 该值计入老化库存
pub const HEALTH_AGING_DAYS: i64 = 60;

const TURNOVER_WEIGHT: f64 = 0.4;
const AGING_WEIGHT: f64 = 0.3;
const STOCKOUT_WEIGHT: f64 = 0.3;
/// 周转率达到该值即满分
const TURNOVER_SATURATION: f64 = 2.0;

/// 综合健康分 (0-100)
///
/// 100 × (0.4·min(turnover/2, 1) + 0.3·(1 − min(aging, 1)) + 0.3·(1 − min(stockout, 1)))
pub fn health_score(turnover_ratio: f64, aging_percent: f64, stockout_rate: f64) -> f64 {
    let turnover = (turnover_ratio / TURNOVER_SATURATION).min(1.0);
    let aging = 1.0 - aging_percent.min(1.0);
    let stockout = 1.0 - stockout_rate.min(1.0);
    100.0 * (TURNOVER_WEIGHT * turnover + AGING_WEIGHT * aging + STOCKOUT_WEIGHT * stockout)
}

// ==========================================
// DealerHealthEngine - 健康度引擎
// ==========================================
pub struct DealerHealthEngine {
    // 无状态引擎
}

impl DealerHealthEngine {
    pub fn new() -> Self {
        Self {}
    }

    /// 计算全部经销商健康度
    pub fn evaluate(&self, ctx: &AnalyticsContext<'_>) -> RepositoryResult<Vec<DealerHealth>> {
        let today = ctx.today();
        let window_start = ctx.window_start(HEALTH_WINDOW_DAYS);
        let dealers = ctx.source().list_dealers(None)?;

        let mut records = Vec::with_capacity(dealers.len());
        for dealer in dealers {
            let inventory = ctx.source().list_inventory(Some(dealer.id))?;
            let total_units: i64 = inventory.iter().map(|r| r.quantity).sum();
            let aging_units: i64 = inventory
                .iter()
                .filter(|r| r.age_days(today) >= HEALTH_AGING_DAYS)
                .map(|r| r.quantity)
                .sum();
            let aging_percent = if total_units > 0 {
                aging_units as f64 / total_units as f64
            } else {
                0.0
            };

            let sales = ctx
                .source()
                .aggregate_sales(&SalesQuery::new().dealer(dealer.id).between(window_start, today))?;
            let turnover_ratio = sales.turnover_against(total_units as f64);
            let stockout_rate = sales.stockout_rate();

            let score = health_score(turnover_ratio, aging_percent, stockout_rate);
            records.push(DealerHealth {
                dealer_id: dealer.id,
                dealer_name: dealer.name,
                region: dealer.region,
                health_score: round_to(score, 2),
                category: HealthCategory::from_score(score),
                turnover_ratio: round_to(turnover_ratio, 2),
                aging_percent: round_to(aging_percent, 2),
                stockout_rate: round_to(stockout_rate, 2),
            });
        }

        info!(
            dealers = records.len(),
            critical = records
                .iter()
                .filter(|r| r.category == HealthCategory::Critical)
                .count(),
            "经销商健康度计算完成"
        );
        Ok(records)
    }
}

impl Default for DealerHealthEngine {
    fn default() -> Self {
        Self::new()
    }
}
