// ==========================================
// 经销商网络决策支持系统 - 库存运营指标
// ==========================================
// 窗口: 最近 30 天销售（自窗口起点起）；老化口径: 库龄 > 60 天
// ==========================================

use crate::domain::InventoryMetrics;
use crate::engine::context::AnalyticsContext;
use crate::engine::numeric::round_to;
use crate::repository::{RepositoryResult, SalesQuery};

/// 销售回看窗口 (天)
pub const METRICS_WINDOW_DAYS: i64 = 30;
/// 库龄超过该值计入老化库存
pub const METRICS_AGING_DAYS: i64 = 60;

pub struct InventoryMetricsEngine {
    // 无状态引擎
}

impl InventoryMetricsEngine {
    pub fn new() -> Self {
        Self {}
    }

    /// 全网或单个经销商的库存运营指标
    pub fn compute(
        &self,
        ctx: &AnalyticsContext<'_>,
        dealer_id: Option<i64>,
    ) -> RepositoryResult<InventoryMetrics> {
        let today = ctx.today();
        let inventory = ctx.source().list_inventory(dealer_id)?;
        let total_units: i64 = inventory.iter().map(|r| r.quantity).sum();
        let aging_units: i64 = inventory
            .iter()
            .filter(|r| r.age_days(today) > METRICS_AGING_DAYS)
            .map(|r| r.quantity)
            .sum();

        let mut query = SalesQuery::new().from(ctx.window_start(METRICS_WINDOW_DAYS));
        if let Some(id) = dealer_id {
            query = query.dealer(id);
        }
        let sales = ctx.source().aggregate_sales(&query)?;

        let aging_percent = if total_units > 0 {
            aging_units as f64 / total_units as f64
        } else {
            0.0
        };
        let fill_rate = if sales.total_demand > 0.0 {
            sales.total_fulfilled / sales.total_demand
        } else {
            1.0
        };

        Ok(InventoryMetrics {
            total_inventory_units: total_units,
            aging_percent: round_to(aging_percent, 2),
            turnover_ratio: round_to(sales.turnover_against(total_units as f64), 2),
            fill_rate: round_to(fill_rate, 2),
        })
    }
}

impl Default for InventoryMetricsEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestNetwork;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_empty_network() {
        let net = TestNetwork::new();
        let ctx = net.context(d(2026, 6, 1));
        let m = InventoryMetricsEngine::new().compute(&ctx, None).unwrap();
        assert_eq!(m.total_inventory_units, 0);
        assert_eq!(m.aging_percent, 0.0);
        assert_eq!(m.turnover_ratio, 0.0);
        assert_eq!(m.fill_rate, 1.0);
    }

    #[test]
    fn test_network_and_dealer_scope() {
        let net = TestNetwork::new();
        net.dealer(1, "West", 18.52, 73.85);
        net.dealer(2, "West", 19.07, 72.87);
        net.sku(1);
        let today = d(2026, 6, 1);
        // 61 天 → 老化；恰好 60 天不计入
        net.inventory(1, 1, 40, d(2026, 4, 1));
        net.inventory(2, 1, 60, d(2026, 4, 2));
        net.sale(1, 1, d(2026, 5, 20), 100.0, 80.0, false);
        net.sale(2, 1, d(2026, 5, 21), 50.0, 50.0, false);
        net.sale(2, 1, d(2026, 4, 1), 500.0, 0.0, true);
        let ctx = net.context(today);

        let engine = InventoryMetricsEngine::new();
        let all = engine.compute(&ctx, None).unwrap();
        assert_eq!(all.total_inventory_units, 100);
        assert_eq!(all.aging_percent, 0.4);
        assert_eq!(all.turnover_ratio, 1.3);
        assert_eq!(all.fill_rate, 0.87);

        let one = engine.compute(&ctx, Some(2)).unwrap();
        assert_eq!(one.total_inventory_units, 60);
        assert_eq!(one.aging_percent, 0.0);
        assert_eq!(one.fill_rate, 1.0);
    }
}
