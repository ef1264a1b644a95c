// ==========================================
// 经销商网络决策支持系统 - 分析上下文
// ==========================================
// 职责: 显式传入每次分析调用的数据句柄与"当前日期"
// 红线: 引擎之间不共享可变状态，调用结束即丢弃
// ==========================================

use crate::repository::AnalyticsDataSource;
use chrono::{Duration, NaiveDate};

/// 分析上下文
///
/// 单次请求内所有引擎共用同一个数据源句柄和同一个 as-of 日期，
/// 保证同一请求内的窗口口径一致。
#[derive(Clone, Copy)]
pub struct AnalyticsContext<'a> {
    source: &'a dyn AnalyticsDataSource,
    today: NaiveDate,
}

impl<'a> AnalyticsContext<'a> {
    pub fn new(source: &'a dyn AnalyticsDataSource, today: NaiveDate) -> Self {
        Self { source, today }
    }

    pub fn source(&self) -> &'a dyn AnalyticsDataSource {
        self.source
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// 回看窗口起点 (today - days)
    pub fn window_start(&self, days: i64) -> NaiveDate {
        self.today - Duration::days(days)
    }
}
