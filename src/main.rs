// ==========================================
// 经销商网络决策支持系统 - 命令行入口
// ==========================================
// 用法:
//   dealer-analytics [--db-path <PATH>] <command> [args...]
//
// 数据库路径: --db-path，其次 DEALER_ANALYTICS_DB_PATH，最后用户数据目录
// 输出: stdout 上的 JSON；日志写 stderr
// ==========================================

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dealer_network_analytics::api::{AnalyticsApi, WhatIfRequest};
use dealer_network_analytics::{db, logging, APP_NAME, VERSION};
use serde::Serialize;
use tracing::info;

/// 经销商网络库存分析
#[derive(Debug, Parser)]
#[command(name = "dealer-analytics")]
#[command(version)]
#[command(arg_required_else_help = true)]
#[command(about = "Dealer network demand forecasting, transfers and inventory alerts")]
struct Cli {
    /// SQLite 数据库路径
    #[arg(short = 'd', long, env = "DEALER_ANALYTICS_DB_PATH")]
    db_path: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
enum Command {
    /// 区域列表
    Regions,
    /// 全部经销商健康度
    Health,
    /// 区域 × SKU 需求预测
    Forecast {
        sku_id: i64,
        region: String,
        /// 预测天数，缺省取配置默认值
        horizon: Option<u32>,
    },
    /// 调拨建议
    Transfers {
        sku_id: i64,
        /// 区域过滤，缺省为全网
        region: Option<String>,
    },
    /// 库存预警
    Alerts {
        dealer_id: Option<i64>,
    },
    /// What-if 模拟
    #[command(name = "whatif")]
    WhatIf {
        sku_id: i64,
        region: String,
        horizon: u32,
        /// 需求变化百分比，可为负
        #[arg(allow_negative_numbers = true)]
        percent_change: f64,
        event_tag: Option<String>,
    },
    /// 网络概览
    Summary,
    /// 库存运营指标
    Metrics {
        dealer_id: Option<i64>,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(api: &AnalyticsApi, command: &Command) -> Result<()> {
    match command {
        Command::Regions => print_json(&api.list_regions()?),
        Command::Health => print_json(&api.dealer_health()?),
        Command::Forecast {
            sku_id,
            region,
            horizon,
        } => print_json(&api.forecast(*sku_id, region, *horizon)?),
        Command::Transfers { sku_id, region } => {
            print_json(&api.recommend_transfers(*sku_id, region.as_deref())?)
        }
        Command::Alerts { dealer_id } => print_json(&api.generate_alerts(*dealer_id)?),
        Command::WhatIf {
            sku_id,
            region,
            horizon,
            percent_change,
            event_tag,
        } => {
            let request = WhatIfRequest {
                sku_id: *sku_id,
                region: region.clone(),
                horizon: Some(*horizon),
                percent_change: *percent_change,
                event_tag: event_tag.clone(),
            };
            print_json(&api.simulate_what_if(&request)?)
        }
        Command::Summary => print_json(&api.summary()?),
        Command::Metrics { dealer_id } => print_json(&api.inventory_metrics(*dealer_id)?),
    }
}

fn main() -> Result<()> {
    logging::init();

    let cli = Cli::parse();
    let db_path = cli.db_path.unwrap_or_else(db::default_db_path);

    info!(app = APP_NAME, version = VERSION, db_path = %db_path, command = ?cli.command, "启动");

    let api = AnalyticsApi::open(&db_path)
        .with_context(|| format!("无法打开数据库: {}", db_path))?;
    run(&api, &cli.command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("dealer-analytics").chain(args.iter().copied()))
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_db_path_flag_accepts_command_names() {
        let cli = parse(&["--db-path", "health", "summary"]).unwrap();
        assert_eq!(cli.db_path.as_deref(), Some("health"));
        assert_eq!(cli.command, Command::Summary);

        let cli = parse(&["-d", "/tmp/x.db", "alerts", "4"]).unwrap();
        assert_eq!(cli.db_path.as_deref(), Some("/tmp/x.db"));
        assert_eq!(cli.command, Command::Alerts { dealer_id: Some(4) });
    }

    #[test]
    fn test_trailing_arguments_are_rejected() {
        assert!(parse(&["health", "summary"]).is_err());
        assert!(parse(&["summary", "extra"]).is_err());
        assert!(parse(&["alerts", "4", "5"]).is_err());
    }

    #[test]
    fn test_forecast_and_whatif_arguments() {
        let cli = parse(&["forecast", "3", "North"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Forecast {
                sku_id: 3,
                region: "North".to_string(),
                horizon: None
            }
        );

        let cli = parse(&["whatif", "3", "North", "14", "-12.5", "Diwali"]).unwrap();
        assert_eq!(
            cli.command,
            Command::WhatIf {
                sku_id: 3,
                region: "North".to_string(),
                horizon: 14,
                percent_change: -12.5,
                event_tag: Some("Diwali".to_string()),
            }
        );
    }

    #[test]
    fn test_bad_arguments() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["db.sqlite"]).is_err());
        assert!(parse(&["forecast", "abc", "North"]).is_err());
        assert!(parse(&["forecast", "1"]).is_err());
        assert!(parse(&["whatif", "1", "North", "14"]).is_err());
    }
}
