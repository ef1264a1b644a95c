// ==========================================
// 经销商网络决策支持系统 - 日志初始化
// ==========================================
// 使用 tracing 和 tracing-subscriber
// 日志写 stderr，stdout 留给命令输出的 JSON
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 日志格式环境变量（取值 json 时输出结构化日志）
pub const LOG_FORMAT_ENV: &str = "DEALER_ANALYTICS_LOG_FORMAT";

/// 初始化日志系统
///
/// # 环境变量
/// - RUST_LOG: 日志级别过滤器（默认: info）
///   例如: RUST_LOG=debug 或 RUST_LOG=dealer_network_analytics=trace,perf=info
/// - DEALER_ANALYTICS_LOG_FORMAT=json: JSON 行格式
///
/// # 示例
/// ```no_run
/// use dealer_network_analytics::logging;
/// logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var(LOG_FORMAT_ENV)
        .map(|v| v.trim().eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        eprintln!("日志系统已初始化，忽略重复初始化: {}", e);
    }
}

/// 初始化测试环境的日志系统
///
/// 使用更详细的日志级别，便于调试
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
