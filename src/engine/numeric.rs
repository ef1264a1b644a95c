// ==========================================
// 经销商网络决策支持系统 - 数值输出工具
// ==========================================

/// 四舍五入到指定小数位（输出口径统一用）
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// 取整并按千位分组，例如 1234567.4 -> "1,234,567"
pub fn format_grouped(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
