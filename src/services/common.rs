//! 公共常量和数值辅助函数

// ==================== Yahoo Finance API 常量 ====================

/// Yahoo Finance 默认 API 地址
pub const YAHOO_API_BASE: &str = "https://query1.finance.yahoo.com";
/// 用于建立会话 Cookie 的地址
pub const YAHOO_COOKIE_URL: &str = "https://fc.yahoo.com";
/// 历史K线 API 路径（后接行情代码）
pub const YAHOO_CHART_PATH: &str = "v8/finance/chart";
/// 报价 API 路径
pub const YAHOO_QUOTE_PATH: &str = "v7/finance/quote";
/// Crumb API 路径
pub const YAHOO_CRUMB_PATH: &str = "v1/test/getcrumb";
/// 默认 User-Agent
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

// ==================== 参考数据默认值 ====================

/// 默认行情代码（COMEX 黄金期货）
pub const DEFAULT_SYMBOL: &str = "GC=F";
/// 参考数据缺失时的品种名称
pub const DEFAULT_NAME: &str = "Gold";
/// 参考数据缺失时的交易所
pub const DEFAULT_EXCHANGE: &str = "COMEX";

/// 展示用日期格式，如 "Jan 02, 2024"
pub const LABEL_FORMAT: &str = "%b %d, %Y";

/// 按指定小数位四舍五入，恰好在中点时取偶数
///
/// 基于浮点数的精确十进制值取舍，不先乘 10^n（乘法本身会产生舍入误差）
pub fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{:.*}", decimals, value).parse().unwrap_or(value)
}

/// 除数为 0 时返回 0
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator != 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}
