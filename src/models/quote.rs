//! 品种参考数据及完整报价模型

use serde::Serialize;

use super::EnrichedBar;

/// 品种参考数据快照
///
/// 数据源尽力提供，每个字段都可能缺失，缺失值在合并时按默认值处理
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceSnapshot {
    /// 品种名称
    pub name: Option<String>,
    /// 52周最高价
    pub year_high: Option<f64>,
    /// 52周最低价
    pub year_low: Option<f64>,
    /// 50日均价
    pub price_avg_50: Option<f64>,
    /// 200日均价
    pub price_avg_200: Option<f64>,
    /// 市值
    pub market_cap: Option<f64>,
    /// 交易所代码
    pub exchange: Option<String>,
}

/// 完整报价记录（K线 + 参考数据）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRecord {
    pub symbol: String,
    pub name: String,
    /// 当日收盘价
    pub price: f64,
    pub change_percentage: f64,
    pub change: f64,
    pub volume: u64,
    pub day_low: f64,
    pub day_high: f64,
    pub year_high: f64,
    pub year_low: f64,
    /// 未知时输出 null，不以 0 代替
    pub market_cap: Option<f64>,
    pub price_avg50: f64,
    pub price_avg200: f64,
    pub exchange: String,
    pub open: f64,
    pub previous_close: f64,
    /// Unix 时间戳（秒）
    pub timestamp: i64,
}

/// 响应视图，由调用方选择
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceView {
    /// 仅K线指标
    Bars,
    /// K线指标 + 参考数据
    Full,
}

/// 价格接口输出，两种视图共享同一份衍生指标
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PriceRecords {
    Bars(Vec<EnrichedBar>),
    Quotes(Vec<QuoteRecord>),
}
