//! K线数据模型
//!
//! - `RawBar`：数据源返回的单日 OHLCV 原始数据
//! - `EnrichedBar`：附加了涨跌、VWAP 等衍生指标的K线（行情视图输出）

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// 原始K线
///
/// 时间戳保留数据源原生的时区偏移，同一序列内严格递增
#[derive(Debug, Clone, PartialEq)]
pub struct RawBar {
    /// 时间戳
    pub timestamp: DateTime<FixedOffset>,
    /// 开盘价
    pub open: f64,
    /// 最高价
    pub high: f64,
    /// 最低价
    pub low: f64,
    /// 收盘价
    pub close: f64,
    /// 成交量（缺失按 0 处理）
    pub volume: Option<u64>,
}

/// 衍生指标K线
///
/// 序列化字段与 `/gold-price` 接口返回格式一致
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedBar {
    /// ISO 8601 日期（带时区偏移）
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// 复权收盘价，不做复权处理，等于收盘价
    pub adj_close: f64,
    pub volume: u64,
    pub unadjusted_volume: u64,
    /// 较上一根K线收盘价的涨跌额（两位小数）
    pub change: f64,
    /// 涨跌幅百分比（两位小数）
    pub change_percent: f64,
    /// (最高 + 最低 + 收盘) / 3，两位小数
    pub vwap: f64,
    /// 展示用日期，如 "Jan 02, 2024"
    pub label: String,
    /// 涨跌额 / 当前收盘价，四位小数
    pub change_over_time: f64,
    #[serde(skip)]
    pub timestamp: DateTime<FixedOffset>,
    /// 上一根K线的原始收盘价，首根为 None
    #[serde(skip)]
    pub previous_close: Option<f64>,
}
