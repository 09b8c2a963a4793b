//! K线与参考数据合并
//!
//! 同一请求中的所有K线共用一份参考数据快照；快照缺失时退化为全部默认值。

use crate::models::{EnrichedBar, QuoteRecord, ReferenceSnapshot};

use super::common::{DEFAULT_EXCHANGE, DEFAULT_NAME};

/// 将一根衍生指标K线与参考数据合并为完整报价记录
///
/// 涨跌额和涨跌幅直接沿用 `enrich` 的结果，不重新计算。
/// `previousClose` 取计算时携带的上一根原始收盘价，首根K线取自身收盘价。
pub fn merge(
    bar: &EnrichedBar,
    snapshot: Option<&ReferenceSnapshot>,
    symbol: &str,
) -> QuoteRecord {
    let empty = ReferenceSnapshot::default();
    let snapshot = snapshot.unwrap_or(&empty);

    QuoteRecord {
        symbol: symbol.to_string(),
        name: snapshot
            .name
            .clone()
            .unwrap_or_else(|| DEFAULT_NAME.to_string()),
        price: bar.close,
        change_percentage: bar.change_percent,
        change: bar.change,
        volume: bar.volume,
        day_low: bar.low,
        day_high: bar.high,
        year_high: snapshot.year_high.unwrap_or(0.0),
        year_low: snapshot.year_low.unwrap_or(0.0),
        market_cap: snapshot.market_cap,
        price_avg50: snapshot.price_avg_50.unwrap_or(0.0),
        price_avg200: snapshot.price_avg_200.unwrap_or(0.0),
        exchange: snapshot
            .exchange
            .clone()
            .unwrap_or_else(|| DEFAULT_EXCHANGE.to_string()),
        open: bar.open,
        previous_close: bar.previous_close.unwrap_or(bar.close),
        timestamp: bar.timestamp.timestamp(),
    }
}

/// 对整段K线逐根合并
pub fn merge_all(
    bars: &[EnrichedBar],
    snapshot: Option<&ReferenceSnapshot>,
    symbol: &str,
) -> Vec<QuoteRecord> {
    bars.iter().map(|bar| merge(bar, snapshot, symbol)).collect()
}
