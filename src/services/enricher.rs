//! K线衍生指标计算
//!
//! 将按时间排序的原始K线序列转换为等长、同序的衍生指标序列。
//! 唯一的跨K线状态是上一根K线的收盘价，以显式的折叠累加器表示。

use crate::error::MetricsError;
use crate::models::{EnrichedBar, RawBar};

use super::common::{round_to, safe_div, LABEL_FORMAT};

/// 折叠累加器
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EnrichState {
    /// 上一根K线的收盘价，首根K线之前为 None（不能用 0 表示）
    pub previous_close: Option<f64>,
}

/// 计算整段K线的衍生指标
///
/// # 错误
/// - 空序列返回 `NoData`
/// - 价格非有限值、最高价低于最低价、时间戳未严格递增返回 `InvalidInput`
pub fn enrich(raw_bars: &[RawBar]) -> Result<Vec<EnrichedBar>, MetricsError> {
    if raw_bars.is_empty() {
        return Err(MetricsError::NoData);
    }
    validate(raw_bars)?;

    let (_, enriched) = raw_bars.iter().fold(
        (EnrichState::default(), Vec::with_capacity(raw_bars.len())),
        |(state, mut out), bar| {
            let (next, enriched) = step(state, bar);
            out.push(enriched);
            (next, out)
        },
    );

    Ok(enriched)
}

/// 单步计算：根据累加器和当前K线生成衍生指标及新的累加器
pub fn step(state: EnrichState, bar: &RawBar) -> (EnrichState, EnrichedBar) {
    let (change, change_percent) = match state.previous_close {
        None => (0.0, 0.0),
        Some(previous_close) => {
            let change = bar.close - previous_close;
            (change, safe_div(change, previous_close) * 100.0)
        }
    };

    let vwap = (bar.high + bar.low + bar.close) / 3.0;
    let change_over_time = safe_div(change, bar.close);
    let volume = bar.volume.unwrap_or(0);

    let enriched = EnrichedBar {
        date: bar.timestamp.to_rfc3339(),
        open: bar.open,
        high: bar.high,
        low: bar.low,
        close: bar.close,
        adj_close: bar.close,
        volume,
        unadjusted_volume: volume,
        change: round_to(change, 2),
        change_percent: round_to(change_percent, 2),
        vwap: round_to(vwap, 2),
        label: bar.timestamp.format(LABEL_FORMAT).to_string(),
        change_over_time: round_to(change_over_time, 4),
        timestamp: bar.timestamp,
        previous_close: state.previous_close,
    };

    let next = EnrichState {
        previous_close: Some(bar.close),
    };

    (next, enriched)
}

fn validate(raw_bars: &[RawBar]) -> Result<(), MetricsError> {
    for (i, bar) in raw_bars.iter().enumerate() {
        if ![bar.open, bar.high, bar.low, bar.close].iter().all(|v| v.is_finite()) {
            return Err(MetricsError::InvalidInput(format!(
                "bar {} ({}) has a non-finite price",
                i, bar.timestamp
            )));
        }
        if bar.high < bar.low {
            return Err(MetricsError::InvalidInput(format!(
                "bar {} ({}) has high {} below low {}",
                i, bar.timestamp, bar.high, bar.low
            )));
        }
    }

    if let Some(pos) = raw_bars
        .windows(2)
        .position(|pair| pair[1].timestamp <= pair[0].timestamp)
    {
        return Err(MetricsError::InvalidInput(format!(
            "timestamps not strictly increasing at bar {} ({} after {})",
            pos + 1,
            raw_bars[pos + 1].timestamp,
            raw_bars[pos].timestamp
        )));
    }

    Ok(())
}
