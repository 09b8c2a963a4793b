//! 价格区间服务
//!
//! 获取历史K线 → 计算衍生指标 →（完整视图）合并参考数据

use crate::error::AppError;
use crate::models::{PriceQuery, PriceRecords, PriceView};

use super::enricher::enrich;
use super::merger::merge_all;
use super::source::MarketDataSource;

/// 按视图生成价格记录
///
/// 完整视图下历史K线与参考数据并发获取；参考数据获取失败时按缺失处理
pub async fn get_price_records(
    source: &dyn MarketDataSource,
    query: &PriceQuery,
    view: PriceView,
) -> Result<PriceRecords, AppError> {
    match view {
        PriceView::Bars => {
            let raw = source.fetch_history(&query.symbol, query.start, query.end).await?;
            let bars = enrich(&raw)?;
            log::info!(
                "{} {} ~ {} 生成 {} 条K线指标",
                query.symbol,
                query.start,
                query.end,
                bars.len()
            );
            Ok(PriceRecords::Bars(bars))
        }
        PriceView::Full => {
            let (history, snapshot) = tokio::join!(
                source.fetch_history(&query.symbol, query.start, query.end),
                source.fetch_snapshot(&query.symbol)
            );

            let bars = enrich(&history?)?;
            let snapshot = match snapshot {
                Ok(snapshot) => Some(snapshot),
                Err(e) => {
                    log::warn!("{} 参考数据获取失败，使用默认值: {}", query.symbol, e);
                    None
                }
            };

            let quotes = merge_all(&bars, snapshot.as_ref(), &query.symbol);
            log::info!(
                "{} {} ~ {} 生成 {} 条完整报价",
                query.symbol,
                query.start,
                query.end,
                quotes.len()
            );
            Ok(PriceRecords::Quotes(quotes))
        }
    }
}
