//! Yahoo Finance 数据源
//!
//! - 历史日K线：/v8/finance/chart/{symbol}
//! - 参考数据：/v7/finance/quote（需要会话 Cookie 和 crumb）

use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;
use reqwest::Client;
use serde_json::Value;
use tokio::sync::Mutex;
use url::Url;

use crate::config::AppConfig;
use crate::models::{RawBar, ReferenceSnapshot};

use super::common::{YAHOO_CHART_PATH, YAHOO_COOKIE_URL, YAHOO_CRUMB_PATH, YAHOO_QUOTE_PATH};
use super::source::MarketDataSource;

/// Yahoo Finance 数据源
pub struct YahooFinanceSource {
    /// HTTP 客户端（启用 Cookie 存储）
    client: Client,
    /// API 基础地址
    base_url: Url,
    /// crumb 缓存，会话失效时清空
    crumb: Mutex<Option<String>>,
}

impl YahooFinanceSource {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.api.timeout_secs))
            .connect_timeout(Duration::from_secs(config.api.connect_timeout_secs))
            .user_agent(config.market.user_agent.clone())
            .cookie_store(true)
            .gzip(true)
            .build()?;

        let base_url = Url::parse(&config.market.base_url)
            .map_err(|e| anyhow!("无效的数据源地址 {}: {}", config.market.base_url, e))?;

        Ok(Self {
            client,
            base_url,
            crumb: Mutex::new(None),
        })
    }

    /// 拼接 API 地址，行情代码作为独立路径段编码
    fn endpoint(&self, path: &str, symbol: Option<&str>) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                anyhow!("数据源地址不能作为基础路径: {}", self.base_url)
            })?;
            segments.pop_if_empty().extend(path.split('/'));
            if let Some(symbol) = symbol {
                segments.push(symbol);
            }
        }
        Ok(url)
    }

    /// 获取 crumb，首次调用时先建立会话 Cookie
    async fn crumb(&self) -> Result<String> {
        let mut cached = self.crumb.lock().await;
        if let Some(crumb) = cached.as_ref() {
            return Ok(crumb.clone());
        }

        // 该地址通常返回 404，只需要响应里的 Cookie
        if let Err(e) = self.client.get(YAHOO_COOKIE_URL).send().await {
            log::debug!("建立会话 Cookie 失败: {}", e);
        }

        let url = self.endpoint(YAHOO_CRUMB_PATH, None)?;
        log::debug!("请求 crumb URL: {}", url);
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!("获取 crumb 失败: {}", response.status()));
        }

        let crumb = response.text().await?.trim().to_string();
        if crumb.is_empty() || crumb.contains('<') {
            return Err(anyhow!("crumb 响应无效"));
        }

        *cached = Some(crumb.clone());
        Ok(crumb)
    }
}

#[async_trait]
impl MarketDataSource for YahooFinanceSource {
    async fn fetch_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawBar>> {
        let url = self.endpoint(YAHOO_CHART_PATH, Some(symbol))?;
        // 交易所零点与 UTC 零点最多相差一天，窗口两端各放宽一天，解析时按当地日期截取
        let utc_midnight = |date: NaiveDate| date.and_time(NaiveTime::MIN).and_utc().timestamp();
        let period1 = utc_midnight(start.pred_opt().unwrap_or(start));
        let period2 = utc_midnight(end.succ_opt().unwrap_or(end));
        log::debug!("请求日K线数据 URL: {} ({} ~ {})", url, start, end);

        let response = self
            .client
            .get(url)
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
                ("events", "history".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        let json: Value = serde_json::from_str(&text)
            .map_err(|e| anyhow!("解析K线数据失败 ({}): {}", status, e))?;

        if !status.is_success() && json["chart"]["error"].is_null() {
            return Err(anyhow!("获取历史数据失败: {}", status));
        }

        let bars = parse_chart_history(&json, start, end)?;
        log::info!("{} 获取到 {} 条日K线", symbol, bars.len());
        Ok(bars)
    }

    async fn fetch_snapshot(&self, symbol: &str) -> Result<ReferenceSnapshot> {
        let crumb = self.crumb().await?;
        let url = self.endpoint(YAHOO_QUOTE_PATH, None)?;
        log::debug!("请求参考数据 URL: {} symbol={}", url, symbol);

        let response = self
            .client
            .get(url)
            .query(&[("symbols", symbol), ("crumb", crumb.as_str())])
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            *self.crumb.lock().await = None;
            return Err(anyhow!("crumb 已失效: {}", status));
        }
        if !status.is_success() {
            return Err(anyhow!("获取参考数据失败: {}", status));
        }

        let json: Value = response.json().await?;
        parse_quote_snapshot(&json)
    }
}

/// 解析 chart 接口返回的日K线
///
/// - 开高低收任一为 null 的行被丢弃，成交量为 null 记为缺失
/// - 时间戳换算到交易所时区，并归一到当地零点
/// - 只保留当地日期落在 [start, end) 内的行
/// - 同一交易日出现多行时保留最后一行
fn parse_chart_history(json: &Value, start: NaiveDate, end: NaiveDate) -> Result<Vec<RawBar>> {
    let chart = &json["chart"];

    if let Some(error) = chart["error"].as_object() {
        let code = error.get("code").and_then(Value::as_str).unwrap_or("");
        let description = error.get("description").and_then(Value::as_str).unwrap_or("");
        if code == "Not Found" {
            return Ok(Vec::new());
        }
        return Err(anyhow!("数据源返回错误: {} {}", code, description));
    }

    let result = &chart["result"][0];
    let Some(timestamps) = result["timestamp"].as_array() else {
        return Ok(Vec::new());
    };

    let tz: Tz = result["meta"]["exchangeTimezoneName"]
        .as_str()
        .and_then(|name| name.parse().ok())
        .unwrap_or(Tz::UTC);

    let quote = &result["indicators"]["quote"][0];
    let column = |name: &str, i: usize| quote[name].get(i).and_then(Value::as_f64);

    let mut bars: Vec<RawBar> = Vec::with_capacity(timestamps.len());
    for (i, ts) in timestamps.iter().enumerate() {
        let Some(secs) = ts.as_i64() else { continue };
        let (Some(open), Some(high), Some(low), Some(close)) =
            (column("open", i), column("high", i), column("low", i), column("close", i))
        else {
            continue;
        };

        let local_date = tz
            .timestamp_opt(secs, 0)
            .single()
            .ok_or_else(|| anyhow!("无效的时间戳: {}", secs))?
            .date_naive();
        if local_date < start || local_date >= end {
            continue;
        }

        let timestamp = tz
            .from_local_datetime(&local_date.and_time(NaiveTime::MIN))
            .earliest()
            .ok_or_else(|| anyhow!("无法换算交易日零点: {} {}", local_date, tz))?
            .fixed_offset();

        let bar = RawBar {
            timestamp,
            open,
            high,
            low,
            close,
            volume: column("volume", i).map(|v| v.max(0.0) as u64),
        };

        match bars.last_mut() {
            Some(last) if last.timestamp.date_naive() == local_date => *last = bar,
            _ => bars.push(bar),
        }
    }

    Ok(bars)
}

/// 解析 quote 接口返回的参考数据
fn parse_quote_snapshot(json: &Value) -> Result<ReferenceSnapshot> {
    let item = json["quoteResponse"]["result"]
        .get(0)
        .ok_or_else(|| anyhow!("未找到参考数据"))?;

    let text = |key: &str| {
        item[key]
            .as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    Ok(ReferenceSnapshot {
        name: text("longName").or_else(|| text("shortName")),
        year_high: item["fiftyTwoWeekHigh"].as_f64(),
        year_low: item["fiftyTwoWeekLow"].as_f64(),
        price_avg_50: item["fiftyDayAverage"].as_f64(),
        price_avg_200: item["twoHundredDayAverage"].as_f64(),
        market_cap: item["marketCap"].as_f64(),
        exchange: text("exchange"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source() -> YahooFinanceSource {
        YahooFinanceSource::new(&AppConfig::default()).unwrap()
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn parse_january(json: &Value) -> Result<Vec<RawBar>> {
        parse_chart_history(json, date(2024, 1, 1), date(2024, 2, 1))
    }

    fn daily_chart(tz: &str, timestamps: &[i64]) -> Value {
        let n = timestamps.len();
        json!({
            "chart": {
                "result": [{
                    "meta": { "exchangeTimezoneName": tz },
                    "timestamp": timestamps,
                    "indicators": { "quote": [{
                        "open": vec![1.0; n],
                        "high": vec![2.0; n],
                        "low": vec![0.5; n],
                        "close": vec![1.5; n],
                        "volume": vec![100; n]
                    }]}
                }],
                "error": null
            }
        })
    }

    /// 测试解析日K线
    #[test]
    fn test_parse_chart_history() {
        println!("\n========== 测试解析日K线 ==========");
        // 2024-01-02 05:00 UTC、2024-01-03 05:00 UTC、2024-01-04 05:00 UTC
        let mock = json!({
            "chart": {
                "result": [{
                    "meta": { "symbol": "GC=F", "exchangeTimezoneName": "America/New_York" },
                    "timestamp": [1704171600, 1704258000, 1704344400],
                    "indicators": { "quote": [{
                        "open":   [2064.4, null, 2034.2],
                        "high":   [2074.1, null, 2054.0],
                        "low":    [2058.8, null, 2030.1],
                        "close":  [2064.4, null, 2050.0],
                        "volume": [1503, null, null]
                    }]}
                }],
                "error": null
            }
        });

        let bars = parse_january(&mock).unwrap();
        for b in &bars {
            println!(
                "  {} O:{:.2} H:{:.2} L:{:.2} C:{:.2} V:{:?}",
                b.timestamp, b.open, b.high, b.low, b.close, b.volume
            );
        }

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].timestamp.to_rfc3339(), "2024-01-02T00:00:00-05:00");
        assert_eq!(bars[0].volume, Some(1503));
        assert_eq!(bars[1].timestamp.to_rfc3339(), "2024-01-04T00:00:00-05:00");
        assert_eq!(bars[1].close, 2050.0);
        assert_eq!(bars[1].volume, None);
        println!("✅ 日K线解析测试通过！");
    }

    #[test]
    fn test_parse_chart_same_day_keeps_last() {
        // 收盘后的实时行追加在同一交易日
        let mock = json!({
            "chart": {
                "result": [{
                    "meta": { "exchangeTimezoneName": "America/New_York" },
                    "timestamp": [1704171600, 1704229200],
                    "indicators": { "quote": [{
                        "open":   [1.0, 1.0],
                        "high":   [2.0, 3.0],
                        "low":    [0.5, 0.5],
                        "close":  [1.5, 2.5],
                        "volume": [10, 20]
                    }]}
                }],
                "error": null
            }
        });

        let bars = parse_january(&mock).unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].close, 2.5);
        assert_eq!(bars[0].volume, Some(20));
    }

    /// 东八区以东的交易所：当地零点早于 UTC 零点
    #[test]
    fn test_parse_chart_window_east_of_utc() {
        // 东京当地 2024-01-03、01-04、01-05、01-06 零点
        let mock = daily_chart("Asia/Tokyo", &[1704207600, 1704294000, 1704380400, 1704466800]);

        let bars = parse_chart_history(&mock, date(2024, 1, 4), date(2024, 1, 6)).unwrap();
        let dates: Vec<String> = bars.iter().map(|b| b.timestamp.to_rfc3339()).collect();
        assert_eq!(
            dates,
            vec!["2024-01-04T00:00:00+09:00", "2024-01-05T00:00:00+09:00"]
        );
    }

    #[test]
    fn test_parse_chart_window_west_of_utc() {
        // 纽约当地 2024-01-02、01-03、01-04 零点
        let mock = daily_chart("America/New_York", &[1704171600, 1704258000, 1704344400]);

        let bars = parse_chart_history(&mock, date(2024, 1, 3), date(2024, 1, 4)).unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].timestamp.to_rfc3339(), "2024-01-03T00:00:00-05:00");
    }

    #[test]
    fn test_parse_chart_unknown_timezone_falls_back_to_utc() {
        let mock = json!({
            "chart": {
                "result": [{
                    "meta": {},
                    "timestamp": [1704171600],
                    "indicators": { "quote": [{
                        "open": [1.0], "high": [1.0], "low": [1.0], "close": [1.0], "volume": [0]
                    }]}
                }],
                "error": null
            }
        });

        let bars = parse_january(&mock).unwrap();
        assert_eq!(bars[0].timestamp.to_rfc3339(), "2024-01-02T00:00:00+00:00");
    }

    #[test]
    fn test_parse_chart_empty_and_errors() {
        let not_found = json!({
            "chart": {
                "result": null,
                "error": {
                    "code": "Not Found",
                    "description": "No data found, symbol may be delisted"
                }
            }
        });
        assert!(parse_january(&not_found).unwrap().is_empty());

        let no_rows = json!({
            "chart": { "result": [{ "meta": {}, "indicators": { "quote": [{}] } }], "error": null }
        });
        assert!(parse_january(&no_rows).unwrap().is_empty());

        let bad_request = json!({
            "chart": {
                "result": null,
                "error": {
                    "code": "Bad Request",
                    "description": "Invalid input - start date cannot be after end date"
                }
            }
        });
        let err = parse_january(&bad_request).unwrap_err();
        assert!(err.to_string().contains("Bad Request"));
    }

    /// 测试解析参考数据
    #[test]
    fn test_parse_quote_snapshot() {
        println!("\n========== 测试解析参考数据 ==========");
        let mock = json!({
            "quoteResponse": {
                "result": [{
                    "symbol": "GC=F",
                    "shortName": "Gold Feb 24",
                    "exchange": "CMX",
                    "fiftyTwoWeekHigh": 2152.3,
                    "fiftyTwoWeekLow": 1804.2,
                    "fiftyDayAverage": 2011.6,
                    "twoHundredDayAverage": 1960.4
                }],
                "error": null
            }
        });

        let snapshot = parse_quote_snapshot(&mock).unwrap();
        println!("  {:?}", snapshot);
        assert_eq!(snapshot.name.as_deref(), Some("Gold Feb 24"));
        assert_eq!(snapshot.exchange.as_deref(), Some("CMX"));
        assert_eq!(snapshot.year_high, Some(2152.3));
        assert_eq!(snapshot.year_low, Some(1804.2));
        assert_eq!(snapshot.price_avg_50, Some(2011.6));
        assert_eq!(snapshot.price_avg_200, Some(1960.4));
        assert_eq!(snapshot.market_cap, None);
        println!("✅ 参考数据解析测试通过！");
    }

    #[test]
    fn test_parse_quote_prefers_long_name() {
        let mock = json!({
            "quoteResponse": {
                "result": [{ "longName": "Apple Inc.", "shortName": "Apple", "marketCap": 2.9e12 }]
            }
        });
        let snapshot = parse_quote_snapshot(&mock).unwrap();
        assert_eq!(snapshot.name.as_deref(), Some("Apple Inc."));
        assert_eq!(snapshot.market_cap, Some(2.9e12));
        assert_eq!(snapshot.exchange, None);
    }

    #[test]
    fn test_parse_quote_empty_result() {
        let mock = json!({ "quoteResponse": { "result": [], "error": null } });
        assert!(parse_quote_snapshot(&mock).is_err());
    }

    #[test]
    fn test_endpoint_encodes_symbol() {
        let source = source();
        let chart = source.endpoint(YAHOO_CHART_PATH, Some("GC=F")).unwrap();
        assert_eq!(chart.as_str(), "https://query1.finance.yahoo.com/v8/finance/chart/GC=F");

        let quote = source.endpoint(YAHOO_QUOTE_PATH, None).unwrap();
        assert_eq!(quote.as_str(), "https://query1.finance.yahoo.com/v7/finance/quote");
    }

    // ==================== 异步集成测试 ====================

    /// 测试获取黄金期货日K线（需要网络）
    #[tokio::test]
    async fn test_fetch_gold_history() {
        println!("\n========== 测试获取黄金期货日K线 ==========");
        let source = source();
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();

        match source.fetch_history("GC=F", start, end).await {
            Ok(bars) => {
                println!("✅ 获取成功！共 {} 条", bars.len());
                for b in bars.iter().take(5) {
                    println!("  {} C:{:.2}", b.timestamp, b.close);
                }
            }
            Err(e) => {
                println!("❌ 获取失败: {}", e);
            }
        }
    }
}
