//! 价格区间请求模型

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Deserialize;

use crate::error::AppError;

/// 允许的行情代码字符，如 GC=F、^GSPC、BRK-B、XAUUSD=X
static SYMBOL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9^=.\-]{1,32}$").expect("symbol pattern is valid"));

const DATE_FORMAT: &str = "%Y-%m-%d";

/// 价格区间请求体
///
/// ```json
/// { "symbol": "GC=F", "startDate": "2024-01-01", "endDate": "2024-02-01" }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct PriceRangeRequest {
    /// 行情代码，缺省使用配置中的默认代码
    #[serde(default)]
    pub symbol: Option<String>,
    /// 开始日期（YYYY-MM-DD）
    #[serde(rename = "startDate", alias = "start_date")]
    pub start_date: String,
    /// 结束日期（YYYY-MM-DD，不含当日）
    #[serde(rename = "endDate", alias = "end_date")]
    pub end_date: String,
}

/// 校验后的查询参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceQuery {
    pub symbol: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PriceRangeRequest {
    /// 校验日期格式和行情代码
    pub fn validate(&self, default_symbol: &str) -> Result<PriceQuery, AppError> {
        let (start, end) = match (
            NaiveDate::parse_from_str(self.start_date.trim(), DATE_FORMAT),
            NaiveDate::parse_from_str(self.end_date.trim(), DATE_FORMAT),
        ) {
            (Ok(start), Ok(end)) => (start, end),
            _ => {
                return Err(AppError::BadRequest(
                    "Dates must be in YYYY-MM-DD format".to_string(),
                ))
            }
        };

        if start > end {
            return Err(AppError::BadRequest(
                "startDate must not be after endDate".to_string(),
            ));
        }

        let symbol = match self.symbol.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => default_symbol.to_string(),
        };

        if !SYMBOL_PATTERN.is_match(&symbol) {
            return Err(AppError::BadRequest(format!("Invalid symbol: {}", symbol)));
        }

        Ok(PriceQuery { symbol, start, end })
    }
}
