//! 行情数据源接口

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::models::{RawBar, ReferenceSnapshot};

/// 行情数据源
///
/// 计算核心只依赖该接口，具体实现负责网络请求和超时
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// 获取 [start, end) 区间内按时间升序排列的日K线，没有数据时返回空序列
    async fn fetch_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawBar>>;

    /// 获取品种参考数据快照，字段尽力填充
    async fn fetch_snapshot(&self, symbol: &str) -> Result<ReferenceSnapshot>;
}
