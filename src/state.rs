//! 应用共享状态

use std::sync::Arc;

use crate::services::MarketDataSource;

/// 各 worker 共享的应用状态
pub struct AppState {
    /// 行情数据源
    pub source: Arc<dyn MarketDataSource>,
    /// 请求未指定代码时使用的行情代码
    pub default_symbol: String,
}

impl AppState {
    pub fn new(source: Arc<dyn MarketDataSource>, default_symbol: String) -> Self {
        Self {
            source,
            default_symbol,
        }
    }
}
