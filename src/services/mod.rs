//! 业务逻辑服务模块
//!
//! 封装数据获取和指标计算逻辑

pub mod common;         // 公共常量和数值辅助函数
pub mod enricher;       // K线衍生指标计算
pub mod merger;         // K线与参考数据合并
pub mod price_service;  // 价格区间服务
pub mod source;         // 数据源接口
pub mod yahoo;          // Yahoo Finance 数据源

pub use source::MarketDataSource;
pub use yahoo::YahooFinanceSource;
