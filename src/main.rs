//! 黄金价格后端服务
//!
//! 提供区间日K线及衍生指标（涨跌、涨跌幅、VWAP、changeOverTime）的 RESTful API 服务
//! 数据来源：Yahoo Finance

mod config;     // 配置加载
mod error;      // 错误类型
mod handlers;   // HTTP 请求处理器
mod middleware; // 中间件
mod models;     // 数据模型定义
mod services;   // 业务逻辑服务
mod state;      // 共享状态

use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use std::io;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::middleware::ApiKeyMiddleware;
use crate::services::YahooFinanceSource;
use crate::state::AppState;

/// 应用程序入口
///
/// 启动 HTTP 服务器，默认监听 0.0.0.0:8000（可由 PORT 环境变量覆盖）
#[actix_web::main]
async fn main() -> io::Result<()> {
    let config = AppConfig::load();

    // 初始化日志系统，RUST_LOG 优先于配置文件
    env_logger::init_from_env(Env::default().default_filter_or(config.log.level.as_str()));

    if config.api.api_key.is_empty() {
        log::warn!("未设置 API_KEY，接口认证已关闭");
    }

    let source = YahooFinanceSource::new(&config).map_err(io::Error::other)?;
    let state = web::Data::new(AppState::new(
        Arc::new(source),
        config.market.default_symbol.clone(),
    ));
    let api_key = config.api.api_key.clone();

    log::info!("启动黄金价格服务，监听 {}", config.bind_addr());

    // 创建并启动 HTTP 服务器
    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(ApiKeyMiddleware::new(api_key.clone())) // API Key 认证
            .wrap(Logger::default()) // 请求日志
            .configure(handlers::config) // 配置路由
    });

    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(config.bind_addr())?.run().await
}
