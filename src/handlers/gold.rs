//! 黄金价格接口处理器
//!
//! ## API 列表
//! - POST /gold-price - 区间日K线及衍生指标
//! - POST /gold-price/full - 区间日K线指标 + 品种参考数据

use actix_web::{error, web, HttpResponse, Result};

use crate::error::AppError;
use crate::models::{PriceRangeRequest, PriceView};
use crate::services::price_service;
use crate::state::AppState;

/// 获取区间日K线衍生指标
///
/// POST /gold-price
/// ```json
/// { "symbol": "GC=F", "startDate": "2024-01-01", "endDate": "2024-02-01" }
/// ```
pub async fn get_gold_price_range(
    state: web::Data<AppState>,
    body: web::Json<PriceRangeRequest>,
) -> Result<HttpResponse, AppError> {
    respond(&state, &body, PriceView::Bars).await
}

/// 获取区间完整报价（含 52 周高低、均线、市值、交易所）
///
/// POST /gold-price/full
pub async fn get_gold_quote_range(
    state: web::Data<AppState>,
    body: web::Json<PriceRangeRequest>,
) -> Result<HttpResponse, AppError> {
    respond(&state, &body, PriceView::Full).await
}

async fn respond(
    state: &AppState,
    request: &PriceRangeRequest,
    view: PriceView,
) -> Result<HttpResponse, AppError> {
    let query = request.validate(&state.default_symbol)?;
    let records = price_service::get_price_records(state.source.as_ref(), &query, view).await?;
    Ok(HttpResponse::Ok().json(records))
}

/// 请求体解析失败同样返回统一错误格式
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| error::Error::from(AppError::BadRequest(err.to_string())))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/gold-price")
            .app_data(json_config())
            .route(web::post().to(get_gold_price_range)),
    )
    .service(
        web::resource("/gold-price/full")
            .app_data(json_config())
            .route(web::post().to(get_gold_quote_range)),
    );
}
