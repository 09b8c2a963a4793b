//! 错误类型
//!
//! - `MetricsError`：指标计算核心的错误
//! - `AppError`：HTTP 层错误，负责映射到状态码和统一响应格式

use actix_web::{http::StatusCode, HttpResponse, ResponseError};

use crate::models::ApiResponse;

/// 指标计算错误
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MetricsError {
    /// 输入K线不满足约定（最高价低于最低价、时间戳未严格递增等）
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// 数据源没有返回任何K线
    #[error("No data available for this date range")]
    NoData,
}

/// HTTP 层错误
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 请求参数错误 (400)
    #[error("{0}")]
    BadRequest(String),

    /// 没有数据 (404)
    #[error("{0}")]
    NotFound(String),

    /// 其他错误 (500)
    #[error("{0}")]
    Internal(String),
}

impl From<MetricsError> for AppError {
    fn from(err: MetricsError) -> Self {
        match err {
            MetricsError::NoData => AppError::NotFound(err.to_string()),
            MetricsError::InvalidInput(_) => AppError::Internal(err.to_string()),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ApiResponse::<()>::error(self.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_error_mapping() {
        let not_found: AppError = MetricsError::NoData.into();
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.to_string(), "No data available for this date range");

        let internal: AppError = MetricsError::InvalidInput("high < low".into()).into();
        assert_eq!(internal.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(internal.to_string(), "Invalid input: high < low");
    }

    #[test]
    fn test_anyhow_maps_to_internal() {
        let err: AppError = anyhow::anyhow!("upstream timeout").into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "upstream timeout");
    }

    #[test]
    fn test_bad_request_status() {
        let err = AppError::BadRequest("Dates must be in YYYY-MM-DD format".into());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
