use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::comm::config::ConfigError;
use crate::storage::{describe_error, StoreError};

/// 统一的应用错误类型
#[derive(Error, Debug)]
pub enum AppError {
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    #[error("验证错误: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("资源冲突: {resource}")]
    Conflict { resource: String },

    #[error("资源未找到: {resource}")]
    NotFound { resource: String },

    #[error("存储错误: {0}")]
    Store(#[from] StoreError),

    #[error("内部错误: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// 创建验证错误
    pub fn validation<T: Into<String>, U: Into<String>>(field: T, message: U) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// 创建冲突错误
    pub fn conflict<T: Into<String>>(resource: T) -> Self {
        Self::Conflict {
            resource: resource.into(),
        }
    }

    /// 创建资源未找到错误
    pub fn not_found<T: Into<String>>(resource: T) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// 获取错误代码
    pub fn error_code(&self) -> i32 {
        match self {
            AppError::Config(_) => 1001,
            AppError::Validation { .. } => 1004,
            AppError::Conflict { .. } => 1005,
            AppError::Store(_) => 1006,
            AppError::NotFound { .. } => 1009,
            AppError::Internal(_) => 1000,
        }
    }

    /// 获取HTTP状态码
    pub fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;

        match self {
            AppError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Config(_) | AppError::Store(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        AppError::status_code(self)
    }

    fn error_response(&self) -> HttpResponse {
        let status = AppError::status_code(self);
        let error_code = self.error_code();
        let message = self.to_string();

        // 记录错误日志 / Log by severity
        match self {
            AppError::Store(e) => {
                tracing::error!("Store error: {}", describe_error(e));
            }
            AppError::Internal(_) | AppError::Config(_) => {
                tracing::error!("Internal error: {}", message);
            }
            _ => {
                tracing::info!("Client error: {}", message);
            }
        }

        HttpResponse::build(status).json(json!({
            "success": false,
            "error": {
                "code": error_code,
                "message": message,
            },
            "timestamp": chrono::Utc::now().to_rfc3339()
        }))
    }
}

/// 应用结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::validation("name", "required").status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::conflict("participant Alice").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::not_found("participant Bob").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(StoreError::unavailable("down")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        let timeout = StoreError::Timeout {
            operation: "list_participants".to_string(),
            timeout_ms: 10,
        };
        assert_eq!(
            AppError::from(timeout).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn test_error_body_shape() {
        let resp = AppError::validation("to", "must not be empty").error_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["error"]["code"], 1004);
        assert!(value["error"]["message"].as_str().unwrap().contains("to"));
    }
}
