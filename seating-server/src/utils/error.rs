//! 统一错误处理
//!
//! 错误类型统一来自 `shared::error`，这里只补充处理器常用的辅助函数。
//!
//! # 错误码规范
//!
//! | 前缀 | 分类 | 示例 |
//! |------|------|------|
//! | E0xxx | 通用错误 | E0002 校验失败 |
//! | E1xxx | 认证错误 | E1001 未登录 |
//! | E7xxx | 座位规则错误 | E7003 桌位已满 |
//! | E9xxx | 系统错误 | E9002 数据库错误 |
//!
//! # 使用示例
//!
//! ```ignore
//! // 返回错误
//! Err(AppError::guest_not_found(&id))
//!
//! // 返回成功响应
//! Ok(ok(guest))
//! ```

use axum::Json;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

/// 包装成功响应
pub fn ok<T>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(data))
}

/// 带自定义消息的成功响应
pub fn ok_with_message<T>(data: T, message: impl Into<String>) -> Json<ApiResponse<T>> {
    let mut response = ApiResponse::success(data);
    response.message = message.into();
    Json(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_with_message() {
        let Json(response) = ok_with_message(3, "Counts refreshed");
        assert_eq!(response.code, Some(0));
        assert_eq!(response.message, "Counts refreshed");
        assert_eq!(response.data, Some(3));
    }
}
