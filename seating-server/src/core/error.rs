use thiserror::Error;

use crate::db::StoreError;

/// 服务器启动/运行错误
///
/// 请求级错误使用 [`AppError`](crate::AppError)；这里只覆盖进程生命周期内的失败。
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("工作目录初始化失败: {0}")]
    WorkDir(#[from] std::io::Error),

    #[error("存储初始化失败: {0}")]
    Storage(#[from] StoreError),

    #[error("管理员密码哈希失败: {0}")]
    PasswordHash(String),

    #[error("HTTP 服务未初始化")]
    NotInitialized,

    #[error("内部服务器错误")]
    Internal(#[from] anyhow::Error),
}

/// 服务器生命周期的 Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;
