//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`search`] - 宾客搜索 (公共)
//! - [`sync`] - 全量同步快照 (公共)
//! - [`overview`] - 汇总与各桌名单 (公共)
//! - [`auth`] - 管理员登录/登出
//! - [`guests`] - 宾客接口 (签到公共，其余需管理员会话)
//! - [`tables`] - 桌位管理接口
//! - [`export`] - PDF 导出

pub mod auth;
pub mod export;
pub mod guests;
pub mod health;
pub mod overview;
pub mod search;
pub mod sync;
pub mod tables;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};
