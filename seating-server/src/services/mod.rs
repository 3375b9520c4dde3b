//! 服务模块
//!
//! - [`HttpsService`] - axum 路由装配与 HTTP 服务

pub mod https;

pub use https::{HttpsService, OneshotResult, build_app};
