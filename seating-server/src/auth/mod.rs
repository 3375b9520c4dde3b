//! 管理员认证模块
//!
//! - [`AdminCredentials`] - argon2 哈希后的管理员密码
//! - [`SessionStore`] - 内存会话表 (token -> 过期时间)
//! - [`require_admin_session`] - `/api/admin/*` 会话中间件

pub mod credentials;
pub mod middleware;
pub mod session;

pub use credentials::AdminCredentials;
pub use middleware::{require_admin_session, session_token};
pub use session::{SESSION_COOKIE, Session, SessionError, SessionStore};
