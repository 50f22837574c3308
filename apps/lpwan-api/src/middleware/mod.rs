//! 请求上下文与认证中间件

mod auth;

pub use auth::*;
