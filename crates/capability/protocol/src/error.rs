//! 协议错误类型定义

/// 远端网络通信错误
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// 未注册的协议处理器
    #[error("unknown protocol handler: {0}")]
    UnknownHandler(String),

    /// 网络配置不完整（缺少地址或凭据）
    #[error("config error: {0}")]
    Config(String),

    /// 远端拒绝登录
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// 传输层错误（连接、超时）
    #[error("transport error: {0}")]
    Transport(String),

    /// 远端返回非成功状态
    #[error("remote error {status}: {message}")]
    Remote { status: u16, message: String },

    /// 响应解析错误
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ProtocolError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ProtocolError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
