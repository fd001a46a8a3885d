use thiserror::Error;

/// 服务器运行错误 (请求级错误使用 `AppError`)
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("网络错误: {0}")]
    Io(#[from] std::io::Error),
}

/// 服务器 Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;
