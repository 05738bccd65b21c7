/// 错误分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 请求方或上游返回了非法输入（imp.ext 不合法、上游返回 400）
    InputValidation,
    /// 上游响应体不符合 OpenRTB 约定
    ServerResponse,
    /// 其它：非预期状态码、序列化失败、传输层错误
    Generic,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AdapterError {
    #[error("{message}")]
    BadInput { message: String },

    #[error("{message}")]
    BadServerResponse { message: String },

    #[error("unexpected status code: {status}. Run with request.debug = 1 for more info")]
    UnexpectedStatus { status: u16 },

    #[error("failed to encode request: {message}")]
    Serialization { message: String },

    #[error("outbound request body is not a valid bid request: {message}")]
    InvalidRequestBody { message: String },

    #[error("transport error: {message}")]
    Transport { message: String },

    #[error("request timed out after {millis} ms")]
    Timeout { millis: u64 },
}

impl AdapterError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AdapterError::BadInput { .. } => ErrorKind::InputValidation,
            AdapterError::BadServerResponse { .. } => ErrorKind::ServerResponse,
            AdapterError::UnexpectedStatus { .. }
            | AdapterError::Serialization { .. }
            | AdapterError::InvalidRequestBody { .. }
            | AdapterError::Transport { .. }
            | AdapterError::Timeout { .. } => ErrorKind::Generic,
        }
    }

    /// 上游返回 400 时的错误：归为输入错误，文案与其它状态码一致
    pub fn bad_status_input(status: u16) -> Self {
        AdapterError::BadInput {
            message: format!(
                "unexpected status code: {}. Run with request.debug = 1 for more info",
                status
            ),
        }
    }
}

impl From<reqwest::Error> for AdapterError {
    fn from(err: reqwest::Error) -> Self {
        AdapterError::Transport {
            message: err.to_string(),
        }
    }
}
