use std::fmt;

// =========================================================
// 错误状态枚举
// =========================================================

/// 错误状态枚举
///
/// 网络与可用性类错误（Network / Http / NotFound / Serialization / Storage）
/// 在调用点被记录并降级处理；业务规则类错误（InvalidInput / Conflict /
/// Unauthorized）最终以阻塞式提示展示给用户。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppErrorStatus {
    /// fetch 被拒绝（离线、CORS、DNS 等）
    Network,
    /// 非 2xx 响应
    Http(u16),
    /// 404: 资源未找到
    NotFound,
    /// JSON 或查询参数编解码失败
    Serialization,
    /// 浏览器存储不可用或写入失败
    Storage,
    /// 表单校验失败
    InvalidInput,
    /// 资源冲突（如重复注册）
    Conflict,
    /// 凭据不匹配
    Unauthorized,
}

impl AppErrorStatus {
    /// 获取机器可读的错误代码
    pub fn error_code(&self) -> &'static str {
        match self {
            AppErrorStatus::Network => "NETWORK_ERROR",
            AppErrorStatus::Http(_) => "HTTP_ERROR",
            AppErrorStatus::NotFound => "RESOURCE_NOT_FOUND",
            AppErrorStatus::Serialization => "SERIALIZATION_ERROR",
            AppErrorStatus::Storage => "STORAGE_ERROR",
            AppErrorStatus::InvalidInput => "INVALID_INPUT",
            AppErrorStatus::Conflict => "RESOURCE_CONFLICT",
            AppErrorStatus::Unauthorized => "UNAUTHORIZED",
        }
    }

    /// 是否属于网络与可用性类错误
    pub fn is_availability(&self) -> bool {
        matches!(
            self,
            AppErrorStatus::Network
                | AppErrorStatus::Http(_)
                | AppErrorStatus::NotFound
                | AppErrorStatus::Serialization
                | AppErrorStatus::Storage
        )
    }
}

// =========================================================
// 错误上下文追踪
// =========================================================

/// 结构化的错误追踪片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorSpan {
    /// 操作名称，如 "store.list_courses", "loader.fetch"
    pub operation: String,
    /// 额外的细节信息，如 URL、课程 ID 等
    pub detail: Option<String>,
}

impl ErrorSpan {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: None,
        }
    }

    pub fn with_detail(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: Some(detail.into()),
        }
    }
}

// =========================================================
// 核心错误类型
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppError {
    pub status: AppErrorStatus,
    pub message: String,
    spans: Vec<ErrorSpan>,
}

impl AppError {
    pub fn new(status: AppErrorStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            spans: Vec::new(),
        }
    }

    // --- Convenience constructors ---

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(AppErrorStatus::Network, message)
    }

    /// 根据响应状态码构造；404 单独归类
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        if status == 404 {
            Self::new(AppErrorStatus::NotFound, message)
        } else {
            Self::new(AppErrorStatus::Http(status), message)
        }
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(AppErrorStatus::Serialization, message)
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(AppErrorStatus::Storage, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(AppErrorStatus::InvalidInput, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(AppErrorStatus::Conflict, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(AppErrorStatus::Unauthorized, message)
    }

    // --- Context builders ---

    /// 添加操作追踪（无额外细节）
    pub fn in_op(mut self, operation: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::new(operation));
        self
    }

    /// 添加操作追踪（带额外细节）
    pub fn in_op_with(mut self, operation: impl Into<String>, detail: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::with_detail(operation, detail));
        self
    }

    // --- Accessors ---

    pub fn error_code(&self) -> &'static str {
        self.status.error_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_code(), self.message)?;

        if !self.spans.is_empty() {
            write!(f, " | trace: ")?;
            for (i, span) in self.spans.iter().enumerate() {
                if i > 0 {
                    write!(f, " -> ")?;
                }
                write!(f, "{}", span.operation)?;
                if let Some(detail) = &span.detail {
                    write!(f, "({})", detail)?;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = std::result::Result<T, AppError>;

// =========================================================
// 类型转换实现
// =========================================================

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::serialization(e.to_string())
    }
}

impl From<serde_urlencoded::ser::Error> for AppError {
    fn from(e: serde_urlencoded::ser::Error) -> Self {
        AppError::serialization(e.to_string())
    }
}
