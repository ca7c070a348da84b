use serde::{Deserialize, Serialize};

use crate::Id;

/// HTTP Methods for data store requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// REST 数据存储暴露的资源集合
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Courses,
    Instructors,
}

impl Collection {
    /// 集合路径（不含前导斜杠）
    pub fn path(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Courses => "courses",
            Collection::Instructors => "instructors",
        }
    }

    /// 单个资源路径，如 `courses/3`
    pub fn item_path(&self, id: Id) -> String {
        format!("{}/{}", self.path(), id)
    }
}

/// 用户查询过滤条件，序列化为 URL 查询参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserQuery {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl UserQuery {
    /// 凭据匹配（登录）
    pub fn credentials(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: Some(password.into()),
        }
    }

    /// 仅按邮箱查询（注册查重）
    pub fn by_email(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: None,
        }
    }
}
