use serde::{Deserialize, Serialize};

pub mod enrollment;
pub mod protocol;

pub use enrollment::EnrollmentStatus;
pub use protocol::{Collection, HttpMethod, UserQuery};

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// 会话记录在持久化键值存储中的固定键
pub const SESSION_STORAGE_KEY: &str = "academy_session";

/// 数据存储中的实体 ID（json-server 使用自增整数）
pub type Id = u64;

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 用户角色
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Administrator,
    #[default]
    Student,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Administrator => "Administrator",
            Role::Student => "Student",
        }
    }
}

/// 数据存储中的用户记录
///
/// 密码以明文形式保存在模拟存储中，仅用于查询匹配。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

/// 注册时提交的新用户（ID 由存储分配）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// 当前登录身份
///
/// 这是持久化到浏览器存储中的唯一记录，不包含密码。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: Id,
    pub email: String,
    pub role: Role,
}

impl From<&User> for Session {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instructor {
    pub id: Id,
    pub name: String,
}

/// 课程记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub capacity: u32,
    pub instructor_id: Id,
    #[serde(default)]
    pub enrolled_students: Vec<Id>,
}

/// 管理员可编辑的课程字段
///
/// 同时作为 PATCH 请求体使用：只替换这些字段，不触碰选课名单。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseFields {
    pub title: String,
    pub description: String,
    pub category: String,
    pub capacity: u32,
    pub instructor_id: Id,
}

/// 创建课程请求（新课程的选课名单总是为空）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCourse {
    pub title: String,
    pub description: String,
    pub category: String,
    pub capacity: u32,
    pub instructor_id: Id,
    pub enrolled_students: Vec<Id>,
}

impl From<CourseFields> for NewCourse {
    fn from(fields: CourseFields) -> Self {
        Self {
            title: fields.title,
            description: fields.description,
            category: fields.category,
            capacity: fields.capacity,
            instructor_id: fields.instructor_id,
            enrolled_students: Vec::new(),
        }
    }
}

/// 选课名单整体替换请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentPatch {
    pub enrolled_students: Vec<Id>,
}
