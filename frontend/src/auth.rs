//! 认证模块
//!
//! 管理当前会话，与路由系统解耦：路由服务只通过 `SessionContext`
//! 读取会话，从不直接访问浏览器存储。

use std::rc::Rc;

use academy_shared::{NewUser, Role, Session, UserQuery};

use crate::api::DataStore;
use crate::error::{AppError, AppResult};
use crate::web::KeyValueStore;

/// 会话上下文
///
/// 会话记录以 JSON 形式存放在注入的键值存储中，键存在即视为已认证。
#[derive(Clone)]
pub struct SessionContext {
    storage: Rc<dyn KeyValueStore>,
    key: String,
}

impl SessionContext {
    pub fn new(storage: Rc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// 读取当前会话
    ///
    /// 无法解析的记录会被删除并视为未登录。
    pub fn current(&self) -> Option<Session> {
        let raw = self.storage.get(&self.key)?;
        match serde_json::from_str::<Session>(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                log_error!("[Auth] 会话记录损坏，已清除: {}", e);
                self.storage.delete(&self.key);
                None
            }
        }
    }

    #[cfg(test)]
    pub fn is_authenticated(&self) -> bool {
        self.current().is_some()
    }

    /// 开始会话（覆盖已有会话）
    pub fn begin(&self, session: &Session) -> AppResult<()> {
        let raw = serde_json::to_string(session)?;
        if self.storage.set(&self.key, &raw) {
            Ok(())
        } else {
            Err(AppError::storage("无法写入会话记录").in_op("session.begin"))
        }
    }

    /// 结束会话
    pub fn end(&self) {
        self.storage.delete(&self.key);
    }
}

/// 按凭据查找用户并建立会话
///
/// 凭据不匹配、网络失败或存储失败都返回 `None`，错误细节只记录到日志。
pub async fn login(
    store: &dyn DataStore,
    sessions: &SessionContext,
    email: &str,
    password: &str,
) -> Option<Session> {
    match try_login(store, sessions, email, password).await {
        Ok(session) => Some(session),
        Err(e) => {
            report("登录失败", &e);
            None
        }
    }
}

async fn try_login(
    store: &dyn DataStore,
    sessions: &SessionContext,
    email: &str,
    password: &str,
) -> AppResult<Session> {
    let users = store
        .find_users(&UserQuery::credentials(email, password))
        .await?;
    let user = users
        .iter()
        .find(|u| u.email == email && u.password == password)
        .ok_or_else(|| AppError::unauthorized("邮箱或密码错误").in_op_with("auth.login", email))?;

    let session = Session::from(user);
    sessions.begin(&session)?;
    log_info!("[Auth] {} 已登录 ({})", session.email, session.role.label());
    Ok(session)
}

/// 注册学生账号并建立会话
///
/// 邮箱已被占用时返回 `None`；调用方只区分成功与否。
pub async fn register(
    store: &dyn DataStore,
    sessions: &SessionContext,
    email: &str,
    password: &str,
) -> Option<Session> {
    match try_register(store, sessions, email, password).await {
        Ok(session) => Some(session),
        Err(e) => {
            report("注册失败", &e);
            None
        }
    }
}

async fn try_register(
    store: &dyn DataStore,
    sessions: &SessionContext,
    email: &str,
    password: &str,
) -> AppResult<Session> {
    let existing = store.find_users(&UserQuery::by_email(email)).await?;
    if !existing.is_empty() {
        return Err(AppError::conflict("该邮箱已注册").in_op_with("auth.register", email));
    }

    let user = store
        .create_user(&NewUser {
            email: email.to_string(),
            password: password.to_string(),
            role: Role::Student,
        })
        .await?;

    let session = Session::from(&user);
    sessions.begin(&session)?;
    log_info!("[Auth] 新用户 {} 已注册", session.email);
    Ok(session)
}

/// 注销并清除会话
///
/// 导航由调用方（路由服务）负责。
pub fn logout(sessions: &SessionContext) {
    if let Some(session) = sessions.current() {
        log_info!("[Auth] {} 已注销", session.email);
    }
    sessions.end();
}

fn report(context: &str, e: &AppError) {
    if e.status.is_availability() {
        log_error!("[Auth] {}: {}", context, e);
    } else {
        log_info!("[Auth] {}: {}", context, e);
    }
}
