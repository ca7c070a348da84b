//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由、视图及守卫规则。

use std::fmt::Display;

use academy_shared::{Role, Session};

/// 应用路由枚举（静态路由表，运行期不会改变）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AppRoute {
    /// 首页
    #[default]
    Home,
    /// 登录页面（仅访客）
    Login,
    /// 注册页面（仅访客）
    Register,
    /// 通用的已认证落地页，按角色解析（需要认证）
    Dashboard,
    /// 学生专属面板（需要认证）
    StudentDashboard,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" | "/index.html" => Self::Home,
            "/login" => Self::Login,
            "/register" => Self::Register,
            "/dashboard" => Self::Dashboard,
            "/student" => Self::StudentDashboard,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Dashboard => "/dashboard",
            Self::StudentDashboard => "/student",
            Self::NotFound => "/404",
        }
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        matches!(self, Self::Dashboard | Self::StudentDashboard)
    }

    /// 定义已认证用户是否应该离开此路由（登录、注册页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 获取认证成功时的重定向目标（通用落地页）
    pub fn auth_success_redirect() -> Self {
        Self::Dashboard
    }

    /// 路由对应的页面布局
    pub fn layout(&self) -> Layout {
        if self.should_redirect_when_authenticated() {
            Layout::Centered
        } else {
            Layout::Standard
        }
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

/// 挂载节点上的布局切换
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    #[default]
    Standard,
    /// 登录/注册表单居中显示
    Centered,
}

impl Layout {
    pub fn class(&self) -> &'static str {
        match self {
            Layout::Standard => "layout-standard",
            Layout::Centered => "layout-centered",
        }
    }
}

/// 最终渲染的视图，每个视图对应一个 HTML 片段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Home,
    Login,
    Register,
    /// 管理员课程管理面板
    AdminDashboard,
    StudentDashboard,
    NotFound,
}

impl View {
    /// 片段文件名（相对于视图目录）
    pub fn fragment(&self) -> &'static str {
        match self {
            View::Home => "home.html",
            View::Login => "login.html",
            View::Register => "register.html",
            View::AdminDashboard => "admin-dashboard.html",
            View::StudentDashboard => "student-dashboard.html",
            View::NotFound => NOT_FOUND_FRAGMENT,
        }
    }
}

/// 未找到页面的片段文件名
pub const NOT_FOUND_FRAGMENT: &str = "404.html";

/// 守卫的解析结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// 重定向到另一路由（守卫会在新路径上重新执行）
    Redirect(AppRoute),
    /// 渲染视图
    Render(View),
}

/// 按固定顺序应用守卫，将路由与会话解析为视图或重定向
///
/// 1. 未登录访问受保护路由 -> 登录页
/// 2. 已登录访问仅访客路由 -> 通用落地页
/// 3. 按角色解析落地页与学生面板
/// 4. 其余路由直接渲染（未知路径已解析为 NotFound）
pub fn resolve(route: AppRoute, session: Option<&Session>) -> Resolution {
    if route.requires_auth() && session.is_none() {
        return Resolution::Redirect(AppRoute::auth_failure_redirect());
    }

    if route.should_redirect_when_authenticated() && session.is_some() {
        return Resolution::Redirect(AppRoute::auth_success_redirect());
    }

    let role = session.map(|s| s.role);
    match (route, role) {
        (AppRoute::Dashboard, Some(Role::Administrator)) => Resolution::Render(View::AdminDashboard),
        (AppRoute::Dashboard, Some(Role::Student)) => {
            Resolution::Redirect(AppRoute::StudentDashboard)
        }
        (AppRoute::StudentDashboard, Some(Role::Student)) => {
            Resolution::Render(View::StudentDashboard)
        }
        (AppRoute::StudentDashboard, Some(Role::Administrator)) => {
            Resolution::Redirect(AppRoute::Dashboard)
        }
        (AppRoute::Home, _) => Resolution::Render(View::Home),
        (AppRoute::Login, _) => Resolution::Render(View::Login),
        (AppRoute::Register, _) => Resolution::Render(View::Register),
        (AppRoute::NotFound, _) => Resolution::Render(View::NotFound),
        // 受保护路由在无会话时已被第一条守卫拦截
        (AppRoute::Dashboard | AppRoute::StudentDashboard, None) => {
            Resolution::Redirect(AppRoute::auth_failure_redirect())
        }
    }
}
