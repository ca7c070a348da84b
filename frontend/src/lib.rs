//! Academy 前端应用
//!
//! 采用"外壳 + 片段"的单页架构：
//! - `web::route`: 路由定义与守卫解析（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `web::dom`: 浏览器端的 History、挂载节点与事件委托
//! - `auth`: 会话管理
//! - `api`: REST 数据访问
//! - `components`: 各视图的初始化器，以及面板区域的 Leptos 组件

// =========================================================
// 跨平台日志宏
// =========================================================

#[cfg(target_arch = "wasm32")]
macro_rules! log_info {
    ($($t:tt)*) => (web_sys::console::log_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_info {
    ($($t:tt)*) => (println!($($t)*))
}

#[cfg(target_arch = "wasm32")]
macro_rules! log_error {
    ($($t:tt)*) => (web_sys::console::error_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_error {
    ($($t:tt)*) => (eprintln!($($t)*))
}

mod api;
mod auth;
mod components {
    pub mod admin_dashboard;
    pub mod login;
    pub mod regions;
    pub mod register;
    pub mod student_dashboard;
}
mod config;
mod error;
#[cfg(test)]
mod testing;

use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::RestStore;
use crate::auth::SessionContext;
use crate::components::admin_dashboard::AdminDashboardPage;
use crate::components::login::LoginPage;
use crate::components::register::RegisterPage;
use crate::components::student_dashboard::StudentDashboardPage;
use crate::config::AppConfig;

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，
// 以减小 WASM 二进制体积。
pub(crate) mod web {
    pub mod actions;
    mod dom;
    mod http;
    mod loader;
    pub mod route;
    pub mod router;
    mod storage;

    pub use dom::{BrowserHistory, DomMount, action_from_click, action_from_submit, install_popstate, link_from_click};
    #[cfg(test)]
    pub use http::MockHttpClient;
    pub use http::{FetchClient, HttpClient, HttpRequest, HttpResponse};
    pub use loader::ViewLoader;
    pub use storage::{KeyValueStore, LocalStorage, MemoryStorage};
}

use web::route::{Layout, View};
use web::router::{AppServices, LOGOUT_ACTION, Router, ViewInitializer};

/// 视图初始化器匹配函数
///
/// 根据 View 枚举返回对应的初始化器；静态页面没有初始化器。
pub(crate) fn view_initializer(view: View) -> Option<Box<dyn ViewInitializer>> {
    match view {
        View::Login => Some(Box::new(LoginPage)),
        View::Register => Some(Box::new(RegisterPage)),
        View::AdminDashboard => Some(Box::new(AdminDashboardPage)),
        View::StudentDashboard => Some(Box::new(StudentDashboardPage)),
        View::Home | View::NotFound => None,
    }
}

/// 选择会话存储：LocalStorage 不可用时退回进程内存储
fn session_storage() -> Rc<dyn web::KeyValueStore> {
    if web::LocalStorage::is_available() {
        Rc::new(web::LocalStorage)
    } else {
        log_info!("[App] LocalStorage 不可用，会话仅保存在内存中");
        Rc::new(web::MemoryStorage::new())
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 读取运行时配置
    let config = AppConfig::from_document();

    // 2. 外壳状态：注销入口与布局类
    let logout_visible = RwSignal::new(false);
    let layout = RwSignal::new(Layout::default());

    // 3. 组装路由服务
    let client: Rc<dyn web::HttpClient> = Rc::new(web::FetchClient);
    let router = Router::new(
        AppServices {
            history: Rc::new(web::BrowserHistory),
            mount: Rc::new(web::DomMount::new(&config.mount_id, logout_visible, layout)),
            store: Rc::new(RestStore::new(config.api_base.clone(), client.clone())),
            sessions: SessionContext::new(session_storage(), config.session_key.clone()),
            loader: web::ViewLoader::new(config.views_base.clone(), client),
        },
        view_initializer,
    );
    web::install_popstate(router.clone());
    let mount_id = config.mount_id;

    // Router 持有 Rc，不能直接被事件闭包捕获
    let router = StoredValue::new_local(router);

    // 4. 挂载完成后进行首次派发
    Effect::new(move |_| {
        let router = router.get_value();
        spawn_local(async move {
            router.dispatch().await;
        });
    });

    // 5. 点击委托：站内链接优先，其次是动作元素
    let on_click = move |ev: leptos::ev::MouseEvent| {
        if let Some(path) = web::link_from_click(&ev) {
            let router = router.get_value();
            spawn_local(async move {
                router.navigate(&path).await;
            });
        } else if let Some(action) = web::action_from_click(&ev) {
            let router = router.get_value();
            spawn_local(async move {
                router.trigger(action).await;
            });
        }
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        if let Some(action) = web::action_from_submit(&ev) {
            let router = router.get_value();
            spawn_local(async move {
                router.trigger(action).await;
            });
        }
    };

    view! {
        <div class="app-shell" on:click=on_click on:submit=on_submit>
            <header class="app-header">
                <a href="/" data-link="true" class="brand">"Academy"</a>
                <nav class="app-nav">
                    <a href="/dashboard" data-link="true">"Dashboard"</a>
                    <Show when=move || logout_visible.get()>
                        <button type="button" class="btn" data-action=LOGOUT_ACTION>"Log out"</button>
                    </Show>
                </nav>
            </header>
            <main id=mount_id class=move || layout.get().class()></main>
        </div>
    }
}
