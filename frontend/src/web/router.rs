//! 路由服务模块 - 核心引擎
//!
//! 实现了"解析 -> 守卫 -> 加载 -> 初始化"的导航流程：
//!
//! ```text
//! Resolving ──重定向──> push 新路径，重新解析
//!     └──渲染──> Loading-View ──> Rendered
//! ```
//!
//! 浏览器相关能力（History、挂载节点）通过 trait 注入，
//! 因此整个派发流程可以在原生环境下测试。

use std::cell::Cell;
use std::rc::Rc;

use academy_shared::Session;
use futures::FutureExt;
use futures::future::LocalBoxFuture;

use super::actions::{ActionEvent, ActionTable};
use super::loader::ViewLoader;
use super::route::{AppRoute, Layout, Resolution, View, resolve};
use crate::api::DataStore;
use crate::auth::{self, SessionContext};
use crate::components::regions::RegionView;

/// 一次派发中允许的最大重定向次数
pub const MAX_REDIRECTS: usize = 4;

/// 注销动作名（外壳上的全局动作，不随视图清除）
pub const LOGOUT_ACTION: &str = "logout";

// =========================================================
// 注入接口
// =========================================================

/// 浏览器历史记录
pub trait History {
    /// 获取当前路径
    fn current_path(&self) -> String;
    /// 推入新路径（不触发派发）
    fn push(&self, path: &str);
}

/// 视图挂载节点及外壳元素
pub trait Mount {
    /// 用片段替换挂载节点的全部内容
    fn render(&self, html: &str);
    /// 用视图模型填充对应的 `data-region` 区域，区域不存在时返回 false
    fn render_region(&self, view: RegionView) -> bool;
    /// 当前挂载内容中是否存在声明了该动作的元素
    fn has_action(&self, action: &str) -> bool;
    /// 显示或隐藏注销入口
    fn set_logout_visible(&self, visible: bool);
    fn set_layout(&self, layout: Layout);
    /// 阻塞式提示
    fn notify(&self, message: &str);
}

/// 视图初始化器：在片段注入后挂接行为并加载数据
#[async_trait::async_trait(?Send)]
pub trait ViewInitializer {
    async fn init(&self, cx: &ViewContext);
}

/// 视图到初始化器的映射函数
pub type InitializerMatcher = fn(View) -> Option<Box<dyn ViewInitializer>>;

/// 路由服务依赖的全部协作方
pub struct AppServices {
    pub history: Rc<dyn History>,
    pub mount: Rc<dyn Mount>,
    pub store: Rc<dyn DataStore>,
    pub sessions: SessionContext,
    pub loader: ViewLoader,
}

// =========================================================
// 导航代次
// =========================================================

/// 导航令牌
///
/// 每次派发获得一个单调递增的代次；更新的派发开始后，旧令牌失效，
/// 持有旧令牌的异步任务不得再写入挂载节点。
#[derive(Clone)]
pub struct NavToken {
    generation: u64,
    current: Rc<Cell<u64>>,
}

impl NavToken {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self) -> bool {
        self.current.get() == self.generation
    }
}

/// 派发结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// 视图已渲染并完成初始化
    Rendered(View),
    /// 片段返回或初始化完成前已有更新的导航开始，结果被丢弃
    Superseded,
    /// 重定向次数超过上限
    RedirectLoop,
}

/// 传给初始化器的上下文
pub struct ViewContext {
    pub router: Router,
    pub token: NavToken,
    pub session: Option<Session>,
}

impl ViewContext {
    pub fn mount(&self) -> &dyn Mount {
        self.router.mount()
    }
}

// =========================================================
// 路由服务
// =========================================================

struct RouterInner {
    services: AppServices,
    actions: ActionTable,
    generation: Rc<Cell<u64>>,
    initializers: InitializerMatcher,
}

/// 路由器服务
///
/// 可廉价克隆；所有克隆共享同一份状态。
#[derive(Clone)]
pub struct Router {
    inner: Rc<RouterInner>,
}

impl Router {
    pub fn new(services: AppServices, initializers: InitializerMatcher) -> Self {
        Self {
            inner: Rc::new(RouterInner {
                services,
                actions: ActionTable::new(),
                generation: Rc::new(Cell::new(0)),
                initializers,
            }),
        }
    }

    pub fn store(&self) -> &dyn DataStore {
        self.inner.services.store.as_ref()
    }

    pub fn mount(&self) -> &dyn Mount {
        self.inner.services.mount.as_ref()
    }

    pub fn sessions(&self) -> &SessionContext {
        &self.inner.services.sessions
    }

    /// 当前视图注册的动作处理器
    pub fn actions(&self) -> &ActionTable {
        &self.inner.actions
    }

    /// 最近一次派发的代次
    #[cfg(test)]
    pub fn generation(&self) -> u64 {
        self.inner.generation.get()
    }

    /// 开始新一代导航：旧令牌失效，旧视图的动作处理器被清除
    fn begin_navigation(&self) -> NavToken {
        let generation = self.inner.generation.get() + 1;
        self.inner.generation.set(generation);
        self.inner.actions.clear();
        NavToken {
            generation,
            current: self.inner.generation.clone(),
        }
    }

    /// **核心方法：按当前路径派发**
    ///
    /// 流程：解析 -> 守卫(可能重定向) -> 加载片段 -> 初始化 -> 外壳调整
    pub async fn dispatch(&self) -> DispatchOutcome {
        let token = self.begin_navigation();
        let services = &self.inner.services;

        let mut redirects = 0;
        let (route, view, session) = loop {
            let path = services.history.current_path();
            let route = AppRoute::from_path(&path);
            let session = services.sessions.current();

            match resolve(route, session.as_ref()) {
                Resolution::Render(view) => break (route, view, session),
                Resolution::Redirect(target) => {
                    if redirects >= MAX_REDIRECTS {
                        log_error!("[Router] 重定向次数过多，停止于 {}", route);
                        return DispatchOutcome::RedirectLoop;
                    }
                    redirects += 1;
                    log_info!("[Router] {} -> {} (redirect)", route, target);
                    services.history.push(target.to_path());
                }
            }
        };

        let html = services.loader.load(view.fragment()).await;
        if !token.is_current() {
            log_info!(
                "[Router] 丢弃过期的导航 #{} ({:?})",
                token.generation(),
                view
            );
            return DispatchOutcome::Superseded;
        }
        services.mount.render(&html);

        if let Some(initializer) = (self.inner.initializers)(view) {
            let cx = ViewContext {
                router: self.clone(),
                token: token.clone(),
                session: session.clone(),
            };
            initializer.init(&cx).await;
        }

        // 初始化期间可能已有更新的导航
        if !token.is_current() {
            log_info!(
                "[Router] 导航 #{} ({:?}) 在初始化期间被取代",
                token.generation(),
                view
            );
            return DispatchOutcome::Superseded;
        }
        services.mount.set_logout_visible(session.is_some());
        services.mount.set_layout(route.layout());

        log_info!(
            "[Router] 已渲染 {:?}，注册了 {} 个动作",
            view,
            self.inner.actions.len()
        );
        DispatchOutcome::Rendered(view)
    }

    /// 导航到指定路径：推入 History 后重新派发
    ///
    /// 所有初始化器都通过此入口导航，而不直接操作 History。
    pub fn navigate(&self, path: &str) -> LocalBoxFuture<'static, DispatchOutcome> {
        let router = self.clone();
        let path = path.to_string();
        async move {
            router.inner.services.history.push(&path);
            router.dispatch().await
        }
        .boxed_local()
    }

    /// 触发动作，返回是否找到处理器
    pub async fn trigger(&self, event: ActionEvent) -> bool {
        if event.action == LOGOUT_ACTION {
            self.logout().await;
            return true;
        }

        let Some(handler) = self.inner.actions.handler(&event.action) else {
            log_info!("[Router] 未注册的动作: {}", event.action);
            return false;
        };
        handler(event).await;
        true
    }

    /// 注销并回到登录页
    pub async fn logout(&self) {
        auth::logout(self.sessions());
        self.navigate(AppRoute::auth_failure_redirect().to_path())
            .await;
    }
}
