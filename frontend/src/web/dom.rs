//! 浏览器端实现
//!
//! 所有对 window.history、挂载节点和 DOM 事件的操作都集中在此模块，
//! 路由服务只通过 `History` / `Mount` 接口看到它们。

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Element, HtmlElement, HtmlFormElement, HtmlInputElement, HtmlSelectElement,
    HtmlTextAreaElement,
};

use super::actions::ActionEvent;
use super::route::Layout;
use super::router::{History, Mount, Router};
use crate::components::regions::RegionView;

// =========================================================
// History
// =========================================================

/// 基于 window.history 的历史记录
pub struct BrowserHistory;

impl History for BrowserHistory {
    fn current_path(&self) -> String {
        web_sys::window()
            .and_then(|w| w.location().pathname().ok())
            .unwrap_or_else(|| "/".to_string())
    }

    fn push(&self, path: &str) {
        // 同一路径不重复入栈
        if self.current_path() == path {
            return;
        }
        if let Some(window) = web_sys::window() {
            if let Ok(history) = window.history() {
                let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
            }
        }
    }
}

// =========================================================
// Mount
// =========================================================

/// 挂载节点：`id` 为 `mount_id` 的元素
///
/// 外壳上的注销入口与布局类通过信号驱动。
/// 每个区域中的 Leptos 视图各持有一个卸载句柄，句柄被丢弃时视图随之卸载。
pub struct DomMount {
    mount_id: String,
    logout_visible: RwSignal<bool>,
    layout: RwSignal<Layout>,
    regions: RefCell<HashMap<&'static str, Box<dyn Any>>>,
}

impl DomMount {
    pub fn new(mount_id: &str, logout_visible: RwSignal<bool>, layout: RwSignal<Layout>) -> Self {
        Self {
            mount_id: mount_id.to_string(),
            logout_visible,
            layout,
            regions: RefCell::new(HashMap::new()),
        }
    }

    fn root(&self) -> Option<Element> {
        web_sys::window()?
            .document()?
            .get_element_by_id(&self.mount_id)
    }

    fn find(&self, selector: &str) -> Option<Element> {
        self.root()?.query_selector(selector).ok()?
    }
}

impl Mount for DomMount {
    fn render(&self, html: &str) {
        // 先卸载上一个视图的区域
        self.regions.borrow_mut().clear();
        match self.root() {
            Some(root) => root.set_inner_html(html),
            None => log_error!("[Mount] 未找到挂载节点 #{}", self.mount_id),
        }
    }

    fn render_region(&self, view: RegionView) -> bool {
        let region = view.region();
        let Some(element) = self
            .find(&format!("[data-region=\"{}\"]", region))
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        else {
            return false;
        };

        self.regions.borrow_mut().remove(region);
        element.set_inner_html("");
        let handle = leptos::mount::mount_to(element, move || view.into_view());
        self.regions.borrow_mut().insert(region, Box::new(handle));
        true
    }

    fn has_action(&self, action: &str) -> bool {
        self.find(&format!("[data-action=\"{}\"]", action)).is_some()
    }

    fn set_logout_visible(&self, visible: bool) {
        self.logout_visible.set(visible);
    }

    fn set_layout(&self, layout: Layout) {
        self.layout.set(layout);
    }

    fn notify(&self, message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }
}

// =========================================================
// 事件委托
// =========================================================

fn event_element(event: &web_sys::Event) -> Option<Element> {
    event.target()?.dyn_into::<Element>().ok()
}

/// 站内链接点击：返回目标路径并阻止整页跳转
///
/// 带修饰键或非左键的点击交给浏览器处理（如新标签页打开）。
pub fn link_from_click(event: &web_sys::MouseEvent) -> Option<String> {
    if event.default_prevented()
        || event.button() != 0
        || event.ctrl_key()
        || event.meta_key()
        || event.shift_key()
        || event.alt_key()
    {
        return None;
    }

    let link = event_element(event)?.closest("a[data-link]").ok()??;
    let href = link.get_attribute("href")?;
    event.prevent_default();
    Some(href)
}

/// `[data-action]` 元素上的点击
///
/// 最近的动作元素是表单时忽略，表单动作由 submit 事件触发。
pub fn action_from_click(event: &web_sys::MouseEvent) -> Option<ActionEvent> {
    let element = event_element(event)?.closest("[data-action]").ok()??;
    if element.tag_name().eq_ignore_ascii_case("form") || element.has_attribute("disabled") {
        return None;
    }

    let mut action = ActionEvent::new(element.get_attribute("data-action")?);
    if let Some(id) = element.get_attribute("data-id") {
        action = action.with_target(id);
    }
    event.prevent_default();
    Some(action)
}

/// `form[data-action]` 的提交，读取所有具名控件的值
pub fn action_from_submit(event: &web_sys::SubmitEvent) -> Option<ActionEvent> {
    let form = event.target()?.dyn_into::<HtmlFormElement>().ok()?;
    let name = form.get_attribute("data-action")?;
    event.prevent_default();

    let mut action = ActionEvent::new(name);
    let controls = form
        .query_selector_all("input[name], select[name], textarea[name]")
        .ok()?;
    for i in 0..controls.length() {
        if let Some((field, value)) = controls.item(i).and_then(|node| control_value(&node)) {
            action = action.with_field(field, value);
        }
    }
    Some(action)
}

fn control_value(node: &web_sys::Node) -> Option<(String, String)> {
    if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
        let kind = input.type_();
        if (kind == "checkbox" || kind == "radio") && !input.checked() {
            return None;
        }
        return Some((input.name(), input.value()));
    }
    if let Some(select) = node.dyn_ref::<HtmlSelectElement>() {
        return Some((select.name(), select.value()));
    }
    let area = node.dyn_ref::<HtmlTextAreaElement>()?;
    Some((area.name(), area.value()))
}

/// 浏览器后退/前进时重新派发
pub fn install_popstate(router: Router) {
    let closure = Closure::<dyn Fn()>::new(move || {
        let router = router.clone();
        leptos::task::spawn_local(async move {
            router.dispatch().await;
        });
    });

    if let Some(window) = web_sys::window() {
        let _ = window.add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
    }

    // 泄漏闭包以保持监听器存活
    closure.forget();
}
