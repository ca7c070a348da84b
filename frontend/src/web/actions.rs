//! 动作处理表
//!
//! 视图片段中的可交互元素通过 `data-action` 声明动作名，
//! 浏览器层把点击与表单提交转换成 `ActionEvent`，再由路由服务
//! 在当前视图注册的 `ActionTable` 中查找处理器。

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::rc::Rc;

use academy_shared::Id;
use futures::FutureExt;
use futures::future::LocalBoxFuture;

/// 一次用户动作：动作名、目标 ID（`data-id`）以及表单字段
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionEvent {
    pub action: String,
    pub target: Option<String>,
    pub fields: BTreeMap<String, String>,
}

impl ActionEvent {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            ..Default::default()
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// 读取表单字段，缺失时返回空字符串
    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }

    /// 将 `data-id` 解析为实体 ID
    pub fn target_id(&self) -> Option<Id> {
        self.target.as_deref()?.trim().parse().ok()
    }
}

pub type ActionHandler = Rc<dyn Fn(ActionEvent) -> LocalBoxFuture<'static, ()>>;

/// 按动作名索引的处理器注册表
#[derive(Default)]
pub struct ActionTable {
    handlers: RefCell<HashMap<String, ActionHandler>>,
}

impl ActionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册处理器；同名动作会被覆盖
    pub fn register<F, Fut>(&self, action: &str, f: F)
    where
        F: Fn(ActionEvent) -> Fut + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        let handler: ActionHandler = Rc::new(move |event| f(event).boxed_local());
        self.handlers
            .borrow_mut()
            .insert(action.to_string(), handler);
    }

    /// 取出处理器的克隆，调用方可以在不持有借用的情况下 await
    pub fn handler(&self, action: &str) -> Option<ActionHandler> {
        self.handlers.borrow().get(action).cloned()
    }

    #[cfg(test)]
    pub fn contains(&self, action: &str) -> bool {
        self.handlers.borrow().contains_key(action)
    }

    pub fn clear(&self) {
        self.handlers.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.handlers.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn target_id_parses_data_id() {
        let ev = ActionEvent::new("enroll").with_target(" 42 ");
        assert_eq!(ev.target_id(), Some(42));
        assert_eq!(ActionEvent::new("enroll").with_target("abc").target_id(), None);
        assert_eq!(ActionEvent::new("enroll").target_id(), None);
    }

    #[test]
    fn missing_fields_read_as_empty() {
        let ev = ActionEvent::new("login").with_field("email", "a@b.c");
        assert_eq!(ev.field("email"), "a@b.c");
        assert_eq!(ev.field("password"), "");
    }

    #[tokio::test]
    async fn registered_handler_receives_event() {
        let table = ActionTable::new();
        let seen = Rc::new(Cell::new(0));
        let sink = seen.clone();
        table.register("course-delete", move |event: ActionEvent| {
            let sink = sink.clone();
            async move {
                sink.set(event.target_id().unwrap_or_default());
            }
        });

        let handler = table.handler("course-delete").unwrap();
        handler(ActionEvent::new("course-delete").with_target("7")).await;
        assert_eq!(seen.get(), 7);

        table.clear();
        assert_eq!(table.len(), 0);
        assert!(table.handler("course-delete").is_none());
    }
}
