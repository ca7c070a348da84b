//! 键值存储封装模块
//!
//! `KeyValueStore` 抽象出浏览器持久化存储，便于注入与测试。
//! `LocalStorage` 使用 `web_sys::Storage`；`MemoryStorage` 在 LocalStorage
//! 不可用时（如隐私模式）作为进程内替代。

use std::cell::RefCell;
use std::collections::HashMap;

/// 同步键值存储接口
pub trait KeyValueStore {
    /// 获取存储的字符串值
    ///
    /// # 返回
    /// - `Some(String)` 如果键存在且有值
    /// - `None` 如果键不存在或发生错误
    fn get(&self, key: &str) -> Option<String>;

    /// 设置存储值，返回操作是否成功
    fn set(&self, key: &str, value: &str) -> bool;

    /// 删除存储的键值对，返回操作是否成功
    fn delete(&self, key: &str) -> bool;
}

/// 浏览器 LocalStorage
pub struct LocalStorage;

impl LocalStorage {
    /// 获取 LocalStorage 实例
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }

    /// 当前环境是否提供 LocalStorage
    pub fn is_available() -> bool {
        Self::storage().is_some()
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> bool {
        Self::storage()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }

    fn delete(&self, key: &str) -> bool {
        Self::storage()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }
}

/// 进程内存储
#[derive(Default)]
pub struct MemoryStorage {
    map: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.map.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        self.map
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        true
    }

    fn delete(&self, key: &str) -> bool {
        self.map.borrow_mut().remove(key);
        true
    }
}
