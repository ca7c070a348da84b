//! 运行时配置
//!
//! 从 `index.html` 中的 `<meta name="academy:*">` 标签读取配置，
//! 读不到就使用默认值，实现部署配置与代码解耦。

use academy_shared::SESSION_STORAGE_KEY;
use wasm_bindgen::JsCast;

const DEFAULT_API_BASE: &str = "http://localhost:3000";
const DEFAULT_VIEWS_BASE: &str = "/views";
const DEFAULT_MOUNT_ID: &str = "app";

const META_API_BASE: &str = "academy:api-base";
const META_VIEWS_BASE: &str = "academy:views-base";
const META_MOUNT_ID: &str = "academy:mount-id";
const META_SESSION_KEY: &str = "academy:session-key";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// REST 数据存储地址
    pub api_base: String,
    /// HTML 片段目录
    pub views_base: String,
    /// 视图挂载节点的 id
    pub mount_id: String,
    /// 会话记录的存储键
    pub session_key: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl AppConfig {
    /// 通过查找函数构建配置，空值视为未配置
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str, default: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            api_base: read(META_API_BASE, DEFAULT_API_BASE)
                .trim_end_matches('/')
                .to_string(),
            views_base: read(META_VIEWS_BASE, DEFAULT_VIEWS_BASE)
                .trim_end_matches('/')
                .to_string(),
            mount_id: read(META_MOUNT_ID, DEFAULT_MOUNT_ID),
            session_key: read(META_SESSION_KEY, SESSION_STORAGE_KEY),
        }
    }

    /// 从当前文档的 meta 标签读取配置
    pub fn from_document() -> Self {
        Self::from_lookup(meta_content)
    }
}

fn meta_content(name: &str) -> Option<String> {
    let document = web_sys::window()?.document()?;
    let element = document
        .query_selector(&format!("meta[name=\"{}\"]", name))
        .ok()??;
    let meta = element.dyn_into::<web_sys::HtmlMetaElement>().ok()?;
    Some(meta.content())
}
