//! 视图片段加载器
//!
//! 按名称获取 HTML 片段。任何失败（网络错误或非 2xx）都会记录日志并
//! 改为加载未找到片段；未找到片段本身也失败时使用内置标记，
//! 保证一次派发结束后挂载节点不会为空。不做重试。

use std::rc::Rc;

use super::http::{HttpClient, HttpRequest};
use super::route::NOT_FOUND_FRAGMENT;
use crate::error::{AppError, AppResult};

/// 内置的未找到页面
pub const FALLBACK_NOT_FOUND_HTML: &str = r#"<section class="not-found"><h1>404</h1><p>Page not found</p><a href="/" data-link="true">Back to home</a></section>"#;

pub struct ViewLoader {
    base: String,
    client: Rc<dyn HttpClient>,
}

impl ViewLoader {
    pub fn new(base: impl Into<String>, client: Rc<dyn HttpClient>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        Self { base, client }
    }

    /// 片段的完整 URL
    pub fn url(&self, fragment: &str) -> String {
        format!("{}/{}", self.base, fragment.trim_start_matches('/'))
    }

    /// 加载片段，失败时降级为未找到页面
    pub async fn load(&self, fragment: &str) -> String {
        match self.fetch(fragment).await {
            Ok(html) => html,
            Err(e) => {
                log_error!("[ViewLoader] 加载片段失败: {}", e);
                if fragment == NOT_FOUND_FRAGMENT {
                    return FALLBACK_NOT_FOUND_HTML.to_string();
                }
                match self.fetch(NOT_FOUND_FRAGMENT).await {
                    Ok(html) => html,
                    Err(e) => {
                        log_error!("[ViewLoader] 加载未找到片段失败: {}", e);
                        FALLBACK_NOT_FOUND_HTML.to_string()
                    }
                }
            }
        }
    }

    async fn fetch(&self, fragment: &str) -> AppResult<String> {
        let url = self.url(fragment);
        let res = self
            .client
            .send(HttpRequest::get(url.as_str()))
            .await
            .map_err(|e| e.in_op_with("loader.fetch", fragment))?;

        if !res.ok() {
            return Err(AppError::http(res.status, format!("片段 {} 返回 {}", url, res.status))
                .in_op_with("loader.fetch", fragment));
        }
        if res.body.trim().is_empty() {
            return Err(AppError::http(res.status, format!("片段 {} 内容为空", url))
                .in_op_with("loader.fetch", fragment));
        }
        Ok(res.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::MockHttpClient;
    use academy_shared::HttpMethod;

    fn loader() -> (Rc<MockHttpClient>, ViewLoader) {
        let client = Rc::new(MockHttpClient::new());
        let loader = ViewLoader::new("/views/", client.clone());
        (client, loader)
    }

    #[tokio::test]
    async fn loads_requested_fragment() {
        let (client, loader) = loader();
        client.mock_response(HttpMethod::Get, "/views/login.html", 200, "<form></form>");
        assert_eq!(loader.load("login.html").await, "<form></form>");
    }

    #[tokio::test]
    async fn falls_back_to_not_found_fragment_on_error_status() {
        let (client, loader) = loader();
        client.mock_response(HttpMethod::Get, "/views/login.html", 500, "oops");
        client.mock_response(HttpMethod::Get, "/views/404.html", 200, "<h1>missing</h1>");

        assert_eq!(loader.load("login.html").await, "<h1>missing</h1>");
        let urls: Vec<String> = client.requests.borrow().iter().map(|r| r.url.clone()).collect();
        assert_eq!(urls, vec!["/views/login.html", "/views/404.html"]);
    }

    #[tokio::test]
    async fn uses_builtin_markup_when_everything_fails() {
        let (client, loader) = loader();
        assert_eq!(loader.load("register.html").await, FALLBACK_NOT_FOUND_HTML);
        // 原片段 + 未找到片段，各一次，不重试
        assert_eq!(client.requests.borrow().len(), 2);
    }

    #[tokio::test]
    async fn failing_not_found_fragment_is_not_requested_twice() {
        let (client, loader) = loader();
        assert_eq!(loader.load(NOT_FOUND_FRAGMENT).await, FALLBACK_NOT_FOUND_HTML);
        assert_eq!(client.requests.borrow().len(), 1);
    }
}
