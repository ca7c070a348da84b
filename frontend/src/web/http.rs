//! HTTP 请求封装模块
//!
//! `HttpClient` 是与具体 HTTP 实现解耦的抽象：浏览器中使用 `FetchClient`
//! （`web_sys::fetch`），测试中使用 `MockHttpClient`。

use academy_shared::HttpMethod;
use serde::{Serialize, de::DeserializeOwned};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

use crate::error::{AppError, AppResult};

// =========================================================
// 核心抽象层
// =========================================================

/// 通用 HTTP 请求结构
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(url: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            url: url.into(),
            method,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(url, HttpMethod::Get)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(url, HttpMethod::Post)
    }

    pub fn patch(url: impl Into<String>) -> Self {
        Self::new(url, HttpMethod::Patch)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(url, HttpMethod::Delete)
    }

    /// 添加请求头
    pub fn header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    /// 设置 JSON 请求体
    pub fn json<T: Serialize>(self, value: &T) -> AppResult<Self> {
        let body = serde_json::to_string(value)?;
        let mut req = self.header("Content-Type", "application/json");
        req.body = Some(body);
        Ok(req)
    }
}

/// 通用 HTTP 响应结构
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// 检查响应是否成功 (2xx)
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> AppResult<T> {
        serde_json::from_str(&self.body).map_err(AppError::from)
    }
}

/// HTTP 客户端特性
/// (?Send) 是因为浏览器中的 JsValue 等类型不是 Send 的
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> AppResult<HttpResponse>;
}

// =========================================================
// 实现层: 浏览器 fetch 客户端
// =========================================================

#[derive(Clone, Copy, Default)]
pub struct FetchClient;

#[async_trait::async_trait(?Send)]
impl HttpClient for FetchClient {
    async fn send(&self, req: HttpRequest) -> AppResult<HttpResponse> {
        let headers = Headers::new()
            .map_err(|e| AppError::network(format!("创建 Headers 失败: {:?}", e)))?;

        for (key, value) in &req.headers {
            headers
                .set(key, value)
                .map_err(|e| AppError::network(format!("设置 Header 失败: {:?}", e)))?;
        }

        let opts = RequestInit::new();
        opts.set_method(req.method.as_str());
        opts.set_headers(&headers.into());

        if let Some(body) = &req.body {
            opts.set_body(&JsValue::from_str(body));
        }

        let request = Request::new_with_str_and_init(&req.url, &opts)
            .map_err(|e| AppError::network(format!("{:?}", e)).in_op_with("fetch", &req.url))?;

        let window =
            web_sys::window().ok_or_else(|| AppError::network("无法获取 window 对象"))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| AppError::network(format!("{:?}", e)).in_op_with("fetch", &req.url))?;

        let response: Response = resp_value.dyn_into().map_err(|e| {
            AppError::network(format!("Response 类型转换失败: {:?}", e))
        })?;

        let text_promise = response
            .text()
            .map_err(|e| AppError::network(format!("{:?}", e)))?;
        let text = JsFuture::from(text_promise)
            .await
            .map_err(|e| AppError::network(format!("{:?}", e)).in_op_with("fetch", &req.url))?;

        Ok(HttpResponse {
            status: response.status(),
            body: text.as_string().unwrap_or_default(),
        })
    }
}

// =========================================================
// 测试环境实现 (MockHttpClient)
// =========================================================

#[cfg(test)]
#[derive(Default)]
pub struct MockHttpClient {
    responses: std::cell::RefCell<std::collections::HashMap<(HttpMethod, String), HttpResponse>>,
    pub requests: std::cell::RefCell<Vec<HttpRequest>>,
}

#[cfg(test)]
impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mock_response(&self, method: HttpMethod, url: &str, status: u16, body: impl Into<String>) {
        self.responses.borrow_mut().insert(
            (method, url.to_string()),
            HttpResponse {
                status,
                body: body.into(),
            },
        );
    }

    pub fn mock_json(&self, method: HttpMethod, url: &str, status: u16, body: serde_json::Value) {
        self.mock_response(method, url, status, body.to_string());
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> AppResult<HttpResponse> {
        self.requests.borrow_mut().push(req.clone());
        self.responses
            .borrow()
            .get(&(req.method, req.url.clone()))
            .cloned()
            .ok_or_else(|| AppError::network("connection refused").in_op_with("fetch", &req.url))
    }
}
