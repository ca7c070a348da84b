//! 数据存储协作方
//!
//! `DataStore` 描述视图所需的 CRUD 操作；`RestStore` 通过注入的
//! `HttpClient` 访问 json-server 风格的 REST 接口。

use std::rc::Rc;

use academy_shared::{
    Collection, Course, CourseFields, EnrollmentPatch, Id, Instructor, NewCourse, NewUser, User,
    UserQuery,
};
use serde::de::DeserializeOwned;

use crate::error::{AppError, AppResult};
use crate::web::{HttpClient, HttpRequest};

#[async_trait::async_trait(?Send)]
pub trait DataStore {
    /// 按过滤条件查询用户
    async fn find_users(&self, query: &UserQuery) -> AppResult<Vec<User>>;
    async fn create_user(&self, user: &NewUser) -> AppResult<User>;

    async fn list_courses(&self) -> AppResult<Vec<Course>>;
    async fn get_course(&self, id: Id) -> AppResult<Course>;
    async fn create_course(&self, course: &NewCourse) -> AppResult<Course>;
    /// 部分替换课程的可编辑字段
    async fn update_course(&self, id: Id, fields: &CourseFields) -> AppResult<Course>;
    /// 整体替换选课名单（非原子的读-改-写的最后一步）
    async fn set_enrollment(&self, id: Id, students: &[Id]) -> AppResult<Course>;
    async fn delete_course(&self, id: Id) -> AppResult<()>;

    async fn list_instructors(&self) -> AppResult<Vec<Instructor>>;
}

// =========================================================
// REST 实现
// =========================================================

pub struct RestStore {
    base_url: String,
    client: Rc<dyn HttpClient>,
}

impl RestStore {
    pub fn new(base_url: impl Into<String>, client: Rc<dyn HttpClient>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// 发送请求，校验状态码并解析 JSON 响应
    async fn execute<T: DeserializeOwned>(&self, req: HttpRequest, op: &str) -> AppResult<T> {
        let res = self.send_checked(req, op).await?;
        res.json::<T>().map_err(|e| e.in_op(op.to_string()))
    }

    async fn send_checked(&self, req: HttpRequest, op: &str) -> AppResult<crate::web::HttpResponse> {
        let label = format!("{} {}", req.method.as_str(), req.url);
        let res = self
            .client
            .send(req)
            .await
            .map_err(|e| e.in_op(op.to_string()))?;

        if !res.ok() {
            return Err(AppError::http(res.status, format!("请求失败: {}", res.status))
                .in_op_with(op.to_string(), label));
        }
        Ok(res)
    }
}

#[async_trait::async_trait(?Send)]
impl DataStore for RestStore {
    async fn find_users(&self, query: &UserQuery) -> AppResult<Vec<User>> {
        let qs = serde_urlencoded::to_string(query)?;
        let url = format!("{}?{}", self.url(Collection::Users.path()), qs);
        self.execute(HttpRequest::get(url), "store.find_users").await
    }

    async fn create_user(&self, user: &NewUser) -> AppResult<User> {
        let req = HttpRequest::post(self.url(Collection::Users.path())).json(user)?;
        self.execute(req, "store.create_user").await
    }

    async fn list_courses(&self) -> AppResult<Vec<Course>> {
        let req = HttpRequest::get(self.url(Collection::Courses.path()));
        self.execute(req, "store.list_courses").await
    }

    async fn get_course(&self, id: Id) -> AppResult<Course> {
        let req = HttpRequest::get(self.url(&Collection::Courses.item_path(id)));
        self.execute(req, "store.get_course").await
    }

    async fn create_course(&self, course: &NewCourse) -> AppResult<Course> {
        let req = HttpRequest::post(self.url(Collection::Courses.path())).json(course)?;
        self.execute(req, "store.create_course").await
    }

    async fn update_course(&self, id: Id, fields: &CourseFields) -> AppResult<Course> {
        let req = HttpRequest::patch(self.url(&Collection::Courses.item_path(id))).json(fields)?;
        self.execute(req, "store.update_course").await
    }

    async fn set_enrollment(&self, id: Id, students: &[Id]) -> AppResult<Course> {
        let patch = EnrollmentPatch {
            enrolled_students: students.to_vec(),
        };
        let req = HttpRequest::patch(self.url(&Collection::Courses.item_path(id))).json(&patch)?;
        self.execute(req, "store.set_enrollment").await
    }

    async fn delete_course(&self, id: Id) -> AppResult<()> {
        let req = HttpRequest::delete(self.url(&Collection::Courses.item_path(id)));
        self.send_checked(req, "store.delete_course").await?;
        Ok(())
    }

    async fn list_instructors(&self) -> AppResult<Vec<Instructor>> {
        let req = HttpRequest::get(self.url(Collection::Instructors.path()));
        self.execute(req, "store.list_instructors").await
    }
}
