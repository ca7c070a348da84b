//! 测试用的替身实现
//!
//! 这些实现模拟浏览器与数据存储的行为边界：
//! - `MemoryHistory`: 内存中的历史栈
//! - `RecordingMount`: 记录片段与各区域的视图模型，按 `data-region` / `data-action` 属性模拟 DOM 查询
//! - `MemoryStore`: 内存中的 json-server，可以挂起课程列表请求
//! - `GatedHttpClient`: 可以挂起指定 URL 的 HTTP 客户端，用于构造乱序完成

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use academy_shared::{
    Course, CourseFields, HttpMethod, Id, Instructor, NewCourse, NewUser, Role, Session, User,
    UserQuery,
};
use futures::channel::oneshot;

use crate::api::DataStore;
use crate::auth::SessionContext;
use crate::components::admin_dashboard::{CourseForm, FORM_REGION, LIST_REGION};
use crate::components::regions::RegionView;
use crate::components::student_dashboard::{AVAILABLE_REGION, CatalogEntry, MINE_REGION};
use crate::error::{AppError, AppResult};
use crate::web::route::{Layout, View};
use crate::web::router::{AppServices, History, InitializerMatcher, Mount, Router};
use crate::web::{HttpClient, HttpRequest, HttpResponse, MemoryStorage, MockHttpClient, ViewLoader};

pub const VIEWS_BASE: &str = "/views";
pub const SESSION_KEY: &str = "test_session";

// =========================================================
// History
// =========================================================

pub struct MemoryHistory {
    stack: RefCell<Vec<String>>,
}

impl MemoryHistory {
    pub fn new(initial: &str) -> Self {
        Self {
            stack: RefCell::new(vec![initial.to_string()]),
        }
    }

    /// 全部历史条目（含初始路径）
    pub fn entries(&self) -> Vec<String> {
        self.stack.borrow().clone()
    }

    /// 模拟浏览器后退
    pub fn back(&self) {
        let mut stack = self.stack.borrow_mut();
        if stack.len() > 1 {
            stack.pop();
        }
    }
}

impl History for MemoryHistory {
    fn current_path(&self) -> String {
        self.stack.borrow().last().cloned().unwrap_or_else(|| "/".to_string())
    }

    fn push(&self, path: &str) {
        self.stack.borrow_mut().push(path.to_string());
    }
}

// =========================================================
// Mount
// =========================================================

#[derive(Default)]
pub struct RecordingMount {
    pub content: RefCell<String>,
    pub regions: RefCell<HashMap<&'static str, RegionView>>,
    /// 区域写入尝试次数（包括目标区域不存在的情况）
    pub region_writes: Cell<usize>,
    pub notices: RefCell<Vec<String>>,
    pub logout_visible: Cell<Option<bool>>,
    pub layout: Cell<Option<Layout>>,
    pub renders: Cell<usize>,
}

impl RecordingMount {
    pub fn region(&self, name: &str) -> Option<RegionView> {
        self.regions.borrow().get(name).cloned()
    }

    /// 管理面板列表区域中的课程
    pub fn listed_courses(&self) -> Vec<Course> {
        match self.region(LIST_REGION) {
            Some(RegionView::CourseList { courses, .. }) => courses,
            _ => Vec::new(),
        }
    }

    /// 表单区域的表单状态及讲师选项
    pub fn course_form(&self) -> Option<(CourseForm, Vec<Instructor>)> {
        match self.region(FORM_REGION) {
            Some(RegionView::CourseForm { form, instructors }) => Some((form, instructors)),
            _ => None,
        }
    }

    pub fn available(&self) -> Vec<CatalogEntry> {
        match self.region(AVAILABLE_REGION) {
            Some(RegionView::Available(entries)) => entries,
            _ => Vec::new(),
        }
    }

    pub fn mine(&self) -> Vec<Course> {
        match self.region(MINE_REGION) {
            Some(RegionView::Mine(courses)) => courses,
            _ => Vec::new(),
        }
    }

    pub fn last_notice(&self) -> Option<String> {
        self.notices.borrow().last().cloned()
    }
}

impl Mount for RecordingMount {
    fn render(&self, html: &str) {
        *self.content.borrow_mut() = html.to_string();
        self.regions.borrow_mut().clear();
        self.renders.set(self.renders.get() + 1);
    }

    fn render_region(&self, view: RegionView) -> bool {
        self.region_writes.set(self.region_writes.get() + 1);
        let region = view.region();
        let marker = format!("data-region=\"{}\"", region);
        if !self.content.borrow().contains(&marker) {
            return false;
        }
        self.regions.borrow_mut().insert(region, view);
        true
    }

    fn has_action(&self, action: &str) -> bool {
        let marker = format!("data-action=\"{}\"", action);
        self.content.borrow().contains(&marker)
    }

    fn set_logout_visible(&self, visible: bool) {
        self.logout_visible.set(Some(visible));
    }

    fn set_layout(&self, layout: Layout) {
        self.layout.set(Some(layout));
    }

    fn notify(&self, message: &str) {
        self.notices.borrow_mut().push(message.to_string());
    }
}

// =========================================================
// DataStore
// =========================================================

#[derive(Default)]
pub struct MemoryStore {
    users: RefCell<Vec<User>>,
    courses: RefCell<Vec<Course>>,
    instructors: RefCell<Vec<Instructor>>,
    next_id: Cell<Id>,
    offline: Cell<bool>,
    list_gate: RefCell<Option<oneshot::Receiver<()>>>,
    /// 操作日志，用于验证调用顺序
    pub log: RefCell<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let store = Self::default();
        store.next_id.set(100);
        store
    }

    /// 与 `db.json` 一致的初始数据
    pub fn seeded() -> Self {
        let store = Self::new();
        *store.users.borrow_mut() = vec![
            User {
                id: 1,
                email: "admin@academy.com".into(),
                password: "admin123".into(),
                role: Role::Administrator,
            },
            User {
                id: 2,
                email: "student@academy.com".into(),
                password: "student123".into(),
                role: Role::Student,
            },
        ];
        *store.instructors.borrow_mut() = vec![
            Instructor {
                id: 1,
                name: "Grace Hopper".into(),
            },
            Instructor {
                id: 2,
                name: "Alan Turing".into(),
            },
        ];
        *store.courses.borrow_mut() = vec![
            course(1, "Intro to Rust", 3, 1, vec![]),
            course(2, "Compilers", 2, 2, vec![5, 6]),
        ];
        store
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.set(offline);
    }

    /// 挂起下一次 `list_courses`，直到返回的 Sender 发送（或被丢弃）
    pub fn gate_list_courses(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.list_gate.borrow_mut() = Some(rx);
        tx
    }

    pub fn users(&self) -> Vec<User> {
        self.users.borrow().clone()
    }

    pub fn courses(&self) -> Vec<Course> {
        self.courses.borrow().clone()
    }

    pub fn insert_course(&self, course: Course) {
        self.courses.borrow_mut().push(course);
    }

    fn check(&self, op: &str) -> AppResult<()> {
        self.log.borrow_mut().push(op.to_string());
        if self.offline.get() {
            return Err(AppError::network("store offline").in_op(op.to_string()));
        }
        Ok(())
    }

    fn next_id(&self) -> Id {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    fn with_course<T>(&self, id: Id, op: &str, f: impl FnOnce(&mut Course) -> T) -> AppResult<T> {
        let mut courses = self.courses.borrow_mut();
        let course = courses
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::http(404, "course not found").in_op(op.to_string()))?;
        Ok(f(course))
    }
}

pub fn course(id: Id, title: &str, capacity: u32, instructor_id: Id, students: Vec<Id>) -> Course {
    Course {
        id,
        title: title.to_string(),
        description: format!("{} description", title),
        category: "Programming".to_string(),
        capacity,
        instructor_id,
        enrolled_students: students,
    }
}

#[async_trait::async_trait(?Send)]
impl DataStore for MemoryStore {
    async fn find_users(&self, query: &UserQuery) -> AppResult<Vec<User>> {
        self.check("find_users")?;
        Ok(self
            .users
            .borrow()
            .iter()
            .filter(|u| u.email == query.email)
            .filter(|u| query.password.as_ref().is_none_or(|p| &u.password == p))
            .cloned()
            .collect())
    }

    async fn create_user(&self, user: &NewUser) -> AppResult<User> {
        self.check("create_user")?;
        let user = User {
            id: self.next_id(),
            email: user.email.clone(),
            password: user.password.clone(),
            role: user.role,
        };
        self.users.borrow_mut().push(user.clone());
        Ok(user)
    }

    async fn list_courses(&self) -> AppResult<Vec<Course>> {
        self.check("list_courses")?;
        let gate = self.list_gate.borrow_mut().take();
        if let Some(rx) = gate {
            let _ = rx.await;
        }
        Ok(self.courses())
    }

    async fn get_course(&self, id: Id) -> AppResult<Course> {
        self.check("get_course")?;
        self.with_course(id, "get_course", |c| c.clone())
    }

    async fn create_course(&self, course: &NewCourse) -> AppResult<Course> {
        self.check("create_course")?;
        let created = Course {
            id: self.next_id(),
            title: course.title.clone(),
            description: course.description.clone(),
            category: course.category.clone(),
            capacity: course.capacity,
            instructor_id: course.instructor_id,
            enrolled_students: course.enrolled_students.clone(),
        };
        self.courses.borrow_mut().push(created.clone());
        Ok(created)
    }

    async fn update_course(&self, id: Id, fields: &CourseFields) -> AppResult<Course> {
        self.check("update_course")?;
        self.with_course(id, "update_course", |c| {
            c.title = fields.title.clone();
            c.description = fields.description.clone();
            c.category = fields.category.clone();
            c.capacity = fields.capacity;
            c.instructor_id = fields.instructor_id;
            c.clone()
        })
    }

    async fn set_enrollment(&self, id: Id, students: &[Id]) -> AppResult<Course> {
        self.check("set_enrollment")?;
        self.with_course(id, "set_enrollment", |c| {
            c.enrolled_students = students.to_vec();
            c.clone()
        })
    }

    async fn delete_course(&self, id: Id) -> AppResult<()> {
        self.check("delete_course")?;
        let mut courses = self.courses.borrow_mut();
        let before = courses.len();
        courses.retain(|c| c.id != id);
        if courses.len() == before {
            return Err(AppError::http(404, "course not found").in_op("delete_course"));
        }
        Ok(())
    }

    async fn list_instructors(&self) -> AppResult<Vec<Instructor>> {
        self.check("list_instructors")?;
        Ok(self.instructors.borrow().clone())
    }
}

// =========================================================
// HTTP
// =========================================================

/// 预置了全部真实视图片段的 HTTP 客户端
pub fn fragment_client() -> MockHttpClient {
    let client = MockHttpClient::new();
    let fragments = [
        ("home.html", include_str!("../views/home.html")),
        ("login.html", include_str!("../views/login.html")),
        ("register.html", include_str!("../views/register.html")),
        ("admin-dashboard.html", include_str!("../views/admin-dashboard.html")),
        ("student-dashboard.html", include_str!("../views/student-dashboard.html")),
        ("404.html", include_str!("../views/404.html")),
    ];
    for (name, html) in fragments {
        client.mock_response(HttpMethod::Get, &format!("{}/{}", VIEWS_BASE, name), 200, html);
    }
    client
}

/// 可以挂起指定 URL 的客户端
///
/// 被挂起的请求在对应的 `oneshot::Sender` 发送（或被丢弃）后才继续。
pub struct GatedHttpClient {
    inner: MockHttpClient,
    gates: RefCell<HashMap<String, oneshot::Receiver<()>>>,
}

impl GatedHttpClient {
    pub fn new(inner: MockHttpClient) -> Self {
        Self {
            inner,
            gates: RefCell::new(HashMap::new()),
        }
    }

    pub fn gate(&self, url: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.borrow_mut().insert(url.to_string(), rx);
        tx
    }
}

#[async_trait::async_trait(?Send)]
impl HttpClient for GatedHttpClient {
    async fn send(&self, req: HttpRequest) -> AppResult<HttpResponse> {
        let gate = self.gates.borrow_mut().remove(&req.url);
        if let Some(rx) = gate {
            let _ = rx.await;
        }
        self.inner.send(req).await
    }
}

// =========================================================
// 组装
// =========================================================

/// 完整组装的路由器及其替身协作方
pub struct TestApp {
    pub router: Router,
    pub history: Rc<MemoryHistory>,
    pub mount: Rc<RecordingMount>,
    pub store: Rc<MemoryStore>,
    pub sessions: SessionContext,
}

impl TestApp {
    pub fn new(path: &str) -> Self {
        Self::build(path, MemoryStore::seeded(), Rc::new(fragment_client()), crate::view_initializer)
    }

    pub fn build(
        path: &str,
        store: MemoryStore,
        client: Rc<dyn HttpClient>,
        initializers: InitializerMatcher,
    ) -> Self {
        let history = Rc::new(MemoryHistory::new(path));
        let mount = Rc::new(RecordingMount::default());
        let store = Rc::new(store);
        let sessions = SessionContext::new(Rc::new(MemoryStorage::new()), SESSION_KEY);

        let router = Router::new(
            AppServices {
                history: history.clone(),
                mount: mount.clone(),
                store: store.clone(),
                sessions: sessions.clone(),
                loader: ViewLoader::new(VIEWS_BASE, client),
            },
            initializers,
        );

        Self {
            router,
            history,
            mount,
            store,
            sessions,
        }
    }

    pub fn login_as(self, id: Id, role: Role) -> Self {
        let email = match role {
            Role::Administrator => "admin@academy.com",
            Role::Student => "student@academy.com",
        };
        self.sessions
            .begin(&Session {
                id,
                email: email.to_string(),
                role,
            })
            .unwrap();
        self
    }

    pub fn path(&self) -> String {
        self.history.current_path()
    }

    pub fn rendered(&self) -> String {
        self.mount.content.borrow().clone()
    }
}

/// 没有任何初始化器的映射，用于只关注派发本身的测试
pub fn no_initializers(_: View) -> Option<Box<dyn crate::web::router::ViewInitializer>> {
    None
}
