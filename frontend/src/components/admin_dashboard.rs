//! 管理员课程管理面板
//!
//! 并发加载课程与讲师，渲染课程卡片与课程表单。
//! 新建、更新、删除成功后都会重新获取并整体重绘面板，不做增量更新。

mod form_state;

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use academy_shared::{Id, Instructor, NewCourse};

pub use form_state::{CourseForm, FormMode};

use super::regions::RegionView;
use crate::web::actions::ActionEvent;
use crate::web::router::{NavToken, Router, ViewContext, ViewInitializer};

pub const SUBMIT_ACTION: &str = "course-submit";
pub const EDIT_ACTION: &str = "course-edit";
pub const DELETE_ACTION: &str = "course-delete";
pub const CANCEL_ACTION: &str = "course-cancel";

pub const FORM_REGION: &str = "course-form";
pub const LIST_REGION: &str = "course-list";

/// 视图内状态：每次导航到面板时重新创建
#[derive(Default)]
struct DashboardState {
    form: CourseForm,
    instructors: Vec<Instructor>,
}

pub struct AdminDashboardPage;

#[async_trait::async_trait(?Send)]
impl ViewInitializer for AdminDashboardPage {
    async fn init(&self, cx: &ViewContext) {
        let dashboard = AdminDashboard {
            router: cx.router.clone(),
            token: cx.token.clone(),
            state: Rc::new(RefCell::new(DashboardState::default())),
        };
        dashboard.bind();
        dashboard.refresh().await;
    }
}

#[derive(Clone)]
struct AdminDashboard {
    router: Router,
    token: NavToken,
    state: Rc<RefCell<DashboardState>>,
}

impl AdminDashboard {
    fn bind(&self) {
        self.on(SUBMIT_ACTION, |d, event| async move { d.submit(&event).await });
        self.on(EDIT_ACTION, |d, event| async move {
            if let Some(id) = event.target_id() {
                d.edit(id).await;
            }
        });
        self.on(DELETE_ACTION, |d, event| async move {
            if let Some(id) = event.target_id() {
                d.delete(id).await;
            }
        });
        self.on(CANCEL_ACTION, |d, _| async move { d.cancel() });
    }

    fn on<F, Fut>(&self, action: &str, f: F)
    where
        F: Fn(AdminDashboard, ActionEvent) -> Fut + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        let this = self.clone();
        self.router
            .actions()
            .register(action, move |event| f(this.clone(), event));
    }

    /// 重新获取课程与讲师并重绘整个面板
    async fn refresh(&self) {
        let store = self.router.store();
        let (courses, instructors) =
            futures::join!(store.list_courses(), store.list_instructors());

        let courses = courses.unwrap_or_else(|e| {
            log_error!("[AdminDashboard] 加载课程失败: {}", e);
            Vec::new()
        });
        let instructors = instructors.unwrap_or_else(|e| {
            log_error!("[AdminDashboard] 加载讲师失败: {}", e);
            Vec::new()
        });

        if !self.token.is_current() {
            return;
        }

        self.state.borrow_mut().instructors = instructors.clone();
        self.router.mount().render_region(RegionView::CourseList {
            courses,
            instructors,
        });
        self.render_form();
    }

    fn render_form(&self) {
        let view = {
            let state = self.state.borrow();
            RegionView::CourseForm {
                form: state.form.clone(),
                instructors: state.instructors.clone(),
            }
        };
        self.router.mount().render_region(view);
    }

    /// 按表单模式新建或更新课程
    async fn submit(&self, event: &ActionEvent) {
        let mode = self.state.borrow().form.mode;
        let form = CourseForm::from_event(mode, event);
        let fields = match form.to_fields() {
            Ok(fields) => fields,
            Err(e) => {
                self.router.mount().notify(e.message());
                return;
            }
        };

        let store = self.router.store();
        let result = match mode {
            FormMode::Creating => store.create_course(&NewCourse::from(fields)).await,
            FormMode::Editing(id) => store.update_course(id, &fields).await,
        };

        match result {
            Ok(course) => {
                log_info!("[AdminDashboard] 课程已保存: #{} {}", course.id, course.title);
                self.state.borrow_mut().form.reset();
                self.refresh().await;
            }
            Err(e) => {
                log_error!("[AdminDashboard] 保存课程失败: {}", e);
                self.state.borrow_mut().form = form;
                self.router
                    .mount()
                    .notify("Could not save the course. Please try again.");
            }
        }
    }

    /// 用重新获取的课程数据（而不是页面上已渲染的值）填充表单
    async fn edit(&self, id: Id) {
        let courses = match self.router.store().list_courses().await {
            Ok(courses) => courses,
            Err(e) => {
                log_error!("[AdminDashboard] 加载课程失败: {}", e);
                self.router.mount().notify("Could not load the course.");
                return;
            }
        };

        let Some(course) = courses.iter().find(|c| c.id == id) else {
            self.router.mount().notify("This course no longer exists.");
            return;
        };

        if !self.token.is_current() {
            return;
        }
        self.state.borrow_mut().form = CourseForm::editing(course);
        self.render_form();
    }

    fn cancel(&self) {
        self.state.borrow_mut().form.reset();
        self.render_form();
    }

    async fn delete(&self, id: Id) {
        match self.router.store().delete_course(id).await {
            Ok(()) => {
                log_info!("[AdminDashboard] 课程 #{} 已删除", id);
                let mut state = self.state.borrow_mut();
                if state.form.mode == FormMode::Editing(id) {
                    state.form.reset();
                }
                drop(state);
                self.refresh().await;
            }
            Err(e) => {
                log_error!("[AdminDashboard] 删除课程失败: {}", e);
                self.router
                    .mount()
                    .notify("Could not delete the course. Please try again.");
            }
        }
    }
}
