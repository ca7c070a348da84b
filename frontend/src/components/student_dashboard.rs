//! 学生选课面板
//!
//! 每次渲染只获取一次课程列表，在客户端划分为"全部课程"与"我的课程"。

use std::rc::Rc;

use academy_shared::{Course, EnrollmentStatus, Id};

use super::regions::RegionView;
use crate::web::router::{NavToken, Router, ViewContext, ViewInitializer};

pub const ENROLL_ACTION: &str = "enroll";
pub const UNENROLL_ACTION: &str = "unenroll";

pub const AVAILABLE_REGION: &str = "available-courses";
pub const MINE_REGION: &str = "my-courses";

/// 全部课程中的一项及当前学生的选课状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub course: Course,
    pub status: EnrollmentStatus,
}

/// 学生面板的视图模型
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentCatalog {
    pub available: Vec<CatalogEntry>,
    pub mine: Vec<Course>,
}

impl StudentCatalog {
    pub fn build(courses: Vec<Course>, student: Id) -> Self {
        let mine = courses
            .iter()
            .filter(|c| c.is_enrolled(student))
            .cloned()
            .collect();
        let available = courses
            .into_iter()
            .map(|course| CatalogEntry {
                status: course.enrollment_status(student),
                course,
            })
            .collect();
        Self { available, mine }
    }
}

pub struct StudentDashboardPage;

#[async_trait::async_trait(?Send)]
impl ViewInitializer for StudentDashboardPage {
    async fn init(&self, cx: &ViewContext) {
        let Some(session) = cx.session.as_ref() else {
            log_error!("[StudentDashboard] 缺少会话，跳过初始化");
            return;
        };

        let dashboard = Rc::new(StudentDashboard {
            router: cx.router.clone(),
            token: cx.token.clone(),
            student: session.id,
        });

        let d = dashboard.clone();
        cx.router.actions().register(ENROLL_ACTION, move |event| {
            let d = d.clone();
            async move {
                if let Some(id) = event.target_id() {
                    d.enroll(id).await;
                }
            }
        });
        let d = dashboard.clone();
        cx.router.actions().register(UNENROLL_ACTION, move |event| {
            let d = d.clone();
            async move {
                if let Some(id) = event.target_id() {
                    d.unenroll(id).await;
                }
            }
        });

        dashboard.refresh().await;
    }
}

struct StudentDashboard {
    router: Router,
    token: NavToken,
    student: Id,
}

impl StudentDashboard {
    async fn refresh(&self) {
        let courses = self.router.store().list_courses().await.unwrap_or_else(|e| {
            log_error!("[StudentDashboard] 加载课程失败: {}", e);
            Vec::new()
        });
        if !self.token.is_current() {
            return;
        }

        let StudentCatalog { available, mine } = StudentCatalog::build(courses, self.student);
        let mount = self.router.mount();
        mount.render_region(RegionView::Available(available));
        mount.render_region(RegionView::Mine(mine));
    }

    /// 读取最新名单，追加当前学生后整体写回
    ///
    /// 两个会话同时选课时，后写入者会覆盖先写入者，名额也可能被突破。
    async fn enroll(&self, id: Id) {
        let store = self.router.store();
        let course = match store.get_course(id).await {
            Ok(course) => course,
            Err(e) => {
                log_error!("[StudentDashboard] 获取课程 #{} 失败: {}", id, e);
                self.router.mount().notify("Could not load the course. Please try again.");
                return;
            }
        };

        match course.enrollment_status(self.student) {
            EnrollmentStatus::Full => {
                self.router.mount().notify("This course is full");
                return;
            }
            EnrollmentStatus::Enrolled => {
                log_info!("[StudentDashboard] 已在课程 #{} 中", id);
            }
            EnrollmentStatus::Open => {
                if let Err(e) = store
                    .set_enrollment(id, &course.students_with(self.student))
                    .await
                {
                    log_error!("[StudentDashboard] 选课失败: {}", e);
                    self.router.mount().notify("Enrollment failed. Please try again.");
                    return;
                }
                log_info!("[StudentDashboard] 学生 #{} 选修课程 #{}", self.student, id);
            }
        }

        self.refresh().await;
    }

    async fn unenroll(&self, id: Id) {
        let store = self.router.store();
        let course = match store.get_course(id).await {
            Ok(course) => course,
            Err(e) => {
                log_error!("[StudentDashboard] 获取课程 #{} 失败: {}", id, e);
                self.router.mount().notify("Could not load the course. Please try again.");
                return;
            }
        };

        if course.is_enrolled(self.student) {
            if let Err(e) = store
                .set_enrollment(id, &course.students_without(self.student))
                .await
            {
                log_error!("[StudentDashboard] 退课失败: {}", e);
                self.router.mount().notify("Could not drop the course. Please try again.");
                return;
            }
            log_info!("[StudentDashboard] 学生 #{} 退出课程 #{}", self.student, id);
        }

        self.refresh().await;
    }
}
