//! 面板区域的视图模型与渲染组件
//!
//! 初始化器只产出 `RegionView`，由 `Mount` 决定如何呈现：
//! 浏览器中挂载为 Leptos 组件，测试中直接记录模型。
//! 动作元素保留 `data-action` / `data-id` 属性，由外壳统一委托。

use academy_shared::{Course, Id, Instructor};
use leptos::prelude::*;

use super::admin_dashboard::{
    CANCEL_ACTION, CourseForm, DELETE_ACTION, EDIT_ACTION, FORM_REGION, LIST_REGION,
    SUBMIT_ACTION,
};
use super::student_dashboard::{
    AVAILABLE_REGION, CatalogEntry, ENROLL_ACTION, MINE_REGION, UNENROLL_ACTION,
};

/// 一个区域的完整内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionView {
    /// 管理面板的课程卡片
    CourseList {
        courses: Vec<Course>,
        instructors: Vec<Instructor>,
    },
    /// 新建/编辑课程表单
    CourseForm {
        form: CourseForm,
        instructors: Vec<Instructor>,
    },
    /// 学生面板：全部课程及选课状态
    Available(Vec<CatalogEntry>),
    /// 学生面板：已选课程
    Mine(Vec<Course>),
}

impl RegionView {
    /// 目标区域的 `data-region` 名称
    pub fn region(&self) -> &'static str {
        match self {
            RegionView::CourseList { .. } => LIST_REGION,
            RegionView::CourseForm { .. } => FORM_REGION,
            RegionView::Available(_) => AVAILABLE_REGION,
            RegionView::Mine(_) => MINE_REGION,
        }
    }

    pub fn into_view(self) -> AnyView {
        match self {
            RegionView::CourseList {
                courses,
                instructors,
            } => view! { <CourseListPanel courses=courses instructors=instructors /> }.into_any(),
            RegionView::CourseForm { form, instructors } => {
                view! { <CourseFormPanel form=form instructors=instructors /> }.into_any()
            }
            RegionView::Available(entries) => view! { <AvailableCourses entries=entries /> }.into_any(),
            RegionView::Mine(courses) => view! { <MyCourses courses=courses /> }.into_any(),
        }
    }
}

fn instructor_name(instructors: &[Instructor], id: Id) -> String {
    instructors
        .iter()
        .find(|i| i.id == id)
        .map(|i| i.name.clone())
        .unwrap_or_else(|| "Unknown instructor".to_string())
}

// =========================================================
// 通用片段
// =========================================================

#[component]
fn EmptyState(message: &'static str) -> impl IntoView {
    view! { <p class="empty-state">{message}</p> }
}

/// 带 `data-action` 的按钮，`id` 写入 `data-id`
#[component]
fn ActionButton(
    action: &'static str,
    id: Id,
    label: &'static str,
    class: &'static str,
    #[prop(optional)] disabled: bool,
) -> impl IntoView {
    view! {
        <button
            type="button"
            class=format!("btn {}", class)
            data-action=action
            data-id=id.to_string()
            disabled=disabled
        >
            {label}
        </button>
    }
}

/// 课程卡片；`detail` 追加在类别之后，按钮放在子节点中
#[component]
fn CourseCard(
    course: Course,
    #[prop(optional)] detail: Option<String>,
    children: Children,
) -> impl IntoView {
    let mut meta = course.category.clone();
    if let Some(detail) = detail {
        meta.push_str(" · ");
        meta.push_str(&detail);
    }
    let meta = format!("{} · {}/{} enrolled", meta, course.seats_taken(), course.capacity);

    view! {
        <article class="course-card" data-course-id=course.id.to_string()>
            <h3>{course.title}</h3>
            <p>{course.description}</p>
            <p class="course-meta">{meta}</p>
            <div class="course-actions">{children()}</div>
        </article>
    }
}

// =========================================================
// 管理面板
// =========================================================

#[component]
fn CourseListPanel(courses: Vec<Course>, instructors: Vec<Instructor>) -> impl IntoView {
    if courses.is_empty() {
        return view! { <EmptyState message="No courses yet. Create the first one with the form." /> }
            .into_any();
    }

    view! {
        <For
            each=move || courses.clone()
            key=|course| course.id
            children=move |course| {
                let id = course.id;
                let instructor = instructor_name(&instructors, course.instructor_id);
                view! {
                    <CourseCard course=course detail=instructor>
                        <ActionButton action=EDIT_ACTION id=id label="Edit" class="btn-secondary" />
                        <ActionButton action=DELETE_ACTION id=id label="Delete" class="btn-danger" />
                    </CourseCard>
                }
            }
        />
    }
    .into_any()
}

/// 课程表单
///
/// 只渲染初始值；提交时由外壳从具名控件读取字段。
#[component]
fn CourseFormPanel(form: CourseForm, instructors: Vec<Instructor>) -> impl IntoView {
    let editing = form.is_editing();
    let (mode, heading) = if editing {
        ("edit", "Edit course")
    } else {
        ("create", "New course")
    };
    let label = form.submit_label();
    let selected = form.instructor_id;

    let options = instructors
        .into_iter()
        .map(|instructor| {
            let is_selected = selected == Some(instructor.id);
            view! {
                <option value=instructor.id.to_string() selected=is_selected>
                    {instructor.name}
                </option>
            }
        })
        .collect_view();

    view! {
        <form class="course-form" data-action=SUBMIT_ACTION data-mode=mode>
            <h2>{heading}</h2>
            <label for="course-title">"Title"</label>
            <input id="course-title" name="title" value=form.title required />
            <label for="course-description">"Description"</label>
            <textarea id="course-description" name="description">{form.description}</textarea>
            <label for="course-category">"Category"</label>
            <input id="course-category" name="category" value=form.category />
            <label for="course-capacity">"Capacity"</label>
            <input id="course-capacity" name="capacity" type="number" min="1" value=form.capacity required />
            <label for="course-instructor">"Instructor"</label>
            <select id="course-instructor" name="instructorId" required>
                <option value="">"Select an instructor"</option>
                {options}
            </select>
            <div class="form-actions">
                <button type="submit" class="btn btn-primary">{label}</button>
                {editing.then(|| view! {
                    <button type="button" class="btn" data-action=CANCEL_ACTION>"Cancel"</button>
                })}
            </div>
        </form>
    }
}

// =========================================================
// 学生面板
// =========================================================

#[component]
fn AvailableCourses(entries: Vec<CatalogEntry>) -> impl IntoView {
    if entries.is_empty() {
        return view! { <EmptyState message="No courses are offered right now." /> }.into_any();
    }

    view! {
        <For
            each=move || entries.clone()
            key=|entry| entry.course.id
            children=move |entry| {
                let id = entry.course.id;
                let label = entry.status.label();
                let disabled = !entry.status.can_enroll();
                view! {
                    <CourseCard course=entry.course>
                        <ActionButton action=ENROLL_ACTION id=id label=label class="btn-primary" disabled=disabled />
                    </CourseCard>
                }
            }
        />
    }
    .into_any()
}

#[component]
fn MyCourses(courses: Vec<Course>) -> impl IntoView {
    if courses.is_empty() {
        return view! { <EmptyState message="You are not enrolled in any course yet." /> }
            .into_any();
    }

    view! {
        <For
            each=move || courses.clone()
            key=|course| course.id
            children=move |course| {
                let id = course.id;
                view! {
                    <CourseCard course=course>
                        <ActionButton action=UNENROLL_ACTION id=id label="Unenroll" class="btn-danger" />
                    </CourseCard>
                }
            }
        />
    }
    .into_any()
}
