//! 课程表单状态管理模块
//!
//! 将表单相关的零散状态整合为 `CourseForm`，负责：
//! - 编辑模式（新建 / 编辑某门课程）的显式表示
//! - 数据的重置
//! - 表单字段到请求对象的转换与校验

use academy_shared::{Course, CourseFields, Id};

use crate::error::{AppError, AppResult};
use crate::web::actions::ActionEvent;

/// 表单模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Creating,
    Editing(Id),
}

/// 表单状态结构体
///
/// 字段保留用户输入的原始文本，提交时才解析。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CourseForm {
    pub mode: FormMode,
    pub title: String,
    pub description: String,
    pub category: String,
    pub capacity: String,
    pub instructor_id: Option<Id>,
}

impl CourseForm {
    /// 创建新的空表单（新建模式）
    pub fn new() -> Self {
        Self::default()
    }

    /// 用课程的最新数据填充表单并进入编辑模式
    pub fn editing(course: &Course) -> Self {
        Self {
            mode: FormMode::Editing(course.id),
            title: course.title.clone(),
            description: course.description.clone(),
            category: course.category.clone(),
            capacity: course.capacity.to_string(),
            instructor_id: Some(course.instructor_id),
        }
    }

    /// 从提交事件读取字段，模式沿用当前状态
    pub fn from_event(mode: FormMode, event: &ActionEvent) -> Self {
        Self {
            mode,
            title: event.field("title").to_string(),
            description: event.field("description").to_string(),
            category: event.field("category").to_string(),
            capacity: event.field("capacity").to_string(),
            instructor_id: event.field("instructorId").trim().parse().ok(),
        }
    }

    /// 重置表单到初始状态
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, FormMode::Editing(_))
    }

    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            FormMode::Creating => "Create course",
            FormMode::Editing(_) => "Update course",
        }
    }

    /// 校验并转换为可提交的字段
    pub fn to_fields(&self) -> AppResult<CourseFields> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(AppError::invalid_input("Title is required"));
        }

        let capacity = self
            .capacity
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|c| *c > 0)
            .ok_or_else(|| AppError::invalid_input("Capacity must be a positive whole number"))?;

        let instructor_id = self
            .instructor_id
            .ok_or_else(|| AppError::invalid_input("Please select an instructor"))?;

        Ok(CourseFields {
            title: title.to_string(),
            description: self.description.trim().to_string(),
            category: self.category.trim().to_string(),
            capacity,
            instructor_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submitted(capacity: &str, instructor: &str) -> ActionEvent {
        ActionEvent::new("course-submit")
            .with_field("title", "  Operating Systems ")
            .with_field("description", "Processes and threads")
            .with_field("category", "Systems")
            .with_field("capacity", capacity)
            .with_field("instructorId", instructor)
    }

    #[test]
    fn valid_submission_converts_to_fields() {
        let form = CourseForm::from_event(FormMode::Creating, &submitted("30", "2"));
        let fields = form.to_fields().unwrap();
        assert_eq!(fields.title, "Operating Systems");
        assert_eq!(fields.capacity, 30);
        assert_eq!(fields.instructor_id, 2);
    }

    #[test]
    fn invalid_capacity_is_rejected() {
        for bad in ["", "0", "-3", "ten", "2.5"] {
            let form = CourseForm::from_event(FormMode::Creating, &submitted(bad, "1"));
            let err = form.to_fields().unwrap_err();
            assert_eq!(err.message(), "Capacity must be a positive whole number", "{bad}");
        }
    }

    #[test]
    fn missing_instructor_is_rejected() {
        let form = CourseForm::from_event(FormMode::Creating, &submitted("10", ""));
        assert_eq!(form.to_fields().unwrap_err().message(), "Please select an instructor");
    }

    #[test]
    fn editing_prefills_and_reset_returns_to_create_mode() {
        let course = Course {
            id: 8,
            title: "Graphics".into(),
            description: "Shaders".into(),
            category: "Visual".into(),
            capacity: 15,
            instructor_id: 3,
            enrolled_students: vec![1],
        };
        let mut form = CourseForm::editing(&course);
        assert_eq!(form.mode, FormMode::Editing(8));
        assert_eq!(form.capacity, "15");
        assert_eq!(form.submit_label(), "Update course");

        form.reset();
        assert_eq!(form, CourseForm::new());
        assert!(!form.is_editing());
        assert_eq!(form.submit_label(), "Create course");
    }
}
