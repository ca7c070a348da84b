//! 选课规则
//!
//! 容量检查只在客户端进行，存储端并不强制执行。
//! 选课与退课都是"读取-修改-写回"：调用方先重新获取课程，
//! 再用这里的函数计算完整的替换名单。

use crate::{Course, Id};

/// 某个学生相对于某门课程的选课状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentStatus {
    /// 可以选课
    Open,
    /// 已选
    Enrolled,
    /// 名额已满
    Full,
}

impl EnrollmentStatus {
    pub fn can_enroll(&self) -> bool {
        matches!(self, Self::Open)
    }

    /// 选课按钮上显示的文字
    pub fn label(&self) -> &'static str {
        match self {
            Self::Open => "Enroll",
            Self::Enrolled => "Enrolled",
            Self::Full => "Full",
        }
    }
}

impl Course {
    pub fn is_enrolled(&self, student: Id) -> bool {
        self.enrolled_students.contains(&student)
    }

    pub fn seats_taken(&self) -> usize {
        self.enrolled_students.len()
    }

    pub fn is_full(&self) -> bool {
        self.seats_taken() >= self.capacity as usize
    }

    /// 已选优先于满员：学生总能看到自己已经在名单中
    pub fn enrollment_status(&self, student: Id) -> EnrollmentStatus {
        if self.is_enrolled(student) {
            EnrollmentStatus::Enrolled
        } else if self.is_full() {
            EnrollmentStatus::Full
        } else {
            EnrollmentStatus::Open
        }
    }

    /// 追加学生后的完整名单；学生已在名单中时原样返回
    pub fn students_with(&self, student: Id) -> Vec<Id> {
        let mut students = self.enrolled_students.clone();
        if !students.contains(&student) {
            students.push(student);
        }
        students
    }

    /// 移除学生的一次出现后的完整名单，其余条目保持原顺序
    pub fn students_without(&self, student: Id) -> Vec<Id> {
        let mut students = self.enrolled_students.clone();
        if let Some(pos) = students.iter().position(|id| *id == student) {
            students.remove(pos);
        }
        students
    }
}
