use serde::Deserialize;
use ts_rs::TS;

use super::entities::{Enrollment, EnrollmentRole, EnrollmentStatus};

// 兑换邀请码的学生身份（由外部身份提供方给出）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct StudentIdentity {
    pub student_id: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

impl StudentIdentity {
    pub fn new<S: Into<String>>(student_id: S) -> Self {
        Self {
            student_id: student_id.into(),
            email: None,
            name: None,
        }
    }
}

// 报名写入草稿（id 与 enrolled_at 由存储层赋值，status 固定为 ACTIVE）
#[derive(Debug, Clone)]
pub struct NewEnrollment {
    pub student_id: String,
    pub student_email: Option<String>,
    pub student_name: Option<String>,
    pub teacher_id: String,
    pub class_id: String,
    pub class_name: String,
    pub invite_code: Option<String>,
}

// 报名部分更新（None 字段保持原值）
#[derive(Debug, Clone, Default)]
pub struct EnrollmentPatch {
    pub status: Option<EnrollmentStatus>,
    pub last_accessed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub unenrolled_at: Option<chrono::DateTime<chrono::Utc>>,
}

// 查询范围：默认仅 ACTIVE，调用方可要求全部状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnrollmentScope {
    #[default]
    ActiveOnly,
    AllStatuses,
}

// 报名查询 / 订阅过滤器
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentFilter {
    pub role: EnrollmentRole,
    pub key: String,
    pub scope: EnrollmentScope,
}

impl EnrollmentFilter {
    pub fn student<S: Into<String>>(student_id: S) -> Self {
        Self {
            role: EnrollmentRole::Student,
            key: student_id.into(),
            scope: EnrollmentScope::ActiveOnly,
        }
    }

    pub fn teacher<S: Into<String>>(teacher_id: S) -> Self {
        Self {
            role: EnrollmentRole::Teacher,
            key: teacher_id.into(),
            scope: EnrollmentScope::ActiveOnly,
        }
    }

    pub fn with_scope(mut self, scope: EnrollmentScope) -> Self {
        self.scope = scope;
        self
    }

    /// 纯内存匹配，查询与订阅推送共用同一份过滤逻辑
    pub fn matches(&self, enrollment: &Enrollment) -> bool {
        let key_matches = match self.role {
            EnrollmentRole::Student => enrollment.student_id == self.key,
            EnrollmentRole::Teacher => enrollment.teacher_id == self.key,
        };
        match self.scope {
            EnrollmentScope::ActiveOnly => key_matches && enrollment.is_active(),
            EnrollmentScope::AllStatuses => key_matches,
        }
    }
}
