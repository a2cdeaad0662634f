use serde::Serialize;
use ts_rs::TS;

use super::entities::{Enrollment, EnrollmentStatus};
use crate::models::invite_codes::responses::CodeRejection;

// 兑换失败原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "snake_case", tag = "kind", content = "reason")]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub enum RedeemRejection {
    // 邀请码校验未通过（原因原样传递）
    Code(CodeRejection),
    // 该学生已有此班级的有效报名
    AlreadyEnrolled,
}

impl std::fmt::Display for RedeemRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RedeemRejection::Code(rejection) => write!(f, "{rejection}"),
            RedeemRejection::AlreadyEnrolled => write!(f, "already enrolled"),
        }
    }
}

// 兑换结果
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct RedeemOutcome {
    pub success: bool,
    pub enrollment: Option<Enrollment>,
    pub error: Option<RedeemRejection>,
}

impl RedeemOutcome {
    pub fn ok(enrollment: Enrollment) -> Self {
        Self {
            success: true,
            enrollment: Some(enrollment),
            error: None,
        }
    }

    pub fn rejected(rejection: RedeemRejection) -> Self {
        Self {
            success: false,
            enrollment: None,
            error: Some(rejection),
        }
    }
}

// 按状态统计（用于概览展示）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct StatusSummary {
    pub pending: usize,
    pub active: usize,
    pub inactive: usize,
    pub completed: usize,
}

impl StatusSummary {
    pub fn total(&self) -> usize {
        self.pending + self.active + self.inactive + self.completed
    }

    pub fn record(&mut self, status: EnrollmentStatus) {
        match status {
            EnrollmentStatus::Pending => self.pending += 1,
            EnrollmentStatus::Active => self.active += 1,
            EnrollmentStatus::Inactive => self.inactive += 1,
            EnrollmentStatus::Completed => self.completed += 1,
        }
    }
}
