use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 报名状态
//
// 封闭枚举，状态流转通过 can_transition_to 穷举校验。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub enum EnrollmentStatus {
    Pending,   // 预留给未来的审批流程，当前生命周期不可达
    Active,    // 有效报名
    Inactive,  // 已退课（记录保留）
    Completed, // 已结课
}

impl EnrollmentStatus {
    pub const PENDING: &'static str = "PENDING";
    pub const ACTIVE: &'static str = "ACTIVE";
    pub const INACTIVE: &'static str = "INACTIVE";
    pub const COMPLETED: &'static str = "COMPLETED";

    /// 状态流转是否允许
    ///
    /// 允许：ACTIVE <-> INACTIVE, ACTIVE -> COMPLETED。
    /// 进入 PENDING 一律拒绝；PENDING 保留流出路径以便审批流程落地。
    pub fn can_transition_to(self, next: EnrollmentStatus) -> bool {
        use EnrollmentStatus::*;
        match (self, next) {
            (_, Pending) => false,
            (Active, Inactive) => true,
            (Active, Completed) => true,
            (Inactive, Active) => true,
            (Pending, Active) => true,
            (Pending, Inactive) => true,
            (Pending, Completed) => false,
            (Inactive, Inactive) => false,
            (Inactive, Completed) => false,
            (Active, Active) => false,
            (Completed, _) => false,
        }
    }
}

impl<'de> Deserialize<'de> for EnrollmentStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnrollmentStatus::Pending => write!(f, "{}", Self::PENDING),
            EnrollmentStatus::Active => write!(f, "{}", Self::ACTIVE),
            EnrollmentStatus::Inactive => write!(f, "{}", Self::INACTIVE),
            EnrollmentStatus::Completed => write!(f, "{}", Self::COMPLETED),
        }
    }
}

impl std::str::FromStr for EnrollmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::PENDING => Ok(EnrollmentStatus::Pending),
            Self::ACTIVE => Ok(EnrollmentStatus::Active),
            Self::INACTIVE => Ok(EnrollmentStatus::Inactive),
            Self::COMPLETED => Ok(EnrollmentStatus::Completed),
            _ => Err(format!(
                "无效的报名状态: '{s}'. 支持的状态: PENDING, ACTIVE, INACTIVE, COMPLETED"
            )),
        }
    }
}

// 查询视角：按学生或按教师
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub enum EnrollmentRole {
    Student,
    Teacher,
}

impl std::fmt::Display for EnrollmentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnrollmentRole::Student => write!(f, "student"),
            EnrollmentRole::Teacher => write!(f, "teacher"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct Enrollment {
    // 文档ID
    pub id: String,
    // 学生ID
    pub student_id: String,
    pub student_email: Option<String>,
    pub student_name: Option<String>,
    // 教师ID
    pub teacher_id: String,
    // 班级（materia）ID
    pub class_id: String,
    // 班级名称（冗余展示字段）
    pub class_name: String,
    // 状态
    pub status: EnrollmentStatus,
    // 报名时间（由存储层赋值）
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
    // 最近访问时间
    pub last_accessed_at: Option<chrono::DateTime<chrono::Utc>>,
    // 结课时间
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    // 退课时间
    pub unenrolled_at: Option<chrono::DateTime<chrono::Utc>>,
    // 报名使用的邀请码（手动添加的学生为 None）
    pub invite_code: Option<String>,
}

impl Enrollment {
    pub fn is_active(&self) -> bool {
        self.status == EnrollmentStatus::Active
    }
}
