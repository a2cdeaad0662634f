pub mod list;
pub mod remove;
pub mod status;

use std::sync::Arc;

use crate::errors::Result;
use crate::models::enrollments::{
    entities::{Enrollment, EnrollmentStatus},
    requests::{EnrollmentScope, StudentIdentity},
    responses::{RedeemOutcome, StatusSummary},
};
use crate::services::invite_codes::InviteCodeRegistry;
use crate::store::EnrollmentStore;

/// 报名管理器
///
/// 封装邀请码兑换，并提供报名的查询、状态流转与删除。
#[derive(Clone)]
pub struct EnrollmentManager {
    pub(crate) store: Arc<dyn EnrollmentStore>,
    registry: InviteCodeRegistry,
}

impl EnrollmentManager {
    pub fn new(store: Arc<dyn EnrollmentStore>) -> Self {
        let registry = InviteCodeRegistry::new(store.clone());
        Self { store, registry }
    }

    /// 邀请码注册表（签发 / 校验 / 生命周期管理走这里）
    pub fn registry(&self) -> &InviteCodeRegistry {
        &self.registry
    }

    // 兑换邀请码，创建报名
    pub async fn redeem(&self, code: &str, student: StudentIdentity) -> Result<RedeemOutcome> {
        self.registry.redeem(code, student).await
    }

    // 列出学生的报名（默认仅 ACTIVE）
    pub async fn list_for_student(
        &self,
        student_id: &str,
        scope: EnrollmentScope,
    ) -> Result<Vec<Enrollment>> {
        list::list_for_student(self, student_id, scope).await
    }

    // 列出教师名下的报名（默认仅 ACTIVE）
    pub async fn list_for_teacher(
        &self,
        teacher_id: &str,
        scope: EnrollmentScope,
    ) -> Result<Vec<Enrollment>> {
        list::list_for_teacher(self, teacher_id, scope).await
    }

    // 状态流转（含时间戳盖章）
    pub async fn set_status(
        &self,
        enrollment_id: &str,
        new_status: EnrollmentStatus,
    ) -> Result<Enrollment> {
        status::set_status(self, enrollment_id, new_status).await
    }

    // 硬删除报名（教师移除学生；绕过状态机）
    pub async fn remove(&self, enrollment_id: &str) -> Result<()> {
        remove::remove_enrollment(self, enrollment_id).await
    }

    // 更新最近访问时间；尽力而为，失败只记日志
    pub async fn touch_access(&self, enrollment_id: &str) {
        status::touch_access(self, enrollment_id).await
    }
}

/// 按状态统计报名数量（纯内存计算，不访问存储）
pub fn count_by_status(enrollments: &[Enrollment]) -> StatusSummary {
    let mut summary = StatusSummary::default();
    for enrollment in enrollments {
        summary.record(enrollment.status);
    }
    summary
}
