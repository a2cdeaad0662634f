pub mod generate;
pub mod lifecycle;
pub mod list;
pub mod redeem;
pub mod validate;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::{
    enrollments::{requests::StudentIdentity, responses::RedeemOutcome},
    invite_codes::{
        entities::InviteCode,
        requests::GenerateCodeOptions,
        responses::CodeValidation,
    },
};
use crate::store::EnrollmentStore;
use crate::utils::invite_link::build_invite_link;

/// 邀请码注册表
///
/// 负责邀请码的签发、校验、兑换与生命周期管理。
#[derive(Clone)]
pub struct InviteCodeRegistry {
    pub(crate) store: Arc<dyn EnrollmentStore>,
}

impl InviteCodeRegistry {
    pub fn new(store: Arc<dyn EnrollmentStore>) -> Self {
        Self { store }
    }

    // 为班级签发新邀请码
    pub async fn generate(
        &self,
        teacher_id: &str,
        class_id: &str,
        class_name: &str,
        options: GenerateCodeOptions,
    ) -> Result<InviteCode> {
        generate::generate_code(self, teacher_id, class_id, class_name, options).await
    }

    // 校验邀请码（纯读取，无副作用）
    pub async fn validate(&self, code: &str) -> Result<CodeValidation> {
        validate::validate_code(self, code).await
    }

    // 兑换邀请码，创建报名
    pub async fn redeem(&self, code: &str, student: StudentIdentity) -> Result<RedeemOutcome> {
        redeem::redeem_code(self, code, student).await
    }

    // 停用邀请码（不可恢复）
    pub async fn deactivate(&self, code_id: &str) -> Result<()> {
        lifecycle::deactivate_code(self, code_id).await
    }

    // 硬删除邀请码
    pub async fn delete(&self, code_id: &str) -> Result<()> {
        lifecycle::delete_code(self, code_id).await
    }

    // 列出教师签发的全部邀请码
    pub async fn list_for_teacher(&self, teacher_id: &str) -> Result<Vec<InviteCode>> {
        list::list_codes_for_teacher(self, teacher_id).await
    }

    /// 邀请链接：`https://<host>/join/<CODE>`
    pub fn invite_link(&self, invite_code: &InviteCode) -> String {
        build_invite_link(&AppConfig::get().invite.link_host, &invite_code.code)
    }
}
