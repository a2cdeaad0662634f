use super::InviteCodeRegistry;
use crate::errors::Result;
use crate::models::invite_codes::entities::InviteCode;

// 列出教师签发的全部邀请码（教师面板用，含已停用的）
pub async fn list_codes_for_teacher(
    registry: &InviteCodeRegistry,
    teacher_id: &str,
) -> Result<Vec<InviteCode>> {
    registry.store.list_invite_codes_for_teacher(teacher_id).await
}
