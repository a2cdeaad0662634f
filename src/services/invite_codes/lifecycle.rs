use tracing::{debug, info};

use super::InviteCodeRegistry;
use crate::errors::{EnrollError, Result};

/// 停用邀请码
///
/// 停用不可恢复；对已停用的邀请码重复调用是幂等的，
/// 文档不存在才算调用方误用。
pub async fn deactivate_code(registry: &InviteCodeRegistry, code_id: &str) -> Result<()> {
    let existed = registry.store.deactivate_invite_code(code_id).await?;
    if !existed {
        return Err(EnrollError::not_found(format!(
            "invite code {code_id} does not exist"
        )));
    }
    info!("Invite code {} deactivated", code_id);
    Ok(())
}

/// 硬删除邀请码（教师主动操作，不可逆）
pub async fn delete_code(registry: &InviteCodeRegistry, code_id: &str) -> Result<()> {
    let removed = registry.store.delete_invite_code(code_id).await?;
    if removed {
        info!("Invite code {} deleted", code_id);
    } else {
        debug!("Invite code {} already gone, delete is a no-op", code_id);
    }
    Ok(())
}
