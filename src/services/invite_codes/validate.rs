use super::InviteCodeRegistry;
use crate::errors::Result;
use crate::models::invite_codes::responses::{CodeRejection, CodeValidation};

/// 校验邀请码
///
/// 纯读取：不存在 / 已停用 → 已过期 → 已达上限，按序检查。
/// 拒绝原因是业务结果，存储故障才通过 Err 传播。
pub async fn validate_code(registry: &InviteCodeRegistry, code: &str) -> Result<CodeValidation> {
    let Some(invite_code) = registry.store.get_invite_code_by_code(code).await? else {
        return Ok(CodeValidation::rejected(CodeRejection::NotFoundOrInactive));
    };

    if !invite_code.is_active {
        return Ok(CodeValidation::rejected(CodeRejection::NotFoundOrInactive));
    }

    if invite_code.has_expired(chrono::Utc::now()) {
        return Ok(CodeValidation::rejected(CodeRejection::Expired));
    }

    if invite_code.limit_reached() {
        return Ok(CodeValidation::rejected(CodeRejection::LimitReached));
    }

    Ok(CodeValidation::ok(invite_code))
}
