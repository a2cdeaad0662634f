use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entities::InviteCode;

// 邀请码校验的拒绝原因
//
// 属于业务结果而非错误：调用方需要按原因分支渲染提示。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/invite-code.ts")]
pub enum CodeRejection {
    NotFoundOrInactive,
    Expired,
    LimitReached,
}

impl std::fmt::Display for CodeRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodeRejection::NotFoundOrInactive => write!(f, "not found or inactive"),
            CodeRejection::Expired => write!(f, "expired"),
            CodeRejection::LimitReached => write!(f, "limit reached"),
        }
    }
}

// 邀请码校验结果
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/invite-code.ts")]
pub struct CodeValidation {
    pub is_valid: bool,
    pub invite_code: Option<InviteCode>,
    pub error: Option<CodeRejection>,
}

impl CodeValidation {
    pub fn ok(invite_code: InviteCode) -> Self {
        Self {
            is_valid: true,
            invite_code: Some(invite_code),
            error: None,
        }
    }

    pub fn rejected(rejection: CodeRejection) -> Self {
        Self {
            is_valid: false,
            invite_code: None,
            error: Some(rejection),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_messages() {
        assert_eq!(
            CodeRejection::NotFoundOrInactive.to_string(),
            "not found or inactive"
        );
        assert_eq!(CodeRejection::Expired.to_string(), "expired");
        assert_eq!(CodeRejection::LimitReached.to_string(), "limit reached");
    }

    #[test]
    fn test_rejected_shape() {
        let validation = CodeValidation::rejected(CodeRejection::Expired);
        assert!(!validation.is_valid);
        assert!(validation.invite_code.is_none());
        assert_eq!(validation.error, Some(CodeRejection::Expired));
    }
}
