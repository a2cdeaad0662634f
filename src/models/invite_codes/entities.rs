use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 邀请码附加信息（描述 / 欢迎语）
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/invite-code.ts")]
pub struct CodeMetadata {
    pub description: Option<String>,
    pub welcome_message: Option<String>,
}

impl CodeMetadata {
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.welcome_message.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/invite-code.ts")]
pub struct InviteCode {
    // 文档ID
    pub id: String,
    // 邀请码（8 位大写字母数字，全局唯一）
    pub code: String,
    // 教师ID
    pub teacher_id: String,
    // 班级（materia）ID
    pub class_id: String,
    // 班级名称（冗余展示字段）
    pub class_name: String,
    // 创建时间（由存储层赋值）
    pub created_at: chrono::DateTime<chrono::Utc>,
    // 过期时间
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
    // 最大使用次数
    pub max_uses: Option<u32>,
    // 已使用次数
    pub current_uses: u32,
    // 是否有效（停用后不可恢复）
    pub is_active: bool,
    // 附加信息
    pub metadata: Option<CodeMetadata>,
}

impl InviteCode {
    /// 是否已过期
    pub fn has_expired(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        matches!(self.expires_at, Some(expires_at) if now > expires_at)
    }

    /// 是否已达到使用上限
    pub fn limit_reached(&self) -> bool {
        matches!(self.max_uses, Some(max_uses) if self.current_uses >= max_uses)
    }

    /// 剩余可用次数（未设上限时为 None）
    pub fn uses_remaining(&self) -> Option<u32> {
        self.max_uses
            .map(|max_uses| max_uses.saturating_sub(self.current_uses))
    }
}
