use serde::Deserialize;
use ts_rs::TS;

use super::entities::CodeMetadata;

// 生成邀请码的可选约束
//
// 所有字段均为可选；缺省表示"无此约束"。
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/invite-code.ts")]
pub struct GenerateCodeOptions {
    pub expires_in_days: Option<i64>,
    pub max_uses: Option<u32>,
    pub description: Option<String>,
    pub welcome_message: Option<String>,
}

impl GenerateCodeOptions {
    /// 提取附加信息（两个字段都为空时返回 None）
    pub fn metadata(&self) -> Option<CodeMetadata> {
        let metadata = CodeMetadata {
            description: self.description.clone(),
            welcome_message: self.welcome_message.clone(),
        };
        if metadata.is_empty() { None } else { Some(metadata) }
    }
}

// 邀请码写入草稿（id 与 created_at 由存储层赋值）
#[derive(Debug, Clone)]
pub struct NewInviteCode {
    pub code: String,
    pub teacher_id: String,
    pub class_id: String,
    pub class_name: String,
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
    pub max_uses: Option<u32>,
    pub metadata: Option<CodeMetadata>,
}
