//! 邀请码存储操作

use super::MemoryStore;
use crate::errors::{EnrollError, Result};
use crate::models::invite_codes::{entities::InviteCode, requests::NewInviteCode};
use crate::store::CodeConsumption;

impl MemoryStore {
    /// 写入新邀请码
    pub(crate) fn insert_invite_code_impl(&self, draft: NewInviteCode) -> Result<InviteCode> {
        let invite_code = InviteCode {
            id: uuid::Uuid::new_v4().to_string(),
            code: draft.code,
            teacher_id: draft.teacher_id,
            class_id: draft.class_id,
            class_name: draft.class_name,
            created_at: chrono::Utc::now(),
            expires_at: draft.expires_at,
            max_uses: draft.max_uses,
            current_uses: 0,
            is_active: true,
            metadata: draft.metadata,
        };

        let mut codes = self.codes.write().expect("invite code lock poisoned");
        // 唯一性约束：同一邀请码字符串不允许重复占用
        if codes.values().any(|c| c.code == invite_code.code) {
            return Err(EnrollError::store_operation(format!(
                "invite code '{}' already exists",
                invite_code.code
            )));
        }
        codes.insert(invite_code.id.clone(), invite_code.clone());

        Ok(invite_code)
    }

    /// 邀请码字符串是否已占用（含已停用的）
    pub(crate) fn invite_code_exists_impl(&self, code: &str) -> Result<bool> {
        let codes = self.codes.read().expect("invite code lock poisoned");
        Ok(codes.values().any(|c| c.code == code))
    }

    /// 通过邀请码字符串精确查找
    pub(crate) fn get_invite_code_by_code_impl(&self, code: &str) -> Result<Option<InviteCode>> {
        let codes = self.codes.read().expect("invite code lock poisoned");
        Ok(codes.values().find(|c| c.code == code).cloned())
    }

    /// 通过文档 ID 查找
    pub(crate) fn get_invite_code_by_id_impl(&self, id: &str) -> Result<Option<InviteCode>> {
        let codes = self.codes.read().expect("invite code lock poisoned");
        Ok(codes.get(id).cloned())
    }

    /// 列出教师签发的全部邀请码（按创建时间倒序）
    pub(crate) fn list_invite_codes_for_teacher_impl(
        &self,
        teacher_id: &str,
    ) -> Result<Vec<InviteCode>> {
        let codes = self.codes.read().expect("invite code lock poisoned");
        let mut result: Vec<InviteCode> = codes
            .values()
            .filter(|c| c.teacher_id == teacher_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    /// 有条件地递增使用次数
    ///
    /// 达到 max_uses 时拒绝递增，保证 current_uses <= max_uses 不变量。
    pub(crate) fn consume_code_use_impl(&self, id: &str) -> Result<CodeConsumption> {
        let mut codes = self.codes.write().expect("invite code lock poisoned");
        let Some(invite_code) = codes.get_mut(id) else {
            return Ok(CodeConsumption::NotFound);
        };
        if invite_code.limit_reached() {
            return Ok(CodeConsumption::LimitReached);
        }
        invite_code.current_uses += 1;
        Ok(CodeConsumption::Consumed(invite_code.clone()))
    }

    /// 补偿性递减使用次数（最低为 0）
    pub(crate) fn release_code_use_impl(&self, id: &str) -> Result<()> {
        let mut codes = self.codes.write().expect("invite code lock poisoned");
        if let Some(invite_code) = codes.get_mut(id) {
            invite_code.current_uses = invite_code.current_uses.saturating_sub(1);
        }
        Ok(())
    }

    /// 停用邀请码；返回文档是否存在
    pub(crate) fn deactivate_invite_code_impl(&self, id: &str) -> Result<bool> {
        let mut codes = self.codes.write().expect("invite code lock poisoned");
        match codes.get_mut(id) {
            Some(invite_code) => {
                invite_code.is_active = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// 硬删除邀请码
    pub(crate) fn delete_invite_code_impl(&self, id: &str) -> Result<bool> {
        let mut codes = self.codes.write().expect("invite code lock poisoned");
        Ok(codes.remove(id).is_some())
    }
}
