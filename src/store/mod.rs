//! 文档存储抽象层
//!
//! 订阅原语使用 `tokio::sync::watch`：接收端始终持有当前匹配结果集，
//! 每次匹配写入后推送完整的新结果集。
//!
//! `consume_code_use` 与 `insert_enrollment_if_vacant` 是有条件的原子
//! 操作，实现方必须保证"检查-写入"不被并发兑换拆开（内存后端在单个
//! 锁区间内完成，真实后端需等价的事务语义）。

use std::sync::Arc;

use tokio::sync::watch;

use crate::errors::Result;
use crate::models::{
    enrollments::{
        entities::Enrollment,
        requests::{EnrollmentFilter, EnrollmentPatch, NewEnrollment},
    },
    invite_codes::{entities::InviteCode, requests::NewInviteCode},
};

pub mod memory_store;

/// 有条件使用次数递增的结果
#[derive(Debug, Clone)]
pub enum CodeConsumption {
    /// 递增成功，返回更新后的邀请码
    Consumed(InviteCode),
    /// 递增会超过 max_uses，未执行
    LimitReached,
    /// 邀请码不存在
    NotFound,
}

#[async_trait::async_trait]
pub trait EnrollmentStore: Send + Sync {
    /// 邀请码管理方法
    // 写入新邀请码（赋值 id 与 created_at）
    async fn insert_invite_code(&self, draft: NewInviteCode) -> Result<InviteCode>;
    // 邀请码字符串是否已占用（含已停用的）
    async fn invite_code_exists(&self, code: &str) -> Result<bool>;
    // 通过邀请码字符串精确查找
    async fn get_invite_code_by_code(&self, code: &str) -> Result<Option<InviteCode>>;
    // 通过文档 ID 查找
    async fn get_invite_code_by_id(&self, id: &str) -> Result<Option<InviteCode>>;
    // 列出教师签发的全部邀请码
    async fn list_invite_codes_for_teacher(&self, teacher_id: &str) -> Result<Vec<InviteCode>>;
    // 有条件地递增使用次数（达到上限时拒绝）
    async fn consume_code_use(&self, id: &str) -> Result<CodeConsumption>;
    // 补偿性递减（报名创建失败后回退，最低为 0）
    async fn release_code_use(&self, id: &str) -> Result<()>;
    // 停用邀请码（不可恢复）；返回文档是否存在
    async fn deactivate_invite_code(&self, id: &str) -> Result<bool>;
    // 硬删除邀请码；返回是否确有删除
    async fn delete_invite_code(&self, id: &str) -> Result<bool>;

    /// 报名管理方法
    // 创建 ACTIVE 报名；同一 (student_id, class_id) 已有 ACTIVE 记录时返回 None
    async fn insert_enrollment_if_vacant(&self, draft: NewEnrollment)
    -> Result<Option<Enrollment>>;
    // 通过文档 ID 查找报名
    async fn get_enrollment(&self, id: &str) -> Result<Option<Enrollment>>;
    // 按过滤器查询报名
    async fn list_enrollments(&self, filter: &EnrollmentFilter) -> Result<Vec<Enrollment>>;
    // 部分更新报名；文档不存在时返回 None
    async fn update_enrollment(&self, id: &str, patch: EnrollmentPatch)
    -> Result<Option<Enrollment>>;
    // 硬删除报名；返回是否确有删除
    async fn delete_enrollment(&self, id: &str) -> Result<bool>;
    // 订阅匹配过滤器的报名集合变更
    async fn subscribe_enrollments(
        &self,
        filter: EnrollmentFilter,
    ) -> Result<watch::Receiver<Vec<Enrollment>>>;
}

pub fn create_store() -> Arc<dyn EnrollmentStore> {
    Arc::new(memory_store::MemoryStore::new())
}
