//! 内存存储实现
//!
//! 以 HashMap + 同步锁承载两个集合。持有锁的代码段内没有 await 点，
//! 因此"检查-写入"在这里天然原子；订阅推送在写锁释放之后进行。

mod enrollments;
mod invite_codes;
mod subscriptions;

use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

use tokio::sync::watch;

use crate::errors::Result;
use crate::models::{
    enrollments::{
        entities::Enrollment,
        requests::{EnrollmentFilter, EnrollmentPatch, NewEnrollment},
    },
    invite_codes::{entities::InviteCode, requests::NewInviteCode},
};
use crate::store::{CodeConsumption, EnrollmentStore};

/// 报名集合的订阅者
pub(crate) struct EnrollmentWatcher {
    pub(crate) filter: EnrollmentFilter,
    pub(crate) sender: watch::Sender<Vec<Enrollment>>,
}

/// 内存存储实现
#[derive(Default)]
pub struct MemoryStore {
    pub(crate) codes: RwLock<HashMap<String, InviteCode>>,
    pub(crate) enrollments: RwLock<HashMap<String, Enrollment>>,
    pub(crate) watchers: Mutex<Vec<EnrollmentWatcher>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

// EnrollmentStore trait 实现
#[async_trait::async_trait]
impl EnrollmentStore for MemoryStore {
    async fn insert_invite_code(&self, draft: NewInviteCode) -> Result<InviteCode> {
        self.insert_invite_code_impl(draft)
    }

    async fn invite_code_exists(&self, code: &str) -> Result<bool> {
        self.invite_code_exists_impl(code)
    }

    async fn get_invite_code_by_code(&self, code: &str) -> Result<Option<InviteCode>> {
        self.get_invite_code_by_code_impl(code)
    }

    async fn get_invite_code_by_id(&self, id: &str) -> Result<Option<InviteCode>> {
        self.get_invite_code_by_id_impl(id)
    }

    async fn list_invite_codes_for_teacher(&self, teacher_id: &str) -> Result<Vec<InviteCode>> {
        self.list_invite_codes_for_teacher_impl(teacher_id)
    }

    async fn consume_code_use(&self, id: &str) -> Result<CodeConsumption> {
        self.consume_code_use_impl(id)
    }

    async fn release_code_use(&self, id: &str) -> Result<()> {
        self.release_code_use_impl(id)
    }

    async fn deactivate_invite_code(&self, id: &str) -> Result<bool> {
        self.deactivate_invite_code_impl(id)
    }

    async fn delete_invite_code(&self, id: &str) -> Result<bool> {
        self.delete_invite_code_impl(id)
    }

    async fn insert_enrollment_if_vacant(
        &self,
        draft: NewEnrollment,
    ) -> Result<Option<Enrollment>> {
        self.insert_enrollment_if_vacant_impl(draft)
    }

    async fn get_enrollment(&self, id: &str) -> Result<Option<Enrollment>> {
        self.get_enrollment_impl(id)
    }

    async fn list_enrollments(&self, filter: &EnrollmentFilter) -> Result<Vec<Enrollment>> {
        self.list_enrollments_impl(filter)
    }

    async fn update_enrollment(
        &self,
        id: &str,
        patch: EnrollmentPatch,
    ) -> Result<Option<Enrollment>> {
        self.update_enrollment_impl(id, patch)
    }

    async fn delete_enrollment(&self, id: &str) -> Result<bool> {
        self.delete_enrollment_impl(id)
    }

    async fn subscribe_enrollments(
        &self,
        filter: EnrollmentFilter,
    ) -> Result<watch::Receiver<Vec<Enrollment>>> {
        self.subscribe_enrollments_impl(filter)
    }
}
