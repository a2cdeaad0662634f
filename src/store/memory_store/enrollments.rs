//! 报名存储操作

use super::MemoryStore;
use crate::errors::Result;
use crate::models::enrollments::{
    entities::{Enrollment, EnrollmentStatus},
    requests::{EnrollmentFilter, EnrollmentPatch, NewEnrollment},
};

impl MemoryStore {
    /// 创建 ACTIVE 报名
    ///
    /// 同一 (student_id, class_id) 已有 ACTIVE 记录时返回 None。
    /// 检查与写入在同一个写锁区间内完成。
    pub(crate) fn insert_enrollment_if_vacant_impl(
        &self,
        draft: NewEnrollment,
    ) -> Result<Option<Enrollment>> {
        let enrollment = Enrollment {
            id: uuid::Uuid::new_v4().to_string(),
            student_id: draft.student_id,
            student_email: draft.student_email,
            student_name: draft.student_name,
            teacher_id: draft.teacher_id,
            class_id: draft.class_id,
            class_name: draft.class_name,
            status: EnrollmentStatus::Active,
            enrolled_at: chrono::Utc::now(),
            last_accessed_at: None,
            completed_at: None,
            unenrolled_at: None,
            invite_code: draft.invite_code,
        };

        {
            let mut enrollments = self.enrollments.write().expect("enrollment lock poisoned");
            let conflict = enrollments.values().any(|e| {
                e.student_id == enrollment.student_id
                    && e.class_id == enrollment.class_id
                    && e.is_active()
            });
            if conflict {
                return Ok(None);
            }
            enrollments.insert(enrollment.id.clone(), enrollment.clone());
        }

        self.notify_enrollment_watchers();
        Ok(Some(enrollment))
    }

    /// 通过文档 ID 查找报名
    pub(crate) fn get_enrollment_impl(&self, id: &str) -> Result<Option<Enrollment>> {
        let enrollments = self.enrollments.read().expect("enrollment lock poisoned");
        Ok(enrollments.get(id).cloned())
    }

    /// 按过滤器查询报名（按报名时间倒序）
    pub(crate) fn list_enrollments_impl(
        &self,
        filter: &EnrollmentFilter,
    ) -> Result<Vec<Enrollment>> {
        let enrollments = self.enrollments.read().expect("enrollment lock poisoned");
        let mut result: Vec<Enrollment> = enrollments
            .values()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        result.sort_by(|a, b| b.enrolled_at.cmp(&a.enrolled_at));
        Ok(result)
    }

    /// 部分更新报名
    pub(crate) fn update_enrollment_impl(
        &self,
        id: &str,
        patch: EnrollmentPatch,
    ) -> Result<Option<Enrollment>> {
        let updated = {
            let mut enrollments = self.enrollments.write().expect("enrollment lock poisoned");
            let Some(enrollment) = enrollments.get_mut(id) else {
                return Ok(None);
            };

            if let Some(status) = patch.status {
                enrollment.status = status;
            }
            if let Some(last_accessed_at) = patch.last_accessed_at {
                enrollment.last_accessed_at = Some(last_accessed_at);
            }
            if let Some(completed_at) = patch.completed_at {
                enrollment.completed_at = Some(completed_at);
            }
            if let Some(unenrolled_at) = patch.unenrolled_at {
                enrollment.unenrolled_at = Some(unenrolled_at);
            }

            enrollment.clone()
        };

        self.notify_enrollment_watchers();
        Ok(Some(updated))
    }

    /// 硬删除报名
    pub(crate) fn delete_enrollment_impl(&self, id: &str) -> Result<bool> {
        let removed = {
            let mut enrollments = self.enrollments.write().expect("enrollment lock poisoned");
            enrollments.remove(id).is_some()
        };

        if removed {
            self.notify_enrollment_watchers();
        }
        Ok(removed)
    }
}
