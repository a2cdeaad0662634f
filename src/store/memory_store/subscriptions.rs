//! 报名集合变更订阅
//!
//! 每个订阅者持有一个 watch 通道：建立时写入当前匹配结果集，
//! 此后每次报名写入都重新计算并推送完整结果集。

use tokio::sync::watch;

use super::{EnrollmentWatcher, MemoryStore};
use crate::errors::Result;
use crate::models::enrollments::{entities::Enrollment, requests::EnrollmentFilter};

impl MemoryStore {
    /// 建立订阅，接收端立即持有当前匹配结果集
    pub(crate) fn subscribe_enrollments_impl(
        &self,
        filter: EnrollmentFilter,
    ) -> Result<watch::Receiver<Vec<Enrollment>>> {
        let snapshot = self.list_enrollments_impl(&filter)?;
        let (sender, receiver) = watch::channel(snapshot);

        let mut watchers = self.watchers.lock().expect("watcher lock poisoned");
        watchers.push(EnrollmentWatcher { filter, sender });

        Ok(receiver)
    }

    /// 向所有订阅者推送最新的匹配结果集，顺带清理已关闭的通道
    pub(crate) fn notify_enrollment_watchers(&self) {
        let all: Vec<Enrollment> = {
            let enrollments = self.enrollments.read().expect("enrollment lock poisoned");
            enrollments.values().cloned().collect()
        };

        let mut watchers = self.watchers.lock().expect("watcher lock poisoned");
        watchers.retain(|w| !w.sender.is_closed());
        for watcher in watchers.iter() {
            let mut matching: Vec<Enrollment> = all
                .iter()
                .filter(|e| watcher.filter.matches(e))
                .cloned()
                .collect();
            matching.sort_by(|a, b| b.enrolled_at.cmp(&a.enrolled_at));
            watcher.sender.send_replace(matching);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::models::enrollments::requests::{EnrollmentFilter, NewEnrollment};
    use crate::store::memory_store::MemoryStore;

    fn draft(student_id: &str, class_id: &str) -> NewEnrollment {
        NewEnrollment {
            student_id: student_id.to_string(),
            student_email: None,
            student_name: None,
            teacher_id: "teacher-1".to_string(),
            class_id: class_id.to_string(),
            class_name: "Fisica".to_string(),
            invite_code: None,
        }
    }

    #[tokio::test]
    async fn test_subscription_receives_initial_snapshot() {
        let store = MemoryStore::new();
        store
            .insert_enrollment_if_vacant_impl(draft("student-1", "class-1"))
            .unwrap();

        let receiver = store
            .subscribe_enrollments_impl(EnrollmentFilter::student("student-1"))
            .unwrap();
        assert_eq!(receiver.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_subscription_pushes_matching_writes() {
        let store = MemoryStore::new();
        let mut receiver = store
            .subscribe_enrollments_impl(EnrollmentFilter::student("student-1"))
            .unwrap();
        assert!(receiver.borrow().is_empty());

        store
            .insert_enrollment_if_vacant_impl(draft("student-1", "class-1"))
            .unwrap();
        assert!(receiver.has_changed().unwrap());
        assert_eq!(receiver.borrow_and_update().len(), 1);

        // 其他学生的写入也会触发推送，但结果集不含该记录
        store
            .insert_enrollment_if_vacant_impl(draft("student-2", "class-1"))
            .unwrap();
        assert_eq!(receiver.borrow_and_update().len(), 1);
    }

    #[tokio::test]
    async fn test_closed_watchers_are_pruned() {
        let store = MemoryStore::new();
        let receiver = store
            .subscribe_enrollments_impl(EnrollmentFilter::student("student-1"))
            .unwrap();
        drop(receiver);

        store
            .insert_enrollment_if_vacant_impl(draft("student-1", "class-1"))
            .unwrap();
        let watchers = store.watchers.lock().unwrap();
        assert!(watchers.is_empty());
    }
}
