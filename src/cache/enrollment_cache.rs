//! 报名读穿缓存
//!
//! 每个登录会话持有一个实例，登出时调用 `cleanup()` 释放全部订阅，
//! 避免身份切换后订阅泄漏。TTL 只约束冷读取：订阅一旦建立，
//! 每次推送都会覆盖缓存并重置时间戳，缓存可以无限期保持新鲜。

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::enrollments::{
    entities::{Enrollment, EnrollmentRole},
    requests::EnrollmentFilter,
};
use crate::store::EnrollmentStore;

/// 缓存分区键：视角 + 学生/教师 ID
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    role: EnrollmentRole,
    key: String,
}

impl CacheKey {
    fn filter(&self) -> EnrollmentFilter {
        match self.role {
            EnrollmentRole::Student => EnrollmentFilter::student(self.key.clone()),
            EnrollmentRole::Teacher => EnrollmentFilter::teacher(self.key.clone()),
        }
    }
}

struct CacheEntry {
    enrollments: Vec<Enrollment>,
    refreshed_at: Instant,
}

impl CacheEntry {
    fn fresh(enrollments: Vec<Enrollment>) -> Self {
        Self {
            enrollments,
            refreshed_at: Instant::now(),
        }
    }
}

/// 报名读穿缓存
pub struct EnrollmentCache {
    store: Arc<dyn EnrollmentStore>,
    entries: Arc<DashMap<CacheKey, CacheEntry>>,
    subscriptions: Arc<DashMap<CacheKey, JoinHandle<()>>>,
    ttl: Duration,
}

impl EnrollmentCache {
    /// 创建会话缓存（TTL 取自配置，默认 5 分钟）
    pub fn new(store: Arc<dyn EnrollmentStore>) -> Self {
        Self::with_ttl(store, Duration::from_secs(AppConfig::get().cache.ttl))
    }

    pub fn with_ttl(store: Arc<dyn EnrollmentStore>, ttl: Duration) -> Self {
        Self {
            store,
            entries: Arc::new(DashMap::new()),
            subscriptions: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// 读取某个键的 ACTIVE 报名列表
    ///
    /// 订阅已建立且缓存未过期时直接返回内存副本；
    /// 否则直接查询存储并刷新缓存。
    pub async fn get(
        &self,
        key: &str,
        role: EnrollmentRole,
        force_refresh: bool,
    ) -> Result<Vec<Enrollment>> {
        let cache_key = CacheKey {
            role,
            key: key.to_string(),
        };

        // 订阅在任何 await 之前同步注册，两个并发的首次 get
        // 不可能都通过"尚未订阅"检查
        self.ensure_subscription(&cache_key);

        if !force_refresh
            && let Some(entry) = self.entries.get(&cache_key)
            && entry.refreshed_at.elapsed() < self.ttl
        {
            debug!("Enrollment cache hit for {} {}", role, key);
            return Ok(entry.enrollments.clone());
        }

        // 冷读取：直接查询并刷新缓存
        let enrollments = self.store.list_enrollments(&cache_key.filter()).await?;
        debug!(
            "Enrollment cache refreshed for {} {} ({} records)",
            role,
            key,
            enrollments.len()
        );
        self.entries
            .insert(cache_key, CacheEntry::fresh(enrollments.clone()));
        Ok(enrollments)
    }

    /// 丢弃某个键的缓存副本（订阅保持打开）
    ///
    /// 下一次 get 将按冷读取处理；打开着的订阅多半会先把它填回来。
    pub fn invalidate(&self, key: &str, role: EnrollmentRole) {
        let cache_key = CacheKey {
            role,
            key: key.to_string(),
        };
        self.entries.remove(&cache_key);
        debug!("Enrollment cache invalidated for {} {}", role, key);
    }

    /// 关闭全部订阅并清空缓存（会话结束时必须调用一次）
    pub fn cleanup(&self) {
        for item in self.subscriptions.iter() {
            item.value().abort();
        }
        self.subscriptions.clear();
        self.entries.clear();
        debug!("Enrollment cache cleaned up");
    }

    /// 确保该键存在且仅存在一个订阅
    ///
    /// 同步完成：占位通过 DashMap entry 检查，订阅建立在任务内部进行。
    fn ensure_subscription(&self, cache_key: &CacheKey) {
        if let Entry::Vacant(slot) = self.subscriptions.entry(cache_key.clone()) {
            let task = tokio::spawn(run_subscription(
                self.store.clone(),
                self.entries.clone(),
                self.subscriptions.clone(),
                cache_key.clone(),
            ));
            slot.insert(task);
        }
    }
}

impl Drop for EnrollmentCache {
    fn drop(&mut self) {
        self.cleanup();
    }
}

/// 订阅任务：每次推送覆盖缓存副本并重置时间戳
async fn run_subscription(
    store: Arc<dyn EnrollmentStore>,
    entries: Arc<DashMap<CacheKey, CacheEntry>>,
    subscriptions: Arc<DashMap<CacheKey, JoinHandle<()>>>,
    cache_key: CacheKey,
) {
    let mut receiver = match store.subscribe_enrollments(cache_key.filter()).await {
        Ok(receiver) => receiver,
        Err(e) => {
            error!(
                "Failed to subscribe enrollments for {} {}: {}",
                cache_key.role, cache_key.key, e
            );
            // 注销占位，让后续 get 重试订阅
            subscriptions.remove(&cache_key);
            return;
        }
    };

    let snapshot = receiver.borrow().clone();
    entries.insert(cache_key.clone(), CacheEntry::fresh(snapshot));

    while receiver.changed().await.is_ok() {
        let snapshot = receiver.borrow_and_update().clone();
        debug!(
            "Enrollment cache push for {} {} ({} records)",
            cache_key.role,
            cache_key.key,
            snapshot.len()
        );
        entries.insert(cache_key.clone(), CacheEntry::fresh(snapshot));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use tokio::sync::watch;

    use super::*;
    use crate::models::enrollments::requests::{
        EnrollmentPatch, NewEnrollment, StudentIdentity,
    };
    use crate::models::invite_codes::{entities::InviteCode, requests::NewInviteCode};
    use crate::services::invite_codes::InviteCodeRegistry;
    use crate::store::{CodeConsumption, memory_store::MemoryStore};

    /// 统计读取次数的存储包装，用于断言缓存命中时不触发查询
    struct CountingStore {
        inner: MemoryStore,
        list_calls: AtomicUsize,
    }

    impl CountingStore {
        fn new() -> Self {
            Self {
                inner: MemoryStore::new(),
                list_calls: AtomicUsize::new(0),
            }
        }

        fn list_calls(&self) -> usize {
            self.list_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl EnrollmentStore for CountingStore {
        async fn insert_invite_code(&self, draft: NewInviteCode) -> Result<InviteCode> {
            self.inner.insert_invite_code(draft).await
        }

        async fn invite_code_exists(&self, code: &str) -> Result<bool> {
            self.inner.invite_code_exists(code).await
        }

        async fn get_invite_code_by_code(&self, code: &str) -> Result<Option<InviteCode>> {
            self.inner.get_invite_code_by_code(code).await
        }

        async fn get_invite_code_by_id(&self, id: &str) -> Result<Option<InviteCode>> {
            self.inner.get_invite_code_by_id(id).await
        }

        async fn list_invite_codes_for_teacher(
            &self,
            teacher_id: &str,
        ) -> Result<Vec<InviteCode>> {
            self.inner.list_invite_codes_for_teacher(teacher_id).await
        }

        async fn consume_code_use(&self, id: &str) -> Result<CodeConsumption> {
            self.inner.consume_code_use(id).await
        }

        async fn release_code_use(&self, id: &str) -> Result<()> {
            self.inner.release_code_use(id).await
        }

        async fn deactivate_invite_code(&self, id: &str) -> Result<bool> {
            self.inner.deactivate_invite_code(id).await
        }

        async fn delete_invite_code(&self, id: &str) -> Result<bool> {
            self.inner.delete_invite_code(id).await
        }

        async fn insert_enrollment_if_vacant(
            &self,
            draft: NewEnrollment,
        ) -> Result<Option<Enrollment>> {
            self.inner.insert_enrollment_if_vacant(draft).await
        }

        async fn get_enrollment(&self, id: &str) -> Result<Option<Enrollment>> {
            self.inner.get_enrollment(id).await
        }

        async fn list_enrollments(&self, filter: &EnrollmentFilter) -> Result<Vec<Enrollment>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            self.inner.list_enrollments(filter).await
        }

        async fn update_enrollment(
            &self,
            id: &str,
            patch: EnrollmentPatch,
        ) -> Result<Option<Enrollment>> {
            self.inner.update_enrollment(id, patch).await
        }

        async fn delete_enrollment(&self, id: &str) -> Result<bool> {
            self.inner.delete_enrollment(id).await
        }

        async fn subscribe_enrollments(
            &self,
            filter: EnrollmentFilter,
        ) -> Result<watch::Receiver<Vec<Enrollment>>> {
            self.inner.subscribe_enrollments(filter).await
        }
    }

    async fn enroll(store: &Arc<CountingStore>, student_id: &str) {
        let registry = InviteCodeRegistry::new(store.clone() as Arc<dyn EnrollmentStore>);
        let code = registry
            .generate(
                "teacher-1",
                "class-1",
                "Tecnologia",
                Default::default(),
            )
            .await
            .unwrap()
            .code;
        let outcome = registry
            .redeem(&code, StudentIdentity::new(student_id))
            .await
            .unwrap();
        assert!(outcome.success);
    }

    #[tokio::test]
    async fn test_cache_freshness_within_ttl() {
        let store = Arc::new(CountingStore::new());
        enroll(&store, "student-1").await;

        let cache = EnrollmentCache::with_ttl(
            store.clone() as Arc<dyn EnrollmentStore>,
            Duration::from_secs(300),
        );

        let first = cache
            .get("student-1", EnrollmentRole::Student, false)
            .await
            .unwrap();
        assert_eq!(first.len(), 1);
        let after_first = store.list_calls();

        // 让订阅任务完成建立
        tokio::time::sleep(Duration::from_millis(50)).await;

        let second = cache
            .get("student-1", EnrollmentRole::Student, false)
            .await
            .unwrap();
        assert_eq!(second, first);
        assert_eq!(store.list_calls(), after_first);
    }

    #[tokio::test]
    async fn test_invalidate_forces_fresh_read() {
        let store = Arc::new(CountingStore::new());
        enroll(&store, "student-1").await;

        let cache = EnrollmentCache::with_ttl(
            store.clone() as Arc<dyn EnrollmentStore>,
            Duration::from_secs(300),
        );
        cache
            .get("student-1", EnrollmentRole::Student, false)
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        cache.invalidate("student-1", EnrollmentRole::Student);
        let before = store.list_calls();
        cache
            .get("student-1", EnrollmentRole::Student, false)
            .await
            .unwrap();
        assert_eq!(store.list_calls(), before + 1);
    }

    #[tokio::test]
    async fn test_force_refresh_bypasses_ttl() {
        let store = Arc::new(CountingStore::new());
        enroll(&store, "student-1").await;

        let cache = EnrollmentCache::with_ttl(
            store.clone() as Arc<dyn EnrollmentStore>,
            Duration::from_secs(300),
        );
        cache
            .get("student-1", EnrollmentRole::Student, false)
            .await
            .unwrap();
        let before = store.list_calls();
        cache
            .get("student-1", EnrollmentRole::Student, true)
            .await
            .unwrap();
        assert_eq!(store.list_calls(), before + 1);
    }

    #[tokio::test]
    async fn test_live_update_propagation() {
        let store = Arc::new(CountingStore::new());
        let cache = EnrollmentCache::with_ttl(
            store.clone() as Arc<dyn EnrollmentStore>,
            Duration::from_secs(300),
        );

        let initial = cache
            .get("teacher-1", EnrollmentRole::Teacher, false)
            .await
            .unwrap();
        assert!(initial.is_empty());
        tokio::time::sleep(Duration::from_millis(50)).await;

        // 外部写入匹配订阅过滤器
        enroll(&store, "student-1").await;
        tokio::time::sleep(Duration::from_millis(50)).await;

        // 无需显式 get，缓存副本已被推送覆盖；命中时不触发查询
        let before = store.list_calls();
        let updated = cache
            .get("teacher-1", EnrollmentRole::Teacher, false)
            .await
            .unwrap();
        assert_eq!(updated.len(), 1);
        assert_eq!(store.list_calls(), before);
    }

    #[tokio::test]
    async fn test_single_subscription_per_key() {
        let store = Arc::new(MemoryStore::new());
        let cache = EnrollmentCache::with_ttl(
            store.clone() as Arc<dyn EnrollmentStore>,
            Duration::from_secs(300),
        );

        cache
            .get("student-1", EnrollmentRole::Student, false)
            .await
            .unwrap();
        cache
            .get("student-1", EnrollmentRole::Student, true)
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let watchers = store.watchers.lock().unwrap();
        assert_eq!(watchers.len(), 1);
    }

    #[tokio::test]
    async fn test_cleanup_closes_subscriptions() {
        let store = Arc::new(MemoryStore::new());
        let cache = EnrollmentCache::with_ttl(
            store.clone() as Arc<dyn EnrollmentStore>,
            Duration::from_secs(300),
        );
        cache
            .get("student-1", EnrollmentRole::Student, false)
            .await
            .unwrap();
        cache
            .get("teacher-1", EnrollmentRole::Teacher, false)
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        cache.cleanup();
        tokio::time::sleep(Duration::from_millis(50)).await;

        // 下一次写入时存储层会清理已关闭的通道
        store.notify_enrollment_watchers();
        let watchers = store.watchers.lock().unwrap();
        assert!(watchers.is_empty());
    }
}
