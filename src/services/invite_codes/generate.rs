use tracing::{info, warn};

use super::InviteCodeRegistry;
use crate::config::AppConfig;
use crate::errors::{EnrollError, Result};
use crate::models::invite_codes::{
    entities::InviteCode,
    requests::{GenerateCodeOptions, NewInviteCode},
};
use crate::utils::random_code::generate_random_code;

/// 为班级签发新邀请码
///
/// 从 [A-Z0-9] 中抽取 8 位编码并做全局唯一性检查（含已停用的），
/// 碰撞则重抽。36^8 的编码空间下碰撞几乎不可能发生，重试上限只是
/// 为最坏情况的延迟设界。
pub async fn generate_code(
    registry: &InviteCodeRegistry,
    teacher_id: &str,
    class_id: &str,
    class_name: &str,
    options: GenerateCodeOptions,
) -> Result<InviteCode> {
    if options.max_uses == Some(0) {
        return Err(EnrollError::invalid_argument(
            "max_uses must be a positive integer when provided",
        ));
    }

    let config = AppConfig::get();
    let max_attempts = config.invite.max_generate_attempts;

    let expires_at = options
        .expires_in_days
        .map(|days| chrono::Utc::now() + chrono::Duration::days(days));

    for attempt in 1..=max_attempts {
        let code = generate_random_code(config.invite.code_length);

        if registry.store.invite_code_exists(&code).await? {
            warn!(
                "Invite code collision on attempt {}/{}, redrawing",
                attempt, max_attempts
            );
            continue;
        }

        let draft = NewInviteCode {
            code,
            teacher_id: teacher_id.to_string(),
            class_id: class_id.to_string(),
            class_name: class_name.to_string(),
            expires_at,
            max_uses: options.max_uses,
            metadata: options.metadata(),
        };

        let invite_code = registry.store.insert_invite_code(draft).await?;
        info!(
            "Invite code {} generated for class {} (teacher {})",
            invite_code.code, class_id, teacher_id
        );
        return Ok(invite_code);
    }

    Err(EnrollError::code_space_exhausted(format!(
        "failed to draw a unique invite code after {max_attempts} attempts"
    )))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use tokio::sync::watch;

    use crate::errors::Result;
    use crate::models::{
        enrollments::{
            entities::Enrollment,
            requests::{EnrollmentFilter, EnrollmentPatch, NewEnrollment},
        },
        invite_codes::{
            entities::InviteCode,
            requests::{GenerateCodeOptions, NewInviteCode},
        },
    };
    use crate::services::invite_codes::InviteCodeRegistry;
    use crate::store::{CodeConsumption, EnrollmentStore, memory_store::MemoryStore};

    fn registry() -> InviteCodeRegistry {
        InviteCodeRegistry::new(Arc::new(MemoryStore::new()))
    }

    /// 码空间始终报告已占用的存储包装，用于触发重试上限
    struct SaturatedStore {
        inner: MemoryStore,
    }

    #[async_trait::async_trait]
    impl EnrollmentStore for SaturatedStore {
        async fn insert_invite_code(&self, draft: NewInviteCode) -> Result<InviteCode> {
            self.inner.insert_invite_code(draft).await
        }

        async fn invite_code_exists(&self, _code: &str) -> Result<bool> {
            Ok(true)
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

    #[tokio::test]
    async fn test_generated_codes_are_unique() {
        let registry = registry();
        let mut seen = HashSet::new();
        for _ in 0..50 {
            let invite_code = registry
                .generate("teacher-1", "class-1", "Chimica", GenerateCodeOptions::default())
                .await
                .unwrap();
            assert!(seen.insert(invite_code.code.clone()));
        }
    }

    #[tokio::test]
    async fn test_generated_code_shape() {
        let registry = registry();
        let invite_code = registry
            .generate(
                "teacher-1",
                "class-1",
                "Chimica",
                GenerateCodeOptions {
                    expires_in_days: Some(7),
                    max_uses: Some(30),
                    description: Some("Corso base".to_string()),
                    welcome_message: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(invite_code.code.len(), 8);
        assert_eq!(invite_code.current_uses, 0);
        assert!(invite_code.is_active);
        assert!(invite_code.expires_at.unwrap() > chrono::Utc::now());
        assert_eq!(invite_code.max_uses, Some(30));
        assert_eq!(
            invite_code.metadata.unwrap().description.as_deref(),
            Some("Corso base")
        );
    }

    #[tokio::test]
    async fn test_zero_max_uses_is_rejected() {
        let registry = registry();
        let err = registry
            .generate(
                "teacher-1",
                "class-1",
                "Chimica",
                GenerateCodeOptions {
                    max_uses: Some(0),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E006");
    }

    #[tokio::test]
    async fn test_generate_aborts_when_code_space_is_saturated() {
        crate::utils::init_test_tracing();
        let registry = InviteCodeRegistry::new(Arc::new(SaturatedStore {
            inner: MemoryStore::new(),
        }));
        let err = registry
            .generate("teacher-1", "class-1", "Chimica", GenerateCodeOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E003");
    }
}
