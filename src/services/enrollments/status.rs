use tracing::{info, warn};

use super::EnrollmentManager;
use crate::errors::{EnrollError, Result};
use crate::models::enrollments::{
    entities::{Enrollment, EnrollmentStatus},
    requests::EnrollmentPatch,
};

/// 状态流转
///
/// 允许 ACTIVE <-> INACTIVE 与 ACTIVE -> COMPLETED；
/// 进入 COMPLETED 盖章 completed_at，进入 INACTIVE（退课）盖章 unenrolled_at。
pub async fn set_status(
    manager: &EnrollmentManager,
    enrollment_id: &str,
    new_status: EnrollmentStatus,
) -> Result<Enrollment> {
    let Some(current) = manager.store.get_enrollment(enrollment_id).await? else {
        return Err(EnrollError::not_found(format!(
            "enrollment {enrollment_id} does not exist"
        )));
    };

    if !current.status.can_transition_to(new_status) {
        return Err(EnrollError::invalid_transition(format!(
            "{} -> {}",
            current.status, new_status
        )));
    }

    let now = chrono::Utc::now();
    let mut patch = EnrollmentPatch {
        status: Some(new_status),
        ..Default::default()
    };
    match new_status {
        EnrollmentStatus::Completed => patch.completed_at = Some(now),
        EnrollmentStatus::Inactive => patch.unenrolled_at = Some(now),
        _ => {}
    }

    let updated = manager
        .store
        .update_enrollment(enrollment_id, patch)
        .await?
        .ok_or_else(|| {
            EnrollError::not_found(format!("enrollment {enrollment_id} does not exist"))
        })?;

    info!(
        "Enrollment {} transitioned {} -> {}",
        enrollment_id, current.status, new_status
    );
    Ok(updated)
}

/// 更新最近访问时间
///
/// 非关键的遥测字段：失败记日志后吞掉，不打断调用方。
pub async fn touch_access(manager: &EnrollmentManager, enrollment_id: &str) {
    let patch = EnrollmentPatch {
        last_accessed_at: Some(chrono::Utc::now()),
        ..Default::default()
    };

    match manager.store.update_enrollment(enrollment_id, patch).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            warn!(
                "touch_access skipped: enrollment {} does not exist",
                enrollment_id
            );
        }
        Err(e) => {
            warn!(
                "touch_access failed for enrollment {}: {}",
                enrollment_id, e
            );
        }
    }
}
