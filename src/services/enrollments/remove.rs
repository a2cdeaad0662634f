use tracing::info;

use super::EnrollmentManager;
use crate::errors::{EnrollError, Result};

/// 硬删除报名
///
/// 教师"移除学生"专用：不论当前状态直接删除记录，
/// 与退课（状态改为 INACTIVE、记录保留）是两个不同的操作。
pub async fn remove_enrollment(manager: &EnrollmentManager, enrollment_id: &str) -> Result<()> {
    let removed = manager.store.delete_enrollment(enrollment_id).await?;
    if !removed {
        return Err(EnrollError::not_found(format!(
            "enrollment {enrollment_id} does not exist"
        )));
    }
    info!("Enrollment {} removed", enrollment_id);
    Ok(())
}
