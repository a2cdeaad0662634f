use tracing::{info, warn};

use super::{InviteCodeRegistry, validate};
use crate::errors::Result;
use crate::models::{
    enrollments::{
        requests::{EnrollmentFilter, NewEnrollment, StudentIdentity},
        responses::{RedeemOutcome, RedeemRejection},
    },
    invite_codes::responses::CodeRejection,
};
use crate::store::CodeConsumption;

/// 兑换邀请码
///
/// 1. 重新校验邀请码，拒绝原因原样传递；
/// 2. 已有 ACTIVE 报名的快速失败检查；
/// 3. 原子占用一次使用额度（达到上限时此步失败，并发兑换不会双双通过）；
/// 4. 创建报名；唯一性冲突时回退已占用的额度。
pub async fn redeem_code(
    registry: &InviteCodeRegistry,
    code: &str,
    student: StudentIdentity,
) -> Result<RedeemOutcome> {
    // 1. 校验
    let validation = validate::validate_code(registry, code).await?;
    let Some(invite_code) = validation.invite_code else {
        let rejection = validation
            .error
            .unwrap_or(CodeRejection::NotFoundOrInactive);
        return Ok(RedeemOutcome::rejected(RedeemRejection::Code(rejection)));
    };

    // 2. 快速失败：该学生已有此班级的 ACTIVE 报名
    let active = registry
        .store
        .list_enrollments(&EnrollmentFilter::student(&student.student_id))
        .await?;
    if active.iter().any(|e| e.class_id == invite_code.class_id) {
        return Ok(RedeemOutcome::rejected(RedeemRejection::AlreadyEnrolled));
    }

    // 3. 占用使用额度；上限检查在存储层原子完成
    match registry.store.consume_code_use(&invite_code.id).await? {
        CodeConsumption::Consumed(_) => {}
        CodeConsumption::LimitReached => {
            return Ok(RedeemOutcome::rejected(RedeemRejection::Code(
                CodeRejection::LimitReached,
            )));
        }
        CodeConsumption::NotFound => {
            return Ok(RedeemOutcome::rejected(RedeemRejection::Code(
                CodeRejection::NotFoundOrInactive,
            )));
        }
    }

    // 4. 创建报名
    let draft = NewEnrollment {
        student_id: student.student_id.clone(),
        student_email: student.email,
        student_name: student.name,
        teacher_id: invite_code.teacher_id.clone(),
        class_id: invite_code.class_id.clone(),
        class_name: invite_code.class_name.clone(),
        invite_code: Some(invite_code.code.clone()),
    };

    match registry.store.insert_enrollment_if_vacant(draft).await {
        Ok(Some(enrollment)) => {
            info!(
                "Student {} enrolled in class {} via code {}",
                student.student_id, invite_code.class_id, invite_code.code
            );
            Ok(RedeemOutcome::ok(enrollment))
        }
        Ok(None) => {
            // 并发兑换抢先创建了 ACTIVE 报名，回退额度
            registry.store.release_code_use(&invite_code.id).await?;
            Ok(RedeemOutcome::rejected(RedeemRejection::AlreadyEnrolled))
        }
        Err(e) => {
            // 写入失败，尽力回退已占用的额度
            if let Err(release_err) = registry.store.release_code_use(&invite_code.id).await {
                warn!(
                    "Failed to release use of code {} after enrollment error: {}",
                    invite_code.code, release_err
                );
            }
            Err(e)
        }
    }
}
