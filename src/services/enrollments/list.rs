use super::EnrollmentManager;
use crate::errors::Result;
use crate::models::enrollments::{
    entities::Enrollment,
    requests::{EnrollmentFilter, EnrollmentScope},
};

// 列出学生的报名
pub async fn list_for_student(
    manager: &EnrollmentManager,
    student_id: &str,
    scope: EnrollmentScope,
) -> Result<Vec<Enrollment>> {
    let filter = EnrollmentFilter::student(student_id).with_scope(scope);
    manager.store.list_enrollments(&filter).await
}

// 列出教师名下的报名
pub async fn list_for_teacher(
    manager: &EnrollmentManager,
    teacher_id: &str,
    scope: EnrollmentScope,
) -> Result<Vec<Enrollment>> {
    let filter = EnrollmentFilter::teacher(teacher_id).with_scope(scope);
    manager.store.list_enrollments(&filter).await
}
