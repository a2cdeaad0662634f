//! 报名缓存层
//!
//! 以"按学生 / 按教师"两个视角分区的读穿缓存，
//! 由存储层的实时订阅保持新鲜。

mod enrollment_cache;

pub use enrollment_cache::EnrollmentCache;
