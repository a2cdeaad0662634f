pub mod invite_link;
pub mod random_code;

pub use invite_link::{build_invite_link, extract_invite_code};
pub use random_code::generate_random_code;

/// 测试日志初始化（幂等，重复调用安全）
#[cfg(test)]
pub(crate) fn init_test_tracing() {
    let filter = tracing_subscriber::EnvFilter::new("materia_enroll=debug");
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
