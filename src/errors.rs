//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。
//!
//! 注意：邀请码校验失败与重复报名属于业务结果而非错误，
//! 以结构化返回值表达（见 `models::invite_codes::responses` 和
//! `models::enrollments::responses`），这里只承载存储故障、
//! 资源缺失等真正的失败路径。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_enroll_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum EnrollError {
            $($variant(String),)*
        }

        impl EnrollError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(EnrollError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(EnrollError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(EnrollError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl EnrollError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        EnrollError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_enroll_errors! {
    StoreOperation("E001", "Store Operation Error"),
    NotFound("E002", "Resource Not Found"),
    CodeSpaceExhausted("E003", "Invite Code Space Exhausted"),
    InvalidTransition("E004", "Invalid Status Transition"),
    Serialization("E005", "Serialization Error"),
    InvalidArgument("E006", "Invalid Argument"),
}

impl EnrollError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for EnrollError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for EnrollError {}

impl From<serde_json::Error> for EnrollError {
    fn from(err: serde_json::Error) -> Self {
        EnrollError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EnrollError>;
