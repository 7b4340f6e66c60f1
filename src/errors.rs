//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。
//! 领域错误（角色、校验、权限等）与存储层错误共用同一个扁平枚举，
//! 服务层不捕获领域错误，原样向边界层传播。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_ocms_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum OcmsError {
            $($variant(String),)*
        }

        impl OcmsError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(OcmsError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(OcmsError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(OcmsError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl OcmsError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        OcmsError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_ocms_errors! {
    // 领域错误：边界层负责映射为传输层状态码
    UserRole("E001", "User Role Error"),
    Validation("E002", "Validation Error"),
    NotEnrolled("E003", "Not Enrolled Error"),
    AlreadyGraded("E004", "Already Graded Error"),
    PermissionDenied("E005", "Permission Denied"),
    NotFound("E006", "Resource Not Found"),
    // 基础设施错误
    DatabaseConfig("E010", "Database Configuration Error"),
    DatabaseConnection("E011", "Database Connection Error"),
    DatabaseOperation("E012", "Database Operation Error"),
    Serialization("E013", "Serialization Error"),
    DateParse("E014", "Date Parse Error"),
}

impl OcmsError {
    /// 是否为领域错误（可直接映射为 4xx 的业务失败）
    pub fn is_domain_error(&self) -> bool {
        matches!(
            self,
            OcmsError::UserRole(_)
                | OcmsError::Validation(_)
                | OcmsError::NotEnrolled(_)
                | OcmsError::AlreadyGraded(_)
                | OcmsError::PermissionDenied(_)
                | OcmsError::NotFound(_)
        )
    }

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

impl fmt::Display for OcmsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for OcmsError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for OcmsError {
    fn from(err: sea_orm::DbErr) -> Self {
        OcmsError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for OcmsError {
    fn from(err: std::io::Error) -> Self {
        OcmsError::DatabaseOperation(err.to_string())
    }
}

impl From<serde_json::Error> for OcmsError {
    fn from(err: serde_json::Error) -> Self {
        OcmsError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for OcmsError {
    fn from(err: chrono::ParseError) -> Self {
        OcmsError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, OcmsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(OcmsError::user_role("test").code(), "E001");
        assert_eq!(OcmsError::validation("test").code(), "E002");
        assert_eq!(OcmsError::not_enrolled("test").code(), "E003");
        assert_eq!(OcmsError::already_graded("test").code(), "E004");
        assert_eq!(OcmsError::permission_denied("test").code(), "E005");
        assert_eq!(OcmsError::not_found("test").code(), "E006");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            OcmsError::user_role("test").error_type(),
            "User Role Error"
        );
        assert_eq!(
            OcmsError::already_graded("test").error_type(),
            "Already Graded Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = OcmsError::validation("Student is already enrolled in this course.");
        assert_eq!(err.message(), "Student is already enrolled in this course.");
    }

    #[test]
    fn test_domain_error_partition() {
        assert!(OcmsError::not_enrolled("x").is_domain_error());
        assert!(OcmsError::permission_denied("x").is_domain_error());
        assert!(!OcmsError::database_operation("x").is_domain_error());
    }

    #[test]
    fn test_format_simple() {
        let err = OcmsError::validation("Grade already exists");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Grade already exists"));
    }
}
