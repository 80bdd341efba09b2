//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码、类型名称以及出错字段。

use std::fmt;

/// 错误详情：出错字段（可选）+ 错误信息
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorDetail {
    pub field: Option<String>,
    pub message: String,
}

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() / field() 方法 - 返回错误详情
/// - 便捷构造函数（`validation(msg)` 与带字段的 `validation_on(field, msg)`）
macro_rules! define_hwsystem_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum HWSystemError {
            $($variant(ErrorDetail),)*
        }

        impl HWSystemError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(HWSystemError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(HWSystemError::$variant(_) => $type_name,)*
                }
            }

            fn detail(&self) -> &ErrorDetail {
                match self {
                    $(HWSystemError::$variant(detail) => detail,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl HWSystemError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        HWSystemError::$variant(ErrorDetail {
                            field: None,
                            message: msg.into(),
                        })
                    }

                    pub fn [<$variant:snake _on>]<F: Into<String>, T: Into<String>>(
                        field: F,
                        msg: T,
                    ) -> Self {
                        HWSystemError::$variant(ErrorDetail {
                            field: Some(field.into()),
                            message: msg.into(),
                        })
                    }
                )*
            }
        }
    };
}

define_hwsystem_errors! {
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    DateParse("E011", "Date Parse Error"),
    Authorization("E013", "Authorization Error"),
    AssignmentClosed("E020", "Assignment Closed"),
    InvalidState("E021", "Invalid State Transition"),
}

impl HWSystemError {
    /// 获取错误详情
    pub fn message(&self) -> &str {
        &self.detail().message
    }

    /// 获取出错字段（如果有）
    pub fn field(&self) -> Option<&str> {
        self.detail().field.as_deref()
    }

    /// 是否为调用方修正输入即可恢复的错误
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            HWSystemError::Validation(_)
                | HWSystemError::NotFound(_)
                | HWSystemError::Authorization(_)
                | HWSystemError::AssignmentClosed(_)
                | HWSystemError::InvalidState(_)
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
        match self.field() {
            Some(field) => format!("{} [{}]: {}", self.error_type(), field, self.message()),
            None => format!("{}: {}", self.error_type(), self.message()),
        }
    }
}

impl fmt::Display for HWSystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for HWSystemError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for HWSystemError {
    fn from(err: sea_orm::DbErr) -> Self {
        HWSystemError::database_operation(err.to_string())
    }
}

impl From<std::io::Error> for HWSystemError {
    fn from(err: std::io::Error) -> Self {
        HWSystemError::file_operation(err.to_string())
    }
}

impl From<serde_json::Error> for HWSystemError {
    fn from(err: serde_json::Error) -> Self {
        HWSystemError::serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for HWSystemError {
    fn from(err: chrono::ParseError) -> Self {
        HWSystemError::date_parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HWSystemError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(HWSystemError::database_config("test").code(), "E003");
        assert_eq!(HWSystemError::validation("test").code(), "E007");
        assert_eq!(HWSystemError::assignment_closed("test").code(), "E020");
        assert_eq!(HWSystemError::invalid_state("test").code(), "E021");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            HWSystemError::not_found("test").error_type(),
            "Resource Not Found"
        );
        assert_eq!(
            HWSystemError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_field() {
        let err = HWSystemError::validation_on("due_date", "截止时间必须晚于当前时间");
        assert_eq!(err.field(), Some("due_date"));
        assert_eq!(err.message(), "截止时间必须晚于当前时间");
        assert_eq!(HWSystemError::validation("x").field(), None);
    }

    #[test]
    fn test_format_simple() {
        let err = HWSystemError::validation_on("max_grade", "out of range");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("[max_grade]"));
        assert!(formatted.contains("out of range"));
    }

    #[test]
    fn test_client_error_classification() {
        assert!(HWSystemError::invalid_state("x").is_client_error());
        assert!(!HWSystemError::database_operation("x").is_client_error());
    }
}
