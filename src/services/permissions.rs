//! 调用者权限检查
//!
//! 由各操作在写入前显式调用，身份本身由外部身份提供方保证。

use crate::errors::{HWSystemError, Result};
use crate::models::users::entities::{Caller, UserRole};

/// 仅教师或管理员
pub(crate) fn require_staff(caller: &Caller) -> Result<()> {
    if caller.role.is_staff() {
        return Ok(());
    }
    Err(HWSystemError::authorization(format!(
        "用户 {} 不是教师或管理员",
        caller.user_id
    )))
}

/// 管理员可操作任意记录，教师只能操作自己创建的记录
pub(crate) fn require_author_or_admin(caller: &Caller, author_id: i64) -> Result<()> {
    match caller.role {
        UserRole::Admin => Ok(()),
        UserRole::Teacher if caller.user_id == author_id => Ok(()),
        UserRole::Teacher => Err(HWSystemError::authorization(format!(
            "教师 {} 不能修改他人创建的记录",
            caller.user_id
        ))),
        UserRole::Student => require_staff(caller),
    }
}

/// 学生只能代表自己提交
pub(crate) fn require_acting_student(caller: &Caller, student_id: i64) -> Result<()> {
    if caller.role == UserRole::Student && caller.user_id == student_id {
        return Ok(());
    }
    Err(HWSystemError::authorization(format!(
        "用户 {} 不能代表学生 {} 提交",
        caller.user_id, student_id
    )))
}

/// 学生只能读取自己的数据，教师和管理员不受限
pub(crate) fn require_self_or_staff(caller: &Caller, student_id: i64) -> Result<()> {
    if caller.role.is_staff() || caller.user_id == student_id {
        return Ok(());
    }
    Err(HWSystemError::authorization(format!(
        "用户 {} 不能查看学生 {} 的数据",
        caller.user_id, student_id
    )))
}
