//! 请求字段校验
//!
//! 进入服务层之前的模式级检查，与 validators 模块的业务规则区分开。

pub const MIN_SCORE: i32 = 0;
pub const MAX_SCORE: i32 = 100;

/// 分数范围校验：0 <= score <= 100
pub fn validate_score(score: i32) -> Result<(), &'static str> {
    if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
        return Err("Score must be between 0 and 100");
    }
    Ok(())
}

/// 课程标题校验：非空且不超过 200 字符
pub fn validate_course_title(title: &str) -> Result<(), &'static str> {
    if title.trim().is_empty() {
        return Err("Course title must not be empty");
    }
    if title.chars().count() > 200 {
        return Err("Course title must not exceed 200 characters");
    }
    Ok(())
}
