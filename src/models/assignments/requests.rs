use chrono::{DateTime, Utc};
use serde::Deserialize;

/// 创建作业请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAssignmentRequest {
    pub lecture_id: i64,
    pub text: String,
    pub due_date: Option<DateTime<Utc>>, // ISO 8601 格式，如 "2026-01-24T12:00:00Z"
}

/// 更新作业请求（部分字段补丁）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAssignmentRequest {
    pub text: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}
