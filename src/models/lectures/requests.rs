use serde::Deserialize;

/// 创建讲座请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLectureRequest {
    pub course_id: i64,
    pub topic: String,
    pub attachment: Option<String>,
}

/// 更新讲座请求（部分字段补丁）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateLectureRequest {
    pub topic: Option<String>,
    pub attachment: Option<String>,
}
