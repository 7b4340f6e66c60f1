use serde::Deserialize;

/// 创建评分请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGradeRequest {
    pub score: i32,
    pub comment: Option<String>,
}

/// 更新评分请求（部分字段补丁）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateGradeRequest {
    pub score: Option<i32>,
    pub comment: Option<String>,
}
