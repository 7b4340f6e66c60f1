use serde::Deserialize;

/// 创建提交请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateSubmissionRequest {
    pub text: String,
    pub attachment: Option<String>,
}

/// 更新提交请求（部分字段补丁）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSubmissionRequest {
    pub text: Option<String>,
    pub attachment: Option<String>,
}

/// 提交列表查询参数（简单等值过滤）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmissionListQuery {
    pub assignment_id: Option<i64>,
    pub student_id: Option<i64>,
}
