use serde::{Deserialize, Serialize};

// 评分实体，每个提交最多一条（submission_id 唯一）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grade {
    pub id: i64,
    pub submission_id: i64,
    pub grader_id: i64,
    // 分数，[0, 100]，进入服务层前校验
    pub score: i32,
    pub comment: Option<String>,
    // 每次变更刷新
    pub graded_at: chrono::DateTime<chrono::Utc>,
}

// 评分评论实体，只增不改
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeComment {
    pub id: i64,
    pub grade_id: i64,
    pub author_id: i64,
    pub text: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
