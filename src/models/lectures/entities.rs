use serde::{Deserialize, Serialize};

// 讲座实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lecture {
    pub id: i64,
    pub course_id: i64,
    pub topic: String,
    // 不透明附件引用（演示文稿等），文件内容不在核心范围内
    pub attachment: Option<String>,
    pub created_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
