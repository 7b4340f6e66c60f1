use serde::{Deserialize, Serialize};

// 作业实体，隶属于某个讲座
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub id: i64,
    pub lecture_id: i64,
    pub text: String,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    pub created_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
