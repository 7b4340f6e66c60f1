use serde::{Deserialize, Serialize};

// 课程实体
//
// 成员集合（教师/学生 ID）在读取时一并加载，校验器由此保持为纯函数，
// 不需要在规则判断中间再访问存储层。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    // 创建者，始终包含在 teacher_ids 中
    pub created_by: i64,
    pub teacher_ids: Vec<i64>,
    pub student_ids: Vec<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Course {
    pub fn has_teacher(&self, user_id: i64) -> bool {
        self.teacher_ids.contains(&user_id)
    }

    pub fn has_student(&self, user_id: i64) -> bool {
        self.student_ids.contains(&user_id)
    }
}
