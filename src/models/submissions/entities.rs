use serde::{Deserialize, Serialize};

// 提交实体
//
// grade_id 是显式的可空评分引用：校验器只看这个字段，
// 不做任何"属性是否存在"式的动态探测。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    pub text: String,
    pub attachment: Option<String>,
    pub grade_id: Option<i64>,
    // 创建时写入一次，后续更新不改动
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}

impl Submission {
    pub fn is_graded(&self) -> bool {
        self.grade_id.is_some()
    }
}
