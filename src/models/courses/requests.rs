use serde::Deserialize;

/// 创建课程请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCourseRequest {
    pub title: String,
    pub description: Option<String>,
}

/// 课程列表查询参数（简单等值过滤）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseListQuery {
    // 过滤某个教师的课程
    pub teacher_id: Option<i64>,
    // 过滤某个学生的课程
    pub student_id: Option<i64>,
}
