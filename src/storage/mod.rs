use std::sync::Arc;

use crate::models::{
    assignments::{
        entities::Assignment,
        requests::{CreateAssignmentRequest, UpdateAssignmentRequest},
    },
    courses::{
        entities::Course,
        requests::{CourseListQuery, CreateCourseRequest},
    },
    grades::{
        entities::{Grade, GradeComment},
        requests::{CreateGradeRequest, UpdateGradeRequest},
    },
    lectures::{
        entities::Lecture,
        requests::{CreateLectureRequest, UpdateLectureRequest},
    },
    submissions::{
        entities::Submission,
        requests::{CreateSubmissionRequest, SubmissionListQuery, UpdateSubmissionRequest},
    },
    users::{entities::User, requests::CreateUserRequest},
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// 课程管理方法
    // 创建课程，创建者在同一事务内写入教师集合
    async fn create_course(&self, course: CreateCourseRequest, created_by: i64) -> Result<Course>;
    // 通过ID获取课程（含成员集合）
    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>>;
    // 列出课程，按创建时间倒序
    async fn list_courses(&self, query: CourseListQuery) -> Result<Vec<Course>>;
    // 删除课程（级联删除讲座及以下）
    async fn delete_course(&self, course_id: i64) -> Result<bool>;
    // 向课程教师集合添加成员
    async fn add_course_teacher(&self, course_id: i64, user_id: i64) -> Result<()>;
    // 向课程学生集合添加成员
    async fn add_course_student(&self, course_id: i64, user_id: i64) -> Result<()>;
    // 从课程学生集合移除成员（幂等）
    async fn remove_course_student(&self, course_id: i64, user_id: i64) -> Result<bool>;

    /// 讲座管理方法
    async fn create_lecture(&self, lecture: CreateLectureRequest, created_by: i64)
    -> Result<Lecture>;
    async fn get_lecture_by_id(&self, lecture_id: i64) -> Result<Option<Lecture>>;
    async fn update_lecture(
        &self,
        lecture_id: i64,
        update: UpdateLectureRequest,
    ) -> Result<Option<Lecture>>;
    // 列出讲座，可按课程过滤，按创建时间倒序
    async fn list_lectures(&self, course_id: Option<i64>) -> Result<Vec<Lecture>>;

    /// 作业管理方法
    async fn create_assignment(
        &self,
        assignment: CreateAssignmentRequest,
        created_by: i64,
    ) -> Result<Assignment>;
    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>>;
    async fn update_assignment(
        &self,
        assignment_id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>>;
    async fn list_assignments(&self, lecture_id: Option<i64>) -> Result<Vec<Assignment>>;

    /// 提交管理方法
    // 创建提交；(assignment, student) 唯一约束是重复提交的最终防线
    async fn create_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
        submission: CreateSubmissionRequest,
    ) -> Result<Submission>;
    async fn get_submission_by_id(&self, submission_id: i64) -> Result<Option<Submission>>;
    async fn get_submission_by_assignment_and_student(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>>;
    // 更新提交内容；submitted_at 不变
    async fn update_submission(
        &self,
        submission_id: i64,
        update: UpdateSubmissionRequest,
    ) -> Result<Option<Submission>>;
    async fn list_submissions(&self, query: SubmissionListQuery) -> Result<Vec<Submission>>;

    /// 评分管理方法
    // 创建评分；submission_id 唯一约束是重复评分的最终防线
    async fn create_grade(
        &self,
        submission_id: i64,
        grader_id: i64,
        grade: CreateGradeRequest,
    ) -> Result<Grade>;
    async fn get_grade_by_id(&self, grade_id: i64) -> Result<Option<Grade>>;
    async fn get_grade_by_submission_id(&self, submission_id: i64) -> Result<Option<Grade>>;
    // 更新评分；graded_at 每次刷新
    async fn update_grade(&self, grade_id: i64, update: UpdateGradeRequest)
    -> Result<Option<Grade>>;

    /// 评分评论方法
    async fn create_grade_comment(
        &self,
        grade_id: i64,
        author_id: i64,
        text: &str,
    ) -> Result<GradeComment>;
    // 列出某个评分下的评论，按创建时间倒序
    async fn list_grade_comments(&self, grade_id: i64) -> Result<Vec<GradeComment>>;
    // 列出用户可见的评论（提交人本人或所属课程教师），可按评分过滤
    async fn list_comments_visible_to(
        &self,
        user_id: i64,
        grade_id: Option<i64>,
    ) -> Result<Vec<GradeComment>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
