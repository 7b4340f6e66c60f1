//! 服务层测试工具
//!
//! 每个测试用独立的内存 SQLite：连接池限制为单连接，
//! 否则池内每条连接都会拿到各自空白的 :memory: 库。

use std::sync::Arc;

use sea_orm::{ConnectOptions, Database};

use crate::models::assignments::entities::Assignment;
use crate::models::assignments::requests::CreateAssignmentRequest;
use crate::models::courses::entities::Course;
use crate::models::courses::requests::CreateCourseRequest;
use crate::models::lectures::entities::Lecture;
use crate::models::lectures::requests::CreateLectureRequest;
use crate::models::submissions::entities::Submission;
use crate::models::submissions::requests::CreateSubmissionRequest;
use crate::models::users::entities::{User, UserRole};
use crate::models::users::requests::CreateUserRequest;
use crate::storage::Storage;
use crate::storage::sea_orm_storage::SeaOrmStorage;

/// 预置了一名课程教师和一名已加入学生的测试环境
pub struct TestContext {
    pub storage: Arc<dyn Storage>,
    pub teacher: User,
    pub student: User,
    pub course: Course,
}

/// 建立内存数据库存储并跑迁移
pub async fn memory_storage() -> Arc<dyn Storage> {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).sqlx_logging(false);

    let db = Database::connect(opt)
        .await
        .expect("connect in-memory sqlite");
    let storage = SeaOrmStorage::from_connection(db)
        .await
        .expect("run migrations");

    Arc::new(storage)
}

pub async fn setup() -> TestContext {
    let storage = memory_storage().await;

    let teacher = create_user(&storage, "teacher1", UserRole::Teacher).await;
    let student = create_user(&storage, "student1", UserRole::Student).await;

    let course = storage
        .create_course(
            CreateCourseRequest {
                title: "Algorithms".to_string(),
                description: Some("Sorting and graphs".to_string()),
            },
            teacher.id,
        )
        .await
        .expect("create course");

    storage
        .add_course_student(course.id, student.id)
        .await
        .expect("enroll student");

    // 重新读取以拿到最新的成员集合
    let course = storage
        .get_course_by_id(course.id)
        .await
        .expect("reload course")
        .expect("course exists");

    TestContext {
        storage,
        teacher,
        student,
        course,
    }
}

pub async fn create_user(storage: &Arc<dyn Storage>, username: &str, role: UserRole) -> User {
    storage
        .create_user(CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            role,
        })
        .await
        .expect("create user")
}

pub async fn create_lecture(ctx: &TestContext) -> Lecture {
    ctx.storage
        .create_lecture(
            CreateLectureRequest {
                course_id: ctx.course.id,
                topic: "Quicksort".to_string(),
                attachment: None,
            },
            ctx.teacher.id,
        )
        .await
        .expect("create lecture")
}

pub async fn create_assignment(ctx: &TestContext, lecture_id: i64) -> Assignment {
    ctx.storage
        .create_assignment(
            CreateAssignmentRequest {
                lecture_id,
                text: "Implement quicksort".to_string(),
                due_date: None,
            },
            ctx.teacher.id,
        )
        .await
        .expect("create assignment")
}

pub async fn create_submission(ctx: &TestContext, assignment_id: i64, student_id: i64) -> Submission {
    ctx.storage
        .create_submission(
            assignment_id,
            student_id,
            CreateSubmissionRequest {
                text: "fn quicksort() {}".to_string(),
                attachment: None,
            },
        )
        .await
        .expect("create submission")
}
