//! 课程服务
//!
//! 课程创建与成员管理。变更成员后返回重新加载的课程快照，
//! 调用方拿到的始终是最新的成员集合。

use std::sync::Arc;

use tracing::info;

use crate::errors::{OcmsError, Result};
use crate::models::courses::entities::Course;
use crate::models::courses::requests::{CourseListQuery, CreateCourseRequest};
use crate::models::users::entities::User;
use crate::storage::Storage;
use crate::utils::validate::validate_course_title;
use crate::validators;

pub struct CourseService {
    storage: Arc<dyn Storage>,
}

impl CourseService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// 创建课程，创建者在同一事务内写入教师集合
    ///
    /// 创建者资格由边界层把关，这里只做模式级的标题检查。
    pub async fn create_course(
        &self,
        creator: &User,
        request: CreateCourseRequest,
    ) -> Result<Course> {
        validate_course_title(&request.title).map_err(OcmsError::validation)?;

        let course = self.storage.create_course(request, creator.id).await?;
        info!("Course {} created by user {}", course.id, creator.id);
        Ok(course)
    }

    pub async fn get_course(&self, course_id: i64) -> Result<Course> {
        self.storage
            .get_course_by_id(course_id)
            .await?
            .ok_or_else(|| OcmsError::not_found(format!("Course {course_id} not found")))
    }

    pub async fn list_courses(&self, query: CourseListQuery) -> Result<Vec<Course>> {
        self.storage.list_courses(query).await
    }

    /// 删除课程及其下所有讲座、作业、提交、评分（级联）
    pub async fn delete_course(&self, principal: &User, course_id: i64) -> Result<()> {
        let course = self.get_course(course_id).await?;
        validators::validate_user_is_course_teacher(&course, principal)?;

        self.storage.delete_course(course_id).await?;
        info!("Course {} deleted by user {}", course_id, principal.id);
        Ok(())
    }

    /// 将学生加入课程
    ///
    /// 校验顺序固定：课程存在 → 用户存在 → 角色 → 未重复加入。
    pub async fn add_student(
        &self,
        principal: &User,
        course_id: i64,
        student_id: i64,
    ) -> Result<Course> {
        let course = self.get_course(course_id).await?;
        validators::validate_user_is_course_teacher(&course, principal)?;

        let student = self
            .storage
            .get_user_by_id(student_id)
            .await?
            .ok_or_else(|| OcmsError::not_found(format!("User {student_id} not found")))?;

        validators::validate_user_is_student(&student)?;
        validators::validate_student_not_enrolled(&course, &student)?;

        self.storage.add_course_student(course_id, student_id).await?;
        info!("Student {} enrolled in course {}", student_id, course_id);

        self.get_course(course_id).await
    }

    /// 将学生移出课程；用户存在但本就不在课程中时静默成功
    pub async fn remove_student(
        &self,
        principal: &User,
        course_id: i64,
        student_id: i64,
    ) -> Result<Course> {
        let course = self.get_course(course_id).await?;
        validators::validate_user_is_course_teacher(&course, principal)?;

        self.storage
            .get_user_by_id(student_id)
            .await?
            .ok_or_else(|| OcmsError::not_found(format!("User {student_id} not found")))?;

        let removed = self
            .storage
            .remove_course_student(course_id, student_id)
            .await?;
        if removed {
            info!("Student {} removed from course {}", student_id, course_id);
        }

        self.get_course(course_id).await
    }

    /// 将另一名教师加入课程教师集合
    pub async fn add_teacher(
        &self,
        principal: &User,
        course_id: i64,
        teacher_id: i64,
    ) -> Result<Course> {
        let course = self.get_course(course_id).await?;
        validators::validate_user_is_course_teacher(&course, principal)?;

        let teacher = self
            .storage
            .get_user_by_id(teacher_id)
            .await?
            .ok_or_else(|| OcmsError::not_found(format!("User {teacher_id} not found")))?;

        validators::validate_user_is_teacher(&teacher)?;
        validators::validate_teacher_not_assigned(&course, &teacher)?;

        self.storage.add_course_teacher(course_id, teacher_id).await?;
        info!("Teacher {} assigned to course {}", teacher_id, course_id);

        self.get_course(course_id).await
    }

    pub async fn is_teacher_of(&self, user: &User, course_id: i64) -> Result<bool> {
        Ok(self.get_course(course_id).await?.has_teacher(user.id))
    }

    pub async fn is_student_of(&self, user: &User, course_id: i64) -> Result<bool> {
        Ok(self.get_course(course_id).await?.has_student(user.id))
    }
}
