//! 课程存储操作
//!
//! 课程创建与创建者写入教师集合在同一事务内完成，
//! 保证"创建者始终是课程教师"这一不变量对外不可见地建立。

use super::SeaOrmStorage;
use crate::entity::course_students::{
    ActiveModel as CourseStudentActiveModel, Column as CourseStudentColumn,
    Entity as CourseStudents,
};
use crate::entity::course_teachers::{
    ActiveModel as CourseTeacherActiveModel, Column as CourseTeacherColumn,
    Entity as CourseTeachers,
};
use crate::entity::courses::{ActiveModel, Column, Entity as Courses, Model as CourseModel};
use crate::errors::{OcmsError, Result};
use crate::models::courses::{
    entities::Course,
    requests::{CourseListQuery, CreateCourseRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建课程
    pub async fn create_course_impl(
        &self,
        req: CreateCourseRequest,
        created_by: i64,
    ) -> Result<Course> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| OcmsError::database_operation(format!("开启事务失败: {e}")))?;

        let model = ActiveModel {
            title: Set(req.title),
            description: Set(req.description),
            created_by: Set(created_by),
            created_at: Set(now),
            ..Default::default()
        };

        let course = model
            .insert(&txn)
            .await
            .map_err(|e| OcmsError::database_operation(format!("创建课程失败: {e}")))?;

        // 创建者自动加入教师集合
        let teacher = CourseTeacherActiveModel {
            course_id: Set(course.id),
            user_id: Set(created_by),
            added_at: Set(now),
            ..Default::default()
        };

        teacher
            .insert(&txn)
            .await
            .map_err(|e| OcmsError::database_operation(format!("写入课程教师失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| OcmsError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(course.into_course(vec![created_by], vec![]))
    }

    /// 通过 ID 获取课程（含成员集合）
    pub async fn get_course_by_id_impl(&self, course_id: i64) -> Result<Option<Course>> {
        let result = Courses::find_by_id(course_id)
            .one(&self.db)
            .await
            .map_err(|e| OcmsError::database_operation(format!("查询课程失败: {e}")))?;

        match result {
            Some(model) => Ok(Some(self.hydrate_course(model).await?)),
            None => Ok(None),
        }
    }

    /// 列出课程，按创建时间倒序
    pub async fn list_courses_impl(&self, query: CourseListQuery) -> Result<Vec<Course>> {
        let mut select = Courses::find();

        if let Some(teacher_id) = query.teacher_id {
            let course_ids = self.teacher_course_ids_impl(teacher_id).await?;
            select = select.filter(Column::Id.is_in(course_ids));
        }

        if let Some(student_id) = query.student_id {
            let rows = CourseStudents::find()
                .filter(CourseStudentColumn::UserId.eq(student_id))
                .all(&self.db)
                .await
                .map_err(|e| OcmsError::database_operation(format!("查询课程学生失败: {e}")))?;
            let course_ids: Vec<i64> = rows.iter().map(|r| r.course_id).collect();
            select = select.filter(Column::Id.is_in(course_ids));
        }

        let models = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| OcmsError::database_operation(format!("查询课程列表失败: {e}")))?;

        let mut courses = Vec::with_capacity(models.len());
        for model in models {
            courses.push(self.hydrate_course(model).await?);
        }

        Ok(courses)
    }

    /// 删除课程（外键级联删除讲座、作业、提交、评分、评论）
    pub async fn delete_course_impl(&self, course_id: i64) -> Result<bool> {
        let result = Courses::delete_by_id(course_id)
            .exec(&self.db)
            .await
            .map_err(|e| OcmsError::database_operation(format!("删除课程失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 向课程教师集合添加成员
    pub async fn add_course_teacher_impl(&self, course_id: i64, user_id: i64) -> Result<()> {
        let model = CourseTeacherActiveModel {
            course_id: Set(course_id),
            user_id: Set(user_id),
            added_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        model
            .insert(&self.db)
            .await
            .map_err(|e| OcmsError::database_operation(format!("添加课程教师失败: {e}")))?;

        Ok(())
    }

    /// 向课程学生集合添加成员
    pub async fn add_course_student_impl(&self, course_id: i64, user_id: i64) -> Result<()> {
        let model = CourseStudentActiveModel {
            course_id: Set(course_id),
            user_id: Set(user_id),
            added_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        model
            .insert(&self.db)
            .await
            .map_err(|e| OcmsError::database_operation(format!("添加课程学生失败: {e}")))?;

        Ok(())
    }

    /// 从课程学生集合移除成员（不存在时视为无操作）
    pub async fn remove_course_student_impl(&self, course_id: i64, user_id: i64) -> Result<bool> {
        let result = CourseStudents::delete_many()
            .filter(
                Condition::all()
                    .add(CourseStudentColumn::CourseId.eq(course_id))
                    .add(CourseStudentColumn::UserId.eq(user_id)),
            )
            .exec(&self.db)
            .await
            .map_err(|e| OcmsError::database_operation(format!("移除课程学生失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 用户作为教师参与的课程 ID 集合
    pub(crate) async fn teacher_course_ids_impl(&self, user_id: i64) -> Result<Vec<i64>> {
        let rows = CourseTeachers::find()
            .filter(CourseTeacherColumn::UserId.eq(user_id))
            .all(&self.db)
            .await
            .map_err(|e| OcmsError::database_operation(format!("查询课程教师失败: {e}")))?;

        Ok(rows.iter().map(|r| r.course_id).collect())
    }

    /// 加载课程的成员集合并转换为业务模型
    async fn hydrate_course(&self, model: CourseModel) -> Result<Course> {
        let teacher_rows = CourseTeachers::find()
            .filter(CourseTeacherColumn::CourseId.eq(model.id))
            .all(&self.db)
            .await
            .map_err(|e| OcmsError::database_operation(format!("查询课程教师失败: {e}")))?;

        let student_rows = CourseStudents::find()
            .filter(CourseStudentColumn::CourseId.eq(model.id))
            .all(&self.db)
            .await
            .map_err(|e| OcmsError::database_operation(format!("查询课程学生失败: {e}")))?;

        let teacher_ids = teacher_rows.iter().map(|r| r.user_id).collect();
        let student_ids = student_rows.iter().map(|r| r.user_id).collect();

        Ok(model.into_course(teacher_ids, student_ids))
    }
}
