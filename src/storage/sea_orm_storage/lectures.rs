//! 讲座存储操作

use super::SeaOrmStorage;
use crate::entity::lectures::{ActiveModel, Column, Entity as Lectures};
use crate::errors::{OcmsError, Result};
use crate::models::lectures::{
    entities::Lecture,
    requests::{CreateLectureRequest, UpdateLectureRequest},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建讲座
    pub async fn create_lecture_impl(
        &self,
        req: CreateLectureRequest,
        created_by: i64,
    ) -> Result<Lecture> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            course_id: Set(req.course_id),
            topic: Set(req.topic),
            attachment: Set(req.attachment),
            created_by: Set(created_by),
            created_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| OcmsError::database_operation(format!("创建讲座失败: {e}")))?;

        Ok(result.into_lecture())
    }

    /// 通过 ID 获取讲座
    pub async fn get_lecture_by_id_impl(&self, lecture_id: i64) -> Result<Option<Lecture>> {
        let result = Lectures::find_by_id(lecture_id)
            .one(&self.db)
            .await
            .map_err(|e| OcmsError::database_operation(format!("查询讲座失败: {e}")))?;

        Ok(result.map(|m| m.into_lecture()))
    }

    /// 更新讲座
    pub async fn update_lecture_impl(
        &self,
        lecture_id: i64,
        update: UpdateLectureRequest,
    ) -> Result<Option<Lecture>> {
        // 先检查讲座是否存在
        let existing = Lectures::find_by_id(lecture_id)
            .one(&self.db)
            .await
            .map_err(|e| OcmsError::database_operation(format!("查询讲座失败: {e}")))?;

        if existing.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(lecture_id),
            ..Default::default()
        };

        if let Some(topic) = update.topic {
            model.topic = Set(topic);
        }

        if let Some(attachment) = update.attachment {
            model.attachment = Set(Some(attachment));
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| OcmsError::database_operation(format!("更新讲座失败: {e}")))?;

        Ok(Some(result.into_lecture()))
    }

    /// 列出讲座，可按课程过滤，按创建时间倒序
    pub async fn list_lectures_impl(&self, course_id: Option<i64>) -> Result<Vec<Lecture>> {
        let mut select = Lectures::find();

        if let Some(course_id) = course_id {
            select = select.filter(Column::CourseId.eq(course_id));
        }

        let models = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| OcmsError::database_operation(format!("查询讲座列表失败: {e}")))?;

        Ok(models.into_iter().map(|m| m.into_lecture()).collect())
    }
}
