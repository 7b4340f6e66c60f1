//! 评分存储操作

use super::{SeaOrmStorage, is_unique_violation};
use crate::entity::grades::{ActiveModel, Column, Entity as Grades};
use crate::errors::{OcmsError, Result};
use crate::models::grades::{
    entities::Grade,
    requests::{CreateGradeRequest, UpdateGradeRequest},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

impl SeaOrmStorage {
    /// 创建评分
    ///
    /// submission_id 唯一约束在此兜底：同一提交的并发重复评分
    /// 最多只有一个成功，冲突映射为校验错误。
    pub async fn create_grade_impl(
        &self,
        submission_id: i64,
        grader_id: i64,
        req: CreateGradeRequest,
    ) -> Result<Grade> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            submission_id: Set(submission_id),
            grader_id: Set(grader_id),
            score: Set(req.score),
            comment: Set(req.comment),
            graded_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                OcmsError::validation("Grade already exists. Use update instead.")
            } else {
                OcmsError::database_operation(format!("创建评分失败: {e}"))
            }
        })?;

        Ok(result.into_grade())
    }

    /// 通过 ID 获取评分
    pub async fn get_grade_by_id_impl(&self, grade_id: i64) -> Result<Option<Grade>> {
        let result = Grades::find_by_id(grade_id)
            .one(&self.db)
            .await
            .map_err(|e| OcmsError::database_operation(format!("查询评分失败: {e}")))?;

        Ok(result.map(|m| m.into_grade()))
    }

    /// 通过提交 ID 获取评分
    pub async fn get_grade_by_submission_id_impl(
        &self,
        submission_id: i64,
    ) -> Result<Option<Grade>> {
        let result = Grades::find()
            .filter(Column::SubmissionId.eq(submission_id))
            .one(&self.db)
            .await
            .map_err(|e| OcmsError::database_operation(format!("查询评分失败: {e}")))?;

        Ok(result.map(|m| m.into_grade()))
    }

    /// 更新评分；graded_at 每次变更时刷新
    pub async fn update_grade_impl(
        &self,
        grade_id: i64,
        update: UpdateGradeRequest,
    ) -> Result<Option<Grade>> {
        // 先检查评分是否存在
        let existing = Grades::find_by_id(grade_id)
            .one(&self.db)
            .await
            .map_err(|e| OcmsError::database_operation(format!("查询评分失败: {e}")))?;

        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(grade_id),
            graded_at: Set(now),
            ..Default::default()
        };

        if let Some(score) = update.score {
            model.score = Set(score);
        }

        if let Some(comment) = update.comment {
            model.comment = Set(Some(comment));
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| OcmsError::database_operation(format!("更新评分失败: {e}")))?;

        Ok(Some(result.into_grade()))
    }
}
