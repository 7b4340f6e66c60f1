//! 提交存储操作

use super::{SeaOrmStorage, is_unique_violation};
use crate::entity::grades::{Column as GradeColumn, Entity as Grades};
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions, Model as SubmissionModel};
use crate::errors::{OcmsError, Result};
use crate::models::submissions::{
    entities::Submission,
    requests::{CreateSubmissionRequest, SubmissionListQuery, UpdateSubmissionRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建提交
    ///
    /// (assignment_id, student_id) 唯一索引在此兜底：并发的重复创建
    /// 最多只有一个成功，冲突映射为校验错误。
    pub async fn create_submission_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
        req: CreateSubmissionRequest,
    ) -> Result<Submission> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            assignment_id: Set(assignment_id),
            student_id: Set(student_id),
            text: Set(req.text),
            attachment: Set(req.attachment),
            submitted_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                OcmsError::validation(
                    "Submission already exists for this assignment. Use update instead.",
                )
            } else {
                OcmsError::database_operation(format!("创建提交失败: {e}"))
            }
        })?;

        Ok(result.into_submission(None))
    }

    /// 通过 ID 获取提交（含评分引用）
    pub async fn get_submission_by_id_impl(
        &self,
        submission_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(|e| OcmsError::database_operation(format!("查询提交失败: {e}")))?;

        match result {
            Some(model) => Ok(Some(self.hydrate_submission(model).await?)),
            None => Ok(None),
        }
    }

    /// 获取某学生对某作业的提交
    pub async fn get_submission_by_assignment_and_student_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find()
            .filter(
                Condition::all()
                    .add(Column::AssignmentId.eq(assignment_id))
                    .add(Column::StudentId.eq(student_id)),
            )
            .one(&self.db)
            .await
            .map_err(|e| OcmsError::database_operation(format!("查询提交失败: {e}")))?;

        match result {
            Some(model) => Ok(Some(self.hydrate_submission(model).await?)),
            None => Ok(None),
        }
    }

    /// 更新提交内容；submitted_at 保持创建时的值
    pub async fn update_submission_impl(
        &self,
        submission_id: i64,
        update: UpdateSubmissionRequest,
    ) -> Result<Option<Submission>> {
        // 先检查提交是否存在
        let existing = Submissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(|e| OcmsError::database_operation(format!("查询提交失败: {e}")))?;

        if existing.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(submission_id),
            ..Default::default()
        };

        if let Some(text) = update.text {
            model.text = Set(text);
        }

        if let Some(attachment) = update.attachment {
            model.attachment = Set(Some(attachment));
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| OcmsError::database_operation(format!("更新提交失败: {e}")))?;

        Ok(Some(self.hydrate_submission(result).await?))
    }

    /// 列出提交，按提交时间倒序
    pub async fn list_submissions_impl(
        &self,
        query: SubmissionListQuery,
    ) -> Result<Vec<Submission>> {
        let mut select = Submissions::find();

        if let Some(assignment_id) = query.assignment_id {
            select = select.filter(Column::AssignmentId.eq(assignment_id));
        }

        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }

        let models = select
            .order_by_desc(Column::SubmittedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| OcmsError::database_operation(format!("查询提交列表失败: {e}")))?;

        let mut submissions = Vec::with_capacity(models.len());
        for model in models {
            submissions.push(self.hydrate_submission(model).await?);
        }

        Ok(submissions)
    }

    /// 填充显式评分引用
    async fn hydrate_submission(&self, model: SubmissionModel) -> Result<Submission> {
        let grade = Grades::find()
            .filter(GradeColumn::SubmissionId.eq(model.id))
            .one(&self.db)
            .await
            .map_err(|e| OcmsError::database_operation(format!("查询评分失败: {e}")))?;

        Ok(model.into_submission(grade.map(|g| g.id)))
    }
}
