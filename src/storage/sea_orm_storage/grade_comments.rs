//! 评分评论存储操作

use super::SeaOrmStorage;
use crate::entity::grade_comments::{
    ActiveModel, Column, Entity as GradeComments, Relation as GradeCommentRelation,
};
use crate::entity::grades::Relation as GradeRelation;
use crate::entity::lectures::Column as LectureColumn;
use crate::entity::submissions::{Column as SubmissionColumn, Relation as SubmissionRelation};
use crate::errors::{OcmsError, Result};
use crate::models::grades::entities::GradeComment;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Set,
};

impl SeaOrmStorage {
    /// 创建评分评论
    pub async fn create_grade_comment_impl(
        &self,
        grade_id: i64,
        author_id: i64,
        text: &str,
    ) -> Result<GradeComment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            grade_id: Set(grade_id),
            author_id: Set(author_id),
            text: Set(text.to_string()),
            created_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| OcmsError::database_operation(format!("创建评分评论失败: {e}")))?;

        Ok(result.into_grade_comment())
    }

    /// 列出某个评分下的评论，按创建时间倒序
    pub async fn list_grade_comments_impl(&self, grade_id: i64) -> Result<Vec<GradeComment>> {
        let models = GradeComments::find()
            .filter(Column::GradeId.eq(grade_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| OcmsError::database_operation(format!("查询评分评论失败: {e}")))?;

        Ok(models.into_iter().map(|m| m.into_grade_comment()).collect())
    }

    /// 列出用户可见的评论
    ///
    /// 可见性：用户是评论所属提交的学生本人，或所属课程的教师。
    /// 两类分别查询后合并去重，按创建时间倒序。
    pub async fn list_comments_visible_to_impl(
        &self,
        user_id: i64,
        grade_id: Option<i64>,
    ) -> Result<Vec<GradeComment>> {
        // 本人提交的评分下的评论
        let mut own_select = GradeComments::find()
            .join(JoinType::InnerJoin, GradeCommentRelation::Grade.def())
            .join(JoinType::InnerJoin, GradeRelation::Submission.def())
            .filter(SubmissionColumn::StudentId.eq(user_id));

        if let Some(grade_id) = grade_id {
            own_select = own_select.filter(Column::GradeId.eq(grade_id));
        }

        let own = own_select
            .all(&self.db)
            .await
            .map_err(|e| OcmsError::database_operation(format!("查询评分评论失败: {e}")))?;

        // 用户任教课程下的评论
        let teacher_course_ids = self.teacher_course_ids_impl(user_id).await?;

        let teaching = if teacher_course_ids.is_empty() {
            vec![]
        } else {
            let mut teaching_select = GradeComments::find()
                .join(JoinType::InnerJoin, GradeCommentRelation::Grade.def())
                .join(JoinType::InnerJoin, GradeRelation::Submission.def())
                .join(JoinType::InnerJoin, SubmissionRelation::Assignment.def())
                .join(
                    JoinType::InnerJoin,
                    crate::entity::assignments::Relation::Lecture.def(),
                )
                .filter(LectureColumn::CourseId.is_in(teacher_course_ids));

            if let Some(grade_id) = grade_id {
                teaching_select = teaching_select.filter(Column::GradeId.eq(grade_id));
            }

            teaching_select
                .all(&self.db)
                .await
                .map_err(|e| OcmsError::database_operation(format!("查询评分评论失败: {e}")))?
        };

        // 合并去重，按创建时间倒序
        let mut comments: Vec<GradeComment> = own
            .into_iter()
            .chain(teaching)
            .map(|m| m.into_grade_comment())
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        comments.dedup_by_key(|c| c.id);

        Ok(comments)
    }
}
