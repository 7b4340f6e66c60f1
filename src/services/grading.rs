//! 评分服务
//!
//! 每个提交最多一条评分，由课程教师创建和修改；评分可更新（graded_at
//! 每次刷新），评论只增不改，课程教师与提交作者双方可见、可发。

use std::sync::Arc;

use tracing::info;

use crate::errors::{OcmsError, Result};
use crate::models::grades::entities::{Grade, GradeComment};
use crate::models::grades::requests::{CreateGradeRequest, UpdateGradeRequest};
use crate::models::submissions::entities::Submission;
use crate::models::users::entities::User;
use crate::permissions::{self, Resource};
use crate::storage::Storage;
use crate::utils::validate::validate_score;
use crate::validators;

pub struct GradingService {
    storage: Arc<dyn Storage>,
}

impl GradingService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    async fn resolve_submission(&self, submission_id: i64) -> Result<Submission> {
        self.storage
            .get_submission_by_id(submission_id)
            .await?
            .ok_or_else(|| OcmsError::not_found(format!("Submission {submission_id} not found")))
    }

    /// 为提交创建评分
    ///
    /// 预检之外，submission_id 唯一约束兜底并发窗口，
    /// 冲突在存储层映射为 Validation。
    pub async fn create_grade(
        &self,
        grader: &User,
        submission_id: i64,
        request: CreateGradeRequest,
    ) -> Result<Grade> {
        let submission = self.resolve_submission(submission_id).await?;
        let course =
            permissions::course_of(&self.storage, Resource::Submission(submission_id)).await?;

        validators::validate_user_is_course_teacher(&course, grader)?;
        validators::validate_grade_not_created(&submission)?;
        validate_score(request.score).map_err(OcmsError::validation)?;

        let grade = self
            .storage
            .create_grade(submission_id, grader.id, request)
            .await?;
        info!(
            "Grade {} created for submission {} by teacher {}",
            grade.id, submission_id, grader.id
        );
        Ok(grade)
    }

    /// 更新评分；graded_at 刷新为当前时间
    pub async fn update_grade(
        &self,
        actor: &User,
        grade_id: i64,
        patch: UpdateGradeRequest,
    ) -> Result<Grade> {
        let course = permissions::course_of(&self.storage, Resource::Grade(grade_id)).await?;
        validators::validate_user_is_course_teacher(&course, actor)?;

        if let Some(score) = patch.score {
            validate_score(score).map_err(OcmsError::validation)?;
        }

        self.storage
            .update_grade(grade_id, patch)
            .await?
            .ok_or_else(|| OcmsError::not_found(format!("Grade {grade_id} not found")))
    }

    /// 评分可见性：提交作者或所属课程教师
    pub async fn can_view_grade(&self, user: &User, grade_id: i64) -> Result<bool> {
        let grade = self.get_grade(grade_id).await?;
        let submission = self.resolve_submission(grade.submission_id).await?;
        if submission.student_id == user.id {
            return Ok(true);
        }

        let course = permissions::course_of(&self.storage, Resource::Grade(grade_id)).await?;
        Ok(course.has_teacher(user.id))
    }

    /// 在评分下追加评论
    pub async fn create_comment(
        &self,
        author: &User,
        grade_id: i64,
        text: &str,
    ) -> Result<GradeComment> {
        let grade = self.get_grade(grade_id).await?;
        let submission = self.resolve_submission(grade.submission_id).await?;
        let course = permissions::course_of(&self.storage, Resource::Grade(grade_id)).await?;

        validators::validate_user_can_comment(&course, &submission, author)?;

        let comment = self
            .storage
            .create_grade_comment(grade_id, author.id, text)
            .await?;
        info!("Comment {} added to grade {}", comment.id, grade_id);
        Ok(comment)
    }

    /// 用户可见的评论：本人提交的评分下的，或任教课程下的；可按评分过滤
    pub async fn comments_visible_to(
        &self,
        user: &User,
        grade_id: Option<i64>,
    ) -> Result<Vec<GradeComment>> {
        self.storage.list_comments_visible_to(user.id, grade_id).await
    }

    pub async fn get_grade(&self, grade_id: i64) -> Result<Grade> {
        self.storage
            .get_grade_by_id(grade_id)
            .await?
            .ok_or_else(|| OcmsError::not_found(format!("Grade {grade_id} not found")))
    }

    pub async fn get_grade_by_submission(&self, submission_id: i64) -> Result<Option<Grade>> {
        self.storage.get_grade_by_submission_id(submission_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::services::test_support;

    struct GradingFixture {
        ctx: test_support::TestContext,
        service: GradingService,
        submission_id: i64,
    }

    async fn fixture() -> GradingFixture {
        let ctx = test_support::setup().await;
        let service = GradingService::new(ctx.storage.clone());
        let lecture = test_support::create_lecture(&ctx).await;
        let assignment = test_support::create_assignment(&ctx, lecture.id).await;
        let submission = test_support::create_submission(&ctx, assignment.id, ctx.student.id).await;
        GradingFixture {
            ctx,
            service,
            submission_id: submission.id,
        }
    }

    #[tokio::test]
    async fn test_teacher_grades_submission() {
        let f = fixture().await;

        let grade = f
            .service
            .create_grade(
                &f.ctx.teacher,
                f.submission_id,
                CreateGradeRequest {
                    score: 85,
                    comment: Some("Good work".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(grade.score, 85);
        assert_eq!(grade.grader_id, f.ctx.teacher.id);

        // 提交快照带上评分引用
        let submission = f
            .ctx
            .storage
            .get_submission_by_id(f.submission_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(submission.grade_id, Some(grade.id));
    }

    #[tokio::test]
    async fn test_only_course_teacher_grades() {
        let f = fixture().await;
        let outsider = test_support::create_user(&f.ctx.storage, "wendy", UserRole::Teacher).await;

        for actor in [&f.ctx.student, &outsider] {
            assert!(matches!(
                f.service
                    .create_grade(
                        actor,
                        f.submission_id,
                        CreateGradeRequest {
                            score: 60,
                            comment: None,
                        },
                    )
                    .await,
                Err(OcmsError::PermissionDenied(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_second_grade_rejected() {
        let f = fixture().await;

        f.service
            .create_grade(
                &f.ctx.teacher,
                f.submission_id,
                CreateGradeRequest {
                    score: 70,
                    comment: None,
                },
            )
            .await
            .unwrap();

        let second = f
            .service
            .create_grade(
                &f.ctx.teacher,
                f.submission_id,
                CreateGradeRequest {
                    score: 95,
                    comment: None,
                },
            )
            .await;
        assert!(matches!(second, Err(OcmsError::Validation(_))));
    }

    #[tokio::test]
    async fn test_duplicate_grade_stopped_by_unique_constraint() {
        let f = fixture().await;

        // 绕过服务层预检，直接对同一提交写两条评分：
        // submission_id 唯一约束兜底，第二次在存储层映射为校验错误
        f.ctx
            .storage
            .create_grade(
                f.submission_id,
                f.ctx.teacher.id,
                CreateGradeRequest {
                    score: 70,
                    comment: None,
                },
            )
            .await
            .unwrap();

        let second = f
            .ctx
            .storage
            .create_grade(
                f.submission_id,
                f.ctx.teacher.id,
                CreateGradeRequest {
                    score: 95,
                    comment: None,
                },
            )
            .await;
        assert!(matches!(second, Err(OcmsError::Validation(_))));
    }

    #[tokio::test]
    async fn test_score_bounds_enforced() {
        let f = fixture().await;

        for score in [-1, 101] {
            assert!(matches!(
                f.service
                    .create_grade(
                        &f.ctx.teacher,
                        f.submission_id,
                        CreateGradeRequest {
                            score,
                            comment: None,
                        },
                    )
                    .await,
                Err(OcmsError::Validation(_))
            ));
        }

        // 边界值有效
        let grade = f
            .service
            .create_grade(
                &f.ctx.teacher,
                f.submission_id,
                CreateGradeRequest {
                    score: 100,
                    comment: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(grade.score, 100);

        assert!(matches!(
            f.service
                .update_grade(
                    &f.ctx.teacher,
                    grade.id,
                    UpdateGradeRequest {
                        score: Some(101),
                        comment: None,
                    },
                )
                .await,
            Err(OcmsError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_update_grade_refreshes() {
        let f = fixture().await;

        let grade = f
            .service
            .create_grade(
                &f.ctx.teacher,
                f.submission_id,
                CreateGradeRequest {
                    score: 50,
                    comment: None,
                },
            )
            .await
            .unwrap();

        let updated = f
            .service
            .update_grade(
                &f.ctx.teacher,
                grade.id,
                UpdateGradeRequest {
                    score: Some(65),
                    comment: Some("Regraded".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.score, 65);
        assert_eq!(updated.comment.as_deref(), Some("Regraded"));
        assert!(updated.graded_at >= grade.graded_at);

        assert!(matches!(
            f.service
                .update_grade(&f.ctx.student, grade.id, UpdateGradeRequest::default())
                .await,
            Err(OcmsError::PermissionDenied(_))
        ));
    }

    #[tokio::test]
    async fn test_grade_visibility() {
        let f = fixture().await;
        let classmate = test_support::create_user(&f.ctx.storage, "kate", UserRole::Student).await;
        f.ctx
            .storage
            .add_course_student(f.ctx.course.id, classmate.id)
            .await
            .unwrap();

        let grade = f
            .service
            .create_grade(
                &f.ctx.teacher,
                f.submission_id,
                CreateGradeRequest {
                    score: 80,
                    comment: None,
                },
            )
            .await
            .unwrap();

        assert!(f.service.can_view_grade(&f.ctx.student, grade.id).await.unwrap());
        assert!(f.service.can_view_grade(&f.ctx.teacher, grade.id).await.unwrap());
        assert!(!f.service.can_view_grade(&classmate, grade.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_comment_thread_and_visibility() {
        let f = fixture().await;
        let classmate = test_support::create_user(&f.ctx.storage, "leo", UserRole::Student).await;
        f.ctx
            .storage
            .add_course_student(f.ctx.course.id, classmate.id)
            .await
            .unwrap();

        let grade = f
            .service
            .create_grade(
                &f.ctx.teacher,
                f.submission_id,
                CreateGradeRequest {
                    score: 40,
                    comment: Some("See comments".to_string()),
                },
            )
            .await
            .unwrap();

        f.service
            .create_comment(&f.ctx.teacher, grade.id, "Please redo section 2")
            .await
            .unwrap();
        f.service
            .create_comment(&f.ctx.student, grade.id, "Will do")
            .await
            .unwrap();

        // 同课学生不能参与他人评分的讨论
        assert!(matches!(
            f.service.create_comment(&classmate, grade.id, "me too").await,
            Err(OcmsError::PermissionDenied(_))
        ));

        let teacher_view = f
            .service
            .comments_visible_to(&f.ctx.teacher, Some(grade.id))
            .await
            .unwrap();
        assert_eq!(teacher_view.len(), 2);
        // 新评论在前
        assert_eq!(teacher_view[0].text, "Will do");

        let student_view = f
            .service
            .comments_visible_to(&f.ctx.student, None)
            .await
            .unwrap();
        assert_eq!(student_view.len(), 2);

        let classmate_view = f
            .service
            .comments_visible_to(&classmate, None)
            .await
            .unwrap();
        assert!(classmate_view.is_empty());
    }

    #[tokio::test]
    async fn test_get_grade_by_submission() {
        let f = fixture().await;

        assert!(f
            .service
            .get_grade_by_submission(f.submission_id)
            .await
            .unwrap()
            .is_none());

        let grade = f
            .service
            .create_grade(
                &f.ctx.teacher,
                f.submission_id,
                CreateGradeRequest {
                    score: 55,
                    comment: None,
                },
            )
            .await
            .unwrap();

        let found = f
            .service
            .get_grade_by_submission(f.submission_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, grade.id);
    }
}
