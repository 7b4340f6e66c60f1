//! 提交服务
//!
//! 一名学生对一份作业最多一条提交。两种提交入口并存：
//! create_submission 遇到已有提交直接失败，create_or_update_submission
//! 在未评分时原地覆盖。评分后提交内容冻结。

use std::sync::Arc;

use tracing::info;

use crate::errors::{OcmsError, Result};
use crate::models::submissions::entities::Submission;
use crate::models::submissions::requests::{
    CreateSubmissionRequest, SubmissionListQuery, UpdateSubmissionRequest,
};
use crate::models::users::entities::User;
use crate::permissions::{self, Resource};
use crate::storage::Storage;
use crate::validators;

pub struct SubmissionService {
    storage: Arc<dyn Storage>,
}

impl SubmissionService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// 创建提交；该学生已提交过时失败
    ///
    /// 预检之外，(assignment, student) 唯一索引兜底并发窗口，
    /// 冲突在存储层映射为 Validation。
    pub async fn create_submission(
        &self,
        student: &User,
        assignment_id: i64,
        request: CreateSubmissionRequest,
    ) -> Result<Submission> {
        let course =
            permissions::course_of(&self.storage, Resource::Assignment(assignment_id)).await?;
        validators::validate_student_is_enrolled(&course, student)?;

        let submission = self
            .storage
            .create_submission(assignment_id, student.id, request)
            .await?;
        info!(
            "Submission {} created by student {} for assignment {}",
            submission.id, student.id, assignment_id
        );
        Ok(submission)
    }

    /// 创建或覆盖提交；已评分的提交拒绝覆盖
    ///
    /// 覆盖只改内容字段，submitted_at 保留首次提交时间。
    pub async fn create_or_update_submission(
        &self,
        student: &User,
        assignment_id: i64,
        request: CreateSubmissionRequest,
    ) -> Result<Submission> {
        let course =
            permissions::course_of(&self.storage, Resource::Assignment(assignment_id)).await?;
        validators::validate_student_is_enrolled(&course, student)?;

        match self
            .storage
            .get_submission_by_assignment_and_student(assignment_id, student.id)
            .await?
        {
            Some(existing) => {
                validators::validate_submission_not_graded(&existing)?;
                let patch = UpdateSubmissionRequest {
                    text: Some(request.text),
                    attachment: request.attachment,
                };
                self.storage
                    .update_submission(existing.id, patch)
                    .await?
                    .ok_or_else(|| {
                        OcmsError::not_found(format!("Submission {} not found", existing.id))
                    })
            }
            None => {
                self.storage
                    .create_submission(assignment_id, student.id, request)
                    .await
            }
        }
    }

    /// 更新提交内容；先检查未评分，再检查作者身份
    pub async fn update_submission(
        &self,
        actor: &User,
        submission_id: i64,
        patch: UpdateSubmissionRequest,
    ) -> Result<Submission> {
        let submission = self.get_submission(submission_id).await?;

        validators::validate_submission_not_graded(&submission)?;
        validators::validate_user_is_submission_owner(&submission, actor)?;

        self.storage
            .update_submission(submission_id, patch)
            .await?
            .ok_or_else(|| OcmsError::not_found(format!("Submission {submission_id} not found")))
    }

    /// 提交可见性：作者本人或所属课程教师
    pub async fn can_view_submission(&self, user: &User, submission_id: i64) -> Result<bool> {
        let submission = self.get_submission(submission_id).await?;
        if submission.student_id == user.id {
            return Ok(true);
        }

        let course =
            permissions::course_of(&self.storage, Resource::Submission(submission_id)).await?;
        Ok(course.has_teacher(user.id))
    }

    pub async fn get_submission(&self, submission_id: i64) -> Result<Submission> {
        self.storage
            .get_submission_by_id(submission_id)
            .await?
            .ok_or_else(|| OcmsError::not_found(format!("Submission {submission_id} not found")))
    }

    /// 列出提交，等值过滤，新提交在前
    pub async fn list_submissions(&self, query: SubmissionListQuery) -> Result<Vec<Submission>> {
        self.storage.list_submissions(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::grades::requests::CreateGradeRequest;
    use crate::models::users::entities::UserRole;
    use crate::services::test_support;

    #[tokio::test]
    async fn test_enrolled_student_submits() {
        let ctx = test_support::setup().await;
        let service = SubmissionService::new(ctx.storage.clone());
        let lecture = test_support::create_lecture(&ctx).await;
        let assignment = test_support::create_assignment(&ctx, lecture.id).await;

        let submission = service
            .create_submission(
                &ctx.student,
                assignment.id,
                CreateSubmissionRequest {
                    text: "my answer".to_string(),
                    attachment: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(submission.student_id, ctx.student.id);
        assert!(!submission.is_graded());
    }

    #[tokio::test]
    async fn test_unenrolled_student_rejected() {
        let ctx = test_support::setup().await;
        let service = SubmissionService::new(ctx.storage.clone());
        let lecture = test_support::create_lecture(&ctx).await;
        let assignment = test_support::create_assignment(&ctx, lecture.id).await;
        let stranger = test_support::create_user(&ctx.storage, "zoe", UserRole::Student).await;

        let result = service
            .create_submission(&stranger, assignment.id, CreateSubmissionRequest::default())
            .await;
        assert!(matches!(result, Err(OcmsError::NotEnrolled(_))));
    }

    #[tokio::test]
    async fn test_duplicate_submission_rejected() {
        let ctx = test_support::setup().await;
        let service = SubmissionService::new(ctx.storage.clone());
        let lecture = test_support::create_lecture(&ctx).await;
        let assignment = test_support::create_assignment(&ctx, lecture.id).await;

        test_support::create_submission(&ctx, assignment.id, ctx.student.id).await;

        let result = service
            .create_submission(
                &ctx.student,
                assignment.id,
                CreateSubmissionRequest {
                    text: "second try".to_string(),
                    attachment: None,
                },
            )
            .await;
        assert!(matches!(result, Err(OcmsError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_or_update_overwrites_until_graded() {
        let ctx = test_support::setup().await;
        let service = SubmissionService::new(ctx.storage.clone());
        let lecture = test_support::create_lecture(&ctx).await;
        let assignment = test_support::create_assignment(&ctx, lecture.id).await;

        let first = service
            .create_or_update_submission(
                &ctx.student,
                assignment.id,
                CreateSubmissionRequest {
                    text: "draft".to_string(),
                    attachment: None,
                },
            )
            .await
            .unwrap();

        let second = service
            .create_or_update_submission(
                &ctx.student,
                assignment.id,
                CreateSubmissionRequest {
                    text: "final".to_string(),
                    attachment: Some("report.pdf".to_string()),
                },
            )
            .await
            .unwrap();

        // 覆盖而不是新建，首次提交时间保留
        assert_eq!(second.id, first.id);
        assert_eq!(second.text, "final");
        assert_eq!(second.submitted_at, first.submitted_at);

        ctx.storage
            .create_grade(
                first.id,
                ctx.teacher.id,
                CreateGradeRequest {
                    score: 90,
                    comment: None,
                },
            )
            .await
            .unwrap();

        let after_grading = service
            .create_or_update_submission(
                &ctx.student,
                assignment.id,
                CreateSubmissionRequest {
                    text: "too late".to_string(),
                    attachment: None,
                },
            )
            .await;
        assert!(matches!(after_grading, Err(OcmsError::AlreadyGraded(_))));
    }

    #[tokio::test]
    async fn test_update_checks_grading_before_ownership() {
        let ctx = test_support::setup().await;
        let service = SubmissionService::new(ctx.storage.clone());
        let lecture = test_support::create_lecture(&ctx).await;
        let assignment = test_support::create_assignment(&ctx, lecture.id).await;
        let submission = test_support::create_submission(&ctx, assignment.id, ctx.student.id).await;
        let other = test_support::create_user(&ctx.storage, "ivan", UserRole::Student).await;

        // 未评分、非作者：报作者错误
        assert!(matches!(
            service
                .update_submission(&other, submission.id, UpdateSubmissionRequest::default())
                .await,
            Err(OcmsError::PermissionDenied(_))
        ));

        ctx.storage
            .create_grade(
                submission.id,
                ctx.teacher.id,
                CreateGradeRequest {
                    score: 75,
                    comment: None,
                },
            )
            .await
            .unwrap();

        // 已评分时对任何人（包括非作者）先报冻结错误
        for actor in [&ctx.student, &other] {
            assert!(matches!(
                service
                    .update_submission(actor, submission.id, UpdateSubmissionRequest::default())
                    .await,
                Err(OcmsError::AlreadyGraded(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_submission_visibility() {
        let ctx = test_support::setup().await;
        let service = SubmissionService::new(ctx.storage.clone());
        let lecture = test_support::create_lecture(&ctx).await;
        let assignment = test_support::create_assignment(&ctx, lecture.id).await;
        let submission = test_support::create_submission(&ctx, assignment.id, ctx.student.id).await;

        let classmate = test_support::create_user(&ctx.storage, "judy", UserRole::Student).await;
        ctx.storage
            .add_course_student(ctx.course.id, classmate.id)
            .await
            .unwrap();
        let other_teacher = test_support::create_user(&ctx.storage, "oscar", UserRole::Teacher).await;

        assert!(service.can_view_submission(&ctx.student, submission.id).await.unwrap());
        assert!(service.can_view_submission(&ctx.teacher, submission.id).await.unwrap());
        // 同课学生看不到他人提交
        assert!(!service.can_view_submission(&classmate, submission.id).await.unwrap());
        // 非本课程的教师同样不可见
        assert!(!service.can_view_submission(&other_teacher, submission.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_submissions_filters() {
        let ctx = test_support::setup().await;
        let service = SubmissionService::new(ctx.storage.clone());
        let lecture = test_support::create_lecture(&ctx).await;
        let assignment = test_support::create_assignment(&ctx, lecture.id).await;
        let other_assignment = test_support::create_assignment(&ctx, lecture.id).await;

        test_support::create_submission(&ctx, assignment.id, ctx.student.id).await;
        test_support::create_submission(&ctx, other_assignment.id, ctx.student.id).await;

        let by_assignment = service
            .list_submissions(SubmissionListQuery {
                assignment_id: Some(assignment.id),
                student_id: None,
            })
            .await
            .unwrap();
        assert_eq!(by_assignment.len(), 1);

        let by_student = service
            .list_submissions(SubmissionListQuery {
                assignment_id: None,
                student_id: Some(ctx.student.id),
            })
            .await
            .unwrap();
        assert_eq!(by_student.len(), 2);
    }
}
