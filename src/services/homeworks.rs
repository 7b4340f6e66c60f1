//! 作业服务
//!
//! 作业挂在讲座下，归属课程沿 作业 → 讲座 → 课程 链解析。

use std::sync::Arc;

use tracing::info;

use crate::errors::{OcmsError, Result};
use crate::models::assignments::entities::Assignment;
use crate::models::assignments::requests::{CreateAssignmentRequest, UpdateAssignmentRequest};
use crate::models::users::entities::User;
use crate::permissions::{self, Resource};
use crate::storage::Storage;
use crate::validators;

pub struct HomeworkService {
    storage: Arc<dyn Storage>,
}

impl HomeworkService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn create_assignment(
        &self,
        creator: &User,
        request: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        let course =
            permissions::course_of(&self.storage, Resource::Lecture(request.lecture_id)).await?;
        validators::validate_user_is_course_teacher(&course, creator)?;

        let assignment = self.storage.create_assignment(request, creator.id).await?;
        info!(
            "Assignment {} created in lecture {}",
            assignment.id, assignment.lecture_id
        );
        Ok(assignment)
    }

    pub async fn update_assignment(
        &self,
        actor: &User,
        assignment_id: i64,
        patch: UpdateAssignmentRequest,
    ) -> Result<Assignment> {
        let course =
            permissions::course_of(&self.storage, Resource::Assignment(assignment_id)).await?;
        validators::validate_user_is_course_teacher(&course, actor)?;

        self.storage
            .update_assignment(assignment_id, patch)
            .await?
            .ok_or_else(|| OcmsError::not_found(format!("Assignment {assignment_id} not found")))
    }

    pub async fn get_assignment(&self, assignment_id: i64) -> Result<Assignment> {
        self.storage
            .get_assignment_by_id(assignment_id)
            .await?
            .ok_or_else(|| OcmsError::not_found(format!("Assignment {assignment_id} not found")))
    }

    /// 列出作业，可按讲座过滤，新建在前
    pub async fn list_assignments(&self, lecture_id: Option<i64>) -> Result<Vec<Assignment>> {
        self.storage.list_assignments(lecture_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::services::test_support;
    use chrono::{TimeZone, Utc};

    #[tokio::test]
    async fn test_create_and_update_assignment() {
        let ctx = test_support::setup().await;
        let service = HomeworkService::new(ctx.storage.clone());
        let lecture = test_support::create_lecture(&ctx).await;

        let due = Utc.with_ymd_and_hms(2026, 1, 24, 12, 0, 0).unwrap();
        let assignment = service
            .create_assignment(
                &ctx.teacher,
                CreateAssignmentRequest {
                    lecture_id: lecture.id,
                    text: "Prove correctness".to_string(),
                    due_date: Some(due),
                },
            )
            .await
            .unwrap();
        assert_eq!(assignment.due_date, Some(due));

        let updated = service
            .update_assignment(
                &ctx.teacher,
                assignment.id,
                UpdateAssignmentRequest {
                    text: Some("Prove correctness and complexity".to_string()),
                    due_date: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.text, "Prove correctness and complexity");
        // 补丁未携带的字段保持不变
        assert_eq!(updated.due_date, Some(due));
    }

    #[tokio::test]
    async fn test_assignment_writes_need_course_teacher() {
        let ctx = test_support::setup().await;
        let service = HomeworkService::new(ctx.storage.clone());
        let lecture = test_support::create_lecture(&ctx).await;
        let outsider = test_support::create_user(&ctx.storage, "trent", UserRole::Teacher).await;

        let request = CreateAssignmentRequest {
            lecture_id: lecture.id,
            text: "Exercise".to_string(),
            due_date: None,
        };

        assert!(matches!(
            service.create_assignment(&outsider, request.clone()).await,
            Err(OcmsError::PermissionDenied(_))
        ));
        assert!(matches!(
            service.create_assignment(&ctx.student, request).await,
            Err(OcmsError::PermissionDenied(_))
        ));

        let assignment = test_support::create_assignment(&ctx, lecture.id).await;
        assert!(matches!(
            service
                .update_assignment(&ctx.student, assignment.id, UpdateAssignmentRequest::default())
                .await,
            Err(OcmsError::PermissionDenied(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_lecture_is_not_found() {
        let ctx = test_support::setup().await;
        let service = HomeworkService::new(ctx.storage.clone());

        assert!(matches!(
            service
                .create_assignment(
                    &ctx.teacher,
                    CreateAssignmentRequest {
                        lecture_id: 9999,
                        text: "Orphan".to_string(),
                        due_date: None,
                    },
                )
                .await,
            Err(OcmsError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_assignments_newest_first() {
        let ctx = test_support::setup().await;
        let service = HomeworkService::new(ctx.storage.clone());
        let lecture = test_support::create_lecture(&ctx).await;

        let first = test_support::create_assignment(&ctx, lecture.id).await;
        let second = test_support::create_assignment(&ctx, lecture.id).await;

        let listed = service.list_assignments(Some(lecture.id)).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed[0].id == second.id && listed[1].id == first.id);
    }
}
