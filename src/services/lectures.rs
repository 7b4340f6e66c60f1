//! 讲座服务
//!
//! 讲座隶属课程。写操作即使已过授权闸门，这里仍重复课程教师校验。

use std::sync::Arc;

use tracing::info;

use crate::errors::{OcmsError, Result};
use crate::models::lectures::entities::Lecture;
use crate::models::lectures::requests::{CreateLectureRequest, UpdateLectureRequest};
use crate::models::users::entities::User;
use crate::storage::Storage;
use crate::validators;

pub struct LectureService {
    storage: Arc<dyn Storage>,
}

impl LectureService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn create_lecture(
        &self,
        creator: &User,
        request: CreateLectureRequest,
    ) -> Result<Lecture> {
        let course = self
            .storage
            .get_course_by_id(request.course_id)
            .await?
            .ok_or_else(|| {
                OcmsError::not_found(format!("Course {} not found", request.course_id))
            })?;
        validators::validate_user_is_course_teacher(&course, creator)?;

        let lecture = self.storage.create_lecture(request, creator.id).await?;
        info!("Lecture {} created in course {}", lecture.id, lecture.course_id);
        Ok(lecture)
    }

    pub async fn update_lecture(
        &self,
        actor: &User,
        lecture_id: i64,
        patch: UpdateLectureRequest,
    ) -> Result<Lecture> {
        let lecture = self.get_lecture(lecture_id).await?;
        let course = self
            .storage
            .get_course_by_id(lecture.course_id)
            .await?
            .ok_or_else(|| OcmsError::not_found(format!("Course {} not found", lecture.course_id)))?;
        validators::validate_user_is_course_teacher(&course, actor)?;

        self.storage
            .update_lecture(lecture_id, patch)
            .await?
            .ok_or_else(|| OcmsError::not_found(format!("Lecture {lecture_id} not found")))
    }

    pub async fn get_lecture(&self, lecture_id: i64) -> Result<Lecture> {
        self.storage
            .get_lecture_by_id(lecture_id)
            .await?
            .ok_or_else(|| OcmsError::not_found(format!("Lecture {lecture_id} not found")))
    }

    /// 列出讲座，可按课程过滤，新建在前
    pub async fn list_lectures(&self, course_id: Option<i64>) -> Result<Vec<Lecture>> {
        self.storage.list_lectures(course_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::services::test_support;

    #[tokio::test]
    async fn test_create_and_update_lecture() {
        let ctx = test_support::setup().await;
        let service = LectureService::new(ctx.storage.clone());

        let lecture = service
            .create_lecture(
                &ctx.teacher,
                CreateLectureRequest {
                    course_id: ctx.course.id,
                    topic: "Graphs".to_string(),
                    attachment: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(lecture.course_id, ctx.course.id);

        let updated = service
            .update_lecture(
                &ctx.teacher,
                lecture.id,
                UpdateLectureRequest {
                    topic: Some("Graphs II".to_string()),
                    attachment: Some("slides.pdf".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.topic, "Graphs II");
        assert_eq!(updated.attachment.as_deref(), Some("slides.pdf"));
    }

    #[tokio::test]
    async fn test_lecture_writes_need_course_teacher() {
        let ctx = test_support::setup().await;
        let service = LectureService::new(ctx.storage.clone());
        let outsider = test_support::create_user(&ctx.storage, "mallory", UserRole::Teacher).await;

        let request = CreateLectureRequest {
            course_id: ctx.course.id,
            topic: "Graphs".to_string(),
            attachment: None,
        };

        assert!(matches!(
            service.create_lecture(&outsider, request.clone()).await,
            Err(OcmsError::PermissionDenied(_))
        ));
        assert!(matches!(
            service.create_lecture(&ctx.student, request).await,
            Err(OcmsError::PermissionDenied(_))
        ));

        let lecture = test_support::create_lecture(&ctx).await;
        assert!(matches!(
            service
                .update_lecture(&ctx.student, lecture.id, UpdateLectureRequest::default())
                .await,
            Err(OcmsError::PermissionDenied(_))
        ));
    }

    #[tokio::test]
    async fn test_list_lectures_newest_first() {
        let ctx = test_support::setup().await;
        let service = LectureService::new(ctx.storage.clone());

        let first = test_support::create_lecture(&ctx).await;
        let second = test_support::create_lecture(&ctx).await;

        let listed = service.list_lectures(Some(ctx.course.id)).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed[0].id == second.id && listed[1].id == first.id);

        assert!(service.list_lectures(Some(9999)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_course_is_not_found() {
        let ctx = test_support::setup().await;
        let service = LectureService::new(ctx.storage.clone());

        assert!(matches!(
            service
                .create_lecture(
                    &ctx.teacher,
                    CreateLectureRequest {
                        course_id: 9999,
                        topic: "Orphan".to_string(),
                        attachment: None,
                    },
                )
                .await,
            Err(OcmsError::NotFound(_))
        ));
    }
}
