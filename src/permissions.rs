//! 对象级授权闸门
//!
//! 边界层在分发到服务之前调用：给定主体、动作（读/写）和目标实体，
//! 沿所有权链（实体 → … → 课程）显式解析出所属课程后做成员判定。
//! 写操作要求课程教师身份，读操作允许课程教师或已加入的学生。
//! 服务内部另有更细粒度的规则（如学生只能改自己的提交），见 services 模块。

use std::sync::Arc;

use crate::errors::{OcmsError, Result};
use crate::models::courses::entities::Course;
use crate::models::users::entities::User;
use crate::storage::Storage;

/// 动作类别：读 / 写
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Write,
}

/// 授权目标：五类实体的带标签联合，各携带自身 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Course(i64),
    Lecture(i64),
    Assignment(i64),
    Submission(i64),
    Grade(i64),
}

/// 沿所有权链解析目标实体所属的课程
///
/// 每一级父引用缺失都作为 NotFound 立即返回，而不是在成员判定时
/// 隐式失败。每次授权决策只调用一次。
pub async fn course_of(storage: &Arc<dyn Storage>, resource: Resource) -> Result<Course> {
    match resource {
        Resource::Course(id) => storage
            .get_course_by_id(id)
            .await?
            .ok_or_else(|| OcmsError::not_found(format!("Course {id} not found"))),
        Resource::Lecture(id) => {
            let lecture = storage
                .get_lecture_by_id(id)
                .await?
                .ok_or_else(|| OcmsError::not_found(format!("Lecture {id} not found")))?;
            Box::pin(course_of(storage, Resource::Course(lecture.course_id))).await
        }
        Resource::Assignment(id) => {
            let assignment = storage
                .get_assignment_by_id(id)
                .await?
                .ok_or_else(|| OcmsError::not_found(format!("Assignment {id} not found")))?;
            Box::pin(course_of(storage, Resource::Lecture(assignment.lecture_id))).await
        }
        Resource::Submission(id) => {
            let submission = storage
                .get_submission_by_id(id)
                .await?
                .ok_or_else(|| OcmsError::not_found(format!("Submission {id} not found")))?;
            Box::pin(course_of(
                storage,
                Resource::Assignment(submission.assignment_id),
            ))
            .await
        }
        Resource::Grade(id) => {
            let grade = storage
                .get_grade_by_id(id)
                .await?
                .ok_or_else(|| OcmsError::not_found(format!("Grade {id} not found")))?;
            Box::pin(course_of(storage, Resource::Submission(grade.submission_id))).await
        }
    }
}

/// 授权闸门
pub struct AccessGate {
    storage: Arc<dyn Storage>,
}

impl AccessGate {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// 判定主体对目标的动作是否被允许，拒绝时返回 PermissionDenied
    pub async fn check(&self, user: &User, action: Action, resource: Resource) -> Result<()> {
        let course = course_of(&self.storage, resource).await?;

        let allowed = match action {
            Action::Write => course.has_teacher(user.id),
            Action::Read => course.has_teacher(user.id) || course.has_student(user.id),
        };

        if !allowed {
            return Err(OcmsError::permission_denied(
                "You do not have access to this resource.",
            ));
        }
        Ok(())
    }

    /// check 的布尔变体；NotFound 照常向上传播
    pub async fn can_access(&self, user: &User, action: Action, resource: Resource) -> Result<bool> {
        match self.check(user, action, resource).await {
            Ok(()) => Ok(true),
            Err(OcmsError::PermissionDenied(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::services::test_support;

    #[tokio::test]
    async fn test_write_requires_course_teacher() {
        let ctx = test_support::setup().await;
        let gate = AccessGate::new(ctx.storage.clone());

        assert!(
            gate.check(&ctx.teacher, Action::Write, Resource::Course(ctx.course.id))
                .await
                .is_ok()
        );

        let outsider = test_support::create_user(&ctx.storage, "outsider", UserRole::Teacher).await;
        assert!(matches!(
            gate.check(&outsider, Action::Write, Resource::Course(ctx.course.id))
                .await,
            Err(OcmsError::PermissionDenied(_))
        ));

        // 已加入的学生可读不可写
        assert!(
            gate.check(&ctx.student, Action::Read, Resource::Course(ctx.course.id))
                .await
                .is_ok()
        );
        assert!(matches!(
            gate.check(&ctx.student, Action::Write, Resource::Course(ctx.course.id))
                .await,
            Err(OcmsError::PermissionDenied(_))
        ));
    }

    #[tokio::test]
    async fn test_gate_walks_ownership_chain() {
        let ctx = test_support::setup().await;
        let gate = AccessGate::new(ctx.storage.clone());

        let lecture = test_support::create_lecture(&ctx).await;
        let assignment = test_support::create_assignment(&ctx, lecture.id).await;

        // 讲座和作业都归属到同一课程，成员判定一致
        for resource in [
            Resource::Lecture(lecture.id),
            Resource::Assignment(assignment.id),
        ] {
            assert!(gate.check(&ctx.teacher, Action::Write, resource).await.is_ok());
            assert!(gate.can_access(&ctx.student, Action::Read, resource).await.unwrap());
            assert!(!gate.can_access(&ctx.student, Action::Write, resource).await.unwrap());
        }
    }

    #[tokio::test]
    async fn test_missing_chain_link_is_not_found() {
        let ctx = test_support::setup().await;
        let gate = AccessGate::new(ctx.storage.clone());

        assert!(matches!(
            gate.check(&ctx.teacher, Action::Read, Resource::Lecture(9999))
                .await,
            Err(OcmsError::NotFound(_))
        ));
        assert!(matches!(
            course_of(&ctx.storage, Resource::Grade(9999)).await,
            Err(OcmsError::NotFound(_))
        ));
    }
}
