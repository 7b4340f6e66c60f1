//! 业务规则校验器
//!
//! 每个函数只编码一条业务规则：接收实体快照与主体，满足则静默返回，
//! 否则立即以对应的领域错误失败（不聚合多条违规）。
//! 课程快照携带已加载的成员集合，因此这里全部是同步纯函数。

use crate::errors::{OcmsError, Result};
use crate::models::courses::entities::Course;
use crate::models::submissions::entities::Submission;
use crate::models::users::entities::User;

// ---- 角色规则 ----

/// 校验用户具有学生角色
pub fn validate_user_is_student(user: &User) -> Result<()> {
    if !user.is_student() {
        return Err(OcmsError::user_role("User is not a student."));
    }
    Ok(())
}

/// 校验用户具有教师角色
pub fn validate_user_is_teacher(user: &User) -> Result<()> {
    if !user.is_teacher() {
        return Err(OcmsError::user_role("User is not a teacher."));
    }
    Ok(())
}

// ---- 课程成员规则 ----

/// 校验学生尚未加入该课程（用于添加前）
pub fn validate_student_not_enrolled(course: &Course, student: &User) -> Result<()> {
    if course.has_student(student.id) {
        return Err(OcmsError::validation(
            "Student is already enrolled in this course.",
        ));
    }
    Ok(())
}

/// 校验教师尚未分配到该课程（用于添加前）
pub fn validate_teacher_not_assigned(course: &Course, teacher: &User) -> Result<()> {
    if course.has_teacher(teacher.id) {
        return Err(OcmsError::validation(
            "Teacher is already assigned to this course.",
        ));
    }
    Ok(())
}

/// 校验学生已加入课程（用于接受提交前）
pub fn validate_student_is_enrolled(course: &Course, student: &User) -> Result<()> {
    if !course.has_student(student.id) {
        return Err(OcmsError::not_enrolled("You are not enrolled in this course."));
    }
    Ok(())
}

/// 校验用户是课程教师
pub fn validate_user_is_course_teacher(course: &Course, user: &User) -> Result<()> {
    if !course.has_teacher(user.id) {
        return Err(OcmsError::permission_denied(
            "Only a course teacher can perform this action.",
        ));
    }
    Ok(())
}

// ---- 提交规则 ----

/// 校验提交尚未评分（评分后提交内容冻结）
pub fn validate_submission_not_graded(submission: &Submission) -> Result<()> {
    if submission.is_graded() {
        return Err(OcmsError::already_graded(
            "Submission already graded; cannot modify.",
        ));
    }
    Ok(())
}

/// 校验用户是提交的作者
pub fn validate_user_is_submission_owner(submission: &Submission, user: &User) -> Result<()> {
    if submission.student_id != user.id {
        return Err(OcmsError::permission_denied(
            "Cannot modify others' submissions.",
        ));
    }
    Ok(())
}

// ---- 评分规则 ----

/// 校验该提交还没有评分（阻止重复创建；与 validate_submission_not_graded
/// 区分开：前者守护评分创建，后者守护提交内容修改，错误类型不同）
pub fn validate_grade_not_created(submission: &Submission) -> Result<()> {
    if submission.grade_id.is_some() {
        return Err(OcmsError::validation(
            "Grade already exists. Use update instead.",
        ));
    }
    Ok(())
}

/// 校验用户可以评论该评分（课程教师或提交作者）
pub fn validate_user_can_comment(
    course: &Course,
    submission: &Submission,
    user: &User,
) -> Result<()> {
    let is_teacher = course.has_teacher(user.id);
    let is_student_owner = submission.student_id == user.id;

    if !(is_teacher || is_student_owner) {
        return Err(OcmsError::permission_denied(
            "Only course teachers or the submission owner can comment.",
        ));
    }
    Ok(())
}
