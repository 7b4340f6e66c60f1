//! 业务服务层
//!
//! 每个实体族一个服务，持有 Arc<dyn Storage>。服务负责：
//! 解析实体与所属课程、调用 validators 执行业务规则、再委托存储层落库。
//! 即使边界层已经过授权闸门，写路径仍在服务内重复关键校验。

pub mod courses;
pub mod grading;
pub mod homeworks;
pub mod lectures;
pub mod submissions;

#[cfg(test)]
pub(crate) mod test_support;

pub use courses::CourseService;
pub use grading::GradingService;
pub use homeworks::HomeworkService;
pub use lectures::LectureService;
pub use submissions::SubmissionService;
