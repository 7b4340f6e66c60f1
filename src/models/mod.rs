//! 业务模型定义
//!
//! 每个实体族一个子模块：entities 为业务实体，requests 为进入服务层的
//! 请求/补丁结构。评分相关的评论模型与 Grade 同族。

pub mod assignments;
pub mod courses;
pub mod grades;
pub mod lectures;
pub mod submissions;
pub mod users;
