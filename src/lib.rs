//! OCMS - 课程管理系统核心
//!
//! 基于 SeaORM 的课程/讲座/作业/提交/评分工作流与授权规则引擎，
//! 作为库被上层边界（HTTP 层或其他宿主）复用。
//!
//! # 架构
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `models`: 数据模型定义
//! - `permissions`: 对象级授权闸门
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数
//! - `validators`: 业务规则校验器

pub mod config;
pub mod entity;
pub mod errors;
pub mod models;
pub mod permissions;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
pub mod validators;
