use serde::Deserialize;

use super::entities::UserRole;

/// 创建用户请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub role: UserRole,
}
