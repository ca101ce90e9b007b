/// Partial update: `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserDto {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}
