#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub username: String,
    pub email: String,
    /// Already hashed by the caller; stores never see plaintext.
    pub password_hash: String,
}
