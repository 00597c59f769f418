use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,           // ⇔ users.id
    pub username: String,  // ⇔ users.username (UNIQUE)
    #[serde(skip)]
    pub password: String, // ⇔ users.password (pbkdf2 credential, or plaintext on legacy rows)
}
