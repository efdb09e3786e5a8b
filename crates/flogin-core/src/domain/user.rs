//! 사용자(자격증명) 레코드.

use serde::Serialize;

use super::Role;

/// 저장된 사용자.
///
/// `id`는 저장소가 생성 시 할당하며 이후 변경되지 않습니다.
/// 아직 저장되지 않은 사용자는 [`NewUser`]로 표현하므로
/// 식별자가 없는 `User`는 존재하지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// PHC 형식 비밀번호 해시 (평문 비밀번호는 저장하지 않음)
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub email: String,
    pub active: bool,
    pub role: Role,
}

impl User {
    /// 요청을 처리할 수 있는 활성 계정인지 확인.
    pub fn is_enabled(&self) -> bool {
        self.active
    }
}

/// 새 사용자 입력.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub active: bool,
    pub role: Role,
}

impl NewUser {
    /// 기본값(활성, USER 역할)으로 새 사용자 생성.
    pub fn new(
        username: impl Into<String>,
        password_hash: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
            email: email.into(),
            active: true,
            role: Role::User,
        }
    }

    /// 역할 지정.
    #[must_use]
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// ID를 부여하여 저장된 사용자로 변환.
    pub fn into_user(self, id: i64) -> User {
        User {
            id,
            username: self.username,
            password_hash: self.password_hash,
            email: self.email,
            active: self.active,
            role: self.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_defaults() {
        let user = NewUser::new("alice", "$argon2id$hash", "alice@example.com");
        assert!(user.active);
        assert_eq!(user.role, Role::User);

        let admin = user.with_role(Role::Admin).into_user(7);
        assert_eq!(admin.id, 7);
        assert_eq!(admin.role, Role::Admin);
        assert!(admin.is_enabled());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = NewUser::new("alice", "secret-hash", "alice@example.com").into_user(1);
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(json.contains("\"role\":\"USER\""));
    }
}
