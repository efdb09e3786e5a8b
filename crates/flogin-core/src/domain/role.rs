//! 사용자 역할 정의.

use serde::{Deserialize, Serialize};

/// 사용자 역할.
///
/// 시스템에서 사용자의 권한 수준을 정의합니다.
/// 저장소와 JSON 모두 대문자 문자열(`"USER"`, `"ADMIN"`)로 표현됩니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// 일반 사용자 - 상품 조회 권한
    #[default]
    User,
    /// 관리자 - 상품 생성/수정/삭제 권한 포함
    Admin,
}

impl Role {
    /// 역할의 우선순위 레벨 반환 (높을수록 더 많은 권한).
    pub fn level(&self) -> u8 {
        match self {
            Role::Admin => 100,
            Role::User => 10,
        }
    }

    /// 이 역할이 `required` 역할 이상인지 확인.
    pub fn satisfies(&self, required: Role) -> bool {
        self.level() >= required.level()
    }

    /// 저장소 표현 문자열.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }

    /// 문자열에서 역할 파싱 (대소문자 무시).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "ADMIN" => Some(Role::Admin),
            "USER" => Some(Role::User),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_level() {
        assert!(Role::Admin.level() > Role::User.level());
        assert!(Role::Admin.satisfies(Role::User));
        assert!(Role::Admin.satisfies(Role::Admin));
        assert!(Role::User.satisfies(Role::User));
        assert!(!Role::User.satisfies(Role::Admin));
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::parse("user"), Some(Role::User));
        assert_eq!(Role::parse(" Admin "), Some(Role::Admin));
        assert_eq!(Role::parse("viewer"), None);
    }

    #[test]
    fn test_role_default_is_user() {
        assert_eq!(Role::default(), Role::User);
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&Role::Admin).unwrap();
        assert_eq!(json, "\"ADMIN\"");

        let parsed: Role = serde_json::from_str("\"USER\"").unwrap();
        assert_eq!(parsed, Role::User);
    }
}
