//! 엔드포인트별 접근 정책.
//!
//! 모든 인가 결정은 [`ACCESS_RULES`] 테이블 하나로부터 요청마다 한 번 계산됩니다.
//! 위에서부터 처음 일치하는 규칙이 적용되며, 일치하는 규칙이 없으면 인증만 요구합니다.

use axum::http::Method;
use flogin_core::Role;

/// 엔드포인트 접근 정책.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPolicy {
    /// 인증 불필요
    Public,
    /// 유효한 토큰이면 역할 무관
    Authenticated,
    /// 나열된 역할 중 하나 필요
    Roles(&'static [Role]),
}

impl AccessPolicy {
    /// 주어진 역할이 이 정책을 만족하는지 확인.
    pub fn allows(&self, role: Role) -> bool {
        match self {
            Self::Public | Self::Authenticated => true,
            Self::Roles(allowed) => allowed.contains(&role),
        }
    }
}

/// HTTP 메서드 집합.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Methods {
    Any,
    /// 대문자 메서드 이름 목록
    Only(&'static [&'static str]),
}

impl Methods {
    fn contains(&self, method: &Method) -> bool {
        match self {
            Self::Any => true,
            Self::Only(methods) => methods.contains(&method.as_str()),
        }
    }
}

/// 접근 규칙 한 줄.
#[derive(Debug, Clone, Copy)]
pub struct AccessRule {
    pub methods: Methods,
    /// 경로 접두사. `/api/products`는 `/api/products`와 `/api/products/...`에 일치
    pub prefix: &'static str,
    pub policy: AccessPolicy,
}

impl AccessRule {
    fn matches(&self, method: &Method, path: &str) -> bool {
        self.methods.contains(method) && path_has_prefix(path, self.prefix)
    }
}

/// 세그먼트 경계를 고려한 접두사 비교 (`/healthz`는 `/health`에 일치하지 않음).
fn path_has_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/') || prefix.ends_with('/'),
        None => false,
    }
}

const READERS: &[Role] = &[Role::User, Role::Admin];
const ADMINS: &[Role] = &[Role::Admin];

/// 접근 규칙 테이블.
pub const ACCESS_RULES: &[AccessRule] = &[
    // CORS preflight
    AccessRule {
        methods: Methods::Only(&["OPTIONS"]),
        prefix: "/",
        policy: AccessPolicy::Public,
    },
    AccessRule {
        methods: Methods::Only(&["POST"]),
        prefix: "/api/auth/login",
        policy: AccessPolicy::Public,
    },
    AccessRule {
        methods: Methods::Any,
        prefix: "/health",
        policy: AccessPolicy::Public,
    },
    AccessRule {
        methods: Methods::Only(&["GET"]),
        prefix: "/metrics",
        policy: AccessPolicy::Public,
    },
    AccessRule {
        methods: Methods::Any,
        prefix: "/swagger-ui",
        policy: AccessPolicy::Public,
    },
    AccessRule {
        methods: Methods::Any,
        prefix: "/api-docs",
        policy: AccessPolicy::Public,
    },
    AccessRule {
        methods: Methods::Only(&["GET"]),
        prefix: "/api/products",
        policy: AccessPolicy::Roles(READERS),
    },
    AccessRule {
        methods: Methods::Only(&["POST", "PUT", "DELETE"]),
        prefix: "/api/products",
        policy: AccessPolicy::Roles(ADMINS),
    },
];

/// 요청에 적용할 정책을 결정합니다.
pub fn policy_for(method: &Method, path: &str) -> AccessPolicy {
    ACCESS_RULES
        .iter()
        .find(|rule| rule.matches(method, path))
        .map(|rule| rule.policy)
        .unwrap_or(AccessPolicy::Authenticated)
}
