//! # Flogin Core
//!
//! 로그인/상품 관리 서비스의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 서비스 전반에서 사용되는 기본 타입을 제공합니다:
//! - 사용자 및 역할 정의
//! - 상품 및 페이지네이션 타입
//! - 저장소(Store) 추상화 trait
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
