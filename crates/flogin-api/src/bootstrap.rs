//! 기본 관리자 계정 초기화.
//!
//! 프로세스 시작 시 한 번 실행됩니다. 여러 번 실행해도 결과는 같습니다.

use secrecy::ExposeSecret;
use tracing::info;

use flogin_core::{BootstrapConfig, FloginError, FloginResult, NewUser, Role, UserStore};

use crate::auth::hash_password;

/// 초기화 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// 계정을 새로 생성
    Created,
    /// 기존 계정을 ADMIN으로 승격
    Promoted,
    /// 이미 ADMIN 계정이 존재
    Unchanged,
    /// 설정에서 비활성화됨
    Disabled,
}

/// 설정된 사용자명의 ADMIN 계정이 존재하도록 보장합니다.
///
/// 기존 계정의 비밀번호와 활성 상태는 건드리지 않습니다.
pub async fn ensure_default_admin(
    users: &dyn UserStore,
    config: &BootstrapConfig,
) -> FloginResult<BootstrapOutcome> {
    if !config.enabled {
        return Ok(BootstrapOutcome::Disabled);
    }

    let outcome = match users.find_by_username(&config.username).await? {
        Some(user) if user.role == Role::Admin => BootstrapOutcome::Unchanged,
        Some(user) => {
            users.update_role(user.id, Role::Admin).await?;
            BootstrapOutcome::Promoted
        }
        None => {
            let hash = hash_password(config.password.expose_secret())
                .map_err(|e| FloginError::Internal(e.to_string()))?;
            let new_user = NewUser::new(config.username.as_str(), hash, config.email.as_str())
                .with_role(Role::Admin);
            users.insert(new_user).await?;
            BootstrapOutcome::Created
        }
    };

    info!(username = %config.username, outcome = ?outcome, "Default admin account checked");
    Ok(outcome)
}
