//! Authorization queries.
//!
//! # Design Decisions
//! - Access to the public group is always granted, even to anonymous users
//! - Any other right must be granted explicitly per (user, group)
//! - A denial is a `ServiceError::NotAuthorized`, never a panic

use std::fmt;
use std::str::FromStr;

use dashmap::DashMap;
use futures_util::future::BoxFuture;

use crate::config::AuthConfig;
use crate::error::ServiceError;

/// Permission group open to everyone.
pub const PUBLIC_GROUP_ID: u64 = 0;

/// Action checked against a permission group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Access,
    Create,
    Update,
    Delete,
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "access" => Ok(Action::Access),
            "create" => Ok(Action::Create),
            "update" => Ok(Action::Update),
            "delete" => Ok(Action::Delete),
            other => Err(format!("unknown action {other:?}")),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Access => "access",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Answers whether a user may perform an action on a permission group.
///
/// Implementations backed by a remote service enforce their own timeout.
pub trait AuthService: Send + Sync {
    fn auth_query(
        &self,
        user_id: u64,
        group_id: u64,
        action: Action,
    ) -> BoxFuture<'_, Result<(), ServiceError>>;
}

/// In-process grant table built from configuration.
#[derive(Debug, Default)]
pub struct GrantAuthService {
    grants: DashMap<(u64, u64), Vec<Action>>,
}

impl GrantAuthService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the grant table, skipping unknown action names.
    pub fn from_config(config: &AuthConfig) -> Self {
        let service = Self::new();
        for grant in &config.grants {
            for name in &grant.actions {
                match name.parse() {
                    Ok(action) => service.grant(grant.user_id, grant.group_id, action),
                    Err(e) => tracing::warn!(
                        user_id = grant.user_id,
                        group_id = grant.group_id,
                        error = %e,
                        "Ignoring grant"
                    ),
                }
            }
        }
        service
    }

    pub fn grant(&self, user_id: u64, group_id: u64, action: Action) {
        let mut actions = self.grants.entry((user_id, group_id)).or_default();
        if !actions.contains(&action) {
            actions.push(action);
        }
    }

    fn allowed(&self, user_id: u64, group_id: u64, action: Action) -> bool {
        if group_id == PUBLIC_GROUP_ID && action == Action::Access {
            return true;
        }
        self.grants
            .get(&(user_id, group_id))
            .map(|actions| actions.contains(&action))
            .unwrap_or(false)
    }
}

impl AuthService for GrantAuthService {
    fn auth_query(
        &self,
        user_id: u64,
        group_id: u64,
        action: Action,
    ) -> BoxFuture<'_, Result<(), ServiceError>> {
        let allowed = self.allowed(user_id, group_id, action);
        Box::pin(async move {
            if allowed {
                Ok(())
            } else {
                tracing::debug!(user_id, group_id, %action, "Authorization denied");
                Err(ServiceError::NotAuthorized)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GrantConfig;

    #[tokio::test]
    async fn test_public_access_is_open() {
        let auth = GrantAuthService::new();
        assert!(auth.auth_query(0, PUBLIC_GROUP_ID, Action::Access).await.is_ok());
        assert_eq!(
            auth.auth_query(0, PUBLIC_GROUP_ID, Action::Update).await,
            Err(ServiceError::NotAuthorized)
        );
    }

    #[tokio::test]
    async fn test_grants_from_config() {
        let auth = GrantAuthService::from_config(&AuthConfig {
            grants: vec![GrantConfig {
                user_id: 7,
                group_id: 3,
                actions: vec!["access".into(), "bogus".into()],
            }],
        });

        assert!(auth.auth_query(7, 3, Action::Access).await.is_ok());
        assert_eq!(
            auth.auth_query(7, 3, Action::Delete).await,
            Err(ServiceError::NotAuthorized)
        );
        assert_eq!(
            auth.auth_query(8, 3, Action::Access).await,
            Err(ServiceError::NotAuthorized)
        );
    }

    #[test]
    fn test_action_names() {
        assert_eq!("update".parse::<Action>(), Ok(Action::Update));
        assert!("Access".parse::<Action>().is_err());
        assert_eq!(Action::Delete.to_string(), "delete");
    }
}
