//! Thin authorization gate in front of the Session Validator. Runs to
//! completion before any partition lock is taken, so a slow or dead user
//! service can never stall unrelated reservations.

use std::time::Duration;

use crate::engine::BookingError;
use crate::session::SessionValidator;

/// The authenticated caller, as extracted from the transport's credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub user_id: i64,
}

impl Identity {
    pub fn new(username: impl Into<String>, user_id: i64) -> Self {
        Self { username: username.into(), user_id }
    }

    /// Admin privilege is a local comparison on the authenticated name,
    /// not delegated to the user service.
    pub fn is_admin(&self) -> bool {
        self.username.eq_ignore_ascii_case("admin")
    }
}

/// Admin check first (no network), then session validation bounded by
/// `deadline`. A timeout is a dependency failure, reported closed.
pub(crate) async fn authorize(
    sessions: &dyn SessionValidator,
    identity: &Identity,
    must_be_admin: bool,
    deadline: Duration,
) -> Result<(), BookingError> {
    if must_be_admin && !identity.is_admin() {
        return Err(BookingError::Auth(
            "only admin users can perform this operation".into(),
        ));
    }
    tokio::time::timeout(deadline, sessions.validate(identity.user_id))
        .await
        .map_err(|_| BookingError::Dependency("session validator timed out".into()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct AllowAll;

    #[async_trait]
    impl SessionValidator for AllowAll {
        async fn validate(&self, _user_id: i64) -> Result<(), BookingError> {
            Ok(())
        }
    }

    struct Stalled;

    #[async_trait]
    impl SessionValidator for Stalled {
        async fn validate(&self, _user_id: i64) -> Result<(), BookingError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        }
    }

    #[test]
    fn admin_is_case_insensitive() {
        assert!(Identity::new("admin", 1).is_admin());
        assert!(Identity::new("Admin", 1).is_admin());
        assert!(Identity::new("ADMIN", 1).is_admin());
        assert!(!Identity::new("administrator", 1).is_admin());
        assert!(!Identity::new("alice", 1).is_admin());
    }

    #[tokio::test]
    async fn non_admin_rejected_locally() {
        // The validator is never consulted when the local admin check fails.
        let result = authorize(&Stalled, &Identity::new("alice", 1), true, Duration::from_secs(5)).await;
        assert!(matches!(result, Err(BookingError::Auth(_))));
    }

    #[tokio::test]
    async fn admin_passes_gate() {
        let result = authorize(&AllowAll, &Identity::new("admin", 1), true, Duration::from_secs(5)).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn stalled_validator_fails_closed() {
        let result =
            authorize(&Stalled, &Identity::new("alice", 1), false, Duration::from_millis(10)).await;
        match result {
            Err(e @ BookingError::Dependency(_)) => assert!(e.is_retryable()),
            other => panic!("expected dependency error, got {other:?}"),
        }
    }
}
