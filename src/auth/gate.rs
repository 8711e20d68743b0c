use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::clients::UserClient;
use crate::domain::{Role, User};
use super::{AuthError, JwtAuth};

/// Identity of the authenticated caller, as stated by a verified token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: Uuid,
    pub role: Role,
}

/// Per-request authentication and the admin check behind it.
///
/// The token decides who the caller is; admin rights are always read from the
/// stored user record, not from the token's role claim.
#[derive(Clone)]
pub struct AuthGate {
    jwt: JwtAuth,
    users: UserClient,
}

impl AuthGate {
    pub fn new(jwt: JwtAuth, users: UserClient) -> Self {
        Self { jwt, users }
    }

    pub fn authenticate(&self, token: Option<&str>) -> Result<Caller, AuthError> {
        let token = token.map(str::trim).filter(|t| !t.is_empty()).ok_or(AuthError::MissingToken)?;
        let claims = self.jwt.decode(token).inspect_err(|e| debug!(error = ?e, "Rejected token"))?;
        Ok(Caller {
            user_id: claims.sub,
            role: claims.role,
        })
    }

    #[instrument(skip(self), fields(user_id = %caller.user_id, claimed_role = caller.role.0))]
    pub async fn require_admin(&self, caller: &Caller) -> Result<User, AuthError> {
        let user = self
            .users
            .get_user(caller.user_id)
            .await
            .map_err(|e| AuthError::Lookup(e.to_string()))?
            .ok_or_else(|| AuthError::UnknownUser(caller.user_id.to_string()))?;
        if !user.role.is_admin() {
            warn!("Admin route refused");
            return Err(AuthError::NotAdmin);
        }
        Ok(user)
    }

    /// Owners pass straight through; anyone else must be an admin.
    pub async fn require_owner_or_admin(&self, caller: &Caller, owner: Uuid) -> Result<(), AuthError> {
        if caller.user_id == owner {
            return Ok(());
        }
        self.require_admin(caller).await.map(|_| ())
    }
}
