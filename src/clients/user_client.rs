use crate::actor_framework::ResourceClient;
use crate::domain::User;
use crate::user_actor::UserError;

/// Client for interacting with the User actor.
///
/// Accounts are read-only here: the auth gate only looks them up.
#[derive(Clone)]
pub struct UserClient {
    inner: ResourceClient<User>,
}

impl_basic_client!(UserClient, User, UserError, user);
