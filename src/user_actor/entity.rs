use uuid::Uuid;

use crate::actor_framework::Entity;
use crate::domain::User;
use super::UserError;

impl Entity for User {
    type Id = Uuid;
    type CreateParams = (); // Users come from the seed file
    type Patch = (); // Roles and profiles are not edited through this service
    type Action = ();
    type ActionResult = ();
    type Error = UserError;

    fn id(&self) -> &Uuid {
        &self.id
    }

    fn from_create_params(_id: Uuid, _params: ()) -> Result<Self, UserError> {
        Err(UserError::ReadOnly("accounts are provisioned through the seed file"))
    }

    fn on_update(&mut self, _patch: ()) -> Result<(), UserError> {
        Ok(())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), UserError> {
        Ok(())
    }
}
