use crate::actor_framework::ActorEntity;
use crate::domain::{User, UserCreate, UserUpdate};

impl ActorEntity for User {
    type Id = String;
    type CreateParams = UserCreate;
    type UpdateParams = UserUpdate;
    type Action = ();
    type ActionResult = ();

    fn id(&self) -> &String {
        &self.id
    }

    /// Builds a validated user from the creation payload.
    fn from_create_params(id: String, params: UserCreate) -> Result<Self, String> {
        let user = Self {
            id,
            name: params.name,
            email: params.email,
            role: params.role,
        };
        user.validate()?;
        Ok(user)
    }

    /// Emails are compared case-insensitively.
    fn unique_key(&self) -> Option<String> {
        Some(self.email.trim().to_lowercase())
    }

    fn on_update(&mut self, update: UserUpdate) -> Result<(), String> {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(role) = update.role {
            self.role = role;
        }
        self.validate()
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}
