use serde::{Deserialize, Serialize};

use crate::client::api::SignedIn;
use crate::user::model::{PublicUser, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// The signed-in user together with the token that authorizes their calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub profile: PublicUser,
    pub token: String,
}

impl CurrentUser {
    pub fn id(&self) -> &str {
        &self.profile.id
    }

    pub fn is_admin(&self) -> bool {
        self.profile.role == Role::Admin
    }
}

impl From<SignedIn> for CurrentUser {
    fn from(signed_in: SignedIn) -> Self {
        CurrentUser {
            profile: signed_in.user,
            token: signed_in.token,
        }
    }
}

/// App-wide UI state handed explicitly to view-models and guards.
/// Serializable so a shell can persist it between launches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppContext {
    pub theme: Theme,
    pub current_user: Option<CurrentUser>,
}

impl AppContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    pub fn sign_in(&mut self, user: CurrentUser) {
        self.current_user = Some(user);
    }

    pub fn sign_out(&mut self) -> Option<CurrentUser> {
        self.current_user.take()
    }

    pub fn is_signed_in(&self) -> bool {
        self.current_user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.current_user.as_ref().is_some_and(CurrentUser::is_admin)
    }
}
