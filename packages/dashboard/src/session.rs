/// The signed-in user, as known to the dashboard.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub role: String,
}

/// Who is looking at the page. Passed into the page explicitly.
#[derive(Clone, Debug, Default)]
pub struct Session {
    pub identity: Option<Identity>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(username: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            identity: Some(Identity {
                username: username.into(),
                role: role.into(),
            }),
        }
    }

    /// Admin controls are shown to the `admin` role and to the `admin` account.
    pub fn is_admin(&self) -> bool {
        self.identity
            .as_ref()
            .is_some_and(|id| id.role == "admin" || id.username == "admin")
    }
}
