//! Auth data types. Identity management itself is external; this service
//! only validates bearer tokens and distinguishes admins from players.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Player,
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "admin",
            Role::Player => "player",
        }
    }
}

/// JWT claims carried through request extensions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: external account id
    pub sub: String,
    pub username: String,
    pub role: Role,
    pub exp: usize,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
