//! Authorization gate.
//!
//! Every calendar page is gated before the store is touched. The gate only
//! answers "who is this and may they see the page"; session issuance lives
//! elsewhere.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AggregatorError, AggregatorResult};

/// A user role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Student,
}

impl Role {
    /// Returns the role name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Student => "student",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "student" => Ok(Self::Student),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: String,
    pub role: Role,
}

impl Principal {
    /// Creates a principal.
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    /// Returns true if this principal may act as `role`.
    ///
    /// Admins can see every student page.
    pub fn satisfies(&self, role: Role) -> bool {
        self.role == role || self.role == Role::Admin
    }
}

/// The caller-supplied part of a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    token: Option<String>,
}

impl RequestContext {
    /// A request carrying a session token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    /// A request without a session.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Returns the session token, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

/// Resolves callers and checks their role.
pub trait Authorizer: Send + Sync {
    /// Resolves the caller of `request`.
    fn authenticate(&self, request: &RequestContext) -> AggregatorResult<Principal>;

    /// Resolves the caller and checks that they may act as `role`.
    fn require_role(&self, request: &RequestContext, role: Role) -> AggregatorResult<Principal> {
        let principal = self.authenticate(request)?;
        if !principal.satisfies(role) {
            debug!(user = %principal.user_id, required = %role, "role check failed");
            return Err(AggregatorError::forbidden(role));
        }
        Ok(principal)
    }

    /// Requires the admin role.
    fn require_admin(&self, request: &RequestContext) -> AggregatorResult<Principal> {
        self.require_role(request, Role::Admin)
    }

    /// Requires the student role (admins pass as well).
    fn require_student(&self, request: &RequestContext) -> AggregatorResult<Principal> {
        self.require_role(request, Role::Student)
    }
}

/// An authorizer with a fixed table of session tokens.
#[derive(Debug, Clone, Default)]
pub struct StaticAuthorizer {
    sessions: HashMap<String, Principal>,
}

impl StaticAuthorizer {
    /// Creates an authorizer with no sessions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: register a session token.
    pub fn with_session(mut self, token: impl Into<String>, principal: Principal) -> Self {
        self.sessions.insert(token.into(), principal);
        self
    }
}

impl Authorizer for StaticAuthorizer {
    fn authenticate(&self, request: &RequestContext) -> AggregatorResult<Principal> {
        let token = request
            .token()
            .ok_or_else(|| AggregatorError::unauthorized("no session"))?;
        self.sessions
            .get(token)
            .cloned()
            .ok_or_else(|| AggregatorError::unauthorized("unknown or expired session"))
    }
}
