//! Request and response types for the citbbs users API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a user, as reported by the server.
///
/// Transitions are owned by the server; unknown labels are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UserState {
    /// Pending.
    Pending,
    /// Importing.
    Importing,
    /// Awakening.
    Awakening,
    /// Going to sleep.
    SleepInProgress,
    /// Sleeping.
    Sleeping,
    /// Ready.
    Ready,
    /// A label this client does not know about.
    Other(String),
}

impl UserState {
    /// Returns the wire label.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Importing => "importing",
            Self::Awakening => "awakening",
            Self::SleepInProgress => "sleep_in_progress",
            Self::Sleeping => "sleeping",
            Self::Ready => "ready",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for UserState {
    fn from(label: String) -> Self {
        match label.as_str() {
            "pending" => Self::Pending,
            "importing" => Self::Importing,
            "awakening" => Self::Awakening,
            "sleep_in_progress" => Self::SleepInProgress,
            "sleeping" => Self::Sleeping,
            "ready" => Self::Ready,
            _ => Self::Other(label),
        }
    }
}

impl From<UserState> for String {
    fn from(state: UserState) -> Self {
        match state {
            UserState::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for UserState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct User {
    /// User name, unique within an organization.
    pub name: String,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Lifecycle state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<UserState>,
    /// Web URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Creates a user with only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Request to create a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateUserRequest {
    /// Name of the new user.
    pub name: String,
}

impl CreateUserRequest {
    /// Creates a new request.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Request to get a single user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetUserRequest {
    /// User name.
    pub user: String,
}

impl GetUserRequest {
    /// Creates a new request.
    pub fn new(user: impl Into<String>) -> Self {
        Self { user: user.into() }
    }
}

/// Request to list all users in an organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListUsersRequest {
    /// Organization name.
    pub organization: String,
}

impl ListUsersRequest {
    /// Creates a new request.
    pub fn new(organization: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
        }
    }
}

/// Request to delete a user from an organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteUserRequest {
    /// Organization name. Not part of the request path.
    pub organization: String,
    /// User name.
    pub user: String,
}

impl DeleteUserRequest {
    /// Creates a new request.
    pub fn new(organization: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            user: user.into(),
        }
    }
}

/// Confirmation returned when a user is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDeletionRequest {
    /// Name of the deleted user.
    #[serde(rename = "name")]
    pub user: String,
}

/// List envelope for users.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UsersResponse {
    #[serde(rename = "data")]
    pub users: Vec<User>,
}
