// Dashboard API wire types
//
// Field names follow the camelCase JSON the API speaks. Timestamps stay as
// strings: the server emits RFC 3339 but older fixtures carry other date
// shapes, and interpretation belongs to whoever sorts or renders them.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

// ── Environment ──────────────────────────────────────────────────────

/// Deployment environment whose data the dashboard is looking at.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    pub const ALL: [Self; 3] = [Self::Development, Self::Staging, Self::Production];

    /// Next environment in selector order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Self::Development => Self::Staging,
            Self::Staging => Self::Production,
            Self::Production => Self::Development,
        }
    }

    /// Human-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Development => "Development",
            Self::Staging => "Staging",
            Self::Production => "Production",
        }
    }
}

// ── Auth ─────────────────────────────────────────────────────────────

/// Body of `POST /api/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful `POST /api/login` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// `{ "error": "..." }` body used by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Dashboard feature area a user may be granted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Module {
    Scheduler,
    UserManagement,
    /// Module names this client does not know about yet.
    #[serde(other)]
    Unknown,
}

/// `GET /api/me` response: who the token belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub initials: String,
    pub email: String,
    #[serde(default)]
    pub modules: Vec<Module>,
}

// ── Users ────────────────────────────────────────────────────────────

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

/// Row of `GET /api/users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub job_title: String,
    pub created_at: String,
}

impl User {
    /// Display name, `"{first} {last}"`.
    pub fn name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// ── Cron jobs ────────────────────────────────────────────────────────

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum JobStatus {
    Active,
    Inactive,
}

/// Row of `GET /api/scheduler/cron-jobs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CronJob {
    pub id: String,
    pub name: String,
    pub user_id: String,
    pub status: JobStatus,
    pub created_at: String,
    pub email: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn environment_parses_case_insensitively() {
        assert_eq!(
            Environment::from_str("Staging").unwrap(),
            Environment::Staging
        );
        assert_eq!(Environment::Production.to_string(), "production");
        assert!(Environment::from_str("qa").is_err());
    }

    #[test]
    fn environment_cycles() {
        assert_eq!(Environment::default(), Environment::Development);
        assert_eq!(Environment::Production.next(), Environment::Development);
    }

    #[test]
    fn unknown_modules_do_not_fail_identity() {
        let identity: Identity = serde_json::from_str(
            r#"{"name":"Jo","initials":"J","email":"jo@x.io","modules":["scheduler","billing"]}"#,
        )
        .unwrap();
        assert_eq!(identity.modules, vec![Module::Scheduler, Module::Unknown]);
    }

    #[test]
    fn user_uses_camel_case_fields() {
        let user: User = serde_json::from_str(
            r#"{"id":"u1","firstName":"Ada","lastName":"Lovelace","email":"ada@x.io",
                "role":"admin","jobTitle":"Engineer","createdAt":"2024-01-02T03:04:05.000Z"}"#,
        )
        .unwrap();
        assert_eq!(user.name(), "Ada Lovelace");
        assert_eq!(user.role, Role::Admin);
    }
}
