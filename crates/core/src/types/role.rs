//! User role enum.

use serde::{Deserialize, Serialize};

/// Role of a managed PTT user.
///
/// The API accepts the four wire values `regular`, `senior`, `manager` and
/// `admin`. Any other value seen in a response is kept verbatim in
/// [`UserRole::Other`] so one odd record does not hide the rest of the list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UserRole {
    /// Ordinary user.
    #[default]
    Regular,
    /// Senior user.
    Senior,
    /// Manager.
    Manager,
    /// Administrator.
    Admin,
    /// A role value this console does not know about.
    Other(String),
}

impl UserRole {
    /// The roles that can be chosen in a form.
    pub const SELECTABLE: [Self; 4] = [Self::Regular, Self::Senior, Self::Manager, Self::Admin];

    /// Wire value sent to and received from the API.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Regular => "regular",
            Self::Senior => "senior",
            Self::Manager => "manager",
            Self::Admin => "admin",
            Self::Other(raw) => raw,
        }
    }

    /// Human-readable label for tables.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Regular => "Regular user",
            Self::Senior => "Senior user",
            Self::Manager => "Manager",
            Self::Admin => "Admin",
            Self::Other(raw) => raw,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    /// Parses only the selectable roles; free-form values are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "regular" => Ok(Self::Regular),
            "senior" => Ok(Self::Senior),
            "manager" => Ok(Self::Manager),
            "admin" => Ok(Self::Admin),
            _ => Err(format!(
                "invalid role: {s} (expected one of regular, senior, manager, admin)"
            )),
        }
    }
}

impl From<String> for UserRole {
    fn from(value: String) -> Self {
        value.parse().unwrap_or(Self::Other(value))
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Other(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}
