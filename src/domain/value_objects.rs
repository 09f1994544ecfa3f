//! Domain value objects

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::validation;

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generate a new random id
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }

            /// Get the inner UUID
            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id!(
    /// User ID value object
    UserId
);
uuid_id!(
    /// Album ID value object
    AlbumId
);
uuid_id!(
    /// Photo ID value object
    PhotoId
);
uuid_id!(
    /// Travel path ID value object
    PathId
);

/// Username value object with validation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Create a new Username, sanitizing and validating the raw input
    pub fn new(raw: String) -> Result<Self, String> {
        let username = validation::sanitize_string(&raw);
        if !validation::is_valid_username(&username) {
            return Err(
                "Username must be 3-50 characters, alphanumeric and underscores only".to_string(),
            );
        }
        if validation::contains_suspicious_patterns(&username) {
            return Err("Username contains prohibited characters".to_string());
        }
        Ok(Username(username))
    }

    /// Reconstruct from a trusted source (database row)
    pub fn from_trusted(value: String) -> Self {
        Username(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Argon2 password hash in PHC string format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for PasswordHash {
    fn from(value: String) -> Self {
        PasswordHash(value)
    }
}

/// Geographic coordinates of a map pin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Create coordinates, rejecting out-of-range values
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, String> {
        if !validation::is_valid_coordinates(latitude, longitude) {
            return Err(
                "Latitude must be between -90 and 90, longitude between -180 and 180".to_string(),
            );
        }
        Ok(Coordinates {
            latitude,
            longitude,
        })
    }
}
