//! Typed identifier newtypes.
//!
//! Database-assigned identities (users, homes, roles) are integers.
//! Device identities travel on the wire and stay strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! define_numeric_id {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
            Deserialize,
        )]
        pub struct $name(i64);

        impl $name {
            /// Wrap an existing database identifier.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Access the inner integer.
            #[must_use]
            pub const fn as_i64(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse().map(Self)
            }
        }
    };
}

macro_rules! define_text_id {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(
            Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing identifier.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Access the inner text.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether the identifier is empty.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

define_numeric_id!(
    /// Unique identifier for a [`User`](crate::user::User).
    UserId
);

define_numeric_id!(
    /// Unique identifier for a [`Home`](crate::home::Home).
    HomeId
);

define_numeric_id!(
    /// Unique identifier for a [`Role`](crate::user::Role).
    RoleId
);

define_text_id!(
    /// Unique identifier for a [`Device`](crate::device::Device), assigned
    /// at registration and stable for the device's lifetime.
    DeviceId
);

define_text_id!(
    /// Transport topic a device reports on. Maps one-to-one to a device.
    ChannelId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_roundtrip_numeric_id_through_display_and_from_str() {
        let id = HomeId::new(7);
        let text = id.to_string();
        let parsed: HomeId = text.parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn should_serialize_numeric_id_as_bare_number() {
        let json = serde_json::to_string(&UserId::new(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn should_serialize_text_id_as_bare_string() {
        let json = serde_json::to_string(&DeviceId::new("dev-123")).unwrap();
        assert_eq!(json, "\"dev-123\"");
    }

    #[test]
    fn should_roundtrip_text_id_through_serde_json() {
        let id = ChannelId::new("home/7/dev-123");
        let json = serde_json::to_string(&id).unwrap();
        let parsed: ChannelId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn should_return_error_when_parsing_non_numeric_id() {
        let result = "not-a-number".parse::<UserId>();
        assert!(result.is_err());
    }

    #[test]
    fn should_report_empty_text_id() {
        assert!(ChannelId::new("").is_empty());
        assert!(!ChannelId::new("x").is_empty());
    }
}
