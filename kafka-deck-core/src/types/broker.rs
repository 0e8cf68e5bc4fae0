//! Broker and connection profile types

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// `host:port` entries separated by commas, no whitespace.
static BOOTSTRAP_SERVERS: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9.-]*:\d{1,5}(,[a-zA-Z0-9][a-zA-Z0-9.-]*:\d{1,5})*$")
        .inspect_err(|e| log::error!("bootstrap server pattern failed to compile: {e}"))
        .ok()
});

/// Broker row shown in the brokers panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Broker {
    pub id: usize,
    pub name: String,
    pub address: String,
}

/// Authentication mode of a broker profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AuthType {
    #[default]
    None,
    Sasl,
    Ssl,
}

impl AuthType {
    /// Options offered by the add-broker wizard, in display order.
    pub const fn options() -> &'static [AuthType] {
        &[AuthType::None, AuthType::Sasl]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Sasl => "SASL",
            Self::Ssl => "SSL",
        }
    }
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NONE" | "" => Ok(Self::None),
            "SASL" => Ok(Self::Sasl),
            "SSL" => Ok(Self::Ssl),
            other => Err(CoreError::ValidationError(format!("unknown auth type: {other}"))),
        }
    }
}

/// SASL mechanism used when `AuthType::Sasl` is selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SaslMechanism {
    #[default]
    Plain,
    ScramSha256,
    ScramSha512,
    OAuthBearer,
}

impl SaslMechanism {
    pub const fn options() -> &'static [SaslMechanism] {
        &[
            SaslMechanism::Plain,
            SaslMechanism::ScramSha256,
            SaslMechanism::ScramSha512,
            SaslMechanism::OAuthBearer,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "PLAIN",
            Self::ScramSha256 => "SCRAM-SHA-256",
            Self::ScramSha512 => "SCRAM-SHA-512",
            Self::OAuthBearer => "OAUTHBEARER",
        }
    }
}

impl fmt::Display for SaslMechanism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SaslMechanism {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::options()
            .iter()
            .copied()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::ValidationError(format!("unknown SASL mechanism: {s}")))
    }
}

/// Persisted connection profile
///
/// The password never reaches the profile file; it is kept in the credential store
/// and re-attached before connecting.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BrokerProfile {
    pub name: String,
    pub bootstrap_servers: String,
    #[serde(default)]
    pub auth_type: AuthType,
    #[serde(default)]
    pub sasl_mechanism: SaslMechanism,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub username: String,
    #[serde(skip)]
    pub password: String,
}

impl BrokerProfile {
    pub fn new(name: impl Into<String>, bootstrap_servers: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bootstrap_servers: bootstrap_servers.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_sasl(
        mut self,
        mechanism: SaslMechanism,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.auth_type = AuthType::Sasl;
        self.sasl_mechanism = mechanism;
        self.username = username.into();
        self.password = password.into();
        self
    }

    pub fn requires_credentials(&self) -> bool {
        self.auth_type == AuthType::Sasl
    }

    /// Whether `servers` is a comma separated list of `host:port` entries.
    pub fn is_valid_bootstrap_servers(servers: &str) -> bool {
        BOOTSTRAP_SERVERS
            .as_ref()
            .is_some_and(|re| re.is_match(servers))
    }

    /// Panel row for this profile.
    pub fn to_broker(&self, id: usize) -> Broker {
        Broker {
            id,
            name: self.name.clone(),
            address: self.bootstrap_servers.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_type_round_trips_through_options() {
        for option in AuthType::options() {
            let parsed: AuthType = option.as_str().parse().unwrap();
            assert_eq!(parsed, *option);
        }
        assert_eq!("SSL".parse::<AuthType>().unwrap(), AuthType::Ssl);
    }

    #[test]
    fn auth_type_rejects_unknown() {
        assert!("kerberos".parse::<AuthType>().is_err());
    }

    #[test]
    fn sasl_mechanism_round_trips() {
        for mechanism in SaslMechanism::options() {
            assert_eq!(mechanism.to_string().parse::<SaslMechanism>().unwrap(), *mechanism);
        }
    }

    #[test]
    fn bootstrap_server_format() {
        assert!(BrokerProfile::is_valid_bootstrap_servers("localhost:9092"));
        assert!(BrokerProfile::is_valid_bootstrap_servers("b1.example.com:9092,b2:9093"));
        assert!(!BrokerProfile::is_valid_bootstrap_servers("localhost"));
        assert!(!BrokerProfile::is_valid_bootstrap_servers("localhost:9092, b2:9093"));
        assert!(!BrokerProfile::is_valid_bootstrap_servers(""));
    }

    #[test]
    fn password_is_not_serialized() {
        let profile = BrokerProfile::new("prod", "kafka:9092").with_sasl(
            SaslMechanism::ScramSha512,
            "admin",
            "secret",
        );
        let json = serde_json::to_string(&profile).unwrap();
        assert!(!json.contains("secret"));

        let restored: BrokerProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.username, "admin");
        assert!(restored.password.is_empty());
        assert_eq!(restored.sasl_mechanism, SaslMechanism::ScramSha512);
    }
}
