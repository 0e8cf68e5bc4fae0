use std::str::FromStr;

use kafka_deck_core::types::{AuthType, BrokerProfile, SaslMechanism};

use super::{FieldKind, FormFields, Step, Transition, ValidationErrors, Wizard};

const AUTH_OPTIONS: &[&str] = &["None", "SASL"];
const SASL_OPTIONS: &[&str] = &["PLAIN", "SCRAM-SHA-256", "SCRAM-SHA-512", "OAUTHBEARER"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddBrokerStep {
    Name,
    BootstrapServers,
    AuthType,
    SaslMechanism,
    Username,
    Password,
}

/// Names already taken by saved profiles
pub type ExistingNames = Vec<String>;

pub type AddBrokerWizard = Wizard<AddBrokerStep>;

impl AddBrokerWizard {
    pub fn add_broker(existing: ExistingNames) -> Self {
        let fields = FormFields::new()
            .with("auth_type", AuthType::None.as_str())
            .with("sasl_mechanism", SaslMechanism::Plain.as_str());
        Wizard::new("Add Broker", fields, existing)
    }
}

fn is_sasl(fields: &FormFields) -> bool {
    AuthType::from_str(fields.get("auth_type")).is_ok_and(|a| a == AuthType::Sasl)
}

impl Step for AddBrokerStep {
    type Output = BrokerProfile;
    type Context = ExistingNames;

    const FIRST: Self = Self::Name;

    fn next(self, fields: &FormFields) -> Transition<Self> {
        match self {
            Self::Name => Transition::Step(Self::BootstrapServers),
            Self::BootstrapServers => Transition::Step(Self::AuthType),
            Self::AuthType if is_sasl(fields) => Transition::Step(Self::SaslMechanism),
            Self::AuthType | Self::Password => Transition::Submit,
            Self::SaslMechanism => Transition::Step(Self::Username),
            Self::Username => Transition::Step(Self::Password),
        }
    }

    fn prev(self, _fields: &FormFields) -> Option<Self> {
        match self {
            Self::Name => None,
            Self::BootstrapServers => Some(Self::Name),
            Self::AuthType => Some(Self::BootstrapServers),
            Self::SaslMechanism => Some(Self::AuthType),
            Self::Username => Some(Self::SaslMechanism),
            Self::Password => Some(Self::Username),
        }
    }

    fn field(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::BootstrapServers => "bootstrap_servers",
            Self::AuthType => "auth_type",
            Self::SaslMechanism => "sasl_mechanism",
            Self::Username => "username",
            Self::Password => "password",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Name => "Broker name:",
            Self::BootstrapServers => "Bootstrap servers (host:port,host:port):",
            Self::AuthType => "Authentication (use arrow keys, Enter to confirm):",
            Self::SaslMechanism => "SASL mechanism:",
            Self::Username => "Username:",
            Self::Password => "Password:",
        }
    }

    fn kind(self) -> FieldKind {
        match self {
            Self::AuthType => FieldKind::Choice(AUTH_OPTIONS),
            Self::SaslMechanism => FieldKind::Choice(SASL_OPTIONS),
            Self::Password => FieldKind::Secret,
            _ => FieldKind::Text,
        }
    }

    fn validate(fields: &FormFields, existing: &ExistingNames) -> Result<BrokerProfile, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = fields.trimmed("name");
        let servers = fields.trimmed("bootstrap_servers");

        if name.is_empty() {
            errors.add("name", "name is required");
        } else if existing.iter().any(|n| n == name) {
            errors.add("name", format!("broker '{name}' already exists"));
        }

        if servers.is_empty() {
            errors.add("bootstrap_servers", "bootstrap servers is required");
        } else if !BrokerProfile::is_valid_bootstrap_servers(servers) {
            errors.add(
                "bootstrap_servers",
                "invalid format, use host:port or host:port,host:port",
            );
        }

        let mut profile = BrokerProfile::new(name, servers);
        if is_sasl(fields) {
            let username = fields.trimmed("username");
            let password = fields.trimmed("password");
            if username.is_empty() {
                errors.add("username", "username is required for SASL");
            }
            if password.is_empty() {
                errors.add("password", "password is required for SASL");
            }
            let mechanism = SaslMechanism::from_str(fields.get("sasl_mechanism")).unwrap_or_default();
            profile = profile.with_sasl(mechanism, username, password);
        }

        errors.into_result(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(w: &mut AddBrokerWizard, text: &str) {
        text.chars().for_each(|c| w.input(c));
    }

    #[test]
    fn auth_none_makes_auth_step_terminal() {
        let mut w = AddBrokerWizard::add_broker(Vec::new());
        type_text(&mut w, "local");
        assert!(!w.next_step());
        type_text(&mut w, "localhost:9092");
        assert!(!w.next_step());
        assert_eq!(w.step(), AddBrokerStep::AuthType);
        assert!(w.next_step());
        assert_eq!(w.step(), AddBrokerStep::AuthType);

        let profile = w.submit().unwrap();
        assert_eq!(profile.name, "local");
        assert_eq!(profile.auth_type, AuthType::None);
    }

    #[test]
    fn sasl_visits_credential_steps() {
        let mut w = AddBrokerWizard::add_broker(Vec::new());
        type_text(&mut w, "prod");
        w.next_step();
        type_text(&mut w, "kafka-1:9092,kafka-2:9092");
        w.next_step();
        w.cycle(true);
        assert_eq!(w.value(), "SASL");
        assert!(!w.next_step());
        assert_eq!(w.step(), AddBrokerStep::SaslMechanism);
        w.cycle(false);
        assert_eq!(w.value(), "OAUTHBEARER");
        w.next_step();
        type_text(&mut w, "alice");
        w.next_step();
        assert_eq!(w.step(), AddBrokerStep::Password);
        assert_eq!(w.step().kind(), FieldKind::Secret);
        type_text(&mut w, "s3cret");
        assert!(w.next_step());

        let profile = w.submit().unwrap();
        assert_eq!(profile.auth_type, AuthType::Sasl);
        assert_eq!(profile.sasl_mechanism, SaslMechanism::OAuthBearer);
        assert_eq!(profile.username, "alice");
        assert_eq!(profile.password, "s3cret");
    }

    #[test]
    fn prev_is_unavailable_on_first_step() {
        let mut w = AddBrokerWizard::add_broker(Vec::new());
        assert!(!w.prev_step());
        w.next_step();
        assert!(w.prev_step());
        assert_eq!(w.step(), AddBrokerStep::Name);
    }

    #[test]
    fn validation_collects_every_violation() {
        let mut w = AddBrokerWizard::add_broker(Vec::new());
        w.next_step();
        type_text(&mut w, "not a server");
        w.next_step();
        w.cycle(true);

        let errors = w.submit().unwrap_err();
        assert_eq!(errors.get("name"), Some("name is required"));
        assert_eq!(
            errors.get("bootstrap_servers"),
            Some("invalid format, use host:port or host:port,host:port")
        );
        assert_eq!(errors.get("username"), Some("username is required for SASL"));
        assert_eq!(errors.get("password"), Some("password is required for SASL"));
        assert_eq!(w.errors(), &errors);
        assert_eq!(w.step(), AddBrokerStep::AuthType);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut w = AddBrokerWizard::add_broker(vec!["local".into()]);
        type_text(&mut w, " local ");
        w.next_step();
        type_text(&mut w, "localhost:9092");
        assert!(w.submit().unwrap_err().get("name").is_some());
    }

    #[test]
    fn auth_options_round_trip() {
        for option in AUTH_OPTIONS {
            let parsed = AuthType::from_str(option).unwrap();
            assert_eq!(parsed.as_str(), *option);
        }
    }
}
