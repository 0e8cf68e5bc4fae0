use kafka_deck_core::types::Header;

use super::{FormFields, Step, Transition, ValidationErrors, Wizard};

/// A record ready to hand to the producer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProduceRequest {
    pub topic: String,
    pub key: String,
    pub value: String,
    pub headers: Vec<Header>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProduceMessageStep {
    Key,
    Value,
    Headers,
}

pub type ProduceMessageForm = Wizard<ProduceMessageStep>;

impl ProduceMessageForm {
    pub fn produce(topic: impl Into<String>) -> Self {
        let topic = topic.into();
        Wizard::new(format!("Produce Message to: {topic}"), FormFields::new(), topic)
    }
}

/// `k1=v1, k2=v2` or one pair per line.
fn parse_headers(raw: &str) -> Result<Vec<Header>, String> {
    raw.split([',', '\n'])
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once('=') {
            Some((k, v)) if !k.trim().is_empty() => Ok(Header::new(k.trim(), v.trim())),
            _ => Err(format!("invalid header '{entry}', use key=value")),
        })
        .collect()
}

impl Step for ProduceMessageStep {
    type Output = ProduceRequest;
    /// Target topic
    type Context = String;

    const FIRST: Self = Self::Key;

    fn next(self, _fields: &FormFields) -> Transition<Self> {
        match self {
            Self::Key => Transition::Step(Self::Value),
            Self::Value => Transition::Step(Self::Headers),
            Self::Headers => Transition::Submit,
        }
    }

    fn prev(self, _fields: &FormFields) -> Option<Self> {
        match self {
            Self::Key => None,
            Self::Value => Some(Self::Key),
            Self::Headers => Some(Self::Value),
        }
    }

    fn field(self) -> &'static str {
        match self {
            Self::Key => "key",
            Self::Value => "value",
            Self::Headers => "headers",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Key => "Key:",
            Self::Value => "Value:",
            Self::Headers => "Headers (key=value, comma separated):",
        }
    }

    fn validate(fields: &FormFields, topic: &String) -> Result<ProduceRequest, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if topic.trim().is_empty() {
            errors.add("topic", "topic is required");
        }
        let headers = parse_headers(fields.get("headers")).unwrap_or_else(|e| {
            errors.add("headers", e);
            Vec::new()
        });
        errors.into_result(ProduceRequest {
            topic: topic.trim().to_string(),
            key: fields.get("key").to_string(),
            value: fields.get("value").to_string(),
            headers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_request_with_headers() {
        let mut form = ProduceMessageForm::produce("orders");
        "order-1".chars().for_each(|c| form.input(c));
        form.next_step();
        r#"{"id":1}"#.chars().for_each(|c| form.input(c));
        form.next_step();
        "source=cli, trace = abc".chars().for_each(|c| form.input(c));
        assert!(form.next_step());

        let request = form.submit().unwrap();
        assert_eq!(request.topic, "orders");
        assert_eq!(request.key, "order-1");
        assert_eq!(
            request.headers,
            vec![Header::new("source", "cli"), Header::new("trace", "abc")]
        );
    }

    #[test]
    fn topic_is_required() {
        let mut form = ProduceMessageForm::produce("  ");
        assert_eq!(form.submit().unwrap_err().get("topic"), Some("topic is required"));
    }

    #[test]
    fn malformed_header_is_reported() {
        assert!(parse_headers("novalue").is_err());
        assert!(parse_headers("=v").is_err());
        assert_eq!(parse_headers("").unwrap(), Vec::new());
    }
}
