use std::fmt;
use uuid::Uuid;

/// Correlation id tying one client's stream session to the subscription
/// messages exchanged with the twin backend.
///
/// Taken from the `x-correlation-id` request header when the client supplies
/// one, freshly generated otherwise. Stable for the whole session lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Generate a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Adopt a client-supplied header value, unless it is blank.
    pub fn from_header(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(CorrelationId::generate(), CorrelationId::generate());
    }

    #[test]
    fn header_values_are_trimmed_and_blank_ones_refused() {
        let id = CorrelationId::from_header("  abc-123  ").unwrap();
        assert_eq!(id.as_str(), "abc-123");
        assert_eq!(CorrelationId::from_header("   "), None);
        assert_eq!(CorrelationId::from_header(""), None);
    }
}
