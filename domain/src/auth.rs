/// Authorization subjects resolved for a request by the upstream
/// authentication layer.
///
/// Opaque to the gateway: it is forwarded in the start-streaming message so
/// the twin backend can enforce visibility, never evaluated here. An empty
/// context means the deployment runs without authentication.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthorizationContext {
    subjects: Vec<String>,
}

impl AuthorizationContext {
    pub fn new(subjects: Vec<String>) -> Self {
        Self { subjects }
    }

    pub fn subjects(&self) -> &[String] {
        &self.subjects
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_context_is_empty() {
        let context = AuthorizationContext::default();
        assert!(context.is_empty());
        assert!(context.subjects().is_empty());
    }

    #[test]
    fn subjects_are_kept_in_order() {
        let context =
            AuthorizationContext::new(vec!["iot:reader".to_string(), "iot:admin".to_string()]);
        assert!(!context.is_empty());
        assert_eq!(context.subjects(), ["iot:reader", "iot:admin"]);
    }
}
