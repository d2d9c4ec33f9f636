use super::{schemars, JsonSchema};
use serde_derive::{Deserialize, Serialize};

/// Contact form payload. Every field is optional at the serde level so a
/// missing field yields a 400 with a descriptive message instead of a
/// deserialization failure.
#[derive(Debug, JsonSchema, Serialize, Deserialize, Clone, Default)]
pub struct ContactForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ContactForm {
    /// First required field that is absent or blank, if any. Phone is the
    /// only optional field.
    pub fn missing_field(&self) -> Option<&'static str> {
        fn blank(value: &Option<String>) -> bool {
            value.as_deref().map_or(true, |v| v.trim().is_empty())
        }

        if blank(&self.name) {
            Some("name")
        } else if blank(&self.email) {
            Some("email")
        } else if blank(&self.subject) {
            Some("subject")
        } else if blank(&self.message) {
            Some("message")
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ContactForm {
        ContactForm {
            name: Some("Jean Martin".to_string()),
            email: Some("jean@example.org".to_string()),
            phone: None,
            subject: Some("Inscription".to_string()),
            message: Some("Bonjour, je souhaite m'inscrire.".to_string()),
        }
    }

    #[test]
    fn complete_form_is_valid_without_phone() {
        assert_eq!(filled().missing_field(), None);
    }

    #[test]
    fn absent_message_is_reported() {
        let mut form = filled();
        form.message = None;
        assert_eq!(form.missing_field(), Some("message"));
    }

    #[test]
    fn blank_subject_counts_as_missing() {
        let mut form = filled();
        form.subject = Some("   ".to_string());
        assert_eq!(form.missing_field(), Some("subject"));
    }
}
