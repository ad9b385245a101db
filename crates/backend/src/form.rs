//! Login form descriptors.
//!
//! A [`Form`] is static presentation metadata that tells a front end which
//! fields a user must fill in to open a session with a given backend. It is
//! serialized to JSON and never interpreted by the backend itself.

use serde::{Deserialize, Serialize};

/// A declarative login form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Form {
    /// Form elements in display order.
    pub elements: Vec<FormElement>,
}

impl Form {
    /// Create a form from its elements.
    pub fn new(elements: Vec<FormElement>) -> Self {
        Self { elements }
    }

    /// Look up an element by name.
    pub fn element(&self, name: &str) -> Option<&FormElement> {
        self.elements.iter().find(|e| e.name == name)
    }

    /// Names of all elements, in order.
    pub fn names(&self) -> Vec<&str> {
        self.elements.iter().map(|e| e.name.as_str()).collect()
    }
}

/// Input kind of a form element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Hidden field with a fixed value.
    Hidden,
    /// Plain text input.
    Text,
    /// Masked password input.
    Password,
    /// Toggle that reveals its target fields.
    Enable,
}

/// A single form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormElement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Fields revealed by an `enable` toggle.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub target: Vec<String>,
}

impl FormElement {
    /// Create an element with only a name and type set.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: None,
            name: name.into(),
            field_type,
            description: None,
            placeholder: None,
            value: None,
            target: Vec::new(),
        }
    }

    /// Set the element id.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the human-readable description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the placeholder text.
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Set a fixed value.
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set the fields revealed by this toggle.
    pub fn target<I, S>(mut self, target: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target = target.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_builder() {
        let element = FormElement::new("advanced", FieldType::Enable)
            .description("Advanced")
            .target(["path_template", "url"]);

        assert_eq!(element.name, "advanced");
        assert_eq!(element.field_type, FieldType::Enable);
        assert_eq!(element.description.as_deref(), Some("Advanced"));
        assert_eq!(element.target, vec!["path_template", "url"]);
        assert!(element.id.is_none());
    }

    #[test]
    fn test_unset_fields_are_omitted() {
        let element = FormElement::new("type", FieldType::Hidden).value("accountserver");
        let json = serde_json::to_value(&element).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "name": "type",
                "type": "hidden",
                "value": "accountserver",
            })
        );
    }

    #[test]
    fn test_form_lookup() {
        let form = Form::new(vec![
            FormElement::new("username", FieldType::Text),
            FormElement::new("password", FieldType::Password),
        ]);

        assert_eq!(form.names(), vec!["username", "password"]);
        assert_eq!(
            form.element("password").map(|e| e.field_type),
            Some(FieldType::Password)
        );
        assert!(form.element("missing").is_none());
    }

    #[test]
    fn test_form_json_shape() {
        let form = Form::new(vec![FormElement::new("url", FieldType::Text)
            .id("url")
            .placeholder("http://accountserver:8000")]);
        let json = serde_json::to_string(&form).unwrap();
        let parsed: Form = serde_json::from_str(&json).unwrap();

        assert!(json.contains("\"elements\""));
        assert_eq!(parsed, form);
    }
}
