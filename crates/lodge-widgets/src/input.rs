//! Input builder

use lodge_dom::{Document, NodeId};

use crate::{Result, slug, unique_id};

/// Builder for an `input` element
#[derive(Debug, Clone)]
pub struct Input {
    name: String,
    input_type: String,
    id: Option<String>,
    required: bool,
    autocomplete: Option<String>,
    placeholder: Option<String>,
}

impl Input {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            input_type: "text".to_string(),
            id: None,
            required: false,
            autocomplete: None,
            placeholder: None,
        }
    }

    pub fn input_type(mut self, input_type: &str) -> Self {
        self.input_type = input_type.to_string();
        self
    }

    /// Use a fixed id instead of one derived from the name
    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn autocomplete(mut self, token: &str) -> Self {
        self.autocomplete = Some(token.to_string());
        self
    }

    pub fn placeholder(mut self, text: &str) -> Self {
        self.placeholder = Some(text.to_string());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Id the element will get in `doc`.
    ///
    /// Derived from the name (`input-{name}`) so the same form renders the
    /// same ids every time; a suffix is added only on collision.
    pub fn resolve_id(&self, doc: &Document) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => unique_id(doc, &format!("input-{}", slug(&self.name))),
        }
    }

    /// Create the element under `parent`
    pub fn build(&self, doc: &mut Document, parent: NodeId) -> Result<NodeId> {
        let id = self.resolve_id(doc);
        let mut attrs: Vec<(&str, &str)> = vec![
            ("id", id.as_str()),
            ("type", self.input_type.as_str()),
            ("name", self.name.as_str()),
        ];
        if self.required {
            attrs.push(("required", ""));
            attrs.push(("aria-required", "true"));
        }
        if let Some(token) = &self.autocomplete {
            attrs.push(("autocomplete", token.as_str()));
        }
        if let Some(text) = &self.placeholder {
            attrs.push(("placeholder", text.as_str()));
        }
        let node = doc.append_element(parent, "input", &attrs)?;
        tracing::debug!("Built input {} as {}", self.name, node);
        Ok(node)
    }
}
