//! Ordered field sets for one resource type.
//!
//! `Fields` is what a resource declares. The panel asks it for the fields of a
//! view (filtered by visibility and authorization, resolved for display), fills
//! models from requests, and collects validation rules per attribute.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use crate::config::FieldsConfig;
use crate::field::Field;
use crate::resource::{Request, Resource};
use crate::types::View;

#[derive(Debug, Clone, Default)]
pub struct Fields {
    fields: Vec<Field>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style append.
    pub fn with(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn push(&mut self, field: Field) {
        self.fields.push(field);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field by attribute.
    pub fn find(&self, attribute: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.attribute_name() == attribute)
    }

    /// Fields shown on `view` and visible to `request`, resolved for display
    /// against `resource`, in declaration order.
    pub fn for_view(&self, view: View, request: &Request, resource: &Resource) -> Vec<Field> {
        let resolved: Vec<Field> = self
            .fields
            .iter()
            .filter(|f| f.is_shown_on(view) && f.authorized_to_see(request, resource))
            .cloned()
            .map(|mut f| {
                f.resolve_for_display(resource);
                f
            })
            .collect();
        debug!(
            view = %view,
            declared = self.fields.len(),
            shown = resolved.len(),
            "resolved fields for view"
        );
        resolved
    }

    /// `for_view`, serialized as the JSON array the frontend receives.
    pub fn serialize_for_view(&self, view: View, request: &Request, resource: &Resource) -> Value {
        Value::Array(
            self.for_view(view, request, resource)
                .iter()
                .map(|f| Value::Object(f.json_serialize()))
                .collect(),
        )
    }

    /// Fill the model from every field the request is authorized to see.
    ///
    /// Visibility flags are not consulted; a field hidden on a form still
    /// writes when its attribute is present in the request.
    pub fn fill(&self, request: &Request, model: &mut Resource) {
        for field in &self.fields {
            if field.authorized_to_see(request, model) {
                field.fill(request, model);
            } else {
                debug!(field = %field.attribute_name(), "fill skipped, not authorized");
            }
        }
    }

    /// Creation rules keyed by attribute. Fields without rules are omitted.
    pub fn creation_rules(&self) -> BTreeMap<String, Vec<String>> {
        self.collect_rules(Field::creation_rules_set)
    }

    /// Update rules keyed by attribute. Fields without rules are omitted.
    pub fn update_rules(&self) -> BTreeMap<String, Vec<String>> {
        self.collect_rules(Field::update_rules_set)
    }

    fn collect_rules(&self, rules_of: fn(&Field) -> Vec<String>) -> BTreeMap<String, Vec<String>> {
        self.fields
            .iter()
            .filter_map(|f| {
                let rules = rules_of(f);
                (!rules.is_empty()).then(|| (f.attribute_name().to_string(), rules))
            })
            .collect()
    }

    /// Apply project defaults to every field that left them unset.
    pub fn apply_config(&mut self, config: &FieldsConfig) {
        for field in &mut self.fields {
            config.apply(field);
        }
    }
}

impl FromIterator<Field> for Fields {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Fields {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl IntoIterator for Fields {
    type Item = Field;
    type IntoIter = std::vec::IntoIter<Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}
