//! Declarative field and resource definitions.
//!
//! Resources can be declared in YAML instead of code. One file describes one
//! resource type and the fields it shows:
//!
//! ```yaml
//! name: songs
//! fields:
//!   - name: ID
//!     type: { kind: id, as_big_int: true, copyable: true }
//!   - name: Theme Song
//!     type: { kind: audio, disk: s3, preload: auto }
//!     nullable: true
//!     rules: [required]
//!   - name: Notes
//!     type: { kind: textarea, rows: 3 }
//!     index: false
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::collection::Fields;
use crate::error::{FieldsError, Result};
use crate::field::Field;
use crate::types::{FieldKind, View};

/// The declared form of a single field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    #[serde(rename = "type")]
    pub type_: FieldKind,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readonly: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sortable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub creation_rules: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub update_rules: Vec<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub meta: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update: Option<bool>,
}

impl FieldSpec {
    /// A definition with only a name and kind; everything else defaulted.
    pub fn new(name: impl Into<String>, type_: FieldKind) -> Self {
        Self {
            name: name.into(),
            attribute: None,
            type_,
            nullable: false,
            readonly: None,
            sortable: None,
            help: None,
            rules: Vec::new(),
            creation_rules: Vec::new(),
            update_rules: Vec::new(),
            meta: Map::new(),
            index: None,
            detail: None,
            create: None,
            update: None,
        }
    }

    /// Build the configured field. Unset options keep the kind's defaults.
    pub fn build(&self) -> Field {
        let mut field = Field::new(self.type_.clone(), &self.name).nullable(self.nullable);
        if let Some(attribute) = &self.attribute {
            field = field.attribute(attribute);
        }
        if let Some(readonly) = self.readonly {
            field = field.readonly(readonly);
        }
        if let Some(sortable) = self.sortable {
            field = field.sortable(sortable);
        }
        if let Some(help) = &self.help {
            field = field.help(help);
        }
        field = field
            .rules(&self.rules)
            .creation_rules(&self.creation_rules)
            .update_rules(&self.update_rules);
        for (key, value) in &self.meta {
            field = field.with_meta(key, value.clone());
        }
        for (view, shown) in [
            (View::Index, self.index),
            (View::Detail, self.detail),
            (View::Create, self.create),
            (View::Update, self.update),
        ] {
            if let Some(shown) = shown {
                field = field.shown_on(view, shown);
            }
        }
        field
    }
}

/// A resource type and the fields it declares, in display order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

impl ResourceDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            fields: Vec::new(),
        }
    }

    /// Builder-style append.
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Reject definitions whose name cannot be a file name under
    /// `resources/`, or where two fields resolve to the same attribute.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() || self.name.contains(['/', '\\']) || self.name.contains("..") {
            return Err(FieldsError::InvalidResourceName {
                name: self.name.clone(),
            });
        }
        let mut seen = HashSet::new();
        for spec in &self.fields {
            let field = spec.build();
            if !seen.insert(field.attribute_name().to_string()) {
                return Err(FieldsError::DuplicateAttribute {
                    resource: self.name.clone(),
                    attribute: field.attribute_name().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Build the field set this resource declares.
    pub fn build_fields(&self) -> Result<Fields> {
        self.validate()?;
        Ok(self.fields.iter().map(FieldSpec::build).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{IdOptions, Preload};
    use serde_json::json;

    const SONGS_YAML: &str = r#"
name: songs
label: Songs
fields:
  - name: ID
    type: { kind: id, as_big_int: true, copyable: true }
  - name: Theme Song
    type: { kind: audio, disk: s3, preload: auto }
    nullable: true
    rules: [required]
    creation_rules: ["mimes:mp3"]
  - name: Notes
    type: { kind: textarea, rows: 3 }
    index: true
    help: Internal only
    meta:
      placeholder: Write something
  - name: Artist
    attribute: artist_name
    type: { kind: text }
    update: false
"#;

    #[test]
    fn resource_yaml_parses() {
        let def: ResourceDef = serde_yaml_ng::from_str(SONGS_YAML).unwrap();
        assert_eq!(def.name, "songs");
        assert_eq!(def.label.as_deref(), Some("Songs"));
        assert_eq!(def.fields.len(), 4);
        assert_eq!(
            def.fields[0].type_,
            FieldKind::Id(IdOptions {
                as_big_int: true,
                copyable: true,
            })
        );
    }

    #[test]
    fn field_specs_build_configured_fields() {
        let def: ResourceDef = serde_yaml_ng::from_str(SONGS_YAML).unwrap();
        let fields = def.build_fields().unwrap();

        let song = fields.find("theme_song").unwrap();
        assert_eq!(song.preload_mode(), Some(Preload::Auto));
        assert_eq!(song.meta()["disk"], json!("s3"));
        assert!(song.is_nullable());
        assert_eq!(song.creation_rules_set(), vec!["required", "mimes:mp3"]);

        let notes = fields.find("notes").unwrap();
        assert!(notes.is_shown_on(View::Index));
        assert_eq!(notes.help_text(), Some("Internal only"));
        assert_eq!(notes.meta()["rows"], json!(3));
        assert_eq!(notes.meta()["placeholder"], json!("Write something"));

        let artist = fields.find("artist_name").unwrap();
        assert_eq!(artist.name(), "Artist");
        assert!(!artist.is_shown_on(View::Update));
        assert!(artist.is_shown_on(View::Create));

        let id = fields.find("id").unwrap();
        assert!(!id.is_shown_on(View::Create));
    }

    #[test]
    fn duplicate_attribute_is_rejected() {
        let def = ResourceDef::new("users")
            .field(FieldSpec::new("Email", FieldKind::Text))
            .field(FieldSpec {
                attribute: Some("email".into()),
                ..FieldSpec::new("E-mail", FieldKind::Text)
            });
        let err = def.build_fields().unwrap_err();
        assert!(matches!(
            err,
            FieldsError::DuplicateAttribute { ref attribute, .. } if attribute == "email"
        ));
    }

    #[test]
    fn names_that_escape_resources_dir_are_rejected() {
        for name in ["../x", "a/b", "a\\b", "..", ""] {
            let err = ResourceDef::new(name).validate().unwrap_err();
            assert!(
                matches!(err, FieldsError::InvalidResourceName { .. }),
                "{name:?} accepted"
            );
        }
        assert!(ResourceDef::new("song-lyrics_v2").validate().is_ok());
    }

    #[test]
    fn unknown_kind_fails_to_parse() {
        let yaml = "name: x\nfields:\n  - name: A\n    type: { kind: slider }\n";
        assert!(serde_yaml_ng::from_str::<ResourceDef>(yaml).is_err());
    }

    #[test]
    fn minimal_field_spec_serializes_compactly() {
        let spec = FieldSpec::new("Name", FieldKind::Text);
        let yaml = serde_yaml_ng::to_string(&spec).unwrap();
        assert!(yaml.contains("type:"));
        assert!(!yaml.contains("type_:"));
        assert!(!yaml.contains("rules"));
        assert!(!yaml.contains("attribute"));
    }
}
