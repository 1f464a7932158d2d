//! Field kinds and the small enumerations shared across the crate.
//!
//! `FieldKind` is the tagged variant carrying each kind's extra options. It
//! deserializes from YAML definitions (`kind:` tag, kebab case) and produces the
//! kind-specific `meta()` entries of the wire format.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::FieldsError;

/// Disk used by file fields that were not given one.
pub const DEFAULT_DISK: &str = "public";

/// Storage path used by file fields that were not given one.
pub const DEFAULT_PATH: &str = "/";

/// Accepted MIME pattern for audio fields that were not given one.
pub const DEFAULT_AUDIO_TYPES: &str = "audio/*";

/// How much of an audio file the browser should fetch up front.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Preload {
    None,
    #[default]
    Metadata,
    Auto,
}

impl Preload {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preload::None => "none",
            Preload::Metadata => "metadata",
            Preload::Auto => "auto",
        }
    }
}

impl fmt::Display for Preload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preload {
    type Err = FieldsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Preload::None),
            "metadata" => Ok(Preload::Metadata),
            "auto" => Ok(Preload::Auto),
            other => Err(FieldsError::InvalidPreload {
                value: other.to_string(),
            }),
        }
    }
}

/// The four places a field can appear in the panel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Index,
    Detail,
    Create,
    Update,
}

impl View {
    pub const ALL: [View; 4] = [View::Index, View::Detail, View::Create, View::Update];

    pub fn as_str(&self) -> &'static str {
        match self {
            View::Index => "index",
            View::Detail => "detail",
            View::Create => "create",
            View::Update => "update",
        }
    }

    /// Create and update are the form views.
    pub fn is_form(&self) -> bool {
        matches!(self, View::Create | View::Update)
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = FieldsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "index" => Ok(View::Index),
            "detail" => Ok(View::Detail),
            "create" | "creation" => Ok(View::Create),
            "update" => Ok(View::Update),
            other => Err(FieldsError::InvalidView {
                value: other.to_string(),
            }),
        }
    }
}

/// The four visibility flags of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visibility {
    pub index: bool,
    pub detail: bool,
    pub creation: bool,
    pub update: bool,
}

impl Visibility {
    /// Shown in every view.
    pub const fn everywhere() -> Self {
        Self {
            index: true,
            detail: true,
            creation: true,
            update: true,
        }
    }

    pub fn is_shown_on(&self, view: View) -> bool {
        match view {
            View::Index => self.index,
            View::Detail => self.detail,
            View::Create => self.creation,
            View::Update => self.update,
        }
    }

    pub fn set(&mut self, view: View, shown: bool) {
        match view {
            View::Index => self.index = shown,
            View::Detail => self.detail = shown,
            View::Create => self.creation = shown,
            View::Update => self.update = shown,
        }
    }
}

impl Default for Visibility {
    fn default() -> Self {
        Self::everywhere()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TextareaOptions {
    pub rows: u32,
    pub always_show: bool,
}

impl Default for TextareaOptions {
    fn default() -> Self {
        Self {
            rows: 5,
            always_show: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct NumberOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
}

/// Stored representations of the two boolean states.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BooleanOptions {
    pub true_value: Value,
    pub false_value: Value,
}

impl Default for BooleanOptions {
    fn default() -> Self {
        Self {
            true_value: Value::Bool(true),
            false_value: Value::Bool(false),
        }
    }
}

/// Storage configuration shared by every file-backed kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct FileOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted_types: Option<String>,
    /// Maximum upload size in kilobytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_size: Option<u64>,
    pub downloads_disabled: bool,
}

impl FileOptions {
    pub fn effective_disk(&self) -> &str {
        self.disk.as_deref().unwrap_or(DEFAULT_DISK)
    }

    pub fn effective_path(&self) -> &str {
        self.path.as_deref().unwrap_or(DEFAULT_PATH)
    }

    fn meta(&self, default_types: Option<&str>) -> Map<String, Value> {
        let mut meta = Map::new();
        meta.insert("disk".into(), json!(self.effective_disk()));
        meta.insert("path".into(), json!(self.effective_path()));
        meta.insert(
            "acceptedTypes".into(),
            json!(self.accepted_types.as_deref().or(default_types)),
        );
        meta.insert("maxSize".into(), json!(self.max_size));
        meta.insert("downloadsDisabled".into(), json!(self.downloads_disabled));
        meta
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct AudioOptions {
    #[serde(flatten)]
    pub file: FileOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preload: Option<Preload>,
}

impl AudioOptions {
    pub fn effective_preload(&self) -> Preload {
        self.preload.unwrap_or_default()
    }

    pub fn effective_accepted_types(&self) -> &str {
        self.file
            .accepted_types
            .as_deref()
            .unwrap_or(DEFAULT_AUDIO_TYPES)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct HeadingOptions {
    pub as_html: bool,
}

/// Style flags of a line. The frontend honours whichever was set last; all
/// three are stored as given.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct LineOptions {
    pub as_small: bool,
    pub as_heading: bool,
    pub as_sub_text: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct IdOptions {
    pub as_big_int: bool,
    pub copyable: bool,
}

/// The kind of a field, carrying the options specific to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum FieldKind {
    Text,
    Textarea(TextareaOptions),
    Number(NumberOptions),
    Boolean(BooleanOptions),
    File(FileOptions),
    Audio(AudioOptions),
    /// Static text or HTML; the label is the content.
    Heading(HeadingOptions),
    /// A single styled line, usually inside a stack.
    Line(LineOptions),
    Id(IdOptions),
}

impl FieldKind {
    /// Frontend component the panel dispatches on.
    pub fn component(&self) -> &'static str {
        match self {
            FieldKind::Text => "text-field",
            FieldKind::Textarea(_) => "textarea-field",
            FieldKind::Number(_) => "number-field",
            FieldKind::Boolean(_) => "boolean-field",
            FieldKind::File(_) => "file-field",
            FieldKind::Audio(_) => "audio-field",
            FieldKind::Heading(_) => "heading-field",
            FieldKind::Line(_) => "line-field",
            FieldKind::Id(_) => "id-field",
        }
    }

    /// Short kind name, matching the YAML tag.
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Textarea(_) => "textarea",
            FieldKind::Number(_) => "number",
            FieldKind::Boolean(_) => "boolean",
            FieldKind::File(_) => "file",
            FieldKind::Audio(_) => "audio",
            FieldKind::Heading(_) => "heading",
            FieldKind::Line(_) => "line",
            FieldKind::Id(_) => "id",
        }
    }

    /// Visibility a freshly constructed field of this kind starts with.
    pub fn default_visibility(&self) -> Visibility {
        let mut visibility = Visibility::everywhere();
        match self {
            FieldKind::Textarea(_) | FieldKind::Heading(_) => visibility.index = false,
            FieldKind::Id(_) => visibility.creation = false,
            _ => {}
        }
        visibility
    }

    pub fn default_readonly(&self) -> bool {
        matches!(self, FieldKind::Heading(_) | FieldKind::Line(_))
    }

    pub fn default_sortable(&self) -> bool {
        matches!(self, FieldKind::Id(_))
    }

    /// Whether `fill` may write to the model at all.
    pub fn writes_model(&self) -> bool {
        !matches!(
            self,
            FieldKind::Heading(_) | FieldKind::Line(_) | FieldKind::Id(_)
        )
    }

    /// Storage options for the file-backed kinds.
    pub fn file_options(&self) -> Option<&FileOptions> {
        match self {
            FieldKind::File(opts) => Some(opts),
            FieldKind::Audio(opts) => Some(&opts.file),
            _ => None,
        }
    }

    pub fn file_options_mut(&mut self) -> Option<&mut FileOptions> {
        match self {
            FieldKind::File(opts) => Some(opts),
            FieldKind::Audio(opts) => Some(&mut opts.file),
            _ => None,
        }
    }

    /// Kind-specific wire entries, camel-cased for the frontend.
    pub fn meta(&self) -> Map<String, Value> {
        match self {
            FieldKind::Text => Map::new(),
            FieldKind::Textarea(opts) => object(json!({
                "rows": opts.rows,
                "alwaysShow": opts.always_show,
            })),
            FieldKind::Number(opts) => object(json!({
                "min": opts.min,
                "max": opts.max,
                "step": opts.step,
            })),
            FieldKind::Boolean(opts) => object(json!({
                "trueValue": opts.true_value,
                "falseValue": opts.false_value,
            })),
            FieldKind::File(opts) => opts.meta(None),
            FieldKind::Audio(opts) => {
                let mut meta = opts.file.meta(Some(DEFAULT_AUDIO_TYPES));
                meta.insert("preload".into(), json!(opts.effective_preload()));
                meta
            }
            FieldKind::Heading(opts) => object(json!({
                "asHtml": opts.as_html,
                "isHeading": true,
            })),
            FieldKind::Line(opts) => object(json!({
                "asSmall": opts.as_small,
                "asHeading": opts.as_heading,
                "asSubText": opts.as_sub_text,
                "isLine": true,
            })),
            FieldKind::Id(opts) => object(json!({
                "asBigInt": opts.as_big_int,
                "copyable": opts.copyable,
            })),
        }
    }
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
