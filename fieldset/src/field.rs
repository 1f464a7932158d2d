//! The field descriptor.
//!
//! A `Field` describes one attribute of a resource: how it is labelled, where
//! it is shown, how its value is read from the resource, how a request writes
//! it back, and what the frontend receives. Fields are configured with
//! chained builder calls and live for a single request:
//!
//! ```rust
//! use fieldset::{Field, Preload, Resource};
//!
//! let mut song = Field::audio("Theme Song")
//!     .disk("s3")
//!     .preload(Preload::Auto)
//!     .disable_downloads();
//!
//! song.resolve(&Resource::new().with("theme_song", "songs/intro.mp3"));
//! let wire = song.json_serialize();
//! assert_eq!(wire["attribute"], "theme_song");
//! assert_eq!(wire["preload"], "auto");
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};
use tracing::{trace, warn};

use crate::attribute::attribute_for;
use crate::resource::{Request, Resource};
use crate::types::{
    AudioOptions, BooleanOptions, FieldKind, FileOptions, HeadingOptions, IdOptions, LineOptions,
    NumberOptions, Preload, TextareaOptions, View, Visibility,
};

/// Computes a field's value from the resource: `(resource, attribute) -> value`.
pub type ResolveCallback = Arc<dyn Fn(&Resource, &str) -> Value + Send + Sync>;

/// Transforms a resolved value for display: `(value, resource, attribute) -> value`.
pub type DisplayCallback = Arc<dyn Fn(Value, &Resource, &str) -> Value + Send + Sync>;

/// Replaces the default fill: `(request, model, attribute)`.
pub type FillCallback = Arc<dyn Fn(&Request, &mut Resource, &str) + Send + Sync>;

/// Authorization predicate: `(request, resource) -> bool`.
pub type SeeCallback = Arc<dyn Fn(&Request, &Resource) -> bool + Send + Sync>;

/// One configured field.
#[derive(Clone)]
pub struct Field {
    name: String,
    attribute: String,
    kind: FieldKind,
    value: Value,
    visibility: Visibility,
    nullable: bool,
    readonly: bool,
    sortable: bool,
    help_text: Option<String>,
    rules: Vec<String>,
    creation_rules: Vec<String>,
    update_rules: Vec<String>,
    extra_meta: Map<String, Value>,
    resolve_callback: Option<ResolveCallback>,
    display_callback: Option<DisplayCallback>,
    fill_callback: Option<FillCallback>,
    see_callback: Option<SeeCallback>,
}

impl Field {
    /// Create a field of the given kind, applying that kind's defaults.
    ///
    /// The attribute is derived from `name` until `attribute()` overrides it.
    pub fn new(kind: FieldKind, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            attribute: attribute_for(&name),
            name,
            visibility: kind.default_visibility(),
            readonly: kind.default_readonly(),
            sortable: kind.default_sortable(),
            kind,
            value: Value::Null,
            nullable: false,
            help_text: None,
            rules: Vec::new(),
            creation_rules: Vec::new(),
            update_rules: Vec::new(),
            extra_meta: Map::new(),
            resolve_callback: None,
            display_callback: None,
            fill_callback: None,
            see_callback: None,
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(FieldKind::Text, name)
    }

    pub fn textarea(name: impl Into<String>) -> Self {
        Self::new(FieldKind::Textarea(TextareaOptions::default()), name)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(FieldKind::Number(NumberOptions::default()), name)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(FieldKind::Boolean(BooleanOptions::default()), name)
    }

    pub fn file(name: impl Into<String>) -> Self {
        Self::new(FieldKind::File(FileOptions::default()), name)
    }

    pub fn audio(name: impl Into<String>) -> Self {
        Self::new(FieldKind::Audio(AudioOptions::default()), name)
    }

    /// A heading whose label is also its content.
    pub fn heading(name: impl Into<String>) -> Self {
        Self::new(FieldKind::Heading(HeadingOptions::default()), name)
    }

    pub fn line(name: impl Into<String>) -> Self {
        Self::new(FieldKind::Line(LineOptions::default()), name)
    }

    pub fn id(name: impl Into<String>) -> Self {
        Self::new(FieldKind::Id(IdOptions::default()), name)
    }

    // --- Identity ---

    /// Use an explicit attribute instead of the one derived from the name.
    /// An empty attribute is ignored.
    pub fn attribute(mut self, attribute: impl Into<String>) -> Self {
        let attribute = attribute.into();
        if attribute.is_empty() {
            warn!(field = %self.name, "empty attribute ignored, keeping derived attribute");
        } else {
            self.attribute = attribute;
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribute_name(&self) -> &str {
        &self.attribute
    }

    pub fn component(&self) -> &'static str {
        self.kind.component()
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub(crate) fn kind_mut(&mut self) -> &mut FieldKind {
        &mut self.kind
    }

    /// The last resolved value, `null` before resolution.
    pub fn value(&self) -> &Value {
        &self.value
    }

    // --- Visibility ---

    pub fn show_on_index(mut self) -> Self {
        self.visibility.index = true;
        self
    }

    pub fn hide_from_index(mut self) -> Self {
        self.visibility.index = false;
        self
    }

    pub fn show_on_detail(mut self) -> Self {
        self.visibility.detail = true;
        self
    }

    pub fn hide_from_detail(mut self) -> Self {
        self.visibility.detail = false;
        self
    }

    pub fn show_on_creating(mut self) -> Self {
        self.visibility.creation = true;
        self
    }

    pub fn hide_when_creating(mut self) -> Self {
        self.visibility.creation = false;
        self
    }

    pub fn show_on_updating(mut self) -> Self {
        self.visibility.update = true;
        self
    }

    pub fn hide_when_updating(mut self) -> Self {
        self.visibility.update = false;
        self
    }

    pub fn only_on_index(self) -> Self {
        self.only_on(&[View::Index])
    }

    pub fn only_on_detail(self) -> Self {
        self.only_on(&[View::Detail])
    }

    pub fn only_on_forms(self) -> Self {
        self.only_on(&[View::Create, View::Update])
    }

    pub fn except_on_forms(self) -> Self {
        self.only_on(&[View::Index, View::Detail])
    }

    /// Set one visibility flag by view.
    pub fn shown_on(mut self, view: View, shown: bool) -> Self {
        self.visibility.set(view, shown);
        self
    }

    fn only_on(mut self, views: &[View]) -> Self {
        for view in View::ALL {
            self.visibility.set(view, views.contains(&view));
        }
        self
    }

    pub fn is_shown_on(&self, view: View) -> bool {
        self.visibility.is_shown_on(view)
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    // --- Flags and validation ---

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Mark the field read-only for the frontend. `fill` still writes it.
    pub fn readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.help_text = Some(text.into());
        self
    }

    /// Append rules applied on both create and update.
    pub fn rules<I, S>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rules.extend(rules.into_iter().map(Into::into));
        self
    }

    pub fn creation_rules<I, S>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.creation_rules.extend(rules.into_iter().map(Into::into));
        self
    }

    pub fn update_rules<I, S>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.update_rules.extend(rules.into_iter().map(Into::into));
        self
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    pub fn help_text(&self) -> Option<&str> {
        self.help_text.as_deref()
    }

    pub fn base_rules(&self) -> &[String] {
        &self.rules
    }

    /// Rules to validate a create request with: shared rules, then creation rules.
    pub fn creation_rules_set(&self) -> Vec<String> {
        self.rules
            .iter()
            .chain(&self.creation_rules)
            .cloned()
            .collect()
    }

    /// Rules to validate an update request with: shared rules, then update rules.
    pub fn update_rules_set(&self) -> Vec<String> {
        self.rules.iter().chain(&self.update_rules).cloned().collect()
    }

    /// Add a free-form meta entry. Overrides a kind entry with the same key.
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra_meta.insert(key.into(), value.into());
        self
    }

    // --- Callbacks ---

    pub fn resolve_using<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Resource, &str) -> Value + Send + Sync + 'static,
    {
        self.resolve_callback = Some(Arc::new(callback));
        self
    }

    pub fn display_using<F>(mut self, callback: F) -> Self
    where
        F: Fn(Value, &Resource, &str) -> Value + Send + Sync + 'static,
    {
        self.display_callback = Some(Arc::new(callback));
        self
    }

    pub fn fill_using<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Request, &mut Resource, &str) + Send + Sync + 'static,
    {
        self.fill_callback = Some(Arc::new(callback));
        self
    }

    pub fn can_see<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Request, &Resource) -> bool + Send + Sync + 'static,
    {
        self.see_callback = Some(Arc::new(callback));
        self
    }

    // --- Kind options ---

    pub fn disk(mut self, disk: impl Into<String>) -> Self {
        match self.kind.file_options_mut() {
            Some(opts) => opts.disk = Some(disk.into()),
            None => self.ignored("disk"),
        }
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        match self.kind.file_options_mut() {
            Some(opts) => opts.path = Some(path.into()),
            None => self.ignored("path"),
        }
        self
    }

    pub fn accepted_types(mut self, types: impl Into<String>) -> Self {
        match self.kind.file_options_mut() {
            Some(opts) => opts.accepted_types = Some(types.into()),
            None => self.ignored("accepted_types"),
        }
        self
    }

    /// Maximum upload size in kilobytes.
    pub fn max_size(mut self, kilobytes: u64) -> Self {
        match self.kind.file_options_mut() {
            Some(opts) => opts.max_size = Some(kilobytes),
            None => self.ignored("max_size"),
        }
        self
    }

    pub fn disable_downloads(mut self) -> Self {
        match self.kind.file_options_mut() {
            Some(opts) => opts.downloads_disabled = true,
            None => self.ignored("disable_downloads"),
        }
        self
    }

    pub fn preload(mut self, preload: Preload) -> Self {
        match &mut self.kind {
            FieldKind::Audio(opts) => opts.preload = Some(preload),
            _ => self.ignored("preload"),
        }
        self
    }

    /// Effective preload of an audio field.
    pub fn preload_mode(&self) -> Option<Preload> {
        match &self.kind {
            FieldKind::Audio(opts) => Some(opts.effective_preload()),
            _ => None,
        }
    }

    pub fn as_html(mut self) -> Self {
        match &mut self.kind {
            FieldKind::Heading(opts) => opts.as_html = true,
            _ => self.ignored("as_html"),
        }
        self
    }

    pub fn as_small(mut self) -> Self {
        match &mut self.kind {
            FieldKind::Line(opts) => opts.as_small = true,
            _ => self.ignored("as_small"),
        }
        self
    }

    pub fn as_heading(mut self) -> Self {
        match &mut self.kind {
            FieldKind::Line(opts) => opts.as_heading = true,
            _ => self.ignored("as_heading"),
        }
        self
    }

    pub fn as_sub_text(mut self) -> Self {
        match &mut self.kind {
            FieldKind::Line(opts) => opts.as_sub_text = true,
            _ => self.ignored("as_sub_text"),
        }
        self
    }

    /// Treat the id as a 64-bit integer the browser cannot hold as a number;
    /// resolved numbers are sent as strings.
    pub fn as_big_int(mut self) -> Self {
        match &mut self.kind {
            FieldKind::Id(opts) => opts.as_big_int = true,
            _ => self.ignored("as_big_int"),
        }
        self
    }

    pub fn copyable(mut self) -> Self {
        match &mut self.kind {
            FieldKind::Id(opts) => opts.copyable = true,
            _ => self.ignored("copyable"),
        }
        self
    }

    pub fn rows(mut self, rows: u32) -> Self {
        match &mut self.kind {
            FieldKind::Textarea(opts) => opts.rows = rows,
            _ => self.ignored("rows"),
        }
        self
    }

    pub fn always_show(mut self) -> Self {
        match &mut self.kind {
            FieldKind::Textarea(opts) => opts.always_show = true,
            _ => self.ignored("always_show"),
        }
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        match &mut self.kind {
            FieldKind::Number(opts) => opts.min = Some(min),
            _ => self.ignored("min"),
        }
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        match &mut self.kind {
            FieldKind::Number(opts) => opts.max = Some(max),
            _ => self.ignored("max"),
        }
        self
    }

    pub fn step(mut self, step: f64) -> Self {
        match &mut self.kind {
            FieldKind::Number(opts) => opts.step = Some(step),
            _ => self.ignored("step"),
        }
        self
    }

    pub fn true_value(mut self, value: impl Into<Value>) -> Self {
        match &mut self.kind {
            FieldKind::Boolean(opts) => opts.true_value = value.into(),
            _ => self.ignored("true_value"),
        }
        self
    }

    pub fn false_value(mut self, value: impl Into<Value>) -> Self {
        match &mut self.kind {
            FieldKind::Boolean(opts) => opts.false_value = value.into(),
            _ => self.ignored("false_value"),
        }
        self
    }

    fn ignored(&self, option: &str) {
        warn!(
            field = %self.attribute,
            kind = self.kind.name(),
            option,
            "option does not apply to this field kind, ignoring"
        );
    }

    // --- Lifecycle ---

    /// Read this field's value from the resource.
    ///
    /// Uses the resolve callback when one is set, otherwise
    /// `resource[attribute]`; an absent attribute resolves to `null`.
    /// Headings ignore the resource and resolve to their label.
    pub fn resolve(&mut self, resource: &Resource) {
        let raw = match (&self.kind, &self.resolve_callback) {
            (FieldKind::Heading(_), _) => Value::String(self.name.clone()),
            (_, Some(callback)) => callback(resource, &self.attribute),
            (_, None) => resource
                .get(&self.attribute)
                .cloned()
                .unwrap_or(Value::Null),
        };
        self.value = coerce_resolved(&self.kind, raw);
        trace!(field = %self.attribute, value = %self.value, "resolved field");
    }

    /// Resolve, then shape the value for display.
    ///
    /// Applies the display callback, then lines and headings fall back to
    /// their label when the value is blank so the row is never empty.
    pub fn resolve_for_display(&mut self, resource: &Resource) {
        self.resolve(resource);
        if let Some(callback) = &self.display_callback {
            let value = std::mem::take(&mut self.value);
            self.value = callback(value, resource, &self.attribute);
        }
        if matches!(self.kind, FieldKind::Line(_) | FieldKind::Heading(_)) && is_blank(&self.value)
        {
            self.value = Value::String(self.name.clone());
        }
    }

    /// Write the request's value for this field onto the model.
    ///
    /// The write ignores `readonly`: a read-only flag only informs the
    /// frontend, and the application must refuse such input itself. Headings,
    /// lines and ids never write. An attribute missing from the request leaves
    /// the model untouched, and a file field without an upload keeps the
    /// stored file.
    pub fn fill(&self, request: &Request, model: &mut Resource) {
        if !self.kind.writes_model() {
            trace!(field = %self.attribute, kind = self.kind.name(), "fill skipped");
            return;
        }
        if let Some(callback) = &self.fill_callback {
            callback(request, model, &self.attribute);
            return;
        }
        let Some(input) = request.input(&self.attribute) else {
            return;
        };

        let value = match &self.kind {
            FieldKind::File(_) | FieldKind::Audio(_) if input.is_null() => return,
            _ if self.nullable && is_blank(input) => Value::Null,
            FieldKind::Boolean(opts) => {
                if is_truthy(input) {
                    opts.true_value.clone()
                } else {
                    opts.false_value.clone()
                }
            }
            _ => input.clone(),
        };
        trace!(field = %self.attribute, "filled field");
        model.set(self.attribute.clone(), value);
    }

    /// Whether the request may see this field for the resource. Defaults to
    /// true; callers must consult it, the field does not enforce it.
    pub fn authorized_to_see(&self, request: &Request, resource: &Resource) -> bool {
        self.see_callback
            .as_ref()
            .is_none_or(|callback| callback(request, resource))
    }

    // --- Serialization ---

    /// Kind-specific entries plus any `with_meta` entries. ID fields also
    /// carry `sortable`.
    pub fn meta(&self) -> Map<String, Value> {
        let mut meta = self.kind.meta();
        if matches!(self.kind, FieldKind::Id(_)) {
            meta.insert("sortable".into(), json!(self.sortable));
        }
        meta.extend(
            self.extra_meta
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        meta
    }

    /// The flat mapping sent to the frontend: base keys with `meta()` merged in.
    pub fn json_serialize(&self) -> Map<String, Value> {
        let mut out = Map::new();
        out.insert("name".into(), json!(self.name));
        out.insert("attribute".into(), json!(self.attribute));
        out.insert("component".into(), json!(self.component()));
        out.insert("value".into(), self.value.clone());
        out.insert("nullable".into(), json!(self.nullable));
        out.insert("readonly".into(), json!(self.readonly));
        out.insert("helpText".into(), json!(self.help_text));
        out.insert("showOnIndex".into(), json!(self.visibility.index));
        out.insert("showOnDetail".into(), json!(self.visibility.detail));
        out.insert("showOnCreation".into(), json!(self.visibility.creation));
        out.insert("showOnUpdate".into(), json!(self.visibility.update));
        out.extend(self.meta());
        out
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.json_serialize().serialize(serializer)
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("attribute", &self.attribute)
            .field("kind", &self.kind)
            .field("value", &self.value)
            .field("visibility", &self.visibility)
            .field("nullable", &self.nullable)
            .field("readonly", &self.readonly)
            .field("resolve_callback", &self.resolve_callback.is_some())
            .field("fill_callback", &self.fill_callback.is_some())
            .finish_non_exhaustive()
    }
}

/// Kind-specific shaping of a freshly resolved value.
fn coerce_resolved(kind: &FieldKind, value: Value) -> Value {
    match kind {
        FieldKind::Id(opts) if opts.as_big_int => match value {
            Value::Number(n) => Value::String(n.to_string()),
            other => other,
        },
        FieldKind::Boolean(opts) => {
            if value == opts.true_value {
                Value::Bool(true)
            } else if value == opts.false_value {
                Value::Bool(false)
            } else if value.is_null() {
                Value::Null
            } else {
                Value::Bool(is_truthy(&value))
            }
        }
        _ => value,
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Form-style truthiness: `"0"`, `"false"`, `""`, `0`, `false` and `null`
/// are false.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !matches!(s.as_str(), "" | "0" | "false" | "off"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}
