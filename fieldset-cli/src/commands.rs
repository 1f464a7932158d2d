//! The `render`, `fill` and `list` commands.
//!
//! Each command returns the JSON it would print so tests can inspect it
//! without capturing stdout.

use std::path::Path;

use anyhow::{Context, Result};
use fieldset::{FieldsConfig, FieldsContext, Request, Resource, View};
use serde_json::{Map, Value};
use tracing::debug;

/// Open the definitions directory with its project configuration.
pub async fn open_context(definitions: &Path) -> Result<FieldsContext> {
    let config = FieldsConfig::load(definitions)
        .with_context(|| format!("loading config from {}", definitions.display()))?;
    let ctx = FieldsContext::open(definitions)
        .with_config(config)
        .build()
        .await
        .with_context(|| format!("opening definitions in {}", definitions.display()))?;
    Ok(ctx)
}

/// Serialized fields of `resource` for `view`, resolved against the record.
pub async fn run_render(
    definitions: &Path,
    resource: &str,
    record: &Path,
    view: View,
    request: Option<&Path>,
) -> Result<Value> {
    let ctx = open_context(definitions).await?;
    let fields = ctx.fields_for(resource)?;
    let record = Resource::from(read_object(record).await?);
    let request = match request {
        Some(path) => Request::from(read_object(path).await?),
        None => Request::new(),
    };
    debug!(resource, %view, fields = fields.len(), "rendering");
    Ok(fields.serialize_for_view(view, &request, &record))
}

/// The model after filling it from the request.
pub async fn run_fill(
    definitions: &Path,
    resource: &str,
    request: &Path,
    model: Option<&Path>,
) -> Result<Value> {
    let ctx = open_context(definitions).await?;
    let fields = ctx.fields_for(resource)?;
    let request = Request::from(read_object(request).await?);
    let mut model = match model {
        Some(path) => Resource::from(read_object(path).await?),
        None => Resource::new(),
    };
    fields.fill(&request, &mut model);
    Ok(Value::Object(model.into_attributes()))
}

/// Every resource with the attributes of its fields, in declaration order.
pub async fn run_list(definitions: &Path) -> Result<Value> {
    let ctx = open_context(definitions).await?;
    let mut out = Map::new();
    for def in ctx.all_resources() {
        let fields = ctx.fields_for(&def.name)?;
        let attributes = fields
            .iter()
            .map(|f| Value::String(f.attribute_name().to_string()))
            .collect();
        out.insert(def.name.clone(), Value::Array(attributes));
    }
    Ok(Value::Object(out))
}

async fn read_object(path: &Path) -> Result<Map<String, Value>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("{} must hold a JSON object", path.display()))
}
