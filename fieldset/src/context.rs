//! FieldsContext — registry of resource definitions on disk.
//!
//! Manages resource definitions as YAML files under a `resources/` directory
//! and hands out configured `Fields` for them. Consumers decide where the
//! directory lives and which definitions ship as defaults.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, warn};
use ulid::Ulid;

use crate::collection::Fields;
use crate::config::FieldsConfig;
use crate::definition::ResourceDef;
use crate::error::{FieldsError, Result};

/// Builder for `FieldsContext`. Created by `FieldsContext::open()`.
pub struct FieldsContextBuilder {
    root: PathBuf,
    defaults: Vec<ResourceDef>,
    config: Option<FieldsConfig>,
    create: bool,
}

impl FieldsContextBuilder {
    /// Provide default resource definitions. Defaults are seeded when no file
    /// of the same name exists; existing definitions are preserved.
    pub fn with_defaults(mut self, defaults: impl IntoIterator<Item = ResourceDef>) -> Self {
        self.defaults.extend(defaults);
        self
    }

    /// Project defaults applied to every field set handed out.
    pub fn with_config(mut self, config: FieldsConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Create the directory layout when it is missing instead of failing.
    pub fn create_if_missing(mut self) -> Self {
        self.create = true;
        self
    }

    /// Build the context: check or create directories, load from disk, seed
    /// missing defaults.
    pub async fn build(self) -> Result<FieldsContext> {
        let root = self.root;
        let resources_dir = root.join("resources");

        if self.create {
            fs::create_dir_all(&resources_dir).await?;
        } else if !resources_dir.is_dir() {
            return Err(FieldsError::NotInitialized {
                path: resources_dir,
            });
        }

        let mut ctx = FieldsContext {
            root,
            config: self.config.unwrap_or_default(),
            resources: Vec::new(),
            sources: Vec::new(),
            name_index: HashMap::new(),
        };
        ctx.load_resources().await?;
        ctx.seed_defaults(&self.defaults).await?;

        debug!(resources = ctx.resources.len(), "fields context opened");

        Ok(ctx)
    }
}

/// Resource definitions loaded from disk.
///
/// Owns a directory with the structure:
/// ```text
/// root/
///   resources/    ← one .yaml per resource type
/// ```
pub struct FieldsContext {
    root: PathBuf,
    config: FieldsConfig,
    resources: Vec<ResourceDef>,
    /// File each definition was loaded from or written to, parallel to `resources`.
    sources: Vec<PathBuf>,
    name_index: HashMap<String, usize>,
}

impl FieldsContext {
    /// Open a definitions directory. Returns a builder for optional configuration.
    ///
    /// ```rust,ignore
    /// let ctx = FieldsContext::open(path)
    ///     .with_config(FieldsConfig::load(project_dir)?)
    ///     .build()
    ///     .await?;
    /// let fields = ctx.fields_for("songs")?;
    /// ```
    pub fn open(root: impl Into<PathBuf>) -> FieldsContextBuilder {
        FieldsContextBuilder {
            root: root.into(),
            defaults: Vec::new(),
            config: None,
            create: false,
        }
    }

    /// Get a resource definition by name.
    pub fn get_resource(&self, name: &str) -> Option<&ResourceDef> {
        self.name_index.get(name).map(|&i| &self.resources[i])
    }

    /// All resource definitions, in load order.
    pub fn all_resources(&self) -> &[ResourceDef] {
        &self.resources
    }

    /// Configured field set for a resource.
    pub fn fields_for(&self, name: &str) -> Result<Fields> {
        let def = self
            .get_resource(name)
            .ok_or_else(|| FieldsError::ResourceNotFound {
                name: name.to_string(),
            })?;
        let mut fields = def.build_fields()?;
        fields.apply_config(&self.config);
        Ok(fields)
    }

    pub fn config(&self) -> &FieldsConfig {
        &self.config
    }

    /// The root directory path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write (create or update) a resource definition. Persists to YAML immediately.
    ///
    /// An existing definition is rewritten in the file it was loaded from.
    pub async fn write_resource(&mut self, def: &ResourceDef) -> Result<()> {
        def.validate()?;
        let yaml = serde_yaml_ng::to_string(def)?;

        if let Some(&idx) = self.name_index.get(&def.name) {
            atomic_write(&self.sources[idx], yaml.as_bytes()).await?;
            self.resources[idx] = def.clone();
        } else {
            let path = self.resource_path(&def.name);
            atomic_write(&path, yaml.as_bytes()).await?;
            let idx = self.resources.len();
            self.resources.push(def.clone());
            self.sources.push(path);
            self.name_index.insert(def.name.clone(), idx);
        }

        Ok(())
    }

    /// Delete a resource definition by name.
    pub async fn delete_resource(&mut self, name: &str) -> Result<()> {
        let idx = *self
            .name_index
            .get(name)
            .ok_or_else(|| FieldsError::ResourceNotFound {
                name: name.to_string(),
            })?;
        match fs::remove_file(&self.sources[idx]).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = ?self.sources[idx], "resource file already gone");
            }
            Err(e) => return Err(e.into()),
        }
        self.name_index.remove(name);

        // Swap-remove and fix the moved entry's index
        self.resources.swap_remove(idx);
        self.sources.swap_remove(idx);
        if idx < self.resources.len() {
            self.name_index.insert(self.resources[idx].name.clone(), idx);
        }

        Ok(())
    }

    // --- Internal ---

    /// Write default definitions whose name is not already on disk, in any file.
    async fn seed_defaults(&mut self, defaults: &[ResourceDef]) -> Result<()> {
        for def in defaults {
            def.validate()?;
            if self.name_index.contains_key(&def.name) {
                continue;
            }
            self.write_resource(def).await?;
            debug!(name = %def.name, "seeded default resource");
        }
        Ok(())
    }

    fn resource_path(&self, name: &str) -> PathBuf {
        self.root.join("resources").join(format!("{name}.yaml"))
    }

    async fn load_resources(&mut self) -> Result<()> {
        let dir = self.root.join("resources");
        let mut entries = fs::read_dir(&dir).await?;
        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("yaml" | "yml")
            ) {
                paths.push(path);
            }
        }
        // Directory order is platform dependent
        paths.sort();

        for path in paths {
            let content = fs::read_to_string(&path).await?;
            let def = match serde_yaml_ng::from_str::<ResourceDef>(&content) {
                Ok(def) => def,
                Err(e) => {
                    warn!(?path, %e, "skipping invalid resource definition");
                    continue;
                }
            };
            if let Err(e) = def.validate() {
                warn!(?path, %e, "skipping invalid resource definition");
                continue;
            }
            if self.name_index.contains_key(&def.name) {
                warn!(?path, name = %def.name, "skipping duplicate resource definition");
                continue;
            }
            let idx = self.resources.len();
            self.name_index.insert(def.name.clone(), idx);
            self.resources.push(def);
            self.sources.push(path);
        }
        Ok(())
    }
}

/// Write to a temp file then rename for atomic persistence.
async fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidInput, "no parent dir"))?;
    let tmp = dir.join(format!(".tmp_{}", Ulid::new()));
    fs::write(&tmp, data).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}
