//! Shared configuration loader for docspan.
//!
//! `defaults/docspan.default.toml` is embedded into every binary so that docs
//! and runtime behavior stay in sync. Applications layer user-specific files on
//! top of those defaults via [`Loader`] before deserializing into
//! [`DocspanConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use docspan::formats::{MarkdownFormat, MarkdownOptions};
use docspan::{Converter, DropAligned, FormatRegistry, Pipeline, TypeRule, VocabularyMap};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/docspan.default.toml");

/// Top-level configuration consumed by docspan applications.
#[derive(Debug, Clone, Deserialize)]
pub struct DocspanConfig {
    pub convert: ConvertConfig,
    pub markdown: MarkdownOptions,
    pub remap: RemapConfig,
    #[serde(default)]
    pub cleanup: CleanupConfig,
}

/// Converter knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    pub canonicalize: bool,
    #[serde(default)]
    pub opaque: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemapPreset {
    Commonmark,
    Identity,
    None,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemapConfig {
    pub preset: RemapPreset,
    #[serde(default)]
    pub drop_unmapped: bool,
    #[serde(default)]
    pub types: HashMap<String, TypeOverride>,
}

/// One `[remap.types.<source>]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct TypeOverride {
    pub target: String,
    #[serde(default)]
    pub rename: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CleanupConfig {
    #[serde(default)]
    pub drop_aligned: Vec<DropAlignedConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DropAlignedConfig {
    pub shadow: String,
    pub anchor: String,
}

impl DocspanConfig {
    /// The vocabulary this configuration selects, or `None` for no remap.
    ///
    /// `identity` starts from an empty map, so only the `[remap.types]`
    /// overrides rename anything.
    pub fn vocabulary(&self) -> Option<VocabularyMap> {
        let base = match self.remap.preset {
            RemapPreset::None => return None,
            RemapPreset::Commonmark => VocabularyMap::commonmark(),
            RemapPreset::Identity => VocabularyMap::new(),
        };
        let mut map = base.drop_unmapped(self.remap.drop_unmapped);
        for (source, entry) in &self.remap.types {
            let rule = entry
                .rename
                .iter()
                .fold(TypeRule::to(entry.target.clone()), |rule, (from, to)| {
                    rule.rename(from.clone(), to.clone())
                });
            map.add(source.clone(), rule);
        }
        Some(map)
    }

    /// Build the pipeline described by this configuration.
    pub fn pipeline(&self) -> Pipeline {
        let converter = Converter::new().with_opaque_set(self.convert.opaque.iter().cloned());
        let mut pipeline = Pipeline::new(converter).canonicalize(self.convert.canonicalize);

        if let Some(map) = self.vocabulary() {
            pipeline = pipeline.with_remap(map);
        }
        for rule in &self.cleanup.drop_aligned {
            pipeline = pipeline.with_cleanup(DropAligned::new(&rule.shadow, &rule.anchor));
        }
        pipeline
    }

    /// The default registry with Markdown parsing configured from `[markdown]`.
    pub fn registry(&self) -> FormatRegistry {
        let mut registry = FormatRegistry::with_defaults();
        registry.register(MarkdownFormat::new(self.markdown));
        registry
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<DocspanConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<DocspanConfig, ConfigError> {
    Loader::new().build()
}
