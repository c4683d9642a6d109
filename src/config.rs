use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cli::output::OutputFormat;
use crate::core::{Capacity, HeuristicKind, ItemLimit};
use crate::error::{HpError, Result};

/// Name of the per-project config file, looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "histopack.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub packing: PackingConfig,
    #[serde(default)]
    pub sweep: SweepConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Resolve configuration from files and the process environment.
    pub fn load(explicit_path: Option<&Path>, project_root: &Path) -> Result<Self> {
        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("HISTOPACK_CONFIG").ok().map(PathBuf::from));
        let global = dirs::config_dir().map(|dir| dir.join("histopack/config.toml"));

        Self::load_with(ConfigSources {
            explicit,
            global,
            project: Some(project_root.join(PROJECT_CONFIG_FILE)),
            env: |key: &str| std::env::var(key).ok(),
        })
    }

    /// Resolve configuration from explicit sources.
    ///
    /// An explicit path replaces both the global and project files.
    pub fn load_with<F>(sources: ConfigSources<F>) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = &sources.explicit {
            let patch = Self::load_patch(path)?
                .ok_or_else(|| HpError::Config(format!("config {} not found", path.display())))?;
            config.merge_patch(patch);
        } else {
            for path in [&sources.global, &sources.project].into_iter().flatten() {
                if let Some(patch) = Self::load_patch(path)? {
                    config.merge_patch(patch);
                }
            }
        }

        config.apply_env_overrides(&sources.env)?;
        Ok(config)
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| HpError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| HpError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.packing {
            self.packing.merge(patch);
        }
        if let Some(patch) = patch.sweep {
            self.sweep.merge(patch);
        }
        if let Some(patch) = patch.output {
            self.output.merge(patch);
        }
    }

    fn apply_env_overrides<F>(&mut self, env: &F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = env_parse::<u32, _>(env, "HISTOPACK_CAPACITY_DIM1")? {
            self.packing.capacity_dim1 = Some(value);
        }
        if let Some(value) = env_parse::<u32, _>(env, "HISTOPACK_CAPACITY_DIM2")? {
            self.packing.capacity_dim2 = Some(value);
        }
        if let Some(value) = env_parse::<ItemLimit, _>(env, "HISTOPACK_MAX_ITEMS_PER_PACK")? {
            self.packing.max_items_per_pack = value;
        }
        if let Some(value) = env_parse::<HeuristicKind, _>(env, "HISTOPACK_HEURISTIC")? {
            self.packing.heuristic = value;
        }
        if let Some(value) = env_bool(env, "HISTOPACK_SWEEP_PARALLEL")? {
            self.sweep.parallel = value;
        }
        if let Some(value) = env_parse::<OutputFormat, _>(env, "HISTOPACK_OUTPUT_FORMAT")? {
            self.output.format = value;
        }
        Ok(())
    }
}

/// Where [`Config::load_with`] reads from.
pub struct ConfigSources<F> {
    pub explicit: Option<PathBuf>,
    pub global: Option<PathBuf>,
    pub project: Option<PathBuf>,
    pub env: F,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity_dim1: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity_dim2: Option<u32>,
    pub max_items_per_pack: ItemLimit,
    pub heuristic: HeuristicKind,
}

impl Default for PackingConfig {
    fn default() -> Self {
        Self {
            capacity_dim1: None,
            capacity_dim2: None,
            max_items_per_pack: ItemLimit::Unbounded,
            heuristic: HeuristicKind::Product,
        }
    }
}

impl PackingConfig {
    fn merge(&mut self, patch: PackingPatch) {
        if let Some(value) = patch.capacity_dim1 {
            self.capacity_dim1 = Some(value);
        }
        if let Some(value) = patch.capacity_dim2 {
            self.capacity_dim2 = Some(value);
        }
        if let Some(value) = patch.max_items_per_pack {
            self.max_items_per_pack = value;
        }
        if let Some(value) = patch.heuristic {
            self.heuristic = value;
        }
    }

    /// Capacity with per-invocation overrides applied.
    pub fn capacity(&self, dim1: Option<u32>, dim2: Option<u32>) -> Result<Capacity> {
        let dim1 = dim1
            .or(self.capacity_dim1)
            .ok_or_else(|| HpError::MissingConfig("packing.capacity_dim1".to_string()))?;
        let dim2 = dim2
            .or(self.capacity_dim2)
            .ok_or_else(|| HpError::MissingConfig("packing.capacity_dim2".to_string()))?;
        Ok(Capacity::new(dim1, dim2))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepConfig {
    pub heuristics: Vec<HeuristicKind>,
    pub max_items_per_pack: Vec<ItemLimit>,
    pub parallel: bool,
    pub top: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            heuristics: HeuristicKind::ALL.to_vec(),
            max_items_per_pack: vec![
                ItemLimit::Bounded(1),
                ItemLimit::Bounded(2),
                ItemLimit::Bounded(4),
                ItemLimit::Bounded(8),
                ItemLimit::Unbounded,
            ],
            parallel: true,
            top: 10,
        }
    }
}

impl SweepConfig {
    fn merge(&mut self, patch: SweepPatch) {
        if let Some(values) = patch.heuristics {
            self.heuristics = dedup_preserving_order(values);
        }
        if let Some(values) = patch.max_items_per_pack {
            self.max_items_per_pack = dedup_preserving_order(values);
        }
        if let Some(value) = patch.parallel {
            self.parallel = value;
        }
        if let Some(value) = patch.top {
            self.top = value;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Strategies listed in human output before eliding the rest.
    pub show_strategies: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Human,
            show_strategies: 20,
        }
    }
}

impl OutputConfig {
    fn merge(&mut self, patch: OutputPatch) {
        if let Some(value) = patch.format {
            self.format = value;
        }
        if let Some(value) = patch.show_strategies {
            self.show_strategies = value;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigPatch {
    pub packing: Option<PackingPatch>,
    pub sweep: Option<SweepPatch>,
    pub output: Option<OutputPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PackingPatch {
    pub capacity_dim1: Option<u32>,
    pub capacity_dim2: Option<u32>,
    pub max_items_per_pack: Option<ItemLimit>,
    pub heuristic: Option<HeuristicKind>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SweepPatch {
    pub heuristics: Option<Vec<HeuristicKind>>,
    pub max_items_per_pack: Option<Vec<ItemLimit>>,
    pub parallel: Option<bool>,
    pub top: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct OutputPatch {
    pub format: Option<OutputFormat>,
    pub show_strategies: Option<usize>,
}

fn dedup_preserving_order<T: PartialEq>(values: Vec<T>) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(values.len());
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

fn env_bool<F>(env: &F, key: &str) -> Result<Option<bool>>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = env(key) else {
        return Ok(None);
    };
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => Err(HpError::Config(format!(
            "invalid {key} value {value}: expected true/false, 1/0, yes/no or on/off"
        ))),
    }
}

fn env_parse<T, F>(env: &F, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match env(key) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|err| HpError::Config(format!("invalid {key} value {value}: {err}"))),
        None => Ok(None),
    }
}
