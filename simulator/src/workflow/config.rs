use crate::generator::profile::GeneratorConfig;
use anyhow::Context;
use gmcore::prelude::DisplaySettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

fn default_tick_ms() -> u64 {
    500
}

fn default_settle_ms() -> u64 {
    3_500
}

fn default_symbol_base() -> String {
    "symbols".to_string()
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkflowConfig {
    #[serde(default)]
    pub settings: DisplaySettings,
    /// Observer running the dashboard; their own assessments stay silent.
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub playback: bool,
    /// Virtual-clock step between timer polls.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// How long the clock keeps running after the last event.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
    #[serde(default = "default_symbol_base")]
    pub symbol_base: String,
    /// Scripted scenario; the generator is used when absent.
    #[serde(default)]
    pub scenario: Option<PathBuf>,
    #[serde(default)]
    pub generator: GeneratorConfig,
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(entities: usize, steps: usize, seed: u64) -> Self {
        Self {
            settings: DisplaySettings::default(),
            user_name: None,
            playback: false,
            tick_ms: default_tick_ms(),
            settle_ms: default_settle_ms(),
            symbol_base: default_symbol_base(),
            scenario: None,
            generator: GeneratorConfig {
                entities,
                steps,
                seed,
                ..GeneratorConfig::default()
            },
        }
    }

    pub fn tick(&self) -> u64 {
        self.tick_ms.max(1)
    }
}
