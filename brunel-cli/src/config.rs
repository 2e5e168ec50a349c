//! Configuration for the brunel CLI
//!
//! Precedence: command-line flags > BRUNEL_* environment variables > TOML file > defaults.
//! The file is `--config <path>` or, when absent, `brunel.toml` in the working directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use brunel_core::{Params, SimulationConfig};
use clap::Args;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "brunel.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Neuron and connectivity constants
    pub params: Params,
    /// Run-level entries: duration, eta, g, population sizes, seed
    pub run: SimulationConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Spike log path
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { path: PathBuf::from("spikes.txt") }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
    }

    /// An explicit path must exist and parse; the default location is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

/// Per-run overrides; each also reads its BRUNEL_* variable.
#[derive(Debug, Clone, Default, Args)]
pub struct Overrides {
    /// Simulated time in ms
    #[arg(short = 't', long, env = "BRUNEL_DURATION_MS")]
    pub duration_ms: Option<f64>,

    /// Background rate ratio Nu_ext / Nu_thr
    #[arg(long, env = "BRUNEL_ETA")]
    pub eta: Option<f64>,

    /// Relative inhibitory strength g = JI / JE
    #[arg(short, long, env = "BRUNEL_G")]
    pub g: Option<f64>,

    /// Number of excitatory neurons
    #[arg(long, env = "BRUNEL_EXCITATORY")]
    pub excitatory: Option<usize>,

    /// Number of inhibitory neurons
    #[arg(long, env = "BRUNEL_INHIBITORY")]
    pub inhibitory: Option<usize>,

    /// Generator seed (random when unset)
    #[arg(long, env = "BRUNEL_SEED")]
    pub seed: Option<u64>,

    /// Spike log path
    #[arg(short, long, env = "BRUNEL_OUTPUT")]
    pub output: Option<PathBuf>,
}

impl Overrides {
    pub fn apply(&self, config: &mut Config) {
        let run = &mut config.run;
        if let Some(v) = self.duration_ms {
            run.duration_ms = v;
        }
        if let Some(v) = self.eta {
            run.eta = v;
        }
        if let Some(v) = self.g {
            run.g = v;
        }
        if let Some(v) = self.excitatory {
            run.excitatory = v;
        }
        if let Some(v) = self.inhibitory {
            run.inhibitory = v;
        }
        if self.seed.is_some() {
            run.seed = self.seed;
        }
        if let Some(p) = &self.output {
            config.output.path = p.clone();
        }
    }
}
