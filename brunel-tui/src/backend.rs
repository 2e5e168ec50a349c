// Backend abstraction for the TUI so the raster does not depend on how spikes are produced.

use anyhow::Result;
use brunel_core::{Network, NetworkConfig, Params, SpikeEvent};

/// Common interface for any spiking backend that can drive the TUI.
pub trait SnnBackend {
    /// Advance the simulation by one step and return all spikes emitted during that step.
    fn step(&mut self) -> Result<Vec<SpikeEvent>>;
    /// Number of neurons in the model.
    fn neurons(&self) -> usize;
    /// Neurons `0..excitatory()` are drawn as excitatory rows.
    fn excitatory(&self) -> usize {
        self.neurons()
    }
    /// Simulated milliseconds per step.
    fn step_ms(&self) -> f64;
}

/// Brunel network with background drive only (no external current).
pub struct NetworkBackend {
    network: Network,
}

impl NetworkBackend {
    pub fn new(params: Params, config: NetworkConfig, seed: u64) -> Result<Self> {
        Ok(Self { network: Network::seeded(params, config, seed)? })
    }
}

impl SnnBackend for NetworkBackend {
    fn step(&mut self) -> Result<Vec<SpikeEvent>> {
        Ok(self.network.update(0.0)?)
    }

    fn neurons(&self) -> usize {
        self.network.len()
    }

    fn excitatory(&self) -> usize {
        self.network.excitatory_count()
    }

    fn step_ms(&self) -> f64 {
        self.network.params().step_size
    }
}
