//! brunel-core: discrete-time Brunel network of leaky integrate-and-fire neurons
//!
//! - `Neuron`: membrane recurrence, absolute refractoriness, per-neuron delay ring
//! - `Network`: fixed in-degree random connectivity, Poisson background drive,
//!   delayed spike propagation in index order
//! - `Simulation`: steps one network for a requested duration into a `SpikeSink`
//!
//! All randomness flows from one injected generator, so a seed fixes a run.

pub mod delay_ring;
pub mod error;
pub mod network;
pub mod neuron;
pub mod params;
pub mod simulation;
pub mod sink;
pub mod stats;

// Re-exports
pub use delay_ring::DelayRing;
pub use error::{SimError, SimResult};
pub use network::{Network, NetworkConfig};
pub use neuron::Neuron;
pub use params::{Params, MAX_DELAY_STEPS};
pub use simulation::{Simulation, SimulationConfig};
pub use sink::{NullSink, SpikeEvent, SpikeSink, TsvWriter};
pub use stats::{PopulationStats, RunSummary};
