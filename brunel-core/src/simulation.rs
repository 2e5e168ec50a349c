//! Simulation driver: owns one network and steps it for the requested duration,
//! forwarding spike records to a sink.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::error::{SimError, SimResult};
use crate::network::{Network, NetworkConfig};
use crate::params::Params;
use crate::sink::SpikeSink;
use crate::stats::{PopulationStats, RunSummary};

/// Values supplied by the parameter-entry side before the network is built.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimulationConfig {
    /// Requested simulated time (ms).
    pub duration_ms: f64,
    /// Nu_ext / Nu_thr.
    pub eta: f64,
    /// Relative strength of inhibition, g = JI / JE.
    pub g: f64,
    pub excitatory: usize,
    pub inhibitory: usize,
    /// Generator seed; drawn from OS entropy when absent.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            duration_ms: 100.0,
            eta: 2.0,
            g: 5.0,
            excitatory: 10_000,
            inhibitory: 2_500,
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> SimResult<()> {
        if !(self.duration_ms.is_finite() && self.duration_ms >= 0.0) {
            return Err(SimError::InvalidParameter {
                name: "duration_ms",
                value: self.duration_ms,
                expected: "finite and >= 0",
            });
        }
        for (name, value) in [("eta", self.eta), ("g", self.g)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(SimError::InvalidParameter { name, value, expected: "finite and > 0" });
            }
        }
        Ok(())
    }
}

pub struct Simulation<R = ChaCha8Rng> {
    network: Network<R>,
    clock: u64,
    run_steps: u64,
    eta: f64,
    inhibitory_weight: f64,
    seed: Option<u64>,
    spikes: u64,
    log_every: u64,
}

impl Simulation<ChaCha8Rng> {
    /// Build the network from `config`, seeding a ChaCha8 generator.
    pub fn new(params: Params, config: &SimulationConfig) -> SimResult<Self> {
        let seed = config.seed.unwrap_or_else(rand::random);
        info!(seed, "network generator seeded");
        let mut sim = Self::with_rng(params, config, ChaCha8Rng::seed_from_u64(seed))?;
        sim.seed = Some(seed);
        Ok(sim)
    }
}

impl<R: Rng> Simulation<R> {
    /// Build with an explicit generator; `config.seed` is ignored.
    /// `params` are checked by `Network::new`.
    pub fn with_rng(params: Params, config: &SimulationConfig, rng: R) -> SimResult<Self> {
        config.validate()?;
        let inhibitory_weight = config.g / params.excitatory_weight;
        let network = Network::new(
            params,
            NetworkConfig {
                excitatory: config.excitatory,
                inhibitory: config.inhibitory,
                eta: config.eta,
                inhibitory_weight,
            },
            rng,
        )?;
        let run_steps = params.steps_for(config.duration_ms);
        info!(run_steps, duration_ms = config.duration_ms, "simulation ready");
        Ok(Self {
            network,
            clock: 0,
            run_steps,
            eta: config.eta,
            inhibitory_weight,
            seed: None,
            spikes: 0,
            log_every: 1000,
        })
    }

    /// Emit a debug progress line every `steps` steps (0 disables it).
    pub fn set_log_every(&mut self, steps: u64) {
        self.log_every = steps;
    }

    /// Advance one step with no external current and forward its spikes.
    /// Returns `None` once the run is complete.
    pub fn step<S: SpikeSink + ?Sized>(&mut self, sink: &mut S) -> SimResult<Option<usize>> {
        if self.is_done() {
            return Ok(None);
        }
        let spikes = self.network.update(0.0)?;
        let n = spikes.len();
        for event in spikes {
            sink.record(event)?;
        }
        self.spikes += n as u64;
        self.clock += 1;
        if self.log_every > 0 && self.clock % self.log_every == 0 {
            debug!(step = self.clock, of = self.run_steps, total_spikes = self.spikes, "progress");
        }
        Ok(Some(n))
    }

    pub fn run<S: SpikeSink + ?Sized>(&mut self, sink: &mut S) -> SimResult<RunSummary> {
        self.run_with_progress(sink, 0, |_, _| {})
    }

    /// Like `run`, calling `on_progress(clock, run_steps)` every `every` steps
    /// and once more at the end.
    pub fn run_with_progress<S, F>(&mut self, sink: &mut S, every: u64, mut on_progress: F) -> SimResult<RunSummary>
    where
        S: SpikeSink + ?Sized,
        F: FnMut(u64, u64),
    {
        while self.step(sink)?.is_some() {
            if every > 0 && self.clock % every == 0 {
                on_progress(self.clock, self.run_steps);
            }
        }
        sink.flush()?;
        on_progress(self.clock, self.run_steps);

        let summary = self.summary();
        info!(
            steps = summary.steps,
            spikes = summary.spikes,
            rate_hz = summary.mean_rate_hz(),
            "simulation: done"
        );
        Ok(summary)
    }
}

impl<R> Simulation<R> {
    pub fn is_done(&self) -> bool {
        self.clock >= self.run_steps
    }

    pub fn clock(&self) -> u64 {
        self.clock
    }

    pub fn run_steps(&self) -> u64 {
        self.run_steps
    }

    pub fn eta(&self) -> f64 {
        self.eta
    }

    pub fn inhibitory_weight(&self) -> f64 {
        self.inhibitory_weight
    }

    /// Seed actually used, when the generator was built from one.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn network(&self) -> &Network<R> {
        &self.network
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            steps: self.clock,
            duration_ms: self.clock as f64 * self.network.params().step_size,
            neurons: self.network.len(),
            spikes: self.spikes,
            population: PopulationStats::from_neurons(self.network.neurons()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::SpikeEvent;
    use approx::assert_relative_eq;

    fn params() -> Params {
        Params { excitatory_connections: 40, inhibitory_connections: 10, ..Params::default() }
    }

    fn config(duration_ms: f64) -> SimulationConfig {
        SimulationConfig {
            duration_ms,
            eta: 3.0,
            g: 4.0,
            excitatory: 80,
            inhibitory: 20,
            seed: Some(1234),
        }
    }

    #[test]
    fn rejects_bad_entries() {
        for bad in [
            SimulationConfig { duration_ms: -1.0, ..config(1.0) },
            SimulationConfig { eta: 0.0, ..config(1.0) },
            SimulationConfig { g: -2.0, ..config(1.0) },
            SimulationConfig { g: f64::INFINITY, ..config(1.0) },
        ] {
            assert!(matches!(
                Simulation::new(params(), &bad),
                Err(SimError::InvalidParameter { .. })
            ));
        }
    }

    #[test]
    fn bad_params_and_entries_are_rejected() {
        let long_delay = Params { synaptic_delay: 1e30, ..params() };
        assert!(matches!(
            Simulation::new(long_delay, &config(1.0)),
            Err(SimError::DelayTooLong { .. })
        ));
        let no_tau = Params { membrane_tau: -1.0, ..params() };
        assert!(matches!(
            Simulation::with_rng(no_tau, &config(1.0), ChaCha8Rng::seed_from_u64(0)),
            Err(SimError::InvalidParameter { name: "membrane_tau", .. })
        ));
        let bad = SimulationConfig { eta: -1.0, ..config(1.0) };
        assert!(matches!(
            Simulation::with_rng(params(), &bad, ChaCha8Rng::seed_from_u64(0)),
            Err(SimError::InvalidParameter { name: "eta", .. })
        ));
    }

    #[test]
    fn runs_exactly_the_requested_steps() {
        let mut sim = Simulation::new(params(), &config(50.0)).unwrap();
        assert_eq!(sim.run_steps(), 500);
        assert_eq!(sim.seed(), Some(1234));
        assert_relative_eq!(sim.inhibitory_weight(), 4.0);

        let mut spikes: Vec<SpikeEvent> = Vec::new();
        let summary = sim.run(&mut spikes).unwrap();
        assert!(sim.is_done());
        assert_eq!(sim.clock(), 500);
        assert_eq!(sim.network().clock(), 500);
        assert_eq!(summary.steps, 500);
        assert_relative_eq!(summary.duration_ms, 50.0, epsilon = 1e-9);
        assert_eq!(summary.spikes, spikes.len() as u64);
        assert_eq!(
            summary.population.excitatory_spikes + summary.population.inhibitory_spikes,
            summary.spikes
        );
        assert!(spikes.iter().all(|s| s.time < 500 && (s.neuron_id as usize) < 100));
        assert!(spikes.windows(2).all(|w| w[0].time <= w[1].time));

        // Done: further steps are no-ops
        assert_eq!(sim.step(&mut spikes).unwrap(), None);
        assert_eq!(sim.clock(), 500);
    }

    #[test]
    fn zero_duration_runs_nothing() {
        let mut sim = Simulation::new(params(), &config(0.0)).unwrap();
        let mut spikes: Vec<SpikeEvent> = Vec::new();
        let summary = sim.run(&mut spikes).unwrap();
        assert_eq!(summary.steps, 0);
        assert!(spikes.is_empty());
        assert_eq!(summary.mean_rate_hz(), 0.0);
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let mut a: Vec<SpikeEvent> = Vec::new();
        let mut b: Vec<SpikeEvent> = Vec::new();
        Simulation::new(params(), &config(30.0)).unwrap().run(&mut a).unwrap();
        Simulation::new(params(), &config(30.0)).unwrap().run(&mut b).unwrap();
        assert!(!a.is_empty());
        assert_eq!(a, b);
    }

    #[test]
    fn progress_reports_at_stride_and_end() {
        let mut sim = Simulation::new(params(), &config(10.5)).unwrap();
        let mut calls = Vec::new();
        sim.run_with_progress(&mut crate::sink::NullSink, 25, |done, total| calls.push((done, total)))
            .unwrap();
        assert_eq!(calls, vec![(25, 105), (50, 105), (75, 105), (100, 105), (105, 105)]);
    }

    #[test]
    fn explicit_generator_is_accepted() {
        let rng = ChaCha8Rng::seed_from_u64(99);
        let mut sim = Simulation::with_rng(params(), &config(5.0), rng).unwrap();
        assert_eq!(sim.seed(), None);
        let mut spikes: Vec<SpikeEvent> = Vec::new();
        sim.run(&mut spikes).unwrap();
        assert_eq!(sim.clock(), 50);
    }
}
