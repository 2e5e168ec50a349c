//! Balanced random network: fixed in-degree connectivity, Poisson background
//! drive and delayed spike propagation.
//!
//! Semantics:
//! - neurons `0..excitatory` are excitatory, the rest inhibitory; index is identity.
//! - update() advances every neuron once, in index order, and returns the
//!   spikes emitted on this step. Their effect lands `delay_steps` later.

use rand::distributions::{Distribution, Uniform};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::Poisson;
use tracing::{info, trace, warn};

use crate::error::{SimError, SimResult};
use crate::neuron::Neuron;
use crate::params::Params;
use crate::sink::SpikeEvent;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NetworkConfig {
    pub excitatory: usize,
    pub inhibitory: usize,
    /// Background rate relative to the threshold rate (Nu_ext / Nu_thr).
    pub eta: f64,
    /// JI: magnitude of an inhibitory spike, in units of J.
    pub inhibitory_weight: f64,
}

pub struct Network<R = ChaCha8Rng> {
    params: Params,
    neurons: Vec<Neuron>,
    excitatory: usize,
    inhibitory_weight: f64,
    external_rate: f64,
    noise: Poisson<f64>,
    rng: R,
    clock: u64,
}

impl Network<ChaCha8Rng> {
    pub fn seeded(params: Params, config: NetworkConfig, seed: u64) -> SimResult<Self> {
        Self::new(params, config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> Network<R> {
    /// Build the populations and draw the connectivity from `rng`.
    ///
    /// For every neuron `i`, CE sources are drawn uniformly (with replacement)
    /// from the excitatory population and CI from the inhibitory one; each draw
    /// appends `i` to the source's targets.
    pub fn new(params: Params, config: NetworkConfig, mut rng: R) -> SimResult<Self> {
        params.validate()?;
        positive("eta", config.eta)?;
        positive("inhibitory_weight", config.inhibitory_weight)?;

        let total = config.excitatory + config.inhibitory;
        if total > u32::MAX as usize {
            return Err(SimError::TooManyNeurons(total));
        }

        let external_rate = params.external_rate(config.eta);
        let noise = Poisson::new(external_rate).map_err(|_| SimError::InvalidParameter {
            name: "external_rate",
            value: external_rate,
            expected: "finite and > 0",
        })?;

        let mut neurons: Vec<Neuron> = (0..total)
            .map(|i| Neuron::new(i < config.excitatory, &params))
            .collect();
        connect(&mut neurons, config.excitatory, &params, &mut rng);

        let me = Self {
            params,
            neurons,
            excitatory: config.excitatory,
            inhibitory_weight: config.inhibitory_weight,
            external_rate,
            noise,
            rng,
            clock: 0,
        };
        info!(
            excitatory = me.excitatory,
            inhibitory = me.inhibitory_count(),
            synapses = me.synapse_count(),
            nu_ext = me.external_rate,
            "connections: done"
        );
        Ok(me)
    }

    /// Advance every neuron by one step and propagate the resulting spikes.
    ///
    /// Each neuron draws its own Poisson background count, in index order, from
    /// the network's generator. A spike from neuron `i` at step `t` is queued on
    /// each of its targets for step `t + delay_steps`, with weight `+JE` if `i`
    /// is excitatory and `-JI` otherwise.
    pub fn update(&mut self, external_current: f64) -> SimResult<Vec<SpikeEvent>> {
        let mut spikes = Vec::new();
        let arrival = self.clock + self.params.delay_steps();

        for i in 0..self.neurons.len() {
            let noise = self.noise.sample(&mut self.rng) as u32;
            if !self.neurons[i].update(external_current, noise) {
                continue;
            }
            spikes.push(SpikeEvent { neuron_id: i as u32, time: self.clock });

            let weight = if self.neurons[i].is_excitatory() {
                self.params.excitatory_weight
            } else {
                -self.inhibitory_weight
            };
            // Detach the target list so the receivers can be borrowed mutably;
            // a self-loop then sees the neuron without its targets, which
            // receive_spike never touches.
            let targets = self.neurons[i].take_targets();
            let delivered = self.deliver(&targets, arrival, weight);
            self.neurons[i].restore_targets(targets);
            delivered?;
        }

        trace!(step = self.clock, spikes = spikes.len(), "network step");
        self.clock += 1;
        Ok(spikes)
    }

    fn deliver(&mut self, targets: &[u32], arrival: u64, weight: f64) -> SimResult<()> {
        let len = self.neurons.len();
        for &t in targets {
            let target = self
                .neurons
                .get_mut(t as usize)
                .ok_or(SimError::UnknownNeuron { index: t, len })?;
            target.receive_spike(arrival, weight)?;
        }
        Ok(())
    }

    /// Wire one extra synapse by hand; both indices must exist.
    pub fn add_synapse(&mut self, source: u32, target: u32) -> SimResult<()> {
        let len = self.neurons.len();
        if target as usize >= len {
            return Err(SimError::UnknownNeuron { index: target, len });
        }
        let src = self
            .neurons
            .get_mut(source as usize)
            .ok_or(SimError::UnknownNeuron { index: source, len })?;
        src.add_target(target);
        Ok(())
    }
}

impl<R> Network<R> {
    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    pub fn neuron(&self, index: usize) -> Option<&Neuron> {
        self.neurons.get(index)
    }

    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }

    pub fn excitatory_count(&self) -> usize {
        self.excitatory
    }

    pub fn inhibitory_count(&self) -> usize {
        self.neurons.len() - self.excitatory
    }

    /// Number of completed steps.
    pub fn clock(&self) -> u64 {
        self.clock
    }

    /// Nu_ext: mean background spikes per neuron per step.
    pub fn external_rate(&self) -> f64 {
        self.external_rate
    }

    pub fn inhibitory_weight(&self) -> f64 {
        self.inhibitory_weight
    }

    pub fn synapse_count(&self) -> usize {
        self.neurons.iter().map(|n| n.targets().len()).sum()
    }

    /// Incoming synapses onto `index` from the excitatory population.
    pub fn excitatory_in_degree(&self, index: u32) -> usize {
        self.neurons[..self.excitatory].iter().map(|n| n.synapses_to(index)).sum()
    }

    /// Incoming synapses onto `index` from the inhibitory population.
    pub fn inhibitory_in_degree(&self, index: u32) -> usize {
        self.neurons[self.excitatory..].iter().map(|n| n.synapses_to(index)).sum()
    }
}

fn positive(name: &'static str, value: f64) -> SimResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidParameter { name, value, expected: "finite and > 0" })
    }
}

fn connect<R: Rng>(neurons: &mut [Neuron], excitatory: usize, params: &Params, rng: &mut R) {
    let total = neurons.len();
    let exc_sources = (excitatory > 0).then(|| Uniform::new(0, excitatory));
    let inh_sources = (excitatory < total).then(|| Uniform::new(excitatory, total));

    if exc_sources.is_none() && params.excitatory_connections > 0 && total > 0 {
        warn!(ce = params.excitatory_connections, "no excitatory neurons; skipping CE draws");
    }
    if inh_sources.is_none() && params.inhibitory_connections > 0 && total > 0 {
        warn!(ci = params.inhibitory_connections, "no inhibitory neurons; skipping CI draws");
    }

    for target in 0..total as u32 {
        if let Some(sources) = &exc_sources {
            for _ in 0..params.excitatory_connections {
                neurons[sources.sample(rng)].add_target(target);
            }
        }
        if let Some(sources) = &inh_sources {
            for _ in 0..params.inhibitory_connections {
                neurons[sources.sample(rng)].add_target(target);
            }
        }
    }
}
