//! Leaky integrate-and-fire neuron with absolute refractoriness and a delay ring

use crate::delay_ring::DelayRing;
use crate::error::{SimError, SimResult};
use crate::params::Params;

#[derive(Clone, Debug)]
pub struct Neuron {
    excitatory: bool,
    potential: f64,
    spike_times: Vec<u64>,
    clock: u64,
    ring: DelayRing,
    targets: Vec<u32>,
    params: Params,
    decay: f64,
}

impl Neuron {
    pub fn new(excitatory: bool, params: &Params) -> Self {
        Self {
            excitatory,
            potential: 0.0,
            spike_times: Vec::new(),
            clock: 0,
            ring: DelayRing::new(params.ring_len()),
            targets: Vec::new(),
            params: *params,
            decay: params.decay(),
        }
    }

    /// Advance one step. Returns true if the neuron fired on this step.
    ///
    /// A potential strictly above threshold (carried over from the previous
    /// step) fires and resets to 0. The synaptic input landing on this step is
    /// consumed either way; while refractory it is discarded.
    pub fn update(&mut self, external_current: f64, noise_count: u32) -> bool {
        let mut spiked = false;
        if self.potential > self.params.spike_threshold {
            self.spike_times.push(self.clock);
            self.potential = 0.0;
            spiked = true;
        }

        let synaptic = self.ring.take(self.clock);
        if self.is_refractory() {
            self.potential = 0.0;
        } else {
            let p = &self.params;
            self.potential = self.potential * self.decay
                + external_current * p.membrane_resistance * (1.0 - self.decay)
                + p.synaptic_unit_weight * synaptic
                + p.synaptic_unit_weight * f64::from(noise_count);
        }

        self.clock += 1;
        spiked
    }

    /// Queue `weight` to be integrated on step `arrival`.
    ///
    /// `arrival` must fall in `[clock, clock + delay_steps]`; anything else
    /// would alias another step's slot.
    pub fn receive_spike(&mut self, arrival: u64, weight: f64) -> SimResult<()> {
        let window = self.ring.len() as u64 - 1;
        if arrival < self.clock || arrival - self.clock > window {
            return Err(SimError::DeliveryOutOfWindow { arrival, clock: self.clock, window });
        }
        self.ring.schedule(arrival, weight);
        Ok(())
    }

    /// Duplicates are parallel synapses and deliver additively.
    pub fn add_target(&mut self, index: u32) {
        self.targets.push(index);
    }

    pub fn is_excitatory(&self) -> bool {
        self.excitatory
    }

    pub fn potential(&self) -> f64 {
        self.potential
    }

    /// Overwrite the membrane potential, e.g. to start from a non-resting state.
    pub fn set_potential(&mut self, potential: f64) {
        self.potential = potential;
    }

    pub fn spike_count(&self) -> usize {
        self.spike_times.len()
    }

    pub fn spike_times(&self) -> &[u64] {
        &self.spike_times
    }

    pub fn last_spike_time(&self) -> Option<u64> {
        self.spike_times.last().copied()
    }

    /// Local step counter: number of completed `update` calls.
    pub fn clock(&self) -> u64 {
        self.clock
    }

    pub fn is_refractory(&self) -> bool {
        match self.last_spike_time() {
            Some(last) => ((self.clock - last) as f64) * self.params.step_size < self.params.refractory_period,
            None => false,
        }
    }

    pub fn targets(&self) -> &[u32] {
        &self.targets
    }

    pub(crate) fn take_targets(&mut self) -> Vec<u32> {
        core::mem::take(&mut self.targets)
    }

    pub(crate) fn restore_targets(&mut self, targets: Vec<u32>) {
        self.targets = targets;
    }

    /// Number of parallel synapses from this neuron onto `index`.
    pub fn synapses_to(&self, index: u32) -> usize {
        self.targets.iter().filter(|&&t| t == index).count()
    }

    pub fn buffer(&self) -> &[f64] {
        self.ring.slots()
    }
}
