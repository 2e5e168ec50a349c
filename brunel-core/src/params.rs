//! Simulation constants shared by every neuron of a run.
//!
//! Times are in milliseconds, potentials in millivolts. Defaults reproduce the
//! classical Brunel (2000) setup: 12.5k neurons, CE = 1000, CI = 250.

use crate::error::{SimError, SimResult};

/// Longest synaptic delay accepted, in steps (1 s at the default 0.1 ms step).
/// Every neuron allocates one ring slot per delay step.
pub const MAX_DELAY_STEPS: u64 = 10_000;

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Params {
    /// Integration step h (ms).
    pub step_size: f64,
    /// Synaptic transmission delay D (ms).
    pub synaptic_delay: f64,
    /// Membrane time constant tau (ms).
    pub membrane_tau: f64,
    pub membrane_resistance: f64,
    /// Absolute refractory period (ms).
    pub refractory_period: f64,
    /// Spike threshold V_thr (mV).
    pub spike_threshold: f64,
    /// Potential jump J per unit of synaptic weight (mV).
    pub synaptic_unit_weight: f64,
    /// Weight JE carried by an excitatory spike, in units of J.
    pub excitatory_weight: f64,
    /// CE: excitatory synapses received by every neuron.
    pub excitatory_connections: usize,
    /// CI: inhibitory synapses received by every neuron.
    pub inhibitory_connections: usize,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            step_size: 0.1,
            synaptic_delay: 1.5,
            membrane_tau: 20.0,
            membrane_resistance: 20.0,
            refractory_period: 2.0,
            spike_threshold: 20.0,
            synaptic_unit_weight: 0.1,
            excitatory_weight: 1.0,
            excitatory_connections: 1000,
            inhibitory_connections: 250,
        }
    }
}

impl Params {
    /// Synaptic delay expressed in whole steps.
    pub fn delay_steps(&self) -> u64 {
        (self.synaptic_delay / self.step_size).round() as u64
    }

    /// Number of slots in each neuron's delay ring. Clamped at
    /// `MAX_DELAY_STEPS + 1`; `validate` rejects anything longer.
    pub fn ring_len(&self) -> usize {
        self.delay_steps().min(MAX_DELAY_STEPS) as usize + 1
    }

    /// Per-step membrane decay factor e^(-h/tau).
    pub fn decay(&self) -> f64 {
        (-self.step_size / self.membrane_tau).exp()
    }

    /// Number of steps covering `ms` milliseconds.
    pub fn steps_for(&self, ms: f64) -> u64 {
        (ms / self.step_size).round() as u64
    }

    /// Mean background spike count per step (Nu_ext) for a rate ratio `eta`.
    pub fn external_rate(&self, eta: f64) -> f64 {
        eta * self.spike_threshold * self.step_size / (self.synaptic_unit_weight * self.membrane_tau)
    }

    /// Nu_thr: external frequency at which the mean input alone reaches
    /// threshold in the absence of recurrent feedback (spikes/ms).
    pub fn threshold_rate(&self) -> f64 {
        self.spike_threshold
            / (self.excitatory_connections as f64 * self.synaptic_unit_weight * self.membrane_tau)
    }

    pub fn validate(&self) -> SimResult<()> {
        let positive = [
            ("step_size", self.step_size),
            ("synaptic_delay", self.synaptic_delay),
            ("membrane_tau", self.membrane_tau),
            ("membrane_resistance", self.membrane_resistance),
            ("refractory_period", self.refractory_period),
            ("spike_threshold", self.spike_threshold),
            ("synaptic_unit_weight", self.synaptic_unit_weight),
            ("excitatory_weight", self.excitatory_weight),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SimError::InvalidParameter { name, value, expected: "finite and > 0" });
            }
        }
        let delay_steps = self.delay_steps();
        if delay_steps == 0 {
            return Err(SimError::DelayTooShort {
                delay_ms: self.synaptic_delay,
                step_ms: self.step_size,
            });
        }
        if delay_steps > MAX_DELAY_STEPS {
            return Err(SimError::DelayTooLong {
                delay_ms: self.synaptic_delay,
                step_ms: self.step_size,
                max_steps: MAX_DELAY_STEPS,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn reference_derived_values() {
        let p = Params::default();
        assert_eq!(p.delay_steps(), 15);
        assert_eq!(p.ring_len(), 16);
        assert_eq!(p.steps_for(100.0), 1000);
        assert_eq!(p.steps_for(0.0), 0);
        assert_relative_eq!(p.decay(), (-0.005f64).exp());
        // eta = 2 -> 2 * 20 * 0.1 / (0.1 * 20) = 2 background spikes per step
        assert_relative_eq!(p.external_rate(2.0), 2.0);
        assert_relative_eq!(p.threshold_rate(), 0.01);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_and_non_finite() {
        let p = Params { membrane_tau: 0.0, ..Params::default() };
        assert!(matches!(
            p.validate(),
            Err(SimError::InvalidParameter { name: "membrane_tau", .. })
        ));
        let p = Params { spike_threshold: f64::NAN, ..Params::default() };
        assert!(matches!(
            p.validate(),
            Err(SimError::InvalidParameter { name: "spike_threshold", .. })
        ));
    }

    #[test]
    fn rejects_delay_shorter_than_half_a_step() {
        let p = Params { synaptic_delay: 0.04, ..Params::default() };
        assert!(matches!(p.validate(), Err(SimError::DelayTooShort { .. })));
        let p = Params { synaptic_delay: 0.06, ..Params::default() };
        assert_eq!(p.delay_steps(), 1);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn rejects_delay_longer_than_ring_cap() {
        let p = Params { synaptic_delay: 1e30, ..Params::default() };
        assert_eq!(p.delay_steps(), u64::MAX);
        assert_eq!(p.ring_len(), MAX_DELAY_STEPS as usize + 1);
        assert!(matches!(
            p.validate(),
            Err(SimError::DelayTooLong { max_steps: MAX_DELAY_STEPS, .. })
        ));

        let p = Params { synaptic_delay: 1e5, ..Params::default() };
        assert!(matches!(p.validate(), Err(SimError::DelayTooLong { .. })));

        let p = Params { synaptic_delay: 1000.0, ..Params::default() };
        assert_eq!(p.delay_steps(), MAX_DELAY_STEPS);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn zero_connection_counts_are_allowed() {
        let p = Params { excitatory_connections: 0, inhibitory_connections: 0, ..Params::default() };
        assert!(p.validate().is_ok());
    }
}
