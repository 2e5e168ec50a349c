//! Run summaries: spike totals and mean firing rates per population.

use crate::neuron::Neuron;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PopulationStats {
    pub excitatory_neurons: usize,
    pub inhibitory_neurons: usize,
    pub excitatory_spikes: u64,
    pub inhibitory_spikes: u64,
}

impl PopulationStats {
    pub fn from_neurons(neurons: &[Neuron]) -> Self {
        let mut stats = Self::default();
        for n in neurons {
            let spikes = n.spike_count() as u64;
            if n.is_excitatory() {
                stats.excitatory_neurons += 1;
                stats.excitatory_spikes += spikes;
            } else {
                stats.inhibitory_neurons += 1;
                stats.inhibitory_spikes += spikes;
            }
        }
        stats
    }

    pub fn excitatory_rate_hz(&self, duration_ms: f64) -> f64 {
        rate_hz(self.excitatory_spikes, self.excitatory_neurons, duration_ms)
    }

    pub fn inhibitory_rate_hz(&self, duration_ms: f64) -> f64 {
        rate_hz(self.inhibitory_spikes, self.inhibitory_neurons, duration_ms)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunSummary {
    pub steps: u64,
    /// Simulated time covered by `steps`.
    pub duration_ms: f64,
    pub neurons: usize,
    pub spikes: u64,
    pub population: PopulationStats,
}

impl RunSummary {
    /// Mean single-neuron firing rate over the whole network.
    pub fn mean_rate_hz(&self) -> f64 {
        rate_hz(self.spikes, self.neurons, self.duration_ms)
    }
}

/// Spikes per neuron per second; zero for an empty population or run.
pub fn rate_hz(spikes: u64, neurons: usize, duration_ms: f64) -> f64 {
    if neurons == 0 || duration_ms <= 0.0 {
        return 0.0;
    }
    spikes as f64 / (neurons as f64 * duration_ms / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Params;
    use approx::assert_relative_eq;

    #[test]
    fn rates() {
        assert_relative_eq!(rate_hz(50, 10, 500.0), 10.0);
        assert_eq!(rate_hz(50, 0, 500.0), 0.0);
        assert_eq!(rate_hz(50, 10, 0.0), 0.0);
    }

    #[test]
    fn splits_by_class() {
        let params = Params::default();
        let mut neurons = vec![Neuron::new(true, &params), Neuron::new(true, &params), Neuron::new(false, &params)];
        for n in neurons.iter_mut() {
            n.set_potential(30.0);
            n.update(0.0, 0);
        }
        let stats = PopulationStats::from_neurons(&neurons);
        assert_eq!(stats.excitatory_neurons, 2);
        assert_eq!(stats.inhibitory_neurons, 1);
        assert_eq!(stats.excitatory_spikes, 2);
        assert_eq!(stats.inhibitory_spikes, 1);
        assert_relative_eq!(stats.excitatory_rate_hz(1000.0), 1.0);
    }
}
