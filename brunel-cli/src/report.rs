//! Plain-text run summary printed after a simulation.

use std::fmt::Write as _;
use std::path::Path;

use brunel_core::{Params, RunSummary};

pub fn render(summary: &RunSummary, params: &Params, seed: Option<u64>, log: &Path) -> String {
    let pop = &summary.population;
    let mut out = String::new();
    let _ = writeln!(out, "Simulation : done");
    let _ = writeln!(
        out,
        "  steps      {} ({:.1} ms at h = {} ms)",
        summary.steps, summary.duration_ms, params.step_size
    );
    let _ = writeln!(
        out,
        "  neurons    {} ({} excitatory, {} inhibitory)",
        summary.neurons, pop.excitatory_neurons, pop.inhibitory_neurons
    );
    let _ = writeln!(out, "  spikes     {}", summary.spikes);
    let _ = writeln!(
        out,
        "  rate       {:.2} Hz (E {:.2} Hz, I {:.2} Hz)",
        summary.mean_rate_hz(),
        pop.excitatory_rate_hz(summary.duration_ms),
        pop.inhibitory_rate_hz(summary.duration_ms)
    );
    if let Some(seed) = seed {
        let _ = writeln!(out, "  seed       {}", seed);
    }
    let _ = write!(out, "  spike log  {}", log.display());
    out
}
