//! Interactive terminal entry of the run-level values.

use anyhow::{Context, Result};
use brunel_core::SimulationConfig;
use dialoguer::{theme::ColorfulTheme, Input};

fn non_negative(v: &f64) -> Result<(), &'static str> {
    if v.is_finite() && *v >= 0.0 {
        Ok(())
    } else {
        Err("Value must be a finite number >= 0")
    }
}

fn positive(v: &f64) -> Result<(), &'static str> {
    if v.is_finite() && *v > 0.0 {
        Ok(())
    } else {
        Err("Value must be a finite number > 0")
    }
}

/// Ask for duration, eta, g and population sizes, offering current values as defaults.
pub fn prompt_run(run: &mut SimulationConfig) -> Result<()> {
    let theme = ColorfulTheme::default();

    run.duration_ms = Input::with_theme(&theme)
        .with_prompt("Simulation time (ms)")
        .default(run.duration_ms)
        .validate_with(non_negative)
        .interact_text()
        .context("Failed to read simulation time")?;

    run.eta = Input::with_theme(&theme)
        .with_prompt("Nu_ext / Nu_thr (eta)")
        .default(run.eta)
        .validate_with(positive)
        .interact_text()
        .context("Failed to read eta")?;

    run.g = Input::with_theme(&theme)
        .with_prompt("g = JI / JE")
        .default(run.g)
        .validate_with(positive)
        .interact_text()
        .context("Failed to read g")?;

    run.excitatory = Input::with_theme(&theme)
        .with_prompt("Number of excitatory neurons")
        .default(run.excitatory)
        .interact_text()
        .context("Failed to read excitatory count")?;

    run.inhibitory = Input::with_theme(&theme)
        .with_prompt("Number of inhibitory neurons")
        .default(run.inhibitory)
        .interact_text()
        .context("Failed to read inhibitory count")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validators() {
        assert!(non_negative(&0.0).is_ok());
        assert!(non_negative(&-0.1).is_err());
        assert!(positive(&0.0).is_err());
        assert!(positive(&f64::NAN).is_err());
        assert!(positive(&2.0).is_ok());
    }
}
