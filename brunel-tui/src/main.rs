//! TUI entrypoint: renders a 2D spike raster of a small Brunel network
//! Controls: [s] Step, [r] Run/Pause, [q] Quit

mod app;
mod backend;
mod ui;

use anyhow::Result;
use app::App;
use backend::NetworkBackend;
use brunel_core::{NetworkConfig, Params};
use clap::Parser;
use ui::draw;

use std::io;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event as CEvent, KeyCode},
    execute, terminal,
};
use ratatui::{backend::CrosstermBackend, Terminal};

#[derive(Parser)]
#[command(name = "brunel-tui", about = "Live spike raster of a small Brunel network")]
struct Args {
    #[arg(long, default_value_t = 80)]
    excitatory: usize,
    #[arg(long, default_value_t = 20)]
    inhibitory: usize,
    /// Connection probability; CE and CI are this fraction of each population
    #[arg(long, default_value_t = 0.1)]
    epsilon: f64,
    #[arg(long, default_value_t = 2.0)]
    eta: f64,
    #[arg(short, long, default_value_t = 5.0)]
    g: f64,
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Neurons shown in the raster
    #[arg(long, default_value_t = 40)]
    rows: usize,
    /// Raster width in steps
    #[arg(long, default_value_t = 100)]
    width: usize,
    /// Simulation steps per UI tick while running
    #[arg(long, default_value_t = 1)]
    steps_per_tick: usize,
}

fn fan_in(epsilon: f64, population: usize) -> usize {
    ((epsilon * population as f64).round() as usize).max(1)
}

fn restore_terminal() -> Result<()> {
    terminal::disable_raw_mode()?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen)?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Build before touching the terminal so setup errors print normally
    let params = Params {
        excitatory_connections: fan_in(args.epsilon, args.excitatory),
        inhibitory_connections: fan_in(args.epsilon, args.inhibitory),
        ..Params::default()
    };
    let config = NetworkConfig {
        excitatory: args.excitatory,
        inhibitory: args.inhibitory,
        eta: args.eta,
        inhibitory_weight: args.g / params.excitatory_weight,
    };
    let backend = NetworkBackend::new(params, config, args.seed)?;
    let mut app = App::new(backend, args.width, args.rows);

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;

    // Ensure terminal is restored on panic
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        default_hook(panic_info);
    }));

    let result = event_loop(&mut terminal, &mut app, args.steps_per_tick.max(1));
    restore_terminal()?;
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<NetworkBackend>,
    steps_per_tick: usize,
) -> Result<()> {
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        draw(terminal, app)?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::from_millis(0));

        if event::poll(timeout)? {
            if let CEvent::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Char('s') => app.step()?,
                    KeyCode::Char('r') => app.toggle_running(),
                    _ => {}
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            if app.running {
                for _ in 0..steps_per_tick {
                    app.step()?;
                }
            }
            last_tick = Instant::now();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fan_in_scales_with_population() {
        assert_eq!(fan_in(0.1, 10_000), 1000);
        assert_eq!(fan_in(0.1, 2_500), 250);
        assert_eq!(fan_in(0.1, 3), 1);
    }
}
