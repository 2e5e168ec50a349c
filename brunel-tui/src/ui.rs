// TUI rendering: 2D spike raster (time on X, neuron index on Y) + status panel.

use std::io::Stdout;

use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Text},
    widgets::{Block, Borders, Paragraph},
    Terminal,
};

use crate::app::App;
use crate::backend::SnnBackend;

/// Draws the UI each frame:
/// - Top: raster rows (excitatory white, inhibitory red) x columns (time, circular).
/// - Bottom: step, simulated time, spikes this step, mean rate, controls.
pub fn draw<B: SnnBackend>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &App<B>,
) -> anyhow::Result<()> {
    terminal.draw(|f| {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([Constraint::Percentage(85), Constraint::Percentage(15)].as_ref())
            .split(f.size());

        let label_width = app.raster.len().saturating_sub(1).to_string().len();
        let excitatory = app.backend.excitatory();
        let lines: Vec<Line> = app
            .raster
            .iter()
            .enumerate()
            .map(|(row_idx, row)| {
                let mut buf = format!("n{:0width$} |", row_idx, width = label_width);
                buf.extend(row.iter());
                let color = if row_idx < excitatory { Color::White } else { Color::Red };
                Line::styled(buf, Style::default().fg(color))
            })
            .collect();

        let raster_widget = Paragraph::new(Text::from(lines))
            .block(Block::default().title("Spike Raster  (time →)").borders(Borders::ALL));
        f.render_widget(raster_widget, chunks[0]);

        let status = format!(
            "Step: {} | t = {:.1} ms | Neurons: {} | Spikes: {} | Rate: {:.1} Hz | Running: {} | [s] Step  [r] Run/Pause  [q] Quit",
            app.tick,
            app.elapsed_ms(),
            app.backend.neurons(),
            app.last_spikes,
            app.mean_rate_hz(),
            if app.running { "yes" } else { "no" }
        );
        let status_widget = Paragraph::new(status)
            .style(Style::default().fg(Color::Cyan))
            .block(Block::default().title("Status").borders(Borders::ALL));
        f.render_widget(status_widget, chunks[1]);
    })?;
    Ok(())
}
