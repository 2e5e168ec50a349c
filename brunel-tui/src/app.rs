// Application state for the TUI, including a circular 2D spike raster.

use anyhow::Result;
use brunel_core::stats::rate_hz;

use crate::backend::SnnBackend;

pub struct App<B: SnnBackend> {
    pub backend: B,
    pub tick: u64,
    pub width: usize,           // number of columns (time window)
    pub raster: Vec<Vec<char>>, // [neuron][col], first `rows` neurons only
    pub running: bool,
    pub last_spikes: usize,
    pub total_spikes: u64,
}

impl<B: SnnBackend> App<B> {
    pub fn new(backend: B, width: usize, rows: usize) -> Self {
        let n = backend.neurons().min(rows);
        Self {
            backend,
            tick: 0,
            width: width.max(1),
            raster: vec![vec![' '; width.max(1)]; n],
            running: false,
            last_spikes: 0,
            total_spikes: 0,
        }
    }

    pub fn toggle_running(&mut self) {
        self.running = !self.running;
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.tick as f64 * self.backend.step_ms()
    }

    /// Mean firing rate of the whole network since start.
    pub fn mean_rate_hz(&self) -> f64 {
        rate_hz(self.total_spikes, self.backend.neurons(), self.elapsed_ms())
    }

    /// Advance simulation by one step and update the raster for the current column.
    pub fn step(&mut self) -> Result<()> {
        let spikes = self.backend.step()?;
        self.last_spikes = spikes.len();
        self.total_spikes += spikes.len() as u64;

        let col = (self.tick as usize) % self.width;
        self.tick = self.tick.saturating_add(1);

        for row in self.raster.iter_mut() {
            row[col] = ' ';
        }
        for sp in spikes {
            if let Some(row) = self.raster.get_mut(sp.neuron_id as usize) {
                row[col] = '•';
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brunel_core::SpikeEvent;

    /// Neuron `k` fires on every step divisible by `k + 1`.
    struct Scripted {
        n: usize,
        t: u64,
    }

    impl SnnBackend for Scripted {
        fn step(&mut self) -> Result<Vec<SpikeEvent>> {
            let t = self.t;
            self.t += 1;
            Ok((0..self.n as u32)
                .filter(|k| t % (*k as u64 + 1) == 0)
                .map(|k| SpikeEvent { neuron_id: k, time: t })
                .collect())
        }
        fn neurons(&self) -> usize {
            self.n
        }
        fn step_ms(&self) -> f64 {
            0.1
        }
    }

    #[test]
    fn raster_wraps_and_clears_columns() {
        let mut app = App::new(Scripted { n: 3, t: 0 }, 4, 3);
        for _ in 0..4 {
            app.step().unwrap();
        }
        assert_eq!(app.raster[0], vec!['•'; 4]);
        assert_eq!(app.raster[1], vec!['•', ' ', '•', ' ']);
        assert_eq!(app.raster[2], vec!['•', ' ', ' ', '•']);
        // Column 0 is rewritten on wrap
        app.step().unwrap();
        assert_eq!(app.raster[1][0], '•');
        assert_eq!(app.raster[2][0], ' ');
        assert_eq!(app.tick, 5);
        assert_eq!(app.total_spikes, 3 + 1 + 2 + 2 + 2);
    }

    #[test]
    fn rows_beyond_limit_are_counted_not_drawn() {
        let mut app = App::new(Scripted { n: 3, t: 0 }, 4, 1);
        assert_eq!(app.raster.len(), 1);
        app.step().unwrap();
        assert_eq!(app.last_spikes, 3);
    }

    #[test]
    fn rate_over_elapsed_time() {
        let mut app = App::new(Scripted { n: 1, t: 0 }, 8, 8);
        for _ in 0..10 {
            app.step().unwrap();
        }
        // 10 spikes from 1 neuron over 1 ms
        assert!((app.mean_rate_hz() - 10_000.0).abs() < 1e-6);
        assert_eq!(app.last_spikes, 1);
    }
}
