//! Spike records and the sinks that consume them.

use std::io::{BufWriter, Write};

use crate::error::SimResult;

/// One emitted spike: the network step it was emitted on and the neuron index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpikeEvent {
    pub neuron_id: u32,
    pub time: u64,
}

/// Receiver for spike records, in emission order.
pub trait SpikeSink {
    fn record(&mut self, event: SpikeEvent) -> SimResult<()>;

    fn flush(&mut self) -> SimResult<()> {
        Ok(())
    }
}

impl SpikeSink for Vec<SpikeEvent> {
    fn record(&mut self, event: SpikeEvent) -> SimResult<()> {
        self.push(event);
        Ok(())
    }
}

/// Discards every record; for runs where only the summary matters.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl SpikeSink for NullSink {
    fn record(&mut self, _event: SpikeEvent) -> SimResult<()> {
        Ok(())
    }
}

/// Writes `step<TAB>index` lines, one per spike, no header.
pub struct TsvWriter<W: Write> {
    out: BufWriter<W>,
    written: u64,
}

impl<W: Write> TsvWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { out: BufWriter::new(inner), written: 0 }
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(self) -> SimResult<W> {
        self.out.into_inner().map_err(|e| e.into_error().into())
    }
}

impl<W: Write> SpikeSink for TsvWriter<W> {
    fn record(&mut self, event: SpikeEvent) -> SimResult<()> {
        writeln!(self.out, "{}\t{}", event.time, event.neuron_id)?;
        self.written += 1;
        Ok(())
    }

    fn flush(&mut self) -> SimResult<()> {
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;

    #[test]
    fn tsv_lines() {
        let mut w = TsvWriter::new(Vec::new());
        w.record(SpikeEvent { neuron_id: 3, time: 12 }).unwrap();
        w.record(SpikeEvent { neuron_id: 10, time: 12 }).unwrap();
        w.record(SpikeEvent { neuron_id: 0, time: 40 }).unwrap();
        assert_eq!(w.written(), 3);
        let bytes = w.into_inner().unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "12\t3\n12\t10\n40\t0\n");
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "closed"))
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn io_failure_surfaces_on_flush() {
        let mut w = TsvWriter::new(Broken);
        // Buffered: the record itself succeeds
        w.record(SpikeEvent { neuron_id: 1, time: 1 }).unwrap();
        assert!(matches!(w.flush(), Err(SimError::Io(_))));
    }
}
