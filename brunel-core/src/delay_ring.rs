//! Per-neuron delay ring: a calendar of accumulated synaptic weight, one slot per step.

/// Fixed-size circular buffer indexed by `step % len`.
///
/// With `len = delay_steps + 1` every pending delivery owns a distinct slot:
/// a spike emitted at step `t` lands at `t + delay_steps`, which cannot alias
/// the slot being consumed at `t`.
#[derive(Clone, Debug)]
pub struct DelayRing {
    slots: Vec<f64>,
}

impl DelayRing {
    pub fn new(len: usize) -> Self {
        debug_assert!(len >= 1);
        Self { slots: vec![0.0; len] }
    }

    #[inline]
    fn slot(&self, step: u64) -> usize {
        (step % self.slots.len() as u64) as usize
    }

    /// Add `weight` to whatever is already pending for `step`.
    #[inline]
    pub fn schedule(&mut self, step: u64, weight: f64) {
        let slot = self.slot(step);
        self.slots[slot] += weight;
    }

    /// Weight pending for `step`, without consuming it.
    #[inline]
    pub fn pending(&self, step: u64) -> f64 {
        self.slots[self.slot(step)]
    }

    /// Return the weight pending for `step` and zero its slot.
    #[inline]
    pub fn take(&mut self, step: u64) -> f64 {
        let slot = self.slot(step);
        core::mem::take(&mut self.slots[slot])
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[f64] {
        &self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_accumulates_and_take_zeroes() {
        let mut ring = DelayRing::new(4);
        ring.schedule(6, 1.0);
        ring.schedule(6, 1.0);
        ring.schedule(10, -5.0); // same slot as 6
        assert_eq!(ring.pending(2), -3.0);
        assert_eq!(ring.take(6), -3.0);
        assert_eq!(ring.slots(), &[0.0; 4]);
    }

    #[test]
    fn slots_are_independent() {
        let mut ring = DelayRing::new(3);
        ring.schedule(0, 1.0);
        ring.schedule(1, 2.0);
        ring.schedule(2, 3.0);
        assert_eq!(ring.take(4), 2.0);
        assert_eq!(ring.slots(), &[1.0, 0.0, 3.0]);
        assert_eq!(ring.len(), 3);
    }
}
