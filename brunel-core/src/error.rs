use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid {name} = {value}: expected {expected}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },
    #[error("synaptic delay of {delay_ms} ms rounds to zero steps of {step_ms} ms")]
    DelayTooShort { delay_ms: f64, step_ms: f64 },
    #[error("synaptic delay of {delay_ms} ms exceeds {max_steps} steps of {step_ms} ms")]
    DelayTooLong { delay_ms: f64, step_ms: f64, max_steps: u64 },
    // Delivery must land within one ring length of the receiver's clock.
    #[error("spike delivery at step {arrival} outside buffer window [{clock}, {clock} + {window}]")]
    DeliveryOutOfWindow { arrival: u64, clock: u64, window: u64 },
    #[error("target neuron {index} out of range (network has {len} neurons)")]
    UnknownNeuron { index: u32, len: usize },
    #[error("network of {0} neurons exceeds u32 indexing")]
    TooManyNeurons(usize),
    #[error("spike log i/o: {0}")]
    Io(#[from] std::io::Error),
}

pub type SimResult<T, E = SimError> = core::result::Result<T, E>;
