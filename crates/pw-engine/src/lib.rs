//! Real-time block pitch engine for pitchwheel.
//!
//! Takes audio one host quantum at a time, accumulates it into larger
//! analysis blocks, pitch-shifts each block, and drains the result back out
//! in quanta. Nothing on the processing path allocates or locks.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod accumulator;
mod drain;
mod engine;
mod node;
mod param;
mod pitch_node;
mod transform;

pub use accumulator::QuantumAccumulator;
pub use drain::QuantumDrain;
pub use engine::{BlockEngine, PITCH_FACTOR_PARAM};
pub use node::{NodeInfo, ParamInfo, QuantumProcessor};
pub use param::{pitch_channel, PitchReader, PitchWriter};
pub use pitch_node::PitchNode;
pub use transform::{PitchTransform, WindowedResampler};
