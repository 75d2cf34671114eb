//! Simulated time: the virtual clock and the settle detector.
//!
//! No component of the engine ever touches wall-clock time. "Waiting" is
//! either a [`VirtualClock`] callback (fired by explicit `tick` calls driven
//! by the subject's time-control messages) or a [`Settle`] future (quiescence
//! detection after an asynchronous step).

mod settle;
mod timer;

pub use settle::Settle;
pub use timer::{TimerCallback, TimerHandle, VirtualClock};
