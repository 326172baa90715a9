//! Model registry with in-memory implementation, result generators, and a simulated
//! computation engine.

mod engine;
mod generator;
mod memory;

#[cfg(any(test, feature = "test-util"))]
pub mod mock;

pub use engine::{EngineError, EngineSettings, SimulatedEngine};
pub use generator::RandomResultGenerator;
pub use memory::InMemoryModelStore;
pub use model_types::{
    Model, ModelEntry, ModelStatus, ModelStore, ModelStoreError, ResultGenerator, ResultSet,
};

#[cfg(any(test, feature = "test-util"))]
pub use mock::{CountingResultGenerator, FixedResultGenerator};
