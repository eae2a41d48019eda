pub mod allocation_model;
pub mod allocation_service;
pub mod allocation_traits;
pub mod memory_reference;

pub use allocation_model::*;
pub use allocation_service::{AllocationService, AllocationServiceTrait};
pub use allocation_traits::InstrumentReferenceTrait;
pub use memory_reference::MemoryInstrumentReference;

#[cfg(test)]
mod allocation_service_tests;
