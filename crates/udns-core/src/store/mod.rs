// # Remote Store Implementations
//
// This module provides implementations of the RemoteStore trait that live
// inside the process. The REST implementation lives in `udns-client`.

pub mod memory;

pub use memory::{ALREADY_EXISTS_CODE, MemoryKey, MemoryStore};
