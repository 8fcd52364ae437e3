pub mod error;
pub mod memory;
pub mod store;
pub mod words;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use store::{GameSubscription, ReplicatedStore};
pub use words::{BuiltinWords, WordSource};
