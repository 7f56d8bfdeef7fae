pub mod align;
pub mod archive;
pub mod entry;
pub mod error;
pub mod hash;
pub mod header;
pub mod order;

pub use archive::{Build, Sarc};
pub use entry::FatEntry;
pub use error::{Error, Result};
pub use hash::{name_hash, DEFAULT_HASH_KEY};
pub use order::Order;
