//! Chain client implementations.

mod cosmos;

pub use cosmos::CosmosClient;
