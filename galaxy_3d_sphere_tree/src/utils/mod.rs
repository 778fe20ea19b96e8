//! Storage utilities

mod node_pool;

pub use node_pool::{NodePool, PoolId};
