mod nat256;
mod node_id;

pub use nat256::*;
pub use node_id::*;
