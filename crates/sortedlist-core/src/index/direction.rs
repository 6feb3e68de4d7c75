use candid::CandidType;
use serde::{Deserialize, Serialize};

///
/// Direction
///
/// Traversal direction along the chain. `Asc` follows `right` links,
/// `Desc` follows `left` links.
///

#[derive(CandidType, Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}
