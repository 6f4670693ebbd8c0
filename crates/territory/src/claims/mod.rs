mod revisions;
mod store;
#[cfg(test)]
mod tests;
mod types;

pub use revisions::ClaimRevisions;
pub use store::ClaimStore;
pub use types::{ClaimKind, ClaimState, ColumnClaims};
