//! Persistence collaborator for domains, titles and tile claims.
//!
//! Every call is a transaction of its own: it either applies completely or
//! leaves stored state untouched and returns a [`RepositoryError`].

mod table_repository;
mod tables;

pub use table_repository::{CommitSink, MemoryRepository, TableRepository};
pub use tables::{ClaimRow, DomainRow, RepositoryTables, TileRowKey, TitleRow};

use crate::claims::{ClaimState, ColumnClaims};
use crate::coords::{ActorId, TileCoord};
use crate::domain::{Domain, Title};
use crate::error::RepositoryError;
use crate::key::Key;

pub trait Repository: Send + Sync {
    /// Load a domain together with all of its titles.
    fn load_domain(&self, key: &Key) -> Result<Option<Domain>, RepositoryError>;

    /// Upsert a domain and replace its complete title set in one commit.
    fn save_domain(&self, domain: &Domain) -> Result<(), RepositoryError>;

    /// Delete a domain, its titles and every claim it holds.
    fn delete_domain(&self, key: &Key) -> Result<(), RepositoryError>;

    /// Re-key a domain, its titles and its claims.
    fn rename_domain(&self, from: &Key, to: &Key) -> Result<(), RepositoryError>;

    /// Hand every claim of `from` to `into`, then delete `from` and its titles.
    fn integrate_domain(&self, from: &Key, into: &Key) -> Result<(), RepositoryError>;

    fn list_domains(&self) -> Result<Vec<Key>, RepositoryError>;

    /// Claim state of a tile; `Unclaimed` when no record exists.
    fn load_claim_state(&self, tile: TileCoord) -> Result<ClaimState, RepositoryError>;

    /// Replace whatever claim record the tile has with a whole-tile claim.
    fn save_exclusive_claim(&self, tile: TileCoord, owner: &Key) -> Result<(), RepositoryError>;

    /// Replace whatever claim record the tile has with column claims. An
    /// empty column set deletes the record.
    fn save_partitioned_claim(
        &self,
        tile: TileCoord,
        columns: &ColumnClaims,
    ) -> Result<(), RepositoryError>;

    fn delete_claim(&self, tile: TileCoord) -> Result<(), RepositoryError>;

    fn load_titles_for_domain(&self, key: &Key) -> Result<Vec<Title>, RepositoryError>;

    fn load_titles_for_actor(&self, actor: ActorId) -> Result<Vec<Title>, RepositoryError>;
}
