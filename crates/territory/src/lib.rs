use std::sync::Arc;

use bevy::prelude::*;

pub mod claims;
pub mod config;
pub mod coords;
pub mod domain;
pub mod error;
pub mod key;
pub mod privilege;
pub mod registry;
pub mod repository;
pub mod resolver;

#[cfg(test)]
mod integration_tests;

pub use claims::{ClaimState, ClaimStore, ColumnClaims};
pub use coords::{ActorId, ColumnIndex, ColumnPos, TileCoord, WorldId};
pub use domain::{Domain, Title};
pub use error::{ClaimConflict, DomainsError};
pub use key::Key;
pub use privilege::{Privilege, Role};
pub use registry::DomainRegistry;
pub use repository::{MemoryRepository, Repository};
pub use resolver::{Access, PrivilegeResolver};

/// Shared handles to the territory services, built around one repository.
///
/// Systems read it as a resource; other threads may hold clones of the inner
/// `Arc`s. Dropping the last handle drops the repository.
#[derive(Resource, Clone)]
pub struct DomainsContext {
    pub repository: Arc<dyn Repository>,
    pub claims: Arc<ClaimStore>,
    pub registry: Arc<DomainRegistry>,
    pub resolver: Arc<PrivilegeResolver>,
}

impl DomainsContext {
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        let claims = Arc::new(ClaimStore::new(Arc::clone(&repository)));
        let registry = Arc::new(DomainRegistry::new(
            Arc::clone(&repository),
            Arc::clone(&claims),
        ));
        let resolver = Arc::new(PrivilegeResolver::new(
            Arc::clone(&claims),
            Arc::clone(&registry),
        ));
        Self {
            repository,
            claims,
            registry,
            resolver,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryRepository::new()))
    }
}

impl Default for DomainsContext {
    fn default() -> Self {
        Self::in_memory()
    }
}

/// Installs an in-memory [`DomainsContext`] unless another plugin already
/// provided one.
pub struct TerritoryPlugin;

impl Plugin for TerritoryPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DomainsContext>();
    }
}
