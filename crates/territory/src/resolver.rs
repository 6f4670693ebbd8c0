use std::sync::Arc;

use bevy::log::warn;

use crate::claims::ClaimStore;
use crate::coords::{ActorId, ColumnPos};
use crate::error::DomainsError;
use crate::key::Key;
use crate::privilege::Privilege;
use crate::registry::DomainRegistry;

/// Outcome of a privilege check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    Granted,
    Denied,
    /// No domain governs the location. Whether unclaimed land is open is a
    /// decision for the caller.
    NoDomain,
}

impl Access {
    pub fn is_granted(self) -> bool {
        self == Access::Granted
    }

    fn from_grant(granted: bool) -> Self {
        if granted {
            Access::Granted
        } else {
            Access::Denied
        }
    }
}

/// Decides whether an actor holds a privilege at a location.
///
/// Only the domain that owns the exact tile or column is consulted. Its
/// default role is checked first, then the actor's title in it. Superdomains
/// are not walked.
pub struct PrivilegeResolver {
    claims: Arc<ClaimStore>,
    registry: Arc<DomainRegistry>,
}

impl PrivilegeResolver {
    pub fn new(claims: Arc<ClaimStore>, registry: Arc<DomainRegistry>) -> Self {
        Self { claims, registry }
    }

    /// Domain owning the column at `pos`, if any.
    pub fn owner_at(&self, pos: ColumnPos) -> Result<Option<Key>, DomainsError> {
        self.claims.owner_at(pos)
    }

    pub fn check(
        &self,
        actor: ActorId,
        pos: ColumnPos,
        privilege: Privilege,
    ) -> Result<Access, DomainsError> {
        match self.owner_at(pos)? {
            Some(owner) => self.check_in_domain(actor, &owner, privilege),
            None => Ok(Access::NoDomain),
        }
    }

    /// Check against one domain directly, regardless of location.
    pub fn check_in_domain(
        &self,
        actor: ActorId,
        key: &Key,
        privilege: Privilege,
    ) -> Result<Access, DomainsError> {
        let Some(domain) = self.registry.domain(key)? else {
            warn!("claim references missing domain {key}");
            return Ok(Access::NoDomain);
        };
        Ok(Access::from_grant(
            domain.actor_has_privilege(actor, privilege),
        ))
    }

    /// Check in the lowest domain containing both `a` and `b`. Keys in
    /// different root trees share no domain.
    pub fn check_common_domain(
        &self,
        actor: ActorId,
        a: &Key,
        b: &Key,
        privilege: Privilege,
    ) -> Result<Access, DomainsError> {
        match Key::common_ancestor(a, b) {
            Some(common) => self.check_in_domain(actor, &common, privilege),
            None => Ok(Access::NoDomain),
        }
    }
}
