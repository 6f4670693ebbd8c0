//! Domain records and their administrative operations.
//!
//! Writes are serialized by one registry lock and each persists through a
//! single repository call, so a domain and its complete title set are always
//! stored together. Operations whose cascade rewrites tile claims (delete,
//! rename, integrate) also exclude concurrent claim mutations through
//! [`ClaimStore::with_all_tiles`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bevy::log::info;

use crate::claims::ClaimStore;
use crate::coords::ActorId;
use crate::domain::{Domain, Title};
use crate::error::DomainsError;
use crate::key::Key;
use crate::privilege::Role;
use crate::repository::Repository;

pub struct DomainRegistry {
    repository: Arc<dyn Repository>,
    claims: Arc<ClaimStore>,
    write_lock: Mutex<()>,
}

impl DomainRegistry {
    pub fn new(repository: Arc<dyn Repository>, claims: Arc<ClaimStore>) -> Self {
        Self {
            repository,
            claims,
            write_lock: Mutex::new(()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn domain(&self, key: &Key) -> Result<Option<Domain>, DomainsError> {
        Ok(self.repository.load_domain(key)?)
    }

    /// Like [`DomainRegistry::domain`], but a missing record is an error.
    pub fn load(&self, key: &Key) -> Result<Domain, DomainsError> {
        self.domain(key)?
            .ok_or_else(|| DomainsError::UnknownDomain(key.clone()))
    }

    pub fn exists(&self, key: &Key) -> Result<bool, DomainsError> {
        Ok(self.domain(key)?.is_some())
    }

    pub fn list_domains(&self) -> Result<Vec<Key>, DomainsError> {
        Ok(self.repository.list_domains()?)
    }

    /// Direct subdomains of `key`.
    pub fn subdomains(&self, key: &Key) -> Result<Vec<Key>, DomainsError> {
        Ok(self
            .list_domains()?
            .into_iter()
            .filter(|k| k.super_key().as_ref() == Some(key))
            .collect())
    }

    fn require_superdomain(&self, key: &Key) -> Result<(), DomainsError> {
        match key.super_key() {
            Some(parent) if !self.exists(&parent)? => {
                Err(DomainsError::MissingSuperdomain(key.clone()))
            }
            _ => Ok(()),
        }
    }

    fn require_leaf(&self, key: &Key) -> Result<(), DomainsError> {
        if self.subdomains(key)?.is_empty() {
            Ok(())
        } else {
            Err(DomainsError::HasSubdomains(key.clone()))
        }
    }

    pub fn create_domain(
        &self,
        key: Key,
        default_role: Role,
        display_name: Option<String>,
    ) -> Result<Domain, DomainsError> {
        let _guard = self.lock();
        if self.exists(&key)? {
            return Err(DomainsError::DomainExists(key));
        }
        self.require_superdomain(&key)?;
        let domain = Domain::new(key, default_role, display_name);
        self.repository.save_domain(&domain)?;
        info!("created domain {}", domain.key);
        Ok(domain)
    }

    /// Delete a domain without subdomains, together with its titles and
    /// every claim it holds.
    pub fn delete_domain(&self, key: &Key) -> Result<(), DomainsError> {
        let _guard = self.lock();
        self.load(key)?;
        self.require_leaf(key)?;
        self.claims
            .with_all_tiles(|repository| Ok(repository.delete_domain(key)?))?;
        info!("deleted domain {key}");
        Ok(())
    }

    /// Re-key a domain without subdomains. Titles and claims follow it.
    pub fn rename_domain(&self, from: &Key, to: &Key) -> Result<Domain, DomainsError> {
        let _guard = self.lock();
        self.load(from)?;
        if self.exists(to)? {
            return Err(DomainsError::DomainExists(to.clone()));
        }
        // The renamed domain cannot become its own superdomain.
        if from.is_ancestor_of(to) {
            return Err(DomainsError::MissingSuperdomain(to.clone()));
        }
        self.require_superdomain(to)?;
        self.require_leaf(from)?;
        self.claims
            .with_all_tiles(|repository| Ok(repository.rename_domain(from, to)?))?;
        info!("renamed domain {from} to {to}");
        self.load(to)
    }

    /// Hand all territory of `from` to `into` and delete `from`.
    pub fn integrate_domain(&self, from: &Key, into: &Key) -> Result<(), DomainsError> {
        let _guard = self.lock();
        if from == into {
            return Err(DomainsError::DomainExists(into.clone()));
        }
        self.load(from)?;
        self.load(into)?;
        self.require_leaf(from)?;
        self.claims
            .with_all_tiles(|repository| Ok(repository.integrate_domain(from, into)?))?;
        info!("integrated domain {from} into {into}");
        Ok(())
    }

    /// Apply `f` to the stored domain and persist the result as one commit.
    fn update<T>(
        &self,
        key: &Key,
        f: impl FnOnce(&mut Domain) -> Result<T, DomainsError>,
    ) -> Result<T, DomainsError> {
        let _guard = self.lock();
        let mut domain = self.load(key)?;
        let result = f(&mut domain)?;
        self.repository.save_domain(&domain)?;
        Ok(result)
    }

    pub fn set_default_role(&self, key: &Key, role: Role) -> Result<(), DomainsError> {
        self.update(key, |domain| {
            domain.default_role = role;
            Ok(())
        })
    }

    pub fn set_display_name(
        &self,
        key: &Key,
        display_name: Option<String>,
    ) -> Result<(), DomainsError> {
        self.update(key, |domain| {
            domain.display_name = display_name;
            Ok(())
        })
    }

    /// Grant `actor` a title, replacing the one they held in this domain.
    pub fn grant_title(
        &self,
        key: &Key,
        actor: ActorId,
        name: impl Into<String>,
        role: Role,
    ) -> Result<Option<Title>, DomainsError> {
        let title = Title::new(key.clone(), actor, name, role);
        self.update(key, |domain| Ok(domain.set_title(title)))
    }

    pub fn revoke_title(&self, key: &Key, actor: ActorId) -> Result<Title, DomainsError> {
        self.update(key, |domain| {
            domain
                .remove_title(actor)
                .ok_or_else(|| DomainsError::UnknownTitle {
                    domain: key.clone(),
                    actor,
                })
        })
    }

    pub fn titles(&self, key: &Key) -> Result<Vec<Title>, DomainsError> {
        Ok(self.repository.load_titles_for_domain(key)?)
    }

    pub fn titles_for_actor(&self, actor: ActorId) -> Result<Vec<Title>, DomainsError> {
        Ok(self.repository.load_titles_for_actor(actor)?)
    }
}
