use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::coords::ActorId;
use crate::key::Key;
use crate::privilege::{Privilege, Role};

/// An actor's named grant of a role within one domain.
///
/// The name is free text: the administrator title of a city might be
/// "Mayor", that of a house "Owner".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
    pub domain: Key,
    pub actor: ActorId,
    pub name: String,
    pub role: Role,
}

impl Title {
    pub fn new(domain: Key, actor: ActorId, name: impl Into<String>, role: Role) -> Self {
        Self {
            domain,
            actor,
            name: name.into(),
            role,
        }
    }

    pub fn grants(&self, privilege: Privilege) -> bool {
        self.role.grants(privilege)
    }
}

/// A named territory with a default role and per-actor titles.
///
/// Titles are keyed by actor, so an actor holds at most one title per domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    pub key: Key,
    /// Privileges every actor enjoys in this domain, titled or not.
    pub default_role: Role,
    pub display_name: Option<String>,
    titles: BTreeMap<ActorId, Title>,
}

impl Domain {
    pub fn new(key: Key, default_role: Role, display_name: Option<String>) -> Self {
        Self {
            key,
            default_role,
            display_name,
            titles: BTreeMap::new(),
        }
    }

    pub fn title(&self, actor: ActorId) -> Option<&Title> {
        self.titles.get(&actor)
    }

    pub fn titles(&self) -> impl Iterator<Item = &Title> {
        self.titles.values()
    }

    pub fn title_count(&self) -> usize {
        self.titles.len()
    }

    /// Insert or replace the actor's title. The title is re-keyed to this
    /// domain whatever domain it was built for.
    pub fn set_title(&mut self, mut title: Title) -> Option<Title> {
        title.domain = self.key.clone();
        self.titles.insert(title.actor, title)
    }

    pub fn remove_title(&mut self, actor: ActorId) -> Option<Title> {
        self.titles.remove(&actor)
    }

    /// Whether `actor` holds `privilege` here, through the default role or
    /// through their own title. Superdomains are not consulted.
    pub fn actor_has_privilege(&self, actor: ActorId, privilege: Privilege) -> bool {
        if self.default_role.grants(privilege) {
            return true;
        }
        self.title(actor).is_some_and(|t| t.grants(privilege))
    }
}
