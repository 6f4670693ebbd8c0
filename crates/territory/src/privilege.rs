use std::fmt;

use serde::{Deserialize, Serialize};

/// An atomic permission kind checked against a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Privilege {
    /// Place and destroy blocks.
    Build,
    /// Use doors, buttons, beds and similar blocks.
    Interact,
    /// Add and remove items from inventories.
    Inventory,
    /// Damage neutral entities.
    Herd,
    /// Damage aggressive entities.
    Guard,
    /// Grant and revoke titles, create and delete subdomains.
    Administrate,
    /// Grant and revoke titles, except administrator titles.
    WeakAdministrate,
}

impl Privilege {
    pub const ALL: [Privilege; 7] = [
        Privilege::Build,
        Privilege::Interact,
        Privilege::Inventory,
        Privilege::Herd,
        Privilege::Guard,
        Privilege::Administrate,
        Privilege::WeakAdministrate,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Privilege::Build => "BUILD",
            Privilege::Interact => "INTERACT",
            Privilege::Inventory => "INVENTORY",
            Privilege::Herd => "HERD",
            Privilege::Guard => "GUARD",
            Privilege::Administrate => "ADMINISTRATE",
            Privilege::WeakAdministrate => "WEAK_ADMINISTRATE",
        }
    }
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A predefined bundle of privileges. The set of roles is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    /// Creates and deletes subdomains; may delete a root domain.
    Administrator,
    /// Grants and revokes lesser titles, but not administrator titles.
    ViceAdministrator,
    Resident,
    Builder,
    /// Works with the inventories of a domain.
    Clerk,
    /// May kill farm animals.
    Herder,
    /// May kill aggressive mobs.
    Guard,
    /// May use doors, buttons and beds.
    Visitor,
    /// No privileges at all.
    Outsider,
}

const FULL_MEMBER: &[Privilege] = &[
    Privilege::Build,
    Privilege::Inventory,
    Privilege::Interact,
    Privilege::Herd,
    Privilege::Guard,
];

impl Role {
    pub const ALL: [Role; 9] = [
        Role::Administrator,
        Role::ViceAdministrator,
        Role::Resident,
        Role::Builder,
        Role::Clerk,
        Role::Herder,
        Role::Guard,
        Role::Visitor,
        Role::Outsider,
    ];

    pub fn privileges(self) -> &'static [Privilege] {
        match self {
            Role::Administrator => &[
                Privilege::Administrate,
                Privilege::Build,
                Privilege::Inventory,
                Privilege::Interact,
                Privilege::Herd,
                Privilege::Guard,
            ],
            Role::ViceAdministrator => &[
                Privilege::WeakAdministrate,
                Privilege::Build,
                Privilege::Inventory,
                Privilege::Interact,
                Privilege::Herd,
                Privilege::Guard,
            ],
            Role::Resident | Role::Builder => FULL_MEMBER,
            Role::Clerk => &[Privilege::Inventory, Privilege::Interact],
            Role::Herder => &[Privilege::Interact, Privilege::Herd],
            Role::Guard => &[Privilege::Interact, Privilege::Guard],
            Role::Visitor => &[Privilege::Interact],
            Role::Outsider => &[],
        }
    }

    #[inline]
    pub fn grants(self, privilege: Privilege) -> bool {
        self.privileges().contains(&privilege)
    }

    /// Stable name used in storage.
    pub fn name(self) -> &'static str {
        match self {
            Role::Administrator => "ADMINISTRATOR",
            Role::ViceAdministrator => "VICE_ADMINISTRATOR",
            Role::Resident => "RESIDENT",
            Role::Builder => "BUILDER",
            Role::Clerk => "CLERK",
            Role::Herder => "HERDER",
            Role::Guard => "GUARD",
            Role::Visitor => "VISITOR",
            Role::Outsider => "OUTSIDER",
        }
    }

    pub fn from_name(name: &str) -> Option<Role> {
        Role::ALL.into_iter().find(|role| role.name() == name)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_names_round_trip() {
        for role in Role::ALL {
            assert_eq!(Role::from_name(role.name()), Some(role));
        }
        assert_eq!(Role::from_name("KING"), None);
        assert_eq!(Role::from_name("administrator"), None);
    }

    #[test]
    fn test_only_administrator_administrates() {
        for role in Role::ALL {
            assert_eq!(
                role.grants(Privilege::Administrate),
                role == Role::Administrator,
                "{role}"
            );
        }
        assert!(Role::ViceAdministrator.grants(Privilege::WeakAdministrate));
    }

    #[test]
    fn test_every_role_but_outsider_interacts() {
        for role in Role::ALL {
            assert_eq!(role.grants(Privilege::Interact), role != Role::Outsider);
        }
        assert!(Role::Outsider.privileges().is_empty());
    }

    #[test]
    fn test_bundles_have_no_duplicates() {
        for role in Role::ALL {
            let privileges = role.privileges();
            for (n, p) in privileges.iter().enumerate() {
                assert!(!privileges[n + 1..].contains(p), "{role} repeats {p}");
            }
        }
    }

    #[test]
    fn test_privilege_names_are_distinct() {
        for (n, a) in Privilege::ALL.iter().enumerate() {
            for b in &Privilege::ALL[n + 1..] {
                assert_ne!(a.name(), b.name());
            }
        }
    }
}
