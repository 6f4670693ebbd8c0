// ---------------------------------------------------------------------------
// tables – row storage shared by in-memory and file-backed repositories
// ---------------------------------------------------------------------------
//
// Rows keep keys, roles and identifiers in their textual form, the way a
// relational schema would. Typed values are produced on read; anything that
// fails to parse is reported as a `CorruptRecord`.
//
//   domains: domain_key -> (default_role, display_name)
//   titles:  (domain_key, actor) -> (role, name)
//   claims:  (world, tile_x, tile_z) -> Exclusive(domain_key)
//                                     | Partitioned(column -> domain_key)
//
// Deleting or renaming a domain cascades to its titles and claims.

use std::collections::BTreeMap;

use bitcode::{Decode, Encode};

use crate::claims::{ClaimState, ColumnClaims};
use crate::coords::{ActorId, ColumnIndex, TileCoord};
use crate::domain::{Domain, Title};
use crate::error::CorruptRecord;
use crate::key::Key;
use crate::privilege::Role;

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct DomainRow {
    pub default_role: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct TitleRow {
    pub role: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Encode, Decode)]
pub struct TileRowKey {
    pub world: String,
    pub x: i32,
    pub z: i32,
}

impl From<TileCoord> for TileRowKey {
    fn from(tile: TileCoord) -> Self {
        Self {
            world: tile.world.to_string(),
            x: tile.x,
            z: tile.z,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub enum ClaimRow {
    Exclusive { domain_key: String },
    Partitioned { columns: BTreeMap<u8, String> },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Encode, Decode)]
pub struct RepositoryTables {
    pub domains: BTreeMap<String, DomainRow>,
    pub titles: BTreeMap<(String, String), TitleRow>,
    pub claims: BTreeMap<TileRowKey, ClaimRow>,
}

fn parse_key(table: &'static str, text: &str) -> Result<Key, CorruptRecord> {
    Key::parse(text).map_err(|e| CorruptRecord::new(table, e.to_string()))
}

fn parse_role(table: &'static str, text: &str) -> Result<Role, CorruptRecord> {
    Role::from_name(text).ok_or_else(|| CorruptRecord::new(table, format!("unknown role {text:?}")))
}

fn parse_actor(text: &str) -> Result<ActorId, CorruptRecord> {
    ActorId::parse(text)
        .map_err(|e| CorruptRecord::new("title", format!("bad actor id {text:?}: {e}")))
}

fn title_from_row(
    domain_key: &str,
    actor: &str,
    row: &TitleRow,
) -> Result<Title, CorruptRecord> {
    Ok(Title::new(
        parse_key("title", domain_key)?,
        parse_actor(actor)?,
        row.name.clone(),
        parse_role("title", &row.role)?,
    ))
}

impl RepositoryTables {
    // -----------------------------------------------------------------------
    // Domains and titles
    // -----------------------------------------------------------------------

    pub fn domain(&self, key: &Key) -> Result<Option<Domain>, CorruptRecord> {
        let domain_key = key.to_string();
        let Some(row) = self.domains.get(&domain_key) else {
            return Ok(None);
        };
        let mut domain = Domain::new(
            key.clone(),
            parse_role("domain", &row.default_role)?,
            row.display_name.clone(),
        );
        for title in self.titles_for_domain(key)? {
            domain.set_title(title);
        }
        Ok(Some(domain))
    }

    pub fn put_domain(&mut self, domain: &Domain) {
        let domain_key = domain.key.to_string();
        self.titles.retain(|(k, _), _| *k != domain_key);
        for title in domain.titles() {
            self.titles.insert(
                (domain_key.clone(), title.actor.to_string()),
                TitleRow {
                    role: title.role.name().to_string(),
                    name: title.name.clone(),
                },
            );
        }
        self.domains.insert(
            domain_key,
            DomainRow {
                default_role: domain.default_role.name().to_string(),
                display_name: domain.display_name.clone(),
            },
        );
    }

    pub fn remove_domain(&mut self, key: &Key) {
        let domain_key = key.to_string();
        self.domains.remove(&domain_key);
        self.titles.retain(|(k, _), _| *k != domain_key);
        self.reassign_claims(&domain_key, None);
    }

    pub fn rename_domain(&mut self, from: &Key, to: &Key) {
        let (from, to) = (from.to_string(), to.to_string());
        let Some(row) = self.domains.remove(&from) else {
            return;
        };
        self.domains.insert(to.clone(), row);
        let moved: Vec<_> = self
            .titles
            .iter()
            .filter(|((k, _), _)| *k == from)
            .map(|((_, actor), row)| (actor.clone(), row.clone()))
            .collect();
        self.titles.retain(|(k, _), _| *k != from);
        for (actor, row) in moved {
            self.titles.insert((to.clone(), actor), row);
        }
        self.reassign_claims(&from, Some(&to));
    }

    pub fn integrate_domain(&mut self, from: &Key, into: &Key) {
        let (from, into) = (from.to_string(), into.to_string());
        self.reassign_claims(&from, Some(&into));
        self.domains.remove(&from);
        self.titles.retain(|(k, _), _| *k != from);
    }

    pub fn domain_keys(&self) -> Result<Vec<Key>, CorruptRecord> {
        self.domains.keys().map(|k| parse_key("domain", k)).collect()
    }

    pub fn titles_for_domain(&self, key: &Key) -> Result<Vec<Title>, CorruptRecord> {
        let domain_key = key.to_string();
        self.titles
            .iter()
            .filter(|((k, _), _)| *k == domain_key)
            .map(|((k, actor), row)| title_from_row(k, actor, row))
            .collect()
    }

    pub fn titles_for_actor(&self, actor: ActorId) -> Result<Vec<Title>, CorruptRecord> {
        let actor = actor.to_string();
        self.titles
            .iter()
            .filter(|((_, a), _)| *a == actor)
            .map(|((k, a), row)| title_from_row(k, a, row))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Claims
    // -----------------------------------------------------------------------

    pub fn claim_state(&self, tile: TileCoord) -> Result<ClaimState, CorruptRecord> {
        match self.claims.get(&TileRowKey::from(tile)) {
            None => Ok(ClaimState::Unclaimed),
            Some(ClaimRow::Exclusive { domain_key }) => {
                Ok(ClaimState::Exclusive(parse_key("claim", domain_key)?))
            }
            Some(ClaimRow::Partitioned { columns: rows }) => {
                let mut columns = ColumnClaims::new();
                for (&index, domain_key) in rows {
                    // u8 always addresses one of the 256 columns.
                    if let Some(column) = ColumnIndex::from_index(usize::from(index)) {
                        columns.set(column, parse_key("claim", domain_key)?);
                    }
                }
                if columns.is_empty() {
                    return Ok(ClaimState::Unclaimed);
                }
                Ok(ClaimState::Partitioned(columns))
            }
        }
    }

    pub fn put_exclusive(&mut self, tile: TileCoord, owner: &Key) {
        self.claims.insert(
            TileRowKey::from(tile),
            ClaimRow::Exclusive {
                domain_key: owner.to_string(),
            },
        );
    }

    pub fn put_partitioned(&mut self, tile: TileCoord, columns: &ColumnClaims) {
        let rows: BTreeMap<u8, String> = columns
            .occupied()
            .map(|(column, key)| (column.index() as u8, key.to_string()))
            .collect();
        if rows.is_empty() {
            self.claims.remove(&TileRowKey::from(tile));
            return;
        }
        self.claims
            .insert(TileRowKey::from(tile), ClaimRow::Partitioned { columns: rows });
    }

    pub fn remove_claim(&mut self, tile: TileCoord) {
        self.claims.remove(&TileRowKey::from(tile));
    }

    /// Point every claim of `from` at `to`, or drop it when `to` is `None`.
    /// Partitioned tiles left without columns disappear.
    fn reassign_claims(&mut self, from: &str, to: Option<&str>) {
        self.claims.retain(|_, row| match row {
            ClaimRow::Exclusive { domain_key } => {
                if domain_key != from {
                    return true;
                }
                match to {
                    Some(to) => {
                        *domain_key = to.to_string();
                        true
                    }
                    None => false,
                }
            }
            ClaimRow::Partitioned { columns } => {
                match to {
                    Some(to) => columns
                        .values_mut()
                        .filter(|k| k.as_str() == from)
                        .for_each(|k| *k = to.to_string()),
                    None => columns.retain(|_, k| k != from),
                }
                !columns.is_empty()
            }
        });
    }
}
