// ---------------------------------------------------------------------------
// Error types for claims, domains and persistence
// ---------------------------------------------------------------------------

use std::fmt;

use crate::coords::ActorId;
use crate::key::{Key, MalformedKey};

/// Expected, recoverable outcomes of an annexation or release attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimConflict {
    /// The whole tile is already claimed.
    AlreadyExclusive { owner: Key },
    /// The tile holds column claims, so it cannot be claimed as a whole.
    AlreadyPartitioned,
    /// A column was requested in a tile that is claimed as a whole.
    TileFullyClaimed { owner: Key },
    /// The requested column already has an owner.
    ColumnOccupied { owner: Key },
    /// Release of a whole-tile claim on a tile that has none.
    NotExclusive,
    /// Release of a column that has no owner.
    ColumnVacant,
}

impl fmt::Display for ClaimConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClaimConflict::AlreadyExclusive { owner } => {
                write!(f, "tile is already claimed by {owner}")
            }
            ClaimConflict::AlreadyPartitioned => {
                write!(f, "tile cannot be claimed because it has column claims")
            }
            ClaimConflict::TileFullyClaimed { owner } => {
                write!(f, "tile is claimed as a whole by {owner}")
            }
            ClaimConflict::ColumnOccupied { owner } => {
                write!(f, "column is already claimed by {owner}")
            }
            ClaimConflict::NotExclusive => write!(f, "tile is not claimed as a whole"),
            ClaimConflict::ColumnVacant => write!(f, "column is not claimed"),
        }
    }
}

/// The repository could not complete a call; nothing was applied.
#[derive(Debug)]
pub struct PersistenceFailure {
    pub context: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl PersistenceFailure {
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            source: None,
        }
    }

    pub fn with_source(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl fmt::Display for PersistenceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{}: {source}", self.context),
            None => f.write_str(&self.context),
        }
    }
}

impl std::error::Error for PersistenceFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// A stored value failed to parse as a key, role, identifier or claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorruptRecord {
    pub table: &'static str,
    pub detail: String,
}

impl CorruptRecord {
    pub fn new(table: &'static str, detail: impl Into<String>) -> Self {
        Self {
            table,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for CorruptRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "corrupt {} record: {}", self.table, self.detail)
    }
}

impl std::error::Error for CorruptRecord {}

/// Failure of a single repository call.
#[derive(Debug)]
pub enum RepositoryError {
    Persistence(PersistenceFailure),
    Corrupt(CorruptRecord),
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepositoryError::Persistence(e) => write!(f, "persistence failure: {e}"),
            RepositoryError::Corrupt(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for RepositoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RepositoryError::Persistence(e) => Some(e),
            RepositoryError::Corrupt(e) => Some(e),
        }
    }
}

impl From<PersistenceFailure> for RepositoryError {
    fn from(e: PersistenceFailure) -> Self {
        RepositoryError::Persistence(e)
    }
}

impl From<CorruptRecord> for RepositoryError {
    fn from(e: CorruptRecord) -> Self {
        RepositoryError::Corrupt(e)
    }
}

/// Every error the territory core reports to its callers.
#[derive(Debug)]
pub enum DomainsError {
    MalformedKey(MalformedKey),
    Conflict(ClaimConflict),
    Persistence(PersistenceFailure),
    Corrupt(CorruptRecord),
    UnknownDomain(Key),
    DomainExists(Key),
    /// A subdomain was requested whose parent domain does not exist.
    MissingSuperdomain(Key),
    /// The domain still has subdomains.
    HasSubdomains(Key),
    UnknownTitle { domain: Key, actor: ActorId },
}

impl fmt::Display for DomainsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainsError::MalformedKey(e) => e.fmt(f),
            DomainsError::Conflict(c) => write!(f, "claim conflict: {c}"),
            DomainsError::Persistence(e) => write!(f, "persistence failure: {e}"),
            DomainsError::Corrupt(e) => e.fmt(f),
            DomainsError::UnknownDomain(key) => write!(f, "no such domain: {key}"),
            DomainsError::DomainExists(key) => write!(f, "domain already exists: {key}"),
            DomainsError::MissingSuperdomain(key) => {
                write!(f, "superdomain of {key} does not exist")
            }
            DomainsError::HasSubdomains(key) => write!(f, "domain {key} has subdomains"),
            DomainsError::UnknownTitle { domain, actor } => {
                write!(f, "{actor} holds no title in {domain}")
            }
        }
    }
}

impl std::error::Error for DomainsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DomainsError::MalformedKey(e) => Some(e),
            DomainsError::Persistence(e) => Some(e),
            DomainsError::Corrupt(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MalformedKey> for DomainsError {
    fn from(e: MalformedKey) -> Self {
        DomainsError::MalformedKey(e)
    }
}

impl From<ClaimConflict> for DomainsError {
    fn from(c: ClaimConflict) -> Self {
        DomainsError::Conflict(c)
    }
}

impl From<RepositoryError> for DomainsError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::Persistence(p) => DomainsError::Persistence(p),
            RepositoryError::Corrupt(c) => DomainsError::Corrupt(c),
        }
    }
}
