use crate::config::COLUMNS_PER_TILE;
use crate::coords::ColumnIndex;
use crate::key::Key;

/// Owners of the 256 columns of a partitioned tile, indexed by
/// [`ColumnIndex`]. `None` marks an unclaimed column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnClaims {
    columns: Vec<Option<Key>>,
}

impl Default for ColumnClaims {
    fn default() -> Self {
        Self {
            columns: vec![None; COLUMNS_PER_TILE],
        }
    }
}

impl ColumnClaims {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, column: ColumnIndex) -> Option<&Key> {
        self.columns[column.index()].as_ref()
    }

    /// Set the owner of a column, returning the previous owner.
    pub fn set(&mut self, column: ColumnIndex, owner: Key) -> Option<Key> {
        self.columns[column.index()].replace(owner)
    }

    pub fn clear(&mut self, column: ColumnIndex) -> Option<Key> {
        self.columns[column.index()].take()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.iter().all(Option::is_none)
    }

    pub fn occupied(&self) -> impl Iterator<Item = (ColumnIndex, &Key)> {
        ColumnIndex::all().filter_map(|c| self.get(c).map(|k| (c, k)))
    }

    pub fn occupied_count(&self) -> usize {
        self.columns.iter().filter(|c| c.is_some()).count()
    }
}

/// Discriminant of [`ClaimState`], as stored by repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClaimKind {
    Unclaimed,
    Exclusive,
    Partitioned,
}

/// How a tile is claimed. Exactly one state holds at any time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ClaimState {
    #[default]
    Unclaimed,
    /// The whole tile belongs to one domain.
    Exclusive(Key),
    /// Each column is claimed separately. Never empty: releasing the last
    /// column returns the tile to `Unclaimed`.
    Partitioned(ColumnClaims),
}

impl ClaimState {
    pub fn kind(&self) -> ClaimKind {
        match self {
            ClaimState::Unclaimed => ClaimKind::Unclaimed,
            ClaimState::Exclusive(_) => ClaimKind::Exclusive,
            ClaimState::Partitioned(_) => ClaimKind::Partitioned,
        }
    }

    pub fn is_unclaimed(&self) -> bool {
        matches!(self, ClaimState::Unclaimed)
    }

    /// Owner of one column of the tile.
    pub fn owner(&self, column: ColumnIndex) -> Option<&Key> {
        match self {
            ClaimState::Unclaimed => None,
            ClaimState::Exclusive(owner) => Some(owner),
            ClaimState::Partitioned(columns) => columns.get(column),
        }
    }

    /// Whether any column of the tile belongs to `key`.
    pub fn involves(&self, key: &Key) -> bool {
        match self {
            ClaimState::Unclaimed => false,
            ClaimState::Exclusive(owner) => owner == key,
            ClaimState::Partitioned(columns) => columns.occupied().any(|(_, k)| k == key),
        }
    }
}
