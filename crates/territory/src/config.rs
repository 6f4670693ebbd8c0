/// Width of a tile in block columns, along both x and z.
pub const TILE_SIZE: i32 = 16;
/// Number of unit columns in one tile (16 x 16).
pub const COLUMNS_PER_TILE: usize = (TILE_SIZE * TILE_SIZE) as usize;
/// Separator between the path segments of a domain key.
pub const KEY_SEPARATOR: char = ':';
