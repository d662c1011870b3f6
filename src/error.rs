use thiserror::Error;

/// Structural problems in a schematic document.
///
/// Any of these aborts the whole parse; a failed read never yields a
/// partially populated [`Schematic`](crate::Schematic).
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("invalid schematic: no {0}")]
    MissingField(&'static str),
    #[error("invalid schematic: {field} is not a {expected}")]
    MistypedField {
        field: &'static str,
        expected: &'static str,
    },
    #[error("invalid schematic: Materials must be \"Alpha\", found {0:?}")]
    UnsupportedMaterials(String),
    #[error("invalid schematic: {field} holds {actual} entries, expected {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("invalid schematic: PaletteMax is {declared} but Palette holds {actual} entries")]
    PaletteSizeMismatch { declared: i32, actual: usize },
    #[error("invalid schematic: palette index {0} is out of range")]
    PaletteIndexOutOfRange(u32),
    #[error("invalid schematic: BlockData varint exceeds 5 bytes")]
    VarintTooLong,
    #[error("invalid schematic: BlockData ends in the middle of a varint")]
    TruncatedVarint,
    #[error("invalid schematic: BlockData decodes to {actual} blocks, expected {expected}")]
    BlockCountMismatch { expected: u64, actual: u64 },
    #[error("unrecognized schematic format")]
    UnrecognizedFormat,
}

/// The bundled legacy block dataset failed to load.
///
/// Kept separate from [`FormatError`] so a broken resource is reported as an
/// initialization failure instead of being blamed on the input file.
#[derive(Debug, Clone, Error)]
#[error("failed to load the legacy block table: {0}")]
pub struct LegacyTableError(pub(crate) String);

/// A hosting-world capability (chunk loading, block access) failed.
#[derive(Debug, Error)]
#[error("world access failed: {0}")]
pub struct WorldError(pub String);

/// Top-level error type for schematic decoding and placement.
#[derive(Debug, Error)]
pub enum SchematicError {
    #[error(transparent)]
    Format(#[from] FormatError),
    /// The schematic holds no grid yet (just constructed or reset).
    #[error("schematic is locked")]
    Locked,
    #[error(
        "schematic would exceed world bounds: region y {lower_y}..={upper_y}, world y {min_y}..={max_y}"
    )]
    Placement {
        lower_y: i32,
        upper_y: i32,
        min_y: i32,
        max_y: i32,
    },
    #[error("block coordinate ({x}, {y}, {z}) is outside the schematic")]
    OutOfBounds { x: u16, y: u16, z: u16 },
    #[error("region of {width}x{height}x{length} exceeds the maximum schematic size")]
    RegionTooLarge {
        width: i32,
        height: i32,
        length: i32,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("failed to decode NBT: {0}")]
    Nbt(#[from] quartz_nbt::io::NbtIoError),
    #[error(transparent)]
    LegacyTable(#[from] LegacyTableError),
    #[error(transparent)]
    World(#[from] WorldError),
}
