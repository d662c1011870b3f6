//! Schematic format readers and format dispatch.
//!
//! Two layouts are understood: the palette-based Sponge format (`.schem`)
//! and the legacy MCEdit format (`.schematic`). Both arrive as a
//! gzip-compressed NBT tag tree.

pub mod mcedit;
pub mod sponge;

use std::fmt;
use std::io::BufReader;
use std::path::Path;

use flate2::read::GzDecoder;
use quartz_nbt::io::Flavor;
use quartz_nbt::{NbtCompound, NbtTag};

use crate::error::{FormatError, SchematicError};
use crate::schematic::Schematic;
use crate::world::BlockRegistry;

/// The closed set of supported formats, in detection priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchematicFormat {
    /// Palette-based Sponge format.
    Sponge,
    /// Legacy block-id/data MCEdit format.
    McEdit,
}

impl fmt::Display for SchematicFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchematicFormat::Sponge => write!(f, "sponge"),
            SchematicFormat::McEdit => write!(f, "mcedit"),
        }
    }
}

/// Picks the format a tag tree is in.
///
/// Sponge is tried first: a palette document need not contain the `Blocks`
/// key the MCEdit probe looks for, but the reverse can collide.
pub fn detect(root: &NbtCompound) -> Option<SchematicFormat> {
    if sponge::is_readable(root) {
        Some(SchematicFormat::Sponge)
    } else if mcedit::is_readable(root) {
        Some(SchematicFormat::McEdit)
    } else {
        None
    }
}

/// Decodes a schematic from an already parsed tag tree.
pub fn from_nbt<R: BlockRegistry>(
    root: &NbtCompound,
    registry: &R,
) -> Result<Schematic, SchematicError> {
    match detect(root) {
        Some(SchematicFormat::Sponge) => sponge::read(root, registry),
        Some(SchematicFormat::McEdit) => mcedit::read(root),
        None => Err(FormatError::UnrecognizedFormat.into()),
    }
}

/// Decodes a schematic from gzip-compressed NBT bytes.
pub fn from_bytes<R: BlockRegistry>(data: &[u8], registry: &R) -> Result<Schematic, SchematicError> {
    // Stream-decompress directly into the NBT parser.
    let reader = BufReader::with_capacity(1 << 20, data);
    let mut gz = GzDecoder::new(reader);
    let (root, _) = quartz_nbt::io::read_nbt(&mut gz, Flavor::Uncompressed)?;
    from_nbt(&root, registry)
}

/// Reads and decodes a schematic file.
pub fn from_path<P: AsRef<Path>, R: BlockRegistry>(
    path: P,
    registry: &R,
) -> Result<Schematic, SchematicError> {
    let data = std::fs::read(path)?;
    from_bytes(&data, registry)
}

// Field accessors shared by the readers. Each failure names the offending
// field, and a present-but-wrongly-typed field is reported distinctly from
// a missing one.

fn field_error(root: &NbtCompound, field: &'static str, expected: &'static str) -> FormatError {
    if root.contains_key(field) {
        FormatError::MistypedField { field, expected }
    } else {
        FormatError::MissingField(field)
    }
}

pub(crate) fn short_field(root: &NbtCompound, field: &'static str) -> Result<i16, FormatError> {
    root.get::<_, i16>(field)
        .map_err(|_| field_error(root, field, "short"))
}

pub(crate) fn int_field(root: &NbtCompound, field: &'static str) -> Result<i32, FormatError> {
    root.get::<_, i32>(field)
        .map_err(|_| field_error(root, field, "int"))
}

pub(crate) fn string_field<'a>(
    root: &'a NbtCompound,
    field: &'static str,
) -> Result<&'a str, FormatError> {
    root.get::<_, &str>(field)
        .map_err(|_| field_error(root, field, "string"))
}

pub(crate) fn compound_field<'a>(
    root: &'a NbtCompound,
    field: &'static str,
) -> Result<&'a NbtCompound, FormatError> {
    root.get::<_, &NbtCompound>(field)
        .map_err(|_| field_error(root, field, "compound"))
}

pub(crate) fn byte_array_field<'a>(
    root: &'a NbtCompound,
    field: &'static str,
) -> Result<&'a [i8], FormatError> {
    match root.inner().get(field) {
        Some(NbtTag::ByteArray(bytes)) => Ok(bytes.as_slice()),
        Some(_) => Err(FormatError::MistypedField {
            field,
            expected: "byte array",
        }),
        None => Err(FormatError::MissingField(field)),
    }
}
