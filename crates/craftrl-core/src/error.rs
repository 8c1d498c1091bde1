//! Error types for the fallible edges of the core: definition loading,
//! save files and crafting.

use thiserror::Error;

/// Errors raised while building the definitions table
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("failed to parse definitions: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{kind} definition ident {ident} is negative")]
    NegativeIdent { kind: &'static str, ident: i32 },
    #[error("duplicate {kind} definition ident {ident}")]
    DuplicateIdent { kind: &'static str, ident: i32 },
}

/// Errors that can occur during save/load
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("save file ended early while reading {section}")]
    Truncated { section: &'static str },
    #[error("bad magic number: expected {expected:#010x}, found {found:#010x}")]
    BadMagic { expected: u32, found: u32 },
    #[error(
        "incompatible save version: expected {}.{}, found {}.{}",
        .expected >> 16, .expected & 0xFFFF, .found >> 16, .found & 0xFFFF
    )]
    VersionMismatch { expected: u32, found: u32 },
    #[error("expected start of {section} data: tag {expected:#010x}, found {found:#010x}")]
    SectionMismatch {
        section: &'static str,
        expected: u32,
        found: u32,
    },
    #[error("invalid map dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("unknown {kind} definition {ident}")]
    UnknownDefinition { kind: &'static str, ident: i32 },
    #[error("{kind} at ({x},{y}) overlaps another {kind}")]
    Occupied { kind: &'static str, x: i32, y: i32 },
    #[error("{kind} at ({x},{y}) is outside the map")]
    OffMap { kind: &'static str, x: i32, y: i32 },
    #[error("log message is not valid UTF-8")]
    InvalidString,
    #[error("room has {0} points, more than a save file can hold")]
    RoomTooLarge(usize),
    #[error("{what} count {count} does not fit in a save file")]
    CountOverflow { what: &'static str, count: usize },
}

/// Why a recipe could not be crafted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CraftError {
    #[error("unknown recipe {0}")]
    UnknownRecipe(i32),
    #[error("unknown item {0}")]
    UnknownItem(i32),
    #[error("unknown actor")]
    UnknownActor,
    #[error("need {needed} of item {ident}, have {available}")]
    MissingParts {
        ident: i32,
        needed: i32,
        available: i32,
    },
}
