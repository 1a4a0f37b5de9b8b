use std::fmt;
use std::io;

/// Builds a [`DexError`] of kind [`DexErrorKind::InvalidFormat`], optionally wrapping
/// an inner error with an extra context line.
macro_rules! err {
    ($msg:literal) => {
        DexError::invalid_format($msg)
    };
    ($fmtstr:literal, $($args:tt)*) => {
        DexError::invalid_format(format!($fmtstr, $($args)*))
    };
    ($base:expr, $msg:literal) => {
        DexError::with_context($base, $msg.to_string())
    };
    ($base:expr, $fmtstr:literal, $($args:tt)*) => {
        DexError::with_context($base, format!($fmtstr, $($args)*))
    };
}

/// Returns early with an [`DexErrorKind::InvalidFormat`] error.
#[macro_export]
macro_rules! fail {
    ($msg:literal) => {
        return Err($crate::dex::error::DexError::invalid_format($msg))
    };
    ($fmtstr:literal, $($args:tt)*) => {
        return Err($crate::dex::error::DexError::invalid_format(format!($fmtstr, $($args)*)))
    };
}

/// The primary cause of a [`DexError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DexErrorKind
{
    /// Bad magic, unsupported version or structurally inconsistent tables.
    InvalidFormat(String),
    /// A read of `needed` bytes at `offset` would run past the end of a `len` byte buffer.
    OutOfBounds { offset: usize, needed: usize, len: usize },
    /// A byte in an instruction stream that does not map to any opcode.
    UnknownOpcode { offset: usize, value: u8 },
    /// Unknown debug opcode or premature end of a debug_info_item.
    MalformedDebugInfo(String),
    /// A class lookup failed; `available` lists every class name that does exist.
    ClassNotFound { name: String, available: Vec<String> },
    /// A method lookup failed; `available` lists every method key of the class.
    MethodNotFound { class: String, key: String, available: Vec<String> },
    /// A field lookup failed; `available` lists every field name of the class.
    FieldNotFound { class: String, name: String, available: Vec<String> },
    /// The file could not be read.
    Io(String),
}

impl fmt::Display for DexErrorKind
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self
        {
            DexErrorKind::InvalidFormat(msg) => write!(f, "invalid dex format: {}", msg),
            DexErrorKind::OutOfBounds { offset, needed, len } => write!(
                f,
                "out of bounds read of {} byte(s) at offset 0x{:x} (buffer is 0x{:x} bytes)",
                needed, offset, len
            ),
            DexErrorKind::UnknownOpcode { offset, value } => {
                write!(f, "unknown opcode 0x{:02x} at byte offset {}", value, offset)
            }
            DexErrorKind::MalformedDebugInfo(msg) => write!(f, "malformed debug info: {}", msg),
            DexErrorKind::ClassNotFound { name, available } => write!(
                f,
                "class {} not found; available classes: [{}]",
                name,
                available.join(", ")
            ),
            DexErrorKind::MethodNotFound { class, key, available } => write!(
                f,
                "method {} not found in {}; available methods: [{}]",
                key,
                class,
                available.join(", ")
            ),
            DexErrorKind::FieldNotFound { class, name, available } => write!(
                f,
                "field {} not found in {}; available fields: [{}]",
                name,
                class,
                available.join(", ")
            ),
            DexErrorKind::Io(msg) => write!(f, "io error: {}", msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DexError
{
    kind: DexErrorKind,
    contexts: Vec<String>,
}

impl DexError
{
    pub fn new(kind: DexErrorKind) -> Self
    {
        DexError {
            kind,
            contexts: Vec::new(),
        }
    }

    pub(crate) fn invalid_format(msg: impl Into<String>) -> Self
    {
        DexError::new(DexErrorKind::InvalidFormat(msg.into()))
    }

    pub(crate) fn out_of_bounds(offset: usize, needed: usize, len: usize) -> Self
    {
        DexError::new(DexErrorKind::OutOfBounds { offset, needed, len })
    }

    pub(crate) fn malformed_debug_info(msg: impl Into<String>) -> Self
    {
        DexError::new(DexErrorKind::MalformedDebugInfo(msg.into()))
    }

    pub(crate) fn with_context(base: DexError, context: String) -> Self
    {
        let mut contexts = base.contexts;
        contexts.push(context);
        DexError { kind: base.kind, contexts }
    }

    pub fn kind(&self) -> &DexErrorKind
    {
        &self.kind
    }

    /// Context lines, innermost first.
    pub fn contexts(&self) -> &[String]
    {
        &self.contexts
    }

    /// True for the lookup failures raised by the `class`/`method`/`field` accessors.
    pub fn is_not_found(&self) -> bool
    {
        matches!(
            self.kind,
            DexErrorKind::ClassNotFound { .. }
                | DexErrorKind::MethodNotFound { .. }
                | DexErrorKind::FieldNotFound { .. }
        )
    }
}

impl fmt::Display for DexError
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}", self.kind)?;
        let mut connector = " for ";
        for context in &self.contexts
        {
            write!(f, "{}{}", connector, context)?;
            connector = " of ";
        }
        Ok(())
    }
}

impl std::error::Error for DexError {}

impl From<io::Error> for DexError
{
    fn from(value: io::Error) -> Self
    {
        DexError::new(DexErrorKind::Io(value.to_string()))
    }
}
