//! Loading a whole DEX image into [`Dex`].

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::{debug, info};
use serde::Serialize;

use crate::dex::class_data::{parse_class, ClassDefItem};
use crate::dex::dex_file::DexFile;
use crate::dex::error::{DexError, DexErrorKind};
use crate::types::{is_class_descriptor, DexClass, DexMethod};

/// Optional integrity checks performed while loading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DexOptions {
    /// Verify the Adler-32 checksum in the header.
    pub verify_checksum: bool,
    /// Verify the SHA-1 signature in the header.
    pub verify_signature: bool,
}

impl DexOptions
{
    /// Both integrity checks enabled.
    pub fn strict() -> Self
    {
        DexOptions { verify_checksum: true, verify_signature: true }
    }
}

/// A fully decoded DEX image: every class with its fields, methods and bytecode.
#[derive(Debug, Clone, Serialize)]
pub struct Dex {
    version: u32,
    classes: BTreeMap<String, DexClass>,
}

impl Dex
{
    pub fn from_bytes(bytes: &[u8]) -> Result<Dex, DexError>
    {
        Dex::from_bytes_with_options(bytes, DexOptions::default())
    }

    pub fn from_bytes_with_options(bytes: &[u8], options: DexOptions) -> Result<Dex, DexError>
    {
        let dex = DexFile::from_bytes(bytes)?;
        if options.verify_checksum {
            dex.verify_checksum()?;
        }
        if options.verify_signature {
            dex.verify_signature()?;
        }

        let mut classes = BTreeMap::new();
        for idx in 0..dex.header.class_defs_size {
            let def = ClassDefItem::read(&mut dex.class_def_cursor(idx)?)?;
            let class = parse_class(&dex, &def).map_err(|e| err!(e, "class_defs[{}]", idx))?;
            debug!(
                "[loader] {} with {} fields, {} methods",
                class.name(),
                class.fields().len(),
                class.methods().len()
            );
            if classes.contains_key(class.name()) {
                fail!("Duplicate class definition for {}", class.name());
            }
            classes.insert(class.name().to_string(), class);
        }

        info!(
            "[loader] loaded dex {:03}: {} classes from {} bytes",
            dex.header.version(),
            classes.len(),
            bytes.len()
        );
        Ok(Dex { version: dex.header.version(), classes })
    }

    pub fn from_file(path: &Path) -> Result<Dex, DexError>
    {
        Dex::from_file_with_options(path, DexOptions::default())
    }

    pub fn from_file_with_options(path: &Path, options: DexOptions) -> Result<Dex, DexError>
    {
        let bytes = fs::read(path).map_err(|e| err!(DexError::from(e), "{}", path.display()))?;
        Dex::from_bytes_with_options(&bytes, options)
    }

    /// The numeric format version, e.g. 35.
    pub fn version(&self) -> u32
    {
        self.version
    }

    /// All classes keyed by internal name (`Lcom/pkg/Foo;`).
    pub fn classes(&self) -> &BTreeMap<String, DexClass>
    {
        &self.classes
    }

    pub fn class(&self, name: &str) -> Result<&DexClass, DexError>
    {
        self.classes.get(name).ok_or_else(|| {
            let e = DexError::new(DexErrorKind::ClassNotFound {
                name: name.to_string(),
                available: self.classes.keys().cloned().collect(),
            });
            if is_class_descriptor(name) {
                e
            } else {
                err!(e, "{:?}, which is not a class descriptor of the form Lpkg/Name;", name)
            }
        })
    }

    /// Looks up `class` then its method keyed `name(shorty)`.
    pub fn method(&self, class: &str, key: &str) -> Result<&DexMethod, DexError>
    {
        self.class(class)?.method(key)
    }
}

/// Decodes a DEX image held in memory.
pub fn load_dex(bytes: &[u8]) -> Result<Dex, DexError>
{
    Dex::from_bytes(bytes)
}
