/* Dex file format structures: header and id tables */

use crate::dex::cursor::DexCursor;
use crate::dex::debug_info::RefResolver;
use crate::dex::error::DexError;
use log::debug;
use once_cell::unsync::OnceCell;
use serde::Serialize;
use sha1::{Digest, Sha1};

/* Constants */
pub const DEX_MAGIC_PREFIX: [u8; 4] = [0x64, 0x65, 0x78, 0x0a];
pub const SUPPORTED_VERSIONS: [u32; 6] = [35, 37, 38, 39, 40, 41];
pub const HEADER_SIZE: usize = 0x70;
pub const ENDIAN_CONSTANT: u32 = 0x12345678;
pub const REVERSE_ENDIAN_CONSTANT: u32 = 0x78563412;
pub const NO_INDEX: u32 = 0xffffffff;

const STRING_ID_ITEM_SIZE: usize = 4;
const TYPE_ID_ITEM_SIZE: usize = 4;
const PROTO_ID_ITEM_SIZE: usize = 12;
const FIELD_ID_ITEM_SIZE: usize = 8;
const METHOD_ID_ITEM_SIZE: usize = 8;
pub(crate) const CLASS_DEF_ITEM_SIZE: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub magic: [u8; 8],
    pub checksum: u32,
    pub signature: [u8; 20],
    pub file_size: u32,
    pub header_size: u32,
    pub endian_tag: u32,
    pub link_size: u32,
    pub link_off: u32,
    pub map_off: u32,
    pub string_ids_size: u32,
    pub string_ids_off: u32,
    pub type_ids_size: u32,
    pub type_ids_off: u32,
    pub proto_ids_size: u32,
    pub proto_ids_off: u32,
    pub field_ids_size: u32,
    pub field_ids_off: u32,
    pub method_ids_size: u32,
    pub method_ids_off: u32,
    pub class_defs_size: u32,
    pub class_defs_off: u32,
    pub data_size: u32,
    pub data_off: u32,
}

impl Header
{
    pub fn read(cursor: &mut DexCursor) -> Result<Header, DexError>
    {
        if cursor.remaining() < HEADER_SIZE {
            fail!("Not enough bytes for header: {} < {}", cursor.remaining(), HEADER_SIZE);
        }

        let mut magic = [0u8; 8];
        magic.copy_from_slice(cursor.read_x(8)?);
        if magic[..4] != DEX_MAGIC_PREFIX || magic[7] != 0 {
            fail!("Invalid magic value {:02x?}", magic);
        }
        let version = Header::parse_version(&magic)
            .ok_or_else(|| err!("Invalid version string {:02x?}", &magic[4..7]))?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            fail!("Unsupported dex version {:03}", version);
        }

        let checksum = cursor.read_u4()?;
        let mut signature = [0u8; 20];
        signature.copy_from_slice(cursor.read_x(20)?);

        Ok(Header {
            magic,
            checksum,
            signature,
            file_size: cursor.read_u4()?,
            header_size: cursor.read_u4()?,
            endian_tag: cursor.read_u4()?,
            link_size: cursor.read_u4()?,
            link_off: cursor.read_u4()?,
            map_off: cursor.read_u4()?,
            string_ids_size: cursor.read_u4()?,
            string_ids_off: cursor.read_u4()?,
            type_ids_size: cursor.read_u4()?,
            type_ids_off: cursor.read_u4()?,
            proto_ids_size: cursor.read_u4()?,
            proto_ids_off: cursor.read_u4()?,
            field_ids_size: cursor.read_u4()?,
            field_ids_off: cursor.read_u4()?,
            method_ids_size: cursor.read_u4()?,
            method_ids_off: cursor.read_u4()?,
            class_defs_size: cursor.read_u4()?,
            class_defs_off: cursor.read_u4()?,
            data_size: cursor.read_u4()?,
            data_off: cursor.read_u4()?,
        })
    }

    fn parse_version(magic: &[u8; 8]) -> Option<u32>
    {
        let digits = &magic[4..7];
        if !digits.iter().all(u8::is_ascii_digit) {
            return None;
        }
        Some(digits.iter().fold(0, |acc, d| acc * 10 + (d - b'0') as u32))
    }

    /// The numeric DEX version from the magic, e.g. 35, 37, 38, 39.
    pub fn version(&self) -> u32
    {
        Header::parse_version(&self.magic).unwrap_or(0)
    }

    /// Checks endianness, file size and that every id table fits in the file.
    fn validate(&self, buffer_len: usize) -> Result<(), DexError>
    {
        if self.endian_tag == REVERSE_ENDIAN_CONSTANT {
            fail!("Big-endian dex files are not supported");
        }
        if self.endian_tag != ENDIAN_CONSTANT {
            fail!("Invalid endian tag 0x{:08x}", self.endian_tag);
        }
        if (self.file_size as usize) > buffer_len {
            fail!("Header file_size {} exceeds buffer length {}", self.file_size, buffer_len);
        }
        if (self.file_size as usize) < HEADER_SIZE {
            fail!("Header file_size {} is smaller than the header itself", self.file_size);
        }
        if (self.header_size as usize) < HEADER_SIZE {
            fail!("Header size 0x{:x} is smaller than 0x{:x}", self.header_size, HEADER_SIZE);
        }

        let file_size = self.file_size as usize;

        let tables = [
            ("string_ids", self.string_ids_off, self.string_ids_size, STRING_ID_ITEM_SIZE),
            ("type_ids", self.type_ids_off, self.type_ids_size, TYPE_ID_ITEM_SIZE),
            ("proto_ids", self.proto_ids_off, self.proto_ids_size, PROTO_ID_ITEM_SIZE),
            ("field_ids", self.field_ids_off, self.field_ids_size, FIELD_ID_ITEM_SIZE),
            ("method_ids", self.method_ids_off, self.method_ids_size, METHOD_ID_ITEM_SIZE),
            ("class_defs", self.class_defs_off, self.class_defs_size, CLASS_DEF_ITEM_SIZE),
        ];
        for (name, off, size, item_size) in tables {
            if size == 0 {
                continue;
            }
            let end = (size as usize)
                .checked_mul(item_size)
                .and_then(|len| len.checked_add(off as usize));
            match end {
                Some(end) if (off as usize) >= HEADER_SIZE && end <= file_size => {}
                _ => fail!(
                    "{} table (offset 0x{:x}, {} items) does not fit in a file of {} bytes",
                    name, off, size, file_size
                ),
            }
        }
        Ok(())
    }
}

/// The proto_id_item struct
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrototypeItem {
    pub shorty_idx: u32,
    pub return_type_idx: u32,
    pub parameters_off: u32,
}

impl PrototypeItem
{
    pub fn read(cursor: &mut DexCursor) -> Result<PrototypeItem, DexError>
    {
        Ok(PrototypeItem {
            shorty_idx: cursor.read_u4()?,
            return_type_idx: cursor.read_u4()?,
            parameters_off: cursor.read_u4()?,
        })
    }
}

/// The field_id_item struct
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldItem {
    pub class_idx: u16,
    pub type_idx: u16,
    pub name_idx: u32,
}

impl FieldItem
{
    pub fn read(cursor: &mut DexCursor) -> Result<FieldItem, DexError>
    {
        Ok(FieldItem {
            class_idx: cursor.read_u2()?,
            type_idx: cursor.read_u2()?,
            name_idx: cursor.read_u4()?,
        })
    }
}

/// The method_id_item struct
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodItem {
    pub class_idx: u16,
    pub proto_idx: u16,
    pub name_idx: u32,
}

impl MethodItem
{
    pub fn read(cursor: &mut DexCursor) -> Result<MethodItem, DexError>
    {
        Ok(MethodItem {
            class_idx: cursor.read_u2()?,
            proto_idx: cursor.read_u2()?,
            name_idx: cursor.read_u4()?,
        })
    }
}

/// A proto_id with all of its components resolved to strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proto {
    pub shorty: String,
    pub return_type: String,
    pub parameters: Vec<String>,
}

impl Proto
{
    /// The JNI style descriptor, e.g. `(ILjava/lang/String;)V`.
    pub fn descriptor(&self) -> String
    {
        let mut s = String::from("(");
        for p in &self.parameters { s.push_str(p); }
        s.push(')');
        s.push_str(&self.return_type);
        s
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldId {
    pub class: String,
    pub type_desc: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodId {
    pub class: String,
    pub name: String,
    pub proto: Proto,
}

/// Random access view over the id tables of one DEX image.
///
/// Lookups are computed on demand from the borrowed buffer; strings are cached
/// per index once decoded, so indices may be visited in any order.
#[derive(Debug)]
pub struct DexFile<'a> {
    bytes: &'a [u8],
    pub header: Header,
    strings: Vec<OnceCell<String>>,
}

impl<'a> DexFile<'a>
{
    pub fn from_bytes(bytes: &'a [u8]) -> Result<DexFile<'a>, DexError>
    {
        let mut cursor = DexCursor::new(bytes);
        let header = Header::read(&mut cursor)?;
        header.validate(bytes.len())?;

        debug!(
            "[header] dex {:03}: {} strings, {} types, {} protos, {} fields, {} methods, {} classes",
            header.version(),
            header.string_ids_size,
            header.type_ids_size,
            header.proto_ids_size,
            header.field_ids_size,
            header.method_ids_size,
            header.class_defs_size
        );

        let strings = (0..header.string_ids_size).map(|_| OnceCell::new()).collect();
        Ok(DexFile { bytes, header, strings })
    }

    pub fn bytes(&self) -> &'a [u8]
    {
        self.bytes
    }

    fn item_cursor(
        &self,
        table: &str,
        idx: u32,
        size: u32,
        off: u32,
        item_size: usize,
    ) -> Result<DexCursor<'a>, DexError>
    {
        if idx >= size {
            fail!("{} index {} out of range (table has {} entries)", table, idx, size);
        }
        DexCursor::at(self.bytes, off as usize + idx as usize * item_size)
    }

    /// `string_ids[idx]` -> `string_data_off` -> decoded string.
    pub fn string_at(&self, idx: u32) -> Result<&str, DexError>
    {
        let cell = self.strings.get(idx as usize).ok_or_else(|| {
            err!("string index {} out of range (table has {} entries)", idx, self.strings.len())
        })?;
        let s = cell.get_or_try_init(|| {
            let mut cursor = self.item_cursor(
                "string_ids",
                idx,
                self.header.string_ids_size,
                self.header.string_ids_off,
                STRING_ID_ITEM_SIZE,
            )?;
            let data_off = cursor.read_u4()? as usize;
            let mut data = DexCursor::at(self.bytes, data_off)?;
            data.read_string_data().map_err(|e| err!(e, "string_ids[{}]", idx))
        })?;
        Ok(s.as_str())
    }

    /// `type_ids[idx]` -> descriptor string, e.g. `Ljava/lang/Object;`.
    pub fn type_at(&self, idx: u32) -> Result<&str, DexError>
    {
        let mut cursor = self.item_cursor(
            "type_ids",
            idx,
            self.header.type_ids_size,
            self.header.type_ids_off,
            TYPE_ID_ITEM_SIZE,
        )?;
        let descriptor_idx = cursor.read_u4()?;
        self.string_at(descriptor_idx).map_err(|e| err!(e, "type_ids[{}]", idx))
    }

    pub fn proto_item_at(&self, idx: u32) -> Result<PrototypeItem, DexError>
    {
        let mut cursor = self.item_cursor(
            "proto_ids",
            idx,
            self.header.proto_ids_size,
            self.header.proto_ids_off,
            PROTO_ID_ITEM_SIZE,
        )?;
        PrototypeItem::read(&mut cursor)
    }

    pub fn proto_at(&self, idx: u32) -> Result<Proto, DexError>
    {
        let item = self.proto_item_at(idx)?;
        let resolve = || -> Result<Proto, DexError> {
            let parameters = if item.parameters_off == 0 {
                vec![]
            } else {
                self.type_list_at(item.parameters_off)?
            };
            Ok(Proto {
                shorty: self.string_at(item.shorty_idx)?.to_string(),
                return_type: self.type_at(item.return_type_idx)?.to_string(),
                parameters,
            })
        };
        resolve().map_err(|e| err!(e, "proto_ids[{}]", idx))
    }

    /// Reads a `type_list` (u4 size followed by u2 type indices).
    pub fn type_list_at(&self, offset: u32) -> Result<Vec<String>, DexError>
    {
        let mut cursor = DexCursor::at(self.bytes, offset as usize)?;
        let size = cursor.read_u4()?;
        if (size as usize).saturating_mul(2) > cursor.remaining() {
            return Err(DexError::out_of_bounds(cursor.position(), size as usize * 2, self.bytes.len()));
        }
        let mut types = Vec::with_capacity(size as usize);
        for _ in 0..size {
            types.push(self.type_at(cursor.read_u2()? as u32)?.to_string());
        }
        Ok(types)
    }

    pub fn field_item_at(&self, idx: u32) -> Result<FieldItem, DexError>
    {
        let mut cursor = self.item_cursor(
            "field_ids",
            idx,
            self.header.field_ids_size,
            self.header.field_ids_off,
            FIELD_ID_ITEM_SIZE,
        )?;
        FieldItem::read(&mut cursor)
    }

    pub fn field_id_at(&self, idx: u32) -> Result<FieldId, DexError>
    {
        let item = self.field_item_at(idx)?;
        let resolve = || -> Result<FieldId, DexError> {
            Ok(FieldId {
                class: self.type_at(item.class_idx as u32)?.to_string(),
                type_desc: self.type_at(item.type_idx as u32)?.to_string(),
                name: self.string_at(item.name_idx)?.to_string(),
            })
        };
        resolve().map_err(|e| err!(e, "field_ids[{}]", idx))
    }

    pub fn method_item_at(&self, idx: u32) -> Result<MethodItem, DexError>
    {
        let mut cursor = self.item_cursor(
            "method_ids",
            idx,
            self.header.method_ids_size,
            self.header.method_ids_off,
            METHOD_ID_ITEM_SIZE,
        )?;
        MethodItem::read(&mut cursor)
    }

    pub fn method_id_at(&self, idx: u32) -> Result<MethodId, DexError>
    {
        let item = self.method_item_at(idx)?;
        let resolve = || -> Result<MethodId, DexError> {
            Ok(MethodId {
                class: self.type_at(item.class_idx as u32)?.to_string(),
                name: self.string_at(item.name_idx)?.to_string(),
                proto: self.proto_at(item.proto_idx as u32)?,
            })
        };
        resolve().map_err(|e| err!(e, "method_ids[{}]", idx))
    }

    /// Cursor at `class_defs[idx]`.
    pub(crate) fn class_def_cursor(&self, idx: u32) -> Result<DexCursor<'a>, DexError>
    {
        self.item_cursor(
            "class_defs",
            idx,
            self.header.class_defs_size,
            self.header.class_defs_off,
            CLASS_DEF_ITEM_SIZE,
        )
    }

    /// Adler-32 over everything after the checksum field.
    pub fn compute_checksum(&self) -> u32
    {
        adler::adler32_slice(&self.bytes[12..self.header.file_size as usize])
    }

    pub fn verify_checksum(&self) -> Result<(), DexError>
    {
        let computed = self.compute_checksum();
        if computed != self.header.checksum {
            fail!("Checksum mismatch: header 0x{:08x}, computed 0x{:08x}", self.header.checksum, computed);
        }
        Ok(())
    }

    /// SHA-1 over everything after the signature field.
    pub fn compute_signature(&self) -> [u8; 20]
    {
        let mut hasher = Sha1::new();
        hasher.update(&self.bytes[32..self.header.file_size as usize]);
        let digest = hasher.finalize();
        let mut out = [0u8; 20];
        out.copy_from_slice(&digest);
        out
    }

    pub fn verify_signature(&self) -> Result<(), DexError>
    {
        if self.compute_signature() != self.header.signature {
            fail!("SHA-1 signature mismatch");
        }
        Ok(())
    }
}

impl RefResolver for DexFile<'_>
{
    fn string(&self, idx: u32) -> Result<String, DexError>
    {
        self.string_at(idx).map(str::to_string)
    }

    fn type_desc(&self, idx: u32) -> Result<String, DexError>
    {
        self.type_at(idx).map(str::to_string)
    }
}
