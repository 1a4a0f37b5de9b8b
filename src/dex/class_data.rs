/* class_def_item and class_data_item, resolved into DexClass values */

use std::collections::BTreeMap;

use crate::dex::code_item::CodeItem;
use crate::dex::cursor::DexCursor;
use crate::dex::debug_info::DexMethodDebugInfo;
use crate::dex::dex_file::{DexFile, NO_INDEX};
use crate::dex::error::DexError;
use crate::dex::instructions::DexBytecode;
use crate::types::{method_key, AccessFlags, DexClass, DexField, DexMethod};
use log::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDefItem {
    pub class_idx: u32,
    pub access_flags: u32,
    pub superclass_idx: u32,
    pub interfaces_off: u32,
    pub source_file_idx: u32,
    pub annotations_off: u32,
    pub class_data_off: u32,
    pub static_values_off: u32,
}

impl ClassDefItem
{
    pub fn read(cursor: &mut DexCursor) -> Result<ClassDefItem, DexError>
    {
        Ok(ClassDefItem {
            class_idx: cursor.read_u4()?,
            access_flags: cursor.read_u4()?,
            superclass_idx: cursor.read_u4()?,
            interfaces_off: cursor.read_u4()?,
            source_file_idx: cursor.read_u4()?,
            annotations_off: cursor.read_u4()?,
            class_data_off: cursor.read_u4()?,
            static_values_off: cursor.read_u4()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedField {
    pub field_idx: u32,
    pub access_flags: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedMethod {
    pub method_idx: u32,
    pub access_flags: u32,
    pub code_off: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassDataItem {
    pub static_fields: Vec<EncodedField>,
    pub instance_fields: Vec<EncodedField>,
    pub direct_methods: Vec<EncodedMethod>,
    pub virtual_methods: Vec<EncodedMethod>,
}

// Each entry stores its index as a difference from the previous one in the same list
fn accumulate(last: &mut u32, diff: u32) -> Result<u32, DexError>
{
    *last = last
        .checked_add(diff)
        .ok_or_else(|| err!("index delta {} overflows from {}", diff, *last))?;
    Ok(*last)
}

fn read_fields(cursor: &mut DexCursor, size: u32) -> Result<Vec<EncodedField>, DexError>
{
    let mut last = 0;
    let mut fields = Vec::with_capacity(size as usize);
    for _ in 0..size {
        let field_idx = accumulate(&mut last, cursor.read_uleb128()?)?;
        let access_flags = cursor.read_uleb128()?;
        fields.push(EncodedField { field_idx, access_flags });
    }
    Ok(fields)
}

fn read_methods(cursor: &mut DexCursor, size: u32) -> Result<Vec<EncodedMethod>, DexError>
{
    let mut last = 0;
    let mut methods = Vec::with_capacity(size as usize);
    for _ in 0..size {
        let method_idx = accumulate(&mut last, cursor.read_uleb128()?)?;
        let access_flags = cursor.read_uleb128()?;
        let code_off = cursor.read_uleb128()?;
        methods.push(EncodedMethod { method_idx, access_flags, code_off });
    }
    Ok(methods)
}

impl ClassDataItem
{
    pub fn read(cursor: &mut DexCursor) -> Result<ClassDataItem, DexError>
    {
        let static_fields_size = cursor.read_uleb128()?;
        let instance_fields_size = cursor.read_uleb128()?;
        let direct_methods_size = cursor.read_uleb128()?;
        let virtual_methods_size = cursor.read_uleb128()?;

        // every field entry takes at least 2 bytes and every method entry 3
        let minimum = 2 * (static_fields_size as u64 + instance_fields_size as u64)
            + 3 * (direct_methods_size as u64 + virtual_methods_size as u64);
        if minimum > cursor.remaining() as u64 {
            fail!(
                "class_data_item lists {} fields and {} methods but only {} bytes remain",
                static_fields_size as u64 + instance_fields_size as u64,
                direct_methods_size as u64 + virtual_methods_size as u64,
                cursor.remaining()
            );
        }

        Ok(ClassDataItem {
            static_fields: read_fields(cursor, static_fields_size)?,
            instance_fields: read_fields(cursor, instance_fields_size)?,
            direct_methods: read_methods(cursor, direct_methods_size)?,
            virtual_methods: read_methods(cursor, virtual_methods_size)?,
        })
    }
}

fn read_bytecode(dex: &DexFile, code_off: u32) -> Result<DexBytecode, DexError>
{
    if code_off == 0 {
        return Ok(DexBytecode::empty());
    }
    let mut cursor = DexCursor::at(dex.bytes(), code_off as usize)?;
    let code = CodeItem::read(&mut cursor).map_err(|e| err!(e, "code_item at 0x{:x}", code_off))?;
    let debug_info = if code.debug_info_off == 0 {
        DexMethodDebugInfo::empty()
    } else {
        let mut debug_cursor = DexCursor::at(dex.bytes(), code.debug_info_off as usize)
            .map_err(|_| DexError::malformed_debug_info(format!("debug_info_off 0x{:x} is past the end", code.debug_info_off)))?;
        DexMethodDebugInfo::read(&mut debug_cursor, dex, (code.insns.len() / 2) as u32)?
    };
    DexBytecode::from_code_item(code, debug_info)
}

fn build_method(
    dex: &DexFile,
    class_name: &str,
    encoded: &EncodedMethod,
    is_direct: bool,
) -> Result<DexMethod, DexError>
{
    let id = dex.method_id_at(encoded.method_idx)?;
    if id.class != class_name {
        warn!(
            "[classdata] method_ids[{}] belongs to {} but is listed in {}",
            encoded.method_idx, id.class, class_name
        );
    }
    let key = method_key(&id.name, &id.proto.shorty);
    let byte_code = read_bytecode(dex, encoded.code_off).map_err(|e| err!(e, "{}->{}", class_name, key))?;

    Ok(DexMethod {
        name: id.name,
        shorty: id.proto.shorty,
        return_type: id.proto.return_type,
        parameter_types: id.proto.parameters,
        is_direct,
        is_native: encoded.code_off == 0,
        access_flags: AccessFlags::from_bits_retain(encoded.access_flags),
        class_name: class_name.to_string(),
        byte_code,
    })
}

fn build_field(dex: &DexFile, class_name: &str, encoded: &EncodedField, is_static: bool) -> Result<DexField, DexError>
{
    let id = dex.field_id_at(encoded.field_idx)?;
    Ok(DexField {
        name: id.name,
        type_desc: id.type_desc,
        is_static,
        access_flags: AccessFlags::from_bits_retain(encoded.access_flags),
        class_name: class_name.to_string(),
    })
}

fn optional_type(dex: &DexFile, idx: u32) -> Result<Option<String>, DexError>
{
    if idx == NO_INDEX { Ok(None) } else { dex.type_at(idx).map(|s| Some(s.to_string())) }
}

fn optional_string(dex: &DexFile, idx: u32) -> Result<Option<String>, DexError>
{
    if idx == NO_INDEX { Ok(None) } else { dex.string_at(idx).map(|s| Some(s.to_string())) }
}

/// Resolves one class definition, including every method body.
pub fn parse_class(dex: &DexFile, def: &ClassDefItem) -> Result<DexClass, DexError>
{
    let name = dex.type_at(def.class_idx)?.to_string();
    let resolve = || -> Result<DexClass, DexError> {
        let data = if def.class_data_off == 0 {
            ClassDataItem::default()
        } else {
            let mut cursor = DexCursor::at(dex.bytes(), def.class_data_off as usize)?;
            ClassDataItem::read(&mut cursor)?
        };

        let fields = data
            .static_fields
            .iter()
            .map(|f| build_field(dex, &name, f, true))
            .chain(data.instance_fields.iter().map(|f| build_field(dex, &name, f, false)))
            .try_fold(BTreeMap::new(), |mut map, field| {
                let field = field?;
                let key = if map.contains_key(&field.name) {
                    warn!("[classdata] duplicate field {} in {}", field.name, name);
                    format!("{}:{}", field.name, field.type_desc)
                } else {
                    field.name.clone()
                };
                map.insert(key, field);
                Ok::<_, DexError>(map)
            })?;

        let methods = data
            .direct_methods
            .iter()
            .map(|m| build_method(dex, &name, m, true))
            .chain(data.virtual_methods.iter().map(|m| build_method(dex, &name, m, false)))
            .try_fold(BTreeMap::new(), |mut map, method| {
                let method = method?;
                let mut key = method.key();
                if map.contains_key(&key) {
                    // same name and shorty, different reference types
                    debug!("[classdata] {}->{} shares its shorty key, keyed by descriptor", name, key);
                    key = format!("{}{}", method.name, method.descriptor());
                }
                map.insert(key, method);
                Ok::<_, DexError>(map)
            })?;

        let interfaces = if def.interfaces_off == 0 { vec![] } else { dex.type_list_at(def.interfaces_off)? };

        Ok(DexClass {
            name: name.clone(),
            access_flags: AccessFlags::from_bits_retain(def.access_flags),
            superclass: optional_type(dex, def.superclass_idx)?,
            interfaces,
            source_file: optional_string(dex, def.source_file_idx)?,
            fields,
            methods,
        })
    };
    resolve().map_err(|e| err!(e, "class {}", name))
}
