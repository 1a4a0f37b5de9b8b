#[macro_use]
pub mod error;

pub mod cursor;
pub(crate) mod leb;
pub mod dex_file;
pub(crate) mod code_item;
pub(crate) mod class_data;
pub mod debug_info;
pub mod opcode_format;
pub mod opcodes;
pub mod instructions;
pub mod loader;

pub use cursor::DexCursor;
pub use debug_info::{DexMethodDebugInfo, LineTableEntry, LocalVariable, RefResolver};
pub use dex_file::{DexFile, FieldId, Header, MethodId, Proto};
pub use error::{DexError, DexErrorKind};
pub use instructions::{decode_instructions, DexBytecode, Instruction, Operand};
pub use loader::{load_dex, Dex, DexOptions};
pub use opcode_format::{Format, OpcodeFlags, ReferenceType};
pub use opcodes::Opcode;

// Little-endian writers for assembling test images
#[cfg(test)]
pub(crate) fn write_u1(buffer: &mut Vec<u8>, val: u8) -> usize
{
    buffer.push(val);
    1
}

#[cfg(test)]
pub(crate) fn write_u2(buffer: &mut Vec<u8>, val: u16) -> usize
{
    buffer.extend_from_slice(&val.to_le_bytes());
    2
}

#[cfg(test)]
pub(crate) fn write_u4(buffer: &mut Vec<u8>, val: u32) -> usize
{
    buffer.extend_from_slice(&val.to_le_bytes());
    4
}

#[cfg(test)]
pub(crate) fn write_uleb128(buffer: &mut Vec<u8>, val: u32) -> usize
{
    let encoded = leb::encode_uleb128(val);
    let c = encoded.len();
    buffer.extend(encoded);
    c
}

#[cfg(test)]
pub(crate) fn write_sleb128(buffer: &mut Vec<u8>, val: i32) -> usize
{
    let encoded = leb::encode_sleb128(val);
    let c = encoded.len();
    buffer.extend(encoded);
    c
}

#[cfg(test)]
pub(crate) fn write_uleb128p1(buffer: &mut Vec<u8>, val: Option<u32>) -> usize
{
    let encoded = leb::encode_uleb128p1(val);
    let c = encoded.len();
    buffer.extend(encoded);
    c
}

#[cfg(test)]
pub(crate) fn write_x(buffer: &mut Vec<u8>, val: &[u8]) -> usize
{
    buffer.extend_from_slice(val);
    val.len()
}
