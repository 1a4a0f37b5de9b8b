//! Decoding of a method's instruction stream.

use std::fmt;

use once_cell::sync::OnceCell;
use rangemap::RangeMap;
use serde::Serialize;

use crate::dex::code_item::CodeItem;
use crate::dex::debug_info::DexMethodDebugInfo;
use crate::dex::error::{DexError, DexErrorKind};
use crate::dex::opcode_format::{Format, ReferenceType};
use crate::dex::opcodes::Opcode;

/// One decoded instruction. `offset` is the byte offset of the opcode within
/// the method's instruction stream; `payload` holds every byte after the
/// opcode byte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instruction {
    pub opcode: Opcode,
    pub offset: u32,
    pub payload: Vec<u8>,
}

/// A decoded operand, in the order the format lists them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Operand {
    Register(u16),
    /// Explicit argument registers of the 35c family.
    RegisterList(Vec<u16>),
    /// `count` consecutive registers starting at `first` (3rc family).
    RegisterRange { first: u16, count: u16 },
    Literal(i64),
    /// Relative branch target in code units.
    BranchOffset(i32),
    Reference(ReferenceType, u32),
    /// `(key, relative target)` pairs of a switch payload.
    SwitchTable(Vec<(i32, i32)>),
    ArrayData { element_width: u16, data: Vec<u8> },
}

impl Instruction
{
    /// Encoded length in bytes, opcode included.
    pub fn len(&self) -> usize
    {
        1 + self.payload.len()
    }

    /// The instruction as 16-bit code units.
    fn units(&self) -> Vec<u16>
    {
        let mut raw = Vec::with_capacity(self.len() + 1);
        raw.push((self.opcode.value() & 0xff) as u8);
        raw.extend_from_slice(&self.payload);
        raw.chunks(2)
            .map(|c| u16::from_le_bytes([c[0], c.get(1).copied().unwrap_or(0)]))
            .collect()
    }

    pub fn operands(&self) -> Vec<Operand>
    {
        let u = self.units();
        let unit = |i: usize| u.get(i).copied().unwrap_or(0);
        let aa = unit(0) >> 8;
        let a = (unit(0) >> 8) & 0x0f;
        let b = unit(0) >> 12;
        let u32_at = |i: usize| unit(i) as u32 | (unit(i + 1) as u32) << 16;
        let reference = |idx: u32| Operand::Reference(self.opcode.reference_type(), idx);
        use Operand::*;

        match self.opcode.format() {
            Format::Format10x => vec![],
            Format::Format12x => vec![Register(a), Register(b)],
            Format::Format11n => vec![Register(a), Literal((((b as u8) << 4) as i8 >> 4) as i64)],
            Format::Format11x => vec![Register(aa)],
            Format::Format10t => vec![BranchOffset(aa as u8 as i8 as i32)],
            Format::Format20t => vec![BranchOffset(unit(1) as i16 as i32)],
            Format::Format22x => vec![Register(aa), Register(unit(1))],
            Format::Format21t => vec![Register(aa), BranchOffset(unit(1) as i16 as i32)],
            Format::Format21s => vec![Register(aa), Literal(unit(1) as i16 as i64)],
            Format::Format21ih => vec![Register(aa), Literal(((unit(1) as i32) << 16) as i64)],
            Format::Format21lh => vec![Register(aa), Literal((unit(1) as i64) << 48)],
            Format::Format21c => vec![Register(aa), reference(unit(1) as u32)],
            Format::Format23x => vec![Register(aa), Register(unit(1) & 0xff), Register(unit(1) >> 8)],
            Format::Format22b => vec![
                Register(aa),
                Register(unit(1) & 0xff),
                Literal((unit(1) >> 8) as u8 as i8 as i64),
            ],
            Format::Format22t => vec![Register(a), Register(b), BranchOffset(unit(1) as i16 as i32)],
            Format::Format22s => vec![Register(a), Register(b), Literal(unit(1) as i16 as i64)],
            Format::Format22c | Format::Format22cs => vec![Register(a), Register(b), reference(unit(1) as u32)],
            Format::Format30t => vec![BranchOffset(u32_at(1) as i32)],
            Format::Format32x => vec![Register(unit(1)), Register(unit(2))],
            Format::Format31i => vec![Register(aa), Literal(u32_at(1) as i32 as i64)],
            Format::Format31t => vec![Register(aa), BranchOffset(u32_at(1) as i32)],
            Format::Format31c => vec![Register(aa), reference(u32_at(1))],
            Format::Format35c | Format::Format35ms => {
                vec![RegisterList(arg_registers(unit(0), unit(2))), reference(unit(1) as u32)]
            }
            Format::Format3rc | Format::Format3rms => {
                vec![RegisterRange { first: unit(2), count: aa }, reference(unit(1) as u32)]
            }
            Format::Format45cc => vec![
                RegisterList(arg_registers(unit(0), unit(2))),
                reference(unit(1) as u32),
                Reference(ReferenceType::MethodProto, unit(3) as u32),
            ],
            Format::Format4rcc => vec![
                RegisterRange { first: unit(2), count: aa },
                reference(unit(1) as u32),
                Reference(ReferenceType::MethodProto, unit(3) as u32),
            ],
            Format::Format51l => {
                let lit = (0..4).fold(0u64, |acc, i| acc | (unit(1 + i) as u64) << (16 * i));
                vec![Register(aa), Literal(lit as i64)]
            }
            Format::PackedSwitchPayload => {
                let size = unit(1) as usize;
                let first_key = u32_at(2) as i32;
                let targets = (0..size)
                    .map(|i| (first_key.wrapping_add(i as i32), u32_at(4 + 2 * i) as i32))
                    .collect();
                vec![SwitchTable(targets)]
            }
            Format::SparseSwitchPayload => {
                let size = unit(1) as usize;
                let targets = (0..size)
                    .map(|i| (u32_at(2 + 2 * i) as i32, u32_at(2 + 2 * size + 2 * i) as i32))
                    .collect();
                vec![SwitchTable(targets)]
            }
            Format::ArrayPayload => {
                let element_width = unit(1);
                let count = u32_at(2) as usize;
                let data_len = (element_width as usize).saturating_mul(count);
                let data = self.payload.iter().skip(7).take(data_len).copied().collect();
                vec![ArrayData { element_width, data }]
            }
        }
    }
}

// Registers C..G of the 35c family; the count lives in the top nibble of the first unit
fn arg_registers(first: u16, regs: u16) -> Vec<u16>
{
    let count = (first >> 12) as usize;
    let all = [regs & 0xf, (regs >> 4) & 0xf, (regs >> 8) & 0xf, regs >> 12, (first >> 8) & 0xf];
    all.iter().take(count.min(5)).copied().collect()
}

impl fmt::Display for Operand
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            Operand::Register(r) => write!(f, "v{}", r),
            Operand::RegisterList(regs) => {
                let regs: Vec<String> = regs.iter().map(|r| format!("v{}", r)).collect();
                write!(f, "{{{}}}", regs.join(", "))
            }
            Operand::RegisterRange { first, count } => {
                if *count == 0 {
                    write!(f, "{{}}")
                } else {
                    write!(f, "{{v{} .. v{}}}", first, *first as u32 + *count as u32 - 1)
                }
            }
            Operand::Literal(v) if *v < 0 => write!(f, "-0x{:x}", v.unsigned_abs()),
            Operand::Literal(v) => write!(f, "0x{:x}", v),
            Operand::BranchOffset(o) => write!(f, "{:+}", o),
            Operand::Reference(kind, idx) => {
                let prefix = match kind {
                    ReferenceType::None => "ref",
                    ReferenceType::String => "string",
                    ReferenceType::Type => "type",
                    ReferenceType::Field => "field",
                    ReferenceType::Method => "method",
                    ReferenceType::CallSite => "call_site",
                    ReferenceType::MethodProto => "proto",
                    ReferenceType::MethodHandle => "method_handle",
                    ReferenceType::FieldOffset => "field_offset",
                    ReferenceType::VtableIndex => "vtable",
                };
                write!(f, "{}@{}", prefix, idx)
            }
            Operand::SwitchTable(entries) => {
                let entries: Vec<String> = entries.iter().map(|(k, t)| format!("{} -> {:+}", k, t)).collect();
                write!(f, "[{}]", entries.join(", "))
            }
            Operand::ArrayData { element_width, data } => {
                write!(f, "width {} [{} bytes]", element_width, data.len())
            }
        }
    }
}

impl fmt::Display for Instruction
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        let operands: Vec<String> = self.operands().iter().map(|o| o.to_string()).collect();
        if operands.is_empty() {
            write!(f, "{}", self.opcode.name())
        } else {
            write!(f, "{} {}", self.opcode.name(), operands.join(", "))
        }
    }
}

/// Total size in bytes of the payload pseudo-instruction starting at `ix`.
fn payload_size(bytes: &[u8], ix: usize, opcode: Opcode) -> Result<usize, DexError>
{
    let header = match opcode {
        Opcode::FillArrayDataPayload => 8,
        _ => 4,
    };
    if bytes.len() - ix < header {
        return Err(DexError::out_of_bounds(ix, header, bytes.len()));
    }
    let u16_at = |o: usize| u16::from_le_bytes([bytes[ix + o], bytes[ix + o + 1]]) as u64;
    let size = match opcode {
        Opcode::PackedSwitchPayload => 8 + u16_at(2) * 4,
        Opcode::SparseSwitchPayload => 4 + u16_at(2) * 8,
        _ => {
            let count = u16_at(4) | u16_at(6) << 16;
            let data = u16_at(2) * count;
            8 + data + (data & 1)
        }
    };
    usize::try_from(size).map_err(|_| DexError::out_of_bounds(ix, usize::MAX, bytes.len()))
}

/// Decodes a complete instruction stream. Every byte must belong to an
/// instruction: an unknown opcode or an instruction running past the end is
/// an error.
pub fn decode_instructions(bytes: &[u8]) -> Result<Vec<Instruction>, DexError>
{
    let mut instructions = vec![];
    let mut ix = 0usize;
    while ix < bytes.len() {
        let value = bytes[ix];
        let unit = u16::from_le_bytes([value, bytes.get(ix + 1).copied().unwrap_or(0)]);
        let opcode = Opcode::from_code_unit(unit)
            .ok_or_else(|| DexError::new(DexErrorKind::UnknownOpcode { offset: ix, value }))?;
        let size = match opcode.format().size() {
            Some(size) => size,
            None => payload_size(bytes, ix, opcode)?,
        };
        if bytes.len() - ix < size {
            return Err(err!(
                DexError::out_of_bounds(ix, size, bytes.len()),
                "{} at byte offset {}",
                opcode.name(),
                ix
            ));
        }
        instructions.push(Instruction {
            opcode,
            offset: ix as u32,
            payload: bytes[ix + 1..ix + size].to_vec(),
        });
        ix += size;
    }
    Ok(instructions)
}

/// A method body: raw bytes, decoded instructions and the debug info that maps
/// them to source lines.
#[derive(Debug, Clone, Serialize)]
pub struct DexBytecode {
    bytes: Vec<u8>,
    instructions: Vec<Instruction>,
    debug_info: DexMethodDebugInfo,
    registers_size: u16,
    ins_size: u16,
    outs_size: u16,
    tries_size: u16,
    #[serde(skip)]
    line_map: OnceCell<RangeMap<u32, u32>>,
}

impl DexBytecode
{
    /// Bytecode of a method without a code item.
    pub fn empty() -> Self
    {
        DexBytecode {
            bytes: vec![],
            instructions: vec![],
            debug_info: DexMethodDebugInfo::empty(),
            registers_size: 0,
            ins_size: 0,
            outs_size: 0,
            tries_size: 0,
            line_map: OnceCell::new(),
        }
    }

    pub fn from_bytes(bytes: Vec<u8>, debug_info: DexMethodDebugInfo) -> Result<Self, DexError>
    {
        let instructions = decode_instructions(&bytes)?;
        Ok(DexBytecode { bytes, instructions, debug_info, ..DexBytecode::empty() })
    }

    pub(crate) fn from_code_item(code: CodeItem, debug_info: DexMethodDebugInfo) -> Result<Self, DexError>
    {
        let mut bytecode = DexBytecode::from_bytes(code.insns, debug_info)?;
        bytecode.registers_size = code.registers_size;
        bytecode.ins_size = code.ins_size;
        bytecode.outs_size = code.outs_size;
        bytecode.tries_size = code.tries_size;
        Ok(bytecode)
    }

    pub fn bytes(&self) -> &[u8] { &self.bytes }
    pub fn instructions(&self) -> &[Instruction] { &self.instructions }
    pub fn debug_info(&self) -> &DexMethodDebugInfo { &self.debug_info }
    pub fn registers_size(&self) -> u16 { self.registers_size }
    pub fn ins_size(&self) -> u16 { self.ins_size }
    pub fn outs_size(&self) -> u16 { self.outs_size }
    pub fn tries_size(&self) -> u16 { self.tries_size }

    pub fn is_empty(&self) -> bool
    {
        self.instructions.is_empty()
    }

    // Byte ranges of the stream keyed to the line in effect; a later row at the
    // same address shadows the earlier one.
    fn line_map(&self) -> &RangeMap<u32, u32>
    {
        self.line_map.get_or_init(|| {
            let end = self.bytes.len() as u32;
            let table = &self.debug_info.line_table;
            let mut map = RangeMap::new();
            for (i, entry) in table.iter().enumerate() {
                let start = entry.byte_offset().min(end);
                let stop = table.get(i + 1).map_or(end, |next| next.byte_offset().min(end));
                if start < stop {
                    map.insert(start..stop, entry.line_number);
                }
            }
            map
        })
    }

    /// The source line of the instruction at `byte_offset`, if the line table covers it.
    pub fn line_for_offset(&self, byte_offset: u32) -> Option<u32>
    {
        self.line_map().get(&byte_offset).copied()
    }

    /// All instructions attributed to `line`, in stream order. Lines absent from
    /// the line table yield an empty list.
    pub fn instructions_for_line_number(&self, line: u32) -> Vec<&Instruction>
    {
        self.instructions
            .iter()
            .filter(|i| self.line_for_offset(i.offset) == Some(line))
            .collect()
    }

    /// Distinct line numbers of the line table, ascending.
    pub fn line_numbers(&self) -> Vec<u32>
    {
        let mut lines: Vec<u32> = self.debug_info.line_table.iter().map(|e| e.line_number).collect();
        lines.sort_unstable();
        lines.dedup();
        lines
    }
}
