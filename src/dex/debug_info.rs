//! The `debug_info_item` state machine.
//!
//! A debug stream starts with `line_start` and the parameter names, then runs
//! a small byte-coded program over an implicit `(address, line)` register
//! pair. Special opcodes (`0x0a` and above) advance both registers at once
//! and emit a row of the line table.

use std::collections::HashMap;

use crate::dex::cursor::DexCursor;
use crate::dex::error::{DexError, DexErrorKind};
use log::{debug, warn};
use serde::Serialize;

const DBG_END_SEQUENCE: u8 = 0x00;
const DBG_ADVANCE_PC: u8 = 0x01;
const DBG_ADVANCE_LINE: u8 = 0x02;
const DBG_START_LOCAL: u8 = 0x03;
const DBG_START_LOCAL_EXTENDED: u8 = 0x04;
const DBG_END_LOCAL: u8 = 0x05;
const DBG_RESTART_LOCAL: u8 = 0x06;
const DBG_SET_FILE: u8 = 0x07;
const DBG_SET_PROLOGUE_END: u8 = 0x08;
const DBG_SET_EPILOGUE_BEGIN: u8 = 0x09;
const DBG_FIRST_SPECIAL: u8 = 0x0a;
const DBG_LINE_BASE: i64 = -4;
const DBG_LINE_RANGE: u8 = 15;

/// Resolves pool indices into names while decoding.
pub trait RefResolver {
    fn string(&self, idx: u32) -> Result<String, DexError>;
    fn type_desc(&self, idx: u32) -> Result<String, DexError>;
}

/// Prints stable placeholders like `string@42`; useful when no file is at hand.
pub struct PlaceholderResolver;

impl RefResolver for PlaceholderResolver {
    fn string(&self, idx: u32) -> Result<String, DexError> { Ok(format!("string@{}", idx)) }
    fn type_desc(&self, idx: u32) -> Result<String, DexError> { Ok(format!("Ltype@{};", idx)) }
}

/// One row of the line table. `address` is in 16-bit code units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineTableEntry {
    pub address: u32,
    pub line_number: u32,
}

impl LineTableEntry
{
    /// The address as a byte offset into the instruction stream.
    pub fn byte_offset(&self) -> u32
    {
        self.address * 2
    }
}

/// A local variable live over `[start_address, end_address)` code units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalVariable {
    pub register: u32,
    pub name: Option<String>,
    pub type_desc: Option<String>,
    pub signature: Option<String>,
    pub start_address: u32,
    pub end_address: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DexMethodDebugInfo {
    pub line_start: u32,
    pub parameter_names: Vec<Option<String>>,
    pub line_table: Vec<LineTableEntry>,
    pub locals: Vec<LocalVariable>,
    pub prologue_end: Option<u32>,
    pub epilogue_begin: Option<u32>,
    /// `(address, file)` for each `DBG_SET_FILE`; `None` reverts to the class source file.
    pub source_files: Vec<(u32, Option<String>)>,
}

impl DexMethodDebugInfo
{
    /// Debug info for a method without a debug_info_item.
    pub fn empty() -> Self
    {
        DexMethodDebugInfo::default()
    }

    pub fn is_empty(&self) -> bool
    {
        self.line_table.is_empty()
    }

    /// Decodes a debug_info_item. `code_units` is the method's `insns_size`
    /// and closes any local still live at the end of the stream.
    pub fn read(
        cursor: &mut DexCursor,
        resolver: &dyn RefResolver,
        code_units: u32,
    ) -> Result<DexMethodDebugInfo, DexError>
    {
        let start = cursor.position();
        DebugStateMachine::new(resolver, code_units)
            .run(cursor)
            .map_err(|e| {
                let e = match e.kind() {
                    DexErrorKind::OutOfBounds { .. } => {
                        DexError::malformed_debug_info(format!("premature end of stream: {}", e))
                    }
                    DexErrorKind::InvalidFormat(_) => DexError::malformed_debug_info(e.to_string()),
                    _ => e,
                };
                err!(e, "debug_info_item at 0x{:x}", start)
            })
    }

    /// Source line of the row covering `address` (code units), if any.
    pub fn line_at_address(&self, address: u32) -> Option<u32>
    {
        self.line_table
            .iter()
            .take_while(|e| e.address <= address)
            .last()
            .map(|e| e.line_number)
    }
}

struct DebugStateMachine<'r> {
    resolver: &'r dyn RefResolver,
    code_units: u32,
    address: u32,
    line: i64,
    info: DexMethodDebugInfo,
    live: HashMap<u32, usize>,
}

impl<'r> DebugStateMachine<'r>
{
    fn new(resolver: &'r dyn RefResolver, code_units: u32) -> Self
    {
        DebugStateMachine {
            resolver,
            code_units,
            address: 0,
            line: 0,
            info: DexMethodDebugInfo::empty(),
            live: HashMap::new(),
        }
    }

    fn opt_string(&self, idx: Option<u32>) -> Result<Option<String>, DexError>
    {
        idx.map(|i| self.resolver.string(i)).transpose()
    }

    fn opt_type(&self, idx: Option<u32>) -> Result<Option<String>, DexError>
    {
        idx.map(|i| self.resolver.type_desc(i)).transpose()
    }

    fn run(mut self, cursor: &mut DexCursor) -> Result<DexMethodDebugInfo, DexError>
    {
        let line_start = cursor.read_uleb128()?;
        self.info.line_start = line_start;
        self.line = line_start as i64;

        let parameters_size = cursor.read_uleb128()? as usize;
        if parameters_size > cursor.remaining() {
            return Err(DexError::malformed_debug_info(format!(
                "parameters_size {} exceeds the remaining {} bytes",
                parameters_size,
                cursor.remaining()
            )));
        }
        for _ in 0..parameters_size {
            let name = cursor.read_uleb128p1()?;
            let name = self.opt_string(name)?;
            self.info.parameter_names.push(name);
        }

        loop {
            let op = cursor.read_u1()?;
            match op {
                DBG_END_SEQUENCE => break,
                DBG_ADVANCE_PC => {
                    let diff = cursor.read_uleb128()?;
                    self.advance_address(diff)?;
                }
                DBG_ADVANCE_LINE => {
                    let diff = cursor.read_sleb128()?;
                    self.advance_line(diff as i64)?;
                }
                DBG_START_LOCAL | DBG_START_LOCAL_EXTENDED => {
                    let register = cursor.read_uleb128()?;
                    let name = cursor.read_uleb128p1()?;
                    let type_idx = cursor.read_uleb128p1()?;
                    let sig = if op == DBG_START_LOCAL_EXTENDED { cursor.read_uleb128p1()? } else { None };
                    let local = LocalVariable {
                        register,
                        name: self.opt_string(name)?,
                        type_desc: self.opt_type(type_idx)?,
                        signature: self.opt_string(sig)?,
                        start_address: self.address,
                        end_address: self.code_units,
                    };
                    self.start_local(local);
                }
                DBG_END_LOCAL => {
                    let register = cursor.read_uleb128()?;
                    if !self.end_local(register) {
                        debug!("[debug_info] end_local v{} with no live local", register);
                    }
                }
                DBG_RESTART_LOCAL => {
                    let register = cursor.read_uleb128()?;
                    self.restart_local(register);
                }
                DBG_SET_PROLOGUE_END => self.info.prologue_end = Some(self.address),
                DBG_SET_EPILOGUE_BEGIN => self.info.epilogue_begin = Some(self.address),
                DBG_SET_FILE => {
                    let name = cursor.read_uleb128p1()?;
                    let name = self.opt_string(name)?;
                    self.info.source_files.push((self.address, name));
                }
                special => {
                    let adjusted = special - DBG_FIRST_SPECIAL;
                    self.advance_address((adjusted / DBG_LINE_RANGE) as u32)?;
                    self.advance_line(DBG_LINE_BASE + (adjusted % DBG_LINE_RANGE) as i64)?;
                    self.emit_row();
                }
            }
        }

        Ok(self.info)
    }

    fn advance_address(&mut self, diff: u32) -> Result<(), DexError>
    {
        self.address = self.address.checked_add(diff).ok_or_else(|| {
            DexError::malformed_debug_info(format!("address overflow advancing 0x{:x} by {}", self.address, diff))
        })?;
        Ok(())
    }

    fn advance_line(&mut self, diff: i64) -> Result<(), DexError>
    {
        let line = self.line + diff;
        if line < 0 || line > u32::MAX as i64 {
            return Err(DexError::malformed_debug_info(format!(
                "line number {} out of range (advanced from {} by {})",
                line, self.line, diff
            )));
        }
        self.line = line;
        Ok(())
    }

    fn emit_row(&mut self)
    {
        if self.address >= self.code_units && self.code_units > 0 {
            warn!(
                "[debug_info] line {} mapped to address {} past the end of {} code units",
                self.line, self.address, self.code_units
            );
        }
        self.info.line_table.push(LineTableEntry { address: self.address, line_number: self.line as u32 });
    }

    fn start_local(&mut self, local: LocalVariable)
    {
        self.end_local(local.register);
        self.live.insert(local.register, self.info.locals.len());
        self.info.locals.push(local);
    }

    fn end_local(&mut self, register: u32) -> bool
    {
        match self.live.remove(&register) {
            Some(ix) => {
                self.info.locals[ix].end_address = self.address;
                true
            }
            None => false,
        }
    }

    fn restart_local(&mut self, register: u32)
    {
        let previous = self.info.locals.iter().rposition(|l| l.register == register);
        match previous {
            Some(ix) => {
                let mut local = self.info.locals[ix].clone();
                local.start_address = self.address;
                local.end_address = self.code_units;
                self.start_local(local);
            }
            None => warn!("[debug_info] restart_local v{} with no earlier local", register),
        }
    }
}
