/* code_item: register counts, the raw instruction stream and the try/catch tables */

use crate::dex::cursor::DexCursor;
use crate::dex::error::DexError;
use log::warn;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodedTypeAddrPair {
    pub type_idx: u32,
    pub addr: u32,
}

impl EncodedTypeAddrPair
{
    pub fn read(cursor: &mut DexCursor) -> Result<EncodedTypeAddrPair, DexError>
    {
        Ok(EncodedTypeAddrPair {
            type_idx: cursor.read_uleb128()?,
            addr: cursor.read_uleb128()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TryItem {
    pub start_addr: u32,
    pub insn_count: u16,
    pub handler_off: u16, // byte offset into the encoded_catch_handler_list
}

impl TryItem
{
    pub fn read(cursor: &mut DexCursor) -> Result<TryItem, DexError>
    {
        Ok(TryItem {
            start_addr: cursor.read_u4()?,
            insn_count: cursor.read_u2()?,
            handler_off: cursor.read_u2()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodedCatchHandler {
    pub handlers: Vec<EncodedTypeAddrPair>,
    pub catch_all_addr: Option<u32>,
}

impl EncodedCatchHandler
{
    pub fn read(cursor: &mut DexCursor) -> Result<EncodedCatchHandler, DexError>
    {
        let size = cursor.read_sleb128()?;
        let count = size.unsigned_abs() as usize;
        if count > cursor.remaining() {
            fail!("encoded_catch_handler declares {} pairs with {} bytes left", count, cursor.remaining());
        }
        let mut handlers = Vec::with_capacity(count);
        for _ in 0..count {
            handlers.push(EncodedTypeAddrPair::read(cursor)?);
        }
        let catch_all_addr = if size <= 0 { Some(cursor.read_uleb128()?) } else { None };
        Ok(EncodedCatchHandler { handlers, catch_all_addr })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeItem {
    pub registers_size: u16,
    pub ins_size: u16,
    pub outs_size: u16,
    pub tries_size: u16,
    pub debug_info_off: u32,
    /// Instruction stream as raw bytes (`insns_size * 2` of them).
    pub insns: Vec<u8>,
    pub tries: Vec<TryItem>,
    pub handlers: Vec<EncodedCatchHandler>,
}

impl CodeItem
{
    pub fn read(cursor: &mut DexCursor) -> Result<CodeItem, DexError>
    {
        let code_item_start = cursor.position();
        let registers_size = cursor.read_u2()?;
        let ins_size = cursor.read_u2()?;
        let outs_size = cursor.read_u2()?;
        let tries_size = cursor.read_u2()?;
        let debug_info_off = cursor.read_u4()?;
        let insns_size = cursor.read_u4()? as usize;

        let byte_len = insns_size
            .checked_mul(2)
            .ok_or_else(|| err!("insns_size {} overflows", insns_size))?;
        let insns = cursor.read_x(byte_len)?.to_vec();

        let mut tries = vec![];
        let mut handlers = vec![];
        if tries_size > 0 {
            if insns_size & 1 != 0 {
                let padding = cursor.read_u2()?;
                if padding != 0 {
                    warn!(
                        "[codeitem] non-zero padding 0x{:04x} at 0x{:x} (code_item_start=0x{:x})",
                        padding,
                        cursor.position() - 2,
                        code_item_start
                    );
                }
            }
            for _ in 0..tries_size {
                tries.push(TryItem::read(cursor)?);
            }

            let handlers_size = cursor.read_uleb128()? as usize;
            if handlers_size > cursor.remaining() {
                fail!("encoded_catch_handler_list size {} is implausibly large", handlers_size);
            }
            let handlers_base = cursor.position();
            for (ti, t) in tries.iter().enumerate() {
                if handlers_base + t.handler_off as usize >= cursor.bytes().len() {
                    warn!(
                        "[codeitem] try #{} handler_off {} points past the end of the file (base=0x{:x})",
                        ti, t.handler_off, handlers_base
                    );
                }
            }
            for i in 0..handlers_size {
                let entry_off = cursor.position();
                let h = EncodedCatchHandler::read(cursor).map_err(|e| {
                    err!(
                        e,
                        "encoded_catch_handler #{}/{} at 0x{:x} (code_item at 0x{:x})",
                        i + 1,
                        handlers_size,
                        entry_off,
                        code_item_start
                    )
                })?;
                handlers.push(h);
            }
        }

        Ok(CodeItem { registers_size, ins_size, outs_size, tries_size, debug_info_off, insns, tries, handlers })
    }
}
