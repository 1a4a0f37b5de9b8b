use bitflags::bitflags;
use serde::Serialize;

use crate::dex::opcodes::Opcode;

/// What the index operand of an instruction refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ReferenceType {
    None,
    String,
    Type,
    Field,
    Method,
    CallSite,
    MethodProto,
    MethodHandle,
    /// Byte offset of a field, used by the quickened field accessors.
    FieldOffset,
    /// Vtable slot, used by the quickened invokes.
    VtableIndex,
}

// Static properties of an opcode.
bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    pub struct OpcodeFlags: u32 {
        const CAN_THROW = 0x1;
        const ODEX_ONLY = 0x2;
        const CAN_CONTINUE = 0x4;
        const SETS_RESULT = 0x8;
        const SETS_REGISTER = 0x10;
        const SETS_WIDE_REGISTER = 0x20;
        const QUICK_FIELD_ACCESSOR = 0x40;
        const STATIC_FIELD_ACCESSOR = 0x100;
        const FIELD_GET = 0x1000;
        const FIELD_PUT = 0x2000;
        const ARRAY_GET = 0x4000;
        const ARRAY_PUT = 0x8000;
        const RETURN = 0x10000;
        const INVOKE = 0x20000;
        const STATIC_INVOKE = 0x40000;
        const BRANCH = 0x80000;
        const PAYLOAD = 0x100000;
    }
}

/// Instruction formats, named after the Dalvik `<units><regs><kind>` convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Format {
    Format10t,
    Format10x,
    Format11n,
    Format11x,
    Format12x,
    Format20t,
    Format21c,
    Format21ih,
    Format21lh,
    Format21s,
    Format21t,
    Format22b,
    Format22c,
    Format22cs,
    Format22s,
    Format22t,
    Format22x,
    Format23x,
    Format30t,
    Format31c,
    Format31i,
    Format31t,
    Format32x,
    Format35c,
    Format35ms,
    Format3rc,
    Format3rms,
    Format45cc,
    Format4rcc,
    Format51l,
    ArrayPayload,
    PackedSwitchPayload,
    SparseSwitchPayload,
}

impl Format {
    /// Encoded size in bytes, or `None` for payloads whose size depends on their header.
    pub const fn size(&self) -> Option<usize> {
        match self {
            // Size 2
            Format::Format10t
            | Format::Format10x
            | Format::Format11n
            | Format::Format11x
            | Format::Format12x => Some(2),

            // Size 4
            Format::Format20t
            | Format::Format21c
            | Format::Format21ih
            | Format::Format21lh
            | Format::Format21s
            | Format::Format21t
            | Format::Format22b
            | Format::Format22c
            | Format::Format22cs
            | Format::Format22s
            | Format::Format22t
            | Format::Format22x
            | Format::Format23x => Some(4),

            // Size 6
            Format::Format30t
            | Format::Format31c
            | Format::Format31i
            | Format::Format31t
            | Format::Format32x
            | Format::Format35c
            | Format::Format35ms
            | Format::Format3rc
            | Format::Format3rms => Some(6),

            // Size 8
            Format::Format45cc | Format::Format4rcc => Some(8),

            // Size 10
            Format::Format51l => Some(10),

            Format::ArrayPayload
            | Format::PackedSwitchPayload
            | Format::SparseSwitchPayload => None,
        }
    }

    /// Variable-length payload pseudo-instructions.
    pub const fn is_payload_format(&self) -> bool {
        matches!(
            self,
            Format::ArrayPayload | Format::PackedSwitchPayload | Format::SparseSwitchPayload
        )
    }
}

/// Static metadata of one opcode.
#[derive(Debug, Clone)]
pub struct OpcodeInfo {
    pub opcode: Opcode,
    /// Opcode value: the low byte of the first code unit, or the whole unit for payloads.
    pub value: u16,
    pub name: &'static str,
    pub format: Format,
    pub reference_type: ReferenceType,
    pub reference_type2: ReferenceType,
    pub flags: OpcodeFlags,
}
