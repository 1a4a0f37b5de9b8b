//! The Dalvik/ART opcode space.
//!
//! Every opcode is one variant of [`Opcode`]; its encoding value, mnemonic,
//! format and classification flags live in a single static table so decoding
//! and classification read the same metadata.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::fmt;

use crate::dex::opcode_format::{Format, OpcodeFlags, OpcodeFlags as F, OpcodeInfo, ReferenceType};

macro_rules! opcode_table {
    ($( $variant:ident = $value:literal, $name:literal, $format:ident, $ref:ident, $ref2:ident, $flags:expr; )*) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        pub enum Opcode {
            $( $variant, )*
        }

        static OPCODES: Lazy<Vec<OpcodeInfo>> = Lazy::new(|| {
            vec![
                $(
                    OpcodeInfo {
                        opcode: Opcode::$variant,
                        value: $value,
                        name: $name,
                        format: Format::$format,
                        reference_type: ReferenceType::$ref,
                        reference_type2: ReferenceType::$ref2,
                        flags: $flags,
                    },
                )*
            ]
        });
    };
}

opcode_table! {
    Nop = 0x00, "nop", Format10x, None, None, F::CAN_CONTINUE;
    Move = 0x01, "move", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    MoveFrom16 = 0x02, "move/from16", Format22x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    Move16 = 0x03, "move/16", Format32x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    MoveWide = 0x04, "move-wide", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    MoveWideFrom16 = 0x05, "move-wide/from16", Format22x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    MoveWide16 = 0x06, "move-wide/16", Format32x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    MoveObject = 0x07, "move-object", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    MoveObjectFrom16 = 0x08, "move-object/from16", Format22x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    MoveObject16 = 0x09, "move-object/16", Format32x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    MoveResult = 0x0a, "move-result", Format11x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    MoveResultWide = 0x0b, "move-result-wide", Format11x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    MoveResultObject = 0x0c, "move-result-object", Format11x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    MoveException = 0x0d, "move-exception", Format11x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    ReturnVoid = 0x0e, "return-void", Format10x, None, None, F::RETURN;
    Return = 0x0f, "return", Format11x, None, None, F::RETURN;
    ReturnWide = 0x10, "return-wide", Format11x, None, None, F::RETURN;
    ReturnObject = 0x11, "return-object", Format11x, None, None, F::RETURN;
    Const4 = 0x12, "const/4", Format11n, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    Const16 = 0x13, "const/16", Format21s, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    Const = 0x14, "const", Format31i, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    ConstHigh16 = 0x15, "const/high16", Format21ih, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    ConstWide16 = 0x16, "const-wide/16", Format21s, None, None, F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    ConstWide32 = 0x17, "const-wide/32", Format31i, None, None, F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    ConstWide = 0x18, "const-wide", Format51l, None, None, F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    ConstWideHigh16 = 0x19, "const-wide/high16", Format21lh, None, None, F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    ConstString = 0x1a, "const-string", Format21c, String, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER;
    ConstStringJumbo = 0x1b, "const-string/jumbo", Format31c, String, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER;
    ConstClass = 0x1c, "const-class", Format21c, Type, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER;
    MonitorEnter = 0x1d, "monitor-enter", Format11x, None, None, F::CAN_THROW | F::CAN_CONTINUE;
    MonitorExit = 0x1e, "monitor-exit", Format11x, None, None, F::CAN_THROW | F::CAN_CONTINUE;
    CheckCast = 0x1f, "check-cast", Format21c, Type, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER;
    InstanceOf = 0x20, "instance-of", Format22c, Type, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER;
    ArrayLength = 0x21, "array-length", Format12x, None, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER;
    NewInstance = 0x22, "new-instance", Format21c, Type, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER;
    NewArray = 0x23, "new-array", Format22c, Type, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER;
    FilledNewArray = 0x24, "filled-new-array", Format35c, Type, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_RESULT;
    FilledNewArrayRange = 0x25, "filled-new-array/range", Format3rc, Type, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_RESULT;
    FillArrayData = 0x26, "fill-array-data", Format31t, None, None, F::CAN_CONTINUE;
    Throw = 0x27, "throw", Format11x, None, None, F::CAN_THROW;
    Goto = 0x28, "goto", Format10t, None, None, F::BRANCH;
    Goto16 = 0x29, "goto/16", Format20t, None, None, F::BRANCH;
    Goto32 = 0x2a, "goto/32", Format30t, None, None, F::BRANCH;
    PackedSwitch = 0x2b, "packed-switch", Format31t, None, None, F::CAN_CONTINUE | F::BRANCH;
    SparseSwitch = 0x2c, "sparse-switch", Format31t, None, None, F::CAN_CONTINUE | F::BRANCH;
    CmplFloat = 0x2d, "cmpl-float", Format23x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    CmpgFloat = 0x2e, "cmpg-float", Format23x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    CmplDouble = 0x2f, "cmpl-double", Format23x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    CmpgDouble = 0x30, "cmpg-double", Format23x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    CmpLong = 0x31, "cmp-long", Format23x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    IfEq = 0x32, "if-eq", Format22t, None, None, F::CAN_CONTINUE | F::BRANCH;
    IfNe = 0x33, "if-ne", Format22t, None, None, F::CAN_CONTINUE | F::BRANCH;
    IfLt = 0x34, "if-lt", Format22t, None, None, F::CAN_CONTINUE | F::BRANCH;
    IfGe = 0x35, "if-ge", Format22t, None, None, F::CAN_CONTINUE | F::BRANCH;
    IfGt = 0x36, "if-gt", Format22t, None, None, F::CAN_CONTINUE | F::BRANCH;
    IfLe = 0x37, "if-le", Format22t, None, None, F::CAN_CONTINUE | F::BRANCH;
    IfEqz = 0x38, "if-eqz", Format21t, None, None, F::CAN_CONTINUE | F::BRANCH;
    IfNez = 0x39, "if-nez", Format21t, None, None, F::CAN_CONTINUE | F::BRANCH;
    IfLtz = 0x3a, "if-ltz", Format21t, None, None, F::CAN_CONTINUE | F::BRANCH;
    IfGez = 0x3b, "if-gez", Format21t, None, None, F::CAN_CONTINUE | F::BRANCH;
    IfGtz = 0x3c, "if-gtz", Format21t, None, None, F::CAN_CONTINUE | F::BRANCH;
    IfLez = 0x3d, "if-lez", Format21t, None, None, F::CAN_CONTINUE | F::BRANCH;
    Aget = 0x44, "aget", Format23x, None, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER | F::ARRAY_GET;
    AgetWide = 0x45, "aget-wide", Format23x, None, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER | F::ARRAY_GET;
    AgetObject = 0x46, "aget-object", Format23x, None, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER | F::ARRAY_GET;
    AgetBoolean = 0x47, "aget-boolean", Format23x, None, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER | F::ARRAY_GET;
    AgetByte = 0x48, "aget-byte", Format23x, None, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER | F::ARRAY_GET;
    AgetChar = 0x49, "aget-char", Format23x, None, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER | F::ARRAY_GET;
    AgetShort = 0x4a, "aget-short", Format23x, None, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER | F::ARRAY_GET;
    Aput = 0x4b, "aput", Format23x, None, None, F::CAN_THROW | F::CAN_CONTINUE | F::ARRAY_PUT;
    AputWide = 0x4c, "aput-wide", Format23x, None, None, F::CAN_THROW | F::CAN_CONTINUE | F::ARRAY_PUT;
    AputObject = 0x4d, "aput-object", Format23x, None, None, F::CAN_THROW | F::CAN_CONTINUE | F::ARRAY_PUT;
    AputBoolean = 0x4e, "aput-boolean", Format23x, None, None, F::CAN_THROW | F::CAN_CONTINUE | F::ARRAY_PUT;
    AputByte = 0x4f, "aput-byte", Format23x, None, None, F::CAN_THROW | F::CAN_CONTINUE | F::ARRAY_PUT;
    AputChar = 0x50, "aput-char", Format23x, None, None, F::CAN_THROW | F::CAN_CONTINUE | F::ARRAY_PUT;
    AputShort = 0x51, "aput-short", Format23x, None, None, F::CAN_THROW | F::CAN_CONTINUE | F::ARRAY_PUT;
    Iget = 0x52, "iget", Format22c, Field, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER | F::FIELD_GET;
    IgetWide = 0x53, "iget-wide", Format22c, Field, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER | F::FIELD_GET;
    IgetObject = 0x54, "iget-object", Format22c, Field, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER | F::FIELD_GET;
    IgetBoolean = 0x55, "iget-boolean", Format22c, Field, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER | F::FIELD_GET;
    IgetByte = 0x56, "iget-byte", Format22c, Field, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER | F::FIELD_GET;
    IgetChar = 0x57, "iget-char", Format22c, Field, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER | F::FIELD_GET;
    IgetShort = 0x58, "iget-short", Format22c, Field, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER | F::FIELD_GET;
    Iput = 0x59, "iput", Format22c, Field, None, F::CAN_THROW | F::CAN_CONTINUE | F::FIELD_PUT;
    IputWide = 0x5a, "iput-wide", Format22c, Field, None, F::CAN_THROW | F::CAN_CONTINUE | F::FIELD_PUT;
    IputObject = 0x5b, "iput-object", Format22c, Field, None, F::CAN_THROW | F::CAN_CONTINUE | F::FIELD_PUT;
    IputBoolean = 0x5c, "iput-boolean", Format22c, Field, None, F::CAN_THROW | F::CAN_CONTINUE | F::FIELD_PUT;
    IputByte = 0x5d, "iput-byte", Format22c, Field, None, F::CAN_THROW | F::CAN_CONTINUE | F::FIELD_PUT;
    IputChar = 0x5e, "iput-char", Format22c, Field, None, F::CAN_THROW | F::CAN_CONTINUE | F::FIELD_PUT;
    IputShort = 0x5f, "iput-short", Format22c, Field, None, F::CAN_THROW | F::CAN_CONTINUE | F::FIELD_PUT;
    Sget = 0x60, "sget", Format21c, Field, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER | F::FIELD_GET | F::STATIC_FIELD_ACCESSOR;
    SgetWide = 0x61, "sget-wide", Format21c, Field, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER | F::FIELD_GET | F::STATIC_FIELD_ACCESSOR;
    SgetObject = 0x62, "sget-object", Format21c, Field, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER | F::FIELD_GET | F::STATIC_FIELD_ACCESSOR;
    SgetBoolean = 0x63, "sget-boolean", Format21c, Field, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER | F::FIELD_GET | F::STATIC_FIELD_ACCESSOR;
    SgetByte = 0x64, "sget-byte", Format21c, Field, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER | F::FIELD_GET | F::STATIC_FIELD_ACCESSOR;
    SgetChar = 0x65, "sget-char", Format21c, Field, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER | F::FIELD_GET | F::STATIC_FIELD_ACCESSOR;
    SgetShort = 0x66, "sget-short", Format21c, Field, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER | F::FIELD_GET | F::STATIC_FIELD_ACCESSOR;
    Sput = 0x67, "sput", Format21c, Field, None, F::CAN_THROW | F::CAN_CONTINUE | F::FIELD_PUT | F::STATIC_FIELD_ACCESSOR;
    SputWide = 0x68, "sput-wide", Format21c, Field, None, F::CAN_THROW | F::CAN_CONTINUE | F::FIELD_PUT | F::STATIC_FIELD_ACCESSOR;
    SputObject = 0x69, "sput-object", Format21c, Field, None, F::CAN_THROW | F::CAN_CONTINUE | F::FIELD_PUT | F::STATIC_FIELD_ACCESSOR;
    SputBoolean = 0x6a, "sput-boolean", Format21c, Field, None, F::CAN_THROW | F::CAN_CONTINUE | F::FIELD_PUT | F::STATIC_FIELD_ACCESSOR;
    SputByte = 0x6b, "sput-byte", Format21c, Field, None, F::CAN_THROW | F::CAN_CONTINUE | F::FIELD_PUT | F::STATIC_FIELD_ACCESSOR;
    SputChar = 0x6c, "sput-char", Format21c, Field, None, F::CAN_THROW | F::CAN_CONTINUE | F::FIELD_PUT | F::STATIC_FIELD_ACCESSOR;
    SputShort = 0x6d, "sput-short", Format21c, Field, None, F::CAN_THROW | F::CAN_CONTINUE | F::FIELD_PUT | F::STATIC_FIELD_ACCESSOR;
    InvokeVirtual = 0x6e, "invoke-virtual", Format35c, Method, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_RESULT | F::INVOKE;
    InvokeSuper = 0x6f, "invoke-super", Format35c, Method, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_RESULT | F::INVOKE;
    InvokeDirect = 0x70, "invoke-direct", Format35c, Method, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_RESULT | F::INVOKE;
    InvokeStatic = 0x71, "invoke-static", Format35c, Method, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_RESULT | F::INVOKE | F::STATIC_INVOKE;
    InvokeInterface = 0x72, "invoke-interface", Format35c, Method, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_RESULT | F::INVOKE;
    ReturnVoidNoBarrier = 0x73, "return-void-no-barrier", Format10x, None, None, F::RETURN | F::ODEX_ONLY;
    InvokeVirtualRange = 0x74, "invoke-virtual/range", Format3rc, Method, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_RESULT | F::INVOKE;
    InvokeSuperRange = 0x75, "invoke-super/range", Format3rc, Method, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_RESULT | F::INVOKE;
    InvokeDirectRange = 0x76, "invoke-direct/range", Format3rc, Method, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_RESULT | F::INVOKE;
    InvokeStaticRange = 0x77, "invoke-static/range", Format3rc, Method, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_RESULT | F::INVOKE | F::STATIC_INVOKE;
    InvokeInterfaceRange = 0x78, "invoke-interface/range", Format3rc, Method, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_RESULT | F::INVOKE;
    NegInt = 0x7b, "neg-int", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    NotInt = 0x7c, "not-int", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    NegLong = 0x7d, "neg-long", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    NotLong = 0x7e, "not-long", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    NegFloat = 0x7f, "neg-float", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    NegDouble = 0x80, "neg-double", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    IntToLong = 0x81, "int-to-long", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    IntToFloat = 0x82, "int-to-float", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    IntToDouble = 0x83, "int-to-double", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    LongToInt = 0x84, "long-to-int", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    LongToFloat = 0x85, "long-to-float", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    LongToDouble = 0x86, "long-to-double", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    FloatToInt = 0x87, "float-to-int", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    FloatToLong = 0x88, "float-to-long", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    FloatToDouble = 0x89, "float-to-double", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    DoubleToInt = 0x8a, "double-to-int", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    DoubleToLong = 0x8b, "double-to-long", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    DoubleToFloat = 0x8c, "double-to-float", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    IntToByte = 0x8d, "int-to-byte", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    IntToChar = 0x8e, "int-to-char", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    IntToShort = 0x8f, "int-to-short", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    AddInt = 0x90, "add-int", Format23x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    SubInt = 0x91, "sub-int", Format23x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    MulInt = 0x92, "mul-int", Format23x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    DivInt = 0x93, "div-int", Format23x, None, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER;
    RemInt = 0x94, "rem-int", Format23x, None, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER;
    AndInt = 0x95, "and-int", Format23x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    OrInt = 0x96, "or-int", Format23x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    XorInt = 0x97, "xor-int", Format23x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    ShlInt = 0x98, "shl-int", Format23x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    ShrInt = 0x99, "shr-int", Format23x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    UshrInt = 0x9a, "ushr-int", Format23x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    AddLong = 0x9b, "add-long", Format23x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    SubLong = 0x9c, "sub-long", Format23x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    MulLong = 0x9d, "mul-long", Format23x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    DivLong = 0x9e, "div-long", Format23x, None, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    RemLong = 0x9f, "rem-long", Format23x, None, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    AndLong = 0xa0, "and-long", Format23x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    OrLong = 0xa1, "or-long", Format23x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    XorLong = 0xa2, "xor-long", Format23x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    ShlLong = 0xa3, "shl-long", Format23x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    ShrLong = 0xa4, "shr-long", Format23x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    UshrLong = 0xa5, "ushr-long", Format23x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    AddFloat = 0xa6, "add-float", Format23x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    SubFloat = 0xa7, "sub-float", Format23x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    MulFloat = 0xa8, "mul-float", Format23x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    DivFloat = 0xa9, "div-float", Format23x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    RemFloat = 0xaa, "rem-float", Format23x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    AddDouble = 0xab, "add-double", Format23x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    SubDouble = 0xac, "sub-double", Format23x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    MulDouble = 0xad, "mul-double", Format23x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    DivDouble = 0xae, "div-double", Format23x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    RemDouble = 0xaf, "rem-double", Format23x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    AddInt2Addr = 0xb0, "add-int/2addr", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    SubInt2Addr = 0xb1, "sub-int/2addr", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    MulInt2Addr = 0xb2, "mul-int/2addr", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    DivInt2Addr = 0xb3, "div-int/2addr", Format12x, None, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER;
    RemInt2Addr = 0xb4, "rem-int/2addr", Format12x, None, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER;
    AndInt2Addr = 0xb5, "and-int/2addr", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    OrInt2Addr = 0xb6, "or-int/2addr", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    XorInt2Addr = 0xb7, "xor-int/2addr", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    ShlInt2Addr = 0xb8, "shl-int/2addr", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    ShrInt2Addr = 0xb9, "shr-int/2addr", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    UshrInt2Addr = 0xba, "ushr-int/2addr", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    AddLong2Addr = 0xbb, "add-long/2addr", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    SubLong2Addr = 0xbc, "sub-long/2addr", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    MulLong2Addr = 0xbd, "mul-long/2addr", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    DivLong2Addr = 0xbe, "div-long/2addr", Format12x, None, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    RemLong2Addr = 0xbf, "rem-long/2addr", Format12x, None, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    AndLong2Addr = 0xc0, "and-long/2addr", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    OrLong2Addr = 0xc1, "or-long/2addr", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    XorLong2Addr = 0xc2, "xor-long/2addr", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    ShlLong2Addr = 0xc3, "shl-long/2addr", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    ShrLong2Addr = 0xc4, "shr-long/2addr", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    UshrLong2Addr = 0xc5, "ushr-long/2addr", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    AddFloat2Addr = 0xc6, "add-float/2addr", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    SubFloat2Addr = 0xc7, "sub-float/2addr", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    MulFloat2Addr = 0xc8, "mul-float/2addr", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    DivFloat2Addr = 0xc9, "div-float/2addr", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    RemFloat2Addr = 0xca, "rem-float/2addr", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    AddDouble2Addr = 0xcb, "add-double/2addr", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    SubDouble2Addr = 0xcc, "sub-double/2addr", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    MulDouble2Addr = 0xcd, "mul-double/2addr", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    DivDouble2Addr = 0xce, "div-double/2addr", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    RemDouble2Addr = 0xcf, "rem-double/2addr", Format12x, None, None, F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER;
    AddIntLit16 = 0xd0, "add-int/lit16", Format22s, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    RsubInt = 0xd1, "rsub-int", Format22s, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    MulIntLit16 = 0xd2, "mul-int/lit16", Format22s, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    DivIntLit16 = 0xd3, "div-int/lit16", Format22s, None, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER;
    RemIntLit16 = 0xd4, "rem-int/lit16", Format22s, None, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER;
    AndIntLit16 = 0xd5, "and-int/lit16", Format22s, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    OrIntLit16 = 0xd6, "or-int/lit16", Format22s, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    XorIntLit16 = 0xd7, "xor-int/lit16", Format22s, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    AddIntLit8 = 0xd8, "add-int/lit8", Format22b, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    RsubIntLit8 = 0xd9, "rsub-int/lit8", Format22b, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    MulIntLit8 = 0xda, "mul-int/lit8", Format22b, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    DivIntLit8 = 0xdb, "div-int/lit8", Format22b, None, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER;
    RemIntLit8 = 0xdc, "rem-int/lit8", Format22b, None, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER;
    AndIntLit8 = 0xdd, "and-int/lit8", Format22b, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    OrIntLit8 = 0xde, "or-int/lit8", Format22b, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    XorIntLit8 = 0xdf, "xor-int/lit8", Format22b, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    ShlIntLit8 = 0xe0, "shl-int/lit8", Format22b, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    ShrIntLit8 = 0xe1, "shr-int/lit8", Format22b, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    UshrIntLit8 = 0xe2, "ushr-int/lit8", Format22b, None, None, F::CAN_CONTINUE | F::SETS_REGISTER;
    IgetQuick = 0xe3, "iget-quick", Format22cs, FieldOffset, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER | F::FIELD_GET | F::QUICK_FIELD_ACCESSOR | F::ODEX_ONLY;
    IgetWideQuick = 0xe4, "iget-wide-quick", Format22cs, FieldOffset, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER | F::SETS_WIDE_REGISTER | F::FIELD_GET | F::QUICK_FIELD_ACCESSOR | F::ODEX_ONLY;
    IgetObjectQuick = 0xe5, "iget-object-quick", Format22cs, FieldOffset, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER | F::FIELD_GET | F::QUICK_FIELD_ACCESSOR | F::ODEX_ONLY;
    IputQuick = 0xe6, "iput-quick", Format22cs, FieldOffset, None, F::CAN_THROW | F::CAN_CONTINUE | F::FIELD_PUT | F::QUICK_FIELD_ACCESSOR | F::ODEX_ONLY;
    IputWideQuick = 0xe7, "iput-wide-quick", Format22cs, FieldOffset, None, F::CAN_THROW | F::CAN_CONTINUE | F::FIELD_PUT | F::QUICK_FIELD_ACCESSOR | F::ODEX_ONLY;
    IputObjectQuick = 0xe8, "iput-object-quick", Format22cs, FieldOffset, None, F::CAN_THROW | F::CAN_CONTINUE | F::FIELD_PUT | F::QUICK_FIELD_ACCESSOR | F::ODEX_ONLY;
    InvokeVirtualQuick = 0xe9, "invoke-virtual-quick", Format35ms, VtableIndex, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_RESULT | F::INVOKE | F::ODEX_ONLY;
    InvokeVirtualQuickRange = 0xea, "invoke-virtual-quick/range", Format3rms, VtableIndex, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_RESULT | F::INVOKE | F::ODEX_ONLY;
    IputBooleanQuick = 0xeb, "iput-boolean-quick", Format22cs, FieldOffset, None, F::CAN_THROW | F::CAN_CONTINUE | F::FIELD_PUT | F::QUICK_FIELD_ACCESSOR | F::ODEX_ONLY;
    IputByteQuick = 0xec, "iput-byte-quick", Format22cs, FieldOffset, None, F::CAN_THROW | F::CAN_CONTINUE | F::FIELD_PUT | F::QUICK_FIELD_ACCESSOR | F::ODEX_ONLY;
    IputCharQuick = 0xed, "iput-char-quick", Format22cs, FieldOffset, None, F::CAN_THROW | F::CAN_CONTINUE | F::FIELD_PUT | F::QUICK_FIELD_ACCESSOR | F::ODEX_ONLY;
    IputShortQuick = 0xee, "iput-short-quick", Format22cs, FieldOffset, None, F::CAN_THROW | F::CAN_CONTINUE | F::FIELD_PUT | F::QUICK_FIELD_ACCESSOR | F::ODEX_ONLY;
    IgetBooleanQuick = 0xef, "iget-boolean-quick", Format22cs, FieldOffset, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER | F::FIELD_GET | F::QUICK_FIELD_ACCESSOR | F::ODEX_ONLY;
    IgetByteQuick = 0xf0, "iget-byte-quick", Format22cs, FieldOffset, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER | F::FIELD_GET | F::QUICK_FIELD_ACCESSOR | F::ODEX_ONLY;
    IgetCharQuick = 0xf1, "iget-char-quick", Format22cs, FieldOffset, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER | F::FIELD_GET | F::QUICK_FIELD_ACCESSOR | F::ODEX_ONLY;
    IgetShortQuick = 0xf2, "iget-short-quick", Format22cs, FieldOffset, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER | F::FIELD_GET | F::QUICK_FIELD_ACCESSOR | F::ODEX_ONLY;
    InvokePolymorphic = 0xfa, "invoke-polymorphic", Format45cc, Method, MethodProto, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_RESULT | F::INVOKE;
    InvokePolymorphicRange = 0xfb, "invoke-polymorphic/range", Format4rcc, Method, MethodProto, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_RESULT | F::INVOKE;
    InvokeCustom = 0xfc, "invoke-custom", Format35c, CallSite, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_RESULT | F::INVOKE;
    InvokeCustomRange = 0xfd, "invoke-custom/range", Format3rc, CallSite, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_RESULT | F::INVOKE;
    ConstMethodHandle = 0xfe, "const-method-handle", Format21c, MethodHandle, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER;
    ConstMethodType = 0xff, "const-method-type", Format21c, MethodProto, None, F::CAN_THROW | F::CAN_CONTINUE | F::SETS_REGISTER;
    PackedSwitchPayload = 0x100, "packed-switch-payload", PackedSwitchPayload, None, None, F::PAYLOAD;
    SparseSwitchPayload = 0x200, "sparse-switch-payload", SparseSwitchPayload, None, None, F::PAYLOAD;
    FillArrayDataPayload = 0x300, "array-payload", ArrayPayload, None, None, F::PAYLOAD;
}

// Opcode lookup by the low byte of an instruction's first code unit
static BY_VALUE: Lazy<[Option<Opcode>; 256]> = Lazy::new(|| {
    let mut table = [None; 256];
    for info in OPCODES.iter().filter(|i| !i.format.is_payload_format()) {
        table[info.value as usize] = Some(info.opcode);
    }
    table
});

impl Opcode
{
    /// Looks up a non-payload opcode by its byte value.
    pub fn from_u8(value: u8) -> Option<Opcode>
    {
        BY_VALUE[value as usize]
    }

    /// Looks up the opcode starting with the code unit `unit`, including the
    /// `nop`-prefixed payload pseudo-instructions.
    pub fn from_code_unit(unit: u16) -> Option<Opcode>
    {
        match unit {
            0x0100 => Some(Opcode::PackedSwitchPayload),
            0x0200 => Some(Opcode::SparseSwitchPayload),
            0x0300 => Some(Opcode::FillArrayDataPayload),
            _ => Opcode::from_u8((unit & 0xff) as u8),
        }
    }

    pub fn info(self) -> &'static OpcodeInfo
    {
        &OPCODES[self as usize]
    }

    pub fn all() -> impl Iterator<Item = Opcode>
    {
        OPCODES.iter().map(|i| i.opcode)
    }

    pub fn value(self) -> u16 { self.info().value }
    pub fn name(self) -> &'static str { self.info().name }
    pub fn format(self) -> Format { self.info().format }
    pub fn flags(self) -> OpcodeFlags { self.info().flags }
    pub fn reference_type(self) -> ReferenceType { self.info().reference_type }

    pub fn reference_type2(self) -> Option<ReferenceType>
    {
        match self.info().reference_type2 {
            ReferenceType::None => None,
            r => Some(r),
        }
    }

    /// Instance, static and quick field reads.
    pub fn is_getter(self) -> bool { self.flags().contains(F::FIELD_GET) }
    /// Instance, static and quick field writes.
    pub fn is_setter(self) -> bool { self.flags().contains(F::FIELD_PUT) }
    pub fn is_static_field_accessor(self) -> bool { self.flags().contains(F::STATIC_FIELD_ACCESSOR) }

    /// Quickened accessors and invokes, which refer to offsets instead of pool entries.
    pub fn is_quick(self) -> bool
    {
        matches!(self.reference_type(), ReferenceType::FieldOffset | ReferenceType::VtableIndex)
    }

    pub fn is_return(self) -> bool { self.flags().contains(F::RETURN) }
    pub fn is_invoke(self) -> bool { self.flags().contains(F::INVOKE) }
    pub fn is_invoke_static(self) -> bool { self.flags().contains(F::STATIC_INVOKE) }
    pub fn is_array_access(self) -> bool { self.flags().intersects(F::ARRAY_GET | F::ARRAY_PUT) }
    pub fn is_branch(self) -> bool { self.flags().contains(F::BRANCH) }
    pub fn is_payload(self) -> bool { self.flags().contains(F::PAYLOAD) }
    pub fn can_throw(self) -> bool { self.flags().contains(F::CAN_THROW) }
    pub fn can_continue(self) -> bool { self.flags().contains(F::CAN_CONTINUE) }
    pub fn sets_register(self) -> bool { self.flags().contains(F::SETS_REGISTER) }
    pub fn sets_wide_register(self) -> bool { self.flags().contains(F::SETS_WIDE_REGISTER) }
}

impl fmt::Display for Opcode
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(self.name())
    }
}
