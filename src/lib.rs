//! # dexcode
//!
//! A reader for Android DEX (Dalvik Executable) files: classes, fields and
//! methods, with every method body decoded into instructions and correlated
//! to source lines through the method's debug info.
//!
//! # Examples
//!
//! ```no_run
//!  use dexcode::load_dex;
//!
//!  let bytes = std::fs::read("classes.dex").unwrap();
//!  let dex = load_dex(&bytes).unwrap();
//!  let method = dex.method("Lcom/example/AddClass;", "addInt(III)").unwrap();
//!  for insn in method.byte_code().instructions_for_line_number(20) {
//!      println!("{}", insn);
//!  }
//! ```

#[macro_use]
pub mod dex;
pub mod types;

#[cfg(test)]
mod tests;

pub use dex::error::{DexError, DexErrorKind};
pub use dex::instructions::{DexBytecode, Instruction, Operand};
pub use dex::debug_info::{DexMethodDebugInfo, LineTableEntry};
pub use dex::loader::{load_dex, Dex, DexOptions};
pub use dex::opcodes::Opcode;
pub use types::{AccessFlags, DexClass, DexField, DexMethod, TypeDescriptor};
