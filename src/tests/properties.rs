use crate::dex::loader::{Dex, DexOptions};
use crate::dex::DexErrorKind;
use crate::load_dex;
use crate::tests::builder::{TestClass, TestCode, DebugOp, TestDebug, DexBuilder, TestMethod};
use crate::tests::fixture;
use crate::types::DexMethod;

fn all_methods(dex: &Dex) -> impl Iterator<Item = &DexMethod> {
    dex.classes().values().flat_map(|c| c.methods().values())
}

fn single_method(code: TestCode) -> Vec<u8> {
    let mut b = DexBuilder::new();
    b.add_class(TestClass::new("LBroken;").direct(TestMethod::new("run", "V", &[]).access(0x9).code(code)));
    b.build()
}

#[test]
fn instruction_lengths_cover_bytes() {
    let dex = load_dex(&fixture()).unwrap();
    for method in all_methods(&dex) {
        let code = method.byte_code();
        let total: usize = code.instructions().iter().map(|i| i.len()).sum();
        assert_eq!(total, code.bytes().len(), "{}", method.key());
    }
}

#[test]
fn line_table_addresses_never_decrease() {
    let dex = load_dex(&fixture()).unwrap();
    for method in all_methods(&dex) {
        let table = &method.byte_code().debug_info().line_table;
        assert!(table.windows(2).all(|w| w[0].address <= w[1].address), "{}", method.key());
    }
}

#[test]
fn lines_partition_instructions() {
    let dex = load_dex(&fixture()).unwrap();
    let mut checked = 0;
    for method in all_methods(&dex) {
        let code = method.byte_code();
        if code.debug_info().line_table.is_empty() {
            continue;
        }
        let mut offsets: Vec<u32> = code
            .line_numbers()
            .into_iter()
            .flat_map(|line| code.instructions_for_line_number(line))
            .map(|i| i.offset)
            .collect();
        offsets.sort_unstable();
        let expected: Vec<u32> = code.instructions().iter().map(|i| i.offset).collect();
        assert_eq!(offsets, expected, "{}", method.key());
        checked += 1;
    }
    assert_eq!(checked, 3);
}

#[test]
fn native_methods_have_no_code() {
    let dex = load_dex(&fixture()).unwrap();
    let native = dex.method("LAddClass;", "nativeAdd(III)").unwrap();
    assert!(native.is_native());
    for method in all_methods(&dex).filter(|m| m.is_native()) {
        assert!(method.byte_code().instructions().is_empty());
        assert!(method.byte_code().bytes().is_empty());
    }
}

#[test]
fn missing_class_differs_from_missing_method() {
    let dex = load_dex(&fixture()).unwrap();

    let no_class = dex.method("LNowhere;", "run(V)").unwrap_err();
    let no_method = dex.method("LAddClass;", "run(V)").unwrap_err();
    assert!(matches!(no_class.kind(), DexErrorKind::ClassNotFound { .. }));
    match no_method.kind() {
        DexErrorKind::MethodNotFound { class, key, available } => {
            assert_eq!(class, "LAddClass;");
            assert_eq!(key, "run(V)");
            assert!(available.iter().any(|k| k == "addInt(III)"));
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert!(no_class.is_not_found() && no_method.is_not_found());
}

#[test]
fn rejects_bad_magic_and_truncation() {
    let mut bytes = fixture();
    bytes[1] = b'x';
    assert!(matches!(load_dex(&bytes).unwrap_err().kind(), DexErrorKind::InvalidFormat(_)));

    let bytes = fixture();
    let e = load_dex(&bytes[..bytes.len() / 2]).unwrap_err();
    assert!(matches!(e.kind(), DexErrorKind::InvalidFormat(_)));
}

#[test]
fn unknown_opcode_fails_the_load() {
    // return-void, then the unused byte 0x3e
    let bytes = single_method(TestCode::new(1, 0, 0, &[0x000e, 0x003e]));
    let e = load_dex(&bytes).unwrap_err();
    assert!(matches!(e.kind(), DexErrorKind::UnknownOpcode { offset: 2, value: 0x3e }));
    let message = e.to_string();
    assert!(message.contains("LBroken;"), "{}", message);
    assert!(message.contains("run(V)"), "{}", message);
}

#[test]
fn negative_line_is_malformed_debug_info() {
    let debug = TestDebug::new(1).line(0, 0).op(DebugOp::AdvanceLine(-5)).line(0, 0);
    let bytes = single_method(TestCode::new(1, 0, 0, &[0x000e]).debug(debug));
    let e = load_dex(&bytes).unwrap_err();
    assert!(matches!(e.kind(), DexErrorKind::MalformedDebugInfo(_)));
}

#[test]
fn locals_and_markers_are_resolved() {
    let debug = TestDebug::new(5)
        .op(DebugOp::PrologueEnd)
        .line(0, 0)
        .op(DebugOp::StartLocal { register: 0, name: "count".to_string(), type_desc: "I".to_string() })
        .line(1, 1)
        .op(DebugOp::EndLocal(0))
        .op(DebugOp::SetFile(Some("Other.java".to_string())))
        .op(DebugOp::EpilogueBegin)
        .line(1, 1);
    // const/4 v0, 1 / nop / return-void
    let bytes = single_method(TestCode::new(1, 0, 0, &[0x1012, 0x0000, 0x000e]).debug(debug));
    let dex = load_dex(&bytes).unwrap();
    let info = dex.method("LBroken;", "run(V)").unwrap().byte_code().debug_info();

    assert_eq!(info.prologue_end, Some(0));
    assert_eq!(info.epilogue_begin, Some(1));
    assert_eq!(info.locals.len(), 1);
    assert_eq!(info.locals[0].name.as_deref(), Some("count"));
    assert_eq!(info.locals[0].type_desc.as_deref(), Some("I"));
    assert_eq!((info.locals[0].start_address, info.locals[0].end_address), (0, 1));
    assert_eq!(info.source_files, vec![(1, Some("Other.java".to_string()))]);
    assert_eq!(info.line_table.iter().map(|e| e.line_number).collect::<Vec<_>>(), vec![5, 6, 7]);
}

#[test]
fn strict_options_verify_integrity() {
    let mut bytes = fixture();
    Dex::from_bytes_with_options(&bytes, DexOptions::strict()).unwrap();

    // the final byte belongs to the map list, which loading never reads
    let last = bytes.len() - 1;
    bytes[last] ^= 0x01;
    assert!(load_dex(&bytes).is_ok());
    let e = Dex::from_bytes_with_options(&bytes, DexOptions::strict()).unwrap_err();
    assert!(matches!(e.kind(), DexErrorKind::InvalidFormat(_)));
}

#[test]
fn loads_from_file() {
    let path = std::env::temp_dir().join(format!("dexcode-fixture-{}.dex", std::process::id()));
    std::fs::write(&path, fixture()).unwrap();
    let dex = Dex::from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(dex.version(), 35);
    assert_eq!(dex.classes().len(), 4);
}
