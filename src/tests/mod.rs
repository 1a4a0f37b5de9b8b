pub(crate) mod builder;

mod properties;

use builder::{TestClass, TestCode, TestDebug, DexBuilder, TestMethod};

// Classes shared by the scenario and property tests
pub(crate) fn fixture() -> Vec<u8>
{
    let mut b = DexBuilder::new();

    // add-int v0, v1, v2 / add-int v0, v0, v2 / return v0
    let add_int = TestCode::new(3, 2, 0, &[0x0090, 0x0201, 0x0090, 0x0200, 0x000f])
        .debug(TestDebug::new(10).param(Some("a")).param(Some("b")).line(0, 0).line(4, 1));
    b.add_class(
        TestClass::new("LAddClass;")
            .source_file("AddClass.java")
            .direct(TestMethod::new("<init>", "V", &[]).access(0x10001).code(TestCode::new(1, 1, 0, &[0x000e])))
            .direct(TestMethod::new("addInt", "I", &["I", "I"]).access(0x9).code(add_int))
            .direct(TestMethod::new("nativeAdd", "I", &["I", "I"]).access(0x109)),
    );

    // line 20: move v0, v3 / add-int v1, v0, v3
    // line 22: mul-int v1, v1, v0
    // line 25: return v1
    let invoke_math = TestCode::new(4, 1, 0, &[0x3001, 0x0190, 0x0300, 0x0192, 0x0001, 0x010f])
        .debug(TestDebug::new(20).line(0, 0).line(3, 2).line(2, 3));
    // line 30: add-int v0, v2, v2 / add-int/2addr v0, v2 (three times)
    // line 31: return v0
    let multi = TestCode::new(3, 1, 0, &[0x0090, 0x0202, 0x20b0, 0x20b0, 0x20b0, 0x000f])
        .debug(TestDebug::new(30).line(0, 0).line(5, 1));
    b.add_class(
        TestClass::new("LByteCodeClass;")
            .source_file("ByteCodeClass.java")
            .direct(TestMethod::new("invokeMath", "I", &["I"]).access(0x9).code(invoke_math))
            .direct(TestMethod::new("multiInstructionPerLine", "I", &["I"]).access(0x9).code(multi)),
    );

    let own = "Lcom/pkg/ClassInPackage;";
    b.add_class(
        TestClass::new(own)
            .direct(TestMethod::new("<init>", "V", &[]).access(0x10001).code(TestCode::new(1, 1, 0, &[0x000e])))
            .virtual_(TestMethod::new("f", "F", &["F"]).code(TestCode::new(2, 2, 0, &[0x010f])))
            .virtual_(TestMethod::new("i", "I", &["I"]).code(TestCode::new(2, 2, 0, &[0x010f])))
            .virtual_(TestMethod::new("l", "J", &["J"]).code(TestCode::new(3, 3, 0, &[0x0110])))
            .virtual_(TestMethod::new("d", "D", &["D"]).code(TestCode::new(3, 3, 0, &[0x0110])))
            .virtual_(
                TestMethod::new("o", "Ljava/lang/Object;", &["Ljava/lang/Object;", "Ljava/lang/String;", own])
                    .code(TestCode::new(4, 4, 0, &[0x0111])),
            ),
    );

    b.add_class(TestClass::new("LEmpty;"));
    b.build()
}
