//! A small DEX assembler for tests. It covers the parts of the format the
//! reader decodes: id tables, class data, code items and debug info.

use std::collections::{BTreeMap, BTreeSet};

use adler::adler32_slice;
use sha1::{Digest, Sha1};

use crate::dex::dex_file::{ENDIAN_CONSTANT, HEADER_SIZE, NO_INDEX};
use crate::dex::{write_sleb128, write_u1, write_u2, write_u4, write_uleb128, write_uleb128p1, write_x};
use crate::types::{shorty_of, TypeDescriptor};

const TYPE_HEADER_ITEM: u16 = 0x0000;
const TYPE_STRING_ID_ITEM: u16 = 0x0001;
const TYPE_TYPE_ID_ITEM: u16 = 0x0002;
const TYPE_PROTO_ID_ITEM: u16 = 0x0003;
const TYPE_FIELD_ID_ITEM: u16 = 0x0004;
const TYPE_METHOD_ID_ITEM: u16 = 0x0005;
const TYPE_CLASS_DEF_ITEM: u16 = 0x0006;
const TYPE_MAP_LIST: u16 = 0x1000;
const TYPE_TYPE_LIST: u16 = 0x1001;
const TYPE_CLASS_DATA_ITEM: u16 = 0x2000;
const TYPE_CODE_ITEM: u16 = 0x2001;
const TYPE_STRING_DATA_ITEM: u16 = 0x2002;
const TYPE_DEBUG_INFO_ITEM: u16 = 0x2003;

const DEX_MAGIC_035: &[u8; 8] = b"dex\n035\0";

/// One step of a debug_info program.
#[derive(Debug, Clone)]
pub(crate) enum DebugOp {
    AdvancePc(u32),
    AdvanceLine(i32),
    StartLocal { register: u32, name: String, type_desc: String },
    StartLocalExtended { register: u32, name: String, type_desc: String, signature: String },
    EndLocal(u32),
    RestartLocal(u32),
    SetFile(Option<String>),
    PrologueEnd,
    EpilogueBegin,
    /// Advance `addr` code units and `line` lines, then emit a row.
    Line { addr: u32, line: i32 },
    /// Copied verbatim into the program.
    Raw(Vec<u8>),
}

#[derive(Debug, Clone, Default)]
pub(crate) struct TestDebug {
    pub line_start: u32,
    pub parameter_names: Vec<Option<String>>,
    pub ops: Vec<DebugOp>,
}

impl TestDebug
{
    pub fn new(line_start: u32) -> Self
    {
        TestDebug { line_start, ..TestDebug::default() }
    }

    pub fn param(mut self, name: Option<&str>) -> Self
    {
        self.parameter_names.push(name.map(str::to_string));
        self
    }

    pub fn line(self, addr: u32, line: i32) -> Self
    {
        self.op(DebugOp::Line { addr, line })
    }

    pub fn op(mut self, op: DebugOp) -> Self
    {
        self.ops.push(op);
        self
    }
}

#[derive(Debug, Clone)]
pub(crate) struct TestCode {
    pub registers: u16,
    pub ins: u16,
    pub outs: u16,
    pub insns: Vec<u16>,
    pub debug: Option<TestDebug>,
}

impl TestCode
{
    pub fn new(registers: u16, ins: u16, outs: u16, insns: &[u16]) -> Self
    {
        TestCode { registers, ins, outs, insns: insns.to_vec(), debug: None }
    }

    pub fn debug(mut self, debug: TestDebug) -> Self
    {
        self.debug = Some(debug);
        self
    }
}

#[derive(Debug, Clone)]
pub(crate) struct TestMethod {
    pub name: String,
    pub return_type: String,
    pub parameters: Vec<String>,
    pub access: u32,
    pub code: Option<TestCode>,
}

impl TestMethod
{
    pub fn new(name: &str, return_type: &str, parameters: &[&str]) -> Self
    {
        TestMethod {
            name: name.to_string(),
            return_type: return_type.to_string(),
            parameters: parameters.iter().map(|p| p.to_string()).collect(),
            access: 0x1,
            code: None,
        }
    }

    pub fn access(mut self, access: u32) -> Self
    {
        self.access = access;
        self
    }

    pub fn code(mut self, code: TestCode) -> Self
    {
        self.code = Some(code);
        self
    }

    fn shorty(&self) -> String
    {
        let parse = |t: &String| TypeDescriptor::parse(t).unwrap_or_else(|e| panic!("{}: {}", t, e));
        let params: Vec<TypeDescriptor> = self.parameters.iter().map(parse).collect();
        shorty_of(&parse(&self.return_type), &params)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct TestField {
    pub name: String,
    pub type_desc: String,
    pub access: u32,
}

#[derive(Debug, Clone)]
pub(crate) struct TestClass {
    pub name: String,
    pub access: u32,
    pub superclass: Option<String>,
    pub interfaces: Vec<String>,
    pub source_file: Option<String>,
    pub static_fields: Vec<TestField>,
    pub instance_fields: Vec<TestField>,
    pub direct_methods: Vec<TestMethod>,
    pub virtual_methods: Vec<TestMethod>,
}

impl TestClass
{
    pub fn new(name: &str) -> Self
    {
        TestClass {
            name: name.to_string(),
            access: 0x1,
            superclass: Some("Ljava/lang/Object;".to_string()),
            interfaces: vec![],
            source_file: None,
            static_fields: vec![],
            instance_fields: vec![],
            direct_methods: vec![],
            virtual_methods: vec![],
        }
    }

    pub fn access(mut self, access: u32) -> Self
    {
        self.access = access;
        self
    }

    pub fn superclass(mut self, superclass: Option<&str>) -> Self
    {
        self.superclass = superclass.map(str::to_string);
        self
    }

    pub fn interface(mut self, interface: &str) -> Self
    {
        self.interfaces.push(interface.to_string());
        self
    }

    pub fn source_file(mut self, file: &str) -> Self
    {
        self.source_file = Some(file.to_string());
        self
    }

    pub fn static_field(mut self, name: &str, type_desc: &str, access: u32) -> Self
    {
        self.static_fields.push(TestField { name: name.to_string(), type_desc: type_desc.to_string(), access });
        self
    }

    pub fn instance_field(mut self, name: &str, type_desc: &str, access: u32) -> Self
    {
        self.instance_fields.push(TestField { name: name.to_string(), type_desc: type_desc.to_string(), access });
        self
    }

    pub fn direct(mut self, method: TestMethod) -> Self
    {
        self.direct_methods.push(method);
        self
    }

    pub fn virtual_(mut self, method: TestMethod) -> Self
    {
        self.virtual_methods.push(method);
        self
    }

    fn fields(&self) -> impl Iterator<Item = &TestField>
    {
        self.static_fields.iter().chain(self.instance_fields.iter())
    }

    fn methods(&self) -> impl Iterator<Item = &TestMethod>
    {
        self.direct_methods.iter().chain(self.virtual_methods.iter())
    }
}

// Sorted, deduplicated id tables. Fields and methods are stored in their sort
// order: (class, name, type) and (class, name, proto).
#[derive(Debug, Default)]
struct Pools {
    strings: Vec<String>,
    types: Vec<String>,
    protos: Vec<(u32, Vec<u32>, u32)>,
    fields: Vec<(u32, u32, u32)>,
    methods: Vec<(u32, u32, u32)>,
}

impl Pools
{
    fn collect(classes: &[TestClass]) -> Pools
    {
        let mut strings = BTreeSet::new();
        let mut types = BTreeSet::new();
        for class in classes {
            types.insert(class.name.clone());
            types.extend(class.superclass.iter().cloned());
            types.extend(class.interfaces.iter().cloned());
            strings.extend(class.source_file.iter().cloned());
            for field in class.fields() {
                strings.insert(field.name.clone());
                types.insert(field.type_desc.clone());
            }
            for method in class.methods() {
                strings.insert(method.name.clone());
                strings.insert(method.shorty());
                types.insert(method.return_type.clone());
                types.extend(method.parameters.iter().cloned());
                let Some(debug) = method.code.as_ref().and_then(|c| c.debug.as_ref()) else {
                    continue;
                };
                strings.extend(debug.parameter_names.iter().flatten().cloned());
                for op in &debug.ops {
                    match op {
                        DebugOp::StartLocal { name, type_desc, .. } => {
                            strings.insert(name.clone());
                            types.insert(type_desc.clone());
                        }
                        DebugOp::StartLocalExtended { name, type_desc, signature, .. } => {
                            strings.insert(name.clone());
                            strings.insert(signature.clone());
                            types.insert(type_desc.clone());
                        }
                        DebugOp::SetFile(Some(file)) => {
                            strings.insert(file.clone());
                        }
                        _ => {}
                    }
                }
            }
        }
        strings.extend(types.iter().cloned());

        let mut pools = Pools {
            strings: strings.into_iter().collect(),
            types: types.into_iter().collect(),
            ..Pools::default()
        };

        let protos: BTreeSet<_> = classes
            .iter()
            .flat_map(|c| c.methods())
            .map(|m| pools.proto_key(m))
            .collect();
        pools.protos = protos.into_iter().collect();

        let mut fields = BTreeSet::new();
        let mut methods = BTreeSet::new();
        for class in classes {
            let class_idx = pools.type_idx(&class.name);
            for field in class.fields() {
                fields.insert((class_idx, pools.string_idx(&field.name), pools.type_idx(&field.type_desc)));
            }
            for method in class.methods() {
                methods.insert((class_idx, pools.string_idx(&method.name), pools.proto_idx(method)));
            }
        }
        pools.fields = fields.into_iter().collect();
        pools.methods = methods.into_iter().collect();
        pools
    }

    fn string_idx(&self, s: &str) -> u32
    {
        self.strings.binary_search_by(|p| p.as_str().cmp(s)).expect("string not pooled") as u32
    }

    fn type_idx(&self, desc: &str) -> u32
    {
        self.types.binary_search_by(|p| p.as_str().cmp(desc)).expect("type not pooled") as u32
    }

    fn proto_key(&self, method: &TestMethod) -> (u32, Vec<u32>, u32)
    {
        (
            self.type_idx(&method.return_type),
            method.parameters.iter().map(|p| self.type_idx(p)).collect(),
            self.string_idx(&method.shorty()),
        )
    }

    fn proto_idx(&self, method: &TestMethod) -> u32
    {
        let key = self.proto_key(method);
        self.protos.binary_search(&key).expect("proto not pooled") as u32
    }

    fn field_idx(&self, class: &str, field: &TestField) -> u32
    {
        let key = (self.type_idx(class), self.string_idx(&field.name), self.type_idx(&field.type_desc));
        self.fields.binary_search(&key).expect("field not pooled") as u32
    }

    fn method_idx(&self, class: &str, method: &TestMethod) -> u32
    {
        let key = (self.type_idx(class), self.string_idx(&method.name), self.proto_idx(method));
        self.methods.binary_search(&key).expect("method not pooled") as u32
    }
}

// Everything after the id tables, addressed by absolute file offset
struct DataSection {
    base: usize,
    bytes: Vec<u8>,
}

impl DataSection
{
    fn offset(&self) -> u32
    {
        (self.base + self.bytes.len()) as u32
    }

    fn align(&mut self, alignment: usize)
    {
        while (self.base + self.bytes.len()) % alignment != 0 {
            self.bytes.push(0);
        }
    }
}

fn write_debug_info(data: &mut DataSection, pools: &Pools, debug: &TestDebug) -> u32
{
    let off = data.offset();
    let buf = &mut data.bytes;
    write_uleb128(buf, debug.line_start);
    write_uleb128(buf, debug.parameter_names.len() as u32);
    for name in &debug.parameter_names {
        write_uleb128p1(buf, name.as_deref().map(|n| pools.string_idx(n)));
    }
    for op in &debug.ops {
        match op {
            DebugOp::AdvancePc(addr) => {
                write_u1(buf, 0x01);
                write_uleb128(buf, *addr);
            }
            DebugOp::AdvanceLine(line) => {
                write_u1(buf, 0x02);
                write_sleb128(buf, *line);
            }
            DebugOp::StartLocal { register, name, type_desc } => {
                write_u1(buf, 0x03);
                write_uleb128(buf, *register);
                write_uleb128p1(buf, Some(pools.string_idx(name)));
                write_uleb128p1(buf, Some(pools.type_idx(type_desc)));
            }
            DebugOp::StartLocalExtended { register, name, type_desc, signature } => {
                write_u1(buf, 0x04);
                write_uleb128(buf, *register);
                write_uleb128p1(buf, Some(pools.string_idx(name)));
                write_uleb128p1(buf, Some(pools.type_idx(type_desc)));
                write_uleb128p1(buf, Some(pools.string_idx(signature)));
            }
            DebugOp::EndLocal(register) => {
                write_u1(buf, 0x05);
                write_uleb128(buf, *register);
            }
            DebugOp::RestartLocal(register) => {
                write_u1(buf, 0x06);
                write_uleb128(buf, *register);
            }
            DebugOp::SetFile(file) => {
                write_u1(buf, 0x07);
                write_uleb128p1(buf, file.as_deref().map(|f| pools.string_idx(f)));
            }
            DebugOp::PrologueEnd => {
                write_u1(buf, 0x08);
            }
            DebugOp::EpilogueBegin => {
                write_u1(buf, 0x09);
            }
            DebugOp::Line { addr, line } => {
                let adjusted = (*line as i64 + 4) + 15 * *addr as i64;
                if (0..15).contains(&(*line + 4)) && adjusted + 0x0a <= 0xff {
                    write_u1(buf, (adjusted + 0x0a) as u8);
                } else {
                    write_u1(buf, 0x01);
                    write_uleb128(buf, *addr);
                    write_u1(buf, 0x02);
                    write_sleb128(buf, *line);
                    // special opcode with no movement
                    write_u1(buf, 0x0a + 4);
                }
            }
            DebugOp::Raw(raw) => {
                write_x(buf, raw);
            }
        }
    }
    write_u1(buf, 0x00);
    off
}

fn write_code_item(data: &mut DataSection, code: &TestCode, debug_off: u32) -> u32
{
    data.align(4);
    let off = data.offset();
    let buf = &mut data.bytes;
    write_u2(buf, code.registers);
    write_u2(buf, code.ins);
    write_u2(buf, code.outs);
    write_u2(buf, 0);
    write_u4(buf, debug_off);
    write_u4(buf, code.insns.len() as u32);
    for unit in &code.insns {
        write_u2(buf, *unit);
    }
    off
}

fn write_class_data(data: &mut DataSection, pools: &Pools, class: &TestClass, code_offs: &[u32]) -> u32
{
    let off = data.offset();

    let encode_fields = |fields: &[TestField]| {
        let mut entries: Vec<(u32, u32)> =
            fields.iter().map(|f| (pools.field_idx(&class.name, f), f.access)).collect();
        entries.sort_unstable();
        entries
    };
    let encode_methods = |methods: &[TestMethod], code_offs: &[u32]| {
        let mut entries: Vec<(u32, u32, u32)> = methods
            .iter()
            .zip(code_offs)
            .map(|(m, code_off)| (pools.method_idx(&class.name, m), m.access, *code_off))
            .collect();
        entries.sort_unstable();
        entries
    };
    let statics = encode_fields(&class.static_fields);
    let instances = encode_fields(&class.instance_fields);
    let (direct_offs, virtual_offs) = code_offs.split_at(class.direct_methods.len());
    let directs = encode_methods(&class.direct_methods, direct_offs);
    let virtuals = encode_methods(&class.virtual_methods, virtual_offs);

    let buf = &mut data.bytes;
    write_uleb128(buf, statics.len() as u32);
    write_uleb128(buf, instances.len() as u32);
    write_uleb128(buf, directs.len() as u32);
    write_uleb128(buf, virtuals.len() as u32);
    for list in [&statics, &instances] {
        let mut last = 0;
        for (idx, access) in list {
            write_uleb128(buf, idx - last);
            write_uleb128(buf, *access);
            last = *idx;
        }
    }
    for list in [&directs, &virtuals] {
        let mut last = 0;
        for (idx, access, code_off) in list {
            write_uleb128(buf, idx - last);
            write_uleb128(buf, *access);
            write_uleb128(buf, *code_off);
            last = *idx;
        }
    }
    off
}

/// Assembles classes into a version 035 image with a valid checksum and signature.
#[derive(Debug, Default)]
pub(crate) struct DexBuilder {
    classes: Vec<TestClass>,
}

impl DexBuilder
{
    pub fn new() -> Self
    {
        DexBuilder::default()
    }

    pub fn add_class(&mut self, class: TestClass) -> &mut Self
    {
        self.classes.push(class);
        self
    }

    pub fn build(&self) -> Vec<u8>
    {
        let pools = Pools::collect(&self.classes);

        let string_ids_off = HEADER_SIZE;
        let type_ids_off = string_ids_off + pools.strings.len() * 4;
        let proto_ids_off = type_ids_off + pools.types.len() * 4;
        let field_ids_off = proto_ids_off + pools.protos.len() * 12;
        let method_ids_off = field_ids_off + pools.fields.len() * 8;
        let class_defs_off = method_ids_off + pools.methods.len() * 8;
        let data_off = class_defs_off + self.classes.len() * 32;

        let mut map = vec![(TYPE_HEADER_ITEM, 1, 0)];
        for (kind, count, off) in [
            (TYPE_STRING_ID_ITEM, pools.strings.len(), string_ids_off),
            (TYPE_TYPE_ID_ITEM, pools.types.len(), type_ids_off),
            (TYPE_PROTO_ID_ITEM, pools.protos.len(), proto_ids_off),
            (TYPE_FIELD_ID_ITEM, pools.fields.len(), field_ids_off),
            (TYPE_METHOD_ID_ITEM, pools.methods.len(), method_ids_off),
            (TYPE_CLASS_DEF_ITEM, self.classes.len(), class_defs_off),
        ] {
            if count > 0 {
                map.push((kind, count as u32, off as u32));
            }
        }

        let mut data = DataSection { base: data_off, bytes: vec![] };

        let mut type_lists: BTreeMap<Vec<u32>, u32> = BTreeMap::new();
        let lists = pools
            .protos
            .iter()
            .map(|(_, params, _)| params.clone())
            .chain(self.classes.iter().map(|c| c.interfaces.iter().map(|i| pools.type_idx(i)).collect()));
        for list in lists {
            if list.is_empty() || type_lists.contains_key(&list) {
                continue;
            }
            data.align(4);
            type_lists.insert(list.clone(), data.offset());
            write_u4(&mut data.bytes, list.len() as u32);
            for idx in &list {
                write_u2(&mut data.bytes, *idx as u16);
            }
        }
        if let Some(first) = type_lists.values().min() {
            map.push((TYPE_TYPE_LIST, type_lists.len() as u32, *first));
        }

        let mut string_data_offs = vec![];
        for s in &pools.strings {
            string_data_offs.push(data.offset());
            write_uleb128(&mut data.bytes, s.encode_utf16().count() as u32);
            write_x(&mut data.bytes, &cesu8::to_java_cesu8(s));
            write_u1(&mut data.bytes, 0);
        }
        if let Some(first) = string_data_offs.first() {
            map.push((TYPE_STRING_DATA_ITEM, string_data_offs.len() as u32, *first));
        }

        let debug_start = data.offset();
        let mut debug_offs: Vec<Vec<u32>> = vec![];
        for class in &self.classes {
            let mut offs = vec![];
            for method in class.methods() {
                offs.push(match method.code.as_ref().and_then(|c| c.debug.as_ref()) {
                    Some(debug) => write_debug_info(&mut data, &pools, debug),
                    None => 0,
                });
            }
            debug_offs.push(offs);
        }
        let debug_count = debug_offs.iter().flatten().filter(|off| **off != 0).count();
        if debug_count > 0 {
            map.push((TYPE_DEBUG_INFO_ITEM, debug_count as u32, debug_start));
        }

        let mut code_offs: Vec<Vec<u32>> = vec![];
        let mut code_first = None;
        let mut code_count = 0;
        for (class, debug_offs) in self.classes.iter().zip(&debug_offs) {
            let mut offs = vec![];
            for (method, debug_off) in class.methods().zip(debug_offs) {
                let off = match &method.code {
                    Some(code) => {
                        let off = write_code_item(&mut data, code, *debug_off);
                        code_first.get_or_insert(off);
                        code_count += 1;
                        off
                    }
                    None => 0,
                };
                offs.push(off);
            }
            code_offs.push(offs);
        }
        if let Some(first) = code_first {
            map.push((TYPE_CODE_ITEM, code_count, first));
        }

        let class_data_offs: Vec<u32> = self
            .classes
            .iter()
            .zip(&code_offs)
            .map(|(class, offs)| write_class_data(&mut data, &pools, class, offs))
            .collect();
        if let Some(first) = class_data_offs.first() {
            map.push((TYPE_CLASS_DATA_ITEM, class_data_offs.len() as u32, *first));
        }

        data.align(4);
        let map_off = data.offset();
        map.push((TYPE_MAP_LIST, 1, map_off));
        write_u4(&mut data.bytes, map.len() as u32);
        for (kind, count, off) in &map {
            write_u2(&mut data.bytes, *kind);
            write_u2(&mut data.bytes, 0);
            write_u4(&mut data.bytes, *count);
            write_u4(&mut data.bytes, *off);
        }

        let file_size = data_off + data.bytes.len();
        let mut file = Vec::with_capacity(file_size);
        write_x(&mut file, DEX_MAGIC_035);
        write_u4(&mut file, 0);
        write_x(&mut file, &[0u8; 20]);
        write_u4(&mut file, file_size as u32);
        write_u4(&mut file, HEADER_SIZE as u32);
        write_u4(&mut file, ENDIAN_CONSTANT);
        write_u4(&mut file, 0);
        write_u4(&mut file, 0);
        write_u4(&mut file, map_off);
        for (count, off) in [
            (pools.strings.len(), string_ids_off),
            (pools.types.len(), type_ids_off),
            (pools.protos.len(), proto_ids_off),
            (pools.fields.len(), field_ids_off),
            (pools.methods.len(), method_ids_off),
            (self.classes.len(), class_defs_off),
            (data.bytes.len(), data_off),
        ] {
            write_u4(&mut file, count as u32);
            write_u4(&mut file, if count == 0 { 0 } else { off as u32 });
        }
        assert_eq!(file.len(), HEADER_SIZE);

        for off in &string_data_offs {
            write_u4(&mut file, *off);
        }
        for desc in &pools.types {
            write_u4(&mut file, pools.string_idx(desc));
        }
        for (return_idx, params, shorty_idx) in &pools.protos {
            write_u4(&mut file, *shorty_idx);
            write_u4(&mut file, *return_idx);
            write_u4(&mut file, type_lists.get(params).copied().unwrap_or(0));
        }
        for (class_idx, name_idx, type_idx) in &pools.fields {
            write_u2(&mut file, *class_idx as u16);
            write_u2(&mut file, *type_idx as u16);
            write_u4(&mut file, *name_idx);
        }
        for (class_idx, name_idx, proto_idx) in &pools.methods {
            write_u2(&mut file, *class_idx as u16);
            write_u2(&mut file, *proto_idx as u16);
            write_u4(&mut file, *name_idx);
        }
        for (class, class_data_off) in self.classes.iter().zip(&class_data_offs) {
            let interfaces: Vec<u32> = class.interfaces.iter().map(|i| pools.type_idx(i)).collect();
            write_u4(&mut file, pools.type_idx(&class.name));
            write_u4(&mut file, class.access);
            write_u4(&mut file, class.superclass.as_deref().map_or(NO_INDEX, |s| pools.type_idx(s)));
            write_u4(&mut file, type_lists.get(&interfaces).copied().unwrap_or(0));
            write_u4(&mut file, class.source_file.as_deref().map_or(NO_INDEX, |s| pools.string_idx(s)));
            write_u4(&mut file, 0);
            write_u4(&mut file, *class_data_off);
            write_u4(&mut file, 0);
        }
        assert_eq!(file.len(), data_off);
        file.extend_from_slice(&data.bytes);

        let signature = Sha1::digest(&file[32..]);
        file[12..32].copy_from_slice(&signature);
        let checksum = adler32_slice(&file[12..]);
        file[8..12].copy_from_slice(&checksum.to_le_bytes());
        file
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pools_are_sorted_and_shared() {
        let mut b = DexBuilder::new();
        b.add_class(
            TestClass::new("Lb/Second;")
                .static_field("count", "I", 0x9)
                .virtual_(TestMethod::new("run", "V", &[])),
        );
        b.add_class(TestClass::new("La/First;").virtual_(TestMethod::new("run", "V", &[])));
        let pools = Pools::collect(&b.classes);

        let mut sorted = pools.strings.clone();
        sorted.sort();
        assert_eq!(pools.strings, sorted);
        assert_eq!(pools.protos.len(), 1);
        assert_eq!(pools.methods.len(), 2);
        // La/First; sorts ahead of Lb/Second;
        assert!(pools.methods[0].0 < pools.methods[1].0);
    }

    #[test]
    fn test_special_opcode_encoding() {
        let pools = Pools::default();
        let mut data = DataSection { base: 0, bytes: vec![] };
        write_debug_info(&mut data, &pools, &TestDebug::new(20).line(0, 0).line(3, 5).line(1, -7));
        // line_start, no parameters, two specials, then the long form, then the end marker
        assert_eq!(
            data.bytes,
            vec![20, 0, 0x0e, 0x40, 0x01, 0x01, 0x02, 0x79, 0x0e, 0x00]
        );
    }
}
