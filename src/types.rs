/* The decoded model: classes, fields and methods of a dex file */
/* Type names are kept in the dex native (also JNI) format e.g. Ljava/lang/Object; */

use bitflags::bitflags;
use nom::branch::alt;
use nom::bytes::complete::take_while1;
use nom::character::complete::{char, one_of};
use nom::combinator::{all_consuming, map};
use nom::sequence::{delimited, preceded};
use nom::{IResult, Parser};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::dex::error::{DexError, DexErrorKind};
use crate::dex::instructions::DexBytecode;

bitflags! {
    /// Access flags of classes, fields and methods. Some bits mean different
    /// things depending on what they are attached to (e.g. `VOLATILE`/`BRIDGE`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    pub struct AccessFlags: u32 {
        const PUBLIC = 0x1;
        const PRIVATE = 0x2;
        const PROTECTED = 0x4;
        const STATIC = 0x8;
        const FINAL = 0x10;
        const SYNCHRONIZED = 0x20;
        const VOLATILE = 0x40;
        const BRIDGE = 0x40;
        const TRANSIENT = 0x80;
        const VARARGS = 0x80;
        const NATIVE = 0x100;
        const INTERFACE = 0x200;
        const ABSTRACT = 0x400;
        const STRICT = 0x800;
        const SYNTHETIC = 0x1000;
        const ANNOTATION = 0x2000;
        const ENUM = 0x4000;
        const CONSTRUCTOR = 0x10000;
        const DECLARED_SYNCHRONIZED = 0x20000;
    }
}

impl AccessFlags
{
    /// Java-ish modifier keywords, e.g. `public static final`.
    pub fn keywords(&self, for_method: bool) -> Vec<&'static str>
    {
        let mut m = vec![];
        if self.contains(AccessFlags::PUBLIC) { m.push("public") };
        if self.contains(AccessFlags::PRIVATE) { m.push("private") };
        if self.contains(AccessFlags::PROTECTED) { m.push("protected") };
        if self.contains(AccessFlags::STATIC) { m.push("static") };
        if self.contains(AccessFlags::FINAL) { m.push("final") };
        if self.contains(AccessFlags::SYNCHRONIZED) { m.push("synchronized") };
        if self.contains(AccessFlags::VOLATILE) { m.push(if for_method { "bridge" } else { "volatile" }) };
        if self.contains(AccessFlags::TRANSIENT) { m.push(if for_method { "varargs" } else { "transient" }) };
        if self.contains(AccessFlags::NATIVE) { m.push("native") };
        if self.contains(AccessFlags::INTERFACE) { m.push("interface") };
        if self.contains(AccessFlags::ABSTRACT) { m.push("abstract") };
        if self.contains(AccessFlags::STRICT) { m.push("strict") };
        if self.contains(AccessFlags::SYNTHETIC) { m.push("synthetic") };
        if self.contains(AccessFlags::ANNOTATION) { m.push("annotation") };
        if self.contains(AccessFlags::ENUM) { m.push("enum") };
        if self.contains(AccessFlags::CONSTRUCTOR) { m.push("constructor") };
        if self.contains(AccessFlags::DECLARED_SYNCHRONIZED) { m.push("declared-synchronized") };
        m
    }
}

/// A field or method type descriptor.
///
/// # Examples
///
/// ```
///  use dexcode::types::TypeDescriptor;
///
///  let t: TypeDescriptor = "[Ljava/lang/String;".parse().unwrap();
///  assert_eq!(t.to_java(), "java.lang.String[]");
///  assert_eq!(t.shorty_char(), 'L');
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum TypeDescriptor {
    Void,
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
    /// Class name in internal form without the `L` and `;`, e.g. `java/lang/Object`.
    Object(String),
    Array(Box<TypeDescriptor>),
}

impl TypeDescriptor
{
    pub fn parse(s: &str) -> Result<TypeDescriptor, DexError>
    {
        match all_consuming(parse_type_descriptor).parse(s) {
            Ok((_, t)) => Ok(t),
            Err(_) => Err(DexError::invalid_format(format!("invalid type descriptor {:?}", s))),
        }
    }

    pub fn to_descriptor(&self) -> String
    {
        match self {
            TypeDescriptor::Void => "V".to_string(),
            TypeDescriptor::Boolean => "Z".to_string(),
            TypeDescriptor::Byte => "B".to_string(),
            TypeDescriptor::Short => "S".to_string(),
            TypeDescriptor::Char => "C".to_string(),
            TypeDescriptor::Int => "I".to_string(),
            TypeDescriptor::Long => "J".to_string(),
            TypeDescriptor::Float => "F".to_string(),
            TypeDescriptor::Double => "D".to_string(),
            TypeDescriptor::Object(name) => format!("L{};", name),
            TypeDescriptor::Array(a) => "[".to_string() + &a.to_descriptor(),
        }
    }

    pub fn to_java(&self) -> String
    {
        match self {
            TypeDescriptor::Void => "void".to_string(),
            TypeDescriptor::Boolean => "boolean".to_string(),
            TypeDescriptor::Byte => "byte".to_string(),
            TypeDescriptor::Short => "short".to_string(),
            TypeDescriptor::Char => "char".to_string(),
            TypeDescriptor::Int => "int".to_string(),
            TypeDescriptor::Long => "long".to_string(),
            TypeDescriptor::Float => "float".to_string(),
            TypeDescriptor::Double => "double".to_string(),
            TypeDescriptor::Object(name) => name.replace('/', "."),
            TypeDescriptor::Array(a) => format!("{}[]", a.to_java()),
        }
    }

    /// The shorty letter; every reference type collapses to `L`.
    pub fn shorty_char(&self) -> char
    {
        match self {
            TypeDescriptor::Object(_) | TypeDescriptor::Array(_) => 'L',
            other => other.to_descriptor().chars().next().unwrap_or('L'),
        }
    }

    /// Longs and doubles occupy a register pair.
    pub fn is_wide(&self) -> bool
    {
        matches!(self, TypeDescriptor::Long | TypeDescriptor::Double)
    }
}

impl FromStr for TypeDescriptor
{
    type Err = DexError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        TypeDescriptor::parse(s)
    }
}

impl fmt::Display for TypeDescriptor
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result
    {
        write!(f, "{}", self.to_descriptor())
    }
}

fn parse_class_name(input: &str) -> IResult<&str, &str>
{
    delimited(char('L'), take_while1(|c: char| c != ';' && c != '.' && c != '['), char(';')).parse(input)
}

pub(crate) fn parse_type_descriptor(input: &str) -> IResult<&str, TypeDescriptor>
{
    alt((
        map(one_of("VZBSCIJFD"), |c| match c {
            'V' => TypeDescriptor::Void,
            'Z' => TypeDescriptor::Boolean,
            'B' => TypeDescriptor::Byte,
            'S' => TypeDescriptor::Short,
            'C' => TypeDescriptor::Char,
            'I' => TypeDescriptor::Int,
            'J' => TypeDescriptor::Long,
            'F' => TypeDescriptor::Float,
            _ => TypeDescriptor::Double,
        }),
        map(parse_class_name, |n: &str| TypeDescriptor::Object(n.to_string())),
        map(preceded(char('['), parse_type_descriptor), |t| TypeDescriptor::Array(Box::new(t))),
    ))
    .parse(input)
}

/// True if `name` has the `Lpkg/Name;` shape of a class descriptor.
pub fn is_class_descriptor(name: &str) -> bool
{
    all_consuming(parse_class_name).parse(name).is_ok()
}

/// Shorty of a prototype: the return letter followed by one letter per parameter.
pub fn shorty_of(return_type: &TypeDescriptor, parameters: &[TypeDescriptor]) -> String
{
    std::iter::once(return_type)
        .chain(parameters.iter())
        .map(TypeDescriptor::shorty_char)
        .collect()
}

/// Map key of a method: `name(shorty)`, e.g. `equals(ZL)`.
pub fn method_key(name: &str, shorty: &str) -> String
{
    format!("{}({})", name, shorty)
}

#[derive(Debug, Clone, Serialize)]
pub struct DexField {
    pub(crate) name: String,
    pub(crate) type_desc: String,
    pub(crate) is_static: bool,
    pub(crate) access_flags: AccessFlags,
    pub(crate) class_name: String,
}

impl DexField
{
    pub fn name(&self) -> &str { &self.name }
    /// Declared type descriptor, e.g. `I` or `Ljava/lang/String;`.
    pub fn type_desc(&self) -> &str { &self.type_desc }
    pub fn is_static(&self) -> bool { self.is_static }
    pub fn access_flags(&self) -> AccessFlags { self.access_flags }
    /// Internal name of the declaring class.
    pub fn class_name(&self) -> &str { &self.class_name }
}

#[derive(Debug, Clone, Serialize)]
pub struct DexMethod {
    pub(crate) name: String,
    pub(crate) shorty: String,
    pub(crate) return_type: String,
    pub(crate) parameter_types: Vec<String>,
    pub(crate) is_direct: bool,
    pub(crate) is_native: bool,
    pub(crate) access_flags: AccessFlags,
    pub(crate) class_name: String,
    pub(crate) byte_code: DexBytecode,
}

impl DexMethod
{
    pub fn name(&self) -> &str { &self.name }
    /// Full shorty, return type first.
    pub fn shorty(&self) -> &str { &self.shorty }
    pub fn return_type(&self) -> &str { &self.return_type }
    pub fn parameter_types(&self) -> &[String] { &self.parameter_types }
    /// Listed among the direct methods (static, private or constructor).
    pub fn is_direct(&self) -> bool { self.is_direct }
    /// No code item: native or abstract.
    pub fn is_native(&self) -> bool { self.is_native }
    pub fn access_flags(&self) -> AccessFlags { self.access_flags }
    pub fn class_name(&self) -> &str { &self.class_name }
    pub fn byte_code(&self) -> &DexBytecode { &self.byte_code }

    pub fn key(&self) -> String
    {
        method_key(&self.name, &self.shorty)
    }

    /// JNI style descriptor, e.g. `(II)I`.
    pub fn descriptor(&self) -> String
    {
        format!("({}){}", self.parameter_types.concat(), self.return_type)
    }

    pub fn is_static(&self) -> bool { self.access_flags.contains(AccessFlags::STATIC) }
    pub fn is_abstract(&self) -> bool { self.access_flags.contains(AccessFlags::ABSTRACT) }
    pub fn is_constructor(&self) -> bool { self.name == "<init>" || self.name == "<clinit>" }
}

#[derive(Debug, Clone, Serialize)]
pub struct DexClass {
    pub(crate) name: String,
    pub(crate) access_flags: AccessFlags,
    pub(crate) superclass: Option<String>,
    pub(crate) interfaces: Vec<String>,
    pub(crate) source_file: Option<String>,
    pub(crate) fields: BTreeMap<String, DexField>,
    pub(crate) methods: BTreeMap<String, DexMethod>,
}

impl DexClass
{
    /// Internal name, e.g. `Lcom/pkg/Foo;`.
    pub fn name(&self) -> &str { &self.name }
    pub fn access_flags(&self) -> AccessFlags { self.access_flags }
    pub fn superclass(&self) -> Option<&str> { self.superclass.as_deref() }
    pub fn interfaces(&self) -> &[String] { &self.interfaces }
    pub fn source_file(&self) -> Option<&str> { self.source_file.as_deref() }
    /// Fields keyed by name.
    pub fn fields(&self) -> &BTreeMap<String, DexField> { &self.fields }
    /// Methods keyed by `name(shorty)`.
    pub fn methods(&self) -> &BTreeMap<String, DexMethod> { &self.methods }

    pub fn method(&self, key: &str) -> Result<&DexMethod, DexError>
    {
        self.methods.get(key).ok_or_else(|| {
            DexError::new(DexErrorKind::MethodNotFound {
                class: self.name.clone(),
                key: key.to_string(),
                available: self.methods.keys().cloned().collect(),
            })
        })
    }

    pub fn field(&self, name: &str) -> Result<&DexField, DexError>
    {
        self.fields.get(name).ok_or_else(|| {
            DexError::new(DexErrorKind::FieldNotFound {
                class: self.name.clone(),
                name: name.to_string(),
                available: self.fields.keys().cloned().collect(),
            })
        })
    }

    /// Every overload called `name`.
    pub fn methods_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a DexMethod> + 'a
    {
        self.methods.values().filter(move |m| m.name == name)
    }
}
