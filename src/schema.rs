// Schema loader: typed view over the extension API document.
// Every field beyond `name` is optional; absence deserializes to an
// empty/zero value instead of failing. Only a document whose top level
// is not record-shaped is a load error.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("schema document not found: {0}")]
    NotFound(PathBuf),
    #[error("read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed schema document: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Read and decode the document at `path`. Never returns a partial document.
pub fn load_document(path: &Path) -> Result<SchemaDocument, LoadError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(LoadError::NotFound(path.to_path_buf()));
        }
        Err(err) => {
            return Err(LoadError::Io {
                path: path.to_path_buf(),
                source: err,
            });
        }
    };
    Ok(serde_json::from_str(&raw)?)
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SchemaDocument {
    pub header: HeaderRecord,
    pub version: Option<VersionRecord>,
    pub classes: Vec<Arc<ClassRecord>>,
    pub global_enums: Vec<Arc<EnumRecord>>,
    pub singletons: Vec<SingletonRecord>,
    pub utility_functions: Vec<Arc<UtilityFunctionRecord>>,
    pub builtin_class_sizes: Vec<BuiltinSizeConfig>,
    pub builtin_class_member_offsets: Vec<BuiltinOffsetConfig>,
    pub native_structures: Vec<Arc<NativeStructRecord>>,
    pub builtin_classes: Vec<Arc<BuiltinClassRecord>>,
    pub global_constants: Vec<Arc<GlobalConstantRecord>>,
}

impl SchemaDocument {
    /// Header version with the legacy fallbacks some older documents need.
    pub fn version_string(&self) -> String {
        if let Some(full) = &self.header.version_full_name {
            return full.clone();
        }
        if let Some(version) = &self.version {
            if let Some(s) = version.string.as_ref().or(version.full_name.as_ref()) {
                return s.clone();
            }
        }
        "unknown".to_string()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HeaderRecord {
    pub version_full_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VersionRecord {
    pub string: Option<String>,
    pub full_name: Option<String>,
}

/// A type annotation in the document is usually a bare string but may be
/// a `{ "type": … }` record (signal arguments, some builtin members).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeRef {
    Name(String),
    Record {
        #[serde(rename = "type")]
        ty: Option<String>,
    },
}

impl TypeRef {
    pub fn name(&self) -> Option<&str> {
        match self {
            TypeRef::Name(name) => Some(name.as_str()),
            TypeRef::Record { ty } => ty.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClassRecord {
    pub name: String,
    pub api_type: Option<String>,
    pub inherits: Option<String>,
    pub is_instantiable: Option<bool>,
    pub is_refcounted: Option<bool>,
    pub methods: Vec<Arc<MethodRecord>>,
    pub properties: Vec<PropertyRecord>,
    pub signals: Vec<SignalRecord>,
    pub constants: Vec<ConstantRecord>,
    pub enums: Vec<Arc<EnumRecord>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MethodRecord {
    pub name: String,
    pub return_value: Option<ReturnValue>,
    /// Builtin-class methods carry a flat `return_type` instead of
    /// a `return_value` record.
    pub return_type: Option<String>,
    pub hash: Option<u64>,
    pub hash_compatibility: Option<HashCompat>,
    pub is_static: bool,
    pub is_const: bool,
    pub is_virtual: bool,
    pub is_vararg: bool,
    pub arguments: Vec<ArgumentRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReturnValue {
    #[serde(rename = "type")]
    pub ty: Option<String>,
    pub meta: Option<String>,
}

/// Compatibility hashes appear both as a single scalar and as a list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HashCompat {
    One(u64),
    Many(Vec<u64>),
}

impl HashCompat {
    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        match self {
            HashCompat::One(value) => std::slice::from_ref(value).iter().copied(),
            HashCompat::Many(values) => values.iter().copied(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ArgumentRecord {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub ty: Option<TypeRef>,
    pub meta: Option<String>,
    pub default_value: Option<String>,
}

impl ArgumentRecord {
    pub fn type_name(&self) -> Option<&str> {
        self.ty.as_ref().and_then(TypeRef::name)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PropertyRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Option<TypeRef>,
    pub getter: Option<String>,
    pub setter: Option<String>,
    pub index: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignalRecord {
    pub name: String,
    pub arguments: Vec<ArgumentRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConstantRecord {
    pub name: String,
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EnumRecord {
    pub name: String,
    pub is_bitfield: bool,
    pub values: Vec<EnumValueRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EnumValueRecord {
    pub name: String,
    pub value: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SingletonRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UtilityFunctionRecord {
    pub name: String,
    pub category: Option<String>,
    pub return_type: Option<String>,
    pub is_vararg: bool,
    pub hash: Option<u64>,
    pub arguments: Vec<ArgumentRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BuiltinSizeConfig {
    pub build_configuration: String,
    pub sizes: Vec<BuiltinSizeRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BuiltinSizeRecord {
    pub name: String,
    pub size: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BuiltinOffsetConfig {
    pub build_configuration: String,
    pub classes: Vec<BuiltinOffsetClass>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BuiltinOffsetClass {
    pub name: String,
    pub members: Vec<MemberOffset>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberOffset {
    pub member: String,
    pub offset: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NativeStructRecord {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BuiltinClassRecord {
    pub name: String,
    pub is_keyed: bool,
    pub has_destructor: bool,
    pub indexing_return_type: Option<String>,
    pub members: Vec<BuiltinMemberRecord>,
    pub constants: Vec<ConstantRecord>,
    pub constructors: Vec<ConstructorRecord>,
    pub operators: Vec<OperatorRecord>,
    pub methods: Vec<Arc<MethodRecord>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BuiltinMemberRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Option<TypeRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConstructorRecord {
    pub index: u32,
    pub arguments: Vec<ArgumentRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OperatorRecord {
    pub name: String,
    pub right_type: Option<String>,
    pub return_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConstantRecord {
    pub name: String,
    pub value: serde_json::Value,
}
