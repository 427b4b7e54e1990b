use crate::schema::{HashCompat, MemberOffset};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize, Clone)]
pub struct SummaryInfo {
    pub version: String,
    pub classes: usize,
    pub methods: usize,
    pub global_enums: usize,
    pub singletons: usize,
    pub builtin_classes: usize,
    pub native_structures: usize,
}

/// Display form of one class: signatures and descriptors, not raw records.
#[derive(Debug, Serialize, Clone)]
pub struct ClassSummary {
    pub name: String,
    pub api_type: Option<String>,
    pub inherits: Option<String>,
    pub is_instantiable: Option<bool>,
    pub is_refcounted: Option<bool>,
    pub methods: Vec<String>,
    pub properties: Vec<String>,
    pub signals: Vec<String>,
    pub constants: Vec<ConstantView>,
    pub enums: Vec<EnumView>,
}

#[derive(Debug, Serialize, Clone)]
pub struct ConstantView {
    pub name: String,
    pub value: Value,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct EnumView {
    pub name: String,
    pub values: Vec<String>,
}

/// One method hit from the name or hash index, with its owning class.
/// Types are kept raw here; `format::method_signature` is the pretty form.
#[derive(Debug, Serialize, Clone)]
pub struct MethodSig {
    pub class: String,
    pub name: String,
    pub ret: Option<String>,
    pub args: Vec<Option<String>>,
    pub hash: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash_compatibility: Option<HashCompat>,
    pub is_static: bool,
    pub is_const: bool,
    pub is_virtual: bool,
    pub is_vararg: bool,
}

#[derive(Debug, Serialize, Clone)]
pub struct UtilityDetail {
    pub name: String,
    pub category: Option<String>,
    pub return_type: Option<String>,
    pub args: Vec<Option<String>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum UtilityLookup {
    Function(UtilityDetail),
    Category {
        category: String,
        functions: Vec<String>,
    },
    Catalog {
        functions: Vec<String>,
    },
}

/// Builtin-class detail. Sections absent from the source record are
/// omitted entirely rather than serialized as empty lists.
#[derive(Debug, Serialize, Clone)]
pub struct BuiltinDetail {
    pub name: String,
    pub is_keyed: bool,
    pub has_destructor: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indexing_return_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<BuiltinMemberView>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constants: Option<Vec<ConstantView>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constructors: Option<Vec<ConstructorView>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operators: Option<Vec<OperatorView>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub methods: Option<Vec<BuiltinMethodView>>,
}

#[derive(Debug, Serialize, Clone)]
pub struct BuiltinMemberView {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Option<String>,
}

#[derive(Debug, Serialize, Clone)]
pub struct ConstructorView {
    pub index: u32,
    pub args: Vec<Option<String>>,
}

#[derive(Debug, Serialize, Clone)]
pub struct OperatorView {
    pub name: String,
    pub right_type: Option<String>,
    pub return_type: Option<String>,
}

#[derive(Debug, Serialize, Clone)]
pub struct BuiltinMethodView {
    pub name: String,
    pub return_type: Option<String>,
    pub is_vararg: bool,
    pub args: Vec<Option<String>>,
}

/// Joined size/offset view for one (builtin, build configuration) pair.
/// A size with no recorded offsets is still a valid layout.
#[derive(Debug, Serialize, Clone)]
pub struct Layout {
    pub class: String,
    pub config: String,
    pub size: Option<u64>,
    pub members: Vec<MemberOffset>,
}

// Route actions: the closed set of outcomes `ExtApi::route` can produce.
// Every variant names the lookup that was made and carries its parameters
// and payload.

#[derive(Debug, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RouteResult {
    BuiltinMemberOffset {
        params: OffsetParams,
        result: OffsetValue,
    },
    BuiltinLayout {
        params: LayoutParams,
        result: Layout,
    },
    MethodByHash {
        params: HashParams,
        result: Vec<MethodSig>,
    },
    Builtin {
        params: BuiltinParams,
        result: Option<BuiltinDetail>,
    },
    ClassEnum {
        params: QualifiedParams,
        result: Option<EnumView>,
    },
    Class {
        params: NameParams,
        result: Option<ClassSummary>,
    },
    MethodByName {
        params: NameParams,
        result: Vec<MethodSig>,
    },
    Help {
        hints: Vec<String>,
    },
}

impl RouteResult {
    pub fn action(&self) -> &'static str {
        match self {
            RouteResult::BuiltinMemberOffset { .. } => "builtin_member_offset",
            RouteResult::BuiltinLayout { .. } => "builtin_layout",
            RouteResult::MethodByHash { .. } => "method_by_hash",
            RouteResult::Builtin { .. } => "builtin",
            RouteResult::ClassEnum { .. } => "class_enum",
            RouteResult::Class { .. } => "class",
            RouteResult::MethodByName { .. } => "method_by_name",
            RouteResult::Help { .. } => "help",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OffsetParams {
    pub config: String,
    pub class: String,
    pub member: String,
}

#[derive(Debug, Serialize)]
pub struct OffsetValue {
    pub offset: u64,
}

#[derive(Debug, Serialize)]
pub struct LayoutParams {
    pub class: String,
    pub config: String,
}

#[derive(Debug, Serialize)]
pub struct HashParams {
    pub hash: String,
}

#[derive(Debug, Serialize)]
pub struct BuiltinParams {
    pub class: String,
}

#[derive(Debug, Serialize)]
pub struct QualifiedParams {
    pub qualified: String,
}

#[derive(Debug, Serialize)]
pub struct NameParams {
    pub name: String,
}
