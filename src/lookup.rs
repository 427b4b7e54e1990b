// Lookup service: typed reads over one immutable index snapshot.
// Absence is a normal outcome here; every accessor answers `None` or an
// empty list for unknown names, never an error.

use crate::format;
use crate::index::{Indexes, resolve_key};
use crate::model::{
    BuiltinDetail, BuiltinMemberView, BuiltinMethodView, ClassSummary, ConstantView,
    ConstructorView, EnumView, Layout, MethodSig, OperatorView, SummaryInfo, UtilityDetail,
    UtilityLookup,
};
use crate::schema::{ClassRecord, EnumRecord, MethodRecord, NativeStructRecord, SchemaDocument};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::sync::Arc;

pub const DEFAULT_BUILD_CONFIG: &str = "float_32";

/// One fully-built, read-only view of the extension API document.
pub struct ExtApi {
    ix: Indexes,
}

impl ExtApi {
    pub fn new(api: SchemaDocument) -> Self {
        Self {
            ix: Indexes::build(api),
        }
    }

    pub fn indexes(&self) -> &Indexes {
        &self.ix
    }

    pub fn version(&self) -> &str {
        &self.ix.version
    }

    pub fn info(&self) -> SummaryInfo {
        SummaryInfo {
            version: self.ix.version.clone(),
            classes: self.ix.classes_by_name.len(),
            methods: self.ix.method_count(),
            global_enums: self.ix.global_enums_by_name.len(),
            singletons: self.ix.singletons_by_name.len(),
            builtin_classes: self.ix.builtin_classes_by_name.len(),
            native_structures: self.ix.native_structs_by_name.len(),
        }
    }

    // Classes

    pub fn resolve_class(&self, name: &str) -> Option<&Arc<ClassRecord>> {
        let key = resolve_key(&self.ix.classes_by_name, &self.ix.class_fold, name)?;
        self.ix.classes_by_name.get(key)
    }

    pub fn class_summary(&self, name: &str) -> Option<ClassSummary> {
        let class = self.resolve_class(name)?;
        Some(ClassSummary {
            name: class.name.clone(),
            api_type: class.api_type.clone(),
            inherits: class.inherits.clone(),
            is_instantiable: class.is_instantiable,
            is_refcounted: class.is_refcounted,
            methods: class
                .methods
                .iter()
                .map(|m| format::method_signature(m, Some(&class.name)))
                .collect(),
            properties: class
                .properties
                .iter()
                .map(format::property_descriptor)
                .collect(),
            signals: class
                .signals
                .iter()
                .map(format::signal_descriptor)
                .collect(),
            constants: class
                .constants
                .iter()
                .map(|c| ConstantView {
                    name: c.name.clone(),
                    value: c.value.clone(),
                })
                .collect(),
            enums: class.enums.iter().map(|e| enum_view(&e.name, e)).collect(),
        })
    }

    // Methods

    /// Hits in registration order. The class filter compares
    /// case-insensitively against the owning class.
    pub fn methods_by_name(&self, name: &str, class_filter: Option<&str>) -> Vec<MethodSig> {
        let Some(entries) = self.ix.methods_by_name.get(name) else {
            return Vec::new();
        };
        entries
            .iter()
            .filter(|(class, _)| match class_filter {
                Some(filter) => class.eq_ignore_ascii_case(filter),
                None => true,
            })
            .map(|(class, method)| method_sig(class, method))
            .collect()
    }

    /// The hash is compared in its decimal string form; callers may pass
    /// anything displayable.
    pub fn method_by_hash(&self, hash: impl Display) -> Vec<MethodSig> {
        let key = hash.to_string();
        self.ix
            .methods_by_hash
            .get(&key)
            .map(|entries| {
                entries
                    .iter()
                    .map(|(class, method)| method_sig(class, method))
                    .collect()
            })
            .unwrap_or_default()
    }

    // Enums

    pub fn global_enum(&self, name: &str) -> Option<EnumView> {
        let key = resolve_key(&self.ix.global_enums_by_name, &self.ix.global_enum_fold, name)?;
        let e = self.ix.global_enums_by_name.get(key)?;
        Some(enum_view(key, e))
    }

    /// `qualified` is `Class.Enum`. Exact key first; then the class part
    /// is resolved case-insensitively against the canonical class index
    /// and the qualified key re-derived.
    pub fn class_enum(&self, qualified: &str) -> Option<EnumView> {
        if let Some(e) = self.ix.class_enums_by_qualname.get(qualified) {
            return Some(enum_view(qualified, e));
        }
        let (class_part, enum_part) = qualified.split_once('.')?;
        if enum_part.contains('.') {
            return None;
        }
        let canonical = resolve_key(&self.ix.classes_by_name, &self.ix.class_fold, class_part)?;
        let key = format!("{canonical}.{enum_part}");
        let e = self.ix.class_enums_by_qualname.get(&key)?;
        Some(enum_view(&key, e))
    }

    // Singletons

    pub fn singletons(&self) -> &BTreeMap<String, String> {
        &self.ix.singletons_by_name
    }

    pub fn singleton(&self, name: &str) -> Option<&str> {
        if let Some(ty) = self.ix.singletons_by_name.get(name) {
            return Some(ty.as_str());
        }
        let key = self.ix.singleton_fold.canonical(name)?;
        self.ix.singletons_by_name.get(key).map(String::as_str)
    }

    // Utility functions

    /// Three mutually exclusive modes: by name (detail), by category
    /// (member list), or neither (full sorted catalog). A name takes
    /// precedence over a category when both are given.
    pub fn utility(&self, name: Option<&str>, category: Option<&str>) -> Option<UtilityLookup> {
        if let Some(name) = name {
            let key = resolve_key(&self.ix.utility_by_name, &self.ix.utility_fold, name)?;
            let u = self.ix.utility_by_name.get(key)?;
            return Some(UtilityLookup::Function(UtilityDetail {
                name: key.to_string(),
                category: u.category.clone(),
                return_type: u.return_type.clone(),
                args: u.arguments.iter().map(|a| a.type_name().map(str::to_string)).collect(),
            }));
        }
        if let Some(category) = category {
            return Some(UtilityLookup::Category {
                category: category.to_string(),
                functions: self
                    .ix
                    .utility_by_category
                    .get(category)
                    .cloned()
                    .unwrap_or_default(),
            });
        }
        let mut functions: Vec<String> = self.ix.utility_by_name.keys().cloned().collect();
        functions.sort();
        Some(UtilityLookup::Catalog { functions })
    }

    // Builtin classes

    pub fn builtin_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.ix.builtin_classes_by_name.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn builtin(&self, name: &str) -> Option<BuiltinDetail> {
        let key = self.resolve_builtin_key(name)?;
        let b = self.ix.builtin_classes_by_name.get(key)?;
        Some(BuiltinDetail {
            name: b.name.clone(),
            is_keyed: b.is_keyed,
            has_destructor: b.has_destructor,
            indexing_return_type: b.indexing_return_type.clone(),
            members: non_empty(b.members.iter().map(|m| BuiltinMemberView {
                name: m.name.clone(),
                ty: m.ty.as_ref().and_then(|t| t.name()).map(str::to_string),
            })),
            constants: non_empty(b.constants.iter().map(|c| ConstantView {
                name: c.name.clone(),
                value: c.value.clone(),
            })),
            constructors: non_empty(b.constructors.iter().map(|c| ConstructorView {
                index: c.index,
                args: c
                    .arguments
                    .iter()
                    .map(|a| a.type_name().map(str::to_string))
                    .collect(),
            })),
            operators: non_empty(b.operators.iter().map(|op| OperatorView {
                name: op.name.clone(),
                right_type: op.right_type.clone(),
                return_type: op.return_type.clone(),
            })),
            methods: non_empty(b.methods.iter().map(|m| BuiltinMethodView {
                name: m.name.clone(),
                return_type: m.return_type.clone(),
                is_vararg: m.is_vararg,
                args: m
                    .arguments
                    .iter()
                    .map(|a| a.type_name().map(str::to_string))
                    .collect(),
            })),
        })
    }

    /// `None` only when neither a size nor any offsets exist for the
    /// (builtin, configuration) pair.
    pub fn builtin_layout(&self, name: &str, config: &str) -> Option<Layout> {
        let key = self.resolve_builtin_key(name)?;
        let size = self
            .ix
            .builtin_sizes
            .get(config)
            .and_then(|sizes| sizes.get(key))
            .copied();
        let members = self
            .ix
            .builtin_offsets
            .get(config)
            .and_then(|offsets| offsets.get(key))
            .cloned()
            .unwrap_or_default();
        if size.is_none() && members.is_empty() {
            return None;
        }
        Some(Layout {
            class: key.to_string(),
            config: config.to_string(),
            size,
            members,
        })
    }

    pub fn builtin_member_offset(&self, name: &str, member: &str, config: &str) -> Option<u64> {
        let layout = self.builtin_layout(name, config)?;
        layout
            .members
            .iter()
            .find(|item| item.member == member)
            .map(|item| item.offset)
    }

    pub fn resolve_builtin_key(&self, name: &str) -> Option<&str> {
        resolve_key(&self.ix.builtin_classes_by_name, &self.ix.builtin_fold, name)
    }

    // Native structures

    pub fn native_struct(&self, name: &str) -> Option<&Arc<NativeStructRecord>> {
        let key = resolve_key(
            &self.ix.native_structs_by_name,
            &self.ix.native_struct_fold,
            name,
        )?;
        self.ix.native_structs_by_name.get(key)
    }

    pub fn native_struct_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.ix.native_structs_by_name.keys().cloned().collect();
        names.sort();
        names
    }

    // Global constants

    pub fn global_constant(&self, name: &str) -> Option<ConstantView> {
        let key = resolve_key(
            &self.ix.global_constants_by_name,
            &self.ix.global_constant_fold,
            name,
        )?;
        let gc = self.ix.global_constants_by_name.get(key)?;
        Some(ConstantView {
            name: gc.name.clone(),
            value: gc.value.clone(),
        })
    }

    pub fn global_constant_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.ix.global_constants_by_name.keys().cloned().collect();
        names.sort();
        names
    }
}

fn enum_view(name: &str, e: &EnumRecord) -> EnumView {
    EnumView {
        name: name.to_string(),
        values: e.values.iter().map(|v| v.name.clone()).collect(),
    }
}

fn method_sig(class: &str, method: &MethodRecord) -> MethodSig {
    MethodSig {
        class: class.to_string(),
        name: method.name.clone(),
        ret: method.return_value.as_ref().and_then(|r| r.ty.clone()),
        args: method
            .arguments
            .iter()
            .map(|a| a.type_name().map(str::to_string))
            .collect(),
        hash: method.hash,
        hash_compatibility: method.hash_compatibility.clone(),
        is_static: method.is_static,
        is_const: method.is_const,
        is_virtual: method.is_virtual,
        is_vararg: method.is_vararg,
    }
}

fn non_empty<T>(items: impl Iterator<Item = T>) -> Option<Vec<T>> {
    let collected: Vec<T> = items.collect();
    if collected.is_empty() {
        None
    } else {
        Some(collected)
    }
}
