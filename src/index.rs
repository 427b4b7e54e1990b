// Index builder: one pass per top-level collection of the schema
// document, producing the purpose-specific lookup maps plus the
// lowercase fallback maps. Rebuilding from the same document yields
// identical contents. Records with an empty name are skipped.

use crate::schema::{
    BuiltinClassRecord, ClassRecord, EnumRecord, GlobalConstantRecord, MemberOffset,
    MethodRecord, NativeStructRecord, SchemaDocument, UtilityFunctionRecord,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Lowercase key -> canonical casing. On a casing collision the
/// first-indexed name wins, matching source order.
#[derive(Debug, Default)]
pub struct NameFold(HashMap<String, String>);

impl NameFold {
    fn insert(&mut self, canonical: &str) {
        self.0
            .entry(canonical.to_lowercase())
            .or_insert_with(|| canonical.to_string());
    }

    pub fn canonical(&self, name: &str) -> Option<&str> {
        self.0.get(&name.to_lowercase()).map(String::as_str)
    }
}

/// A method hit annotated with its owning class.
pub type MethodEntry = (String, Arc<MethodRecord>);

#[derive(Debug, Default)]
pub struct Indexes {
    pub version: String,
    pub classes_by_name: HashMap<String, Arc<ClassRecord>>,
    pub methods_by_name: HashMap<String, Vec<MethodEntry>>,
    /// Keyed by the hash's decimal string form; one method registers
    /// under its primary hash and every compatibility alias.
    pub methods_by_hash: HashMap<String, Vec<MethodEntry>>,
    pub global_enums_by_name: HashMap<String, Arc<EnumRecord>>,
    /// Keyed by `Class.Enum` with the class's canonical casing.
    pub class_enums_by_qualname: HashMap<String, Arc<EnumRecord>>,
    pub singletons_by_name: BTreeMap<String, String>,
    /// build configuration -> builtin name -> total byte size
    pub builtin_sizes: HashMap<String, HashMap<String, u64>>,
    /// build configuration -> builtin name -> ordered member offsets
    pub builtin_offsets: HashMap<String, HashMap<String, Vec<MemberOffset>>>,
    pub utility_by_name: HashMap<String, Arc<UtilityFunctionRecord>>,
    pub utility_by_category: BTreeMap<String, Vec<String>>,
    pub native_structs_by_name: HashMap<String, Arc<NativeStructRecord>>,
    pub builtin_classes_by_name: HashMap<String, Arc<BuiltinClassRecord>>,
    pub global_constants_by_name: HashMap<String, Arc<GlobalConstantRecord>>,
    pub class_fold: NameFold,
    pub builtin_fold: NameFold,
    pub global_enum_fold: NameFold,
    pub utility_fold: NameFold,
    pub native_struct_fold: NameFold,
    pub global_constant_fold: NameFold,
    pub singleton_fold: NameFold,
}

impl Indexes {
    pub fn build(api: SchemaDocument) -> Self {
        let mut ix = Indexes {
            version: api.version_string(),
            ..Default::default()
        };

        for class in api.classes {
            if class.name.is_empty() {
                continue;
            }
            for method in &class.methods {
                if method.name.is_empty() {
                    continue;
                }
                ix.methods_by_name
                    .entry(method.name.clone())
                    .or_default()
                    .push((class.name.clone(), Arc::clone(method)));
                if let Some(hash) = method.hash {
                    ix.methods_by_hash
                        .entry(hash.to_string())
                        .or_default()
                        .push((class.name.clone(), Arc::clone(method)));
                }
                if let Some(compat) = &method.hash_compatibility {
                    for alias in compat.iter() {
                        ix.methods_by_hash
                            .entry(alias.to_string())
                            .or_default()
                            .push((class.name.clone(), Arc::clone(method)));
                    }
                }
            }
            for e in &class.enums {
                if !e.name.is_empty() {
                    ix.class_enums_by_qualname
                        .insert(format!("{}.{}", class.name, e.name), Arc::clone(e));
                }
            }
            ix.class_fold.insert(&class.name);
            ix.classes_by_name.insert(class.name.clone(), class);
        }

        for e in api.global_enums {
            if !e.name.is_empty() {
                ix.global_enum_fold.insert(&e.name);
                ix.global_enums_by_name.insert(e.name.clone(), e);
            }
        }

        for s in api.singletons {
            if !s.name.is_empty() && !s.ty.is_empty() {
                ix.singleton_fold.insert(&s.name);
                ix.singletons_by_name.insert(s.name, s.ty);
            }
        }

        for u in api.utility_functions {
            if u.name.is_empty() {
                continue;
            }
            let category = u.category.clone().unwrap_or_default();
            ix.utility_by_category
                .entry(category)
                .or_default()
                .push(u.name.clone());
            ix.utility_fold.insert(&u.name);
            ix.utility_by_name.insert(u.name.clone(), u);
        }

        for conf in api.builtin_class_sizes {
            if conf.build_configuration.is_empty() {
                continue;
            }
            let sizes = conf
                .sizes
                .into_iter()
                .filter_map(|item| {
                    let size = item.size?;
                    (!item.name.is_empty()).then_some((item.name, size))
                })
                .collect();
            ix.builtin_sizes.insert(conf.build_configuration, sizes);
        }

        for conf in api.builtin_class_member_offsets {
            if conf.build_configuration.is_empty() {
                continue;
            }
            let offsets = conf
                .classes
                .into_iter()
                .filter(|class| !class.name.is_empty())
                .map(|class| (class.name, class.members))
                .collect();
            ix.builtin_offsets.insert(conf.build_configuration, offsets);
        }

        for n in api.native_structures {
            if !n.name.is_empty() {
                ix.native_struct_fold.insert(&n.name);
                ix.native_structs_by_name.insert(n.name.clone(), n);
            }
        }

        for b in api.builtin_classes {
            if !b.name.is_empty() {
                ix.builtin_fold.insert(&b.name);
                ix.builtin_classes_by_name.insert(b.name.clone(), b);
            }
        }

        for gc in api.global_constants {
            if !gc.name.is_empty() {
                ix.global_constant_fold.insert(&gc.name);
                ix.global_constants_by_name.insert(gc.name.clone(), gc);
            }
        }

        ix
    }

    pub fn method_count(&self) -> usize {
        self.methods_by_name.values().map(Vec::len).sum()
    }
}

/// Exact match first, lowercase fallback second. When both an exact and
/// a case-differing key exist, the exact key wins.
pub fn resolve_key<'a, V>(
    primary: &'a HashMap<String, V>,
    fold: &'a NameFold,
    name: &str,
) -> Option<&'a str> {
    if let Some((key, _)) = primary.get_key_value(name) {
        return Some(key.as_str());
    }
    fold.canonical(name).filter(|key| primary.contains_key(*key))
}
