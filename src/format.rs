// Deterministic string building for display output. No error cases.

use crate::schema::{ArgumentRecord, MethodRecord, PropertyRecord, SignalRecord};

/// Normalize a raw type descriptor for display. `typedarray::T` becomes
/// the generic form `Array<T>`, `enum::T` is stripped to the bare enum
/// name, and a missing type reads as `void`.
pub fn display_type(ty: Option<&str>) -> String {
    let Some(ty) = ty.filter(|t| !t.is_empty()) else {
        return "void".to_string();
    };
    if let Some(inner) = ty.strip_prefix("typedarray::") {
        return format!("Array<{inner}>");
    }
    if let Some(inner) = ty.strip_prefix("enum::") {
        return inner.to_string();
    }
    ty.to_string()
}

/// `ret Class::name(args) [flags]`, with the class qualifier omitted
/// when no owning class is given.
pub fn method_signature(method: &MethodRecord, class: Option<&str>) -> String {
    let ret = display_type(method.return_value.as_ref().and_then(|r| r.ty.as_deref()));
    let args = method
        .arguments
        .iter()
        .map(argument)
        .collect::<Vec<_>>()
        .join(", ");
    let name = if method.name.is_empty() {
        "<unnamed>"
    } else {
        method.name.as_str()
    };
    let qual = match class {
        Some(class) => format!("{class}::{name}"),
        None => name.to_string(),
    };
    let mut flags = Vec::new();
    if method.is_static {
        flags.push("static");
    }
    if method.is_const {
        flags.push("const");
    }
    if method.is_virtual {
        flags.push("virtual");
    }
    if method.is_vararg {
        flags.push("vararg");
    }
    let flags = if flags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", flags.join(", "))
    };
    format!("{ret} {qual}({args}){flags}")
}

fn argument(arg: &ArgumentRecord) -> String {
    let ty = display_type(arg.type_name());
    let name = arg.name.as_deref().unwrap_or("");
    if let Some(default) = &arg.default_value {
        return format!("{ty} {name}={default}");
    }
    if name.is_empty() {
        ty
    } else {
        format!("{ty} {name}")
    }
}

pub fn property_descriptor(prop: &PropertyRecord) -> String {
    let ty = display_type(prop.ty.as_ref().and_then(|t| t.name()));
    let name = if prop.name.is_empty() {
        "<unnamed>"
    } else {
        prop.name.as_str()
    };
    let mut extra = Vec::new();
    if let Some(getter) = prop.getter.as_deref().filter(|g| !g.is_empty()) {
        extra.push(format!("get={getter}"));
    }
    if let Some(setter) = prop.setter.as_deref().filter(|s| !s.is_empty()) {
        extra.push(format!("set={setter}"));
    }
    if let Some(index) = prop.index {
        extra.push(format!("index={index}"));
    }
    if extra.is_empty() {
        format!("{ty} {name}")
    } else {
        format!("{ty} {name} [{}]", extra.join(", "))
    }
}

pub fn signal_descriptor(signal: &SignalRecord) -> String {
    let name = if signal.name.is_empty() {
        "<unnamed>"
    } else {
        signal.name.as_str()
    };
    let args = signal
        .arguments
        .iter()
        .map(|arg| {
            let ty = arg.type_name().unwrap_or("void");
            match arg.name.as_deref().filter(|n| !n.is_empty()) {
                Some(arg_name) => format!("{ty} {arg_name}"),
                None => ty.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("signal {name}({args})")
}
