use extapi::lookup::ExtApi;
use extapi::model::RouteResult;
use extapi::schema;
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn api() -> ExtApi {
    let doc = schema::load_document(&fixture_path("mini_api.json")).unwrap();
    ExtApi::new(doc)
}

#[test]
fn layout_phrasings_return_identical_payloads() {
    let api = api();
    let routed = api.route("layout de Color");
    let RouteResult::BuiltinLayout { params, result } = &routed else {
        panic!("expected builtin_layout, got {}", routed.action());
    };
    assert_eq!(params.class, "Color");
    assert_eq!(params.config, "float_32");
    assert_eq!(result.size, Some(16));

    let other = api.route("size of color please");
    let RouteResult::BuiltinLayout { result: other, .. } = other else {
        panic!("expected builtin_layout");
    };
    assert_eq!(
        serde_json::to_value(result).unwrap(),
        serde_json::to_value(&other).unwrap()
    );
}

#[test]
fn tamanho_triggers_the_layout_rule() {
    let api = api();
    let routed = api.route("tamanho de Vector3");
    let RouteResult::BuiltinLayout { params, result } = routed else {
        panic!("expected builtin_layout");
    };
    assert_eq!(params.class, "Vector3");
    assert_eq!(result.size, Some(12));
}

#[test]
fn offset_with_dot_is_not_a_class_enum() {
    let api = api();
    let routed = api.route("offset de Color.a");
    let RouteResult::BuiltinMemberOffset { params, result } = routed else {
        panic!("expected builtin_member_offset");
    };
    assert_eq!(params.class, "Color");
    assert_eq!(params.member, "a");
    assert_eq!(params.config, "float_32");
    assert_eq!(result.offset, 12);
}

#[test]
fn offset_of_unknown_member_falls_back_to_layout() {
    let api = api();
    let routed = api.route("offset de Color.q");
    assert_eq!(routed.action(), "builtin_layout");
}

#[test]
fn hash_queries_match_string_equal_hashes() {
    let api = api();
    let routed = api.route("hash: 3863233950");
    let RouteResult::MethodByHash { params, result } = routed else {
        panic!("expected method_by_hash");
    };
    assert_eq!(params.hash, "3863233950");
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].name, "add_child");

    // compatibility alias resolves to the same method
    let routed = api.route("qual é o hash 333?");
    let RouteResult::MethodByHash { result, .. } = routed else {
        panic!("expected method_by_hash");
    };
    assert_eq!(result[0].name, "connect");

    // unknown hash still routes, with an empty result
    let routed = api.route("hash=1");
    let RouteResult::MethodByHash { result, .. } = routed else {
        panic!("expected method_by_hash");
    };
    assert!(result.is_empty());
}

#[test]
fn builtin_detail_is_case_insensitive() {
    let api = api();
    for q in ["builtin Color", "builtin color", "Color builtin"] {
        let routed = api.route(q);
        let RouteResult::Builtin { params, result } = routed else {
            panic!("expected builtin for {q:?}");
        };
        assert_eq!(params.class.to_lowercase(), "color");
        assert_eq!(result.unwrap().name, "Color");
    }
}

#[test]
fn builtin_falls_back_to_known_name_scan() {
    let api = api();
    // no adjacent capture, so the whole query is scanned for a known name
    let routed = api.route("builtin: vector3, por favor");
    let RouteResult::Builtin { result, .. } = routed else {
        panic!("expected builtin");
    };
    assert_eq!(result.unwrap().name, "Vector3");

    // the adjacent token wins even when it is not a known builtin; the
    // lookup then answers null
    let routed = api.route("mostra o builtin do tipo vector3");
    let RouteResult::Builtin { params, result } = routed else {
        panic!("expected builtin");
    };
    assert_eq!(params.class, "do");
    assert!(result.is_none());
}

#[test]
fn dotted_token_routes_to_class_enum() {
    let api = api();
    let routed = api.route("valores de Node.ProcessMode");
    let RouteResult::ClassEnum { params, result } = routed else {
        panic!("expected class_enum");
    };
    assert_eq!(params.qualified, "Node.ProcessMode");
    let view = result.unwrap();
    assert_eq!(view.name, "Node.ProcessMode");
    assert_eq!(view.values.len(), 3);

    // unknown qualified name still routes here, with a null result
    let routed = api.route("Foo.Bar");
    let RouteResult::ClassEnum { result, .. } = routed else {
        panic!("expected class_enum");
    };
    assert!(result.is_none());
}

#[test]
fn class_keyword_prefers_explicit_capture() {
    let api = api();
    let routed = api.route("classe Node");
    let RouteResult::Class { params, result } = routed else {
        panic!("expected class");
    };
    assert_eq!(params.name, "Node");
    assert_eq!(result.unwrap().name, "Node");

    // no explicit capture: scan the query for a known class name
    let routed = api.route("classe: timer");
    let RouteResult::Class { params, result } = routed else {
        panic!("expected class");
    };
    assert_eq!(params.name, "Timer");
    assert!(result.is_some());

    // the captured token wins even when it is not a known class
    let routed = api.route("what does the timer class do");
    let RouteResult::Class { params, result } = routed else {
        panic!("expected class");
    };
    assert_eq!(params.name, "do");
    assert!(result.is_none());
}

#[test]
fn method_rule_takes_the_first_word_token() {
    let api = api();
    let routed = api.route("add_child metodo");
    let RouteResult::MethodByName { params, result } = routed else {
        panic!("expected method_by_name");
    };
    assert_eq!(params.name, "add_child");
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].class, "Node");

    // the keyword itself is the first token; the rule is deliberately
    // imprecise and still fires with an empty result
    let routed = api.route("method add_child");
    let RouteResult::MethodByName { params, result } = routed else {
        panic!("expected method_by_name");
    };
    assert_eq!(params.name, "method");
    assert!(result.is_empty());
}

#[test]
fn priority_order_prefers_earlier_rules() {
    let api = api();
    // contains "class" and "method", but the layout rule wins
    assert_eq!(
        api.route("layout of Color for class and method").action(),
        "builtin_layout"
    );
    // contains a dotted token, but the hash rule runs first
    assert_eq!(api.route("Node.ProcessMode hash 222").action(), "method_by_hash");
    // "class" present but the dotted rule runs first
    assert_eq!(api.route("class Node.ProcessMode").action(), "class_enum");
}

#[test]
fn layout_keyword_without_known_builtin_falls_through() {
    let api = api();
    assert_eq!(api.route("layout de Foo").action(), "help");
    // falls through the layout rule into the class rule
    assert_eq!(api.route("size of class Node").action(), "class");
}

#[test]
fn unmatched_query_returns_help_hints() {
    let api = api();
    let routed = api.route("olá tudo bem?");
    let RouteResult::Help { hints } = routed else {
        panic!("expected help");
    };
    assert_eq!(hints[0], "Exemplos:");
    assert!(hints.contains(&"offset de Color.a".to_string()));
    assert_eq!(hints.len(), 8);
}

#[test]
fn route_results_serialize_with_action_tags() {
    let api = api();
    let value = serde_json::to_value(api.route("layout de Color")).unwrap();
    assert_eq!(value["action"], "builtin_layout");
    assert_eq!(value["params"]["class"], "Color");
    assert_eq!(value["result"]["size"], 16);

    let value = serde_json::to_value(api.route("builtin Dictionary")).unwrap();
    assert_eq!(value["action"], "builtin");
    assert_eq!(value["result"]["is_keyed"], true);
}
