// Free-text query router. A fixed, priority-ordered cascade of trigger
// detectors; the first step whose trigger and extraction both succeed
// wins and the rest of the query is ignored. The ordering is a
// disambiguation policy: builtin layout/offset runs before the
// class-enum rule so "offset de Color.a" is not misread as an enum
// lookup just because it contains a dot.

use crate::lookup::{DEFAULT_BUILD_CONFIG, ExtApi};
use crate::model::{
    BuiltinParams, HashParams, LayoutParams, NameParams, OffsetParams, OffsetValue,
    QualifiedParams, RouteResult,
};

const LAYOUT_TRIGGERS: [&str; 4] = ["layout", "tamanho", "size", "offset"];
const CLASS_TRIGGERS: [&str; 2] = ["classe", "class"];
const METHOD_TRIGGERS: [&str; 3] = ["método", "metodo", "method"];

impl ExtApi {
    pub fn route(&self, q: &str) -> RouteResult {
        let ql = q.to_lowercase();

        // 1) builtin layout / size / offset
        if LAYOUT_TRIGGERS.iter().any(|kw| ql.contains(kw)) {
            if let Some(builtin) = self.known_builtin_in(q) {
                if ql.contains("offset") {
                    if let Some((left, member)) = dotted_pair(q, true) {
                        let class = self.known_builtin_in(&left).unwrap_or(left);
                        if let Some(offset) =
                            self.builtin_member_offset(&class, &member, DEFAULT_BUILD_CONFIG)
                        {
                            return RouteResult::BuiltinMemberOffset {
                                params: OffsetParams {
                                    config: DEFAULT_BUILD_CONFIG.to_string(),
                                    class,
                                    member,
                                },
                                result: OffsetValue { offset },
                            };
                        }
                    }
                }
                if let Some(layout) = self.builtin_layout(&builtin, DEFAULT_BUILD_CONFIG) {
                    return RouteResult::BuiltinLayout {
                        params: LayoutParams {
                            class: builtin,
                            config: layout.config.clone(),
                        },
                        result: layout,
                    };
                }
            }
        }

        // 2) method by hash
        if let Some(hash) = extract_hash(&ql) {
            let result = self.method_by_hash(&hash);
            return RouteResult::MethodByHash {
                params: HashParams { hash },
                result,
            };
        }

        // 3) builtin detail
        if ql.contains("builtin") {
            let toks = tokens(q);
            let name = builtin_adjacent(q, &toks)
                .map(str::to_string)
                .or_else(|| self.known_builtin_in(q));
            if let Some(name) = name {
                let result = self.builtin(&name);
                return RouteResult::Builtin {
                    params: BuiltinParams { class: name },
                    result,
                };
            }
        }

        // 4) Class.Enum, only after builtin layout has had first refusal
        if let Some((class, variant)) = dotted_pair(q, false) {
            let qualified = format!("{class}.{variant}");
            let result = self.class_enum(&qualified);
            return RouteResult::ClassEnum {
                params: QualifiedParams { qualified },
                result,
            };
        }

        // 5) class detail
        if CLASS_TRIGGERS.iter().any(|kw| ql.contains(kw)) {
            let toks = tokens(q);
            let name = keyword_adjacent(q, &toks, &CLASS_TRIGGERS)
                .map(str::to_string)
                .or_else(|| {
                    known_name_in(q, self.indexes().classes_by_name.keys().map(String::as_str))
                        .map(str::to_string)
                });
            if let Some(name) = name {
                let result = self.class_summary(&name);
                return RouteResult::Class {
                    params: NameParams { name },
                    result,
                };
            }
        }

        // 6) method by name: the first word token stands in for the
        // method name. Least precise rule, deliberately last.
        if METHOD_TRIGGERS.iter().any(|kw| ql.contains(kw)) {
            let candidate = tokens(q)
                .into_iter()
                .find(|tok| starts_identifier(tok.text));
            if let Some(tok) = candidate {
                let name = tok.text.to_string();
                let result = self.methods_by_name(&name, None);
                return RouteResult::MethodByName {
                    params: NameParams { name },
                    result,
                };
            }
        }

        RouteResult::Help {
            hints: help_hints(),
        }
    }

    /// Longest known builtin name occurring in `text` as a whole word,
    /// case-insensitive.
    fn known_builtin_in(&self, text: &str) -> Option<String> {
        known_name_in(
            text,
            self.indexes().builtin_classes_by_name.keys().map(String::as_str),
        )
        .map(str::to_string)
    }
}

pub fn help_hints() -> Vec<String> {
    [
        "Exemplos:",
        "builtin Color",
        "layout de Color",
        "offset de Color.a",
        "tamanho de Vector3",
        "classe Node",
        "método add_child",
        "Node.ProcessMode",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[derive(Debug, Clone, Copy)]
struct Token<'a> {
    text: &'a str,
    start: usize,
    end: usize,
}

fn is_word(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

fn starts_identifier(text: &str) -> bool {
    text.chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
}

fn tokens(q: &str) -> Vec<Token<'_>> {
    let mut out = Vec::new();
    let mut start = None;
    for (idx, ch) in q.char_indices() {
        if is_word(ch) {
            if start.is_none() {
                start = Some(idx);
            }
        } else if let Some(s) = start.take() {
            out.push(Token {
                text: &q[s..idx],
                start: s,
                end: idx,
            });
        }
    }
    if let Some(s) = start {
        out.push(Token {
            text: &q[s..],
            start: s,
            end: q.len(),
        });
    }
    out
}

/// Longest name first, so "Vector3" beats a hypothetical "Vector".
/// Whole-word, case-insensitive match anywhere in `text`.
fn known_name_in<'a>(text: &str, names: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let text_lower = text.to_lowercase();
    let mut names: Vec<&str> = names.filter(|n| !n.is_empty()).collect();
    names.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    for name in names {
        let needle = name.to_lowercase();
        let mut from = 0;
        while let Some(pos) = text_lower[from..].find(&needle) {
            let at = from + pos;
            let end = at + needle.len();
            let before_ok = text_lower[..at]
                .chars()
                .next_back()
                .is_none_or(|c| !is_word(c));
            let after_ok = text_lower[end..].chars().next().is_none_or(|c| !is_word(c));
            if before_ok && after_ok {
                return Some(name);
            }
            from = at + 1;
        }
    }
    None
}

/// `hash` followed by optional `:`/`=` and a run of digits, anywhere in
/// the lowercased query.
fn extract_hash(ql: &str) -> Option<String> {
    let bytes = ql.as_bytes();
    let mut search = 0;
    while let Some(pos) = ql[search..].find("hash") {
        let mut i = search + pos + "hash".len();
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i < bytes.len() && (bytes[i] == b':' || bytes[i] == b'=') {
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
        }
        let digits_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i > digits_start {
            return Some(ql[digits_start..i].to_string());
        }
        search += pos + "hash".len();
    }
    None
}

/// First `Identifier.Identifier` pair in the query. `allow_space`
/// additionally accepts whitespace around the dot (the offset form).
fn dotted_pair(q: &str, allow_space: bool) -> Option<(String, String)> {
    let toks = tokens(q);
    for pair in toks.windows(2) {
        let (left, right) = (pair[0], pair[1]);
        let gap = &q[left.end..right.start];
        let dot_ok = if allow_space {
            gap.contains('.') && gap.chars().all(|c| c == '.' || c.is_whitespace())
                && gap.chars().filter(|c| *c == '.').count() == 1
        } else {
            gap == "."
        };
        if !dot_ok {
            continue;
        }
        if !left.text.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
            continue;
        }
        if !starts_identifier(right.text) {
            continue;
        }
        return Some((left.text.to_string(), right.text.to_string()));
    }
    None
}

/// `builtin NAME` preferred, `NAME builtin` as fallback; the pair must
/// be separated by whitespace only.
fn builtin_adjacent<'a>(q: &'a str, toks: &[Token<'a>]) -> Option<&'a str> {
    for (i, tok) in toks.iter().enumerate() {
        if tok.text.eq_ignore_ascii_case("builtin") {
            if let Some(next) = toks.get(i + 1) {
                if whitespace_gap(q, tok.end, next.start) && starts_identifier(next.text) {
                    return Some(next.text);
                }
            }
        }
    }
    for (i, tok) in toks.iter().enumerate() {
        if tok.text.eq_ignore_ascii_case("builtin") && i > 0 {
            let prev = &toks[i - 1];
            if whitespace_gap(q, prev.end, tok.start) && starts_identifier(prev.text) {
                return Some(prev.text);
            }
        }
    }
    None
}

/// Name token immediately following one of the keyword tokens.
fn keyword_adjacent<'a>(q: &'a str, toks: &[Token<'a>], keywords: &[&str]) -> Option<&'a str> {
    for (i, tok) in toks.iter().enumerate() {
        let is_keyword = keywords
            .iter()
            .any(|kw| tok.text.eq_ignore_ascii_case(kw));
        if !is_keyword {
            continue;
        }
        if let Some(next) = toks.get(i + 1) {
            if whitespace_gap(q, tok.end, next.start) && starts_identifier(next.text) {
                return Some(next.text);
            }
        }
    }
    None
}

fn whitespace_gap(q: &str, from: usize, to: usize) -> bool {
    let gap = &q[from..to];
    !gap.is_empty() && gap.chars().all(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_split_on_dots_and_punctuation() {
        let toks = tokens("offset de Color.a?");
        let texts: Vec<&str> = toks.iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["offset", "de", "Color", "a"]);
    }

    #[test]
    fn extract_hash_accepts_separators() {
        assert_eq!(extract_hash("hash 123").as_deref(), Some("123"));
        assert_eq!(extract_hash("hash: 456").as_deref(), Some("456"));
        assert_eq!(extract_hash("hash=789").as_deref(), Some("789"));
        assert_eq!(extract_hash("methodhash 42").as_deref(), Some("42"));
        assert_eq!(extract_hash("hash of it"), None);
    }

    #[test]
    fn dotted_pair_spacing_rules() {
        assert_eq!(
            dotted_pair("offset de Color . a", true),
            Some(("Color".to_string(), "a".to_string()))
        );
        assert_eq!(dotted_pair("Color . a", false), None);
        assert_eq!(
            dotted_pair("Node.ProcessMode", false),
            Some(("Node".to_string(), "ProcessMode".to_string()))
        );
    }

    #[test]
    fn known_name_prefers_longest_whole_word() {
        let names = ["Vector3", "Vector", "Color"];
        assert_eq!(
            known_name_in("layout de vector3", names.iter().copied()),
            Some("Vector3")
        );
        assert_eq!(
            known_name_in("vector3i layout", names.iter().copied()),
            None
        );
    }

    #[test]
    fn builtin_adjacent_prefers_trailing_name() {
        let q = "builtin Color";
        assert_eq!(builtin_adjacent(q, &tokens(q)), Some("Color"));
        let q = "Color builtin";
        assert_eq!(builtin_adjacent(q, &tokens(q)), Some("Color"));
        let q = "builtin";
        assert_eq!(builtin_adjacent(q, &tokens(q)), None);
    }
}
