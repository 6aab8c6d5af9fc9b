//! Build-time state-table generator for the actson grammar DSL.
//!
//! Consumed from `build.rs` via [`generate`]. Parses a declarative grammar
//! description (byte classes + states + match specifiers) and emits a Rust
//! source file defining the byte-to-class table, the `[state][class]`
//! transition table, and named constants for every state and action so that
//! the runtime parser can reference them by name.
//!
//! The grammar format intentionally keeps action bodies out of the
//! generated code: a match either names another rule (a plain transition)
//! or one of a fixed set of action labels (resolved to a negative id). The
//! bodies behind those action labels - token stack manipulation, nesting
//! stack manipulation, `ifconfig` flag checks - are hand-written in the
//! consuming crate's `actions`/`parser` modules, addressed by the constants
//! this crate emits.
//!
//! Match specifiers (both a class's `bytes` entries and a rule's match
//! keys) accept a single ASCII character, an `"0xHH"` literal byte, or an
//! `"0xHH-0xHH"` inclusive range. A rule key that isn't a declared class
//! name is tried as one of these literals; since the emitted table is
//! compressed to one column per *class* rather than one per byte, every
//! byte a literal expands to must already share a single class - a literal
//! straddling two classes is a grammar error ([`GenError::SplitClass`]),
//! not a silent pick of one side.
//!
//! A rule whose entire match table is `{"???": target}` is virtual: it
//! never gets a dispatchable state id and is never a transition target
//! itself, existing only so other rules can name it as a match target and
//! have `target`'s resolved action inlined in its place. Virtual rules may
//! not reference other virtual rules.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use thiserror::Error;

/// Sentinel transition value for the "try to recover" rows (`ok`, `ze`,
/// `in`, `fr`, `e3` in the shipped grammar). Not a state id and not an
/// action id - `parser.rs` hardcodes the same numeric value as its own `RC`
/// constant, since a build-dependency's constants aren't visible to the
/// crate's own runtime code.
pub const RECOVER_SENTINEL: i16 = 999;

#[derive(Debug, Error)]
pub enum GenError {
    #[error("grammar root must be a JSON object")]
    RootNotObject,
    #[error("missing `{0}` section")]
    MissingSection(&'static str),
    #[error("duplicate class name: {0}")]
    DuplicateClass(String),
    #[error("duplicate rule name: {0}")]
    DuplicateRule(String),
    #[error("rule `{0}` references unknown class or rule `{1}`")]
    UnknownReference(String, String),
    #[error("class `{0}` has more than 22 entries")]
    ClassTooLarge(String),
    #[error("byte 0x{0:02x} is assigned to more than one class")]
    OverlappingClass(u8),
    #[error("rule `{0}` has an empty match table")]
    EmptyRule(String),
    #[error("action label `{0}` used in rule `{1}` is not declared in the `actions` list")]
    UnknownAction(String, String),
    #[error("malformed match target in rule `{0}`: {1}")]
    MalformedTarget(String, String),
    #[error("no rule named `go` (the start state) was found")]
    MissingStartRule,
    #[error("literal match `{1}` in rule `{0}` spans bytes assigned to more than one class")]
    SplitClass(String, String),
    #[error("invalid byte range `{0}` (expected \"0xHH-0xHH\" with lo <= hi)")]
    InvalidRange(String),
}

/// Parse `grammar_json` and emit a complete Rust source file (as a string)
/// defining the byte-class table, the transition table, and named
/// `pub(crate) const` state/action identifiers.
pub fn generate(grammar_json: &str) -> Result<String, GenError> {
    let root: Value = serde_json::from_str(grammar_json)
        .map_err(|e| GenError::MalformedTarget("<root>".into(), e.to_string()))?;
    let root = root.as_object().ok_or(GenError::RootNotObject)?;

    let classes_json = root
        .get("classes")
        .and_then(Value::as_object)
        .ok_or(GenError::MissingSection("classes"))?;
    let rules_json = root
        .get("rules")
        .and_then(Value::as_object)
        .ok_or(GenError::MissingSection("rules"))?;
    let actions_json = root
        .get("actions")
        .and_then(Value::as_array)
        .ok_or(GenError::MissingSection("actions"))?;
    let states_json = root
        .get("states")
        .and_then(Value::as_array)
        .ok_or(GenError::MissingSection("states"))?;

    // --- classes: name -> (id, is_default) -------------------------------
    let mut class_order: Vec<String> = Vec::new();
    let mut class_ids: BTreeMap<String, usize> = BTreeMap::new();
    let mut default_class: Option<String> = None;
    let mut byte_class = [-1i16; 256];

    for (name, spec) in classes_json {
        if class_ids.contains_key(name) {
            return Err(GenError::DuplicateClass(name.clone()));
        }
        let id = class_order.len();
        class_ids.insert(name.clone(), id);
        class_order.push(name.clone());

        let obj = spec.as_object();
        let is_default = obj
            .and_then(|o| o.get("default"))
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if is_default {
            default_class = Some(name.clone());
        }

        let chars: Vec<String> = obj
            .and_then(|o| o.get("bytes"))
            .and_then(Value::as_array)
            .map(|a| {
                a.iter()
                    .filter_map(Value::as_str)
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default();
        if chars.len() > 22 {
            return Err(GenError::ClassTooLarge(name.clone()));
        }
        for ch in &chars {
            let bytes = parse_byte_spec(ch).ok_or_else(|| {
                GenError::MalformedTarget(name.clone(), format!("not a byte or byte range: {ch}"))
            })?;
            for b in bytes {
                if byte_class[b as usize] != -1 {
                    return Err(GenError::OverlappingClass(b));
                }
                byte_class[b as usize] = id as i16;
            }
        }
    }

    // default class fills every printable/high byte not explicitly assigned,
    // mirroring the ASCII_CLASS table's treatment of bytes >= 0x80 and
    // printable ASCII as a catch-all, while true control bytes stay illegal.
    if let Some(def) = &default_class {
        let def_id = class_ids[def] as i16;
        for b in 0x20u16..=0x7eu16 {
            if byte_class[b as usize] == -1 {
                byte_class[b as usize] = def_id;
            }
        }
        for b in 0x7fu16..=0xffu16 {
            if byte_class[b as usize] == -1 {
                byte_class[b as usize] = def_id;
            }
        }
    }

    // --- actions: ordered label list, id = -(index + 2) ------------------
    let mut action_ids: BTreeMap<String, i16> = BTreeMap::new();
    for (i, v) in actions_json.iter().enumerate() {
        let name = v
            .as_str()
            .ok_or_else(|| GenError::MalformedTarget("<actions>".into(), "not a string".into()))?;
        action_ids.insert(name.to_string(), -(i as i16 + 2));
    }

    // --- states: explicit ordered id assignment ---------------------------
    let mut state_order: Vec<String> = Vec::new();
    let mut state_ids: BTreeMap<String, i16> = BTreeMap::new();
    for (i, v) in states_json.iter().enumerate() {
        let name = v
            .as_str()
            .ok_or_else(|| GenError::MalformedTarget("<states>".into(), "not a string".into()))?;
        if state_ids.contains_key(name) {
            return Err(GenError::DuplicateRule(name.to_string()));
        }
        state_ids.insert(name.to_string(), i as i16);
        state_order.push(name.to_string());
    }
    if !state_ids.contains_key("go") {
        return Err(GenError::MissingStartRule);
    }

    // --- virtual rules: {"???": target}, never dispatchable, resolved once
    // up front so ordinary rules can name them as match targets -----------
    let mut virtual_ids: BTreeMap<String, i16> = BTreeMap::new();
    for (rule_name, matches) in rules_json {
        let Some(obj) = matches.as_object() else {
            continue;
        };
        if obj.len() == 1 {
            if let Some(target) = obj.get("???") {
                let resolved = resolve_target(
                    target,
                    rule_name,
                    &state_ids,
                    &action_ids,
                    &BTreeMap::new(),
                )?;
                virtual_ids.insert(rule_name.clone(), resolved);
            }
        }
    }

    // --- rules: state x class -> entry ------------------------------------
    let n_states = state_order.len();
    let n_classes = class_order.len();
    let mut table = vec![-1i16; n_states * n_classes];

    for (rule_name, matches) in rules_json {
        if virtual_ids.contains_key(rule_name) {
            continue;
        }
        let &state_id = state_ids
            .get(rule_name)
            .ok_or_else(|| GenError::UnknownReference("<states>".into(), rule_name.clone()))?;
        let matches = matches
            .as_object()
            .ok_or_else(|| GenError::MalformedTarget(rule_name.clone(), "not an object".into()))?;
        if matches.is_empty() {
            return Err(GenError::EmptyRule(rule_name.clone()));
        }

        // resolve the default ("...") entry first, if present
        let mut default_entry: Option<i16> = None;
        if let Some(v) = matches.get("...") {
            default_entry =
                Some(resolve_target(v, rule_name, &state_ids, &action_ids, &virtual_ids)?);
        }
        if let Some(entry) = default_entry {
            for c in 0..n_classes {
                table[state_id as usize * n_classes + c] = entry;
            }
        }

        for (key, v) in matches {
            if key == "..." {
                continue;
            }
            let entry = resolve_target(v, rule_name, &state_ids, &action_ids, &virtual_ids)?;
            if let Some(&class_id) = class_ids.get(key) {
                table[state_id as usize * n_classes + class_id] = entry;
                continue;
            }
            let bytes = parse_byte_spec(key)
                .ok_or_else(|| GenError::UnknownReference(rule_name.clone(), key.clone()))?;
            let mut target_class: Option<i16> = None;
            for b in bytes {
                let c = byte_class[b as usize];
                if c < 0 {
                    return Err(GenError::UnknownReference(rule_name.clone(), key.clone()));
                }
                match target_class {
                    None => target_class = Some(c),
                    Some(existing) if existing != c => {
                        return Err(GenError::SplitClass(rule_name.clone(), key.clone()));
                    }
                    _ => {}
                }
            }
            if let Some(class_id) = target_class {
                table[state_id as usize * n_classes + class_id as usize] = entry;
            }
        }
    }

    Ok(emit(
        &class_order,
        &byte_class,
        &state_order,
        &state_ids,
        &action_ids,
        &table,
        n_classes,
    ))
}

fn resolve_target(
    v: &Value,
    rule_name: &str,
    state_ids: &BTreeMap<String, i16>,
    action_ids: &BTreeMap<String, i16>,
    virtual_ids: &BTreeMap<String, i16>,
) -> Result<i16, GenError> {
    let name = v.as_str().ok_or_else(|| {
        GenError::MalformedTarget(rule_name.to_string(), "match target must be a string".into())
    })?;
    if let Some(&id) = state_ids.get(name) {
        return Ok(id);
    }
    if let Some(&id) = action_ids.get(name) {
        return Ok(id);
    }
    // A virtual rule's own resolved action, inlined wherever its name is
    // used as a match target.
    if let Some(&id) = virtual_ids.get(name) {
        return Ok(id);
    }
    if name == "error" {
        return Ok(-1);
    }
    // Sentinel used by the "post-value dispatch" rows (ok/ze/in/fr/e3): the
    // runtime tries to recover either by finalizing the pending value first
    // (streaming mode, top-level) or by treating the missing separator as an
    // implicit comma (`optional_commas`). Kept out of the ordinary state/
    // action namespaces since its handling is entirely hand-written.
    if name == "recover" {
        return Ok(RECOVER_SENTINEL);
    }
    Err(GenError::UnknownAction(name.to_string(), rule_name.to_string()))
}

fn single_byte(s: &str) -> Option<u8> {
    if let Some(hex) = s.strip_prefix("0x") {
        return u8::from_str_radix(hex, 16).ok();
    }
    let bytes = s.as_bytes();
    if bytes.len() == 1 {
        Some(bytes[0])
    } else {
        None
    }
}

/// Parse a match specifier into the bytes it covers: a single ASCII char,
/// an `"0xHH"` literal, or an `"0xHH-0xHH"` inclusive range.
fn parse_byte_spec(s: &str) -> Option<Vec<u8>> {
    if let Some((lo, hi)) = s.split_once('-') {
        let lo = lo.strip_prefix("0x").and_then(|h| u8::from_str_radix(h, 16).ok())?;
        let hi = hi.strip_prefix("0x").and_then(|h| u8::from_str_radix(h, 16).ok())?;
        if lo > hi {
            return None;
        }
        Some((lo..=hi).collect())
    } else {
        single_byte(s).map(|b| vec![b])
    }
}

#[allow(clippy::too_many_arguments)]
fn emit(
    class_order: &[String],
    byte_class: &[i16; 256],
    state_order: &[String],
    state_ids: &BTreeMap<String, i16>,
    action_ids: &BTreeMap<String, i16>,
    table: &[i16],
    n_classes: usize,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "// @generated by actson-gen-table from gen/grammar.json");
    let _ = writeln!(out, "#![allow(dead_code)]");
    let _ = writeln!(out, "pub(crate) const N_CLASSES: usize = {n_classes};");
    let _ = writeln!(out, "pub(crate) const N_STATES: usize = {};", state_order.len());

    let _ = writeln!(out, "#[rustfmt::skip]");
    let _ = write!(out, "pub(crate) const BYTE_CLASS: [i16; 256] = [");
    for (i, c) in byte_class.iter().enumerate() {
        if i % 16 == 0 {
            let _ = write!(out, "\n    ");
        }
        let _ = write!(out, "{c}, ");
    }
    let _ = writeln!(out, "\n];");

    for (name, &id) in state_ids {
        let _ = writeln!(out, "pub(crate) const {}: i16 = {id};", name.to_uppercase());
    }
    for (name, &id) in action_ids {
        let _ = writeln!(
            out,
            "pub(crate) const ACT_{}: i16 = {id};",
            name.to_uppercase()
        );
    }

    let _ = writeln!(out, "#[rustfmt::skip]");
    let _ = write!(
        out,
        "pub(crate) const TRANSITIONS: [i16; {}] = [",
        table.len()
    );
    for (i, e) in table.iter().enumerate() {
        if i % n_classes == 0 {
            let _ = write!(out, "\n    /* {} */ ", state_order.get(i / n_classes).map(String::as_str).unwrap_or("?"));
        }
        let _ = write!(out, "{e}, ");
    }
    let _ = writeln!(out, "\n];");

    let _ = writeln!(out, "pub(crate) const CLASS_NAMES: [&str; {}] = [", class_order.len());
    for c in class_order {
        let _ = writeln!(out, "    \"{c}\",");
    }
    let _ = writeln!(out, "];");

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_minimal_grammar() {
        let json = r#"{
            "classes": {
                "space": {"bytes": [" "]},
                "etc": {"default": true}
            },
            "states": ["go", "ok"],
            "actions": ["accept"],
            "rules": {
                "go": {"space": "go", "...": "accept"},
                "ok": {"...": "ok"}
            }
        }"#;
        let out = generate(json).expect("valid grammar");
        assert!(out.contains("pub(crate) const GO: i16 = 0;"));
        assert!(out.contains("pub(crate) const OK: i16 = 1;"));
        assert!(out.contains("pub(crate) const ACT_ACCEPT: i16 = -2;"));
    }

    #[test]
    fn rejects_overlapping_bytes() {
        let json = r#"{
            "classes": {
                "a": {"bytes": ["x"]},
                "b": {"bytes": ["x"]}
            },
            "states": ["go"],
            "actions": [],
            "rules": {"go": {"a": "go"}}
        }"#;
        assert!(matches!(generate(json), Err(GenError::OverlappingClass(_))));
    }

    #[test]
    fn rejects_unknown_reference() {
        let json = r#"{
            "classes": {"a": {"bytes": ["x"]}},
            "states": ["go"],
            "actions": [],
            "rules": {"go": {"a": "nowhere"}}
        }"#;
        assert!(matches!(generate(json), Err(GenError::UnknownAction(_, _))));
    }

    #[test]
    fn class_accepts_a_byte_range() {
        let json = r#"{
            "classes": {
                "digit": {"bytes": ["0x30-0x39"]},
                "etc": {"default": true}
            },
            "states": ["go", "num"],
            "actions": [],
            "rules": {
                "go": {"digit": "num", "...": "go"},
                "num": {"...": "num"}
            }
        }"#;
        let out = generate(json).expect("valid grammar");
        assert!(out.contains("pub(crate) const NUM: i16 = 1;"));
    }

    #[test]
    fn rejects_reversed_byte_range() {
        let json = r#"{
            "classes": {"digit": {"bytes": ["0x39-0x30"]}},
            "states": ["go"],
            "actions": [],
            "rules": {"go": {"digit": "go"}}
        }"#;
        assert!(matches!(
            generate(json),
            Err(GenError::MalformedTarget(_, _))
        ));
    }

    #[test]
    fn rule_accepts_a_literal_byte_not_in_any_class() {
        let json = r#"{
            "classes": {
                "etc": {"bytes": ["0x30-0x39"], "default": true}
            },
            "states": ["go", "dot"],
            "actions": [],
            "rules": {
                "go": {"0x2e": "dot", "...": "go"},
                "dot": {"...": "dot"}
            }
        }"#;
        let out = generate(json).expect("valid grammar");
        assert!(out.contains("pub(crate) const DOT: i16 = 1;"));
    }

    #[test]
    fn rejects_a_literal_spanning_two_classes() {
        let json = r#"{
            "classes": {
                "lo": {"bytes": ["0x30"]},
                "hi": {"bytes": ["0x31"]}
            },
            "states": ["go"],
            "actions": [],
            "rules": {"go": {"0x30-0x31": "go"}}
        }"#;
        assert!(matches!(generate(json), Err(GenError::SplitClass(_, _))));
    }

    #[test]
    fn virtual_rule_is_inlined_and_never_becomes_a_state() {
        let json = r#"{
            "classes": {"etc": {"default": true}},
            "states": ["go"],
            "actions": ["finish"],
            "rules": {
                "go": {"...": "shared"},
                "shared": {"???": "finish"}
            }
        }"#;
        let out = generate(json).expect("valid grammar");
        assert!(!out.contains("pub(crate) const SHARED"));
        assert!(out.contains("/* go */ -2,"));
    }
}
