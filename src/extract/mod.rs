//! Static recovery of an executor's example request body
//!
//! The executor is never run. Its source is scanned for the `payload = {...}`
//! literal, which is cut out together with any block-string variables it
//! references, re-indented as a standalone script and evaluated in the
//! restricted script context. When every evaluation fails, a textual JSON
//! reading of the literal is the last resort. Failures of any kind degrade
//! to `None`.

pub mod scan;

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

use crate::script::{self, Bindings, EvalContext};
use scan::{contains_word, dedent, flatten, scan_line, BlockState};

/// The single key a lone string variable is wrapped under when the literal
/// itself does not evaluate to an object.
pub const SYNTHESIZED_KEY: &str = "x12";

fn assignment_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*payload\s*=\s*[\{\[]").unwrap())
}

fn block_variable_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*=\s*[rRbBuUfF]{0,2}("""|''')"#).unwrap()
    })
}

fn constant_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(None|True|False)\b").unwrap())
}

fn trailing_comma_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r",(\s*[\}\]])").unwrap())
}

/// The payload literal and the block-string definitions it depends on
#[derive(Debug, Clone, PartialEq)]
pub struct Snippet {
    pub literal: String,
    pub auxiliaries: Vec<Auxiliary>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Auxiliary {
    pub name: String,
    pub definition: String,
}

/// Cut the payload literal and its auxiliaries out of `source`
pub fn locate(source: &str) -> Option<Snippet> {
    let lines: Vec<&str> = source.split('\n').collect();

    let mut block: BlockState = None;
    let mut start = None;
    for (idx, line) in lines.iter().enumerate() {
        if block.is_none() && assignment_regex().is_match(line) {
            start = Some(idx);
            break;
        }
        scan_line(line, &mut block);
    }
    let start = start?;

    let mut depth = 0;
    let mut block: BlockState = None;
    let mut end = None;
    for (idx, line) in lines.iter().enumerate().skip(start) {
        depth += scan_line(line, &mut block);
        if depth <= 0 && block.is_none() {
            end = Some(idx);
            break;
        }
    }
    let end = end?;
    let literal = lines[start..=end].join("\n");

    let auxiliaries = collect_auxiliaries(&lines[..start], &literal);
    Some(Snippet {
        literal,
        auxiliaries,
    })
}

fn collect_auxiliaries(lines: &[&str], literal: &str) -> Vec<Auxiliary> {
    let mut found = Vec::new();
    let mut block: BlockState = None;
    let mut idx = 0;

    while idx < lines.len() {
        let line = lines[idx];
        if block.is_some() {
            scan_line(line, &mut block);
            idx += 1;
            continue;
        }

        let name = block_variable_regex()
            .captures(line)
            .map(|caps| caps[1].to_string());
        scan_line(line, &mut block);

        match name {
            Some(name) if contains_word(literal, &name) => {
                let first = idx;
                while block.is_some() && idx + 1 < lines.len() {
                    idx += 1;
                    scan_line(lines[idx], &mut block);
                }
                if block.is_none() {
                    found.push(Auxiliary {
                        name,
                        definition: lines[first..=idx].join("\n"),
                    });
                }
            }
            _ => {}
        }
        idx += 1;
    }

    found
}

enum Attempt {
    Found(Value),
    Failed { syntax: bool },
}

fn evaluate_payload(source: &str, auxiliaries: &[Auxiliary], ctx: &EvalContext<'_>) -> Attempt {
    match script::evaluate(source, ctx) {
        Ok(bindings) => match bindings.get("payload") {
            Some(value @ Value::Object(_)) => Attempt::Found(value.clone()),
            _ => match synthesize(&bindings, auxiliaries) {
                Some(value) => Attempt::Found(value),
                None => Attempt::Failed { syntax: false },
            },
        },
        Err(e) => {
            tracing::debug!(error = %e, "Payload snippet did not evaluate");
            Attempt::Failed {
                syntax: e.is_syntax(),
            }
        }
    }
}

/// A lone string auxiliary stands in for a literal that produced no object
fn synthesize(bindings: &Bindings, auxiliaries: &[Auxiliary]) -> Option<Value> {
    let strings: Vec<&str> = auxiliaries
        .iter()
        .filter_map(|aux| bindings.get(&aux.name).and_then(Value::as_str))
        .collect();
    match strings.as_slice() {
        [only] => {
            tracing::debug!(key = SYNTHESIZED_KEY, "Synthesizing payload from a lone string");
            let mut map = Map::new();
            map.insert(SYNTHESIZED_KEY.to_string(), Value::String(only.to_string()));
            Some(Value::Object(map))
        }
        _ => None,
    }
}

/// Run the combined and literal-only attempts over prepared blocks
fn run_attempts(
    literal: &str,
    auxiliaries: &[Auxiliary],
    ctx: &EvalContext<'_>,
) -> Result<Value, bool> {
    let mut sources = Vec::with_capacity(2);
    if !auxiliaries.is_empty() {
        let mut combined: Vec<&str> = auxiliaries.iter().map(|a| a.definition.as_str()).collect();
        combined.push(literal);
        sources.push(combined.join("\n"));
    }
    sources.push(literal.to_string());

    let mut saw_syntax_error = false;
    for source in &sources {
        match evaluate_payload(source, auxiliaries, ctx) {
            Attempt::Found(value) => return Ok(value),
            Attempt::Failed { syntax } => saw_syntax_error |= syntax,
        }
    }
    Err(saw_syntax_error)
}

fn reshape(snippet: &Snippet, f: fn(&str) -> String) -> (String, Vec<Auxiliary>) {
    let auxiliaries = snippet
        .auxiliaries
        .iter()
        .map(|aux| Auxiliary {
            name: aux.name.clone(),
            definition: f(&aux.definition),
        })
        .collect();
    (f(&snippet.literal), auxiliaries)
}

/// Read the literal's right-hand side as JSON after swapping constant spellings
fn textual_fallback(literal: &str) -> Option<Value> {
    let (_, rhs) = literal.split_once('=')?;
    let replaced = constant_regex().replace_all(rhs, |caps: &regex::Captures| match &caps[1] {
        "None" => "null",
        "True" => "true",
        _ => "false",
    });
    let cleaned = trailing_comma_regex().replace_all(&replaced, "$1");
    match serde_json::from_str::<Value>(cleaned.trim()) {
        Ok(value @ Value::Object(_)) => Some(value),
        _ => None,
    }
}

/// Recover the example request body from executor source text
pub fn extract_payload(source: &str, ctx: &EvalContext<'_>) -> Option<Value> {
    let snippet = locate(source)?;

    let (literal, auxiliaries) = reshape(&snippet, dedent);
    match run_attempts(&literal, &auxiliaries, ctx) {
        Ok(value) => return Some(value),
        Err(true) => {
            tracing::debug!("Retrying payload snippet with flattened indentation");
            let (literal, auxiliaries) = reshape(&snippet, flatten);
            if let Ok(value) = run_attempts(&literal, &auxiliaries, ctx) {
                return Some(value);
            }
        }
        Err(false) => {}
    }

    tracing::debug!("Falling back to textual JSON reading of the payload literal");
    textual_fallback(&snippet.literal)
}
