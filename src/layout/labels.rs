use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;

use crate::ir::Edge;

const AUTO_LABEL: &str = "event:auto";
const META_LABEL_MAX_CHARS: usize = 48;
const ELLIPSIS: &str = "...";
const TOKEN_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const RANDOM_TOKEN_LEN: usize = 7;
const COLLISION_RETRIES: usize = 8;

/// Source of short tokens used to make synthesized ids unique.
pub trait IdSource {
    fn next_token(&mut self) -> String;
}

/// Deterministic base-36 counter. Same input, same ids, same bytes.
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }
}

impl IdSource for SequentialIds {
    fn next_token(&mut self) -> String {
        let token = to_base36(self.next);
        self.next += 1;
        token
    }
}

/// Random base-36 tokens. Seeded instances are reproducible.
#[derive(Debug, Clone)]
pub struct RandomIds {
    rng: StdRng,
}

impl RandomIds {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl IdSource for RandomIds {
    fn next_token(&mut self) -> String {
        (0..RANDOM_TOKEN_LEN)
            .map(|_| TOKEN_ALPHABET[self.rng.gen_range(0..TOKEN_ALPHABET.len())] as char)
            .collect()
    }
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(TOKEN_ALPHABET[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

/// Id and label an edge is rendered with; the caller's edge is left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct EdgeText {
    pub id: String,
    pub label: String,
}

/// Fills missing ids and labels. `seq` counts synthesized ids within one call;
/// `taken` holds every id handed out or reserved so far.
pub(super) struct LabelSynthesizer<'ids> {
    ids: &'ids mut dyn IdSource,
    max_label_len: usize,
    seq: usize,
    taken: HashSet<String>,
}

impl<'ids> LabelSynthesizer<'ids> {
    pub fn new(ids: &'ids mut dyn IdSource, max_label_len: usize) -> Self {
        Self {
            ids,
            max_label_len,
            seq: 0,
            taken: HashSet::new(),
        }
    }

    /// Marks caller-supplied ids as used so synthesized ones never repeat them.
    pub fn reserve<'e>(mut self, existing: impl IntoIterator<Item = &'e str>) -> Self {
        self.taken.extend(existing.into_iter().map(str::to_string));
        self
    }

    pub fn annotate(&mut self, edge: &Edge) -> EdgeText {
        let id = match edge.id.as_deref() {
            Some(id) if !id.is_empty() => {
                self.taken.insert(id.to_string());
                id.to_string()
            }
            _ => self.fresh_id(),
        };
        let label = match edge.label.as_deref() {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => truncate_label(&label_from_meta(edge.meta.as_ref()), self.max_label_len),
        };
        EdgeText { id, label }
    }

    fn fresh_id(&mut self) -> String {
        self.seq += 1;
        let mut attempts = 0;
        loop {
            let candidate = format!("e-{}-{}", self.seq, self.ids.next_token());
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            attempts += 1;
            // A source that keeps repeating itself still terminates.
            if attempts % COLLISION_RETRIES == 0 {
                self.seq += 1;
            }
        }
    }
}

/// Fallback label from opaque edge metadata.
pub fn label_from_meta(meta: Option<&Value>) -> String {
    let Some(meta) = meta.filter(|value| truthy(value)) else {
        return AUTO_LABEL.to_string();
    };
    if let Value::String(text) = meta {
        return take_chars(text, META_LABEL_MAX_CHARS);
    }
    if let Some(name) = meta.get("name").and_then(text_of) {
        return take_chars(&name, META_LABEL_MAX_CHARS);
    }
    if let Some(kind) = meta.get("type").and_then(text_of) {
        return take_chars(&format!("event:{kind}"), META_LABEL_MAX_CHARS);
    }
    if let Some(payload) = meta.get("payload").filter(|value| truthy(value)) {
        if let Value::String(text) = payload {
            return take_chars(text, META_LABEL_MAX_CHARS);
        }
        if let Some(kind) = payload.get("type").and_then(text_of) {
            return take_chars(&format!("event:{kind}"), META_LABEL_MAX_CHARS);
        }
    }
    AUTO_LABEL.to_string()
}

/// Cuts `label` to `max_len` characters, ending in `...` when shortened.
pub fn truncate_label(label: &str, max_len: usize) -> String {
    if label.chars().count() <= max_len {
        return label.to_string();
    }
    if max_len <= ELLIPSIS.len() {
        return take_chars(label, max_len);
    }
    let mut out = take_chars(label, max_len - ELLIPSIS.len());
    out.push_str(ELLIPSIS);
    out
}

fn take_chars(text: &str, count: usize) -> String {
    text.chars().take(count).collect()
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map(|n| n != 0.0).unwrap_or(true),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn text_of(value: &Value) -> Option<String> {
    if !truthy(value) {
        return None;
    }
    Some(match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    })
}
