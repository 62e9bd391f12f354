use crate::error::Error;
use crate::thing::THING_ID_FIELD;
use serde_json::{Map, Value};

/// One selected field path, kept both as its segments and as the equivalent
/// JSON pointer (`attributes/color` -> `/attributes/color`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<String>,
    pointer: String,
}

impl FieldPath {
    fn parse(raw: &str) -> Result<Self, Error> {
        let trimmed = raw.trim().trim_start_matches('/');
        if trimmed.is_empty() {
            return Err(Error::invalid_field_selector(format!(
                "field path '{raw}' is empty"
            )));
        }
        let segments: Vec<String> = trimmed.split('/').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(Error::invalid_field_selector(format!(
                "field path '{raw}' contains an empty segment"
            )));
        }
        let pointer = format!("/{}", segments.join("/"));
        Ok(Self { segments, pointer })
    }

    pub fn pointer(&self) -> &str {
        &self.pointer
    }

    /// Whether this path selects nothing but the id field.
    pub fn is_id_path(&self) -> bool {
        self.segments.len() == 1 && self.segments[0] == THING_ID_FIELD
    }
}

/// Ordered set of field paths restricting which parts of a thing view get
/// serialized, parsed from the `fields` query parameter.
///
/// The parameter is a comma-separated list of slash-separated paths, for
/// example `fields=attributes/color,features`. Blank entries are ignored;
/// duplicate entries collapse to their first occurrence. A selector that ends
/// up with no usable path at all is rejected, as is any path containing an
/// empty segment (`attributes//color`).
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSelector {
    paths: Vec<FieldPath>,
}

impl FieldSelector {
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let mut paths: Vec<FieldPath> = Vec::new();
        for entry in raw.split(',') {
            if entry.trim().is_empty() {
                continue;
            }
            let path = FieldPath::parse(entry)?;
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
        if paths.is_empty() {
            return Err(Error::invalid_field_selector(format!(
                "field selector '{raw}' selects nothing"
            )));
        }
        Ok(Self { paths })
    }

    pub fn paths(&self) -> &[FieldPath] {
        &self.paths
    }

    /// Restrict `source` to the selected paths plus the id field. Selected
    /// paths absent from `source` are left out rather than nulled.
    pub fn project(&self, source: &Value) -> Value {
        let mut out = Map::new();
        if let Some(id) = source.get(THING_ID_FIELD) {
            out.insert(THING_ID_FIELD.to_string(), id.clone());
        }
        for path in &self.paths {
            if let Some(found) = source.pointer(path.pointer()) {
                insert_at(&mut out, &path.segments, found.clone());
            }
        }
        Value::Object(out)
    }

    /// True when `view` exposes at least one selected path other than the id
    /// field. A view matching none of them carries no information the client
    /// asked for, even though it still names the thing.
    pub fn any_non_id_path_in(&self, view: &Value) -> bool {
        self.paths
            .iter()
            .filter(|path| !path.is_id_path())
            .any(|path| view.pointer(path.pointer()).is_some())
    }
}

fn insert_at(target: &mut Map<String, Value>, segments: &[String], value: Value) {
    match segments {
        [] => {}
        [leaf] => {
            target.insert(leaf.clone(), value);
        }
        [head, rest @ ..] => {
            let child = target
                .entry(head.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(map) = child {
                insert_at(map, rest, value);
            }
        }
    }
}
