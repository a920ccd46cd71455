// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decoding hierarchies from nested JSON documents and from flat link tables.

use hashbrown::HashMap;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ValidationError;
use crate::tree::Tree;
use crate::types::{Datum, NodeId};

/// One row of a flat parent-link table, as accepted by [`Tree::from_links`].
///
/// Rows can be deserialized from JSON objects such as
/// `{"id": "a", "parent": "root", "size": 3}`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct LinkRecord {
    /// Unique identifier of this node.
    pub id: String,
    /// Identifier of the parent, or `None` (or an empty string) for the root.
    #[serde(default)]
    pub parent: Option<String>,
    /// Optional display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Optional non-negative weight.
    #[serde(default)]
    pub size: Option<f64>,
}

impl Tree {
    /// Decode a nested JSON document.
    ///
    /// See [`Tree::from_json_value`] for the accepted shape.
    pub fn from_json_str(text: &str) -> Result<Self, ValidationError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_json_value(&value)
    }

    /// Decode a nested JSON value of the shape
    /// `{ "id"?: string, "name"?: string, "size"?: number, "children"?: [node] }`.
    ///
    /// Unknown fields are ignored. A node without `id` takes its `name` as id,
    /// and failing that the path `"{parent id}.{index}"` (`"root"` for the root).
    pub fn from_json_value(document: &Value) -> Result<Self, ValidationError> {
        let root_path = String::from("$");
        let root_obj = as_object(document, &root_path)?;
        let mut tree = Self::with_root(read_datum(root_obj, &root_path, || "root".into())?);

        // Depth-first with an explicit stack so deep documents cannot overflow.
        let mut stack: Vec<(&Map<String, Value>, NodeId, String)> =
            vec![(root_obj, NodeId::ROOT, root_path)];
        while let Some((obj, id, path)) = stack.pop() {
            let Some(children) = obj.get("children") else {
                continue;
            };
            let children = match children {
                Value::Array(children) => children,
                Value::Null => continue,
                _ => return Err(ValidationError::ChildrenNotArray { path }),
            };
            let mut pending = Vec::with_capacity(children.len());
            for (i, child) in children.iter().enumerate() {
                let child_path = format!("{path}.children[{i}]");
                let child_obj = as_object(child, &child_path)?;
                let parent_id = &tree.datum(id).id;
                let datum = read_datum(child_obj, &child_path, || format!("{parent_id}.{i}"))?;
                let child_id = tree.push_child(id, datum);
                pending.push((child_obj, child_id, child_path));
            }
            stack.extend(pending.into_iter().rev());
        }

        tree.finish();
        Ok(tree)
    }

    /// Build a hierarchy from a flat table of parent links.
    ///
    /// Exactly one record must lack a parent. Every other record must name an
    /// existing parent, ids must be unique, and every record must be reachable
    /// from the root; records that are not reachable form a cycle. Children
    /// keep the order in which they appear in the table.
    pub fn from_links(records: &[LinkRecord]) -> Result<Self, ValidationError> {
        let mut index: HashMap<&str, usize> = HashMap::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            if index.insert(record.id.as_str(), i).is_some() {
                return Err(ValidationError::DuplicateId(record.id.clone()));
            }
            check_size(record.size, &format!("$[{i}]"))?;
        }

        let mut root: Option<usize> = None;
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); records.len()];
        for (i, record) in records.iter().enumerate() {
            match record.parent.as_deref() {
                None | Some("") => {
                    if let Some(first) = root {
                        return Err(ValidationError::MultipleRoots {
                            first: records[first].id.clone(),
                            second: record.id.clone(),
                        });
                    }
                    root = Some(i);
                }
                Some(parent) => {
                    let Some(&p) = index.get(parent) else {
                        return Err(ValidationError::MissingParent {
                            id: record.id.clone(),
                            parent: parent.into(),
                        });
                    };
                    children[p].push(i);
                }
            }
        }
        let root = root.ok_or(ValidationError::NoRoot)?;

        let mut tree = Self::with_root(link_datum(&records[root]));
        let mut visited = vec![false; records.len()];
        visited[root] = true;
        let mut queue = std::collections::VecDeque::from([(root, NodeId::ROOT)]);
        while let Some((record, id)) = queue.pop_front() {
            for &child in &children[record] {
                visited[child] = true;
                let child_id = tree.push_child(id, link_datum(&records[child]));
                queue.push_back((child, child_id));
            }
        }
        if let Some(stray) = visited.iter().position(|seen| !seen) {
            return Err(ValidationError::Cycle(records[stray].id.clone()));
        }

        tree.finish();
        debug!(records = records.len(), "stratified link table");
        Ok(tree)
    }
}

fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, ValidationError> {
    value.as_object().ok_or_else(|| ValidationError::NotAnObject {
        path: path.into(),
    })
}

fn read_string(
    obj: &Map<String, Value>,
    path: &str,
    field: &'static str,
) -> Result<Option<String>, ValidationError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        // Numeric ids are common in exported data; keep their text form.
        Some(Value::Number(n)) if field == "id" => Ok(Some(n.to_string())),
        Some(_) => Err(ValidationError::FieldNotString {
            path: path.into(),
            field,
        }),
    }
}

fn read_datum(
    obj: &Map<String, Value>,
    path: &str,
    fallback_id: impl FnOnce() -> String,
) -> Result<Datum, ValidationError> {
    let name = read_string(obj, path, "name")?;
    let id = read_string(obj, path, "id")?;
    let size = match obj.get("size") {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => n.as_f64(),
        Some(_) => {
            return Err(ValidationError::SizeNotNumber { path: path.into() });
        }
    };
    check_size(size, path)?;
    let id = id.or_else(|| name.clone()).unwrap_or_else(fallback_id);
    Ok(Datum { id, name, size })
}

fn check_size(size: Option<f64>, path: &str) -> Result<(), ValidationError> {
    match size {
        Some(size) if !size.is_finite() => {
            Err(ValidationError::NonFiniteSize { path: path.into() })
        }
        Some(size) if size < 0.0 => Err(ValidationError::NegativeSize {
            path: path.into(),
            size,
        }),
        _ => Ok(()),
    }
}

fn link_datum(record: &LinkRecord) -> Datum {
    Datum {
        id: record.id.clone(),
        name: record.name.clone(),
        size: record.size,
    }
}
