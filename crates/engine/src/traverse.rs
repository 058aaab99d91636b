//! Path mutation over a decoded document
//!
//! Put and delete work on a private decoded copy. Put never creates
//! intermediate containers: each step before the last must already resolve
//! to the kind of container the following step needs.

use docengine_core::{DocPath, PathError, PathStep, TypeTag, Value};

/// Name of the first `n` steps for error messages
fn step_label(path: &DocPath, n: usize) -> String {
    if n == 0 {
        "(root)".to_string()
    } else {
        path.prefix_string(n)
    }
}

fn not_a_container(path: &DocPath, n: usize, next: &PathStep, found: &Value) -> PathError {
    PathError::NotAContainer {
        step: step_label(path, n),
        expected: next.container_name(),
        found: found.type_name(),
    }
}

/// Set the value at a path
///
/// A final key inserts or overwrites in place. A final index overwrites when
/// `index < len` and appends when `index == len`.
///
/// # Errors
///
/// `Missing` if an intermediate step does not exist, `NotAContainer` if a
/// step meets the wrong kind of value, `IndexOutOfBounds` if the final index
/// is past the end, `RootNotDocument` if the root is not a document.
pub(crate) fn set_at_path(root: &mut Value, path: &DocPath, value: Value) -> Result<(), PathError> {
    if !root.is_document() {
        return Err(PathError::RootNotDocument);
    }

    let steps = path.steps();
    let Some((last, parents)) = steps.split_last() else {
        *root = value;
        return Ok(());
    };

    let mut current = root;
    for (i, step) in parents.iter().enumerate() {
        current = match (step, current) {
            (PathStep::Key(key), Value::Document(doc)) => {
                doc.get_mut(key).ok_or_else(|| PathError::Missing {
                    step: step_label(path, i + 1),
                })?
            }
            (PathStep::Index(idx), Value::Array(items)) => {
                items.get_mut(*idx).ok_or_else(|| PathError::Missing {
                    step: step_label(path, i + 1),
                })?
            }
            (step, other) => return Err(not_a_container(path, i, step, other)),
        };
    }

    match (last, current) {
        (PathStep::Key(key), Value::Document(doc)) => {
            // Existing keys keep their position
            doc.insert(key.clone(), value);
            Ok(())
        }
        (PathStep::Index(idx), Value::Array(items)) => {
            let len = items.len();
            if *idx < len {
                items[*idx] = value;
                Ok(())
            } else if *idx == len {
                items.push(value);
                Ok(())
            } else {
                Err(PathError::IndexOutOfBounds { index: *idx, len })
            }
        }
        (step, other) => Err(not_a_container(path, steps.len() - 1, step, other)),
    }
}

/// Remove the value at a path
///
/// Returns the removed value, or `None` without touching the document when
/// the path does not resolve or the stored value does not match `tag`.
/// Sibling keys keep their order; later array elements shift down.
pub(crate) fn remove_at_path(
    root: &mut Value,
    path: &DocPath,
    tag: Option<TypeTag>,
) -> Option<Value> {
    let (last, parents) = path.steps().split_last()?;

    let mut current = root;
    for step in parents {
        current = match (step, current) {
            (PathStep::Key(key), Value::Document(doc)) => doc.get_mut(key)?,
            (PathStep::Index(idx), Value::Array(items)) => items.get_mut(*idx)?,
            _ => return None,
        };
    }

    let accepts = |value: &Value| tag.map_or(true, |t| t.matches(value));
    match (last, current) {
        (PathStep::Key(key), Value::Document(doc)) => {
            if accepts(doc.get(key)?) {
                doc.shift_remove(key)
            } else {
                None
            }
        }
        (PathStep::Index(idx), Value::Array(items)) => {
            if accepts(items.get(*idx)?) {
                Some(items.remove(*idx))
            } else {
                None
            }
        }
        _ => None,
    }
}
