//! Recursive traversal over [`Document`] trees.
//!
//! The walker is stateless: callers inject per-scalar behavior as a closure,
//! which lets the same traversal serve both the collect and the substitute
//! phase of resolution. Mapping keys are never visited, only values.

use super::document::Document;
use super::error::ResolveError;

/// Default maximum container nesting accepted by the walker.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Apply `transform` to every string scalar in `doc`, in place.
///
/// `Ok(Some(value))` replaces the scalar, `Ok(None)` leaves it untouched.
/// The first error aborts the walk; replacements already written stay.
pub fn walk<F>(doc: &mut Document, max_depth: usize, mut transform: F) -> Result<(), ResolveError>
where
    F: FnMut(&str) -> Result<Option<String>, ResolveError>,
{
    walk_node(doc, 0, max_depth, &mut transform)
}

fn walk_node<F>(
    doc: &mut Document,
    depth: usize,
    max_depth: usize,
    transform: &mut F,
) -> Result<(), ResolveError>
where
    F: FnMut(&str) -> Result<Option<String>, ResolveError>,
{
    match doc {
        Document::String(s) => {
            if let Some(replacement) = transform(s.as_str())? {
                *s = replacement;
            }
        }
        Document::Sequence(items) => {
            check_depth(depth, max_depth)?;
            for item in items.iter_mut() {
                walk_node(item, depth + 1, max_depth, transform)?;
            }
        }
        Document::Mapping(entries) => {
            check_depth(depth, max_depth)?;
            for (_, value) in entries.iter_mut() {
                walk_node(value, depth + 1, max_depth, transform)?;
            }
        }
        Document::Tagged(tagged) => walk_node(&mut tagged.value, depth, max_depth, transform)?,
        Document::Null | Document::Bool(_) | Document::Number(_) => {}
    }
    Ok(())
}

/// Read-only traversal reporting each string value with its dotted path
/// (`a.b[2].c`). Keys are part of the path but are not visited themselves.
pub fn visit<F>(doc: &Document, max_depth: usize, mut visitor: F) -> Result<(), ResolveError>
where
    F: FnMut(&str, &str),
{
    let mut path = String::new();
    visit_node(doc, &mut path, 0, max_depth, &mut visitor)
}

fn visit_node<F>(
    doc: &Document,
    path: &mut String,
    depth: usize,
    max_depth: usize,
    visitor: &mut F,
) -> Result<(), ResolveError>
where
    F: FnMut(&str, &str),
{
    match doc {
        Document::String(s) => visitor(path.as_str(), s),
        Document::Sequence(items) => {
            check_depth(depth, max_depth)?;
            for (idx, item) in items.iter().enumerate() {
                let len = path.len();
                path.push_str(&format!("[{idx}]"));
                visit_node(item, path, depth + 1, max_depth, visitor)?;
                path.truncate(len);
            }
        }
        Document::Mapping(entries) => {
            check_depth(depth, max_depth)?;
            for (key, value) in entries {
                let len = path.len();
                if !path.is_empty() {
                    path.push('.');
                }
                path.push_str(&key_label(key));
                visit_node(value, path, depth + 1, max_depth, visitor)?;
                path.truncate(len);
            }
        }
        Document::Tagged(tagged) => visit_node(&tagged.value, path, depth, max_depth, visitor)?,
        Document::Null | Document::Bool(_) | Document::Number(_) => {}
    }
    Ok(())
}

fn check_depth(depth: usize, max_depth: usize) -> Result<(), ResolveError> {
    if depth >= max_depth {
        return Err(ResolveError::DepthExceeded { limit: max_depth });
    }
    Ok(())
}

/// Render a mapping key for use in a path.
fn key_label(key: &Document) -> String {
    match key {
        Document::String(s) => s.clone(),
        Document::Number(n) => n.to_string(),
        Document::Bool(b) => b.to_string(),
        Document::Null => "null".to_string(),
        Document::Tagged(tagged) => key_label(&tagged.value),
        Document::Sequence(_) => "[..]".to_string(),
        Document::Mapping(_) => "{..}".to_string(),
    }
}
