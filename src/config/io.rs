use anyhow::{bail, Context, Result};
use std::io::{Read, Write};
use std::path::Path;

/// Path argument meaning stdin (for input) or stdout (for output).
pub const STDIO_PATH: &str = "-";

/// Read an input document with a size guardrail.
///
/// `-` reads from stdin. Files larger than `max_bytes` are rejected before
/// being read.
pub fn read_document_file(path: &Path, max_bytes: u64) -> Result<Vec<u8>> {
    if path.as_os_str() == STDIO_PATH {
        return read_limited(std::io::stdin().lock(), max_bytes, "<stdin>");
    }

    let metadata = std::fs::metadata(path)
        .with_context(|| format!("Cannot stat document '{}'", path.display()))?;

    if !metadata.is_file() {
        bail!("Document '{}' is not a regular file", path.display());
    }

    if metadata.len() > max_bytes {
        bail!(
            "Document '{}' is {} bytes, exceeds limit of {} bytes",
            path.display(),
            metadata.len(),
            max_bytes,
        );
    }

    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to read document '{}'", path.display()))?;
    read_limited(file, max_bytes, &path.display().to_string())
}

/// Read at most `max_bytes` from `reader`, failing if there is more.
fn read_limited(reader: impl Read, max_bytes: u64, name: &str) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader
        .take(max_bytes.saturating_add(1))
        .read_to_end(&mut buf)
        .with_context(|| format!("Failed to read document '{name}'"))?;

    if buf.len() as u64 > max_bytes {
        bail!("Document '{name}' exceeds limit of {max_bytes} bytes");
    }
    Ok(buf)
}

/// Write a resolved document to `path`, or to stdout when `path` is `None`
/// or `-`.
pub fn write_document(path: Option<&Path>, content: &[u8]) -> Result<()> {
    match path {
        Some(p) if p.as_os_str() != STDIO_PATH => std::fs::write(p, content)
            .with_context(|| format!("Failed to write document '{}'", p.display())),
        _ => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content).context("Failed to write to stdout")?;
            stdout.flush().context("Failed to flush stdout")
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn read_small_document() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("conf.yaml");
        fs::write(&file, "a: ENC[x]\n").unwrap();

        let content = read_document_file(&file, 1024).unwrap();
        assert_eq!(content, b"a: ENC[x]\n");
    }

    #[test]
    fn reject_oversized_document() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("huge.yaml");
        fs::write(&file, "x".repeat(65)).unwrap();

        let err = read_document_file(&file, 64).unwrap_err();
        assert!(err.to_string().contains("exceeds limit"));
    }

    #[test]
    fn reject_directory() {
        let dir = TempDir::new().unwrap();
        let err = read_document_file(dir.path(), 64).unwrap_err();
        assert!(err.to_string().contains("not a regular file"));
    }

    #[test]
    fn missing_document_has_context() {
        let err = read_document_file(Path::new("/no/such/doc.yaml"), 64).unwrap_err();
        assert!(err.to_string().contains("Cannot stat document"));
    }

    #[test]
    fn read_limited_enforces_cap() {
        assert_eq!(read_limited(&b"abcd"[..], 4, "mem").unwrap(), b"abcd");
        assert!(read_limited(&b"abcde"[..], 4, "mem").is_err());
    }

    #[test]
    fn write_to_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("out.yaml");
        write_document(Some(&file), b"a: b\n").unwrap();
        assert_eq!(fs::read(&file).unwrap(), b"a: b\n");
    }
}
