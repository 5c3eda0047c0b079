use std::io::{Read, Write};
use std::path::Path;

/// Read the whole input document, from `path` if given, otherwise from stdin.
pub fn read_input(path: Option<&Path>) -> std::io::Result<String> {
    match path {
        Some(p) => {
            tracing::debug!("Reading input from {}", p.display());
            std::fs::read_to_string(p)
        }
        None => {
            tracing::debug!("Reading input from stdin");
            let mut buf = String::new();
            std::io::stdin().lock().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Write `content` to `path` if given, otherwise to stdout.
///
/// With `append` set, an existing file is extended instead of truncated.
pub fn write_output(path: Option<&Path>, content: &str, append: bool) -> std::io::Result<()> {
    match path {
        Some(p) => {
            let mut file = std::fs::OpenOptions::new()
                .create(true)
                .write(true)
                .append(append)
                .truncate(!append)
                .open(p)?;
            file.write_all(content.as_bytes())?;
            file.flush()
        }
        None => {
            let mut out = std::io::stdout().lock();
            out.write_all(content.as_bytes())?;
            out.flush()
        }
    }
}
