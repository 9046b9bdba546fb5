use std::{
    fmt,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tokio::{
    fs::File,
    io::{self, AsyncBufRead, AsyncBufReadExt, BufReader},
    sync::mpsc::Sender,
};
use tracing::debug;

pub const LINE_BATCH_SIZE: usize = 1024;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to open {}: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },
    #[error("failed to read {source_name}: {source}")]
    Read {
        source_name: String,
        source: io::Error,
    },
}

/// Where raw log lines come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineSource {
    Stdin,
    File(PathBuf),
}

impl LineSource {
    /// `-` selects standard input, anything else is a file path.
    pub fn from_path(path: &Path) -> Self {
        if path.as_os_str() == "-" {
            Self::Stdin
        } else {
            Self::File(path.to_path_buf())
        }
    }
}

impl fmt::Display for LineSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdin => f.write_str("standard input"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Streams every line of `source` into `tx` in batches. Returns once the
/// input is exhausted or the receiver goes away.
pub async fn consume_lines(source: LineSource, tx: Sender<Vec<String>>) -> Result<(), IngestError> {
    let name = source.to_string();
    match source {
        LineSource::Stdin => forward_lines(BufReader::new(io::stdin()), &name, tx).await,
        LineSource::File(path) => {
            let file = File::open(&path)
                .await
                .map_err(|source| IngestError::Open { path, source })?;
            forward_lines(BufReader::new(file), &name, tx).await
        }
    }
}

async fn forward_lines<R>(mut reader: R, name: &str, tx: Sender<Vec<String>>) -> Result<(), IngestError>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let mut batch = Vec::with_capacity(LINE_BATCH_SIZE);
    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .await
            .map_err(|source| IngestError::Read {
                source_name: name.to_string(),
                source,
            })?;
        if read == 0 {
            break;
        }
        batch.push(decode_line(&buf));
        if batch.len() >= LINE_BATCH_SIZE && tx.send(batch.split_off(0)).await.is_err() {
            debug!("line consumer dropped, stopping ingest");
            return Ok(());
        }
    }
    if !batch.is_empty() {
        tx.send(batch).await.ok();
    }
    Ok(())
}

// Invalid UTF-8 is replaced rather than failing the whole run; the parser
// decides whether the line is usable.
fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}
