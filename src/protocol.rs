//! Request/response protocol over the table.
//!
//! Input is a request count followed by that many requests, one per line:
//! `put <key> <value>`, `get <key>`, `delete <key>`. Keys and values are
//! `i64`. Every `get`/`delete` answers with one output line holding the
//! value, or the literal `None` on a miss; `put` is silent. Requests are
//! whitespace-tokenized and blank lines are skipped.
//!
//! The serve loop is generic over `BufRead`/`Write` so tests can drive it
//! with in-memory buffers. Logging goes to the `log` facade, never to the
//! output writer.

use crate::chain_map::ChainHashMap;
use log::debug;
use std::io::{self, BufRead, Write};
use thiserror::Error;

/// Driver-layer failures. Misses are not errors; they are `None` replies.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("i/o: {0}")]
    Io(#[from] io::Error),
    #[error("malformed request count {input:?}")]
    BadCount { input: String },
    #[error("request {index}: input ended early")]
    UnexpectedEof { index: usize },
    #[error("request {index}: unknown command {command:?}")]
    UnknownCommand { index: usize, command: String },
    #[error("request {index}: missing integer argument")]
    MissingArgument { index: usize },
    #[error("request {index}: malformed integer {token:?}")]
    BadInteger { index: usize, token: String },
    #[error("request {index}: unexpected trailing input")]
    TrailingInput { index: usize },
}

/// One parsed request line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Put { key: i64, value: i64 },
    Get { key: i64 },
    Delete { key: i64 },
}

/// Parse a single non-blank request line. `index` is the 1-based request
/// number, used only for error reporting.
pub fn parse_request(index: usize, line: &str) -> Result<Request, ProtocolError> {
    let mut tokens = line.split_whitespace();
    let command = tokens
        .next()
        .ok_or(ProtocolError::UnexpectedEof { index })?;

    let request = match command {
        "put" => Request::Put {
            key: int_arg(index, tokens.next())?,
            value: int_arg(index, tokens.next())?,
        },
        "get" => Request::Get {
            key: int_arg(index, tokens.next())?,
        },
        "delete" => Request::Delete {
            key: int_arg(index, tokens.next())?,
        },
        other => {
            return Err(ProtocolError::UnknownCommand {
                index,
                command: other.to_string(),
            })
        }
    };

    if tokens.next().is_some() {
        return Err(ProtocolError::TrailingInput { index });
    }
    Ok(request)
}

fn int_arg(index: usize, token: Option<&str>) -> Result<i64, ProtocolError> {
    let token = token.ok_or(ProtocolError::MissingArgument { index })?;
    token.parse().map_err(|_| ProtocolError::BadInteger {
        index,
        token: token.to_string(),
    })
}

/// Run the full protocol: read the request count, then serve each request
/// against a fresh table, replying in request order.
pub fn serve<R: BufRead, W: Write>(mut input: R, mut output: W) -> Result<(), ProtocolError> {
    let count_line = match read_nonblank_line(&mut input)? {
        Some(line) => line,
        None => {
            return Err(ProtocolError::BadCount {
                input: String::new(),
            })
        }
    };
    let count: usize = count_line
        .trim()
        .parse()
        .map_err(|_| ProtocolError::BadCount {
            input: count_line.trim().to_string(),
        })?;
    debug!("serving {count} requests");

    let mut map: ChainHashMap<i64, i64> = ChainHashMap::new();
    let mut capacity = map.capacity();

    for index in 1..=count {
        let line = read_nonblank_line(&mut input)?
            .ok_or(ProtocolError::UnexpectedEof { index })?;
        match parse_request(index, &line)? {
            Request::Put { key, value } => {
                map.insert(key, value);
                if map.capacity() != capacity {
                    debug!(
                        "table grew {capacity} -> {} at {} entries",
                        map.capacity(),
                        map.len()
                    );
                    capacity = map.capacity();
                }
            }
            Request::Get { key } => reply(&mut output, map.get(&key).copied())?,
            Request::Delete { key } => reply(&mut output, map.remove(&key))?,
        }
    }

    output.flush()?;
    Ok(())
}

fn read_nonblank_line<R: BufRead>(input: &mut R) -> Result<Option<String>, ProtocolError> {
    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if !line.trim().is_empty() {
            return Ok(Some(line));
        }
    }
}

fn reply<W: Write>(output: &mut W, value: Option<i64>) -> Result<(), ProtocolError> {
    match value {
        Some(v) => writeln!(output, "{v}")?,
        None => writeln!(output, "None")?,
    }
    Ok(())
}
