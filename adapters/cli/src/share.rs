//! Single-line share codes that carry a whole stage.
//!
//! A code reads `scurry:v1:<rows>x<columns>:<payload>`, where the payload is
//! the stage line stream joined with newlines and base64 encoded without
//! padding. The dimensions are repeated outside the payload so a truncated
//! paste is caught before decoding.

use std::{error::Error, fmt, string::FromUtf8Error};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use scurry_core::Stage;
use scurry_persistence::{decode_stage, encode_stage, CodecError};

const SCHEME: &str = "scurry";
const REVISION: &str = "v1";

/// Leading `scheme:revision` pair of every code this build writes.
pub(crate) const SHARE_HEADER: &str = "scurry:v1";

/// Packs `stage` into a share code.
#[must_use]
pub(crate) fn encode(stage: &Stage) -> String {
    let payload = STANDARD_NO_PAD.encode(encode_stage(stage).join("\n"));
    format!(
        "{SHARE_HEADER}:{}x{}:{payload}",
        stage.grid.rows(),
        stage.grid.columns()
    )
}

/// Unpacks a share code, building the grid with `tile_size`.
pub(crate) fn decode(code: &str, tile_size: f32) -> Result<Stage, ShareCodeError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(ShareCodeError::Blank);
    }

    let [scheme, revision, size, payload] = segments(code)?;
    if scheme != SCHEME {
        return Err(ShareCodeError::Scheme(scheme.to_owned()));
    }
    if revision != REVISION {
        return Err(ShareCodeError::Revision(revision.to_owned()));
    }
    let (rows, columns) = grid_size(size).ok_or_else(|| ShareCodeError::Size(size.to_owned()))?;

    let bytes = STANDARD_NO_PAD
        .decode(payload)
        .map_err(ShareCodeError::Base64)?;
    let text = String::from_utf8(bytes).map_err(ShareCodeError::Utf8)?;
    let lines: Vec<String> = text.lines().map(str::to_owned).collect();
    let stage = decode_stage(&lines, tile_size).map_err(ShareCodeError::Stage)?;

    if (stage.grid.rows(), stage.grid.columns()) != (rows, columns) {
        return Err(ShareCodeError::Size(size.to_owned()));
    }
    Ok(stage)
}

fn segments(code: &str) -> Result<[&str; 4], ShareCodeError> {
    let mut parts = code.splitn(4, ':');
    let mut next = || parts.next().ok_or(ShareCodeError::Incomplete);
    Ok([next()?, next()?, next()?, next()?])
}

fn grid_size(size: &str) -> Option<(u32, u32)> {
    let (rows, columns) = size.split_once(['x', 'X'])?;
    let rows = rows.trim().parse::<u32>().ok()?;
    let columns = columns.trim().parse::<u32>().ok()?;
    (rows > 0 && columns > 0).then_some((rows, columns))
}

/// Reasons a share code could not be turned back into a stage.
#[derive(Debug)]
pub(crate) enum ShareCodeError {
    /// Nothing but whitespace was pasted.
    Blank,
    /// Fewer than four `:`-separated segments.
    Incomplete,
    /// The code belongs to another application.
    Scheme(String),
    /// The code was written by a revision this build cannot read.
    Revision(String),
    /// The `RxC` segment is unreadable or does not match the stage.
    Size(String),
    /// The payload is not unpadded base64.
    Base64(base64::DecodeError),
    /// The payload bytes are not UTF-8.
    Utf8(FromUtf8Error),
    /// The payload is not a readable stage stream.
    Stage(CodecError),
}

impl fmt::Display for ShareCodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blank => f.write_str("no share code given"),
            Self::Incomplete => f.write_str("expected scurry:<revision>:<rows>x<columns>:<payload>"),
            Self::Scheme(scheme) => write!(f, "'{scheme}' codes are not scurry stages"),
            Self::Revision(revision) => write!(f, "share code revision {revision} is not readable"),
            Self::Size(size) => write!(f, "'{size}' is not the size of the shared stage"),
            Self::Base64(error) => write!(f, "payload is not base64: {error}"),
            Self::Utf8(error) => write!(f, "payload is not UTF-8: {error}"),
            Self::Stage(error) => write!(f, "payload is not a stage: {error}"),
        }
    }
}

impl Error for ShareCodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Base64(error) => Some(error),
            Self::Utf8(error) => Some(error),
            Self::Stage(error) => Some(error),
            Self::Blank
            | Self::Incomplete
            | Self::Scheme(_)
            | Self::Revision(_)
            | Self::Size(_) => None,
        }
    }
}
