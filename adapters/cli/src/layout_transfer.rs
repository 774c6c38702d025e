#![allow(clippy::missing_errors_doc)]

use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use solidgrid_core::GridCoord;

const SNAPSHOT_DOMAIN: &str = "grid";
const SNAPSHOT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded snapshot payload.
pub(crate) const SNAPSHOT_HEADER: &str = "grid:v1";
/// Delimiter used to separate the prefix, cell count and payload.
const FIELD_DELIMITER: char = ':';

/// Solid cells of a level packed into a single clipboard-friendly line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct GridLayoutSnapshot {
    /// Solid cells in ascending order.
    pub(crate) cells: Vec<GridCoord>,
}

impl GridLayoutSnapshot {
    /// Captures the provided cells, sorting and deduplicating them.
    pub(crate) fn new<I>(cells: I) -> Self
    where
        I: IntoIterator<Item = GridCoord>,
    {
        let mut cells: Vec<GridCoord> = cells.into_iter().collect();
        cells.sort_unstable();
        cells.dedup();
        Self { cells }
    }

    /// Encodes the snapshot into a single-line string suitable for clipboard transfer.
    pub(crate) fn encode(&self) -> Result<String, LayoutTransferError> {
        let pairs: Vec<[i32; 2]> = self.cells.iter().map(|cell| [cell.x(), cell.y()]).collect();
        let json = serde_json::to_vec(&pairs).map_err(LayoutTransferError::InvalidPayload)?;
        let encoded = STANDARD_NO_PAD.encode(json);
        Ok(format!("{SNAPSHOT_HEADER}:{}:{encoded}", self.cells.len()))
    }

    /// Decodes a snapshot from the provided string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, LayoutTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LayoutTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(LayoutTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(LayoutTransferError::MissingVersion)?;
        let count = parts.next().ok_or(LayoutTransferError::MissingCount)?;
        let payload = parts.next().ok_or(LayoutTransferError::MissingPayload)?;

        if domain != SNAPSHOT_DOMAIN {
            return Err(LayoutTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != SNAPSHOT_VERSION {
            return Err(LayoutTransferError::UnsupportedVersion(version.to_owned()));
        }

        let expected = count
            .trim()
            .parse::<usize>()
            .map_err(|_| LayoutTransferError::InvalidCount(count.to_owned()))?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(LayoutTransferError::InvalidEncoding)?;
        let pairs: Vec<[i32; 2]> =
            serde_json::from_slice(&bytes).map_err(LayoutTransferError::InvalidPayload)?;

        if pairs.len() != expected {
            return Err(LayoutTransferError::CountMismatch {
                expected,
                found: pairs.len(),
            });
        }

        Ok(Self::new(pairs.into_iter().map(|[x, y]| GridCoord::new(x, y))))
    }
}

/// Errors that can occur while encoding or decoding layout transfer strings.
#[derive(Debug)]
pub(crate) enum LayoutTransferError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing from the encoded snapshot.
    MissingPrefix,
    /// The encoded snapshot did not contain a version segment.
    MissingVersion,
    /// The encoded snapshot did not include the cell count.
    MissingCount,
    /// The encoded snapshot did not include the payload segment.
    MissingPayload,
    /// The encoded snapshot used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The encoded snapshot used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The cell count could not be parsed.
    InvalidCount(String),
    /// The payload held a different number of cells than announced.
    CountMismatch {
        /// Count announced in the header.
        expected: usize,
        /// Number of cells found in the payload.
        found: usize,
    },
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The payload could not be serialised or deserialised.
    InvalidPayload(serde_json::Error),
}

impl fmt::Display for LayoutTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "layout string was empty"),
            Self::MissingPrefix => write!(f, "layout string is missing the prefix"),
            Self::MissingVersion => write!(f, "layout string is missing the version"),
            Self::MissingCount => write!(f, "layout string is missing the cell count"),
            Self::MissingPayload => write!(f, "layout string is missing the payload"),
            Self::InvalidPrefix(prefix) => write!(f, "layout prefix '{prefix}' is not supported"),
            Self::UnsupportedVersion(version) => {
                write!(f, "layout version '{version}' is not supported")
            }
            Self::InvalidCount(count) => write!(f, "could not parse cell count '{count}'"),
            Self::CountMismatch { expected, found } => {
                write!(f, "layout announced {expected} cells but carried {found}")
            }
            Self::InvalidEncoding(error) => {
                write!(f, "could not decode layout payload: {error}")
            }
            Self::InvalidPayload(error) => {
                write!(f, "could not parse layout payload: {error}")
            }
        }
    }
}

impl Error for LayoutTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_empty_layout() {
        let snapshot = GridLayoutSnapshot::new(Vec::new());

        let encoded = snapshot.encode().expect("snapshot encodes");
        assert!(encoded.starts_with(&format!("{SNAPSHOT_HEADER}:0:")));

        let decoded = GridLayoutSnapshot::decode(&encoded).expect("snapshot decodes");
        assert_eq!(snapshot, decoded);
    }

    #[test]
    fn round_trip_populated_layout() {
        let snapshot = GridLayoutSnapshot::new([
            GridCoord::new(5, 7),
            GridCoord::new(-12, 4),
            GridCoord::new(5, 7),
        ]);
        assert_eq!(snapshot.cells.len(), 2);

        let encoded = snapshot.encode().expect("snapshot encodes");
        assert!(encoded.starts_with(&format!("{SNAPSHOT_HEADER}:2:")));

        let decoded = GridLayoutSnapshot::decode(&format!("  {encoded}\n")).expect("decodes");
        assert_eq!(snapshot, decoded);
    }

    #[test]
    fn decode_rejects_foreign_prefix() {
        assert!(matches!(
            GridLayoutSnapshot::decode("tiles:v1:12:AAAA"),
            Err(LayoutTransferError::InvalidPrefix(prefix)) if prefix == "tiles"
        ));
    }

    #[test]
    fn decode_rejects_count_mismatch() {
        let encoded = GridLayoutSnapshot::new([GridCoord::new(0, 0)])
            .encode()
            .expect("snapshot encodes");
        let tampered = encoded.replacen(":1:", ":3:", 1);

        assert!(matches!(
            GridLayoutSnapshot::decode(&tampered),
            Err(LayoutTransferError::CountMismatch {
                expected: 3,
                found: 1
            })
        ));
    }

    #[test]
    fn decode_reports_missing_segments() {
        assert!(matches!(
            GridLayoutSnapshot::decode("   "),
            Err(LayoutTransferError::EmptyPayload)
        ));
        assert!(matches!(
            GridLayoutSnapshot::decode("grid:v1"),
            Err(LayoutTransferError::MissingCount)
        ));
        assert!(matches!(
            GridLayoutSnapshot::decode("grid:v2:0:W10"),
            Err(LayoutTransferError::UnsupportedVersion(_))
        ));
    }
}
