//! The skin wire format.
//!
//! A skin is an 18 × 20 grid of colour cells. On the wire it travels as
//!
//! ```text
//! "trSkin1" + base64( raw_deflate( utf16le( "RRGGBB;RRGGBBAA;...;" ) ) )
//! ```
//!
//! i.e. `;`-joined hex segments without `#`, with a trailing separator that
//! yields one empty segment after the last cell. Decoding reverses each step
//! and widens opaque `RRGGBB` segments to `#RRGGBBFF`.
//!
//! [`SkinGrid`] is the validated in-memory form; [`EncodedSkin`] is a wire
//! string known to decode into one.

use std::io::Write;

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use flate2::write::DeflateEncoder;
use flate2::{Compression, Decompress, FlushDecompress, Status};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::ValidationError;

/// Literal prefix of every wire string.
pub const WIRE_PREFIX: &str = "trSkin1";

/// Rows in a skin grid.
pub const ROWS: usize = 18;

/// Cells per row.
pub const COLUMNS: usize = 20;

/// Cells in a skin grid.
pub const CELLS: usize = ROWS * COLUMNS;

/// A grid cell must be strictly shorter than this (`#RRGGBBAA` is 9).
const MAX_CELL_LEN: usize = 10;

/// Upper bound on the inflated payload. A full grid of 8-digit cells is
/// 360 × 9 UTF-16 code units, about 6.5 KiB.
const MAX_INFLATED_LEN: usize = 64 * 1024;

/// Decoding accepts base64 with or without trailing `=` padding.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A wire string could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid base64: {0}")]
    InvalidBase64(String),

    #[error("corrupt deflate stream: {0}")]
    CorruptStream(String),

    #[error("deflate stream ended before its final block")]
    Truncated,

    #[error("inflated payload exceeds 64 KiB")]
    TooLarge,

    #[error("inflated payload is empty")]
    Empty,

    #[error("inflated payload has odd length {0}; expected UTF-16 code units")]
    OddLength(usize),

    #[error("inflated payload is not valid UTF-16")]
    InvalidUtf16,

    #[error("expected 360 cells in an 18x20 grid, found {0}")]
    CellCount(usize),

    #[error("segment {0:?} is not a colour cell")]
    InvalidCell(String),
}

/// A grid could not be compressed.
#[derive(Debug, Error)]
#[error("failed to compress skin: {0}")]
pub struct EncodeError(#[from] std::io::Error);

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

/// Shape of the value returned by [`decode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Consecutive chunks of [`COLUMNS`] cells.
    Grid,
    /// One cell per element, row-major.
    Flat,
}

/// Output of [`decode`]. The shape is not validated; see [`SkinGrid::from_wire`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedSkin {
    Grid(Vec<Vec<String>>),
    Flat(Vec<String>),
}

/// Decodes a wire string into colour cells.
///
/// The `trSkin1` prefix is stripped when present; its absence is tolerated.
pub fn decode(wire: &str, layout: Layout) -> Result<DecodedSkin, DecodeError> {
    let cells = decode_cells(wire)?;
    Ok(match layout {
        Layout::Flat => DecodedSkin::Flat(cells),
        Layout::Grid => DecodedSkin::Grid(cells.chunks(COLUMNS).map(<[String]>::to_vec).collect()),
    })
}

fn decode_cells(wire: &str) -> Result<Vec<String>, DecodeError> {
    let body = wire.trim();
    let body = body.strip_prefix(WIRE_PREFIX).unwrap_or(body).trim();

    let compressed = LENIENT_BASE64
        .decode(body)
        .map_err(|e| DecodeError::InvalidBase64(e.to_string()))?;
    let bytes = inflate_raw(&compressed)?;
    let text = utf16le_to_string(&bytes)?;

    let mut segments: Vec<&str> = text.split(';').collect();
    // The trailing separator always leaves one empty segment behind.
    segments.pop();

    Ok(segments.into_iter().map(segment_to_cell).collect())
}

fn segment_to_cell(segment: &str) -> String {
    if segment.is_empty() || is_hex(segment, 6) {
        format!("#{segment}FF")
    } else {
        format!("#{segment}")
    }
}

/// Encodes grid rows into a wire string. Rows are flattened row-major; the
/// shape is the caller's responsibility (see [`SkinGrid`]).
pub fn encode<R: AsRef<[String]>>(rows: &[R]) -> Result<String, EncodeError> {
    let mut joined = String::with_capacity(CELLS * 9);
    for cell in rows.iter().flat_map(|row| row.as_ref()) {
        joined.push_str(cell);
        joined.push(';');
    }
    let payload: String = joined
        .chars()
        .filter(|c| *c != '#')
        .flat_map(char::to_uppercase)
        .collect();

    let utf16: Vec<u8> = payload.encode_utf16().flat_map(u16::to_le_bytes).collect();
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&utf16)?;
    let compressed = encoder.finish()?;

    Ok(format!("{WIRE_PREFIX}{}", STANDARD.encode(compressed)))
}

/// Structural check on decoded rows: exactly [`ROWS`] rows of [`COLUMNS`]
/// cells, each cell starting with `#` and shorter than 10 UTF-16 code units.
///
/// Hex-digit legality is not checked.
pub fn is_decoded_skin<R: AsRef<[String]>>(rows: &[R]) -> bool {
    rows.len() == ROWS
        && rows.iter().all(|row| {
            let row = row.as_ref();
            row.len() == COLUMNS
                && row
                    .iter()
                    .all(|cell| cell.starts_with('#') && cell.encode_utf16().count() < MAX_CELL_LEN)
        })
}

/// The cell rule of [`SkinGrid`]: `#` followed by ASCII letters and digits,
/// shorter than 10 characters. Such a cell survives [`encode`] unchanged
/// apart from case.
fn is_grid_cell(cell: &str) -> bool {
    cell.len() < MAX_CELL_LEN
        && cell
            .strip_prefix('#')
            .is_some_and(|body| body.bytes().all(|b| b.is_ascii_alphanumeric()))
}

/// Whether `wire` decodes into a structurally valid grid. Decode failures
/// yield `false`.
pub fn is_encoded_skin(wire: &str) -> bool {
    match decode(wire, Layout::Grid) {
        Ok(DecodedSkin::Grid(rows)) => is_decoded_skin(&rows),
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Byte-level helpers
// ---------------------------------------------------------------------------

/// Inflates a raw DEFLATE stream (no zlib header), requiring the final block
/// to be present.
fn inflate_raw(input: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let mut inflater = Decompress::new(false);
    let mut out = Vec::with_capacity(input.len().saturating_mul(4).clamp(256, MAX_INFLATED_LEN));

    loop {
        let consumed = inflater.total_in() as usize;
        let status = inflater
            .decompress_vec(&input[consumed..], &mut out, FlushDecompress::None)
            .map_err(|e| DecodeError::CorruptStream(e.to_string()))?;

        match status {
            Status::StreamEnd => return Ok(out),
            Status::Ok | Status::BufError => {
                if out.len() < out.capacity() {
                    // Room was left in the buffer, so the input ran out first.
                    return Err(DecodeError::Truncated);
                }
                if out.len() >= MAX_INFLATED_LEN {
                    return Err(DecodeError::TooLarge);
                }
                let grow = out.capacity().min(MAX_INFLATED_LEN - out.len());
                out.reserve_exact(grow);
            }
        }
    }
}

fn utf16le_to_string(bytes: &[u8]) -> Result<String, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }
    if bytes.len() % 2 != 0 {
        return Err(DecodeError::OddLength(bytes.len()));
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).map_err(|_| DecodeError::InvalidUtf16)
}

fn is_hex(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_hexdigit())
}

// ---------------------------------------------------------------------------
// Validated forms
// ---------------------------------------------------------------------------

/// A structurally valid 18 × 20 skin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<String>>", into = "Vec<Vec<String>>")]
pub struct SkinGrid {
    rows: Vec<Vec<String>>,
}

impl SkinGrid {
    /// Wraps `rows` after checking them with [`is_decoded_skin`]. Cells must
    /// also be `#` plus ASCII letters and digits.
    pub fn new(rows: Vec<Vec<String>>) -> Result<Self, ValidationError> {
        if is_decoded_skin(&rows) && rows.iter().flatten().all(|cell| is_grid_cell(cell)) {
            Ok(Self { rows })
        } else {
            Err(ValidationError::new(
                "skin",
                format!("expected {ROWS} rows of {COLUMNS} cells, each `#` plus at most 8 letters or digits"),
            ))
        }
    }

    /// A grid whose every cell is `fill`.
    pub fn filled(fill: &str) -> Result<Self, ValidationError> {
        Self::new(vec![vec![fill.to_owned(); COLUMNS]; ROWS])
    }

    /// Decodes a wire string, rejecting anything but a complete grid.
    pub fn from_wire(wire: &str) -> Result<Self, DecodeError> {
        let cells = decode_cells(wire)?;
        if cells.len() != CELLS {
            return Err(DecodeError::CellCount(cells.len()));
        }
        if let Some(cell) = cells.iter().find(|c| !is_grid_cell(c)) {
            return Err(DecodeError::InvalidCell(cell.clone()));
        }
        let rows = cells.chunks(COLUMNS).map(<[String]>::to_vec).collect();
        Ok(Self { rows })
    }

    /// Encodes this grid into wire form.
    pub fn to_wire(&self) -> Result<String, EncodeError> {
        encode(&self.rows)
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().flatten().map(String::as_str)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }

    /// Replaces one cell. The value must satisfy the same rule as
    /// [`SkinGrid::new`].
    pub fn set_cell(&mut self, row: usize, column: usize, value: impl Into<String>) -> Result<(), ValidationError> {
        let value = value.into();
        if !is_grid_cell(&value) {
            return Err(ValidationError::new("cell", format!("{value:?} is not a `#` colour cell")));
        }
        let slot = self
            .rows
            .get_mut(row)
            .and_then(|r| r.get_mut(column))
            .ok_or_else(|| ValidationError::new("cell", format!("({row}, {column}) is outside the grid")))?;
        *slot = value;
        Ok(())
    }

    pub fn into_rows(self) -> Vec<Vec<String>> {
        self.rows
    }
}

impl TryFrom<Vec<Vec<String>>> for SkinGrid {
    type Error = ValidationError;

    fn try_from(rows: Vec<Vec<String>>) -> Result<Self, Self::Error> {
        Self::new(rows)
    }
}

impl From<SkinGrid> for Vec<Vec<String>> {
    fn from(grid: SkinGrid) -> Self {
        grid.rows
    }
}

/// Whether a decoded cell carries no real colour (anything other than 6 or
/// 8 hex digits after the `#`, such as the `#FF` of an empty segment).
pub fn is_unset(cell: &str) -> bool {
    let hex = cell.strip_prefix('#').unwrap_or(cell);
    !(is_hex(hex, 6) || is_hex(hex, 8))
}

/// A wire string that decodes into a valid [`SkinGrid`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EncodedSkin(String);

impl EncodedSkin {
    /// Accepts `wire` only when [`is_encoded_skin`] holds.
    pub fn parse(wire: impl Into<String>) -> Result<Self, ValidationError> {
        let wire = wire.into();
        if is_encoded_skin(&wire) {
            Ok(Self(wire))
        } else {
            Err(ValidationError::new("skin", "not a valid encoded skin"))
        }
    }

    /// Encodes a grid. The result is checked with [`is_encoded_skin`]
    /// before it is returned.
    pub fn from_grid(grid: &SkinGrid) -> Result<Self, ValidationError> {
        let wire = grid
            .to_wire()
            .map_err(|e| ValidationError::new("skin", e.to_string()))?;
        Self::parse(wire)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decodes back into a grid.
    pub fn to_grid(&self) -> Result<SkinGrid, DecodeError> {
        SkinGrid::from_wire(&self.0)
    }
}

impl AsRef<str> for EncodedSkin {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EncodedSkin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for EncodedSkin {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn grid_of(cell: &str) -> Vec<Vec<String>> {
        vec![vec![cell.to_owned(); COLUMNS]; ROWS]
    }

    /// Builds a wire string from a raw payload, bypassing [`encode`].
    fn wire_from_payload(payload: &str) -> String {
        let utf16: Vec<u8> = payload.encode_utf16().flat_map(u16::to_le_bytes).collect();
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&utf16).unwrap();
        format!("{WIRE_PREFIX}{}", STANDARD.encode(encoder.finish().unwrap()))
    }

    #[test]
    fn six_digit_segments_gain_full_alpha() {
        let wire = wire_from_payload("A1B2C3;11223344;");
        let DecodedSkin::Flat(cells) = decode(&wire, Layout::Flat).unwrap() else {
            panic!("expected flat layout");
        };
        assert_eq!(cells, ["#A1B2C3FF", "#11223344"]);
    }

    #[test]
    fn empty_and_odd_segments() {
        let wire = wire_from_payload(";ABC;");
        let DecodedSkin::Flat(cells) = decode(&wire, Layout::Flat).unwrap() else {
            panic!("expected flat layout");
        };
        assert_eq!(cells, ["#FF", "#ABC"]);
        assert!(is_unset(&cells[0]));
        assert!(is_unset(&cells[1]));
        assert!(!is_unset("#A1B2C3FF"));
        assert!(!is_unset("#a1b2c3"));
    }

    #[test]
    fn grid_layout_chunks_by_row() {
        let wire = encode(&grid_of("#102030")).unwrap();
        let DecodedSkin::Grid(rows) = decode(&wire, Layout::Grid).unwrap() else {
            panic!("expected grid layout");
        };
        assert_eq!(rows.len(), ROWS);
        assert!(rows.iter().all(|r| r.len() == COLUMNS));
        assert_eq!(rows[17][19], "#102030FF");
    }

    #[test]
    fn encode_strips_hash_and_uppercases() {
        let wire = encode(&grid_of("#abcdef80")).unwrap();
        assert!(wire.starts_with(WIRE_PREFIX));
        let grid = SkinGrid::from_wire(&wire).unwrap();
        assert!(grid.cells().all(|c| c == "#ABCDEF80"));
    }

    #[test]
    fn prefix_is_optional_and_whitespace_is_trimmed() {
        let wire = encode(&grid_of("#00FF00")).unwrap();
        let bare = wire.trim_start_matches(WIRE_PREFIX).to_owned();
        assert_eq!(SkinGrid::from_wire(&bare).unwrap(), SkinGrid::from_wire(&wire).unwrap());
        assert!(is_encoded_skin(&format!("  {wire}\n")));
    }

    #[test]
    fn unpadded_base64_is_accepted() {
        let wire = encode(&grid_of("#123456")).unwrap();
        let unpadded = wire.trim_end_matches('=');
        assert!(is_encoded_skin(unpadded));
    }

    #[test]
    fn garbage_is_not_an_encoded_skin() {
        assert!(!is_encoded_skin("not-base64!!"));
        assert!(!is_encoded_skin(""));
        assert!(!is_encoded_skin(WIRE_PREFIX));
        assert!(matches!(decode("not-base64!!", Layout::Grid), Err(DecodeError::InvalidBase64(_))));
    }

    #[test]
    fn truncated_payload_is_a_decode_error() {
        let wire = encode(&grid_of("#0A0B0C")).unwrap();
        let body = &wire[WIRE_PREFIX.len()..];
        // Cut on a 4-character boundary so the base64 itself stays valid.
        let cut = (body.len() / 2) & !3;
        let truncated = format!("{WIRE_PREFIX}{}", &body[..cut]);
        assert!(decode(&truncated, Layout::Grid).is_err());
        assert!(SkinGrid::from_wire(&truncated).is_err());
        assert!(!is_encoded_skin(&truncated));
    }

    #[test]
    fn non_deflate_bytes_are_a_decode_error() {
        let wire = format!("{WIRE_PREFIX}{}", STANDARD.encode([0xFFu8; 16]));
        assert!(decode(&wire, Layout::Flat).is_err());
    }

    #[test]
    fn odd_length_payload_is_rejected() {
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"abc").unwrap();
        let wire = format!("{WIRE_PREFIX}{}", STANDARD.encode(encoder.finish().unwrap()));
        assert_eq!(decode(&wire, Layout::Flat), Err(DecodeError::OddLength(3)));
    }

    #[test]
    fn empty_payload_is_rejected() {
        assert_eq!(decode(&wire_from_payload(""), Layout::Flat), Err(DecodeError::Empty));
    }

    #[test]
    fn short_grid_decodes_but_is_not_a_skin() {
        let wire = wire_from_payload("112233;445566;");
        assert!(decode(&wire, Layout::Grid).is_ok());
        assert!(!is_encoded_skin(&wire));
        assert_eq!(SkinGrid::from_wire(&wire), Err(DecodeError::CellCount(2)));
    }

    #[test]
    fn decoded_skin_shape_rules() {
        assert!(is_decoded_skin(&grid_of("#000000FF")));

        let mut too_few_rows = grid_of("#000000");
        too_few_rows.pop();
        assert!(!is_decoded_skin(&too_few_rows));

        let mut too_many_rows = grid_of("#000000");
        too_many_rows.push(vec!["#000000".into(); COLUMNS]);
        assert!(!is_decoded_skin(&too_many_rows));

        let mut short_row = grid_of("#000000");
        short_row[3].pop();
        assert!(!is_decoded_skin(&short_row));

        let mut long_row = grid_of("#000000");
        long_row[3].push("#000000".into());
        assert!(!is_decoded_skin(&long_row));

        let mut no_hash = grid_of("#000000");
        no_hash[0][0] = "000000".into();
        assert!(!is_decoded_skin(&no_hash));

        let mut too_long = grid_of("#000000");
        too_long[0][0] = "#000000FFF".into();
        assert!(!is_decoded_skin(&too_long));
    }

    #[test]
    fn skin_grid_construction_and_edits() {
        assert!(SkinGrid::new(vec![]).is_err());
        let mut grid = SkinGrid::filled("#FFFFFF").unwrap();
        grid.set_cell(2, 5, "#FF0000").unwrap();
        assert_eq!(grid.cell(2, 5), Some("#FF0000"));
        assert_eq!(grid.cell(18, 0), None);
        assert!(grid.set_cell(0, 20, "#FF0000").is_err());
        assert!(grid.set_cell(0, 0, "FF0000").is_err());
        assert_eq!(grid.cells().count(), CELLS);
    }

    #[test]
    fn skin_grid_serde_enforces_shape() {
        let grid = SkinGrid::filled("#010203").unwrap();
        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(serde_json::from_str::<SkinGrid>(&json).unwrap(), grid);
        assert!(serde_json::from_str::<SkinGrid>("[[\"#000000\"]]").is_err());
    }

    #[test]
    fn encoded_skin_validation() {
        let grid = SkinGrid::filled("#336699").unwrap();
        let encoded = EncodedSkin::from_grid(&grid).unwrap();
        assert_eq!(EncodedSkin::parse(encoded.as_str()).unwrap(), encoded);
        assert!(EncodedSkin::parse("trSkin1AAAA").is_err());
        assert!("not-base64!!".parse::<EncodedSkin>().is_err());
        assert!(encoded.to_grid().unwrap().cells().all(|c| c == "#336699FF"));
    }

    /// Wire string produced outside this crate with a stock raw-deflate
    /// encoder: a `1E90FF` grid with row 9 in `FFD700`, a translucent black
    /// first cell and an empty last segment.
    const SERVER_SKIN: &str = "trSkin17daxDYAwDATAHylUgNIG9h8Jp4GGAUA6vWz91W7c0u5sNT1LjuzVzgoRERER/Ulzj6yZvx09+tKNiIiIiN7VcwE=";

    #[test]
    fn server_format_fixture_decodes() {
        let grid = SkinGrid::from_wire(SERVER_SKIN).unwrap();
        assert_eq!(grid.cell(0, 0), Some("#00000080"));
        assert_eq!(grid.cell(0, 1), Some("#1E90FFFF"));
        assert!(grid.rows()[9].iter().all(|c| c == "#FFD700FF"));
        assert_eq!(grid.cell(17, 19), Some("#FF"));
        assert!(is_encoded_skin(SERVER_SKIN));

        let again = SkinGrid::from_wire(&grid.to_wire().unwrap()).unwrap();
        assert_eq!(again, grid);
    }

    #[test]
    fn highly_compressed_skin_inflates_fully() {
        let wire = encode(&grid_of("#112233")).unwrap();
        let compressed = STANDARD.decode(&wire[WIRE_PREFIX.len()..]).unwrap();
        assert!(compressed.len() * 4 < CELLS * 7 * 2);

        let mut grid = SkinGrid::from_wire(&wire).unwrap();
        assert!(grid.cells().all(|c| c == "#112233FF"));

        grid.set_cell(4, 4, "#445566").unwrap();
        let edited = SkinGrid::from_wire(&grid.to_wire().unwrap()).unwrap();
        assert_eq!(edited.cell(4, 4), Some("#445566FF"));
    }

    #[test]
    fn grid_cells_reject_separators_and_non_ascii() {
        let mut grid = SkinGrid::filled("#FFFFFF").unwrap();
        assert!(grid.set_cell(0, 0, "#AA;BB").is_err());
        assert!(grid.set_cell(0, 0, "#A#B").is_err());
        assert!(grid.set_cell(0, 0, "#ßßßßßßßß").is_err());
        assert!(SkinGrid::filled("#AA;BB").is_err());
        assert!(SkinGrid::filled("#ßß").is_err());
        assert!(EncodedSkin::from_grid(&grid).is_ok());
    }

    #[test]
    fn encoded_skin_from_grid_always_parses() {
        let mut grid = SkinGrid::filled("#0a0b0c").unwrap();
        grid.set_cell(17, 19, "#FF").unwrap();
        let encoded = EncodedSkin::from_grid(&grid).unwrap();
        assert!(is_encoded_skin(encoded.as_str()));
        assert_eq!(encoded.to_grid().unwrap().cell(0, 0), Some("#0A0B0CFF"));
    }

    #[test]
    fn cell_length_counts_utf16_units() {
        let mut rows = grid_of("#000000");
        rows[0][0] = "#\u{1F600}\u{1F600}\u{1F600}\u{1F600}\u{1F600}".into();
        assert_eq!(rows[0][0].chars().count(), 6);
        assert!(!is_decoded_skin(&rows));
    }

    #[test]
    fn decoded_cells_outside_the_grid_rule_are_rejected() {
        let mut payload = "112233;".repeat(CELLS - 1);
        payload.push_str("AB#C;");
        assert_eq!(
            SkinGrid::from_wire(&wire_from_payload(&payload)),
            Err(DecodeError::InvalidCell("#AB#C".into()))
        );
    }

    fn arb_cell() -> impl Strategy<Value = String> {
        prop_oneof![
            "[0-9A-F]{8}".prop_map(|hex| format!("#{hex}")),
            "[0-9a-fA-F]{6}".prop_map(|hex| format!("#{hex}")),
        ]
    }

    fn arb_grid() -> impl Strategy<Value = Vec<Vec<String>>> {
        prop::collection::vec(prop::collection::vec(arb_cell(), COLUMNS), ROWS)
    }

    /// Grids drawn from a palette of one to three colours, which compress
    /// far better than uniformly random cells.
    fn arb_palette_grid() -> impl Strategy<Value = Vec<Vec<String>>> {
        prop::collection::vec(arb_cell(), 1..=3).prop_flat_map(|palette| {
            let picks = prop::collection::vec(prop::collection::vec(0..palette.len(), COLUMNS), ROWS);
            picks.prop_map(move |rows| {
                rows.into_iter()
                    .map(|row| row.into_iter().map(|i| palette[i].clone()).collect())
                    .collect()
            })
        })
    }

    /// The decoded form of a cell: uppercase, opaque cells widened.
    fn canonical(cell: &str) -> String {
        let upper = cell.to_uppercase();
        if upper.len() == 7 { format!("{upper}FF") } else { upper }
    }

    proptest! {
        #[test]
        fn grid_survives_encode_then_decode(rows in arb_grid()) {
            let wire = encode(&rows).unwrap();
            prop_assert!(is_encoded_skin(&wire));
            let decoded = SkinGrid::from_wire(&wire).unwrap();
            let expected: Vec<Vec<String>> = rows
                .iter()
                .map(|row| row.iter().map(|c| canonical(c)).collect())
                .collect();
            prop_assert_eq!(decoded.rows(), expected.as_slice());
        }

        #[test]
        fn palette_grid_survives_encode_then_decode(rows in arb_palette_grid()) {
            let wire = encode(&rows).unwrap();
            prop_assert!(is_encoded_skin(&wire));
            let decoded = SkinGrid::from_wire(&wire).unwrap();
            let expected: Vec<Vec<String>> = rows
                .iter()
                .map(|row| row.iter().map(|c| canonical(c)).collect())
                .collect();
            prop_assert_eq!(decoded.rows(), expected.as_slice());
        }

        #[test]
        fn reencoding_a_decoded_skin_is_stable(rows in prop_oneof![arb_grid(), arb_palette_grid()]) {
            let first = SkinGrid::from_wire(&encode(&rows).unwrap()).unwrap();
            let second = SkinGrid::from_wire(&first.to_wire().unwrap()).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
