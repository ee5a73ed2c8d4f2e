use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use thiserror::Error;

use super::model::{Character, CharacterDataset, Role};

/// Columns every input file must provide.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "name",
    "movie_name",
    "genre",
    "role",
    "rating",
    "value_list",
    "value_rank",
    "vec",
];

// ---------------------------------------------------------------------------
// Load errors
// ---------------------------------------------------------------------------

/// A load failure tied to the input data rather than to I/O.
///
/// Any malformed field is fatal for the whole load: every downstream view
/// assumes a fully parsed dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}: malformed '{field}' field: {raw:?}")]
    MalformedRecord {
        row: usize,
        field: &'static str,
        raw: String,
    },

    #[error("row {row}: value_list has {values} entries but value_rank has {ranks}")]
    LengthMismatch {
        row: usize,
        values: usize,
        ranks: usize,
    },
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a character dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row with the required columns (the source format)
/// * `.json` – records-oriented array of objects with the same fields
pub fn load_file(path: &Path) -> Result<CharacterDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV file")?;
            read_csv(file)
        }
        "json" => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            read_json(&text)
        }
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Parse CSV character data from any reader.
///
/// Layout: header row naming the [`REQUIRED_COLUMNS`]; `value_list` holds a
/// single-quoted pseudo-JSON string list, `value_rank` a JSON number list,
/// `vec` a whitespace-separated float vector.
pub fn read_csv<R: Read>(input: R) -> Result<CharacterDataset> {
    let mut reader = csv::Reader::from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let column = |name: &'static str| -> Result<usize, LoadError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(LoadError::MissingColumn(name))
    };
    let name_i = column("name")?;
    let movie_i = column("movie_name")?;
    let genre_i = column("genre")?;
    let role_i = column("role")?;
    let rating_i = column("rating")?;
    let list_i = column("value_list")?;
    let rank_i = column("value_rank")?;
    let vec_i = column("vec")?;

    let mut characters = Vec::new();

    for (row, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row}"))?;
        let field = |i: usize| record.get(i).unwrap_or("");

        let value_list = parse_quoted_list(field(list_i), row)?;
        let value_rank = parse_rank_list(field(rank_i), row)?;
        if value_list.len() != value_rank.len() {
            return Err(LoadError::LengthMismatch {
                row,
                values: value_list.len(),
                ranks: value_rank.len(),
            }
            .into());
        }

        characters.push(Character {
            name: field(name_i).to_string(),
            movie_name: field(movie_i).to_string(),
            genre: field(genre_i).to_string(),
            role: Role::parse(field(role_i)),
            rating: parse_rating(field(rating_i), row)?,
            value_list,
            value_rank,
            vec: parse_vector(field(vec_i), row)?,
        });
    }

    log::debug!("loaded {} characters from CSV", characters.len());
    Ok(CharacterDataset::from_characters(characters))
}

// ---------------------------------------------------------------------------
// Field decoders
// ---------------------------------------------------------------------------

/// Decode the single-quoted pseudo-JSON string list used by `value_list`:
/// `['family', 'honor', ...]`.  Single quotes are rewritten to double quotes
/// and the result parsed as a JSON string array.
fn parse_quoted_list(raw: &str, row: usize) -> Result<Vec<String>, LoadError> {
    let normalized = raw.replace('\'', "\"");
    serde_json::from_str(&normalized).map_err(|_| LoadError::MalformedRecord {
        row,
        field: "value_list",
        raw: raw.to_string(),
    })
}

/// Decode the JSON numeric list used by `value_rank`: `[1, 2, 3, ...]`.
fn parse_rank_list(raw: &str, row: usize) -> Result<Vec<f64>, LoadError> {
    serde_json::from_str(raw).map_err(|_| LoadError::MalformedRecord {
        row,
        field: "value_rank",
        raw: raw.to_string(),
    })
}

/// Decode the whitespace-separated float vector used by `vec`.
fn parse_vector(raw: &str, row: usize) -> Result<Vec<f64>, LoadError> {
    raw.split_whitespace()
        .map(|tok| {
            tok.parse::<f64>().map_err(|_| LoadError::MalformedRecord {
                row,
                field: "vec",
                raw: raw.to_string(),
            })
        })
        .collect()
}

fn parse_rating(raw: &str, row: usize) -> Result<f64, LoadError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| LoadError::MalformedRecord {
            row,
            field: "rating",
            raw: raw.to_string(),
        })
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// One record of the JSON input before field decoding. List and rating
/// fields may appear natively or in their CSV string encodings.
#[derive(Debug, Deserialize)]
struct RawRecord {
    name: String,
    movie_name: String,
    genre: String,
    role: String,
    rating: RawNumber,
    value_list: RawStrings,
    value_rank: RawNumbers,
    vec: RawNumbers,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Text(String),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawStrings {
    Items(Vec<String>),
    Text(String),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawNumbers {
    Items(Vec<f64>),
    Text(String),
}

/// Parse records-oriented JSON:
///
/// ```json
/// [
///   {
///     "name": "Maximus", "movie_name": "Gladiator", "genre": "Action",
///     "role": "protagonist", "rating": 8.5,
///     "value_list": ["honor", "family"], "value_rank": [1, 2],
///     "vec": [0.1, -0.3]
///   },
///   ...
/// ]
/// ```
pub fn read_json(text: &str) -> Result<CharacterDataset> {
    let records: Vec<RawRecord> =
        serde_json::from_str(text).context("parsing JSON records")?;

    let mut characters = Vec::with_capacity(records.len());

    for (row, rec) in records.into_iter().enumerate() {
        let value_list = match rec.value_list {
            RawStrings::Items(items) => items,
            RawStrings::Text(s) => parse_quoted_list(&s, row)?,
        };
        let value_rank = match rec.value_rank {
            RawNumbers::Items(items) => items,
            RawNumbers::Text(s) => parse_rank_list(&s, row)?,
        };
        if value_list.len() != value_rank.len() {
            return Err(LoadError::LengthMismatch {
                row,
                values: value_list.len(),
                ranks: value_rank.len(),
            }
            .into());
        }

        // JSON numbers are always finite; only the string encoding needs
        // the malformed check.
        let rating = match rec.rating {
            RawNumber::Number(n) => n,
            RawNumber::Text(s) => parse_rating(&s, row)?,
        };

        characters.push(Character {
            name: rec.name,
            movie_name: rec.movie_name,
            genre: rec.genre,
            role: Role::parse(&rec.role),
            rating,
            value_list,
            value_rank,
            vec: match rec.vec {
                RawNumbers::Items(items) => items,
                RawNumbers::Text(s) => parse_vector(&s, row)?,
            },
        });
    }

    log::debug!("loaded {} characters from JSON", characters.len());
    Ok(CharacterDataset::from_characters(characters))
}
