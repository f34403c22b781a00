use csv::{ReaderBuilder, StringRecord};
use std::fmt;
use std::rc::Rc;

use crate::loader::LoadError;

/// Column holding the longitude of a point.
pub const LON: &str = "LON";
/// Column holding the latitude of a point.
pub const LAT: &str = "LAT";

/// An immutable, cheaply cloneable table of CSV rows addressed by header name.
///
/// Rows have no key of their own; a row is identified by its index.
#[derive(Clone, Default)]
pub struct PointSet {
    headers: Rc<StringRecord>,
    rows: Rc<[StringRecord]>,
}

impl PointSet {
    pub fn new(headers: StringRecord, rows: Vec<StringRecord>) -> Self {
        Self {
            headers: Rc::new(headers),
            rows: rows.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.headers.iter()
    }

    pub fn get(&self, index: usize) -> Option<PointRecord<'_>> {
        self.rows.get(index).map(|values| PointRecord {
            index,
            headers: &self.headers,
            values,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = PointRecord<'_>> {
        self.rows
            .iter()
            .enumerate()
            .map(move |(index, values)| PointRecord {
                index,
                headers: &self.headers,
                values,
            })
    }
}

impl PartialEq for PointSet {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.headers, &other.headers) && Rc::ptr_eq(&self.rows, &other.rows)
    }
}

impl fmt::Debug for PointSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointSet")
            .field("headers", &self.headers)
            .field("rows", &self.rows.len())
            .finish()
    }
}

/// A borrowed view of one row of a [`PointSet`].
#[derive(Debug, Clone, Copy)]
pub struct PointRecord<'a> {
    index: usize,
    headers: &'a StringRecord,
    values: &'a StringRecord,
}

impl<'a> PointRecord<'a> {
    /// Positional identity of the row within its set.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Value of the column called `field`. Missing columns and short rows yield `None`.
    pub fn get(&self, field: &str) -> Option<&'a str> {
        self.headers
            .iter()
            .position(|h| h == field)
            .and_then(|i| self.values.get(i))
    }

    /// Numeric value of a column; `None` when missing, non-numeric or not finite.
    pub fn number(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(parse_number)
    }

    pub fn longitude(&self) -> Option<f64> {
        self.number(LON)
    }

    pub fn latitude(&self) -> Option<f64> {
        self.number(LAT)
    }
}

/// Parse a numeric CSV cell, rejecting NaN and infinities.
pub fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse CSV text with a header row into a [`PointSet`].
///
/// Rows may be ragged; cells are trimmed. No schema is enforced.
pub fn parse_points(csv_data: &str) -> Result<PointSet, LoadError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(csv_data.as_bytes());

    let headers = rdr.headers()?.clone();
    let mut rows = Vec::new();
    for result in rdr.records() {
        rows.push(result?);
    }
    log::debug!("parsed {} point rows ({} columns)", rows.len(), headers.len());
    Ok(PointSet::new(headers, rows))
}
