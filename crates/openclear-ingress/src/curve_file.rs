//! Market-operator aggregate curve files.
//!
//! Semicolon-separated text with European number formatting. A preamble
//! (operator banner, issue date) precedes the header row; the header is the
//! first record with a `Tipo Oferta` column. Required columns:
//!
//! | column                                   | meaning                   |
//! |------------------------------------------|---------------------------|
//! | `Pais`                                   | market code               |
//! | `Periodo`                                | settlement period         |
//! | `Tipo Oferta`                            | `C` buy / `V` sell        |
//! | `Potencia Compra/Venta` (or `Energía …`) | volume                    |
//! | `Precio Compra/Venta`                    | price                     |
//!
//! An optional `Fecha` column (`dd/mm/yyyy`) fills in the trading day.

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Terminator};
use openclear_types::{OpenclearError, Result, TradingSession};

use crate::batch::IngestReport;
use crate::lenient::parse_european;
use crate::validator::{RawRow, RowValidator};

const COUNTRY: &str = "Pais";
const PERIOD: &str = "Periodo";
const SIDE: &str = "Tipo Oferta";
const VOLUME: &[&str] = &["Potencia Compra/Venta", "Energía Compra/Venta"];
const PRICE: &str = "Precio Compra/Venta";
const DATE: &str = "Fecha";

/// Row selection applied while reading a curve file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurveFileFilter {
    /// Keep only this `Pais` value.
    pub country: Option<String>,
    /// Keep only this `Periodo` value, compared as written (e.g. `12` or `H12Q1`).
    pub period: Option<String>,
}

impl CurveFileFilter {
    fn accepts(&self, country: &str, period: &str) -> bool {
        self.country.as_deref().is_none_or(|c| c == country)
            && self.period.as_deref().is_none_or(|p| p == period)
    }
}

/// Column positions resolved from the header row.
struct Columns {
    country: usize,
    period: usize,
    side: usize,
    volume: usize,
    price: usize,
    date: Option<usize>,
}

impl Columns {
    fn from_header(header: &StringRecord) -> Result<Self> {
        let position = |name: &str| header.iter().position(|h| h.trim() == name);
        let require = |name: &str| {
            position(name).ok_or_else(|| OpenclearError::MissingColumn {
                column: name.to_string(),
            })
        };

        Ok(Self {
            country: require(COUNTRY)?,
            period: require(PERIOD)?,
            side: require(SIDE)?,
            volume: VOLUME
                .iter()
                .find_map(|name| position(name))
                .ok_or_else(|| OpenclearError::MissingColumn {
                    column: VOLUME[0].to_string(),
                })?,
            price: require(PRICE)?,
            date: position(DATE),
        })
    }

    fn width(&self) -> usize {
        [self.country, self.period, self.side, self.volume, self.price]
            .into_iter()
            .max()
            .unwrap_or(0)
            + 1
    }
}

/// Parse and validate a curve file, keeping rows accepted by `filter`.
pub fn parse_curve_file(text: &str, filter: &CurveFileFilter) -> Result<IngestReport> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .terminator(Terminator::Any(b'\n'))
        .from_reader(text.as_bytes());

    let mut columns: Option<Columns> = None;
    let mut validator = RowValidator::new();
    let mut short_rows = 0usize;

    for (index, record) in reader.records().enumerate() {
        let line = index + 1;
        let record = record.map_err(|e| OpenclearError::InvalidRow {
            row: line,
            reason: e.to_string(),
        })?;

        let Some(cols) = columns.as_ref() else {
            if record.iter().any(|field| field.trim() == SIDE) {
                columns = Some(Columns::from_header(&record)?);
            }
            continue;
        };

        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        if record.len() < cols.width() {
            tracing::warn!(line, fields = record.len(), "Skipping short curve-file row");
            short_rows += 1;
            continue;
        }

        let field = |i: usize| record.get(i).map_or("", str::trim);
        let country = field(cols.country);
        let period = field(cols.period);
        if !filter.accepts(country, period) {
            continue;
        }

        let session = TradingSession {
            day: cols
                .date
                .and_then(|i| NaiveDate::parse_from_str(field(i), "%d/%m/%Y").ok()),
            period: period.parse().ok(),
        };
        validator.push(
            line,
            RawRow {
                market_code: country.to_string(),
                side_code: field(cols.side).to_string(),
                volume: parse_european(field(cols.volume)),
                price: parse_european(field(cols.price)),
                session,
            },
        )?;
    }

    if columns.is_none() {
        return Err(OpenclearError::MissingColumn {
            column: SIDE.to_string(),
        });
    }

    let mut report = validator.finish();
    report.skipped_rows += short_rows;
    Ok(report)
}

/// Turn raw file bytes into text. UTF-8 (with or without BOM) is read as
/// such; anything else is taken as Latin-1, the market operator's encoding.
#[must_use]
pub fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            tracing::debug!(len = bytes.len(), "Input is not UTF-8, decoding as Latin-1");
            bytes.iter().map(|&b| char::from(b)).collect()
        }
    }
}
