use crate::domain::{CaseField, CaseRecord};
use crate::time::format::table_date;
use serde::Serialize;

/// Column headers, in [`CaseField::ALL`] order.
pub const COLUMN_HEADERS: [&str; 14] = [
    "Submission date",
    "Total number of cases",
    "Total confirmed cases",
    "Total probable cases",
    "Number of new cases",
    "Number of new probable cases",
    "Total number of deaths",
    "Total number of confirmed deaths",
    "Total number of probable deaths",
    "Number of new deaths",
    "Number of new probable deaths",
    "Date and time record was created",
    "If Agree, then confirmed and probable cases are included. If Not Agree, then only total cases are included.",
    "If Agree, then confirmed and probable deaths are included. If Not Agree, then only total deaths are included.",
];

/// One table row; cells follow [`COLUMN_HEADERS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TableRow(pub [String; 14]);

impl TableRow {
    pub fn cells(&self) -> &[String; 14] {
        &self.0
    }

    pub fn cell(&self, field: CaseField) -> &str {
        // ALL holds every variant exactly once.
        let idx = CaseField::ALL
            .iter()
            .position(|f| *f == field)
            .unwrap_or_default();
        &self.0[idx]
    }
}

/// One row per record, in series order. The two date columns are shown as
/// `MM/DD/YYYY`; a date that does not parse leaves its cell empty and the row
/// is kept.
pub fn render_rows(series: &[CaseRecord]) -> Vec<TableRow> {
    series.iter().map(render_row).collect()
}

fn render_row(record: &CaseRecord) -> TableRow {
    TableRow(CaseField::ALL.map(|field| {
        let raw = record.get(field);
        if !field.is_date() {
            return raw.to_string();
        }
        match table_date(raw) {
            Ok(shown) => shown,
            Err(err) => {
                tracing::debug!(%field, error = %err, "date cell left empty");
                String::new()
            }
        }
    }))
}
