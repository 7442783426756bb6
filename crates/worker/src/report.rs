use covid_dash_core::chart::{text, CanvasBoard};
use covid_dash_core::dashboard::Dashboard;
use covid_dash_core::domain::CaseField;
use covid_dash_core::table::TableRow;
use std::fmt::Write;

/// Plain-text report: the three charts, then the full table.
pub fn render(dashboard: &Dashboard<CanvasBoard>) -> String {
    let mut out = String::new();

    if let Some(state) = dashboard.selected() {
        let _ = writeln!(
            out,
            "COVID-19 statistics for {} ({})\n",
            state.name, state.abbreviation
        );
    }

    for (_, config) in dashboard.backend().charts() {
        out.push_str(&text::render(config));
        out.push('\n');
    }

    out.push_str(&render_table(&dashboard.rows()));
    out
}

/// Space-aligned table headed by the API field names.
pub fn render_table(rows: &[TableRow]) -> String {
    let headers = CaseField::ALL.map(CaseField::as_str);
    let mut widths = headers.map(str::len);
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row.cells()) {
            *w = (*w).max(cell.len());
        }
    }

    let mut out = String::new();
    push_line(&mut out, headers.iter().copied(), &widths);
    for row in rows {
        push_line(&mut out, row.cells().iter().map(String::as_str), &widths);
    }
    out
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line = cells
        .zip(widths)
        .map(|(cell, &w)| format!("{cell:<w$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use covid_dash_core::domain::{CaseRecord, UsState};
    use covid_dash_core::table::render_rows;

    fn records() -> Vec<CaseRecord> {
        (1..=3)
            .map(|i| CaseRecord {
                submission_date: format!("2021-02-{i:02}T00:00:00.000"),
                conf_cases: format!("{}", 100 * i),
                new_case: i.to_string(),
                new_death: "0".to_string(),
                created_at: "bad".to_string(),
                ..CaseRecord::default()
            })
            .collect()
    }

    #[test]
    fn table_has_header_plus_one_line_per_row() {
        let text = render_table(&render_rows(&records()));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("submission_date  tot_cases"));
        assert!(lines[0].ends_with("consent_deaths"));
        assert!(lines[1].starts_with("02/01/2021"));
    }

    #[test]
    fn empty_table_is_header_only() {
        assert_eq!(render_table(&[]).lines().count(), 1);
    }

    #[test]
    fn report_includes_title_and_all_charts() {
        let mut d = Dashboard::new(CanvasBoard::new());
        let sel = d.select(UsState::by_abbreviation("VT").unwrap());
        d.complete(sel, Ok(records()));

        let text = render(&d);
        assert!(text.starts_with("COVID-19 statistics for Vermont (VT)"));
        assert!(text.contains("Confirmed Cases (horizontal bar)"));
        assert!(text.contains("New Cases (bar)"));
        assert!(text.contains("New Deaths (line)"));
    }
}
