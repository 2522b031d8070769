use super::super::domain::AuditInput;
use std::io::Read;

#[derive(Debug)]
pub(crate) struct CsvAuditRow {
    pub(crate) line: u64,
    pub(crate) name: Option<String>,
    pub(crate) input: AuditInput,
}

#[derive(Debug, Default)]
pub(crate) struct ParsedCsv {
    pub(crate) rows: Vec<CsvAuditRow>,
    pub(crate) ignored_columns: Vec<String>,
}

/// Maps every column onto the matching form field. Headers that match no field
/// are reported once and skipped.
pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<ParsedCsv, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|header| header.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let mut parsed = ParsedCsv::default();
    let mut probe = AuditInput::default();
    for header in &headers {
        if !is_name_column(header) && !probe.set(header, "") {
            parsed.ignored_columns.push(header.clone());
        }
    }

    for record in csv_reader.records() {
        let record = record?;
        let line = record
            .position()
            .map(|position| position.line())
            .unwrap_or_default();

        let mut input = AuditInput::default();
        let mut name = None;
        for (header, value) in headers.iter().zip(record.iter()) {
            if is_name_column(header) {
                if !value.is_empty() {
                    name = Some(value.to_string());
                }
                continue;
            }
            input.set(header, value);
        }

        parsed.rows.push(CsvAuditRow { line, name, input });
    }

    Ok(parsed)
}

fn is_name_column(header: &str) -> bool {
    matches!(
        header.to_ascii_lowercase().as_str(),
        "name" | "audit" | "audit_name" | "nom"
    )
}
