use crate::filter::FilteredEntry;

const COLUMN_SEPARATOR: &str = " | ";

/// Renders entries as a left-aligned `Name | IP` table. Each row's first cell
/// is prefixed with the entry's ordinal; the last column is not padded.
pub fn render(entries: &[FilteredEntry]) -> String {
    let rows: Vec<(String, &str)> = entries
        .iter()
        .map(|e| (format!("{}) {}", e.ordinal, e.name), e.address.as_str()))
        .collect();

    let name_width = rows
        .iter()
        .map(|(name, _)| name.chars().count())
        .chain(std::iter::once("Name".len()))
        .max()
        .unwrap_or(0);
    let ip_width = rows
        .iter()
        .map(|(_, ip)| ip.chars().count())
        .chain(std::iter::once("IP".len()))
        .max()
        .unwrap_or(0);

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format!("{:<name_width$}{COLUMN_SEPARATOR}IP", "Name"));
    lines.push(format!(
        "{}{COLUMN_SEPARATOR}{}",
        "-".repeat(name_width),
        "-".repeat(ip_width)
    ));
    for (name, ip) in &rows {
        lines.push(format!("{:<name_width$}{COLUMN_SEPARATOR}{}", name, ip));
    }

    lines.join("\n")
}
