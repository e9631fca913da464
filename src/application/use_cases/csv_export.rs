use crate::domain::record::Record;

pub const EXPORT_FILE_NAME: &str = "compliance_report.csv";

pub const EXPORT_HEADERS: [&str; 6] = [
    "Name of Employee",
    "Society Name",
    "City",
    "Team",
    "Status",
    "Bucket of Issues",
];

/// Serialize a subset for download. The two free-text columns are always
/// quoted; the rest are written as-is.
pub fn to_csv(subset: &[Record]) -> String {
    let mut lines = Vec::with_capacity(subset.len() + 1);
    lines.push(EXPORT_HEADERS.join(","));

    for record in subset {
        let cells = [
            record.employee_identifier.clone(),
            quote(&record.society_name),
            record.city.clone(),
            record.team.clone(),
            record.status.clone(),
            quote(&record.issue_bucket),
        ];
        lines.push(cells.join(","));
    }

    lines.join("\n")
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}
