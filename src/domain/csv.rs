//! Minimal CSV writer for the stock export.

/// Quote a field when it contains a comma, a quote or a line break.
pub fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

pub fn write_row<S: AsRef<str>>(out: &mut String, fields: &[S]) {
    let line = fields
        .iter()
        .map(|field| escape_field(field.as_ref()))
        .collect::<Vec<_>>()
        .join(",");
    out.push_str(&line);
    out.push('\n');
}

/// Header line plus one line per row.
pub fn to_csv<S: AsRef<str>>(header: &[&str], rows: &[Vec<S>]) -> String {
    let mut out = String::new();
    write_row(&mut out, header);
    for row in rows {
        write_row(&mut out, row);
    }
    out
}

/// Centavos rendered as `1234.56`.
pub fn format_centavos(value: i64) -> String {
    let sign = if value < 0 { "-" } else { "" };
    let abs = value.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_fields_are_untouched() {
        assert_eq!(escape_field("Cabo de aço"), "Cabo de aço");
    }

    #[test]
    fn special_fields_are_quoted() {
        assert_eq!(escape_field("Parafuso 10mm, zincado"), "\"Parafuso 10mm, zincado\"");
        assert_eq!(escape_field("Chapa 3\" pol"), "\"Chapa 3\"\" pol\"");
        assert_eq!(escape_field("linha\nquebrada"), "\"linha\nquebrada\"");
    }

    #[test]
    fn export_has_header_plus_rows() {
        let rows = vec![
            vec!["Cabo", "UN", "10"],
            vec!["Parafuso, M10", "UN", "300"],
            vec!["Graxa", "KG", "4"],
        ];
        let csv = to_csv(&["Nome", "Unidade", "Quantidade"], &rows);
        assert_eq!(csv.lines().count(), rows.len() + 1);
        assert!(csv.contains("\"Parafuso, M10\",UN,300"));
    }

    #[test]
    fn centavos_format() {
        assert_eq!(format_centavos(123_456), "1234.56");
        assert_eq!(format_centavos(5), "0.05");
        assert_eq!(format_centavos(-250), "-2.50");
    }
}
