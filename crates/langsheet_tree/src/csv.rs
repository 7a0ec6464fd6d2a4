//! Delimited-text rendering of a table.
//!
//! Layout: header line, then one line per row with the key path followed by
//! every language value wrapped in double quotes. Embedded quotes are doubled.
//! Header labels and keys are quoted only when they need it.

use crate::conf::{C_CSV_DELIMITER, C_CSV_LINE_SEPARATOR, C_CSV_QUOTE};
use crate::table::SpecTable;

/// Render a table as CSV text (lines joined with `\n`, no trailing newline).
pub fn render_table_csv(table: &SpecTable) -> String {
    let mut l_lines = Vec::with_capacity(table.rows.len() + 1);

    l_lines.push(join_fields(
        table.header.iter().map(|label| render_csv_field(label, false)),
    ));
    for row in &table.rows {
        let c_key = render_csv_field(&row.key_path.encode(), false);
        l_lines.push(join_fields(
            std::iter::once(c_key).chain(row.values.iter().map(|v| render_csv_field(v, true))),
        ));
    }

    l_lines.join(C_CSV_LINE_SEPARATOR)
}

/// Render one field; `if_force_quote` wraps it even when not required.
pub fn render_csv_field(value: &str, if_force_quote: bool) -> String {
    let if_needs_quote = value.contains(C_CSV_DELIMITER)
        || value.contains(C_CSV_QUOTE)
        || value.contains('\n')
        || value.contains('\r');
    if !if_force_quote && !if_needs_quote {
        return value.to_string();
    }

    let c_quote = C_CSV_QUOTE.to_string();
    let c_escaped = value.replace(C_CSV_QUOTE, &c_quote.repeat(2));
    format!("{C_CSV_QUOTE}{c_escaped}{C_CSV_QUOTE}")
}

fn join_fields(fields: impl Iterator<Item = String>) -> String {
    fields.collect::<Vec<_>>().join(&C_CSV_DELIMITER.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypath::SpecKeyPath;
    use crate::table::SpecTableRow;

    fn table(l_rows: Vec<(&str, Vec<&str>)>) -> SpecTable {
        SpecTable {
            header: vec!["Key".to_string(), "es".to_string(), "en".to_string()],
            rows: l_rows
                .into_iter()
                .map(|(key, l_values)| SpecTableRow {
                    key_path: SpecKeyPath::decode(key).unwrap(),
                    values: l_values.into_iter().map(ToString::to_string).collect(),
                })
                .collect(),
        }
    }

    #[test]
    fn values_are_quoted_and_key_is_bare() {
        let txt = render_table_csv(&table(vec![("common.hello", vec!["Hola", "Hello"])]));
        assert_eq!(txt, "Key,es,en\ncommon.hello,\"Hola\",\"Hello\"");
    }

    #[test]
    fn unset_values_render_empty_not_undefined() {
        let txt = render_table_csv(&table(vec![("x.y", vec!["", "only en"])]));
        assert_eq!(txt, "Key,es,en\nx.y,\"\",\"only en\"");
        assert!(!txt.contains("undefined"));
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        let txt = render_table_csv(&table(vec![("q", vec!["say \"hi\"", "a,b"])]));
        assert_eq!(txt, "Key,es,en\nq,\"say \"\"hi\"\"\",\"a,b\"");
    }

    #[test]
    fn header_label_with_delimiter_is_quoted() {
        assert_eq!(render_csv_field("Español, ES", false), "\"Español, ES\"");
        assert_eq!(render_csv_field("es", false), "es");
    }

    #[test]
    fn empty_table_has_header_only() {
        assert_eq!(render_table_csv(&table(vec![])), "Key,es,en");
    }
}
