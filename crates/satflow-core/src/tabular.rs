//! `hammer --csv` output
//!
//! The first line is a header. Fields are comma separated; hammer quotes
//! fields containing commas with double quotes.

use satflow_config::MatchMode;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<String>,
}

impl Table {
    pub fn parse(output: &str) -> Self {
        let mut lines = output.trim().lines().filter(|l| !l.trim().is_empty());

        let header = lines.next().map(split_fields).unwrap_or_default();
        let rows = lines.map(str::to_string).collect();

        Self { header, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Raw data lines, header excluded
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Index of a header column, compared case-insensitively
    pub fn column(&self, name: &str) -> Option<usize> {
        self.header
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    }

    /// First data row matching `key`.
    ///
    /// In [`MatchMode::Substring`] a row matches when `key` occurs anywhere in
    /// the line. In [`MatchMode::Exact`] the `key_column` field must equal
    /// `key`; without such a column the lookup falls back to substring.
    pub fn find_row(&self, key: &str, key_column: &str, mode: MatchMode) -> Option<&str> {
        let column = match mode {
            MatchMode::Substring => None,
            MatchMode::Exact => {
                let column = self.column(key_column);
                if column.is_none() {
                    tracing::debug!(
                        "column '{}' missing from header {:?}, using substring match",
                        key_column,
                        self.header
                    );
                }
                column
            }
        };

        self.rows
            .iter()
            .find(|row| match column {
                Some(index) => split_fields(row)
                    .get(index)
                    .is_some_and(|field| field.trim() == key),
                None => row.contains(key),
            })
            .map(String::as_str)
    }

    pub fn contains(&self, key: &str, key_column: &str, mode: MatchMode) -> bool {
        self.find_row(key, key_column, mode).is_some()
    }

    /// First field (the `Id` column) of the first row matching `key`
    pub fn id_of(&self, key: &str, key_column: &str, mode: MatchMode) -> Option<String> {
        self.find_row(key, key_column, mode)
            .and_then(|row| split_fields(row).into_iter().next())
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
    }
}

/// Split one CSV line, honouring double-quoted fields and `""` escapes
pub fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUBNETS: &str = "\
Id,Name,Network Addr,Network Prefix,Network Mask,VLAN ID,Boot mode,Gateway Address
3,10.20.30.0,10.20.30.0,24,255.255.255.0,,Static,10.20.30.1
7,storage,10.9.0.0,24,255.255.255.0,,Static,10.9.0.1
";

    #[test]
    fn test_split_fields_quoted() {
        assert_eq!(
            split_fields(r#"1,"Smith, John","say ""hi""",x"#),
            vec!["1", "Smith, John", r#"say "hi""#, "x"]
        );
        assert_eq!(split_fields(""), vec![""]);
    }

    #[test]
    fn test_header_is_not_a_row() {
        let table = Table::parse(SUBNETS);
        assert_eq!(table.rows().len(), 2);
        assert!(!table.contains("Network Addr", "Name", MatchMode::Substring));
    }

    #[test]
    fn test_empty_and_header_only() {
        for output in ["", "\n", "Id,Name\n"] {
            let table = Table::parse(output);
            assert!(table.is_empty());
            assert!(!table.contains("Id", "Name", MatchMode::Substring));
            assert!(!table.contains("", "Name", MatchMode::Substring));
            assert!(!table.contains("Name", "Name", MatchMode::Exact));
        }
    }

    #[test]
    fn test_substring_matches_any_line() {
        let table = Table::parse(SUBNETS);
        assert!(table.contains("10.9.0.0", "Network Addr", MatchMode::Substring));
        // substring of an unrelated value still counts
        assert!(table.contains("torag", "Network Addr", MatchMode::Substring));
    }

    #[test]
    fn test_exact_compares_one_column() {
        let table = Table::parse(SUBNETS);
        assert!(table.contains("10.9.0.0", "network addr", MatchMode::Exact));
        assert!(!table.contains("10.9.0", "Network Addr", MatchMode::Exact));
        assert!(!table.contains("10.9.0.1", "Network Addr", MatchMode::Exact));
    }

    #[test]
    fn test_exact_without_column_falls_back() {
        let table = Table::parse(SUBNETS);
        assert!(table.contains("torag", "Title", MatchMode::Exact));
    }

    #[test]
    fn test_id_of() {
        let table = Table::parse(SUBNETS);
        assert_eq!(
            table.id_of("10.20.30.0", "Network Addr", MatchMode::Substring),
            Some("3".to_string())
        );
        assert_eq!(table.id_of("172.16.0.0", "Network Addr", MatchMode::Substring), None);
    }
}
