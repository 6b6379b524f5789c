//! Column list projection

use crate::model::DataColumn;

/// Restricts schema columns to the selected bins, keeping schema order.
///
/// `None` keeps every column. Selected names without a schema column are
/// dropped.
pub fn filter_columns(columns: Vec<DataColumn>, selected: Option<&[String]>) -> Vec<DataColumn> {
    match selected {
        None => columns,
        Some(selected) => columns
            .into_iter()
            .filter(|c| selected.iter().any(|s| s == &c.name))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ColumnType;

    fn schema() -> Vec<DataColumn> {
        ["__key", "name", "age", "email"]
            .iter()
            .map(|n| DataColumn::new("test", "users", ColumnType::String, *n, *n))
            .collect()
    }

    #[test]
    fn test_no_selection_keeps_all() {
        assert_eq!(filter_columns(schema(), None).len(), 4);
    }

    #[test]
    fn test_selection_keeps_schema_order() {
        let selected = vec!["email".to_string(), "name".to_string()];
        let names: Vec<_> = filter_columns(schema(), Some(&selected))
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["name", "email"]);
    }

    #[test]
    fn test_unknown_selection_dropped() {
        let selected = vec!["missing".to_string()];
        assert!(filter_columns(schema(), Some(&selected)).is_empty());
    }
}
