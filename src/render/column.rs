//! Shared column-line formatting.

use crate::model::{Column, ConstraintSet};

/// Indentation of entity headers and closing braces
pub const ENTITY_INDENT: &str = "\t";
/// Indentation of entity members
pub const MEMBER_INDENT: &str = "\t\t";

/// Separator line between primary key and other columns
pub const SEPARATOR: &str = "--";

/// Column type with its length, e.g. `varchar(255)`
pub fn format_column_type(column: &Column) -> String {
    if column.max_length > 0 {
        format!("{}({})", column.data_type, column.max_length)
    } else {
        column.data_type.clone()
    }
}

/// Constraint annotation, e.g. `<<FK,NULLABLE>>` (empty for no constraints)
pub fn format_constraints(constraints: &ConstraintSet) -> String {
    if constraints.is_empty() {
        return String::new();
    }

    let tags: Vec<&str> = constraints.ordered().iter().map(|c| c.as_str()).collect();
    format!("<<{}>>", tags.join(","))
}

/// One member line for a column, including the trailing newline
pub fn format_column_line(column: &Column) -> String {
    let annotation = format_constraints(&column.constraints);
    if annotation.is_empty() {
        format!(
            "{}{} : {}\n",
            MEMBER_INDENT,
            column.name,
            format_column_type(column)
        )
    } else {
        format!(
            "{}{} : {} {}\n",
            MEMBER_INDENT,
            column.name,
            format_column_type(column),
            annotation
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Constraint;

    #[test]
    fn test_type_with_length() {
        let mut column = Column::new("email", 2, "varchar");
        assert_eq!(format_column_type(&column), "varchar");

        column.max_length = 255;
        assert_eq!(format_column_type(&column), "varchar(255)");
    }

    #[test]
    fn test_plain_column_line() {
        let column = Column::new("id", 1, "integer");
        assert_eq!(format_column_line(&column), "\t\tid : integer\n");
    }

    #[test]
    fn test_annotated_column_line() {
        let mut column = Column::new("user_id", 2, "integer");
        column.constraints.insert(Constraint::Nullable);
        column.constraints.insert(Constraint::Fk);

        assert_eq!(
            format_column_line(&column),
            "\t\tuser_id : integer <<FK,NULLABLE>>\n"
        );
    }
}
