//! Unit tests for diagram rendering.

use schema_uml::model::{
    Column, Constraint, DbEnum, ForeignKey, PrimaryKey, Schema, Table, View,
};
use schema_uml::render::{
    format_column_line, group_by_target, render_diagram, render_diagram_with, render_enum,
    render_package, render_relationships, render_table, render_view, CrowsFootFormatter,
    MultiplicityFormatter,
};

fn column(name: &str, ordinal: u32, data_type: &str, tags: &[Constraint]) -> Column {
    let mut column = Column::new(name, ordinal, data_type);
    for tag in tags {
        column.constraints.insert(*tag);
    }
    column.nullable = tags.contains(&Constraint::Nullable);
    column
}

fn table(name: &str, columns: Vec<Column>, pk: &[&str]) -> Table {
    Table {
        name: name.to_string(),
        partition_strategy: None,
        partitions: Vec::new(),
        columns,
        primary_key: (!pk.is_empty()).then(|| PrimaryKey {
            name: format!("{}_pkey", name),
            columns: pk.iter().map(|c| c.to_string()).collect(),
        }),
        foreign_keys: Vec::new(),
    }
}

fn fk(source: &str, column: &str, target: &str, schema: &str, nullable: bool) -> ForeignKey {
    ForeignKey {
        name: format!("{}_{}_fkey", source, column),
        source_table: source.to_string(),
        source_column: column.to_string(),
        target_table: target.to_string(),
        target_column: "id".to_string(),
        referenced_schema: schema.to_string(),
        nullable,
    }
}

mod column_tests {
    use super::*;

    #[test]
    fn test_constraints_render_in_priority_order() {
        let c = column(
            "code",
            1,
            "text",
            &[
                Constraint::Generated,
                Constraint::Nullable,
                Constraint::Check,
                Constraint::Default,
                Constraint::AutoIncrement,
                Constraint::Unique,
                Constraint::Fk,
            ],
        );

        assert_eq!(
            format_column_line(&c),
            "\t\tcode : text <<FK,UNIQUE,AUTO_INCREMENT,DEFAULT,CHECK,NULLABLE,GENERATED>>\n"
        );
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let a = column("x", 1, "int", &[Constraint::Nullable, Constraint::Fk]);
        let b = column("x", 1, "int", &[Constraint::Fk, Constraint::Nullable]);

        assert_eq!(format_column_line(&a), format_column_line(&b));
        assert_eq!(format_column_line(&a), "\t\tx : int <<FK,NULLABLE>>\n");
    }

    #[test]
    fn test_duplicate_tags_render_once() {
        let c = column("x", 1, "int", &[Constraint::Unique, Constraint::Unique]);
        assert_eq!(format_column_line(&c), "\t\tx : int <<UNIQUE>>\n");
    }

    #[test]
    fn test_length_is_appended() {
        let mut c = column("email", 1, "varchar", &[]);
        c.max_length = 120;
        assert_eq!(format_column_line(&c), "\t\temail : varchar(120)\n");
    }
}

mod entity_tests {
    use super::*;

    #[test]
    fn test_pk_above_separator() {
        let t = table(
            "orders",
            vec![column("id", 1, "integer", &[]), column("user_id", 2, "integer", &[])],
            &["id"],
        );

        assert_eq!(
            render_table(&t),
            "\tentity \"orders\" {\n\t\tid : integer\n\t\t--\n\t\tuser_id : integer\n\t}\n"
        );
    }

    #[test]
    fn test_composite_pk_uses_key_order() {
        let t = table(
            "memberships",
            vec![
                column("user_id", 1, "integer", &[]),
                column("role", 2, "text", &[]),
                column("team_id", 3, "integer", &[]),
            ],
            &["team_id", "user_id"],
        );

        assert_eq!(
            render_table(&t),
            "\tentity \"memberships\" {\n\t\tteam_id : integer\n\t\tuser_id : integer\n\t\t--\n\t\trole : text\n\t}\n"
        );
    }

    #[test]
    fn test_no_pk_has_no_separator() {
        let t = table(
            "events",
            vec![column("kind", 2, "text", &[]), column("at", 1, "timestamp", &[])],
            &[],
        );

        assert_eq!(
            render_table(&t),
            "\tentity \"events\" {\n\t\tat : timestamp\n\t\tkind : text\n\t}\n"
        );
    }

    #[test]
    fn test_pk_only_table_has_no_separator() {
        let t = table("tags", vec![column("id", 1, "integer", &[])], &["id"]);
        assert_eq!(render_table(&t), "\tentity \"tags\" {\n\t\tid : integer\n\t}\n");
    }

    #[test]
    fn test_partitioned_table() {
        let mut t = table("logs", vec![column("id", 1, "bigint", &[])], &[]);
        t.partition_strategy = Some("list".to_string());
        t.partitions = vec!["logs_eu".to_string(), "logs_us".to_string()];

        assert_eq!(
            render_table(&t),
            "\tentity \"logs\" <<partitioned: list>> {\n\t\tid : bigint\n\t}\n\t' Partitions: logs_eu, logs_us\n"
        );
    }

    #[test]
    fn test_enum_keeps_declared_order() {
        let labels = ["pending", "paid", "shipped", "cancelled", "refunded"];
        let e = DbEnum {
            schema_name: "public".to_string(),
            name: "order_status".to_string(),
            values: labels.iter().map(|s| s.to_string()).collect(),
        };

        assert_eq!(
            render_enum(&e),
            "\tenum \"order_status\" {\n\t\tpending\n\t\tpaid\n\t\tshipped\n\t\tcancelled\n\t\trefunded\n\t}\n"
        );
    }

    #[test]
    fn test_view_has_stereotype() {
        let v = View {
            name: "recent".to_string(),
            columns: vec![column("id", 1, "integer", &[Constraint::Nullable])],
        };

        assert_eq!(
            render_view(&v),
            "\tentity \"recent\" <<view>> {\n\t\tid : integer <<NULLABLE>>\n\t}\n"
        );
    }
}

mod relationship_tests {
    use super::*;

    fn schema_with_fks(fks: Vec<ForeignKey>) -> Schema {
        let mut schema = Schema::new("public");
        let mut t = table("source", Vec::new(), &[]);
        t.foreign_keys = fks;
        schema.tables.push(t);
        schema
    }

    #[test]
    fn test_no_fks_renders_nothing() {
        let schema = schema_with_fks(Vec::new());
        assert_eq!(render_relationships(&schema, &CrowsFootFormatter), "");
    }

    #[test]
    fn test_groups_sorted_by_target() {
        let schema = schema_with_fks(vec![
            fk("orders", "user_id", "users", "public", false),
            fk("orders", "coupon_id", "coupons", "public", true),
            fk("reviews", "user_id", "users", "public", false),
        ]);

        assert_eq!(
            render_relationships(&schema, &CrowsFootFormatter),
            "\tcoupons ||--o{ orders\n\n\tusers ||--|{ orders\n\tusers ||--|{ reviews\n"
        );
    }

    #[test]
    fn test_grouping_is_independent_of_table_order() {
        let mut a = Schema::new("public");
        let mut b = Schema::new("public");
        let mut orders = table("orders", Vec::new(), &[]);
        orders.foreign_keys = vec![fk("orders", "user_id", "users", "public", false)];
        let mut items = table("items", Vec::new(), &[]);
        items.foreign_keys = vec![fk("items", "order_id", "orders", "public", false)];

        a.tables = vec![orders.clone(), items.clone()];
        b.tables = vec![items, orders];

        assert_eq!(
            render_relationships(&a, &CrowsFootFormatter),
            render_relationships(&b, &CrowsFootFormatter)
        );
    }

    #[test]
    fn test_cross_schema_target_is_qualified() {
        let schema = schema_with_fks(vec![fk("orders", "coupon_id", "coupons", "billing", false)]);

        assert_eq!(
            render_relationships(&schema, &CrowsFootFormatter),
            "\tbilling.coupons ||--|{ orders\n"
        );
    }

    #[test]
    fn test_same_table_name_in_two_schemas_forms_two_groups() {
        let schema = schema_with_fks(vec![
            fk("accounts", "owner_id", "users", "auth", false),
            fk("accounts", "creator_id", "users", "public", false),
        ]);

        assert_eq!(group_by_target(&schema).len(), 2);
        assert_eq!(
            render_relationships(&schema, &CrowsFootFormatter),
            "\tusers ||--|{ accounts\n\n\tauth.users ||--|{ accounts\n"
        );
    }

    struct LabelFormatter;

    impl MultiplicityFormatter for LabelFormatter {
        fn format(&self, fk: &ForeignKey, schema_name: &str, _target: Option<&str>) -> String {
            format!("{}.{} --> {}", schema_name, fk.source_table, fk.target_table)
        }
    }

    #[test]
    fn test_custom_formatter() {
        let schema = schema_with_fks(vec![fk("orders", "user_id", "users", "public", false)]);
        let diagram = render_diagram_with(&[schema], &LabelFormatter);

        assert!(diagram.contains("\tpublic.orders --> users\n"));
    }
}

mod diagram_tests {
    use super::*;

    fn sample_schema() -> Schema {
        let mut schema = Schema::new("public");
        schema.enums.push(DbEnum {
            schema_name: "public".to_string(),
            name: "mood".to_string(),
            values: vec!["happy".to_string(), "sad".to_string()],
        });

        let users = table("users", vec![column("id", 1, "integer", &[])], &["id"]);
        let mut orders = table(
            "orders",
            vec![
                column("id", 1, "integer", &[]),
                column("user_id", 2, "integer", &[Constraint::Fk]),
            ],
            &["id"],
        );
        orders.foreign_keys = vec![fk("orders", "user_id", "users", "public", false)];
        schema.tables = vec![users, orders];
        schema
    }

    #[test]
    fn test_package_layout() {
        let expected = "package \"public\" {\n\
            \tenum \"mood\" {\n\t\thappy\n\t\tsad\n\t}\n\
            \n\
            \tentity \"users\" {\n\t\tid : integer\n\t}\n\
            \n\
            \tentity \"orders\" {\n\t\tid : integer\n\t\t--\n\t\tuser_id : integer <<FK>>\n\t}\n\
            \n\
            \tusers ||--|{ orders\n\
            }\n";

        assert_eq!(render_package(&sample_schema(), &CrowsFootFormatter), expected);
    }

    #[test]
    fn test_diagram_wraps_packages() {
        let diagram = render_diagram(&[sample_schema(), Schema::new("audit")]);

        assert!(diagram.starts_with("@startuml\nhide methods\nhide stereotypes\n\npackage \"public\" {\n"));
        assert!(diagram.ends_with("}\n\npackage \"audit\" {\n}\n\n@enduml\n"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let schemas = vec![sample_schema()];
        assert_eq!(render_diagram(&schemas), render_diagram(&schemas));
    }
}
