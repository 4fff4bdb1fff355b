//! Unit tests for type resolution and key enrichment.

use schema_uml::catalog::{ColumnRow, ForeignKeyRow, PrimaryKeyRow};
use schema_uml::error::BuildError;
use schema_uml::model::{Constraint, DbEnum, TypeKey, UdtMap, UdtReference, ColumnKey};
use schema_uml::resolve::{
    build_enum_map, build_type_map, collate_primary_key, column_constraints, enrich_foreign_keys,
    TypeResolver,
};

fn row(name: &str, ordinal: u32, data_type: &str) -> ColumnRow {
    ColumnRow {
        name: name.to_string(),
        ordinal,
        data_type: data_type.to_string(),
        ..ColumnRow::default()
    }
}

fn db_enum(schema: &str, name: &str) -> DbEnum {
    DbEnum {
        schema_name: schema.to_string(),
        name: name.to_string(),
        values: vec!["a".to_string(), "b".to_string()],
    }
}

mod type_tests {
    use super::*;

    #[test]
    fn test_enum_in_same_schema_is_bare() {
        let mut udts = UdtMap::new();
        udts.insert(
            ColumnKey::new("orders", "status"),
            UdtReference::new("public", "order_status"),
        );
        let enums = build_enum_map(&[db_enum("public", "order_status")]).unwrap();
        let resolver = TypeResolver::new("public", &udts, &enums);

        assert_eq!(
            resolver.resolve_type("orders", &row("status", 2, "USER-DEFINED")),
            "order_status"
        );
    }

    #[test]
    fn test_mapping_is_per_relation() {
        let mut udts = UdtMap::new();
        udts.insert(
            ColumnKey::new("orders", "status"),
            UdtReference::new("public", "order_status"),
        );
        let enums = build_enum_map(&[]).unwrap();
        let resolver = TypeResolver::new("public", &udts, &enums);

        assert_eq!(
            resolver.resolve_type("invoices", &row("status", 2, "USER-DEFINED")),
            "USER-DEFINED"
        );
    }

    #[test]
    fn test_composite_from_other_schema_is_qualified() {
        let mut udts = UdtMap::new();
        udts.insert(
            ColumnKey::new("users", "home"),
            UdtReference::new("common", "address"),
        );
        let enums = build_enum_map(&[]).unwrap();
        let resolver = TypeResolver::new("public", &udts, &enums);

        let column = resolver.resolve_column("users", &row("home", 3, "USER-DEFINED"));
        assert_eq!(column.data_type, "common.address");
        assert_eq!(column.ordinal, 3);
    }

    #[test]
    fn test_same_name_in_two_schemas_is_not_a_duplicate() {
        let map = build_enum_map(&[db_enum("public", "mood"), db_enum("audit", "mood")]).unwrap();
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_duplicate_key_reports_kind_and_key() {
        let err = build_type_map("composite type", vec!["a", "a"], |s| {
            TypeKey::new("public", s)
        })
        .unwrap_err();

        assert_eq!(err.to_string(), "duplicate composite type 'public.a' in catalog");
    }

    #[test]
    fn test_column_flags_become_constraints() {
        let mut r = row("id", 1, "integer");
        r.default = true;
        r.auto_increment = true;
        r.nullable = true;

        let tags = column_constraints(&r).ordered();
        assert_eq!(
            tags,
            vec![Constraint::AutoIncrement, Constraint::Default, Constraint::Nullable]
        );
    }
}

mod key_tests {
    use super::*;

    fn fk_row(column: &str, target: &str) -> ForeignKeyRow {
        ForeignKeyRow {
            constraint_name: format!("{}_fkey", column),
            source_column: column.to_string(),
            target_table: target.to_string(),
            target_column: "id".to_string(),
            target_schema: None,
        }
    }

    #[test]
    fn test_conflicting_pk_names() {
        let rows = vec![
            PrimaryKeyRow {
                constraint_name: "a_pkey".to_string(),
                column_name: "id".to_string(),
                ordinal: 1,
            },
            PrimaryKeyRow {
                constraint_name: "b_pkey".to_string(),
                column_name: "code".to_string(),
                ordinal: 2,
            },
        ];

        let err = collate_primary_key("items", &rows).unwrap_err();
        assert!(matches!(err, BuildError::ConflictingPrimaryKey { .. }));
    }

    #[test]
    fn test_fk_tag_added_once_for_two_keys_on_one_column() {
        let udts = UdtMap::new();
        let enums = build_enum_map(&[]).unwrap();
        let resolver = TypeResolver::new("public", &udts, &enums);
        let mut columns = resolver.resolve_columns("links", &[row("ref_id", 1, "integer")]);

        let fks = enrich_foreign_keys(
            "public",
            "links",
            &mut columns,
            &[fk_row("ref_id", "pages"), fk_row("ref_id", "posts")],
        )
        .unwrap();

        assert_eq!(fks.len(), 2);
        assert_eq!(columns[0].constraints.len(), 1);
        assert!(columns[0].constraints.contains(Constraint::Fk));
    }

    #[test]
    fn test_nullable_fk_follows_column() {
        let mut nullable = row("parent_id", 2, "integer");
        nullable.nullable = true;

        let udts = UdtMap::new();
        let enums = build_enum_map(&[]).unwrap();
        let resolver = TypeResolver::new("public", &udts, &enums);
        let mut columns = resolver.resolve_columns("nodes", &[row("id", 1, "integer"), nullable]);

        let fks =
            enrich_foreign_keys("public", "nodes", &mut columns, &[fk_row("parent_id", "nodes")])
                .unwrap();

        assert!(fks[0].nullable);
        assert_eq!(fks[0].referenced_schema, "public");
        assert_eq!(
            columns[1].constraints.ordered(),
            vec![Constraint::Fk, Constraint::Nullable]
        );
    }
}
