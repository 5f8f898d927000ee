//! Filter compilation and splicing into templates.

mod common;

use oxide_sqlgen_core::dialect::DialectKind;
use oxide_sqlgen_core::error::{ErrorKind, SqlGenError};
use oxide_sqlgen_core::filter::{Filter, Operator};
use oxide_sqlgen_core::value::SqlValue;

use common::{aliased, person_table, table};

#[test]
fn test_person_select_end_to_end() {
    let table = person_table(DialectKind::Sqlite);
    let filter = Filter::new()
        .and("Age", Operator::GreaterThan, 30)
        .or("Name", Operator::Equal, "P1")
        .compile(&table)
        .unwrap();

    assert_eq!(filter.where_clause(), "(Age > @p0) OR (Name = @p1)");

    let statement = table.templates().select().splice(&filter).unwrap();
    assert_eq!(
        statement.sql,
        "SELECT\n    [Person].[Id] AS 'Id',\n    [Person].[Name] AS 'Name',\n    [Person].[Age] AS 'Age'\nFROM [Person]\nWHERE\n    (Age > @p0) OR (Name = @p1);"
    );
    let params: Vec<(&str, &SqlValue)> = statement.parameters.iter().collect();
    assert_eq!(
        params,
        [
            ("@p0", &SqlValue::Int(30)),
            ("@p1", &SqlValue::Text(String::from("P1"))),
        ]
    );
}

#[test]
fn test_chain_is_left_associative() {
    let table = person_table(DialectKind::Sqlite);
    let compiled = Filter::where_("Age", Operator::GreaterThanOrEqual, 18)
        .or("Age", Operator::LessThan, 5)
        .and("Name", Operator::NotEqual, "Bob")
        .compile(&table)
        .unwrap();
    assert_eq!(
        compiled.where_clause(),
        "((Age >= @p0) OR (Age < @p1)) AND (Name <> @p2)"
    );
}

#[test]
fn test_every_comparison_operator() {
    let table = person_table(DialectKind::SqlServer);
    let compiled = Filter::where_("Age", Operator::Equal, 1)
        .and("Age", Operator::NotEqual, 2)
        .and("Age", Operator::GreaterThan, 3)
        .and("Age", Operator::GreaterThanOrEqual, 4)
        .and("Age", Operator::LessThan, 5)
        .and("Age", Operator::LessThanOrEqual, 6)
        .compile(&table)
        .unwrap();
    assert_eq!(
        compiled.where_clause(),
        "(((((Age = @p0) AND (Age <> @p1)) AND (Age > @p2)) AND (Age >= @p3)) AND (Age < @p4)) AND (Age <= @p5)"
    );
}

#[test]
fn test_empty_sets_inside_chain() {
    let table = person_table(DialectKind::Sqlite);
    let compiled = Filter::where_("Name", Operator::Equal, "Ann")
        .or_in("Age", Vec::<i64>::new())
        .and_not_in("Id", Vec::<i64>::new())
        .compile(&table)
        .unwrap();
    assert_eq!(
        compiled.where_clause(),
        "((Name = @p0) OR (1=0)) AND (1=1)"
    );
    assert_eq!(compiled.parameters().len(), 1);
}

#[test]
fn test_in_numbering_continues_across_predicates() {
    let table = person_table(DialectKind::Sqlite);
    let compiled = Filter::new()
        .and_in("Id", [10_i64, 11, 12])
        .or("Name", Operator::Equal, "Ann")
        .compile(&table)
        .unwrap();
    assert_eq!(
        compiled.where_clause(),
        "(Id IN (@p0,@p1,@p2)) OR (Name = @p3)"
    );
}

#[test]
fn test_alias_resolves_by_field_or_column() {
    let table = table(&aliased(), DialectKind::Sqlite);
    let by_field = Filter::where_("SomeName", Operator::Equal, "Ann")
        .compile(&table)
        .unwrap();
    let by_column = Filter::where_("name", Operator::Equal, "Ann")
        .compile(&table)
        .unwrap();
    assert_eq!(by_field.where_clause(), "Name = @p0");
    assert_eq!(by_field, by_column);
}

#[test]
fn test_unknown_field_names_model_and_field() {
    let table = person_table(DialectKind::Sqlite);
    let err = Filter::where_("Age", Operator::Equal, 1)
        .and("Height", Operator::GreaterThan, 180)
        .compile(&table)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownField);
    assert_eq!(
        err,
        SqlGenError::UnknownField {
            model: String::from("Person"),
            field: String::from("Height"),
        }
    );
}

#[test]
fn test_update_and_delete_accept_filters() {
    let table = person_table(DialectKind::Sqlite);
    let compiled = Filter::where_("Age", Operator::LessThan, 18)
        .compile(&table)
        .unwrap();

    let delete = table.templates().delete().splice(&compiled).unwrap();
    assert_eq!(delete.sql, "DELETE FROM [Person] WHERE Age < @p0;");

    let update = table
        .templates()
        .update_all()
        .unwrap()
        .splice(&compiled)
        .unwrap();
    assert_eq!(
        update.sql,
        "UPDATE [Person]\nSET\n    [Id] = @Id,\n    [Name] = @Name,\n    [Age] = @Age\nWHERE\n    Age < @p0;"
    );
    assert_eq!(update.parameter_names, ["@Id", "@Name", "@Age"]);
    assert_eq!(update.parameters.names().collect::<Vec<_>>(), ["@p0"]);
}

#[test]
fn test_update_by_identity_has_no_filter_slot() {
    let table = person_table(DialectKind::Sqlite);
    let compiled = Filter::new().compile(&table).unwrap();
    let err = table
        .templates()
        .update_by_identity()
        .unwrap()
        .splice(&compiled)
        .unwrap_err();
    assert_eq!(
        err,
        SqlGenError::NoFilterSlot {
            template: "update_by_identity"
        }
    );
}
