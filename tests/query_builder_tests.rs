use member_search::query_builder::{
    Aggregate, CaseBuilder, Column, Join, JoinType, Pagination, QueryBuilder, SelectExpr,
    Subquery,
};
use member_search::search::MemberSearchCondition;
use member_search::store::MemberQuery;
use member_search::MemberTeamRow;

#[test]
fn test_search_condition_renders_only_present_fields() {
    let condition = MemberSearchCondition::new()
        .with_team_name("teamB")
        .with_age_goe(31)
        .with_age_loe(35);

    let query = QueryBuilder::new("members m")
        .select(MemberTeamRow::projection())
        .join(Join::team(JoinType::Left))
        .where_all(condition.where_parts());

    assert_eq!(
        query.build_sql(),
        "SELECT m.id AS \"member_id\", m.username AS \"username\", m.age AS \"age\", \
         m.team_id AS \"member_team_id\", t.id AS \"team_id\", t.name AS \"team_name\" \
         FROM members m LEFT JOIN teams t ON m.team_id = t.id \
         WHERE t.name = $1 AND m.age >= $2 AND m.age <= $3"
    );
}

#[test]
fn test_both_strategies_render_equivalent_where_clauses() {
    let condition = MemberSearchCondition::new()
        .with_username("member1")
        .with_age_loe(40);

    let by_list = QueryBuilder::new("members m").where_all(condition.where_parts());
    let by_builder = QueryBuilder::new("members m").where_condition(condition.to_predicate());

    assert_eq!(
        by_list.build_sql(),
        "SELECT * FROM members m WHERE m.username = $1 AND m.age <= $2"
    );
    assert_eq!(
        by_builder.build_sql(),
        "SELECT * FROM members m WHERE (m.username = $1 AND m.age <= $2)"
    );
}

#[test]
fn test_empty_condition_has_no_where_clause() {
    let condition = MemberSearchCondition::new();
    let by_list = QueryBuilder::new("members m").where_all(condition.where_parts());
    let by_builder = QueryBuilder::new("members m").where_condition(condition.to_predicate());

    assert_eq!(by_list.build_sql(), "SELECT * FROM members m");
    assert_eq!(by_builder.build_sql(), "SELECT * FROM members m");
}

#[test]
fn test_inner_join_query_building() {
    let query = QueryBuilder::new("members m")
        .inner_join("teams t", "m.team_id = t.id")
        .where_condition(Column::TeamName.eq("teamA"));

    let sql = query.build_sql();
    assert!(sql.contains("INNER JOIN teams t ON m.team_id = t.id"));
    assert!(sql.ends_with("WHERE t.name = $1"));
}

#[test]
fn test_subquery_rendering() {
    let query = QueryBuilder::new("members m").where_condition(
        Column::Age.eq_subquery(Subquery::select_aggregate(Aggregate::Max, Column::Age)),
    );

    assert_eq!(
        query.build_sql(),
        "SELECT * FROM members m WHERE m.age = (SELECT MAX(sub.age) FROM members sub \
         LEFT JOIN teams sub_t ON sub.team_id = sub_t.id)"
    );
}

#[test]
fn test_case_constant_and_concat_in_select() {
    let case = CaseBuilder::new()
        .when(Column::Age.between(0, 20))
        .then("0~20")
        .otherwise("other");
    let query = QueryBuilder::new("members m").select([
        SelectExpr::from(case),
        SelectExpr::constant("A"),
        Column::Username.expr().concat("_").concat(Column::Age),
    ]);

    assert_eq!(
        query.build_sql(),
        "SELECT CASE WHEN m.age BETWEEN $1 AND $2 THEN $3 ELSE $4 END, $5, \
         (m.username || $6 || CAST(m.age AS TEXT)) FROM members m"
    );
}

#[test]
fn test_member_query_paging_and_null_ordering() {
    let query = MemberQuery::new()
        .filter(Column::Age.eq(100))
        .order_by(Column::Age.desc())
        .order_by(Column::Username.asc().nulls_last())
        .offset(1)
        .limit(2);

    let sql = query
        .to_query_builder(&[Column::Username.expr()])
        .build_sql();
    assert!(sql.ends_with(
        "WHERE m.age = $1 ORDER BY m.age DESC, m.username ASC NULLS LAST, m.id ASC LIMIT 2 OFFSET 1"
    ));
}

#[test]
fn test_paginate_replaces_window() {
    let query = QueryBuilder::new("members m")
        .limit(5)
        .paginate(Pagination::limit_offset(10, 30));
    assert_eq!(query.build_sql(), "SELECT * FROM members m LIMIT 10 OFFSET 30");
}

#[test]
fn test_order_by_aliased_expression_renders_without_alias() {
    let query = QueryBuilder::new("members m")
        .select([Column::Username.expr().alias("name")])
        .order_by(Column::Username.expr().alias("name").asc());
    assert_eq!(
        query.build_sql(),
        "SELECT m.username AS \"name\" FROM members m ORDER BY m.username ASC"
    );
}
