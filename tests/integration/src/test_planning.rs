//! Operation-selection scenarios across whole table schemas.

#[cfg(test)]
mod tests {
    use dynaquery_core::{Condition, LogicalQuery, OperationKind, OrderDirection, Planner};
    use dynaquery_model::Value;

    use crate::{FakeSchemaSource, customers_table, orders_table};

    fn planner() -> Planner<FakeSchemaSource> {
        Planner::new(FakeSchemaSource::new(vec![
            customers_table(),
            orders_table(),
        ]))
    }

    #[test]
    fn test_should_choose_single_get_for_exact_key_equality() {
        let query = LogicalQuery::new("Customers").condition(Condition::eq("id", "x"));
        assert_eq!(planner().plan(&query).unwrap().kind, OperationKind::SingleGet);
    }

    #[test]
    fn test_should_choose_batch_get_for_key_membership() {
        let query = LogicalQuery::new("Customers")
            .condition(Condition::is_in("id", vec!["x".into(), "y".into()]));
        assert_eq!(planner().plan(&query).unwrap().kind, OperationKind::BatchGet);
    }

    #[test]
    fn test_should_choose_scan_when_non_key_attribute_joins_the_and() {
        let query = LogicalQuery::new("Customers").condition(Condition::And(vec![
            Condition::eq("id", "x"),
            Condition::eq("name", "bob"),
        ]));
        assert_eq!(planner().plan(&query).unwrap().kind, OperationKind::Scan);
    }

    #[test]
    fn test_should_choose_scan_for_partial_composite_key() {
        // Only the partition key is constrained, so the key is not exact.
        let query = LogicalQuery::new("Orders").condition(Condition::eq("customer_id", "c1"));
        assert_eq!(planner().plan(&query).unwrap().kind, OperationKind::Scan);
    }

    #[test]
    fn test_should_choose_key_query_for_ordered_range_on_sort_key() {
        let query = LogicalQuery::new("Orders")
            .condition(Condition::And(vec![
                Condition::eq("customer_id", "c1"),
                Condition::between("placed_at", 100i64, 200i64),
            ]))
            .order(OrderDirection::Ascending);
        assert_eq!(planner().plan(&query).unwrap().kind, OperationKind::KeyQuery);
    }

    #[test]
    fn test_should_choose_batch_get_for_composite_tuples() {
        let query = LogicalQuery::new("Orders").condition(Condition::InComposite {
            columns: vec!["customer_id".to_owned(), "placed_at".to_owned()],
            tuples: vec![
                vec!["c1".into(), Value::Int(1)],
                vec!["c2".into(), Value::Int(2)],
            ],
        });
        assert_eq!(planner().plan(&query).unwrap().kind, OperationKind::BatchGet);
    }

    #[test]
    fn test_should_fail_planning_against_unknown_index() {
        let query = LogicalQuery::new("Customers")
            .condition(Condition::eq("id", "x"))
            .index("no-such-index");
        let err = planner().plan(&query).unwrap_err();
        assert!(matches!(
            err,
            dynaquery_core::QueryError::IndexNotFound { .. }
        ));
    }
}
