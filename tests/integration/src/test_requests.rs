//! Golden argument-document scenarios: plan then build, asserting the
//! exact wire documents.

#[cfg(test)]
mod tests {
    use dynaquery_core::{Condition, LogicalQuery, Planner, builder};
    use dynaquery_model::Operation;
    use serde_json::json;

    use crate::{FakeSchemaSource, customers_table, orders_table};

    fn planner() -> Planner<FakeSchemaSource> {
        Planner::new(FakeSchemaSource::new(vec![
            customers_table(),
            orders_table(),
        ]))
    }

    fn plan_and_build(query: &LogicalQuery) -> (Operation, serde_json::Value) {
        let plan = planner().plan(query).unwrap();
        let request = builder::build(query, &plan).unwrap();
        (request.operation, request.argument)
    }

    #[test]
    fn test_should_emit_exact_get_item_document() {
        let query = LogicalQuery::new("Customers").condition(Condition::eq("id", "abc"));
        let (operation, argument) = plan_and_build(&query);
        assert_eq!(operation, Operation::GetItem);
        assert_eq!(
            argument,
            json!({"TableName": "Customers", "Key": {"id": {"S": "abc"}}})
        );
    }

    #[test]
    fn test_should_emit_exact_batch_get_document() {
        let query = LogicalQuery::new("Customers")
            .condition(Condition::is_in("id", vec!["abc".into(), "def".into()]));
        let (operation, argument) = plan_and_build(&query);
        assert_eq!(operation, Operation::BatchGetItem);
        assert_eq!(
            argument,
            json!({
                "RequestItems": {
                    "Customers": {
                        "Keys": [{"id": {"S": "abc"}}, {"id": {"S": "def"}}]
                    }
                }
            })
        );
    }

    #[test]
    fn test_should_emit_exact_scan_document_for_non_key_filter() {
        let query = LogicalQuery::new("Customers").condition(Condition::eq("name", "bob"));
        let (operation, argument) = plan_and_build(&query);
        assert_eq!(operation, Operation::Scan);
        assert_eq!(
            argument,
            json!({
                "TableName": "Customers",
                "FilterExpression": "name=:dqp0",
                "ExpressionAttributeValues": {":dqp0": {"S": "bob"}}
            })
        );
    }

    #[test]
    fn test_should_number_placeholders_by_pair_order() {
        let query = LogicalQuery::new("Customers").where_all(vec![
            ("a".to_owned(), 1i64.into()),
            ("b".to_owned(), 2i64.into()),
        ]);
        let (_, argument) = plan_and_build(&query);
        assert_eq!(
            argument["FilterExpression"],
            json!("(a=:dqp0) AND (b=:dqp1)")
        );
        assert_eq!(
            argument["ExpressionAttributeValues"],
            json!({":dqp0": {"N": "1"}, ":dqp1": {"N": "2"}})
        );
    }

    #[test]
    fn test_should_emit_key_query_with_filter_split() {
        let query = LogicalQuery::new("Orders")
            .condition(Condition::And(vec![
                Condition::eq("customer_id", "c1"),
                Condition::compare(">=", "placed_at", 100i64).unwrap(),
                Condition::eq("status", "open"),
            ]))
            .order(dynaquery_core::OrderDirection::Ascending)
            .limit(10);
        let (operation, argument) = plan_and_build(&query);
        assert_eq!(operation, Operation::Query);
        assert_eq!(
            argument,
            json!({
                "TableName": "Orders",
                "KeyConditionExpression": "(customer_id=:dqp0) AND (placed_at>=:dqp1)",
                "FilterExpression": "status=:dqp2",
                "ExpressionAttributeValues": {
                    ":dqp0": {"S": "c1"},
                    ":dqp1": {"N": "100"},
                    ":dqp2": {"S": "open"}
                },
                "ScanIndexForward": true,
                "Limit": 10
            })
        );
    }

    #[test]
    fn test_should_reject_ordering_when_scan_is_forced() {
        let query = LogicalQuery::new("Customers")
            .condition(Condition::eq("name", "bob"))
            .order(dynaquery_core::OrderDirection::Ascending);
        let plan = planner().plan(&query).unwrap();
        let err = builder::build(&query, &plan).unwrap_err();
        assert!(matches!(err, dynaquery_core::QueryError::UnsupportedOnScan));
    }

    #[test]
    fn test_should_emit_unsatisfiable_filter_for_empty_membership() {
        let query =
            LogicalQuery::new("Customers").condition(Condition::is_in("name", vec![]));
        let (operation, argument) = plan_and_build(&query);
        assert_eq!(operation, Operation::Scan);
        assert_eq!(argument["FilterExpression"], json!("0=1"));
        assert!(argument.get("ExpressionAttributeValues").is_none());
    }
}
