//! Whole-pipeline scenarios: plan, build, execute, normalize.

#[cfg(test)]
mod tests {
    use dynaquery_core::{
        Condition, LogicalQuery, QueryRunner, RESPONSE_KEY, command,
    };
    use dynaquery_model::{Operation, Value};
    use serde_json::json;

    use crate::{FakeSchemaSource, RecordingExecutor, customers_table, orders_table};

    fn runner(response: serde_json::Value) -> QueryRunner<FakeSchemaSource, RecordingExecutor> {
        QueryRunner::new(
            FakeSchemaSource::new(vec![customers_table(), orders_table()]),
            RecordingExecutor::new(response),
        )
    }

    #[test]
    fn test_should_run_point_lookup_and_return_one_row() {
        let runner = runner(json!({"Item": {"id": {"S": "abc"}, "name": {"S": "bob"}}}));
        let query = LogicalQuery::new("Customers").condition(Condition::eq("id", "abc"));

        let page = runner.run(&query).unwrap();
        assert_eq!(page.count, 1);
        assert_eq!(page.rows[0]["name"], Value::from("bob"));
    }

    #[test]
    fn test_should_run_batch_lookup_and_keep_response_order() {
        let runner = runner(json!({
            "Responses": {
                "Customers": [{"id": {"S": "abc"}}, {"id": {"S": "def"}}]
            }
        }));
        let query = LogicalQuery::new("Customers")
            .condition(Condition::is_in("id", vec!["abc".into(), "def".into()]));

        let page = runner.run(&query).unwrap();
        assert_eq!(page.count, 2);
        assert_eq!(page.rows[0]["id"], Value::from("abc"));
        assert_eq!(page.rows[1]["id"], Value::from("def"));
    }

    #[test]
    fn test_should_fold_scan_metadata_into_each_row() {
        let runner = runner(json!({
            "Items": [{"id": {"S": "a"}}, {"id": {"S": "b"}}],
            "Count": 2,
            "ScannedCount": 7,
            "LastEvaluatedKey": {"id": {"S": "b"}}
        }))
        .fold_metadata(true);
        let query = LogicalQuery::new("Customers").condition(Condition::eq("name", "bob"));

        let page = runner.run(&query).unwrap();
        assert_eq!(page.scanned_count, Some(7));
        for row in &page.rows {
            let Value::Map(meta) = &row[RESPONSE_KEY] else {
                panic!("expected folded metadata");
            };
            assert_eq!(meta["Count"], Value::Int(2));
            assert_eq!(meta["ScannedCount"], Value::Int(7));
        }
        let Some(Value::Map(cursor)) = page.last_evaluated_key else {
            panic!("expected continuation cursor");
        };
        assert_eq!(cursor["id"], Value::from("b"));
    }

    #[test]
    fn test_should_resume_scan_from_previous_cursor() {
        let runner = runner(json!({"Items": [], "Count": 0}));
        let first_cursor = Value::Map(
            [("id".to_owned(), Value::from("b"))].into_iter().collect(),
        );
        let query = LogicalQuery::new("Customers")
            .condition(Condition::eq("name", "bob"))
            .start_after(first_cursor);

        runner.run(&query).unwrap();
        let calls = runner_calls(&runner);
        assert_eq!(calls[0].0, Operation::Scan);
        assert_eq!(calls[0].1["ExclusiveStartKey"], json!({"id": {"S": "b"}}));
    }

    #[test]
    fn test_should_execute_write_commands_through_the_executor() {
        let executor = RecordingExecutor::new(json!({}));
        let requests = command::batch_put(
            "Customers",
            &[
                [("id".to_owned(), Value::from("a"))].into_iter().collect(),
                [("id".to_owned(), Value::from("b"))].into_iter().collect(),
            ],
        )
        .unwrap();
        for request in &requests {
            dynaquery_core::Executor::execute(&executor, request.operation, &request.argument)
                .unwrap();
        }
        let calls = executor.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, Operation::BatchWriteItem);
        assert_eq!(
            calls[0].1["RequestItems"]["Customers"][0]["PutRequest"]["Item"],
            json!({"id": {"S": "a"}})
        );
    }

    fn runner_calls(
        runner: &QueryRunner<FakeSchemaSource, RecordingExecutor>,
    ) -> Vec<(Operation, serde_json::Value)> {
        runner.executor().calls()
    }
}
