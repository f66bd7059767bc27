//! Batch key shape equivalence across the four accepted inputs.

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use dynaquery_core::{BatchKeys, KeySchema, LogicalQuery, Plan, builder};
    use dynaquery_model::Value;
    use serde_json::json;

    fn orders_schema() -> KeySchema {
        KeySchema::composite("customer_id", "placed_at")
    }

    #[test]
    fn test_should_materialize_same_keys_from_all_composite_shapes() {
        let schema = orders_schema();
        let tuples = BatchKeys::Tuples(vec![
            vec!["c1".into(), Value::Int(1)],
            vec!["c2".into(), Value::Int(2)],
        ]);
        let maps = BatchKeys::Maps(vec![
            BTreeMap::from([
                ("customer_id".to_owned(), "c1".into()),
                ("placed_at".to_owned(), Value::Int(1)),
            ]),
            BTreeMap::from([
                ("customer_id".to_owned(), "c2".into()),
                ("placed_at".to_owned(), Value::Int(2)),
            ]),
        ]);
        let columns = BatchKeys::Columns(vec![
            ("customer_id".to_owned(), vec!["c1".into(), "c2".into()]),
            ("placed_at".to_owned(), vec![Value::Int(1), Value::Int(2)]),
        ]);

        let expected = tuples.materialize(&schema).unwrap();
        assert_eq!(maps.materialize(&schema).unwrap(), expected);
        assert_eq!(columns.materialize(&schema).unwrap(), expected);
    }

    #[test]
    fn test_should_build_batch_get_from_explicit_keys() {
        let query = LogicalQuery::new("Orders");
        let plan = Plan {
            kind: dynaquery_core::OperationKind::BatchGet,
            schema: orders_schema(),
        };
        let keys = BatchKeys::Tuples(vec![vec!["c1".into(), Value::Int(1)]]);
        let request = builder::build_batch_get_keys(&query, &plan, &keys).unwrap();
        assert_eq!(
            request.argument,
            json!({
                "RequestItems": {
                    "Orders": {
                        "Keys": [{
                            "customer_id": {"S": "c1"},
                            "placed_at": {"N": "1"}
                        }]
                    }
                }
            })
        );
    }

    #[test]
    fn test_should_preserve_input_order_in_materialized_keys() {
        let schema = KeySchema::hash_only("id");
        let keys = BatchKeys::Scalars(vec!["z".into(), "a".into(), "m".into()])
            .materialize(&schema)
            .unwrap();
        let ids: Vec<_> = keys
            .iter()
            .map(|k| k["id"].as_s().map(str::to_owned))
            .collect();
        assert_eq!(
            ids,
            vec![
                Some("z".to_owned()),
                Some("a".to_owned()),
                Some("m".to_owned())
            ]
        );
    }
}
