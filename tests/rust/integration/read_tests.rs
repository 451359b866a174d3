//! Partition reads for each table kind

#[cfg(test)]
mod read_tests {
    use std::collections::HashMap;

    use gremlin_reader::projector::CASE_INSENSITIVE_MATCH_OPTION;
    use gremlin_reader::{BlockSink, QueryKind, RequestDispatcher};
    use serde_json::{json, Value};

    use crate::fixtures::{air_routes, edge_request, vertex_request, view_request, with_label};

    fn running() -> bool {
        true
    }

    #[tokio::test]
    async fn test_vertex_scan_filters_by_label() -> anyhow::Result<()> {
        let dispatcher = RequestDispatcher::new(air_routes());
        let mut sink = BlockSink::new(100);

        let summary = dispatcher
            .execute_query(
                &vertex_request("airport", &["id", "runways"]),
                &running,
                &mut sink,
                &HashMap::new(),
            )
            .await?;

        assert_eq!(summary.query_kind, Some(QueryKind::Vertex));
        assert_eq!(summary.rows_written(), 3);
        let ids: Vec<_> = sink.rows().map(|row| row.get("id").cloned()).collect();
        assert_eq!(ids, vec![Some(json!("1")), Some(json!("2")), Some(json!("3"))]);

        // DFW has no runways property
        let runways: Vec<_> = sink.rows().map(|row| row.get("runways").cloned()).collect();
        assert_eq!(runways, vec![Some(json!(2)), Some(Value::Null), Some(json!(4))]);
        Ok(())
    }

    #[tokio::test]
    async fn test_label_override_keeps_store_casing() -> anyhow::Result<()> {
        let dispatcher = RequestDispatcher::new(air_routes());
        let mut sink = BlockSink::new(100);

        let request = with_label(vertex_request("person", &["id", "name"]), "Person");
        let summary = dispatcher
            .execute_query(&request, &running, &mut sink, &HashMap::new())
            .await?;

        assert_eq!(summary.rows_written(), 1);
        let row = sink.rows().next().expect("one row");
        assert_eq!(row.get("name"), Some(&json!("Ada")));
        Ok(())
    }

    #[tokio::test]
    async fn test_edge_scan_exposes_tokens() -> anyhow::Result<()> {
        let dispatcher = RequestDispatcher::new(air_routes());
        let mut sink = BlockSink::new(100);

        dispatcher
            .execute_query(
                &edge_request("route", &["id", "label", "out", "in", "dist"]),
                &running,
                &mut sink,
                &HashMap::new(),
            )
            .await?;

        let rows: Vec<_> = sink.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("id"), Some(&json!("10")));
        assert_eq!(rows[0].get("label"), Some(&json!("route")));
        assert_eq!(rows[0].get("out"), Some(&json!("1")));
        assert_eq!(rows[0].get("in"), Some(&json!("2")));
        assert_eq!(rows[1].get("dist"), Some(&json!(1235)));
        Ok(())
    }

    #[tokio::test]
    async fn test_view_query_single_result() -> anyhow::Result<()> {
        let dispatcher = RequestDispatcher::new(air_routes());
        let mut sink = BlockSink::new(100);

        let summary = dispatcher
            .execute_query(
                &view_request("first", "g.V().limit(1)", &["count"]),
                &running,
                &mut sink,
                &HashMap::new(),
            )
            .await?;

        assert_eq!(summary.query_kind, Some(QueryKind::View));
        assert_eq!(summary.rows_written(), 1);
        assert_eq!(sink.rows().next().and_then(|row| row.get("count")), Some(&Value::Null));
        Ok(())
    }

    #[tokio::test]
    async fn test_view_query_projection() -> anyhow::Result<()> {
        let dispatcher = RequestDispatcher::new(air_routes());
        let mut sink = BlockSink::new(100);

        dispatcher
            .execute_query(
                &view_request(
                    "airport_cities",
                    "g.V().hasLabel('airport').project('code','city').by('code').by('city')",
                    &["city", "code"],
                ),
                &running,
                &mut sink,
                &HashMap::new(),
            )
            .await?;

        let cities: Vec<_> = sink
            .rows()
            .filter_map(|row| row.get("city").and_then(Value::as_str).map(str::to_string))
            .collect();
        assert_eq!(cities, vec!["Austin", "Dallas", "Los Angeles"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_case_insensitive_option_passes_through() -> anyhow::Result<()> {
        let dispatcher = RequestDispatcher::new(air_routes());
        let request = vertex_request("airport", &["CODE"]);

        let mut lenient = BlockSink::new(100);
        dispatcher
            .execute_query(&request, &running, &mut lenient, &HashMap::new())
            .await?;
        assert_eq!(lenient.rows().next().and_then(|row| row.get("CODE")), Some(&json!("AUS")));

        let exact = HashMap::from([(CASE_INSENSITIVE_MATCH_OPTION.to_string(), "false".to_string())]);
        let mut strict = BlockSink::new(100);
        dispatcher
            .execute_query(&request, &running, &mut strict, &exact)
            .await?;
        assert_eq!(strict.rows().next().and_then(|row| row.get("CODE")), Some(&Value::Null));
        Ok(())
    }

    #[tokio::test]
    async fn test_rerun_yields_same_count() -> anyhow::Result<()> {
        let dispatcher = RequestDispatcher::new(air_routes());
        let request = edge_request("route", &["id"]);

        let mut counts = Vec::new();
        for _ in 0..2 {
            let mut sink = BlockSink::new(100);
            let summary = dispatcher
                .execute_query(&request, &running, &mut sink, &HashMap::new())
                .await?;
            counts.push(summary.rows_written());
        }
        assert_eq!(counts, vec![2, 2]);
        Ok(())
    }

    #[tokio::test]
    async fn test_no_matching_elements() -> anyhow::Result<()> {
        let dispatcher = RequestDispatcher::new(air_routes());

        for request in [
            vertex_request("runway", &["id"]),
            edge_request("flies_to", &["id"]),
            view_request("empty", "g.V().hasLabel('nothing')", &["id"]),
        ] {
            let mut sink = BlockSink::new(100);
            let summary = dispatcher
                .execute_query(&request, &running, &mut sink, &HashMap::new())
                .await?;
            assert!(summary.is_handled());
            assert_eq!(summary.rows_pulled(), 0);
            assert_eq!(sink.candidates(), 0);
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_view_query_is_a_store_error() {
        let dispatcher = RequestDispatcher::new(air_routes());
        let mut sink = BlockSink::new(100);

        let result = dispatcher
            .execute_query(
                &view_request("bad", "g.V().outE(", &["id"]),
                &running,
                &mut sink,
                &HashMap::new(),
            )
            .await;
        assert!(matches!(result, Err(gremlin_reader::ReadError::Store(_))));
    }
}
