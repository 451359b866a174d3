//! Cancellation and sink sizing across a full read

#[cfg(test)]
mod streaming_tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use gremlin_reader::request::COMPONENT_TYPE_KEY;
    use gremlin_reader::sink::SinkError;
    use gremlin_reader::{
        BlockSink, CancellationFlag, Field, FieldType, MemoryGraph, ReadRequest, ReaderConfig,
        RequestDispatcher, Row, RowSink, TableName, TableSchema,
    };
    use serde_json::json;

    fn numbered_graph(count: i64) -> Arc<MemoryGraph> {
        let mut graph = MemoryGraph::new();
        for id in 0..count {
            graph.add_vertex(id, "item", json!({"seq": id}));
        }
        Arc::new(graph)
    }

    fn item_request() -> ReadRequest {
        let schema = TableSchema::new(vec![
            Field::new("id", FieldType::Int64),
            Field::new("seq", FieldType::Int64),
        ])
        .with_metadata(COMPONENT_TYPE_KEY, "vertex");
        ReadRequest::new(TableName::new("inventory", "item"), schema)
    }

    /// Sink that cancels the query once it has seen `limit` candidates
    struct CancellingSink {
        inner: BlockSink,
        flag: CancellationFlag,
        limit: u64,
    }

    impl RowSink for CancellingSink {
        fn write_row(&mut self, producer: &mut dyn FnMut() -> Option<Row>) -> Result<usize, SinkError> {
            let written = self.inner.write_row(producer)?;
            if self.inner.candidates() >= self.limit {
                self.flag.cancel();
            }
            Ok(written)
        }
    }

    #[tokio::test]
    async fn test_cancellation_stops_pulling() -> anyhow::Result<()> {
        let _ = env_logger::builder().is_test(true).try_init();
        let dispatcher = RequestDispatcher::new(numbered_graph(50));

        for limit in [1u64, 7, 49] {
            let flag = CancellationFlag::new();
            let mut sink = CancellingSink {
                inner: BlockSink::new(100),
                flag: flag.clone(),
                limit,
            };

            let summary = dispatcher
                .execute_query(&item_request(), &flag, &mut sink, &HashMap::new())
                .await?;

            assert!(summary.stats.cancelled);
            assert_eq!(summary.rows_pulled(), limit);
            assert!(sink.inner.rows_written() <= limit + 1);
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_cancelled_before_start_reads_nothing() -> anyhow::Result<()> {
        let dispatcher = RequestDispatcher::new(numbered_graph(5));
        let flag = CancellationFlag::new();
        flag.cancel();
        let mut sink = BlockSink::new(100);

        let summary = dispatcher
            .execute_query(&item_request(), &flag, &mut sink, &HashMap::new())
            .await?;

        assert!(summary.is_handled());
        assert_eq!(summary.rows_pulled(), 0);
        assert_eq!(sink.candidates(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_rows_keep_cursor_order_across_blocks() -> anyhow::Result<()> {
        let config = ReaderConfig {
            max_block_rows: 4,
            ..Default::default()
        };
        let dispatcher = RequestDispatcher::from_config(numbered_graph(10), &config);
        let mut sink = BlockSink::from_config(&config);

        dispatcher
            .execute_query(&item_request(), &CancellationFlag::new(), &mut sink, &HashMap::new())
            .await?;

        let blocks = sink.into_blocks();
        assert_eq!(blocks.len(), 3);
        assert!(blocks.iter().all(|block| block.rows.len() <= 4));

        let seqs: Vec<_> = blocks
            .iter()
            .flat_map(|block| block.rows.iter())
            .filter_map(|row| row.get("seq").and_then(|v| v.as_i64()))
            .collect();
        assert_eq!(seqs, (0..10).collect::<Vec<_>>());
        Ok(())
    }
}
