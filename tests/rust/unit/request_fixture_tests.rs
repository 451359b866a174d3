//! Read requests parsed from YAML fixtures, the way catalogs hand them over

#[cfg(test)]
mod request_fixture_tests {
    use gremlin_reader::projector::{ProjectorOptions, RecordShape, RowProjector, SourceRecord};
    use gremlin_reader::request::RequestError;
    use gremlin_reader::traversal::{edge_scan, vertex_scan};
    use gremlin_reader::{FieldType, QueryKind, ReadRequest};
    use serde_json::json;

    const VERTEX_TABLE: &str = r#"
query_id: q-17
table_name:
  schema_name: air
  table_name: airport
split_id: split-0
schema:
  fields:
    - name: id
    - name: code
      type: utf8
    - name: runways
      type: int32
    - name: aliases
      type: list
  metadata:
    componenttype: Vertex
    glabel: Airport
constraints:
  code: {equals: "AUS"}
"#;

    #[test]
    fn test_vertex_table_fixture() {
        let request: ReadRequest = serde_yaml::from_str(VERTEX_TABLE).unwrap();

        assert_eq!(request.query_id, "q-17");
        assert_eq!(request.split_id.as_deref(), Some("split-0"));
        assert_eq!(request.schema.query_kind(), Ok(QueryKind::Vertex));
        assert_eq!(request.effective_label(), "Airport");
        assert_eq!(request.schema.fields[0].field_type, FieldType::Utf8);
        assert_eq!(request.schema.fields[2].field_type, FieldType::Int32);
        assert_eq!(request.constraints["code"], json!({"equals": "AUS"}));
        assert_eq!(
            vertex_scan(request.effective_label()).to_gremlin(),
            "g.V().hasLabel('Airport').valueMap().with(WithOptions.tokens)"
        );
    }

    #[test]
    fn test_fixture_projection() {
        let request: ReadRequest = serde_yaml::from_str(VERTEX_TABLE).unwrap();
        let projector = RowProjector::build(
            &request.schema.fields,
            RecordShape::from(request.schema.query_kind().unwrap()),
            ProjectorOptions::default(),
        );

        let record = SourceRecord::from_value(
            projector.shape(),
            json!({"id": "a1", "label": "Airport", "code": ["AUS"], "aliases": ["ABIA", "Bergstrom"]}),
        );
        let row = projector.project(&record).unwrap();

        assert_eq!(row.get("code"), Some(&json!("AUS")));
        assert_eq!(row.get("runways"), Some(&serde_json::Value::Null));
        assert_eq!(row.get("aliases"), Some(&json!(["ABIA", "Bergstrom"])));
    }

    #[test]
    fn test_missing_query_id_is_generated() {
        let yaml = r#"
table_name: {schema_name: air, table_name: route}
schema:
  fields: [{name: id}]
  metadata: {componenttype: edge}
"#;
        let first: ReadRequest = serde_yaml::from_str(yaml).unwrap();
        let second: ReadRequest = serde_yaml::from_str(yaml).unwrap();

        assert!(!first.query_id.is_empty());
        assert_ne!(first.query_id, second.query_id);
        assert_eq!(
            edge_scan(first.effective_label()).to_gremlin(),
            "g.E().hasLabel('route').elementMap()"
        );
    }

    #[test]
    fn test_view_fixture_without_query() {
        let yaml = r#"
table_name: {schema_name: air, table_name: busiest}
schema:
  fields: [{name: code}]
  metadata: {componenttype: VIEW}
"#;
        let request: ReadRequest = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(request.schema.query_kind(), Ok(QueryKind::View));
        assert!(matches!(
            request.schema.literal_query(),
            Err(RequestError::MissingMetadata { key: "query" })
        ));
    }
}
