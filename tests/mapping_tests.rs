//! End-to-end tests: schema flattening through row materialization

use std::collections::{BTreeSet, HashMap};

use serde_json::{Value, json};
use tabular_mapping_sdk::mapping::{MatchTier, score_match};
use tabular_mapping_sdk::path::canonical_path;
use tabular_mapping_sdk::{
    AutoMapper, FieldDescriptor, HeaderMapping, MappingConfig, MappingSession, auto_map,
    find_conflicts, flatten, materialize, score,
};

fn product_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "id": {"type": "integer"},
            "tradeName": {"type": "string"},
            "productName": {"type": "string"},
            "gtin": {"type": "string"},
            "color": {"type": "string"},
            "category": {"type": "string", "enum": ["apparel", "electronics"]},
            "manufacturer": {
                "type": "object",
                "properties": {
                    "name": {"type": "string"},
                    "country": {"type": "string"}
                }
            },
            "refDocs": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "title": {"type": "string"},
                        "type": {"type": "string"}
                    }
                }
            },
            "tags": {"type": "array", "items": {"type": "string"}}
        },
        "oneOf": [
            {"properties": {"optionA": {"type": "string"}}},
            {"properties": {"optionB": {"type": "string"}}}
        ]
    })
}

fn fields() -> Vec<FieldDescriptor> {
    flatten(&product_schema()).unwrap()
}

fn row(cells: &[(&str, &str)]) -> HashMap<String, String> {
    cells
        .iter()
        .map(|(h, v)| (h.to_string(), v.to_string()))
        .collect()
}

/// Index-free leaf paths of a document, ignoring `@context`
fn document_paths(value: &Value, prefix: &str, out: &mut BTreeSet<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if key == "@context" {
                    continue;
                }
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                document_paths(child, &path, out);
            }
        }
        Value::Array(items) => {
            for item in items {
                document_paths(item, prefix, out);
            }
        }
        _ => {
            out.insert(canonical_path(prefix));
        }
    }
}

mod flatten_tests {
    use super::*;

    #[test]
    fn test_product_schema_fields() {
        let paths: Vec<String> = fields().into_iter().map(|f| f.path).collect();
        assert_eq!(
            paths,
            vec![
                "category",
                "color",
                "gtin",
                "id",
                "manufacturer.country",
                "manufacturer.name",
                "optionA",
                "optionB",
                "productName",
                "refDocs.title",
                "refDocs.type",
                "tags",
                "tradeName",
            ]
        );
    }

    #[test]
    fn test_flatten_is_idempotent() {
        assert_eq!(fields(), fields());
    }

    #[test]
    fn test_descriptor_details() {
        let fields = fields();
        let by_path = |p: &str| fields.iter().find(|f| f.path == p).unwrap();

        assert!(by_path("refDocs.title").is_array);
        assert!(by_path("tags").is_array);
        assert!(!by_path("manufacturer.name").is_array);
        assert_eq!(
            by_path("category").enum_values,
            Some(vec![json!("apparel"), json!("electronics")])
        );
        assert_eq!(by_path("optionA").one_of_memberships[0].group_id, "root#oneOf");
        assert_eq!(by_path("optionB").one_of_memberships[0].branch_index, 1);
    }
}

mod scoring_tests {
    use super::*;

    #[test]
    fn test_normalized_equality_scores_zero() {
        for (header, path) in [
            ("Trade Name", "tradeName"),
            ("trade_name", "tradeName"),
            ("MANUFACTURER NAME", "manufacturer.name"),
        ] {
            assert_eq!(score(header, path), 0.0, "{header}");
        }
    }

    #[test]
    fn test_brand_synonym() {
        let m = score_match("Brand", "tradeName").unwrap();
        assert_eq!(m.tier, MatchTier::Synonym);
        assert_eq!(m.score, 0.05);
    }

    #[test]
    fn test_category_never_matches_color() {
        assert!(score("Category", "color") >= MappingConfig::default().hopeless_cutoff);

        let only_color = vec![FieldDescriptor::new("color")];
        assert!(auto_map(&["Category"], &only_color).is_empty());
    }
}

mod auto_map_tests {
    use super::*;

    #[test]
    fn test_product_headers() {
        let mapping = auto_map(
            &[
                "ID",
                "Brand",
                "EAN",
                "Colour",
                "Manufacturer",
                "RefDoc 1 Title",
                "RefDoc 1 Type",
                "RefDoc 2 Title",
                "Internal Notes",
            ],
            &fields(),
        );

        assert_eq!(mapping.get("ID"), Some("id"));
        assert_eq!(mapping.get("Brand"), Some("tradeName"));
        assert_eq!(mapping.get("EAN"), Some("gtin"));
        assert_eq!(mapping.get("Colour"), Some("color"));
        assert_eq!(mapping.get("Manufacturer"), Some("manufacturer.name"));
        assert_eq!(mapping.get("RefDoc 1 Title"), Some("refDocs[0].title"));
        assert_eq!(mapping.get("RefDoc 1 Type"), Some("refDocs[0].type"));
        assert_eq!(mapping.get("RefDoc 2 Title"), Some("refDocs[1].title"));
        assert_eq!(mapping.get("Internal Notes"), None);
    }

    #[test]
    fn test_order_independence() {
        let fields = fields();
        let headers = ["Brand", "EAN", "Colour", "Manufacturer"];
        let mut reversed = headers;
        reversed.reverse();

        assert_eq!(auto_map(&headers, &fields), auto_map(&reversed, &fields));
    }

    #[test]
    fn test_non_array_fields_assigned_once() {
        let mapping = auto_map(&["Color", "Colour"], &fields());
        assert_eq!(mapping.get("Color"), Some("color"));
        assert_eq!(mapping.get("Colour"), None);
    }

    #[test]
    fn test_strict_config_skips_heuristics() {
        let mapper = AutoMapper::with_config(MappingConfig::strict());
        let mapping = mapper.map(&["Colour", "Brand"], &fields());
        assert_eq!(mapping.get("Colour"), None);
        assert_eq!(mapping.get("Brand"), Some("tradeName"));
    }

    #[test]
    fn test_root_array_schema_maps_plain_paths() {
        let schema = json!({
            "type": "array",
            "items": {
                "type": "object",
                "properties": {"name": {"type": "string"}}
            }
        });
        let fields = flatten(&schema).unwrap();

        let mapping = auto_map(&["Name"], &fields);
        assert_eq!(mapping.get("Name"), Some("name"));

        let doc = materialize(&mapping, &row(&[("Name", "Widget")])).unwrap();
        assert_eq!(doc, json!({"name": "Widget"}));
    }

    #[test]
    fn test_empty_inputs() {
        assert!(auto_map::<&str>(&[], &fields()).is_empty());
        assert!(auto_map(&["Brand"], &[]).is_empty());
    }
}

mod conflict_tests {
    use super::*;

    #[test]
    fn test_both_branches_conflict() {
        let mapping = HeaderMapping::new()
            .with("Option A", "optionA")
            .with("Option B", "optionB");

        let conflicts = find_conflicts(&mapping, &fields());
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].paths, vec!["optionA", "optionB"]);
    }

    #[test]
    fn test_single_branch_is_clean() {
        let mapping = HeaderMapping::new()
            .with("Option A", "optionA")
            .with("ID", "id");
        assert!(find_conflicts(&mapping, &fields()).is_empty());
    }

    #[test]
    fn test_auto_mapped_conflict() {
        let session = MappingSession::from_schema(&product_schema()).unwrap();
        let mapping = session.auto_map(&["Option A", "Option B"]);
        assert_eq!(mapping.len(), 2);
        assert_eq!(session.conflicts(&mapping).len(), 1);
    }
}

mod materialize_tests {
    use super::*;

    #[test]
    fn test_rows_with_sector_context() {
        let session = MappingSession::from_schema(&product_schema()).unwrap();
        let mapping = HeaderMapping::new().with("ID", "id");
        let rows = vec![row(&[("ID", "1")]), row(&[("ID", "2")])];

        let documents = session
            .materializer(&["core"])
            .materialize_rows(&mapping, &rows)
            .unwrap();

        let context = "https://schemas.example.org/contexts/core.jsonld";
        assert_eq!(
            documents,
            vec![
                json!({"@context": context, "id": 1}),
                json!({"@context": context, "id": 2})
            ]
        );
    }

    #[test]
    fn test_multiple_sectors() {
        let session = MappingSession::from_schema(&product_schema()).unwrap();
        let doc = session
            .materializer(&["core", "textile"])
            .materialize(&HeaderMapping::new(), &row(&[]))
            .unwrap();
        assert_eq!(doc["@context"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_no_sectors_no_context() {
        let doc = materialize(&HeaderMapping::new().with("ID", "id"), &row(&[("ID", "3")])).unwrap();
        assert_eq!(doc, json!({"id": 3}));
    }

    #[test]
    fn test_bracketed_property_names() {
        let schema = json!({
            "properties": {
                "id": {"type": "integer"},
                "size[cm]": {"type": "number"}
            }
        });
        let session = MappingSession::from_schema(&schema).unwrap();
        let mapping = session.auto_map(&["ID", "Size [cm]"]);
        assert_eq!(mapping.get("ID"), Some("id"));
        assert_eq!(mapping.get("Size [cm]"), Some("size[cm]"));

        let rows = vec![
            row(&[("ID", "1"), ("Size [cm]", "12.5")]),
            row(&[("ID", "2")]),
        ];
        let documents = session
            .materializer::<&str>(&[])
            .materialize_rows(&mapping, &rows)
            .unwrap();

        assert_eq!(
            documents,
            vec![json!({"id": 1, "size[cm]": 12.5}), json!({"id": 2})]
        );
    }

    #[test]
    fn test_documents_stay_within_schema() {
        let fields = fields();
        let known: BTreeSet<String> = fields.iter().map(|f| f.path.clone()).collect();
        let headers = [
            "ID",
            "Brand",
            "EAN",
            "Colour",
            "Manufacturer",
            "RefDoc 1 Title",
            "RefDoc 3 Title",
            "RefDoc 3 Type",
            "Internal Notes",
        ];
        let mapping = auto_map(&headers, &fields);
        let table = row(&[
            ("ID", "12"),
            ("Brand", "Acme"),
            ("EAN", "4006381333931"),
            ("Colour", "red"),
            ("Manufacturer", "Acme Ltd"),
            ("RefDoc 1 Title", "Manual"),
            ("RefDoc 3 Title", "Safety sheet"),
            ("RefDoc 3 Type", "pdf"),
            ("Internal Notes", "ignore me"),
        ]);

        let doc = materialize(&mapping, &table).unwrap();

        let mut paths = BTreeSet::new();
        document_paths(&doc, "", &mut paths);
        assert!(!paths.is_empty());
        assert!(paths.is_subset(&known), "{:?}", paths.difference(&known));

        assert_eq!(doc["manufacturer"]["name"], "Acme Ltd");
        assert_eq!(doc["refDocs"].as_array().unwrap().len(), 2);
        assert_eq!(doc["refDocs"][1]["type"], "pdf");
    }
}
