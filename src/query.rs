//! Query operations over a loaded [`Dataset`].
//!
//! Each function here backs one HTTP endpoint. They are pure reads: the
//! dataset goes in, a serializable response (or an [`ApiError`]) comes out.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::data::Dataset;
use crate::error::ApiError;
use crate::record::contains_ignore_case;

/// Number of component names offered when a lookup misses.
pub const NOT_FOUND_HINT_LIMIT: usize = 10;

pub const SERVICE_NAME: &str = "PrimeVue MCP API";
pub const SERVICE_DESCRIPTION: &str =
    "Model Context Protocol server for PrimeVue components and design tokens";

/// Paths advertised by the info endpoint.
pub const ENDPOINTS: [&str; 4] = [
    "/mcp/components",
    "/mcp/component/:name",
    "/mcp/tokens",
    "/mcp/search",
];

// ─── Info ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub endpoints: Vec<&'static str>,
    pub stats: DatasetStats,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct DatasetStats {
    pub components: usize,
    pub tokens: usize,
    pub total: usize,
}

pub fn service_info(dataset: &Dataset) -> ServiceInfo {
    let components = dataset.component_count();
    let tokens = dataset.token_count();
    ServiceInfo {
        name: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        description: SERVICE_DESCRIPTION,
        endpoints: ENDPOINTS.to_vec(),
        stats: DatasetStats {
            components,
            tokens,
            total: components + tokens,
        },
    }
}

// ─── Components ─────────────────────────────────────────────────────────────

/// `title` and `description` echo whatever the record stores; only string
/// values take part in matching.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSummary {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    pub has_props: bool,
    pub has_examples: bool,
}

/// List components, optionally keeping only those whose name, title or
/// description contains `query` ignoring case.
pub fn list_components(dataset: &Dataset, query: Option<&str>) -> Vec<ComponentSummary> {
    let term = non_empty(query).map(str::to_lowercase);

    dataset
        .components()
        .filter(|(name, record)| match &term {
            None => true,
            Some(term) => {
                contains_ignore_case(name, term)
                    || record.title().is_some_and(|t| contains_ignore_case(t, term))
                    || record
                        .description()
                        .is_some_and(|d| contains_ignore_case(d, term))
            }
        })
        .map(|(name, record)| ComponentSummary {
            name: name.to_string(),
            title: record.field("title").cloned(),
            description: record.field("description").cloned(),
            has_props: record.has_props(),
            has_examples: record.has_examples(),
        })
        .collect()
}

/// Fetch one component, or one section of it.
pub fn get_component(
    dataset: &Dataset,
    name: &str,
    section: Option<&str>,
) -> Result<Value, ApiError> {
    let record = dataset.lookup(name).ok_or_else(|| {
        ApiError::not_found(
            format!("Component '{}' not found", name),
            dataset.sample_component_names(NOT_FOUND_HINT_LIMIT),
        )
    })?;

    match non_empty(section) {
        None => Ok(record.value().clone()),
        Some(section) => record.section(section).cloned().ok_or_else(|| {
            ApiError::not_found(
                format!("Section '{}' not found in '{}'", section, name),
                record.section_names(),
            )
        }),
    }
}

// ─── Tokens ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct TokensResponse {
    pub count: usize,
    pub tokens: Map<String, Value>,
}

/// The token map, filtered by key or string value when `query` is given.
pub fn tokens(dataset: &Dataset, query: Option<&str>) -> TokensResponse {
    let term = non_empty(query).map(str::to_lowercase);

    let tokens: Map<String, Value> = dataset
        .tokens()
        .into_iter()
        .flatten()
        .filter(|(key, value)| match &term {
            None => true,
            Some(term) => token_matches(key, value, term),
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    TokensResponse {
        count: tokens.len(),
        tokens,
    }
}

fn token_matches(key: &str, value: &Value, term: &str) -> bool {
    contains_ignore_case(key, term)
        || value.as_str().is_some_and(|v| contains_ignore_case(v, term))
}

// ─── Search ─────────────────────────────────────────────────────────────────

/// One search result: either a component or a design token.
#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SearchHit {
    Component {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<Value>,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<Value>,
        matches: Vec<String>,
    },
    Token {
        name: String,
        value: Value,
        matches: Vec<String>,
    },
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub count: usize,
    pub results: Vec<SearchHit>,
}

/// Search components (name, title, description, prop names) and tokens.
///
/// Component hits come first in dataset order, then token hits.
pub fn search(dataset: &Dataset, query: Option<&str>) -> Result<SearchResponse, ApiError> {
    let query = non_empty(query)
        .ok_or_else(|| ApiError::BadRequest("Query parameter 'q' is required".into()))?;
    let term = query.to_lowercase();

    let mut results = Vec::new();

    for (name, record) in dataset.components() {
        let mut matches = Vec::new();
        if contains_ignore_case(name, &term) {
            matches.push("name".to_string());
        }
        if record.title().is_some_and(|t| contains_ignore_case(t, &term)) {
            matches.push("title".to_string());
        }
        if record
            .description()
            .is_some_and(|d| contains_ignore_case(d, &term))
        {
            matches.push("description".to_string());
        }
        if let Some(props) = record.props() {
            matches.extend(
                props
                    .keys()
                    .filter(|prop| contains_ignore_case(prop, &term))
                    .map(|prop| format!("prop:{}", prop)),
            );
        }

        if !matches.is_empty() {
            results.push(SearchHit::Component {
                name: name.to_string(),
                title: record.field("title").cloned(),
                description: record.field("description").cloned(),
                matches,
            });
        }
    }

    for (key, value) in dataset.tokens().into_iter().flatten() {
        if token_matches(key, value, &term) {
            results.push(SearchHit::Token {
                name: key.clone(),
                value: value.clone(),
                matches: vec!["token".to_string()],
            });
        }
    }

    Ok(SearchResponse {
        query: query.to_string(),
        count: results.len(),
        results,
    })
}

/// Empty query strings behave as if the parameter were absent.
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::Path;

    fn example() -> Dataset {
        Dataset::parse(
            Path::new("example.json"),
            r##"{
                "button": {"title": "Button", "description": "Clickable control", "props": {"label": {}}},
                "_tokens": {"primary.color": "#007bff"}
            }"##,
        )
        .unwrap()
    }

    fn catalog() -> Dataset {
        Dataset::parse(
            Path::new("catalog.json"),
            r##"{
                "button": {
                    "title": "Button",
                    "description": "Clickable control",
                    "props": {"label": {}, "iconPos": {}},
                    "examples": ["<Button label=\"Save\" />"]
                },
                "datatable": {
                    "title": "DataTable",
                    "description": "Displays data in tabular format",
                    "props": {"value": {}, "tableStyle": {}},
                    "events": {"row-click": {}},
                    "version": 4
                },
                "Tooltip": {"description": "Advisory information on hover"},
                "divider": {"title": 7},
                "_tokens": {
                    "primary.color": "#007bff",
                    "surface.ground": "#F8F9FA",
                    "table.border": "1px solid",
                    "legacy.flag": true
                }
            }"##,
        )
        .unwrap()
    }

    #[test]
    fn test_service_info_stats() {
        let info = service_info(&catalog());
        assert_eq!(info.name, SERVICE_NAME);
        assert_eq!(info.endpoints.len(), 4);
        assert_eq!(
            info.stats,
            DatasetStats {
                components: 4,
                tokens: 4,
                total: 8
            }
        );
    }

    #[test]
    fn test_list_components_example() {
        let listed = serde_json::to_value(list_components(&example(), None)).unwrap();
        assert_eq!(
            listed,
            json!([{
                "name": "button",
                "title": "Button",
                "description": "Clickable control",
                "hasProps": true,
                "hasExamples": false
            }])
        );
    }

    #[test]
    fn test_list_components_filter_is_sound_and_complete() {
        let dataset = catalog();
        for q in ["TABLE", "ton", "hover", "control", "zzz", "o"] {
            let term = q.to_lowercase();
            let listed = list_components(&dataset, Some(q));
            for summary in &listed {
                let hit = summary.name.to_lowercase().contains(&term)
                    || summary
                        .title
                        .as_ref()
                        .and_then(Value::as_str)
                        .is_some_and(|t| t.to_lowercase().contains(&term))
                    || summary
                        .description
                        .as_ref()
                        .and_then(Value::as_str)
                        .is_some_and(|d| d.to_lowercase().contains(&term));
                assert!(hit, "{} should not match {}", summary.name, q);
            }
            let expected = dataset
                .components()
                .filter(|(name, record)| {
                    name.to_lowercase().contains(&term)
                        || record.title().is_some_and(|t| t.to_lowercase().contains(&term))
                        || record
                            .description()
                            .is_some_and(|d| d.to_lowercase().contains(&term))
                })
                .count();
            assert_eq!(listed.len(), expected, "query {}", q);
        }
    }

    #[test]
    fn test_list_components_empty_query_lists_all() {
        assert_eq!(list_components(&catalog(), Some("")).len(), 4);
    }

    #[test]
    fn test_list_components_non_string_title_fails_match() {
        let listed = list_components(&catalog(), Some("7"));
        assert!(listed.is_empty());
        let all = list_components(&catalog(), None);
        let divider = all.iter().find(|s| s.name == "divider").unwrap();
        assert_eq!(divider.title, Some(json!(7)));
        assert_eq!(divider.description, None);
        assert!(!divider.has_props);
    }

    #[test]
    fn test_non_string_fields_echoed_in_search_hits() {
        let dataset = Dataset::parse(
            Path::new("odd.json"),
            r#"{"divider": {"title": 7, "description": null}}"#,
        )
        .unwrap();
        let response = search(&dataset, Some("div")).unwrap();
        let hits = serde_json::to_value(&response.results).unwrap();
        assert_eq!(
            hits,
            json!([{
                "type": "component",
                "name": "divider",
                "title": 7,
                "description": null,
                "matches": ["name"]
            }])
        );
        assert!(search(&dataset, Some("7")).unwrap().results.is_empty());
    }

    #[test]
    fn test_get_component_whole_record() {
        let dataset = catalog();
        let record = get_component(&dataset, "DataTable", None).unwrap();
        assert_eq!(record["title"], json!("DataTable"));
        let exact = get_component(&dataset, "Tooltip", None).unwrap();
        assert_eq!(exact["description"], json!("Advisory information on hover"));
    }

    #[test]
    fn test_get_component_section() {
        let section = get_component(&example(), "button", Some("props")).unwrap();
        assert_eq!(section, json!({"label": {}}));
        let upper = get_component(&catalog(), "datatable", Some("EVENTS")).unwrap();
        assert_eq!(upper, json!({"row-click": {}}));
    }

    #[test]
    fn test_get_component_not_found_hints() {
        let err = get_component(&catalog(), "calendar", None).unwrap_err();
        match err {
            ApiError::NotFound { message, available } => {
                assert_eq!(message, "Component 'calendar' not found");
                assert_eq!(available, vec!["button", "datatable", "Tooltip", "divider"]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_get_component_hint_limit() {
        let mut text = String::from("{\"_tokens\": {}");
        for i in 0..25 {
            text.push_str(&format!(", \"c{}\": {{}}", i));
        }
        text.push('}');
        let dataset = Dataset::parse(Path::new("many.json"), &text).unwrap();
        let err = get_component(&dataset, "nope", None).unwrap_err();
        let ApiError::NotFound { available, .. } = err else {
            panic!("expected not found");
        };
        assert_eq!(available.len(), NOT_FOUND_HINT_LIMIT);
        assert!(!available.iter().any(|name| name == "_tokens"));
        assert_eq!(available[0], "c0");
    }

    #[test]
    fn test_get_component_unknown_section_lists_structured_keys() {
        let err = get_component(&catalog(), "datatable", Some("slots")).unwrap_err();
        match err {
            ApiError::NotFound { message, available } => {
                assert_eq!(message, "Section 'slots' not found in 'datatable'");
                assert_eq!(available, vec!["props", "events"]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_tokens_unfiltered_and_filtered() {
        let dataset = catalog();
        let all = tokens(&dataset, None);
        assert_eq!(all.count, 4);
        assert_eq!(all.count, all.tokens.len());

        let filtered = tokens(&dataset, Some("f8f9"));
        assert_eq!(filtered.count, 1);
        assert_eq!(filtered.tokens["surface.ground"], json!("#F8F9FA"));

        // Non-string values only match on their key.
        let flagged = tokens(&dataset, Some("true"));
        assert_eq!(flagged.count, 0);
        let by_key = tokens(&dataset, Some("LEGACY"));
        assert_eq!(by_key.count, by_key.tokens.len());
        assert_eq!(by_key.tokens["legacy.flag"], json!(true));
    }

    #[test]
    fn test_tokens_absent_map() {
        let dataset = Dataset::parse(Path::new("x.json"), r#"{"button": {}}"#).unwrap();
        let response = tokens(&dataset, Some("x"));
        assert_eq!(response.count, 0);
        assert!(response.tokens.is_empty());
    }

    #[test]
    fn test_search_requires_query() {
        assert!(matches!(search(&catalog(), None), Err(ApiError::BadRequest(_))));
        assert!(matches!(search(&catalog(), Some("")), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_search_example_token_hit() {
        let response = search(&example(), Some("color")).unwrap();
        let hits = serde_json::to_value(&response.results).unwrap();
        assert!(hits.as_array().unwrap().contains(&json!({
            "type": "token",
            "name": "primary.color",
            "value": "#007bff",
            "matches": ["token"]
        })));
    }

    #[test]
    fn test_search_facets_and_order() {
        let response = search(&catalog(), Some("Table")).unwrap();
        assert_eq!(response.query, "Table");
        assert_eq!(response.count, response.results.len());
        assert_eq!(
            response.results,
            vec![
                SearchHit::Component {
                    name: "datatable".into(),
                    title: Some(json!("DataTable")),
                    description: Some(json!("Displays data in tabular format")),
                    matches: vec!["name".into(), "title".into(), "prop:tableStyle".into()],
                },
                SearchHit::Token {
                    name: "table.border".into(),
                    value: json!("1px solid"),
                    matches: vec!["token".into()],
                },
            ]
        );
    }

    #[test]
    fn test_search_token_value_substring() {
        let response = search(&catalog(), Some("007B")).unwrap();
        assert_eq!(response.count, 1);
        assert!(matches!(
            &response.results[0],
            SearchHit::Token { name, .. } if name == "primary.color"
        ));
    }

    #[test]
    fn test_queries_do_not_mutate() {
        let dataset = catalog();
        let first = serde_json::to_string(&search(&dataset, Some("o")).unwrap()).unwrap();
        let _ = list_components(&dataset, Some("o"));
        let _ = tokens(&dataset, Some("o"));
        let second = serde_json::to_string(&search(&dataset, Some("o")).unwrap()).unwrap();
        assert_eq!(first, second);
    }
}
