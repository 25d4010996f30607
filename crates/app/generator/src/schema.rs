use schemars::JsonSchema;
use serde::Serialize;
use serde_json::{json, Value as Json};

/// The shape every entity's JSON representation conforms to: an
/// identifier plus an arbitrary, extension-defined set of additional
/// fields. The ancestry data model itself is an external collaborator's
/// concern, so this schema only documents the envelope the generation
/// pipeline guarantees, not any particular entity type's fields.
#[derive(Serialize, JsonSchema)]
struct EntityEnvelope {
    /// The entity's identifier, unique within its entity type.
    id: String,
}

/// The JSON Schema document written to `schema.json`, describing the
/// envelope every generated entity and listing resource follows.
#[must_use]
pub fn generate_schema_document() -> Json {
    serde_json::to_value(schemars::schema_for!(EntityEnvelope))
        .expect("a schemars-generated schema always serializes")
}

/// A minimal OpenAPI 3 document describing the generated site's JSON API:
/// one listing and one detail path per entity type.
#[must_use]
pub fn generate_openapi_specification(entity_types: &[String]) -> Json {
    let mut paths = serde_json::Map::new();
    for entity_type in entity_types {
        paths.insert(
            format!("/{entity_type}/index.json"),
            json!({ "get": { "summary": format!("List every {entity_type}"), "responses": { "200": { "description": "OK" } } } }),
        );
        paths.insert(
            format!("/{entity_type}/{{id}}/index.json"),
            json!({ "get": { "summary": format!("Get a single {entity_type}"), "responses": { "200": { "description": "OK" } } } }),
        );
    }
    json!({
        "openapi": "3.0.0",
        "info": { "title": "Betty", "version": "1.0.0" },
        "paths": Json::Object(paths),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_document_describes_the_entity_envelope() {
        let schema = generate_schema_document();
        assert_eq!(schema["title"], "EntityEnvelope");
    }

    #[test]
    fn openapi_specification_has_one_path_pair_per_entity_type() {
        let specification = generate_openapi_specification(&["person".to_string()]);
        assert!(specification["paths"]["/person/index.json"].is_object());
        assert!(specification["paths"]["/person/{id}/index.json"].is_object());
    }
}
