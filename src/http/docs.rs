use crate::domain::model::{
    ErrorBody, HealthResponse, ListQuery, ModuleListItem, ModuleStatsQuery, ModuleStatsResponse,
    StatQuery, StatResult, StatusResponse,
};
use schemars::gen::{SchemaGenerator, SchemaSettings};
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde_json::{json, Map, Value};

pub const SWAGGER_UI_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>Module Stats API - Docs</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js" crossorigin></script>
  <script>
    window.onload = () => {
      window.ui = SwaggerUIBundle({ url: "/openapi.json", dom_id: "#swagger-ui" });
    };
  </script>
</body>
</html>
"##;

/// Query parameters derived from the fields of `T`.
fn query_parameters<T: JsonSchema>(gen: &mut SchemaGenerator) -> Vec<Value> {
    let schema = T::json_schema(gen).into_object();
    let object = schema.object.unwrap_or_default();

    object
        .properties
        .iter()
        .map(|(name, property)| {
            let mut parameter = Map::new();
            parameter.insert("name".to_string(), json!(name));
            parameter.insert("in".to_string(), json!("query"));
            parameter.insert("required".to_string(), json!(object.required.contains(name)));

            let description = match property {
                Schema::Object(o) => o.metadata.as_ref().and_then(|m| m.description.clone()),
                Schema::Bool(_) => None,
            };
            if let Some(description) = description {
                parameter.insert("description".to_string(), json!(description));
            }

            parameter.insert("schema".to_string(), json!(property));
            Value::Object(parameter)
        })
        .collect()
}

fn json_response(description: &str, schema: &Schema) -> Value {
    json!({
        "description": description,
        "content": { "application/json": { "schema": schema } }
    })
}

/// OpenAPI 3 document describing every route of the router.
pub fn openapi_document() -> Value {
    let mut gen = SchemaSettings::openapi3().into_generator();

    let error = gen.subschema_for::<ErrorBody>();
    let status = gen.subschema_for::<StatusResponse>();
    let health = gen.subschema_for::<HealthResponse>();
    let module_list = gen.subschema_for::<Vec<ModuleListItem>>();
    let stat_result = gen.subschema_for::<StatResult>();
    let module_stats = gen.subschema_for::<ModuleStatsResponse>();

    let list_params = query_parameters::<ListQuery>(&mut gen);
    let stat_params = query_parameters::<StatQuery>(&mut gen);
    let module_stats_params = query_parameters::<ModuleStatsQuery>(&mut gen);

    let not_found = json_response("Unknown module or stat", &error);
    let invalid = json_response("Invalid query parameters", &error);

    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "Stalcraft Modules API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Module stats computed as `value = a + b * q`."
        },
        "paths": {
            "/": {
                "get": {
                    "summary": "Service status",
                    "responses": { "200": json_response("Service is up", &status) }
                }
            },
            "/health": {
                "get": {
                    "summary": "Health check with module count",
                    "responses": { "200": json_response("Service is up", &health) }
                }
            },
            "/modules": {
                "get": {
                    "summary": "List all modules with localized names",
                    "parameters": list_params,
                    "responses": {
                        "200": json_response("Module list ordered by key", &module_list),
                        "422": invalid.clone()
                    }
                }
            },
            "/stat": {
                "get": {
                    "summary": "Evaluate a + b * q for one stat of a module",
                    "parameters": stat_params,
                    "responses": {
                        "200": json_response("Computed stat value", &stat_result),
                        "404": not_found.clone(),
                        "422": invalid.clone()
                    }
                }
            },
            "/module-stats": {
                "get": {
                    "summary": "Evaluate every stat of a module",
                    "parameters": module_stats_params,
                    "responses": {
                        "200": json_response("Computed stats", &module_stats),
                        "404": not_found,
                        "422": invalid
                    }
                }
            }
        },
        "components": { "schemas": gen.definitions() }
    })
}
