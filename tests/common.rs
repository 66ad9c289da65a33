//! Common test fixtures

#![allow(dead_code)]

use serde_json::{Value, json};

/// A small pet store definition exercising path, query, header and body
/// routing plus a recursive component schema.
pub fn petstore_definition(server_url: &str) -> Value {
    json!({
        "openapi": "3.0.3",
        "info": {"title": "Swagger Petstore", "version": "1.0.17"},
        "servers": [{"url": server_url}],
        "paths": {
            "/pets": {
                "get": {
                    "operationId": "listPets",
                    "summary": "List pets",
                    "parameters": [
                        {"name": "limit", "in": "query", "schema": {"type": "integer", "format": "int32"}},
                        {"name": "status", "in": "query", "schema": {"type": "string", "enum": ["available", "sold"]}}
                    ]
                },
                "post": {
                    "operationId": "createPet",
                    "summary": "Add a pet",
                    "parameters": [{"name": "X-Request-Id", "in": "header", "schema": {"type": "string"}}],
                    "requestBody": {
                        "description": "Pet to add",
                        "required": true,
                        "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Pet"}}}
                    }
                }
            },
            "/pets/{petId}": {
                "get": {
                    "operationId": "getPetById",
                    "description": "Returns a single pet",
                    "parameters": [
                        {"name": "petId", "in": "path", "required": true, "schema": {"type": "integer", "format": "int64"}}
                    ]
                },
                "delete": {
                    "operationId": "deletePet",
                    "parameters": [
                        {"name": "petId", "in": "path", "required": true, "schema": {"type": "integer"}}
                    ]
                }
            },
            "/health": {
                "get": {"summary": "Liveness probe"}
            }
        },
        "components": {
            "schemas": {
                "Pet": {
                    "type": "object",
                    "required": ["name"],
                    "properties": {
                        "id": {"type": "integer", "format": "int64"},
                        "name": {"type": "string", "example": "doggie"},
                        "category": {"$ref": "#/components/schemas/Category"},
                        "parent": {"$ref": "#/components/schemas/Pet"}
                    }
                },
                "Category": {
                    "type": "object",
                    "properties": {"name": {"type": "string"}}
                }
            }
        }
    })
}

/// The same definition rendered as YAML.
pub fn petstore_yaml(server_url: &str) -> String {
    format!(
        r#"
openapi: 3.0.3
info:
  title: Swagger Petstore
  version: 1.0.17
servers:
  - url: {server_url}
paths:
  /pets/{{petId}}:
    get:
      operationId: getPetById
      parameters:
        - name: petId
          in: path
          required: true
          schema:
            type: integer
"#
    )
}
