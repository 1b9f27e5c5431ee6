//! Operation assembly
//!
//! Renders one path item per documented method: parameters, request body,
//! responses merged over the global default error set, rate-limit and
//! pagination headers, security requirements, and a document-wide unique
//! operationId.

use crate::components::schema_from_descriptor;
use crate::document::{
    Header, MediaType, Operation, ParameterObject, PathItem, RequestBody, Response, Schema,
};
use crate::registry::{pascal_case, EnumRegistry};
use crate::scopes;
use doc2openapi_common::version::is_newer_than;
use doc2openapi_common::{HttpMethod, Method, Parameter, ParameterLocation, TypeDescriptor};
use doc2openapi_parser::has_file_parameter;
use doc2openapi_parser::type_inference::TypeInference;
use std::collections::{BTreeMap, HashSet};

/// Parameter names that drive cursor pagination; their presence attaches
/// a `Link` header to 2xx responses
const CURSOR_PARAMS: &[&str] = &["max_id", "since_id", "min_id", "cursor"];

/// Default error responses merged into every operation; method-specific
/// entries win on conflict
const DEFAULT_ERROR_RESPONSES: &[(&str, &str)] = &[
    ("401", "Unauthorized"),
    ("404", "Not found"),
    ("422", "Unprocessable entity"),
];

pub struct OperationBuilder<'a> {
    baseline_version: &'a str,
    known_entities: &'a HashSet<String>,
    rate_limit_headers: &'a BTreeMap<String, String>,
    used_operation_ids: HashSet<String>,
    used_scopes: Vec<String>,
}

impl<'a> OperationBuilder<'a> {
    pub fn new(
        baseline_version: &'a str,
        known_entities: &'a HashSet<String>,
        rate_limit_headers: &'a BTreeMap<String, String>,
    ) -> Self {
        Self {
            baseline_version,
            known_entities,
            rate_limit_headers,
            used_operation_ids: HashSet::new(),
            used_scopes: Vec::new(),
        }
    }

    /// Every scope referenced by an operation so far, in first-use order
    pub fn used_scopes(&self) -> &[String] {
        &self.used_scopes
    }

    /// Assemble one method into its path item.
    pub fn add_method(
        &mut self,
        method: &Method,
        paths: &mut BTreeMap<String, PathItem>,
        registry: &mut EnumRegistry,
        schemas: &mut BTreeMap<String, Schema>,
    ) {
        let path = normalize_path(&method.endpoint);

        let mut parameters = path_parameters(&path);
        for param in &method.parameters {
            let location = match param.location {
                ParameterLocation::Query => "query",
                ParameterLocation::Header => "header",
                // Form data becomes the request body below.
                ParameterLocation::FormData => continue,
                ParameterLocation::Path => continue,
            };
            parameters.push(ParameterObject {
                name: param.name.clone(),
                location: location.to_string(),
                description: none_if_empty(&param.description),
                required: param.required,
                schema: self.parameter_schema(param, &method.tag, registry, schemas),
            });
        }

        let security = scopes::security_requirement(&method.oauth);
        if let Some(requirements) = &security {
            for requirement in requirements {
                for scope in requirement.values().flatten() {
                    if !self.used_scopes.contains(scope) {
                        self.used_scopes.push(scope.clone());
                    }
                }
            }
        }

        let unreleased = method
            .versions
            .iter()
            .any(|v| is_newer_than(v, self.baseline_version))
            .then_some(true);

        let operation = Operation {
            operation_id: self.operation_id(method, &path),
            summary: method.name.clone(),
            description: none_if_empty(&method.description),
            tags: vec![method.tag.clone()],
            deprecated: method.deprecated,
            unreleased,
            parameters,
            request_body: self.request_body(method, registry, schemas),
            responses: self.build_responses(method),
            security,
        };

        let item = paths.entry(path).or_default();
        let slot = match method.http_method {
            HttpMethod::Get => &mut item.get,
            HttpMethod::Post => &mut item.post,
            HttpMethod::Put => &mut item.put,
            HttpMethod::Patch => &mut item.patch,
            HttpMethod::Delete => &mut item.delete,
        };
        // First writer wins when the docs declare a duplicate.
        if slot.is_none() {
            *slot = Some(operation);
        }
    }

    /// Schema for one query/form parameter; enum-bearing parameters
    /// reference a shared component like entity attributes do.
    fn parameter_schema(
        &self,
        param: &Parameter,
        tag: &str,
        registry: &mut EnumRegistry,
        schemas: &mut BTreeMap<String, Schema>,
    ) -> Schema {
        if !param.enum_values.is_empty() {
            let component =
                registry.resolve(tag, &param.name, &param.enum_values, false, schemas);
            let reference = match &param.schema {
                TypeDescriptor::Array(_) => Schema::array_of(Schema::reference(&component)),
                _ => Schema::reference(&component),
            };
            // A bare $ref cannot carry a default, so wrap it in allOf.
            if param.default_value.is_some() {
                return Schema {
                    all_of: vec![reference],
                    default: param.default_value.clone(),
                    ..Schema::default()
                };
            }
            return reference;
        }

        let mut schema = schema_from_descriptor(&param.schema);
        if schema.reference.is_none() {
            schema.default = param.default_value.clone();
        }
        schema
    }

    fn request_body(
        &self,
        method: &Method,
        registry: &mut EnumRegistry,
        schemas: &mut BTreeMap<String, Schema>,
    ) -> Option<RequestBody> {
        let form: Vec<&Parameter> = method
            .parameters
            .iter()
            .filter(|p| p.location == ParameterLocation::FormData)
            .collect();
        if form.is_empty() {
            return None;
        }

        let mut properties = BTreeMap::new();
        let mut required = Vec::new();
        for param in &form {
            let mut schema = self.parameter_schema(param, &method.tag, registry, schemas);
            if schema.reference.is_none() {
                schema.description = none_if_empty(&param.description);
            }
            properties.insert(param.name.clone(), schema);
            if param.required {
                required.push(param.name.clone());
            }
        }

        let mut body_schema = Schema::object(properties);
        body_schema.required = required;

        let content_type = if has_file_parameter(&method.parameters) {
            "multipart/form-data"
        } else {
            "application/json"
        };

        Some(RequestBody {
            content: BTreeMap::from([(
                content_type.to_string(),
                MediaType {
                    schema: body_schema,
                    example: None,
                },
            )]),
            required: form.iter().any(|p| p.required),
        })
    }

    fn build_responses(&self, method: &Method) -> BTreeMap<String, Response> {
        let mut responses = BTreeMap::new();

        for code in &method.response_codes {
            responses.insert(
                code.status.clone(),
                self.response_for(method, &code.status, &code.description, code.return_type.as_deref()),
            );
        }
        // A method with no documented response section still gets a 200.
        if !responses.keys().any(|s| s.starts_with('2')) {
            responses.insert("200".to_string(), self.response_for(method, "200", "OK", None));
        }

        for (status, description) in DEFAULT_ERROR_RESPONSES {
            responses.entry(status.to_string()).or_insert_with(|| Response {
                description: description.to_string(),
                headers: BTreeMap::new(),
                content: Some(BTreeMap::from([(
                    "application/json".to_string(),
                    MediaType {
                        schema: Schema::reference("Error"),
                        example: None,
                    },
                )])),
            });
        }

        responses
    }

    fn response_for(
        &self,
        method: &Method,
        status: &str,
        description: &str,
        return_type: Option<&str>,
    ) -> Response {
        let success = status.starts_with('2');

        let content = if success {
            let raw = return_type.unwrap_or(&method.returns);
            let schema = (!raw.is_empty()).then(|| {
                schema_from_descriptor(&TypeInference::new(self.known_entities).infer(raw))
            });
            schema.map(|schema| {
                let example = method
                    .response_examples
                    .iter()
                    .find(|(s, _)| s == status)
                    .map(|(_, v)| v.clone());
                BTreeMap::from([(
                    "application/json".to_string(),
                    MediaType { schema, example },
                )])
            })
        } else {
            None
        };

        let mut headers = BTreeMap::new();
        if success {
            for (name, header_description) in self.rate_limit_headers {
                headers.insert(
                    name.clone(),
                    Header {
                        description: header_description.clone(),
                        schema: Schema::string(),
                    },
                );
            }
            let paginated = method
                .parameters
                .iter()
                .any(|p| CURSOR_PARAMS.contains(&p.name.as_str()));
            if paginated {
                headers.insert(
                    "Link".to_string(),
                    Header {
                        description: "Links to the next and previous pages".to_string(),
                        schema: Schema::string(),
                    },
                );
            }
        }

        Response {
            description: if description.is_empty() {
                default_status_description(status).to_string()
            } else {
                description.to_string()
            },
            headers,
            content,
        }
    }

    /// Derive an operationId from the verb and resource path, with a
    /// fuller path-based fallback to guarantee document-wide uniqueness
    fn operation_id(&mut self, method: &Method, path: &str) -> String {
        let segments: Vec<&str> = path
            .split('/')
            .filter(|s| !s.is_empty() && !s.starts_with("api") && !is_version_segment(s))
            .collect();
        let statics: Vec<&str> = segments
            .iter()
            .copied()
            .filter(|s| !s.starts_with('{'))
            .collect();
        let params: Vec<&str> = segments
            .iter()
            .copied()
            .filter(|s| s.starts_with('{'))
            .map(|s| s.trim_matches(['{', '}']))
            .collect();

        let item = segments.last().is_some_and(|s| s.starts_with('{'));
        let verb = match method.http_method {
            HttpMethod::Get if item => "get",
            HttpMethod::Get => "list",
            HttpMethod::Post => "create",
            HttpMethod::Put | HttpMethod::Patch => "update",
            HttpMethod::Delete => "delete",
        };

        let resource: String = statics.iter().map(|s| pascal_case(s)).collect();
        let mut candidate = format!("{}{}", verb, resource);

        if self.used_operation_ids.contains(&candidate) {
            let qualifier: String = params
                .iter()
                .map(|p| format!("By{}", pascal_case(p)))
                .collect();
            candidate = format!("{}{}{}", verb, resource, qualifier);
        }
        let mut counter = 2;
        while self.used_operation_ids.contains(&candidate) {
            candidate = format!("{}{}{}", verb, resource, counter);
            counter += 1;
        }

        self.used_operation_ids.insert(candidate.clone());
        candidate
    }
}

/// Normalize `:param` path placeholders to `{param}` braces
pub fn normalize_path(endpoint: &str) -> String {
    endpoint
        .split('/')
        .map(|segment| match segment.strip_prefix(':') {
            Some(name) => format!("{{{}}}", name),
            None => segment.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn path_parameters(path: &str) -> Vec<ParameterObject> {
    path.split('/')
        .filter(|s| s.starts_with('{') && s.ends_with('}'))
        .map(|s| ParameterObject {
            name: s.trim_matches(['{', '}']).to_string(),
            location: "path".to_string(),
            description: None,
            required: true,
            schema: Schema::string(),
        })
        .collect()
}

fn is_version_segment(segment: &str) -> bool {
    segment.len() >= 2
        && segment.starts_with('v')
        && segment[1..].chars().all(|c| c.is_ascii_digit())
}

fn default_status_description(status: &str) -> &'static str {
    match status {
        "200" => "OK",
        "401" => "Unauthorized",
        "404" => "Not found",
        "422" => "Unprocessable entity",
        _ => "Response",
    }
}

fn none_if_empty(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_string())
}
