//! Method file parser

use super::converter;
use crate::extract::{parse_example_block, parse_version_history};
use crate::frontmatter::parse_front_matter;
use doc2openapi_common::{Entity, HttpMethod, Method, ResponseCode, Result, VersionChange};
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

static METHOD_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^##\s+([^\n#][^\n]*)$").unwrap());

static HTTP_FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```http\n(GET|POST|PUT|PATCH|DELETE)\s+(\S+)(?:\s+HTTP/[\d.]+)?\s*\n```").unwrap()
});

static RETURNS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*Returns:\*\*\s*([^\n]*)").unwrap());

static OAUTH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*OAuth:\*\*\s*([^\n]*)").unwrap());

static RESPONSE_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#{3,6}\s+(\d{3}):\s*([^\n]*)$").unwrap());

static ANCHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{#[^}]*\}|\{\{%[^}]*%\}\}").unwrap());

/// Output of parsing one method file: the operations plus any inline
/// response-shape entities synthesized from example blocks
#[derive(Debug, Default)]
pub struct ParsedMethods {
    pub methods: Vec<Method>,
    pub inline_entities: Vec<Entity>,
}

/// Parses one method documentation file into `Method` records
pub struct MethodParser {
    known_entities: HashSet<String>,
}

impl MethodParser {
    pub fn new(known_entities: HashSet<String>) -> Self {
        Self { known_entities }
    }

    /// Load and parse a method file. The tag is derived from the file
    /// name. Draft files yield an empty result.
    pub fn parse_file(&self, path: &Path) -> Result<ParsedMethods> {
        let content = fs::read_to_string(path)?;
        let tag = path
            .file_stem()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();
        Ok(self.parse_markdown(&content, &tag))
    }

    /// Parse method markdown. Sections without an HTTP fence are not
    /// methods and are skipped; removed methods are dropped.
    pub fn parse_markdown(&self, content: &str, tag: &str) -> ParsedMethods {
        let (front, body) = parse_front_matter(content);
        if front.draft {
            return ParsedMethods::default();
        }

        let headings: Vec<(usize, usize, &str)> = METHOD_HEADING_RE
            .captures_iter(body)
            .map(|c| {
                let m = c.get(0).unwrap();
                (m.start(), m.end(), c.get(1).unwrap().as_str())
            })
            .collect();

        let mut out = ParsedMethods::default();
        for (i, &(_, end, heading)) in headings.iter().enumerate() {
            if heading.contains("{{%removed%}}") {
                continue;
            }
            let section_end = headings.get(i + 1).map(|h| h.0).unwrap_or(body.len());
            let section = &body[end..section_end];

            let Some(fence) = HTTP_FENCE_RE.captures(section) else {
                continue;
            };
            let Some(http_method) = HttpMethod::parse(fence.get(1).unwrap().as_str()) else {
                continue;
            };
            let endpoint = fence.get(2).unwrap().as_str().to_string();
            let name = clean_heading(heading);

            let mut method = Method {
                name,
                http_method,
                endpoint,
                description: section_description(section, fence.get(0).unwrap().end()),
                parameters: converter::build_parameters(section, &self.known_entities),
                returns: RETURNS_RE
                    .captures(section)
                    .map(|c| c.get(1).unwrap().as_str().trim_end_matches('\\').trim().to_string())
                    .unwrap_or_default(),
                oauth: OAUTH_RE
                    .captures(section)
                    .map(|c| c.get(1).unwrap().as_str().trim_end_matches('\\').trim().to_string())
                    .unwrap_or_default(),
                versions: parse_version_history(section)
                    .iter()
                    .map(|v| v.version.clone())
                    .collect(),
                deprecated: heading.contains("{{%deprecated%}}")
                    || parse_version_history(section)
                        .iter()
                        .any(|v| v.change == VersionChange::Deprecated),
                response_examples: Vec::new(),
                response_codes: Vec::new(),
                tag: tag.to_string(),
            };

            collect_responses(section, &mut method);

            if let Some(entity) =
                converter::synthesize_response_entity(&method, &self.known_entities)
            {
                method.returns = format!("[{}]", entity.name);
                out.inline_entities.push(entity);
            }

            out.methods.push(method);
        }

        out
    }
}

/// Prose between the HTTP fence and the first bold label or sub-heading
fn section_description(section: &str, from: usize) -> String {
    let rest = &section[from..];
    let end = ["\n**", "\n#", "\n```"]
        .iter()
        .filter_map(|d| rest.find(d))
        .min()
        .unwrap_or(rest.len());
    rest[..end]
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches('\\')
        .trim()
        .to_string()
}

/// Collect per-status response descriptions and example blocks
fn collect_responses(section: &str, method: &mut Method) {
    let responses: Vec<(usize, usize, &str, &str)> = RESPONSE_HEADING_RE
        .captures_iter(section)
        .map(|c| {
            let m = c.get(0).unwrap();
            (
                m.start(),
                m.end(),
                c.get(1).unwrap().as_str(),
                c.get(2).unwrap().as_str(),
            )
        })
        .collect();

    for (i, &(_, end, status, description)) in responses.iter().enumerate() {
        let block_end = responses.get(i + 1).map(|r| r.0).unwrap_or(section.len());
        let block = &section[end..block_end];

        method.response_codes.push(ResponseCode {
            status: status.to_string(),
            description: description.trim().to_string(),
            return_type: block
                .lines()
                .find(|l| l.contains("[") && l.contains("relref"))
                .map(|l| l.trim().to_string()),
        });

        if let Some(example) = parse_example_block(block) {
            method
                .response_examples
                .push((status.to_string(), example));
        }
    }
}

fn clean_heading(heading: &str) -> String {
    ANCHOR_RE.replace_all(heading, "").trim().to_string()
}
