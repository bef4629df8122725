//! Extractor reading documentation from a structured-comment companion
//! document stored next to a compiled unit.
//!
//! The companion document for `<dir>/<name>.<ext>` is `<dir>/<name>.xml`.
//! Each unit's document is parsed once and cached for the lifetime of the
//! extractor; a missing document is a per-query no-opinion, never an error.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use quick_xml::escape::unescape;
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, warn};

use crate::extract::Extractor;
use crate::meta::{PropertyMeta, TypeMeta};
use crate::model::{CommandExample, CommandValue, DataType};
use crate::text::to_paragraphs;

/// Extracts documentation from companion structured-comment documents.
#[derive(Debug, Default)]
pub struct CommentExtractor {
    /// Parsed companion documents, keyed by compiled-unit location.
    cache: Mutex<HashMap<PathBuf, Arc<CommentDoc>>>,
}

impl CommentExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// The parsed companion document for a unit, loading and caching it on
    /// first access. The lock is held across the load so a given unit is
    /// only ever parsed once.
    fn unit_doc(&self, unit: &Path) -> Option<Arc<CommentDoc>> {
        if unit.as_os_str().is_empty() {
            return None;
        }

        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(doc) = cache.get(unit) {
            return Some(Arc::clone(doc));
        }

        let path = unit.with_extension("xml");
        let xml = match fs::read_to_string(&path) {
            Ok(xml) => xml,
            Err(_) => {
                debug!(path = %path.display(), "no companion document");
                return None;
            }
        };
        match CommentDoc::parse(&xml) {
            Ok(doc) => {
                debug!(path = %path.display(), "loaded companion document");
                let doc = Arc::new(doc);
                cache.insert(unit.to_path_buf(), Arc::clone(&doc));
                Some(doc)
            }
            Err(error) => {
                warn!(path = %path.display(), %error, "malformed companion document");
                None
            }
        }
    }

    fn type_id(ty: &TypeMeta) -> String {
        format!("T:{}", ty.full_name)
    }

    fn property_id(prop: &PropertyMeta) -> String {
        format!("P:{}.{}", prop.declaring_type, prop.name)
    }
}

impl Extractor for CommentExtractor {
    fn command_synopsis(&self, ty: &TypeMeta) -> Option<String> {
        self.unit_doc(&ty.unit)?.summary(&Self::type_id(ty))
    }

    fn command_description(&self, ty: &TypeMeta) -> Option<String> {
        self.unit_doc(&ty.unit)?.remarks(&Self::type_id(ty))
    }

    fn parameter_description(&self, prop: &PropertyMeta) -> Option<String> {
        self.unit_doc(&prop.unit)?.summary(&Self::property_id(prop))
    }

    fn command_examples(&self, ty: &TypeMeta) -> Option<Vec<CommandExample>> {
        let doc = self.unit_doc(&ty.unit)?;
        Some(
            doc.examples(&Self::type_id(ty))
                .into_iter()
                .map(example_from_node)
                .collect(),
        )
    }

    fn command_return_values(&self, ty: &TypeMeta) -> Option<Vec<CommandValue>> {
        let doc = self.unit_doc(&ty.unit)?;
        Some(
            doc.returns(&Self::type_id(ty))
                .into_iter()
                .map(value_from_node)
                .collect(),
        )
    }

    /// Companion documents carry no input-type information.
    fn command_input_types(&self, _ty: &TypeMeta) -> Option<Vec<CommandValue>> {
        None
    }
}

/// Decompose an `example` node: `para` children tagged `type="description"`
/// become the introduction, every other `para` becomes remarks, and all
/// `code` fragments are joined with newlines in document order.
fn example_from_node(node: &Element) -> CommandExample {
    let mut description = Vec::new();
    let mut remarks = Vec::new();
    for para in node.children_named("para") {
        let paragraphs = to_paragraphs(para.text().trim());
        if para.attr("type") == Some("description") {
            description.extend(paragraphs);
        } else {
            remarks.extend(paragraphs);
        }
    }

    CommandExample {
        title: node
            .child("title")
            .map(|title| title.text().trim().to_string())
            .unwrap_or_else(|| "Example".to_string()),
        description,
        code: node
            .children_named("code")
            .map(|code| code.text())
            .collect::<Vec<_>>()
            .join("\n"),
        remarks,
    }
}

/// Decompose a `returns` node into a command value.
///
/// Without a cross-reference, or with an attribute-less one, the first
/// paragraph is consumed as the type name and the rest is narrative. A
/// cross-reference with attributes names the type via `cref`, passes `uri`
/// through, and keeps its own text as the type's nested description while
/// the collected paragraphs stay narrative untouched.
fn value_from_node(node: &Element) -> CommandValue {
    let see = node.child("see");
    let paras: Vec<&Element> = node.children_named("para").collect();

    let mut description: Vec<String> = if see.is_none() && paras.is_empty() {
        to_paragraphs(node.text().trim())
    } else {
        paras
            .iter()
            .flat_map(|para| to_paragraphs(para.text().trim()))
            .collect()
    };

    match see {
        Some(see) if !see.attrs.is_empty() => CommandValue {
            data_type: DataType {
                name: see
                    .attr("cref")
                    .map(|value| value.trim().to_string())
                    .unwrap_or_default(),
                uri: see.attr("uri").map(|value| value.trim().to_string()),
                description: to_paragraphs(see.text().trim()),
            },
            description,
        },
        _ => {
            let name = if description.is_empty() {
                String::new()
            } else {
                description.remove(0)
            };
            CommandValue {
                data_type: DataType {
                    name,
                    ..DataType::default()
                },
                description,
            }
        }
    }
}

/// A parsed companion document, indexed by member id
/// ("T:Full.Type.Name" / "P:Full.Type.Name.Property").
#[derive(Debug)]
pub struct CommentDoc {
    members: HashMap<String, Element>,
}

impl CommentDoc {
    /// Parse a companion document.
    pub fn parse(xml: &str) -> Result<Self, quick_xml::Error> {
        let root = parse_tree(xml)?;
        let mut members = HashMap::new();
        if let Some(list) = root.children.iter().find_map(|node| match node {
            Node::Element(element) if element.name == "members" => Some(element),
            _ => None,
        }) {
            for node in &list.children {
                if let Node::Element(element) = node {
                    if element.name == "member" {
                        if let Some(name) = element.attr("name") {
                            members.insert(name.to_string(), element.clone());
                        }
                    }
                }
            }
        }
        Ok(Self { members })
    }

    fn member(&self, id: &str) -> Option<&Element> {
        self.members.get(id)
    }

    /// Text of the member's `summary` node, trimmed.
    pub fn summary(&self, id: &str) -> Option<String> {
        self.member(id)?
            .child("summary")
            .map(|node| node.text().trim().to_string())
    }

    /// Text of the member's `remarks` node, trimmed.
    pub fn remarks(&self, id: &str) -> Option<String> {
        self.member(id)?
            .child("remarks")
            .map(|node| node.text().trim().to_string())
    }

    /// The member's `example` nodes, in document order.
    fn examples(&self, id: &str) -> Vec<&Element> {
        self.member(id)
            .map(|member| member.children_named("example").collect())
            .unwrap_or_default()
    }

    /// The member's `returns` nodes, in document order.
    fn returns(&self, id: &str) -> Vec<&Element> {
        self.member(id)
            .map(|member| member.children_named("returns").collect())
            .unwrap_or_default()
    }
}

/// A minimal XML element tree; just enough structure to walk the
/// companion-document markup with attributes and mixed content intact.
#[derive(Debug, Clone, Default)]
struct Element {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<Node>,
}

#[derive(Debug, Clone)]
enum Node {
    Element(Element),
    Text(String),
}

impl Element {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn child(&self, name: &str) -> Option<&Element> {
        self.children_named(name).next()
    }

    fn children_named<'a, 'n>(&'a self, name: &'n str) -> impl Iterator<Item = &'a Element> + 'n
    where
        'a: 'n,
    {
        self.children.iter().filter_map(move |node| match node {
            Node::Element(element) if element.name == name => Some(element),
            _ => None,
        })
    }

    /// Concatenated text of the element and all its descendants, in
    /// document order.
    fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Element(element) => element.collect_text(out),
            }
        }
    }
}

/// Build an element tree from XML with an event loop over a stack of open
/// elements. Returns the root element.
fn parse_tree(xml: &str) -> Result<Element, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = vec![Element::default()];

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                stack.push(element_from_start(&start));
            }
            Event::Empty(start) => {
                let element = element_from_start(&start);
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(Node::Element(element));
                }
            }
            Event::End(_) => {
                if stack.len() > 1 {
                    let element = stack.pop().unwrap_or_default();
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(Node::Element(element));
                    }
                }
            }
            Event::Text(text) => {
                let raw = String::from_utf8_lossy(text.as_ref()).to_string();
                let unescaped = unescape(&raw).map(|cow| cow.into_owned()).unwrap_or(raw);
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(Node::Text(unescaped));
                }
            }
            Event::CData(data) => {
                let raw = String::from_utf8_lossy(data.as_ref()).to_string();
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(Node::Text(raw));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    // The synthetic bottom of the stack holds the document's top-level
    // elements; the first of those is the root.
    let document = stack.swap_remove(0);
    let root = document.children.into_iter().find_map(|node| match node {
        Node::Element(element) => Some(element),
        _ => None,
    });
    Ok(root.unwrap_or_default())
}

fn element_from_start(start: &quick_xml::events::BytesStart<'_>) -> Element {
    let name = String::from_utf8_lossy(start.name().as_ref()).to_string();
    let attrs = start
        .attributes()
        .filter_map(|attr| attr.ok())
        .filter_map(|attr| {
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            let value = attr.unescape_value().ok()?.into_owned();
            Some((key, value))
        })
        .collect();
    Element {
        name,
        attrs,
        children: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DOC: &str = r#"<?xml version="1.0"?>
<doc>
    <assembly><name>Sample</name></assembly>
    <members>
        <member name="T:Sample.GetWidget">
            <summary>
                Gets one or more widgets.
            </summary>
            <remarks>
                This command works with widgets.
                It gets them.
            </remarks>
            <example>
                <title>Fetch everything</title>
                <para type="description">Fetches all widgets.</para>
                <code>Get-Widget -All</code>
                <code>Get-Widget -All -Verbose</code>
                <para>Widgets arrive on the pipeline.</para>
            </example>
            <returns>
                Widget
                One widget per matching name.
            </returns>
            <returns>
                <see cref="Sample.Widget" uri="https://example.com/widget">A widget record.</see>
                <para>Only with -Detailed.</para>
            </returns>
        </member>
        <member name="P:Sample.GetWidget.Name">
            <summary>The name of the widget to get.</summary>
        </member>
    </members>
</doc>
"#;

    fn write_companion(dir: &tempfile::TempDir, stem: &str, xml: &str) -> PathBuf {
        let unit = dir.path().join(format!("{stem}.dll"));
        let doc_path = dir.path().join(format!("{stem}.xml"));
        let mut file = std::fs::File::create(&doc_path).unwrap();
        file.write_all(xml.as_bytes()).unwrap();
        unit
    }

    fn widget_type(unit: PathBuf) -> TypeMeta {
        TypeMeta {
            full_name: "Sample.GetWidget".to_string(),
            unit,
            ..TypeMeta::default()
        }
    }

    #[test]
    fn summary_and_remarks_map_to_synopsis_and_description() {
        let dir = tempfile::TempDir::new().unwrap();
        let unit = write_companion(&dir, "sample", DOC);
        let extractor = CommentExtractor::new();
        let ty = widget_type(unit);

        assert_eq!(
            extractor.command_synopsis(&ty).as_deref(),
            Some("Gets one or more widgets.")
        );
        let description = extractor.command_description(&ty).unwrap();
        assert!(description.starts_with("This command works with widgets."));
    }

    #[test]
    fn property_summary_is_parameter_description() {
        let dir = tempfile::TempDir::new().unwrap();
        let unit = write_companion(&dir, "sample", DOC);
        let extractor = CommentExtractor::new();
        let prop = PropertyMeta {
            name: "Name".to_string(),
            declaring_type: "Sample.GetWidget".to_string(),
            unit,
            ..PropertyMeta::default()
        };

        assert_eq!(
            extractor.parameter_description(&prop).as_deref(),
            Some("The name of the widget to get.")
        );
    }

    #[test]
    fn missing_companion_is_no_opinion_everywhere() {
        let dir = tempfile::TempDir::new().unwrap();
        let extractor = CommentExtractor::new();
        let ty = widget_type(dir.path().join("absent.dll"));

        assert!(extractor.command_synopsis(&ty).is_none());
        assert!(extractor.command_description(&ty).is_none());
        assert!(extractor.command_examples(&ty).is_none());
        assert!(extractor.command_return_values(&ty).is_none());
    }

    #[test]
    fn empty_unit_path_is_no_opinion() {
        let extractor = CommentExtractor::new();
        assert!(extractor
            .command_synopsis(&TypeMeta::default())
            .is_none());
    }

    #[test]
    fn malformed_companion_is_no_opinion() {
        let dir = tempfile::TempDir::new().unwrap();
        let unit = write_companion(&dir, "broken", "<doc><members><member");
        let extractor = CommentExtractor::new();

        assert!(extractor.command_synopsis(&widget_type(unit)).is_none());
    }

    #[test]
    fn example_split_into_description_remarks_and_joined_code() {
        let dir = tempfile::TempDir::new().unwrap();
        let unit = write_companion(&dir, "sample", DOC);
        let extractor = CommentExtractor::new();

        let examples = extractor.command_examples(&widget_type(unit)).unwrap();
        assert_eq!(examples.len(), 1);
        let example = &examples[0];
        assert_eq!(example.title, "Fetch everything");
        assert_eq!(example.description, vec!["Fetches all widgets."]);
        assert_eq!(example.remarks, vec!["Widgets arrive on the pipeline."]);
        assert_eq!(example.code, "Get-Widget -All\nGet-Widget -All -Verbose");
    }

    #[test]
    fn example_title_defaults_when_absent() {
        let xml = r#"<doc><members><member name="T:Sample.GetWidget">
            <example><code>Get-Widget</code></example>
        </member></members></doc>"#;
        let dir = tempfile::TempDir::new().unwrap();
        let unit = write_companion(&dir, "untitled", xml);
        let extractor = CommentExtractor::new();

        let examples = extractor.command_examples(&widget_type(unit)).unwrap();
        assert_eq!(examples[0].title, "Example");
    }

    #[test]
    fn return_value_without_cross_reference_consumes_first_paragraph() {
        let dir = tempfile::TempDir::new().unwrap();
        let unit = write_companion(&dir, "sample", DOC);
        let extractor = CommentExtractor::new();

        let values = extractor.command_return_values(&widget_type(unit)).unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0].data_type.name, "Widget");
        assert_eq!(values[0].description, vec!["One widget per matching name."]);
        assert!(values[0].data_type.uri.is_none());
    }

    #[test]
    fn return_value_with_attributed_cross_reference_keeps_paragraphs() {
        let dir = tempfile::TempDir::new().unwrap();
        let unit = write_companion(&dir, "sample", DOC);
        let extractor = CommentExtractor::new();

        let values = extractor.command_return_values(&widget_type(unit)).unwrap();
        let value = &values[1];
        assert_eq!(value.data_type.name, "Sample.Widget");
        assert_eq!(
            value.data_type.uri.as_deref(),
            Some("https://example.com/widget")
        );
        assert_eq!(value.data_type.description, vec!["A widget record."]);
        assert_eq!(value.description, vec!["Only with -Detailed."]);
    }

    #[test]
    fn companion_document_is_parsed_once_per_unit() {
        let dir = tempfile::TempDir::new().unwrap();
        let unit = write_companion(&dir, "cached", DOC);
        let extractor = CommentExtractor::new();
        let ty = widget_type(unit.clone());

        assert!(extractor.command_synopsis(&ty).is_some());

        // Rewriting the companion must not change cached answers.
        write_companion(
            &dir,
            "cached",
            r#"<doc><members><member name="T:Sample.GetWidget">
                <summary>Rewritten.</summary>
            </member></members></doc>"#,
        );
        assert_eq!(
            extractor.command_synopsis(&ty).as_deref(),
            Some("Gets one or more widgets.")
        );
    }

    #[test]
    fn entities_are_unescaped() {
        let xml = r#"<doc><members><member name="T:Sample.GetWidget">
            <summary>Widgets &amp; gadgets &lt;latest&gt;.</summary>
        </member></members></doc>"#;
        let dir = tempfile::TempDir::new().unwrap();
        let unit = write_companion(&dir, "escaped", xml);
        let extractor = CommentExtractor::new();

        assert_eq!(
            extractor.command_synopsis(&widget_type(unit)).as_deref(),
            Some("Widgets & gadgets <latest>.")
        );
    }
}
