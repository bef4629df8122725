//! Extractor reading documentation from declarative annotations on the
//! type and its properties.

use crate::extract::Extractor;
use crate::meta::{PropertyMeta, TypeMeta};
use crate::model::{CommandExample, CommandValue, DataType};
use crate::text::to_paragraphs;

/// Extracts documentation from the purpose-built annotations reported by
/// the introspection collaborator.
#[derive(Debug, Default)]
pub struct AnnotationExtractor;

impl Extractor for AnnotationExtractor {
    fn command_synopsis(&self, ty: &TypeMeta) -> Option<String> {
        ty.synopsis.as_deref().map(|text| text.trim().to_string())
    }

    fn command_description(&self, ty: &TypeMeta) -> Option<String> {
        ty.description.as_deref().map(|text| text.trim().to_string())
    }

    /// The help text of the last declaration that carries one. A property
    /// declared in several parameter sets keeps the most recent wording.
    fn parameter_description(&self, prop: &PropertyMeta) -> Option<String> {
        prop.declarations
            .iter()
            .rev()
            .find_map(|decl| decl.help.as_deref())
            .map(|text| text.trim().to_string())
    }

    /// One example per annotation, in declared order. The annotation list
    /// is never absent, only empty, so this extractor cannot distinguish
    /// "no examples declared" from "documented as having none"; it always
    /// answers, and the chain skips the answer when it is empty.
    fn command_examples(&self, ty: &TypeMeta) -> Option<Vec<CommandExample>> {
        Some(
            ty.examples
                .iter()
                .map(|decl| CommandExample {
                    title: decl.title.clone(),
                    description: to_paragraphs(decl.description.as_deref().unwrap_or_default()),
                    code: decl.code.clone(),
                    remarks: to_paragraphs(decl.remarks.as_deref().unwrap_or_default()),
                })
                .collect(),
        )
    }

    /// Output-type annotations flattened to one value per named type.
    fn command_return_values(&self, ty: &TypeMeta) -> Option<Vec<CommandValue>> {
        Some(
            ty.output_types
                .iter()
                .flat_map(|decl| decl.type_names.iter())
                .map(|name| CommandValue {
                    data_type: DataType {
                        name: name.clone(),
                        ..DataType::default()
                    },
                    ..CommandValue::default()
                })
                .collect(),
        )
    }

    fn command_input_types(&self, ty: &TypeMeta) -> Option<Vec<CommandValue>> {
        Some(
            ty.input_types
                .iter()
                .map(|decl| CommandValue {
                    data_type: DataType {
                        name: if decl.name.is_empty() {
                            "None".to_string()
                        } else {
                            decl.name.clone()
                        },
                        uri: decl.uri.clone(),
                        description: Vec::new(),
                    },
                    description: decl
                        .description
                        .as_deref()
                        .map(to_paragraphs)
                        .unwrap_or_default(),
                })
                .collect(),
        )
    }
}
