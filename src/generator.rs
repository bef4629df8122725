//! Help generation — walks a command type's metadata, merges per-property
//! parameter declarations, groups parameters into syntax items, and
//! assembles the final document via the extractor chain.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::GenError;
use crate::extract::annotations::AnnotationExtractor;
use crate::extract::comments::CommentExtractor;
use crate::extract::Extractor;
use crate::meta::{self, ParameterDecl, PropertyMeta, TypeMeta, TypeName, COMMON_NAMESPACE};
use crate::model::{
    Command, CommandDetails, CommandExample, CommandValue, HelpItems, Parameter, ParameterValue,
    PipelineInput, SyntaxItem,
};
use crate::text::to_paragraphs;

/// Generates help documentation for command types.
///
/// Documentation is pulled through an ordered chain of [`Extractor`]s;
/// earlier extractors win, and an extractor that answers with an empty
/// string still terminates the chain for the single-value queries.
pub struct MamlGenerator {
    extractors: Vec<Box<dyn Extractor>>,
}

impl Default for MamlGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MamlGenerator {
    /// A generator with the default extractors: declarative annotations,
    /// falling back to companion structured-comment documents.
    pub fn new() -> Self {
        Self::with_extractors(vec![
            Box::new(AnnotationExtractor),
            Box::new(CommentExtractor::new()),
        ])
    }

    /// A generator with a custom extractor chain, consulted in order.
    pub fn with_extractors(extractors: Vec<Box<dyn Extractor>>) -> Self {
        Self { extractors }
    }

    /// Generate help for every command type in a compiled unit.
    ///
    /// Types that do not satisfy the command contract are skipped; this is
    /// a thin fold over [`MamlGenerator::generate`].
    pub fn generate_unit(&self, types: &[TypeMeta]) -> Result<HelpItems, GenError> {
        let mut help = HelpItems::default();
        for ty in types.iter().filter(|ty| meta::is_command(ty)) {
            help.commands.push(self.generate(ty)?);
        }
        Ok(help)
    }

    /// Generate help for one command type.
    ///
    /// Fails with [`GenError::NotACommand`] when the type does not satisfy
    /// the command contract; no partial document is produced.
    pub fn generate(&self, ty: &TypeMeta) -> Result<Command, GenError> {
        if !meta::is_command(ty) {
            return Err(GenError::NotACommand(ty.full_name.clone()));
        }
        let decl = ty
            .command
            .as_ref()
            .ok_or_else(|| GenError::NotACommand(ty.full_name.clone()))?;

        let mut command = Command {
            details: CommandDetails {
                name: format!("{}-{}", decl.verb, decl.noun),
                synopsis: to_paragraphs(&self.synopsis(ty).unwrap_or_default()),
                verb: decl.verb.clone(),
                noun: decl.noun.clone(),
            },
            description: to_paragraphs(&self.description(ty).unwrap_or_default()),
            ..Command::default()
        };

        // Non-readable properties sort before readable ones; the sort is
        // stable, so declaration order is kept within each group.
        let mut properties: Vec<&PropertyMeta> = ty.properties.iter().collect();
        properties.sort_by_key(|prop| prop.can_read);

        // Parameter-set name -> member parameters, in property order.
        let mut sets: HashMap<String, Vec<Arc<Parameter>>> = HashMap::new();
        for prop in properties {
            let Some(decls) = meta::parameter_decls(prop) else {
                continue;
            };
            let (parameter, set_names) = self.build_parameter(ty, prop, decls);
            let parameter = Arc::new(parameter);
            command.parameters.push(Arc::clone(&parameter));
            for name in set_names {
                sets.entry(name).or_default().push(Arc::clone(&parameter));
            }
        }

        let mut set_names: Vec<String> = sets.keys().cloned().collect();
        set_names.sort();
        for name in &set_names {
            command.syntax.push(SyntaxItem {
                command_name: command.details.name.clone(),
                parameters: sets.remove(name).unwrap_or_default(),
            });
        }

        command.examples = self.examples(ty);
        command
            .examples
            .sort_by(|a, b| a.title.cmp(&b.title));
        command.return_values = self.return_values(ty);
        command.input_types = self.input_types(ty);

        Ok(command)
    }

    /// Build one parameter from a property and its declarations, merging
    /// every declaration into a single canonical description. Also yields
    /// the property's parameter-set names, last-declared first.
    fn build_parameter(
        &self,
        ty: &TypeMeta,
        prop: &PropertyMeta,
        decls: &[ParameterDecl],
    ) -> (Parameter, Vec<String>) {
        let mut parameter = Parameter {
            name: prop.name.clone(),
            aliases: if prop.aliases.is_empty() {
                "none".to_string()
            } else {
                prop.aliases.join(", ")
            },
            description: self
                .parameter_description(prop)
                .map(|text| to_paragraphs(&text))
                .unwrap_or_default(),
            value: ParameterValue {
                data_type: display_type_name(&prop.value_type),
                is_mandatory: !prop.value_type.is_switch,
                ..ParameterValue::default()
            },
            supports_globbing: prop.supports_wildcards,
            ..Parameter::default()
        };

        if let Some(default) = ty
            .defaults
            .as_ref()
            .and_then(|probe| probe.property_default(&prop.name))
        {
            parameter.default_value = default;
        }

        if let Some(position) = decls.iter().rev().find_map(|decl| decl.position) {
            parameter.position = position.to_string();
        }

        let mut set_names = Vec::new();
        for decl in decls {
            parameter.is_mandatory = parameter.is_mandatory || decl.mandatory;
            if decl.from_pipeline {
                parameter.pipeline_input |= PipelineInput::BY_VALUE;
            }
            if decl.from_pipeline_by_name {
                parameter.pipeline_input |= PipelineInput::BY_PROPERTY_NAME;
            }
            if decl.from_remaining_args {
                parameter.pipeline_input |= PipelineInput::FROM_REMAINING_ARGUMENTS;
            }
            set_names.insert(0, decl.parameter_set.clone());
        }

        (parameter, set_names)
    }

    fn synopsis(&self, ty: &TypeMeta) -> Option<String> {
        self.extractors
            .iter()
            .find_map(|extractor| extractor.command_synopsis(ty))
    }

    fn description(&self, ty: &TypeMeta) -> Option<String> {
        self.extractors
            .iter()
            .find_map(|extractor| extractor.command_description(ty))
    }

    fn parameter_description(&self, prop: &PropertyMeta) -> Option<String> {
        self.extractors
            .iter()
            .find_map(|extractor| extractor.parameter_description(prop))
    }

    /// First extractor yielding a non-empty example list; an empty list is
    /// not final for list queries.
    fn examples(&self, ty: &TypeMeta) -> Vec<CommandExample> {
        self.extractors
            .iter()
            .filter_map(|extractor| extractor.command_examples(ty))
            .find(|list| !list.is_empty())
            .unwrap_or_default()
    }

    fn return_values(&self, ty: &TypeMeta) -> Vec<CommandValue> {
        self.extractors
            .iter()
            .filter_map(|extractor| extractor.command_return_values(ty))
            .find(|list| !list.is_empty())
            .unwrap_or_default()
    }

    fn input_types(&self, ty: &TypeMeta) -> Vec<CommandValue> {
        self.extractors
            .iter()
            .filter_map(|extractor| extractor.command_input_types(ty))
            .find(|list| !list.is_empty())
            .unwrap_or_default()
    }
}

/// Render a value type's name: simple name for types in the common
/// namespace, fully qualified otherwise.
pub fn display_type_name(ty: &TypeName) -> String {
    if ty.namespace == COMMON_NAMESPACE {
        ty.name.clone()
    } else {
        ty.qualified()
    }
}
