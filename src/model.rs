//! MAML document model — plain records mirroring the help-content XML
//! vocabulary, with the schema's defaults baked into `Default` impls.
//!
//! Serialization (element names, namespaces, ordering) lives in
//! [`crate::render`]; the comments here name the element or attribute each
//! field ends up in.

use std::ops::{BitOr, BitOrAssign};
use std::sync::Arc;

/// The root `helpItems` element of a help document.
#[derive(Debug, Clone)]
pub struct HelpItems {
    /// The `schema` attribute. Always "maml" in practice.
    pub schema: String,
    /// One `command:command` element per documented command.
    pub commands: Vec<Command>,
}

impl Default for HelpItems {
    fn default() -> Self {
        Self {
            schema: "maml".to_string(),
            commands: Vec::new(),
        }
    }
}

/// One documented command (`command:command`).
#[derive(Debug, Clone, Default)]
pub struct Command {
    /// `command:details`
    pub details: CommandDetails,
    /// Long description paragraphs (`maml:description/maml:para`).
    pub description: Vec<String>,
    /// One `command:syntaxItem` per parameter set, ordered by set name.
    pub syntax: Vec<SyntaxItem>,
    /// All parameters (`command:parameters`), in property order.
    pub parameters: Vec<Arc<Parameter>>,
    /// Usage examples (`command:examples`), ordered by title.
    pub examples: Vec<CommandExample>,
    /// `command:returnValues`
    pub return_values: Vec<CommandValue>,
    /// `command:inputTypes`
    pub input_types: Vec<CommandValue>,
}

/// `command:details` — identity and synopsis of a command.
#[derive(Debug, Clone, Default)]
pub struct CommandDetails {
    /// `command:name`; always "{verb}-{noun}".
    pub name: String,
    /// Synopsis paragraphs (`maml:description/maml:para`).
    pub synopsis: Vec<String>,
    /// `command:verb`
    pub verb: String,
    /// `command:noun`
    pub noun: String,
}

/// One parameter set's calling shape (`command:syntaxItem`).
///
/// A syntax item aggregates references to parameters owned by the
/// command's `parameters` list; it never owns a parameter of its own.
#[derive(Debug, Clone, Default)]
pub struct SyntaxItem {
    /// `maml:name` — back-reference to the owning command's name.
    pub command_name: String,
    /// The member parameters, in property order.
    pub parameters: Vec<Arc<Parameter>>,
}

/// One property-derived parameter (`command:parameter`).
#[derive(Debug, Clone)]
pub struct Parameter {
    /// `maml:name`
    pub name: String,
    /// Description paragraphs (`maml:description/maml:para`).
    pub description: Vec<String>,
    /// `command:parameterValue`
    pub value: ParameterValue,
    /// `dev:defaultValue`; "None" when no default could be observed.
    pub default_value: String,
    /// The `required` attribute.
    pub is_mandatory: bool,
    /// The `variableLength` attribute. Always true in official documentation.
    pub is_variable_length: bool,
    /// The `globbing` attribute.
    pub supports_globbing: bool,
    /// The `pipelineInput` attribute.
    pub pipeline_input: PipelineInput,
    /// The `position` attribute: "named", or the 0-based position as text.
    pub position: String,
    /// The `aliases` attribute: "Alias1, Alias2, ..." or "none".
    pub aliases: String,
}

impl Default for Parameter {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: Vec::new(),
            value: ParameterValue::default(),
            default_value: "None".to_string(),
            is_mandatory: false,
            is_variable_length: true,
            supports_globbing: false,
            pipeline_input: PipelineInput::NONE,
            position: "named".to_string(),
            aliases: "none".to_string(),
        }
    }
}

/// `command:parameterValue` — the value a parameter accepts.
#[derive(Debug, Clone, Default)]
pub struct ParameterValue {
    /// Element text: the value's type name.
    pub data_type: String,
    /// The `required` attribute: false only for switch-like toggles.
    pub is_mandatory: bool,
    /// The `variableLength` attribute.
    pub is_variable_length: bool,
}

/// One usage example (`command:example`).
#[derive(Debug, Clone, Default)]
pub struct CommandExample {
    /// `maml:title`
    pub title: String,
    /// Introduction paragraphs (`maml:introduction/maml:para`).
    pub description: Vec<String>,
    /// `dev:code`
    pub code: String,
    /// Trailing remarks paragraphs (`dev:remarks/maml:para`).
    pub remarks: Vec<String>,
}

/// A return value or input type (`command:returnValue` / `command:inputType`).
#[derive(Debug, Clone, Default)]
pub struct CommandValue {
    /// `dev:type`
    pub data_type: DataType,
    /// Narrative paragraphs about the value, separate from the type's own
    /// description (`maml:description/maml:para`).
    pub description: Vec<String>,
}

/// `dev:type` — a named data type with optional link and description.
#[derive(Debug, Clone, Default)]
pub struct DataType {
    /// `maml:name`
    pub name: String,
    /// `maml:uri`
    pub uri: Option<String>,
    /// The type's own description paragraphs.
    pub description: Vec<String>,
}

/// Pipeline input capabilities of a parameter, as a bitset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineInput(u8);

impl PipelineInput {
    /// The parameter does not take its value from the pipeline.
    pub const NONE: Self = Self(0);
    /// The value can come from the pipeline directly.
    pub const BY_VALUE: Self = Self(1);
    /// The value can come from a same-named property of pipeline objects.
    pub const BY_PROPERTY_NAME: Self = Self(2);
    /// The value can come from remaining arguments.
    pub const FROM_REMAINING_ARGUMENTS: Self = Self(4);

    /// The `pipelineInput` attribute value.
    ///
    /// The external vocabulary is a closed set of eight spellings, not a
    /// generic flags dump; the combinations are enumerated exhaustively.
    pub fn as_maml(self) -> &'static str {
        match self.0 & 0b111 {
            0 => "false",
            1 => "true (ByValue)",
            2 => "true (ByPropertyName)",
            3 => "true (ByPropertyName, ByValue)",
            4 => "true (FromRemainingArguments)",
            5 => "true (ByValue, FromRemainingArguments)",
            6 => "true (ByPropertyName, FromRemainingArguments)",
            7 => "true (ByPropertyName, ByValue, FromRemainingArguments)",
            _ => unreachable!(),
        }
    }
}

impl BitOr for PipelineInput {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for PipelineInput {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}
