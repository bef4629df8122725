//! Introspection surface — the static metadata an external type-discovery
//! collaborator reports about candidate plugin types, and the predicates
//! that decide command-hood and parameter-hood over it.
//!
//! Nothing in this crate discovers types or constructs command instances;
//! hosts build `TypeMeta` records however they enumerate their plugins and
//! hand them to [`crate::MamlGenerator`].

use std::path::PathBuf;
use std::sync::Arc;

/// The namespace whose types are rendered by simple name; everything else
/// is fully qualified.
pub const COMMON_NAMESPACE: &str = "System";

/// The command-declaration annotation: verb and noun of the command.
#[derive(Debug, Clone, Default)]
pub struct CommandDecl {
    pub verb: String,
    pub noun: String,
}

/// One declared usage example.
#[derive(Debug, Clone, Default)]
pub struct ExampleDecl {
    pub title: String,
    pub description: Option<String>,
    pub code: String,
    pub remarks: Option<String>,
}

/// One declared output-type annotation; a single annotation may name
/// several types.
#[derive(Debug, Clone, Default)]
pub struct OutputTypeDecl {
    pub type_names: Vec<String>,
}

/// One declared input-type annotation.
#[derive(Debug, Clone, Default)]
pub struct InputTypeDecl {
    pub name: String,
    pub uri: Option<String>,
    pub description: Option<String>,
}

/// A property's value type.
#[derive(Debug, Clone, Default)]
pub struct TypeName {
    /// Simple name, e.g. "String".
    pub name: String,
    /// Declaring namespace, e.g. "System".
    pub namespace: String,
    /// Whether the type is a pure on/off toggle (a switch parameter).
    pub is_switch: bool,
}

impl TypeName {
    /// The fully qualified name.
    pub fn qualified(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }
}

/// One parameter declaration on a property. A property carries one
/// declaration per parameter set it participates in.
#[derive(Debug, Clone, Default)]
pub struct ParameterDecl {
    pub mandatory: bool,
    /// Declared position, if any. `None` means the parameter is named.
    pub position: Option<i32>,
    pub from_pipeline: bool,
    pub from_pipeline_by_name: bool,
    pub from_remaining_args: bool,
    /// The parameter set this declaration belongs to; "" is the default set.
    pub parameter_set: String,
    /// Declared help text for the parameter.
    pub help: Option<String>,
}

/// Static metadata for one property of a command type.
#[derive(Debug, Clone, Default)]
pub struct PropertyMeta {
    pub name: String,
    /// Full name of the declaring type, used for companion-document lookup.
    pub declaring_type: String,
    /// Location of the declaring type's compiled unit; empty if unknown.
    pub unit: PathBuf,
    pub is_public: bool,
    pub can_read: bool,
    pub value_type: TypeName,
    /// Declared alias names, in declaration order.
    pub aliases: Vec<String>,
    /// Whether the property carries a wildcard-support annotation.
    pub supports_wildcards: bool,
    /// Parameter declarations, in declaration order.
    pub declarations: Vec<ParameterDecl>,
}

/// Static metadata for one candidate plugin type.
#[derive(Clone, Default)]
pub struct TypeMeta {
    /// Fully qualified type name.
    pub full_name: String,
    /// Location of the type's compiled unit; empty if unknown.
    pub unit: PathBuf,
    pub is_public: bool,
    pub is_abstract: bool,
    /// Whether the type implements the command base capability.
    pub implements_command: bool,
    /// The command-declaration annotation, if present.
    pub command: Option<CommandDecl>,
    /// Synopsis annotation text, if declared.
    pub synopsis: Option<String>,
    /// Description annotation text, if declared.
    pub description: Option<String>,
    /// Example annotations, in declaration order.
    pub examples: Vec<ExampleDecl>,
    /// Output-type annotations, in declaration order.
    pub output_types: Vec<OutputTypeDecl>,
    /// Input-type annotations, in declaration order.
    pub input_types: Vec<InputTypeDecl>,
    /// Properties, in declaration order.
    pub properties: Vec<PropertyMeta>,
    /// Default-value probe for the type, if it can be constructed without
    /// arguments.
    pub defaults: Option<Arc<dyn DefaultValueProbe>>,
}

/// Constructs a throwaway zero-argument instance of the command type and
/// reads one property's rendered value.
///
/// Implementations construct, read, and discard; the generator never sees
/// the instance. A missing constructor, a failed construction, or a
/// value-less property all yield `None` — never an error.
pub trait DefaultValueProbe: Send + Sync {
    fn property_default(&self, property: &str) -> Option<String>;
}

/// Does this type satisfy the command contract?
///
/// Public, non-abstract, implements the command capability, and carries a
/// command declaration with a non-empty verb and noun.
pub fn is_command(ty: &TypeMeta) -> bool {
    ty.is_public
        && !ty.is_abstract
        && ty.implements_command
        && ty
            .command
            .as_ref()
            .is_some_and(|decl| !decl.verb.is_empty() && !decl.noun.is_empty())
}

/// The parameter declarations of a property, or `None` if the property is
/// not a parameter (non-public, or no declarations).
pub fn parameter_decls(prop: &PropertyMeta) -> Option<&[ParameterDecl]> {
    if prop.is_public && !prop.declarations.is_empty() {
        Some(&prop.declarations)
    } else {
        None
    }
}
