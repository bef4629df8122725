//! Documentation extractors — pluggable sources of command documentation,
//! consulted in order by the generator.

pub mod annotations;
pub mod comments;

use crate::meta::{PropertyMeta, TypeMeta};
use crate::model::{CommandExample, CommandValue};

/// A mechanism for extracting command documentation from static metadata.
///
/// Every query distinguishes no-opinion from an empty-but-present answer:
/// `None` means this extractor has nothing to say and the caller should
/// consult the next one in the chain; `Some` is an answer, even when the
/// string or list inside is empty. For the single-value queries an empty
/// string terminates the chain; for the list queries the generator keeps
/// asking past an empty list.
pub trait Extractor {
    /// The command's synopsis.
    fn command_synopsis(&self, ty: &TypeMeta) -> Option<String>;

    /// The command's long description.
    fn command_description(&self, ty: &TypeMeta) -> Option<String>;

    /// The description of one parameter property.
    fn parameter_description(&self, prop: &PropertyMeta) -> Option<String>;

    /// The command's usage examples.
    fn command_examples(&self, ty: &TypeMeta) -> Option<Vec<CommandExample>>;

    /// The command's return values.
    fn command_return_values(&self, ty: &TypeMeta) -> Option<Vec<CommandValue>>;

    /// The command's input types.
    fn command_input_types(&self, ty: &TypeMeta) -> Option<Vec<CommandValue>>;
}
