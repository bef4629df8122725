//! mamlgen — generate MAML help documentation for command plugins from
//! their static metadata.
//!
//! An external introspection step describes each candidate plugin type as a
//! [`meta::TypeMeta`] record: its command declaration, its properties and
//! their parameter declarations, and the documentation annotations attached
//! to it. [`MamlGenerator`] turns one such record into a [`model::Command`]
//! document, pulling prose through an ordered chain of
//! [`extract::Extractor`]s — declarative annotations first, then the
//! companion structured-comment document stored next to the compiled unit.
//! [`render`] serializes the result as schema-exact MAML XML.

pub mod error;
pub mod extract;
pub mod generator;
pub mod meta;
pub mod model;
pub mod render;
pub mod text;

pub use error::GenError;
pub use extract::annotations::AnnotationExtractor;
pub use extract::comments::CommentExtractor;
pub use extract::Extractor;
pub use generator::MamlGenerator;
pub use render::{render_command, render_help};
pub use text::to_paragraphs;
