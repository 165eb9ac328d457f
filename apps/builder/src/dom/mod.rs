pub mod document;
pub mod markup;

pub use document::{Document, DocumentError, NodeId};
pub use markup::{Display, Element, Markup};
