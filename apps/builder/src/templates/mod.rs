// Template Registry: the available layouts, their markup, and the binding table
// that maps logical resume fields onto nodes of each layout.

pub mod bindings;
pub mod layouts;
pub mod registry;

use serde::{Deserialize, Serialize};

pub use bindings::{BindingTable, ContactField};
pub use registry::TemplateRegistry;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateId {
    #[default]
    Modern,
    Classic,
    Creative,
    Minimal,
}

impl TemplateId {
    /// Document order of the template roots. The first one is the export fallback.
    pub const ALL: [TemplateId; 4] = [
        TemplateId::Modern,
        TemplateId::Classic,
        TemplateId::Creative,
        TemplateId::Minimal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TemplateId::Modern => "modern",
            TemplateId::Classic => "classic",
            TemplateId::Creative => "creative",
            TemplateId::Minimal => "minimal",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    pub fn label(self) -> &'static str {
        match self {
            TemplateId::Modern => "Modern",
            TemplateId::Classic => "Classic",
            TemplateId::Creative => "Creative",
            TemplateId::Minimal => "Minimal",
        }
    }

    /// Namespace prefix for binding ids: empty for the default layout, `<id>-` otherwise.
    pub fn prefix(self) -> String {
        match self {
            TemplateId::Modern => String::new(),
            other => format!("{}-", other.as_str()),
        }
    }

    /// Element id of the template's root node.
    pub fn root_id(self) -> String {
        format!("template-{}", self.as_str())
    }
}

impl std::fmt::Display for TemplateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixes() {
        assert_eq!(TemplateId::Modern.prefix(), "");
        assert_eq!(TemplateId::Classic.prefix(), "classic-");
        assert_eq!(TemplateId::Minimal.prefix(), "minimal-");
    }

    #[test]
    fn test_from_name() {
        assert_eq!(TemplateId::from_name("creative"), Some(TemplateId::Creative));
        assert_eq!(TemplateId::from_name("Creative"), None);
        assert_eq!(TemplateId::from_name("retro"), None);
    }
}
