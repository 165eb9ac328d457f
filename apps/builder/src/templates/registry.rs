use tracing::info;

use crate::dom::{Display, Document, DocumentError, NodeId};
use crate::templates::{BindingTable, TemplateId};

/// Tracks which layout is active. Exactly one root is displayed after every `activate`.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    active: TemplateId,
}

impl TemplateRegistry {
    pub fn active(&self) -> TemplateId {
        self.active
    }

    /// Hides every root and clears every selector, then shows `id`. Re-activating the
    /// current template is allowed; the caller re-projects either way.
    pub fn activate(
        &mut self,
        doc: &mut Document,
        bindings: &BindingTable,
        id: TemplateId,
    ) -> Result<(), DocumentError> {
        for template in TemplateId::ALL {
            let b = bindings.template(template);
            doc.set_display(b.root, Display::None)?;
            if let Some(button) = b.button {
                doc.remove_class(button, "active")?;
            }
        }

        let target = bindings.template(id);
        doc.set_display(target.root, Display::Block)?;
        if let Some(button) = target.button {
            doc.add_class(button, "active")?;
        }

        if self.active != id {
            info!("Switched template {} -> {}", self.active, id);
        }
        self.active = id;
        Ok(())
    }
}

/// The root to export: the one whose display is not `none`, else the first root in
/// document order.
pub fn export_root(doc: &Document, bindings: &BindingTable) -> Result<NodeId, DocumentError> {
    let mut fallback = None;
    let mut visible = None;
    for (_, root) in bindings.roots() {
        fallback.get_or_insert(root);
        if doc.display(root)? != Display::None {
            visible = Some(root);
        }
    }
    visible
        .or(fallback)
        .ok_or_else(|| DocumentError::MissingElement("resume-template".to_string()))
}
