//! Documentation attachment for generated declarations.

use crate::model::identity::CallableId;
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

/// Receiver of description strings for declared names.
///
/// Purely informational; nothing in this crate reads documentation back to
/// make decisions.
pub trait DocSink: Send + Sync {
    fn attach(&self, id: &CallableId, text: &str);
}

/// In-memory documentation index.
#[derive(Debug, Default)]
pub struct DocIndex {
    entries: RwLock<BTreeMap<CallableId, String>>,
}

impl DocIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &CallableId) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DocSink for DocIndex {
    fn attach(&self, id: &CallableId, text: &str) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.clone(), text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::{DocIndex, DocSink};
    use crate::model::identity::{CallableId, ModuleId};

    #[test]
    fn latest_attachment_wins() {
        let docs = DocIndex::new();
        let id = CallableId::new(ModuleId::new("MyPkg").expect("valid module"), "FancyType")
            .expect("valid id");

        docs.attach(&id, "first");
        docs.attach(&id, "Constructs a fancy value.");
        assert_eq!(docs.get(&id).as_deref(), Some("Constructs a fancy value."));
        assert_eq!(docs.len(), 1);
    }
}
