use super::{dict_types, ObjectId, K_PAGES, K_TYPE};
use crate::pdf::{Dictionary, Name};

/// Document catalog: the root of the object graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Catalog {
    pub pages: ObjectId,
}

impl From<Catalog> for Dictionary {
    fn from(catalog: Catalog) -> Self {
        Dictionary::new()
            .with(K_TYPE, Name::from(dict_types::CATALOG))
            .with(K_PAGES, catalog.pages)
    }
}
