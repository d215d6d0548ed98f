//! Object arena for one output file.
//!
//! Objects are numbered in insertion order starting at 1. An id never changes,
//! so an object can be added as a placeholder, referenced by later objects and
//! overwritten once the ids it points to are known.

pub use catalog::Catalog;
pub use pages::{Page, PageTree, Resources};
pub use resources::{jpeg_image, Type1Font};

use crate::{
    error::PbError,
    pdf::Object,
    simple_encode::SimpleEncoder,
    writer::Encoder,
};

pub mod catalog;
pub mod pages;
pub mod resources;

/// Dictionary type names
pub(crate) mod dict_types {
    pub const CATALOG: &[u8] = b"Catalog";
    pub const PAGES: &[u8] = b"Pages";
    pub const PAGE: &[u8] = b"Page";
    pub const FONT: &[u8] = b"Font";
    pub const XOBJECT: &[u8] = b"XObject";
}

pub(crate) const K_TYPE: &[u8] = b"Type";
pub(crate) const K_SUBTYPE: &[u8] = b"Subtype";
pub(crate) const K_PARENT: &[u8] = b"Parent";
pub(crate) const K_KIDS: &[u8] = b"Kids";
pub(crate) const K_COUNT: &[u8] = b"Count";
pub(crate) const K_PAGES: &[u8] = b"Pages";
pub(crate) const K_MEDIA_BOX: &[u8] = b"MediaBox";
pub(crate) const K_RESOURCES: &[u8] = b"Resources";
pub(crate) const K_CONTENTS: &[u8] = b"Contents";
pub(crate) const K_FONT: &[u8] = b"Font";
pub(crate) const K_XOBJECT: &[u8] = b"XObject";
pub(crate) const K_LENGTH: &[u8] = b"Length";
pub(crate) const K_FILTER: &[u8] = b"Filter";

pub const DEFAULT_VERSION: (u8, u8) = (1, 7);

/// Stable 1-based identifier of an object inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub(crate) u32);

impl ObjectId {
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub(crate) version: (u8, u8),
    pub(crate) objects: Vec<Object>,
    pub(crate) root: Option<ObjectId>,
    pub(crate) info: Option<ObjectId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            version: DEFAULT_VERSION,
            objects: Vec::new(),
            root: None,
            info: None,
        }
    }

    /// Append an object and return its id.
    pub fn add_object(&mut self, obj: impl Into<Object>) -> ObjectId {
        self.objects.push(obj.into());
        let id = ObjectId(u32::try_from(self.objects.len()).unwrap_or(u32::MAX));
        log::trace!("added object {}", id);
        id
    }

    /// Overwrite the body of an object that was added before.
    pub fn replace_object(&mut self, id: ObjectId, obj: impl Into<Object>) -> Result<(), PbError> {
        let slot = self.slot_mut(id).ok_or(PbError::UnknownObject(id.0))?;
        *slot = obj.into();
        log::trace!("replaced object {}", id);
        Ok(())
    }

    pub fn get(&self, id: ObjectId) -> Option<&Object> {
        let index = usize::try_from(id.0).ok()?.checked_sub(1)?;
        self.objects.get(index)
    }

    fn slot_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
        let index = usize::try_from(id.0).ok()?.checked_sub(1)?;
        self.objects.get_mut(index)
    }

    /// Objects with their ids, in insertion order.
    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &Object)> {
        self.objects
            .iter()
            .enumerate()
            .map(|(i, obj)| (ObjectId(i as u32 + 1), obj))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn set_root(&mut self, id: ObjectId) -> Result<(), PbError> {
        self.get(id).ok_or(PbError::UnknownObject(id.0))?;
        self.root = Some(id);
        Ok(())
    }

    /// The catalog id. Defaults to the first object when none was set.
    pub fn root(&self) -> ObjectId {
        self.root.unwrap_or(ObjectId(1))
    }

    pub fn set_info(&mut self, id: ObjectId) -> Result<(), PbError> {
        self.get(id).ok_or(PbError::UnknownObject(id.0))?;
        self.info = Some(id);
        Ok(())
    }

    pub fn info(&self) -> Option<ObjectId> {
        self.info
    }

    pub fn version(&self) -> (u8, u8) {
        self.version
    }

    /// Header, framed objects, xref table and trailer in one buffer.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(SimpleEncoder::encoded_len(self));
        SimpleEncoder::write_to(self, &mut out);
        out
    }
}
