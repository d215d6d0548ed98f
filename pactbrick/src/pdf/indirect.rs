use std::fmt::Display;

use super::ObjectId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Reference {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl Reference {
    pub fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn id(&self) -> ObjectId {
        ObjectId(self.index)
    }
}

impl From<ObjectId> for Reference {
    fn from(id: ObjectId) -> Self {
        Self {
            index: id.0,
            generation: 0,
        }
    }
}

impl Display for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} R", self.index, self.generation)
    }
}
