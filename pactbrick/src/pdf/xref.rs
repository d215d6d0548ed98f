/// Cross-reference section of a classic (table based) PDF file.
///
/// Entry `i` holds the byte offset of object `i`. Entry 0 is the head of the
/// free list and always free.
#[derive(Debug, Clone, PartialEq)]
pub struct Xref(Vec<XrefEntry>);

impl Xref {
    pub fn entries(&self) -> &[XrefEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn used_objects(&self) -> impl Iterator<Item = &UsedObject> {
        self.0
            .iter()
            .filter_map(|entry| if let XrefEntry::Used(u) = entry { Some(u) } else { None })
    }

    pub fn free_objects(&self) -> impl Iterator<Item = &FreeObject> {
        self.0
            .iter()
            .filter_map(|entry| if let XrefEntry::Free(u) = entry { Some(u) } else { None })
    }

    /// Byte offset of a used object.
    pub fn offset_of(&self, number: usize) -> Option<usize> {
        self.used_objects()
            .find(|u| u.number == number)
            .map(|u| u.byte_offset)
    }
}

impl From<Vec<XrefEntry>> for Xref {
    fn from(v: Vec<XrefEntry>) -> Self {
        Xref(v)
    }
}

/// Generation of the free-list head.
pub const FREE_HEAD_GENERATION: usize = 65535;

/// Width of one table record including its two-byte line end.
pub const XREF_RECORD_LEN: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct FreeObject {
    /// Number of this object
    pub number: usize,
    /// Next generation number that should be used
    pub generation: usize,
    /// Next free object number
    pub next_free: usize,
}

impl FreeObject {
    pub fn head() -> Self {
        Self {
            number: 0,
            generation: FREE_HEAD_GENERATION,
            next_free: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UsedObject {
    /// Number of this object
    pub number: usize,
    /// The position of this object in the pdf file in bytes, starting from the
    /// beginning of the PDF.
    pub byte_offset: usize,
    pub generation: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum XrefEntry {
    Free(FreeObject),
    Used(UsedObject),
}

impl XrefEntry {
    pub fn number(&self) -> usize {
        match self {
            XrefEntry::Free(FreeObject { number, .. }) => *number,
            XrefEntry::Used(UsedObject { number, .. }) => *number,
        }
    }
}

impl From<UsedObject> for XrefEntry {
    fn from(v: UsedObject) -> Self {
        Self::Used(v)
    }
}

impl From<FreeObject> for XrefEntry {
    fn from(v: FreeObject) -> Self {
        Self::Free(v)
    }
}
