//! Reader for files with a classic xref table, as written by
//! [`Document::serialize`](crate::pdf::Document::serialize).
//!
//! The file is located from its tail: `%%EOF`, then `startxref`, then the
//! trailer. Objects are parsed on demand from the offsets in the xref table.

use fnv::FnvHashMap;
use nom::{bytes, character, IResult, InputTake};
use nom_locate::LocatedSpan;
use nom_tracable::{tracable_parser, TracableInfo};

use self::error::{PbParseError, PbParseErrorKind};
use crate::{
    error::PbError,
    pdf::{
        document::{K_KIDS, K_PAGES},
        trailer::TrailerError,
        xref::FREE_HEAD_GENERATION,
        Dictionary, Object, Trailer, Xref, XrefEntry,
    },
};

pub use self::{
    object::{indirect_object, object},
    trailer::trailer_tail,
    xref::{eof_marker_tail, startxref_tail, xref_table},
};

pub mod error;
pub(crate) mod object;
mod trailer;
mod xref;

pub type Span<'a> = LocatedSpan<&'a [u8], TracableInfo>;
pub type PbParseResult<'a, O> = IResult<Span<'a>, O, PbParseError<Span<'a>>>;

const HEADER: &[u8] = b"%PDF-";

/// Span over `bytes` with tracing switched off.
pub fn span(bytes: &[u8]) -> Span<'_> {
    LocatedSpan::new_extra(bytes, TracableInfo::new())
}

/// Run `parser` at each position of the last `limit` bytes, starting from the
/// end. Returns the input before the match together with what the parser left
/// over and produced.
fn backward_search<'a, O>(
    limit: usize,
    mut parser: impl FnMut(Span<'a>) -> PbParseResult<'a, O>,
) -> impl FnMut(Span<'a>) -> PbParseResult<'a, (Span<'a>, O)> {
    move |input: Span<'a>| {
        let len = input.fragment().len();
        for start in (len.saturating_sub(limit)..len).rev() {
            let (tail, head) = input.take_split(start);
            if let Ok((trailing, out)) = parser(tail) {
                return Ok((head, (trailing, out)));
            }
        }
        Err(nom::Err::Error(PbParseError::new(
            input,
            PbParseErrorKind::BackwardSearchNotFound,
        )))
    }
}

fn version(input: Span) -> PbParseResult<(u8, u8)> {
    let (remainder, _) = bytes::complete::tag(HEADER)(input)?;
    let (remainder, major) = character::complete::u8(remainder)?;
    let (remainder, _) = character::complete::char('.')(remainder)?;
    let (remainder, minor) = character::complete::u8(remainder)?;
    let (remainder, _) = character::complete::multispace0(remainder)?;

    Ok((remainder, (major, minor)))
}

/// A comment of at least four bytes above 127 right after the header.
fn binary_indicator(input: Span) -> PbParseResult<bool> {
    let comment = character::complete::char::<_, PbParseError<Span>>('%')(input)
        .and_then(|(r, _)| character::complete::not_line_ending(r));
    match comment {
        Ok((r, comment)) if comment.fragment().len() >= 4 && comment.fragment().iter().all(|&b| b > 127) => {
            let (r, _) = character::complete::multispace0(r)?;
            Ok((r, true))
        }
        _ => Ok((input, false)),
    }
}

#[tracable_parser]
pub fn header(input: Span) -> PbParseResult<((u8, u8), bool)> {
    let (remainder, _) = character::complete::multispace0(input)?;
    let (remainder, version) = version(remainder)?;
    let (remainder, binary) = binary_indicator(remainder)?;

    Ok((remainder, (version, binary)))
}

/// The parts of a file needed to reach its objects.
#[derive(Debug, Clone)]
pub struct Structure<'a> {
    input: Span<'a>,
    pub version: (u8, u8),
    /// The header is followed by a binary marker comment.
    pub binary: bool,
    pub startxref: usize,
    pub xref: Xref,
    pub trailer: Trailer,
    offsets: FnvHashMap<u32, usize>,
}

/// Read header, xref table and trailer of `bytes`.
pub fn read_structure(bytes: &[u8]) -> Result<Structure<'_>, PbError> {
    Structure::read(span(bytes))
}

fn page_tree_error() -> PbError {
    PbError::Parse(PbParseErrorKind::PageTree)
}

impl<'a> Structure<'a> {
    /// Like [`read_structure`], with the tracing settings of `input`.
    pub fn read(input: Span<'a>) -> Result<Self, PbError> {
        let (_, (version, binary)) = header(input)?;
        let (tail, _) = eof_marker_tail(input)?;
        let (tail, startxref) = startxref_tail(tail)?;
        let (_, trailer) = trailer_tail(tail)?;

        if startxref >= input.fragment().len() {
            return Err(PbError::Parse(PbParseErrorKind::StartxrefInvalid));
        }
        let (at_xref, _) = input.take_split(startxref);
        let (_, xref) = xref_table(at_xref)?;

        if xref.len() != trailer.size {
            log::warn!("Trailer size {} but {} xref entries", trailer.size, xref.len());
        }

        let offsets = xref
            .used_objects()
            .filter_map(|used| Some((u32::try_from(used.number).ok()?, used.byte_offset)))
            .collect::<FnvHashMap<_, _>>();

        log::debug!(
            "read PDF-{}.{}: {} objects, xref at {}",
            version.0,
            version.1,
            offsets.len(),
            startxref
        );

        Ok(Self {
            input,
            version,
            binary,
            startxref,
            xref,
            trailer,
            offsets,
        })
    }

    pub fn bytes(&self) -> &'a [u8] {
        *self.input.fragment()
    }

    pub fn offset_of(&self, number: u32) -> Option<usize> {
        self.offsets.get(&number).copied()
    }

    /// Numbers of all objects in use, ascending.
    pub fn object_numbers(&self) -> Vec<u32> {
        let mut numbers: Vec<u32> = self.offsets.keys().copied().collect();
        numbers.sort_unstable();
        numbers
    }

    /// Parse the object stored under `number`.
    pub fn object(&self, number: u32) -> Result<Object, PbError> {
        let offset = self.offset_of(number).ok_or(PbError::UnknownObject(number))?;
        if offset >= self.input.fragment().len() {
            return Err(PbError::Parse(PbParseErrorKind::ObjectOffset(number)));
        }

        let (at, _) = self.input.take_split(offset);
        let (_, (reference, obj)) = indirect_object(at)?;
        if reference.index() != number {
            return Err(PbError::Parse(PbParseErrorKind::ObjectOffset(number)));
        }
        Ok(obj)
    }

    /// Follow `obj` if it is a reference.
    pub fn resolve(&self, obj: &Object) -> Result<Object, PbError> {
        match obj {
            Object::Reference(r) => self.object(r.index()),
            other => Ok(other.clone()),
        }
    }

    pub fn catalog(&self) -> Result<Dictionary, PbError> {
        match self.object(self.trailer.root.index())? {
            Object::Dictionary(dict) => Ok(dict),
            _ => Err(PbError::Parse(PbParseErrorKind::InvalidTrailer(TrailerError::InvalidRoot))),
        }
    }

    pub fn info(&self) -> Result<Option<Dictionary>, PbError> {
        match self.trailer.info {
            Some(info) => match self.object(info.index())? {
                Object::Dictionary(dict) => Ok(Some(dict)),
                _ => Err(PbError::Parse(PbParseErrorKind::InvalidTrailer(TrailerError::InvalidInfo))),
            },
            None => Ok(None),
        }
    }

    /// Page dictionaries reachable from the catalog, in page tree order.
    /// Nested page tree nodes are not followed.
    pub fn pages(&self) -> Result<Vec<Dictionary>, PbError> {
        let catalog = self.catalog()?;
        let tree = catalog.get(K_PAGES).ok_or_else(page_tree_error)?;
        let tree = match self.resolve(tree)? {
            Object::Dictionary(dict) => dict,
            _ => return Err(page_tree_error()),
        };

        let kids = tree.get(K_KIDS).and_then(Object::array).ok_or_else(page_tree_error)?;
        kids.iter()
            .map(|kid| match self.resolve(kid)? {
                Object::Dictionary(dict) => Ok(dict),
                _ => Err(page_tree_error()),
            })
            .collect()
    }

    /// Check that every xref record points at the header of the object it
    /// names, that the free-list head is intact and that the trailer size
    /// matches the table.
    pub fn verify(&self) -> Result<(), PbError> {
        match self.xref.entries().first() {
            Some(XrefEntry::Free(head)) if head.number == 0 && head.generation == FREE_HEAD_GENERATION => {}
            _ => return Err(PbError::Parse(PbParseErrorKind::XrefInvalid)),
        }

        if self.trailer.size != self.xref.len() {
            return Err(PbError::Parse(PbParseErrorKind::InvalidTrailer(TrailerError::InvalidSize)));
        }

        let bytes = self.bytes();
        for used in self.xref.used_objects() {
            let expected = format!("{} {} obj", used.number, used.generation);
            let found = bytes
                .get(used.byte_offset..)
                .map_or(false, |at| at.starts_with(expected.as_bytes()));
            if !found {
                let number = u32::try_from(used.number).unwrap_or(u32::MAX);
                return Err(PbError::Parse(PbParseErrorKind::ObjectOffset(number)));
            }
        }

        Ok(())
    }
}
