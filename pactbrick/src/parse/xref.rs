use nom::{branch, bytes, character, combinator, multi};
use nom_tracable::tracable_parser;

use super::{
    backward_search,
    error::{PbParseError, PbParseErrorKind},
    PbParseResult, Span,
};
use crate::{
    pdf::{
        xref::{FreeObject, UsedObject, XREF_RECORD_LEN},
        Xref, XrefEntry,
    },
    simple_encode::section::{EOF_MARKER, STARTXREF, XREF},
};

/// How far from the end of the file the markers are looked for.
const TAIL_SEARCH_LIMIT: usize = 1024;

fn invalid(input: Span, kind: PbParseErrorKind) -> nom::Err<PbParseError<Span>> {
    nom::Err::Failure(PbParseError::new(input, kind))
}

#[tracable_parser]
pub fn startxref_tail(input: Span) -> PbParseResult<usize> {
    let (remainder, (trailing, _)) = backward_search(
        STARTXREF.len() + TAIL_SEARCH_LIMIT,
        bytes::complete::tag_no_case(STARTXREF),
    )(input)?;
    let (trailing, _) = character::complete::multispace0(trailing)?;
    let (_, xref_pos) = character::complete::u64(trailing)?;
    let xref_pos: usize = xref_pos
        .try_into()
        .map_err(|_| nom::Err::Error(PbParseError::new(input, PbParseErrorKind::StartxrefInvalid)))?;

    Ok((remainder, xref_pos))
}

/// One subsection: `{first} {count}` and `count` records.
#[tracable_parser]
fn xref_subsection(input: Span) -> PbParseResult<Vec<XrefEntry>> {
    let (remainder, first) = character::complete::u32(input)?;
    let (remainder, _) = character::complete::multispace1(remainder)?;
    let (remainder, count) = character::complete::u32(remainder)?;
    let (remainder, _) = character::complete::multispace0(remainder)?;

    // never trust the count for more than the input can hold
    let capacity = (count as usize).min(remainder.fragment().len() / XREF_RECORD_LEN);
    let mut entries = Vec::<XrefEntry>::with_capacity(capacity);

    let mut remainder = remainder;
    for i in 0..count {
        let (inner, offset) = character::complete::u64(remainder)?;
        let (inner, _) = character::complete::multispace1(inner)?;
        let (inner, generation) = character::complete::u32(inner)?;
        let (inner, _) = character::complete::multispace1(inner)?;
        let (inner, free) = branch::alt((
            combinator::value(false, bytes::complete::tag(&b"n"[..])),
            combinator::value(true, bytes::complete::tag(&b"f"[..])),
        ))(inner)?;
        let (inner, _) = character::complete::multispace0(inner)?;

        let number = first
            .checked_add(i)
            .ok_or_else(|| invalid(input, PbParseErrorKind::XrefInvalid))? as usize;
        let offset = usize::try_from(offset).map_err(|_| invalid(input, PbParseErrorKind::XrefInvalid))?;
        let generation = generation as usize;

        entries.push(if free {
            FreeObject {
                number,
                generation,
                next_free: offset,
            }
            .into()
        } else {
            UsedObject {
                number,
                byte_offset: offset,
                generation,
            }
            .into()
        });
        remainder = inner;
    }

    Ok((remainder, entries))
}

#[tracable_parser]
pub fn xref_table(input: Span) -> PbParseResult<Xref> {
    let (remainder, _) = character::complete::multispace0(input)?;
    let (remainder, _) = bytes::complete::tag(XREF)(remainder)?;
    let (remainder, _) = character::complete::multispace0(remainder)?;
    let (remainder, sections) = multi::many1(xref_subsection)(remainder)?;

    let entries: Vec<XrefEntry> = sections.into_iter().flatten().collect();
    log::debug!("xref table with {} entries", entries.len());
    Ok((remainder, Xref::from(entries)))
}

#[tracable_parser]
pub fn eof_marker_tail(input: Span) -> PbParseResult<()> {
    let (remainder, _) = backward_search(
        EOF_MARKER.len() + TAIL_SEARCH_LIMIT,
        bytes::complete::tag_no_case(EOF_MARKER),
    )(input)?;

    Ok((remainder, ()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::span;

    #[test]
    fn startxref() {
        let (_, pos) = startxref_tail(span(b"         startxref\n2132")).unwrap();
        assert_eq!(pos, 2132);

        let (head, pos) = startxref_tail(span(b"trailer\n<< >>\nstartxref\n555\n")).unwrap();
        assert_eq!(pos, 555);
        assert_eq!(*head.fragment(), &b"trailer\n<< >>\n"[..]);
    }

    #[test]
    fn startxref_too_large() {
        let res = startxref_tail(span(b"         startxref\n9999999999999999999999999999999"));
        assert!(res.is_err());
    }

    #[test]
    fn eof_marker_with_trailing_newline() {
        let (head, _) = eof_marker_tail(span(b"startxref\n9\n%%EOF\n")).unwrap();
        assert_eq!(*head.fragment(), &b"startxref\n9\n"[..]);
        assert!(eof_marker_tail(span(b"startxref\n9\n")).is_err());
    }

    #[test]
    fn table_with_two_subsections() {
        let input = b"xref\n0 2\n0000000000 65535 f \n0000000017 00000 n \n5 1\n0000000123 00002 n \ntrailer";
        let (rest, xref) = xref_table(span(input)).unwrap();
        assert_eq!(*rest.fragment(), &b"trailer"[..]);
        assert_eq!(xref.len(), 3);
        assert_eq!(xref.entries()[0], XrefEntry::from(FreeObject::head()));
        assert_eq!(xref.offset_of(1), Some(17));
        assert_eq!(xref.offset_of(5), Some(123));
        assert_eq!(xref.entries()[2].number(), 5);
    }

    #[test]
    fn truncated_table() {
        assert!(xref_table(span(b"xref\n0 3\n0000000000 65535 f \n")).is_err());
    }
}
