use nom::{bytes, character};
use nom_tracable::tracable_parser;

use super::{backward_search, error::PbParseError, object::dictionary, PbParseResult, Span};
use crate::pdf::{trailer::TRAILER, Trailer};

const TRAILER_SEARCH_LIMIT: usize = 4096;

#[tracable_parser]
pub fn trailer_tail(input: Span) -> PbParseResult<Trailer> {
    // find `trailer` key word (start search from the end)
    let (remainder, (trailing, _)) = backward_search(
        TRAILER.len() + TRAILER_SEARCH_LIMIT,
        bytes::complete::tag_no_case(TRAILER),
    )(input)?;

    let (trailing, _) = character::complete::multispace0(trailing)?;
    let (trailing, dict) = dictionary(trailing)?;
    let (trailing, _) = character::complete::multispace0(trailing)?;
    if !trailing.fragment().is_empty() {
        log::warn!("Unexpected bytes after trailer: {:?}", trailing.fragment());
    }

    let trailer = Trailer::try_from(&dict).map_err(|err| nom::Err::Failure(PbParseError::new(input, err.into())))?;

    Ok((remainder, trailer))
}
