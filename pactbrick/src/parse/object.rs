use nom::{
    branch, bytes, character, combinator,
    error::{ErrorKind, ParseError},
    multi, sequence, InputTake,
};
use nom_tracable::tracable_parser;

use super::{
    error::{PbParseError, PbParseErrorKind},
    PbParseResult, Span,
};
use crate::{
    pdf::{document::K_LENGTH, Array, Bytes, Dictionary, Name, Object, PdfString, Reference, Stream},
    simple_encode::section::{ENDOBJ, OBJ},
};

const TRUE_OBJECT: &[u8] = b"true";
const FALSE_OBJECT: &[u8] = b"false";
const NULL_OBJECT: &[u8] = b"null";
const DICT_OPEN: &[u8] = b"<<";
const DICT_CLOSE: &[u8] = b">>";
pub(crate) const STREAM: &[u8] = b"stream";
pub(crate) const ENDSTREAM: &[u8] = b"endstream";

fn is_delimiter(chr: u8) -> bool {
    matches!(
        chr,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

fn is_whitespace(chr: u8) -> bool {
    matches!(chr, b'\0' | b'\t' | b'\n' | b'\x0c' | b'\r' | b' ')
}

pub(crate) fn is_regular(chr: u8) -> bool {
    !is_delimiter(chr) && !is_whitespace(chr)
}

fn error<O>(input: Span, kind: ErrorKind) -> PbParseResult<O> {
    Err(nom::Err::Error(PbParseError::from_error_kind(input, kind)))
}

/// Consume all whitespace. If there is none, the next byte must be a
/// delimiter or the input must end.
fn require_termination(input: Span) -> PbParseResult<()> {
    let (remainder, whitespace) = character::complete::multispace0(input)?;
    if whitespace.fragment().is_empty() && !remainder.fragment().is_empty() {
        bytes::complete::take_while_m_n(1, 1, is_delimiter)(remainder)?;
    }
    Ok((remainder, ()))
}

/// Literal string with nesting parentheses and backslash escapes resolved.
fn literal_string(input: Span) -> PbParseResult<PdfString> {
    let (remainder, _) = character::complete::char('(')(input)?;
    let data = *remainder.fragment();

    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut i = 0;
    loop {
        let c = match data.get(i) {
            Some(&c) => c,
            None => return error(input, ErrorKind::Char),
        };
        i += 1;
        match c {
            b'(' => {
                depth += 1;
                out.push(c);
            }
            b')' if depth == 0 => break,
            b')' => {
                depth -= 1;
                out.push(c);
            }
            b'\\' => {
                let escaped = match data.get(i) {
                    Some(&e) => e,
                    None => return error(input, ErrorKind::Escaped),
                };
                i += 1;
                match escaped {
                    b'n' => out.push(b'\n'),
                    b'r' => out.push(b'\r'),
                    b't' => out.push(b'\t'),
                    b'b' => out.push(0x08),
                    b'f' => out.push(0x0c),
                    // line continuation
                    b'\n' => {}
                    b'\r' => {
                        if data.get(i) == Some(&b'\n') {
                            i += 1;
                        }
                    }
                    b'0'..=b'7' => {
                        let mut value = u32::from(escaped - b'0');
                        for _ in 0..2 {
                            match data.get(i) {
                                Some(&d @ b'0'..=b'7') => {
                                    value = value * 8 + u32::from(d - b'0');
                                    i += 1;
                                }
                                _ => break,
                            }
                        }
                        out.push((value & 0xFF) as u8);
                    }
                    other => out.push(other),
                }
            }
            _ => out.push(c),
        }
    }

    let (remainder, _) = remainder.take_split(i);
    let (remainder, _) = character::complete::multispace0(remainder)?;
    Ok((remainder, PdfString::from(out)))
}

/// `<...>` hex string. Whitespace between digits is ignored and a missing
/// final digit counts as `0`.
fn hex_string(input: Span) -> PbParseResult<Bytes> {
    let (remainder, digits) = sequence::delimited(
        character::complete::char('<'),
        bytes::complete::take_while(|c: u8| c.is_ascii_hexdigit() || is_whitespace(c)),
        character::complete::char('>'),
    )(input)?;

    let mut digits: Vec<u8> = digits.fragment().iter().copied().filter(u8::is_ascii_hexdigit).collect();
    if digits.len() % 2 == 1 {
        digits.push(b'0');
    }
    let data = match hex::decode(&digits) {
        Ok(data) => data,
        Err(_) => return error(input, ErrorKind::HexDigit),
    };

    let (remainder, _) = character::complete::multispace0(remainder)?;
    Ok((remainder, Bytes::from(data)))
}

fn number_object(input: Span) -> PbParseResult<Object> {
    let (remainder, digits) = combinator::recognize(sequence::tuple((
        combinator::opt(character::complete::one_of("+-")),
        character::complete::digit0,
        combinator::opt(sequence::pair(
            character::complete::char('.'),
            character::complete::digit0,
        )),
    )))(input)?;

    let digits = *digits.fragment();
    if !digits.iter().any(u8::is_ascii_digit) {
        return error(input, ErrorKind::Digit);
    }
    // only ASCII was recognized above
    let text = String::from_utf8_lossy(digits);
    let obj = if digits.contains(&b'.') {
        match text.parse::<f32>() {
            Ok(v) => Object::Real(v),
            Err(_) => return error(input, ErrorKind::Float),
        }
    } else {
        match text.parse::<i64>() {
            Ok(v) => Object::Integer(v),
            Err(_) => return error(input, ErrorKind::Digit),
        }
    };

    let (remainder, _) = require_termination(remainder)?;
    Ok((remainder, obj))
}

fn bool_object(input: Span) -> PbParseResult<Object> {
    let (remainder, obj) = branch::alt((
        combinator::value(Object::Bool(true), bytes::complete::tag(TRUE_OBJECT)),
        combinator::value(Object::Bool(false), bytes::complete::tag(FALSE_OBJECT)),
    ))(input)?;
    let (remainder, _) = require_termination(remainder)?;

    Ok((remainder, obj))
}

fn null_object(input: Span) -> PbParseResult<Object> {
    let (remainder, _) = bytes::complete::tag(NULL_OBJECT)(input)?;
    let (remainder, _) = require_termination(remainder)?;

    Ok((remainder, Object::Null))
}

fn decode_name(raw: &[u8]) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        if raw[i] == b'#' {
            out.extend(hex::decode(raw.get(i + 1..i + 3)?).ok()?);
            i += 3;
        } else {
            out.push(raw[i]);
            i += 1;
        }
    }
    Some(out)
}

/// Name with `#xx` escapes replaced by the byte they stand for.
pub(crate) fn name(input: Span) -> PbParseResult<Name> {
    let (remainder, _) = character::complete::char('/')(input)?;
    let (remainder, raw) = bytes::complete::take_while(is_regular)(remainder)?;
    let (remainder, _) = require_termination(remainder)?;

    match decode_name(raw.fragment()) {
        Some(name) => Ok((remainder, Name::from(name))),
        None => error(input, ErrorKind::HexDigit),
    }
}

fn reference(input: Span) -> PbParseResult<Reference> {
    let (remainder, index) = character::complete::u32(input)?;
    let (remainder, _) = character::complete::multispace1(remainder)?;
    let (remainder, generation) = character::complete::u32(remainder)?;
    let (remainder, _) = character::complete::multispace1(remainder)?;
    let (remainder, _) = character::complete::char('R')(remainder)?;
    let (remainder, _) = require_termination(remainder)?;

    Ok((remainder, Reference::new(index, generation)))
}

fn dictionary_entry(input: Span) -> PbParseResult<(Name, Object)> {
    let (remainder, key) = name(input)?;
    let (remainder, value) = object(remainder)?;

    Ok((remainder, (key, value)))
}

pub(crate) fn dictionary(input: Span) -> PbParseResult<Dictionary> {
    sequence::delimited(
        sequence::terminated(bytes::complete::tag(DICT_OPEN), character::complete::multispace0),
        multi::fold_many0(dictionary_entry, Dictionary::new, |mut acc, (key, value)| {
            acc.insert(key, value);
            acc
        }),
        sequence::terminated(bytes::complete::tag(DICT_CLOSE), require_termination),
    )(input)
}

fn array(input: Span) -> PbParseResult<Array> {
    sequence::delimited(
        sequence::terminated(character::complete::char('['), character::complete::multispace0),
        multi::fold_many0(object, Array::new, |mut acc, obj| {
            acc.push(obj);
            acc
        }),
        sequence::terminated(character::complete::char(']'), require_termination),
    )(input)
}

/// A direct object. Streams only exist inside [`indirect_object`].
#[tracable_parser]
pub fn object(input: Span) -> PbParseResult<Object> {
    // `<<` before `<` and `1 0 R` before `1`
    branch::alt((
        combinator::map(dictionary, Object::Dictionary),
        combinator::map(array, Object::Array),
        combinator::map(hex_string, Object::HexString),
        combinator::map(literal_string, Object::String),
        combinator::map(reference, Object::Reference),
        number_object,
        bool_object,
        null_object,
        combinator::map(name, Object::Name),
    ))(input)
}

/// Stream data following its dictionary. The length must be a direct integer.
fn stream_data(input: Span, dictionary: Dictionary) -> PbParseResult<Stream> {
    let length = match dictionary
        .get(K_LENGTH)
        .and_then(Object::integer)
        .and_then(|l| usize::try_from(l).ok())
    {
        Some(length) => length,
        None => {
            return Err(nom::Err::Failure(PbParseError::new(
                input,
                PbParseErrorKind::StreamLength,
            )))
        }
    };

    let (remainder, _) = bytes::complete::tag(STREAM)(input)?;
    let (remainder, _) = character::complete::line_ending(remainder)?;
    let (remainder, data) = bytes::complete::take(length)(remainder)?;
    let (remainder, _) = character::complete::multispace0(remainder)?;
    let (remainder, _) = bytes::complete::tag(ENDSTREAM)(remainder)?;
    let (remainder, _) = require_termination(remainder)?;

    Ok((remainder, Stream::new(dictionary, data.fragment().to_vec())))
}

/// `{index} {generation} obj ... endobj`
#[tracable_parser]
pub fn indirect_object(input: Span) -> PbParseResult<(Reference, Object)> {
    let (remainder, index) = character::complete::u32(input)?;
    let (remainder, _) = character::complete::multispace1(remainder)?;
    let (remainder, generation) = character::complete::u32(remainder)?;
    let (remainder, _) = character::complete::multispace1(remainder)?;
    let (remainder, _) = bytes::complete::tag(OBJ)(remainder)?;
    let (remainder, _) = require_termination(remainder)?;

    let (remainder, obj) = object(remainder)?;
    let (remainder, obj) = match obj {
        Object::Dictionary(dict) if remainder.fragment().starts_with(STREAM) => {
            let (remainder, stream) = stream_data(remainder, dict)?;
            (remainder, Object::Stream(stream))
        }
        other => (remainder, other),
    };

    let (remainder, _) = character::complete::multispace0(remainder)?;
    let (remainder, _) = bytes::complete::tag(ENDOBJ)(remainder)?;
    let (remainder, _) = require_termination(remainder)?;

    Ok((remainder, (Reference::new(index, generation), obj)))
}
