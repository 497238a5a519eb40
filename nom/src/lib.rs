pub mod helper;
pub mod model;
pub mod xmlchar;

use nom::branch::alt;
use nom::bytes::complete::{tag, take_while};
use nom::character::complete::satisfy;
use nom::combinator::{map, recognize};
use nom::sequence::{pair, separated_pair};
use nom::IResult;

/// NameStartChar (NameChar)*
///
/// [\[5\] Name](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-Name)
pub fn name(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(xmlchar::is_name_start_char),
        take_while(xmlchar::is_name_char),
    ))(input)
}

/// Name - (Char* ':' Char*)
///
/// [\[4\] NCName](https://www.w3.org/TR/2009/REC-xml-names-20091208/#NT-NCName)
pub fn ncname(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c| c != ':' && xmlchar::is_name_start_char(c)),
        take_while(|c| c != ':' && xmlchar::is_name_char(c)),
    ))(input)
}

/// PrefixedName | UnprefixedName
///
/// [\[7\] QName](https://www.w3.org/TR/2009/REC-xml-names-20091208/#NT-QName)
pub fn qname(input: &str) -> IResult<&str, model::QName<'_>> {
    alt((
        map(prefixed_name, model::QName::from),
        map(ncname, model::QName::from),
    ))(input)
}

/// Prefix ':' LocalPart
///
/// [\[8\] PrefixedName](https://www.w3.org/TR/2009/REC-xml-names-20091208/#NT-PrefixedName)
fn prefixed_name(input: &str) -> IResult<&str, model::PrefixedName<'_>> {
    map(
        separated_pair(ncname, tag(":"), ncname),
        model::PrefixedName::from,
    )(input)
}

// -----------------------------------------------------------------------------------------------
