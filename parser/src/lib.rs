pub mod model;

pub use nom;

use nom::branch::alt;
use nom::bytes::complete::{is_not, tag};
use nom::character::complete::{alpha1, digit1, hex_digit1, multispace0, multispace1};
use nom::combinator::{cut, map, opt, peek, recognize, value, verify};
use nom::error::{Error, ErrorKind};
use nom::multi::many0;
use nom::sequence::{delimited, pair, preceded, terminated, tuple};
use nom::{Err, IResult};
use tidyxml_nom::{helper, name, qname, xmlchar};

/// Deepest element nesting the grammar accepts. The document element is at depth 1.
pub const MAX_DEPTH: usize = 256;

// -----------------------------------------------------------------------------------------------

/// prolog element Misc*
///
/// [\[1\] document](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-document)
pub fn document(input: &str) -> IResult<&str, model::Document<'_>> {
    map(tuple((prolog, element, many0(misc))), model::Document::from)(input)
}

/// '"' ([^%&"] | Reference)* '"' | "'" ([^%&'] | Reference)* "'"
///
/// Parameter entity references are not allowed inside markup declarations of the internal
/// subset, so they are not recognized here.
///
/// [\[9\] EntityValue](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-EntityValue)
fn entity_value(input: &str) -> IResult<&str, Vec<model::EntityValue<'_>>> {
    alt((
        delimited(
            tag("\""),
            many0(alt((
                map(xmlchar::char_except1("%&\""), model::EntityValue::from),
                map(reference, model::EntityValue::from),
            ))),
            tag("\""),
        ),
        delimited(
            tag("'"),
            many0(alt((
                map(xmlchar::char_except1("%&'"), model::EntityValue::from),
                map(reference, model::EntityValue::from),
            ))),
            tag("'"),
        ),
    ))(input)
}

/// '"' ([^<&"] | Reference)* '"' |  "'" ([^<&'] | Reference)* "'"
///
/// [\[10\] AttValue](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-AttValue)
fn att_value(input: &str) -> IResult<&str, Vec<model::AttributeValue<'_>>> {
    alt((
        delimited(
            tag("\""),
            many0(alt((
                map(xmlchar::char_except1("<&\""), model::AttributeValue::from),
                map(reference, model::AttributeValue::from),
            ))),
            tag("\""),
        ),
        delimited(
            tag("'"),
            many0(alt((
                map(xmlchar::char_except1("<&'"), model::AttributeValue::from),
                map(reference, model::AttributeValue::from),
            ))),
            tag("'"),
        ),
    ))(input)
}

/// ('"' [^"]* '"') | ("'" [^']* "'")
///
/// [\[11\] SystemLiteral](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-SystemLiteral)
fn system_literal(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(tag("\""), xmlchar::char_except0("\""), tag("\"")),
        delimited(tag("'"), xmlchar::char_except0("'"), tag("'")),
    ))(input)
}

/// '"' PubidChar* '"' | "'" (PubidChar - "'")* "'"
///
/// [\[12\] PubidLiteral](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-PubidLiteral)
fn pubid_literal(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(tag("\""), xmlchar::pubid_char_except0(""), tag("\"")),
        delimited(tag("'"), xmlchar::pubid_char_except0("'"), tag("'")),
    ))(input)
}

/// \[^<&]* - (\[^<&]* ']]>' \[^<&]*)
///
/// [\[14\] CharData](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-CharData)
fn char_data(input: &str) -> IResult<&str, &str> {
    verify(xmlchar::char_except1("<&"), |v: &str| !v.contains("]]>"))(input)
}

/// '\<!--' ((Char - '-') | ('-' (Char - '-')))* '-->'
///
/// [\[15\] Comment](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-Comment)
fn comment(input: &str) -> IResult<&str, model::Comment<'_>> {
    map(
        delimited(
            tag("<!--"),
            recognize(many0(pair(opt(tag("-")), xmlchar::char_except1("-")))),
            tag("-->"),
        ),
        model::Comment::from,
    )(input)
}

/// '\<?' PITarget (S (Char* - (Char* '?>' Char*)))? '?>'
///
/// [\[16\] PI](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-PI)
fn pi(input: &str) -> IResult<&str, model::PI<'_>> {
    map(
        delimited(
            tag("<?"),
            pair(
                pi_target,
                alt((
                    value(None, peek(tag("?>"))),
                    map(
                        preceded(multispace1, helper::take_chars_until("?>")),
                        |v: &str| Some(v).filter(|v| !v.is_empty()),
                    ),
                )),
            ),
            tag("?>"),
        ),
        model::PI::from,
    )(input)
}

/// Name - (('X' | 'x') ('M' | 'm') ('L' | 'l'))
///
/// [\[17\] PITarget](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-PITarget)
fn pi_target(input: &str) -> IResult<&str, &str> {
    verify(name, |v: &str| !v.eq_ignore_ascii_case("xml"))(input)
}

/// CDStart CData CDEnd
///
/// [\[18\] CDSect](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-CDSect)
fn cdsect(input: &str) -> IResult<&str, model::CData<'_>> {
    map(
        delimited(
            tag("<![CDATA["),                // [19] CDStart
            helper::take_chars_until("]]>"), // [20] CData
            tag("]]>"),                      // [21] CDEnd
        ),
        model::CData::from,
    )(input)
}

/// XMLDecl? Misc* (doctypedecl Misc*)?
///
/// [\[22\] prolog](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-prolog)
fn prolog(input: &str) -> IResult<&str, model::Prolog<'_>> {
    map(
        tuple((
            opt(xml_decl),
            many0(misc),
            opt(pair(doctype_decl, many0(misc))),
        )),
        model::Prolog::from,
    )(input)
}

/// '\<?xml' VersionInfo EncodingDecl? SDDecl? S? '?>'
///
/// [\[23\] XMLDecl](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-XMLDecl)
fn xml_decl(input: &str) -> IResult<&str, model::DeclarationXml<'_>> {
    map(
        delimited(
            tag("<?xml"),
            tuple((version_info, opt(encoding_decl), opt(sd_decl))),
            pair(multispace0, tag("?>")),
        ),
        model::DeclarationXml::from,
    )(input)
}

/// S 'version' Eq ("'" VersionNum "'" | '"' VersionNum '"')
///
/// [\[24\] VersionInfo](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-VersionInfo)
fn version_info(input: &str) -> IResult<&str, &str> {
    preceded(
        tuple((multispace1, tag("version"), eq)),
        alt((
            delimited(tag("'"), version_num, tag("'")),
            delimited(tag("\""), version_num, tag("\"")),
        )),
    )(input)
}

/// S? '=' S?
///
/// [\[25\] Eq](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-Eq)
fn eq(input: &str) -> IResult<&str, &str> {
    delimited(multispace0, tag("="), multispace0)(input)
}

/// '1.' [0-9]+
///
/// [\[26\] VersionNum](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-VersionNum)
fn version_num(input: &str) -> IResult<&str, &str> {
    recognize(pair(tag("1."), digit1))(input)
}

///  Comment | PI | S
///
/// [\[27\] Misc](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-Misc)
fn misc(input: &str) -> IResult<&str, model::Misc<'_>> {
    alt((
        map(comment, model::Misc::from),
        map(pi, model::Misc::from),
        map(multispace1, model::Misc::from),
    ))(input)
}

/// '\<!DOCTYPE' S Name (S ExternalID)? S? ('[' intSubset ']' S?)? '>'
///
/// [\[28\] doctypedecl](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-doctypedecl)
///
/// [\[16\] doctypedecl](https://www.w3.org/TR/2009/REC-xml-names-20091208/#NT-doctypedecl)
fn doctype_decl(input: &str) -> IResult<&str, model::DeclarationDoc<'_>> {
    map(
        tuple((
            preceded(pair(tag("<!DOCTYPE"), multispace1), qname),
            terminated(opt(preceded(multispace1, external_id)), multispace0),
            terminated(
                opt(delimited(tag("["), int_subset, pair(tag("]"), multispace0))),
                tag(">"),
            ),
        )),
        model::DeclarationDoc::from,
    )(input)
}

/// PEReference | S
///
/// [\[28a\] DeclSep](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-DeclSep)
fn decl_sep(input: &str) -> IResult<&str, &str> {
    alt((pe_reference, multispace1))(input)
}

/// (markupdecl | DeclSep)*
///
/// Only general entity declarations are kept, everything else is recognized and dropped.
///
/// [\[28b\] intSubset](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-intSubset)
fn int_subset(input: &str) -> IResult<&str, Vec<Option<model::DeclarationEntity<'_>>>> {
    many0(alt((
        entity_decl,
        map(comment, |_| None),
        map(pi, |_| None),
        map(skipped_decl, |_| None),
        map(decl_sep, |_| None),
    )))(input)
}

/// elementdecl | AttlistDecl | NotationDecl
///
/// The declarations do not contribute to the tree and are matched without their inner grammar.
///
/// [\[29\] markupdecl](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-markupdecl)
fn skipped_decl(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        tag("<!"),
        alt((tag("ELEMENT"), tag("ATTLIST"), tag("NOTATION"))),
        multispace1,
        many0(alt((system_literal, is_not("\"'>")))),
        tag(">"),
    )))(input)
}

/// S 'standalone' Eq (("'" ('yes' | 'no') "'") | ('"' ('yes' | 'no') '"'))
///
/// [\[32\] SDDecl](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-SDDecl)
fn sd_decl(input: &str) -> IResult<&str, bool> {
    map(
        preceded(
            tuple((multispace1, tag("standalone"), eq)),
            alt((
                delimited(tag("'"), alt((tag("yes"), tag("no"))), tag("'")),
                delimited(tag("\""), alt((tag("yes"), tag("no"))), tag("\"")),
            )),
        ),
        |v| v == "yes",
    )(input)
}

/// EmptyElemTag | STag content ETag
///
/// The end tag must repeat the name of the start tag. Once a start tag is recognized a missing
/// or mismatched end tag is a failure, not a backtracking point.
///
/// [\[39\] element](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-element)
fn element(input: &str) -> IResult<&str, model::Element<'_>> {
    nested_element(input, 1)
}

/// An element at `depth`. A start tag deeper than [`MAX_DEPTH`] fails with `TooLarge`.
fn nested_element(input: &str, depth: usize) -> IResult<&str, model::Element<'_>> {
    let (rest, (element, empty)) = start_tag(input)?;
    if depth > MAX_DEPTH {
        return Err(Err::Failure(Error::new(input, ErrorKind::TooLarge)));
    }
    if empty {
        return Ok((rest, element));
    }

    let (rest, content) = content(rest, depth)?;
    let (after, end) = cut(etag)(rest)?;
    if end != element.name {
        return Err(Err::Failure(Error::new(rest, ErrorKind::Tag)));
    }

    Ok((after, element.set_content(content)))
}

/// '\<' Name (S Attribute)* S? ('>' | '/>')
///
/// [\[40\] STag](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-STag)
///
/// [\[44\] EmptyElemTag](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-EmptyElemTag)
///
/// [\[12\] STag](https://www.w3.org/TR/2009/REC-xml-names-20091208/#NT-STag)
fn start_tag(input: &str) -> IResult<&str, (model::Element<'_>, bool)> {
    map(
        tuple((
            preceded(tag("<"), qname),
            many0(preceded(multispace1, attribute)),
            preceded(
                multispace0,
                alt((value(true, tag("/>")), value(false, tag(">")))),
            ),
        )),
        |(name, attributes, empty)| (model::Element::from((name, attributes)), empty),
    )(input)
}

/// Name Eq AttValue
///
/// [\[41\] Attribute](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-Attribute)
///
/// [\[15\] Attribute](https://www.w3.org/TR/2009/REC-xml-names-20091208/#NT-Attribute)
fn attribute(input: &str) -> IResult<&str, model::Attribute<'_>> {
    map(
        pair(
            map(qname, model::AttributeName::from),
            preceded(eq, att_value),
        ),
        model::Attribute::from,
    )(input)
}

/// '\</' Name S? '>'
///
/// [\[42\] ETag](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-ETag)
///
/// [\[13\] ETag](https://www.w3.org/TR/2009/REC-xml-names-20091208/#NT-ETag)
fn etag(input: &str) -> IResult<&str, model::QName<'_>> {
    delimited(tag("</"), qname, pair(multispace0, tag(">")))(input)
}

/// CharData? ((element | Reference | CDSect | PI | Comment) CharData?)*
///
/// [\[43\] content](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-content)
fn content(input: &str, depth: usize) -> IResult<&str, model::Content<'_>> {
    map(
        pair(
            opt(char_data),
            many0(pair(
                alt((
                    map(|i| nested_element(i, depth + 1), model::Contents::from),
                    map(reference, model::Contents::from),
                    map(cdsect, model::Contents::from),
                    map(pi, model::Contents::from),
                    map(comment, model::Contents::from),
                )),
                opt(char_data),
            )),
        ),
        |(head, children)| {
            model::Content::from((
                head,
                children.into_iter().map(model::ContentCell::from).collect(),
            ))
        },
    )(input)
}

/// '&#' [0-9]+ ';' | '&#x' [0-9a-fA-F]+ ';'
///
/// [\[66\] CharRef](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-CharRef)
fn char_ref(input: &str) -> IResult<&str, model::Reference<'_>> {
    alt((
        map(
            delimited(tag("&#x"), hex_digit1, tag(";")),
            model::Reference::hex,
        ),
        map(
            delimited(tag("&#"), digit1, tag(";")),
            model::Reference::digit,
        ),
    ))(input)
}

/// EntityRef | CharRef
///
/// [\[67\] Reference](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-Reference)
fn reference(input: &str) -> IResult<&str, model::Reference<'_>> {
    alt((entity_ref, char_ref))(input)
}

/// '&' Name ';'
///
/// [\[68\] EntityRef](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-EntityRef)
fn entity_ref(input: &str) -> IResult<&str, model::Reference<'_>> {
    map(
        delimited(tag("&"), name, tag(";")),
        model::Reference::entity,
    )(input)
}

/// '%' Name ';'
///
/// [\[69\] PEReference](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-PEReference)
fn pe_reference(input: &str) -> IResult<&str, &str> {
    delimited(tag("%"), name, tag(";"))(input)
}

/// GEDecl | PEDecl
///
/// Parameter entities only matter inside the DTD, so their declarations are dropped.
///
/// [\[70\] EntityDecl](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-EntityDecl)
fn entity_decl(input: &str) -> IResult<&str, Option<model::DeclarationEntity<'_>>> {
    alt((map(ge_decl, Some), map(pe_decl, |_| None)))(input)
}

/// '\<!ENTITY' S Name S EntityDef S? '>'
///
/// [\[71\] GEDecl](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-GEDecl)
fn ge_decl(input: &str) -> IResult<&str, model::DeclarationEntity<'_>> {
    map(
        pair(
            delimited(pair(tag("<!ENTITY"), multispace1), name, multispace1),
            terminated(entity_def, pair(multispace0, tag(">"))),
        ),
        model::DeclarationEntity::from,
    )(input)
}

/// '\<!ENTITY' S '%' S Name S PEDef S? '>'
///
/// [\[72\] PEDecl](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-PEDecl)
fn pe_decl(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        tag("<!ENTITY"),
        multispace1,
        tag("%"),
        multispace1,
        name,
        multispace1,
        alt((recognize(entity_value), recognize(external_id))), // [74] PEDef
        multispace0,
        tag(">"),
    )))(input)
}

/// EntityValue | (ExternalID NDataDecl?)
///
/// [\[73\] EntityDef](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-EntityDef)
fn entity_def(input: &str) -> IResult<&str, model::EntityDef<'_>> {
    alt((
        map(entity_value, model::EntityDef::from),
        map(pair(external_id, opt(ndata_decl)), model::EntityDef::from),
    ))(input)
}

/// 'SYSTEM' S SystemLiteral | 'PUBLIC' S PubidLiteral S SystemLiteral
///
/// [\[75\] ExternalID](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-ExternalID)
fn external_id(input: &str) -> IResult<&str, model::ExternalId<'_>> {
    alt((
        map(
            preceded(pair(tag("SYSTEM"), multispace1), system_literal),
            model::ExternalId::from,
        ),
        map(
            preceded(
                pair(tag("PUBLIC"), multispace1),
                pair(pubid_literal, preceded(multispace1, system_literal)),
            ),
            model::ExternalId::from,
        ),
    ))(input)
}

/// S 'NDATA' S Name
///
/// [\[76\] NDataDecl](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-NDataDecl)
fn ndata_decl(input: &str) -> IResult<&str, &str> {
    preceded(tuple((multispace1, tag("NDATA"), multispace1)), name)(input)
}

/// S 'encoding' Eq ('"' EncName '"' | "'" EncName "'" )
///
/// [\[80\] EncodingDecl](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-EncodingDecl)
fn encoding_decl(input: &str) -> IResult<&str, &str> {
    preceded(
        tuple((multispace1, tag("encoding"), eq)),
        alt((
            delimited(tag("'"), enc_name, tag("'")),
            delimited(tag("\""), enc_name, tag("\"")),
        )),
    )(input)
}

/// \[A-Za-z] (\[A-Za-z0-9._] | '-')*
///
/// [\[81\] EncName](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-EncName)
fn enc_name(input: &str) -> IResult<&str, &str> {
    recognize(pair(alpha1, xmlchar::enc_name0))(input)
}

// -----------------------------------------------------------------------------------------------
