//! Parsers for the response headers a Solid server uses to describe a
//! resource: `Link` (RFC 8288) and `WAC-Allow`.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{is_not, tag_no_case, take, take_while, take_while1},
    character::complete::{char, multispace0},
    combinator::{all_consuming, map, opt},
    multi::{fold_many0, many0, separated_list0},
    sequence::{delimited, preceded, terminated, tuple},
};
use thiserror::Error;

/// A header value that could not be parsed
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Malformed {header} header: {value}")]
pub struct HeaderParseError {
    /// Name of the offending header
    pub header: &'static str,
    /// The value that was rejected
    pub value: String,
}

/// A single link from a `Link` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// The link target exactly as sent; it may be relative to the resource
    pub target: String,
    /// Link parameters with lower-cased names, in the order they were sent
    pub params: Vec<(String, String)>,
}

impl Link {
    /// Every relation type named by the `rel` parameters of this link
    pub fn rels(&self) -> impl Iterator<Item = &str> {
        self.params
            .iter()
            .filter(|(name, _)| name == "rel")
            .flat_map(|(_, value)| value.split_ascii_whitespace())
    }

    /// Whether this link carries the given relation type
    pub fn has_rel(&self, rel: &str) -> bool {
        self.rels().any(|candidate| candidate.eq_ignore_ascii_case(rel))
    }
}

/// Modes granted to the requesting user and to the public, as advertised by
/// the `WAC-Allow` header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WacAllow {
    /// Modes (`read`, `write`, `append`, `control`) the current user holds
    pub user: Vec<String>,
    /// Modes everyone holds
    pub public: Vec<String>,
}

impl WacAllow {
    /// Whether the current user holds `mode`
    pub fn user_can(&self, mode: &str) -> bool {
        self.user.iter().any(|held| held.eq_ignore_ascii_case(mode))
    }
}

fn token(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c))(input)
}

fn quoted_string(input: &str) -> IResult<&str, String> {
    delimited(
        char('"'),
        fold_many0(
            alt((is_not("\\\""), preceded(char('\\'), take(1usize)))),
            String::new,
            |mut value, part: &str| {
                value.push_str(part);
                value
            },
        ),
        char('"'),
    )(input)
}

fn bare_value(input: &str) -> IResult<&str, String> {
    map(is_not(";, \t\r\n"), String::from)(input)
}

fn link_param(input: &str) -> IResult<&str, (String, String)> {
    let (input, _) = tuple((multispace0, char(';'), multispace0))(input)?;
    let (input, name) = token(input)?;
    let (input, value) = opt(preceded(
        tuple((multispace0, char('='), multispace0)),
        alt((quoted_string, bare_value)),
    ))(input)?;

    Ok((input, (name.to_ascii_lowercase(), value.unwrap_or_default())))
}

fn link_value(input: &str) -> IResult<&str, Link> {
    let (input, _) = multispace0(input)?;
    let (input, target) = delimited(char('<'), take_while(|c| c != '>'), char('>'))(input)?;
    let (input, params) = many0(link_param)(input)?;

    Ok((
        input,
        Link {
            target: target.trim().to_string(),
            params,
        },
    ))
}

fn link_list(input: &str) -> IResult<&str, Vec<Link>> {
    terminated(
        separated_list0(delimited(multispace0, char(','), multispace0), link_value),
        multispace0,
    )(input)
}

/// Parse one `Link` header value into its links
pub fn parse_link_header(value: &str) -> Result<Vec<Link>, HeaderParseError> {
    all_consuming(link_list)(value)
        .map(|(_, links)| links)
        .map_err(|_| HeaderParseError {
            header: "Link",
            value: value.to_string(),
        })
}

fn wac_allow_entry(input: &str) -> IResult<&str, (String, String)> {
    let (input, _) = multispace0(input)?;
    let (input, group) = alt((tag_no_case("user"), tag_no_case("public"), token))(input)?;
    let (input, _) = tuple((multispace0, char('='), multispace0))(input)?;
    let (input, modes) = quoted_string(input)?;

    Ok((input, (group.to_ascii_lowercase(), modes)))
}

/// Parse a `WAC-Allow` header value
pub fn parse_wac_allow(value: &str) -> Result<WacAllow, HeaderParseError> {
    let entries = all_consuming(terminated(
        separated_list0(
            delimited(multispace0, char(','), multispace0),
            wac_allow_entry,
        ),
        multispace0,
    ))(value)
    .map(|(_, entries)| entries)
    .map_err(|_| HeaderParseError {
        header: "WAC-Allow",
        value: value.to_string(),
    })?;

    let mut allow = WacAllow::default();
    for (group, modes) in entries {
        let modes = modes
            .split_ascii_whitespace()
            .map(|mode| mode.to_ascii_lowercase());
        match group.as_str() {
            "user" => allow.user.extend(modes),
            "public" => allow.public.extend(modes),
            _ => {}
        }
    }

    Ok(allow)
}
