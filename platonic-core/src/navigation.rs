/// Links from an icon to the page that shows one solid in detail
use nom::{
    bytes::complete::{is_not, tag, take_while},
    combinator::{all_consuming, opt},
    multi::separated_list0,
    sequence::{pair, preceded},
    IResult,
};

use crate::error::LinkError;

/// `<page>?<param>=<name>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolidLink {
    pub page: String,
    pub param: String,
    pub name: String,
}

impl SolidLink {
    pub fn new(page: impl Into<String>, param: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            param: param.into(),
            name: name.into(),
        }
    }

    pub fn to_url(&self) -> String {
        format!(
            "{}?{}={}",
            self.page,
            encode_component(&self.param),
            encode_component(&self.name)
        )
    }

    /// Read a link back, taking the solid name from `param`
    pub fn parse(url: &str, param: &str) -> Result<Self, LinkError> {
        let (page, query) = match url.split_once('?') {
            Some((page, query)) => (page, query),
            None => return Err(LinkError::Malformed(url.to_string())),
        };
        let name = query_param(query, param)?;
        Ok(Self::new(page, param, name))
    }
}

/// Value of `key` in a query string (with or without the leading `?`)
pub fn query_param(query: &str, key: &str) -> Result<String, LinkError> {
    let pairs = match all_consuming(query_pairs)(query) {
        Ok((_, pairs)) => pairs,
        Err(_) => return Err(LinkError::Malformed(query.to_string())),
    };
    for (k, v) in pairs {
        if decode_component(k)? == key {
            return decode_component(v);
        }
    }
    Err(LinkError::MissingParam(key.to_string()))
}

fn query_pairs(input: &str) -> IResult<&str, Vec<(&str, &str)>> {
    preceded(opt(tag("?")), separated_list0(tag("&"), query_pair))(input)
}

fn query_pair(input: &str) -> IResult<&str, (&str, &str)> {
    pair(
        is_not("=&"),
        preceded(opt(tag("=")), take_while(|c: char| c != '&')),
    )(input)
}

fn encode_component(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for byte in text.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

fn decode_component(text: &str) -> Result<String, LinkError> {
    let malformed = || LinkError::Malformed(text.to_string());
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let hex = text.get(i + 1..i + 3).ok_or_else(malformed)?;
                out.push(u8::from_str_radix(hex, 16).map_err(|_| malformed())?);
                i += 3;
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8(out).map_err(|_| malformed())
}
