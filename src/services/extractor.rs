// src/services/extractor.rs

//! Posting field extraction.
//!
//! Postings are loosely-escaped HTML with a header block of
//! `Label: value<BR>` lines and a body delimited by comment markers:
//!
//! ```text
//! Subject: Class cancelled<BR>
//! From: Jane Doe <jane@example.com><BR>
//! Date: 2024/05/01 10:00<BR>
//! Attach1: <A HREF="files/a.pdf" TARGET="attach">a.pdf</A><BR>
//! <!-- begin text -->
//! ...
//! <!-- end text -->
//! ```
//!
//! Extraction is plain pattern matching over the decoded text.

use std::borrow::Cow;
use std::collections::HashMap;

use regex::{Captures, Regex};

use crate::error::{AppError, Result};
use crate::models::{Link, PostingRecord};

/// Longest body that is passed through unchanged.
pub const MAX_BODY_CHARS: usize = 2048;

/// Number of body characters kept when truncating.
pub const TRUNCATED_BODY_CHARS: usize = 2014;

/// Appended to a truncated body.
///
/// The cut keeps [`TRUNCATED_BODY_CHARS`] characters and then adds this
/// notice, so a truncated body is 2073 characters long, which is longer than
/// [`MAX_BODY_CHARS`]. Discord accepts embed descriptions up to 4096.
pub const TRUNCATION_NOTICE: &str =
    "…\n:warning: body exceeded 2048 characters and was truncated";

/// Replacement for every stripped tag.
const TAG_PLACEHOLDER: &str = "__";

const ENTITY_PATTERN: &str = r"&(?:#[0-9]+|#[xX][0-9a-fA-F]+|[A-Za-z][A-Za-z0-9]*);?";
const TAG_PATTERN: &str = r"<[^<>!]*>";
const BODY_PATTERN: &str = r"(?s)<!-- begin text -->\r\n(.+?)<!-- end text -->";
const FIELD_PATTERN: &str = r"(.+?): (.+?)<BR>";
const REFERENCE_PATTERN: &str = r#"<A HREF="(.+?)">(.+?)</A>"#;
const ATTACH_PATTERN: &str = r#"<A HREF="(.+?)" TARGET="attach">(.+?)</A>"#;

/// Named references that HTML5 still decodes without a trailing `;`.
const LEGACY_ENTITIES: &[&str] = &[
    "AElig", "AMP", "Aacute", "Acirc", "Agrave", "Aring", "Atilde", "Auml", "COPY", "Ccedil",
    "ETH", "Eacute", "Ecirc", "Egrave", "Euml", "GT", "Iacute", "Icirc", "Igrave", "Iuml", "LT",
    "Ntilde", "Oacute", "Ocirc", "Ograve", "Oslash", "Otilde", "Ouml", "QUOT", "REG", "THORN",
    "Uacute", "Ucirc", "Ugrave", "Uuml", "Yacute", "aacute", "acirc", "acute", "aelig", "agrave",
    "amp", "aring", "atilde", "auml", "brvbar", "ccedil", "cedil", "cent", "copy", "curren",
    "deg", "divide", "eacute", "ecirc", "egrave", "eth", "euml", "frac12", "frac14", "frac34",
    "gt", "iacute", "icirc", "iexcl", "igrave", "iquest", "iuml", "laquo", "lt", "macr", "micro",
    "middot", "nbsp", "not", "ntilde", "oacute", "ocirc", "ograve", "ordf", "ordm", "oslash",
    "otilde", "ouml", "para", "plusmn", "pound", "quot", "raquo", "reg", "sect", "shy", "sup1",
    "sup2", "sup3", "szlig", "thorn", "times", "uacute", "ucirc", "ugrave", "uml", "uuml",
    "yacute", "yen", "yuml",
];

/// Header labels the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Label {
    Subject,
    From,
    Date,
    Reference,
    Attach(u32),
}

impl Label {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Subject" => Some(Self::Subject),
            "From" => Some(Self::From),
            "Date" => Some(Self::Date),
            "Reference" => Some(Self::Reference),
            _ => {
                let digits = raw.strip_prefix("Attach")?;
                let index: u32 = digits.parse().ok()?;
                // "Attach01" is a different label from "Attach1"
                (index.to_string() == digits).then_some(Self::Attach(index))
            }
        }
    }
}

/// Parses posting HTML into a [`PostingRecord`].
pub struct FieldExtractor {
    entity: Regex,
    tag: Regex,
    body: Regex,
    field: Regex,
    reference: Regex,
    attach: Regex,
}

impl FieldExtractor {
    /// Compile the scan patterns.
    pub fn new() -> Result<Self> {
        Ok(Self {
            entity: Self::compile(ENTITY_PATTERN)?,
            tag: Self::compile(TAG_PATTERN)?,
            body: Self::compile(BODY_PATTERN)?,
            field: Self::compile(FIELD_PATTERN)?,
            reference: Self::compile(REFERENCE_PATTERN)?,
            attach: Self::compile(ATTACH_PATTERN)?,
        })
    }

    /// Extract a record from raw posting HTML.
    pub fn extract(&self, raw_html: &str) -> Result<PostingRecord> {
        let html = self.unescape(raw_html);

        let body = self.extract_body(&html)?;
        let fields = self.scan_fields(&html);

        let title = fields.get(&Label::Subject).map(|v| v.to_string());
        let author = fields
            .get(&Label::From)
            .map(|v| display_name(v))
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        let date = fields.get(&Label::Date).map(|v| v.to_string());
        let reference = fields
            .get(&Label::Reference)
            .map(|v| Self::parse_anchor(&self.reference, "Reference", v))
            .transpose()?;

        let mut attachments = Vec::new();
        for index in 1.. {
            let Some(value) = fields.get(&Label::Attach(index)) else {
                break;
            };
            let label = format!("Attach{index}");
            attachments.push(Self::parse_anchor(&self.attach, &label, value)?);
        }

        Ok(PostingRecord {
            body,
            title,
            author,
            date,
            reference,
            attachments,
        })
    }

    /// Decode character references, including the legacy forms that omit `;`.
    fn unescape<'a>(&self, html: &'a str) -> Cow<'a, str> {
        self.entity.replace_all(html, |caps: &Captures| decode_reference(&caps[0]))
    }

    /// Locate the marked body in the tag-stripped text and cap its length.
    fn extract_body(&self, html: &str) -> Result<String> {
        let stripped = self.tag.replace_all(html, TAG_PLACEHOLDER);
        let body = self
            .body
            .captures(&stripped)
            .and_then(|caps| caps.get(1))
            .ok_or_else(|| AppError::malformed("body markers not found"))?;
        Ok(truncate_body(body.as_str()))
    }

    /// Collect `Label: value<BR>` pairs, later duplicates overwriting earlier.
    fn scan_fields<'a>(&self, html: &'a str) -> HashMap<Label, &'a str> {
        let mut fields = HashMap::new();
        for caps in self.field.captures_iter(html) {
            let (Some(raw_label), Some(value)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            if let Some(label) = Label::parse(raw_label.as_str()) {
                fields.insert(label, value.as_str());
            }
        }
        fields
    }

    fn parse_anchor(pattern: &Regex, label: &str, value: &str) -> Result<Link> {
        let caps = pattern
            .captures(value)
            .ok_or_else(|| AppError::malformed(format!("{label} is not a link: {value}")))?;
        match (caps.get(1), caps.get(2)) {
            (Some(href), Some(text)) => Ok(Link::new(href.as_str(), text.as_str())),
            _ => Err(AppError::malformed(format!("{label} is not a link: {value}"))),
        }
    }

    fn compile(pattern: &str) -> Result<Regex> {
        Regex::new(pattern).map_err(|e| AppError::pattern(pattern, e))
    }
}

/// Decode one `&...` reference, leaving it as written when nothing matches.
fn decode_reference(reference: &str) -> String {
    let decoded = html_escape::decode_html_entities(reference);
    if decoded != reference {
        return decoded.into_owned();
    }

    let name = &reference[1..];
    if name.starts_with('#') {
        if reference.ends_with(';') {
            return reference.to_string();
        }
        return html_escape::decode_html_entities(&format!("{reference};")).into_owned();
    }

    // Longest legacy name wins: "&notit;" is "¬" followed by "it;"
    let legacy = LEGACY_ENTITIES
        .iter()
        .filter(|legacy| name.starts_with(**legacy))
        .max_by_key(|legacy| legacy.len());
    match legacy {
        Some(legacy) => {
            let character = html_escape::decode_html_entities(&format!("&{legacy};")).into_owned();
            format!("{character}{}", &name[legacy.len()..])
        }
        None => reference.to_string(),
    }
}

/// Text before the first `<` of a `From` value.
fn display_name(from: &str) -> &str {
    from.split('<').next().unwrap_or(from)
}

/// Cap a body at [`MAX_BODY_CHARS`], appending [`TRUNCATION_NOTICE`] when cut.
pub fn truncate_body(body: &str) -> String {
    if body.chars().count() <= MAX_BODY_CHARS {
        return body.to_string();
    }
    let mut truncated: String = body.chars().take(TRUNCATED_BODY_CHARS).collect();
    truncated.push_str(TRUNCATION_NOTICE);
    truncated
}
