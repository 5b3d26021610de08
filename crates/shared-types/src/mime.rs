//! # MIME Part Model
//!
//! A deliberately small MIME model covering what AS2 needs:
//!
//! - `MimePart`: a header block plus raw body bytes (transfer encoding is
//!   always `binary`, so bodies are never re-encoded).
//! - `ContentType`: base type plus parameters (`boundary`, `smime-type`, ...).
//! - `Multipart`: build and split `multipart/*` bodies (`report`, `signed`).
//!
//! An HTTP entity maps onto a part by taking the `Content-Type` header as the
//! only part header and the entity body as the part body
//! (`MimePart::from_entity`). Serialization (`to_bytes`) is the canonical
//! form used for MIC calculation and signing.

use std::fmt;

use uuid::Uuid;

use crate::constants::header;
use crate::errors::MimeError;
use crate::headers::Headers;

// =============================================================================
// CONTENT TYPE
// =============================================================================

/// Parsed `Content-Type` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    base: String,
    params: Vec<(String, String)>,
}

impl ContentType {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into().trim().to_string(),
            params: Vec::new(),
        }
    }

    pub fn parse(value: &str) -> Self {
        let (base, rest) = match value.find(';') {
            Some(i) => (&value[..i], &value[i + 1..]),
            None => (value, ""),
        };
        Self {
            base: base.trim().to_string(),
            params: parse_parameters(rest),
        }
    }

    /// `type/subtype` as written.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Case-insensitive comparison of the base type.
    pub fn is(&self, base: &str) -> bool {
        self.base.eq_ignore_ascii_case(base)
    }

    pub fn primary_type(&self) -> &str {
        self.base.split('/').next().unwrap_or("")
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn set_param(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self
            .params
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
        {
            Some(entry) => entry.1 = value,
            None => self.params.push((name.to_ascii_lowercase(), value)),
        }
    }

    pub fn with_param(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_param(name, value);
        self
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)?;
        for (k, v) in &self.params {
            write!(f, "; {}={}", k, quote_if_needed(v))?;
        }
        Ok(())
    }
}

/// Parses `; key=value; key2="quoted; value"` style parameters. Keys are
/// lower-cased; segments without `=` are ignored.
pub fn parse_parameters(input: &str) -> Vec<(String, String)> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escaped = false;

    for c in input.chars() {
        if escaped {
            current.push(c);
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quotes => {
                current.push(c);
                escaped = true;
            }
            '"' => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            ';' if !in_quotes => segments.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    segments.push(current);

    segments
        .iter()
        .filter_map(|segment| {
            let (key, value) = segment.split_once('=')?;
            let key = key.trim().to_ascii_lowercase();
            if key.is_empty() {
                return None;
            }
            Some((key, unquote(value.trim())))
        })
        .collect()
}

/// `filename` parameter of a `Content-Disposition` value, if present and not blank.
pub fn disposition_filename(value: &str) -> Option<String> {
    let rest = value.split_once(';').map(|(_, r)| r)?;
    parse_parameters(rest)
        .into_iter()
        .find(|(k, _)| k == "filename")
        .map(|(_, v)| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn unquote(value: &str) -> String {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        let inner = &value[1..value.len() - 1];
        let mut out = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            } else {
                out.push(c);
            }
        }
        out
    } else {
        value.to_string()
    }
}

fn quote_if_needed(value: &str) -> String {
    const SPECIALS: &str = "()<>@,;:\\\"/[]?=";
    let needs_quotes =
        value.is_empty() || value.chars().any(|c| c.is_whitespace() || SPECIALS.contains(c));
    if !needs_quotes {
        return value.to_string();
    }
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escaped)
}

// =============================================================================
// MIME PART
// =============================================================================

/// One MIME entity: headers plus raw body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MimePart {
    headers: Headers,
    body: Vec<u8>,
}

impl MimePart {
    pub fn new(headers: Headers, body: impl Into<Vec<u8>>) -> Self {
        Self {
            headers,
            body: body.into(),
        }
    }

    /// Builds a part from an HTTP entity: the content type becomes the only header.
    pub fn from_entity(content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        let mut headers = Headers::new();
        headers.set(header::CONTENT_TYPE, content_type);
        Self::new(headers, body)
    }

    pub fn text(text: &str) -> Self {
        Self::from_entity("text/plain", text.as_bytes().to_vec())
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_body(self) -> Vec<u8> {
        self.body
    }

    pub fn content_type(&self) -> Option<ContentType> {
        self.headers.get(header::CONTENT_TYPE).map(ContentType::parse)
    }

    /// Raw `Content-Type` header value, or `""`.
    pub fn content_type_value(&self) -> &str {
        self.headers.get_or_empty(header::CONTENT_TYPE)
    }

    pub fn is_mime_type(&self, base: &str) -> bool {
        self.content_type().map(|ct| ct.is(base)).unwrap_or(false)
    }

    /// Canonical serialization: `Name: value` lines, a blank line, the body.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.body.len() + 256);
        for (name, value) in self.headers.iter() {
            out.extend_from_slice(name.as_bytes());
            out.extend_from_slice(b": ");
            out.extend_from_slice(value.as_bytes());
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(b"\r\n");
        out.extend_from_slice(&self.body);
        out
    }

    pub fn parse(raw: &[u8]) -> Result<Self, MimeError> {
        let (head, body) = split_header_block(raw);
        let headers = parse_header_block(head)?;
        Ok(Self::new(headers, body.to_vec()))
    }
}

fn split_header_block(raw: &[u8]) -> (&[u8], &[u8]) {
    if raw.starts_with(b"\r\n") {
        return (&[], &raw[2..]);
    }
    if raw.starts_with(b"\n") {
        return (&[], &raw[1..]);
    }
    if let Some(i) = find(raw, b"\r\n\r\n", 0) {
        return (&raw[..i], &raw[i + 4..]);
    }
    if let Some(i) = find(raw, b"\n\n", 0) {
        return (&raw[..i], &raw[i + 2..]);
    }
    (raw, &[])
}

/// Parses `Name: value` lines, unfolding continuation lines.
pub fn parse_header_block(head: &[u8]) -> Result<Headers, MimeError> {
    let text = String::from_utf8_lossy(head);
    let mut entries: Vec<(String, String)> = Vec::new();

    for line in text.split('\n') {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        if line.starts_with(' ') || line.starts_with('\t') {
            match entries.last_mut() {
                Some((_, value)) => {
                    value.push(' ');
                    value.push_str(line.trim());
                }
                None => return Err(MimeError::MalformedHeader(line.to_string())),
            }
            continue;
        }
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| MimeError::MalformedHeader(line.to_string()))?;
        entries.push((name.trim().to_string(), value.trim().to_string()));
    }

    Ok(entries.into_iter().collect())
}

// =============================================================================
// MULTIPART
// =============================================================================

/// A `multipart/*` body under construction or after splitting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Multipart {
    content_type: ContentType,
    parts: Vec<MimePart>,
}

impl Multipart {
    /// `subtype` may carry parameters, e.g. `report; report-type=disposition-notification`.
    /// A boundary is generated unless one is given.
    pub fn new(subtype: &str) -> Self {
        Self::with_content_type(ContentType::parse(&format!("multipart/{}", subtype)))
    }

    pub fn with_content_type(mut content_type: ContentType) -> Self {
        if content_type.param("boundary").is_none() {
            content_type.set_param("boundary", generate_boundary());
        }
        Self {
            content_type,
            parts: Vec::new(),
        }
    }

    pub fn push(&mut self, part: MimePart) {
        self.parts.push(part);
    }

    pub fn parts(&self) -> &[MimePart] {
        &self.parts
    }

    pub fn content_type(&self) -> &ContentType {
        &self.content_type
    }

    pub fn boundary(&self) -> &str {
        self.content_type.param("boundary").unwrap_or("")
    }

    pub fn to_body(&self) -> Vec<u8> {
        let boundary = self.boundary();
        let mut out = Vec::new();
        for part in &self.parts {
            out.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
            out.extend_from_slice(&part.to_bytes());
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());
        out
    }

    /// Wraps the multipart into a single part carrying its `Content-Type`.
    pub fn into_part(self) -> MimePart {
        let body = self.to_body();
        MimePart::from_entity(&self.content_type.to_string(), body)
    }

    pub fn parse(part: &MimePart) -> Result<Self, MimeError> {
        let content_type = part.content_type().ok_or(MimeError::MissingContentType)?;
        if !content_type.primary_type().eq_ignore_ascii_case("multipart") {
            return Err(MimeError::NotMultipart(content_type.base().to_string()));
        }
        let boundary = content_type
            .param("boundary")
            .ok_or(MimeError::MissingBoundary)?
            .to_string();

        let parts = split_parts(part.body(), &boundary)?
            .into_iter()
            .map(MimePart::parse)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            content_type,
            parts,
        })
    }
}

/// Splits a multipart body into the raw bytes of each enclosed part.
///
/// The raw slices are what a detached signature covers, so they are returned
/// untouched rather than re-serialized.
pub fn split_parts<'a>(body: &'a [u8], boundary: &str) -> Result<Vec<&'a [u8]>, MimeError> {
    let delimiter = format!("--{}", boundary).into_bytes();
    let mut parts = Vec::new();
    let mut pos = find_delimiter(body, &delimiter, 0).ok_or(MimeError::Unterminated)?;

    loop {
        let after = pos + delimiter.len();
        if body[after..].starts_with(b"--") {
            break;
        }
        let content_start = find(body, b"\n", after)
            .map(|i| i + 1)
            .ok_or(MimeError::Unterminated)?;
        let next = find_delimiter(body, &delimiter, content_start).ok_or(MimeError::Unterminated)?;

        let mut end = next;
        if end > content_start && body[end - 1] == b'\n' {
            end -= 1;
            if end > content_start && body[end - 1] == b'\r' {
                end -= 1;
            }
        }
        parts.push(&body[content_start..end]);
        pos = next;
    }

    Ok(parts)
}

/// Finds `delimiter` at the start of a line, at or after `from`.
fn find_delimiter(body: &[u8], delimiter: &[u8], from: usize) -> Option<usize> {
    let mut start = from;
    while let Some(i) = find(body, delimiter, start) {
        if i == 0 || body[i - 1] == b'\n' {
            return Some(i);
        }
        start = i + 1;
    }
    None
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() || from >= haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|i| i + from)
}

pub fn generate_boundary() -> String {
    format!("----=_Part_{}", Uuid::new_v4().simple())
}
