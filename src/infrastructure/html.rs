// src/infrastructure/html.rs
//! Streaming HTML metadata extraction: one forward pass, no DOM, bounded
//! memory. Malformed markup is skipped or recovered from, never fatal.

use std::borrow::Cow;

use crate::domain::metadata::PageMetadata;

/// Elements whose bodies are raw text; no tags are recognized inside them
/// until the matching close tag.
const RAWTEXT_ELEMENTS: [&str; 2] = ["script", "style"];

/// Pull the metadata-bearing pieces out of an HTML document.
///
/// The first non-empty text run inside a `<title>` element becomes the
/// title; once set it is never replaced. For `<meta>` elements the last
/// non-empty `content` wins per slot. Empty content never overwrites.
pub fn extract_page_metadata(html: &str) -> PageMetadata {
    let mut page = PageMetadata::default();
    let mut tokenizer = Tokenizer::new(html);
    let mut in_title = false;

    while let Some(token) = tokenizer.next_token() {
        match token {
            Token::StartTag {
                name,
                attrs,
                self_closing,
            } => match name.as_str() {
                "title" if !self_closing => in_title = true,
                "meta" => capture_meta(&attrs, &mut page),
                _ => {}
            },
            Token::EndTag { name } => {
                if name == "title" {
                    in_title = false;
                }
            }
            Token::Text(text) => {
                if in_title && page.title.is_none() {
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        page.title = Some(trimmed.to_string());
                    }
                }
            }
        }
    }

    page
}

fn capture_meta(attrs: &[(String, String)], page: &mut PageMetadata) {
    let content = match attr(attrs, "content") {
        Some(content) if !content.is_empty() => content,
        _ => return,
    };

    let property = attr(attrs, "property")
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let name = attr(attrs, "name")
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    // property takes precedence over name, as a chain: an element can
    // fill exactly one slot.
    let slot = match property.as_str() {
        "og:title" => &mut page.og_title,
        "og:description" => &mut page.og_description,
        "og:image" => &mut page.og_image,
        "og:site_name" => &mut page.og_site_name,
        _ if name == "description" => &mut page.description,
        _ => return,
    };
    *slot = Some(content.to_string());
}

/// Last occurrence wins when an attribute repeats.
fn attr<'a>(attrs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .rev()
        .find(|(n, _)| n == name)
        .map(|(_, v)| v.as_str())
}

#[derive(Debug)]
enum Token<'a> {
    Text(Cow<'a, str>),
    StartTag {
        name: String,
        attrs: Vec<(String, String)>,
        self_closing: bool,
    },
    EndTag {
        name: String,
    },
}

struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    rawtext_element: Option<&'static str>,
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            rawtext_element: None,
        }
    }

    fn next_token(&mut self) -> Option<Token<'a>> {
        loop {
            if self.pos >= self.input.len() {
                return None;
            }

            if let Some(element) = self.rawtext_element {
                return Some(self.rawtext(element));
            }

            let rest = &self.input[self.pos..];
            if let Some(after_lt) = rest.strip_prefix('<') {
                match after_lt.bytes().next() {
                    Some(b'!') => {
                        self.skip_declaration();
                        continue;
                    }
                    Some(b'?') => {
                        self.skip_until_gt();
                        continue;
                    }
                    Some(b'/') => {
                        if let Some(token) = self.end_tag() {
                            return Some(token);
                        }
                        continue;
                    }
                    Some(c) if c.is_ascii_alphabetic() => {
                        if let Some(token) = self.start_tag() {
                            return Some(token);
                        }
                        continue;
                    }
                    // A '<' not opening anything is plain text.
                    _ => return Some(self.text_run(1)),
                }
            } else {
                return Some(self.text_run(0));
            }
        }
    }

    /// Text up to the next '<'. `offset` lets a stray '<' be swallowed
    /// into the run instead of re-triggering tag parsing.
    fn text_run(&mut self, offset: usize) -> Token<'a> {
        let start = self.pos;
        let search_from = (self.pos + offset).min(self.input.len());
        let end = match self.input[search_from..].find('<') {
            Some(i) => search_from + i,
            None => self.input.len(),
        };
        self.pos = end;
        Token::Text(decode_entities(&self.input[start..end]))
    }

    /// Body of a script/style element, up to (not including) its close
    /// tag. Entities are NOT decoded here.
    fn rawtext(&mut self, element: &'static str) -> Token<'a> {
        let bytes = self.input.as_bytes();
        let start = self.pos;
        let mut i = self.pos;

        loop {
            match self.input[i..].find("</") {
                None => {
                    self.pos = self.input.len();
                    self.rawtext_element = None;
                    return Token::Text(Cow::Borrowed(&self.input[start..]));
                }
                Some(rel) => {
                    let close_start = i + rel;
                    let name_start = close_start + 2;
                    let name_end = name_start + element.len();
                    let closes = name_end <= self.input.len()
                        && self.input[name_start..name_end].eq_ignore_ascii_case(element)
                        && matches!(
                            bytes.get(name_end),
                            None | Some(b'>' | b' ' | b'\t' | b'\n' | b'\r' | b'/')
                        );
                    if closes {
                        // Leave the close tag for the normal path.
                        self.pos = close_start;
                        self.rawtext_element = None;
                        return Token::Text(Cow::Borrowed(&self.input[start..close_start]));
                    }
                    i = close_start + 2;
                }
            }
        }
    }

    /// Comments, doctype and other `<!` constructs carry no metadata.
    fn skip_declaration(&mut self) {
        let rest = &self.input[self.pos..];
        if rest.starts_with("<!--") {
            match self.input[self.pos + 4..].find("-->") {
                Some(i) => self.pos = self.pos + 4 + i + 3,
                None => self.pos = self.input.len(),
            }
        } else {
            self.skip_until_gt();
        }
    }

    fn skip_until_gt(&mut self) {
        match self.input[self.pos..].find('>') {
            Some(i) => self.pos = self.pos + i + 1,
            None => self.pos = self.input.len(),
        }
    }

    fn end_tag(&mut self) -> Option<Token<'a>> {
        let name = read_name(self.input, self.pos + 2);
        match self.input[self.pos..].find('>') {
            Some(i) => {
                self.pos += i + 1;
                if name.is_empty() {
                    None
                } else {
                    Some(Token::EndTag { name })
                }
            }
            None => {
                // Unterminated at end of input: dropped.
                self.pos = self.input.len();
                None
            }
        }
    }

    fn start_tag(&mut self) -> Option<Token<'a>> {
        let bytes = self.input.as_bytes();
        let mut i = self.pos + 1;
        let name_start = i;
        while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'-') {
            i += 1;
        }
        let name = self.input[name_start..i].to_ascii_lowercase();

        let mut attrs: Vec<(String, String)> = Vec::new();
        let mut self_closing = false;

        loop {
            while i < bytes.len() && (bytes[i].is_ascii_whitespace() || bytes[i] == b'/') {
                self_closing = bytes[i] == b'/';
                i += 1;
            }
            if i >= bytes.len() {
                // Unterminated at end of input: dropped.
                self.pos = self.input.len();
                return None;
            }
            if bytes[i] == b'>' {
                self.pos = i + 1;
                if !self_closing {
                    self.rawtext_element =
                        RAWTEXT_ELEMENTS.iter().copied().find(|e| *e == name);
                }
                return Some(Token::StartTag {
                    name,
                    attrs,
                    self_closing,
                });
            }
            self_closing = false;

            let attr_start = i;
            while i < bytes.len()
                && !bytes[i].is_ascii_whitespace()
                && !matches!(bytes[i], b'=' | b'>' | b'/')
            {
                i += 1;
            }
            if i == attr_start {
                // Lone '=' or similar junk; step over it.
                i += 1;
                continue;
            }
            let attr_name = self.input[attr_start..i].to_ascii_lowercase();

            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }

            let value: Cow<'a, str> = if i < bytes.len() && bytes[i] == b'=' {
                i += 1;
                while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                if i < bytes.len() && (bytes[i] == b'"' || bytes[i] == b'\'') {
                    let quote = bytes[i];
                    i += 1;
                    let value_start = i;
                    while i < bytes.len() && bytes[i] != quote {
                        i += 1;
                    }
                    if i >= bytes.len() {
                        // Unterminated quote swallows the rest: dropped.
                        self.pos = self.input.len();
                        return None;
                    }
                    let value = decode_entities(&self.input[value_start..i]);
                    i += 1;
                    value
                } else {
                    let value_start = i;
                    while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                        i += 1;
                    }
                    decode_entities(&self.input[value_start..i])
                }
            } else {
                Cow::Borrowed("")
            };

            attrs.push((attr_name, value.into_owned()));
        }
    }
}

fn read_name(input: &str, start: usize) -> String {
    if start >= input.len() {
        return String::new();
    }
    input[start..]
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'-')
        .map(|b| b.to_ascii_lowercase() as char)
        .collect()
}

/// Decode the common named character references plus numeric ones.
/// Anything unrecognized stays literal.
fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let semicolon = tail[1..].find(';').filter(|i| *i <= 32);
        let decoded = semicolon.and_then(|i| decode_entity_body(&tail[1..1 + i]).map(|d| (d, i + 2)));
        match decoded {
            Some((decoded, consumed)) => {
                out.push(decoded);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn decode_entity_body(body: &str) -> Option<char> {
    match body {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let code = body.strip_prefix('#')?;
            let value = if let Some(hex) = code.strip_prefix(['x', 'X']) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                code.parse::<u32>().ok()?
            };
            char::from_u32(value)
        }
    }
}
