//! One-dimensional PostgreSQL arrays.
//!
//! Binary layout: `ndim: i32`, `has_null: i32`, `element_oid: u32`, then per
//! dimension `len: i32` and `lower_bound: i32`, then each element as an `i32`
//! length (`-1` for `NULL`) followed by its bytes. Text layout: `{a,b,NULL}`
//! with double-quoted elements where needed.

use std::borrow::Cow;

use crate::{
    codec::Codec,
    error::{Result, TypeError},
    map::TypeMap,
    oid::{Format, Oid},
    plan::{Arg, Dest, EncodePlan, IsNull, ScanPlan, Value},
};

/// Codec for arrays whose elements are handled by the type registered for
/// `element_oid`.
#[derive(Debug, Clone, Copy)]
pub struct ArrayCodec {
    element_oid: Oid,
}

impl ArrayCodec {
    pub fn new(element_oid: Oid) -> Self {
        Self { element_oid }
    }

    pub fn element_oid(&self) -> Oid {
        self.element_oid
    }
}

impl Codec for ArrayCodec {
    fn preferred_format(&self) -> Format {
        Format::Binary
    }

    fn plan_encode(
        &self,
        map: &TypeMap,
        _oid: Oid,
        format: Format,
        value: &Arg<'_>,
    ) -> Option<Box<dyn EncodePlan>> {
        let Arg::Array(source) = value else {
            return None;
        };

        // Elements share one Rust type, so the first one stands for all.
        let element = if source.is_empty() {
            None
        } else {
            Some(map.plan_encode(self.element_oid, format, &source.element(0))?)
        };

        Some(Box::new(EncodeArrayPlan {
            element_oid: self.element_oid,
            format,
            element,
        }))
    }

    fn plan_scan(
        &self,
        map: &TypeMap,
        _oid: Oid,
        format: Format,
        target: &mut Dest<'_>,
    ) -> Option<Box<dyn ScanPlan>> {
        let Dest::Array(sink) = target else {
            return None;
        };

        let mut probe = sink.probe();
        let element = map.plan_scan(self.element_oid, format, &mut probe.as_dest())?;

        Some(Box::new(ScanArrayPlan { format, element }))
    }

    fn decode_value(
        &self,
        map: &TypeMap,
        _oid: Oid,
        format: Format,
        src: Option<&[u8]>,
    ) -> Result<Option<Value>> {
        let Some(src) = src else {
            return Ok(None);
        };

        let values = parse(format, src)?
            .into_iter()
            .map(|element| map.decode_value(self.element_oid, format, element.as_deref()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Some(Box::new(values)))
    }
}

struct EncodeArrayPlan {
    element_oid: Oid,
    format: Format,
    element: Option<Box<dyn EncodePlan>>,
}

impl EncodePlan for EncodeArrayPlan {
    fn encode(&self, value: &Arg<'_>, buf: &mut Vec<u8>) -> Result<IsNull> {
        let Arg::Array(source) = value else {
            return Err(TypeError::UnexpectedTarget("ArraySource"));
        };

        let len = source.len();
        let element = match (&self.element, len) {
            (_, 0) => None,
            (Some(element), _) => Some(element),
            (None, _) => {
                return Err(TypeError::NoEncodePlan {
                    oid: self.element_oid,
                    format: self.format,
                    type_name: source.element(0).type_name(),
                })
            }
        };

        match self.format {
            Format::Binary => {
                let ndim = i32::from(len > 0);
                buf.extend_from_slice(&ndim.to_be_bytes());
                let has_null_at = buf.len();
                buf.extend_from_slice(&0i32.to_be_bytes());
                buf.extend_from_slice(&self.element_oid.to_be_bytes());

                if len > 0 {
                    buf.extend_from_slice(&to_i32(len)?.to_be_bytes());
                    buf.extend_from_slice(&1i32.to_be_bytes());
                }

                let mut has_null = false;
                for index in 0..len {
                    let len_at = buf.len();
                    buf.extend_from_slice(&(-1i32).to_be_bytes());

                    if let Some(element) = element {
                        if element.encode(&source.element(index), buf)? == IsNull::Yes {
                            buf.truncate(len_at + 4);
                            has_null = true;
                            continue;
                        }
                    }

                    let written = to_i32(buf.len() - len_at - 4)?;
                    buf[len_at..len_at + 4].copy_from_slice(&written.to_be_bytes());
                }

                if has_null {
                    buf[has_null_at..has_null_at + 4].copy_from_slice(&1i32.to_be_bytes());
                }
            }
            Format::Text => {
                buf.push(b'{');

                for index in 0..len {
                    if index > 0 {
                        buf.push(b',');
                    }

                    let mut text = Vec::new();
                    let is_null = match element {
                        Some(element) => element.encode(&source.element(index), &mut text)?,
                        None => IsNull::Yes,
                    };

                    match is_null {
                        IsNull::Yes => buf.extend_from_slice(b"NULL"),
                        IsNull::No => quote_element(&text, buf),
                    }
                }

                buf.push(b'}');
            }
        }

        Ok(IsNull::No)
    }
}

struct ScanArrayPlan {
    format: Format,
    element: Box<dyn ScanPlan>,
}

impl ScanPlan for ScanArrayPlan {
    fn scan(&self, src: Option<&[u8]>, dst: &mut Dest<'_>) -> Result<()> {
        let Dest::Array(sink) = dst else {
            return Err(TypeError::UnexpectedTarget("ArraySink"));
        };

        sink.clear();

        let Some(src) = src else {
            return Ok(());
        };

        for element in parse(self.format, src)? {
            let mut target = sink.push_default();
            self.element.scan(element.as_deref(), &mut target)?;
        }

        Ok(())
    }
}

fn to_i32(len: usize) -> Result<i32> {
    i32::try_from(len).map_err(|_| TypeError::InvalidArray(format!("length {len} overflows i32")))
}

fn parse(format: Format, src: &[u8]) -> Result<Vec<Option<Cow<'_, [u8]>>>> {
    match format {
        Format::Binary => parse_binary(src),
        Format::Text => parse_text(src),
    }
}

fn read_i32(src: &[u8], pos: &mut usize) -> Result<i32> {
    let bytes = src
        .get(*pos..*pos + 4)
        .ok_or_else(|| TypeError::InvalidArray("unexpected end of data".to_owned()))?;
    *pos += 4;

    Ok(i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn parse_binary(src: &[u8]) -> Result<Vec<Option<Cow<'_, [u8]>>>> {
    let mut pos = 0;
    let ndim = read_i32(src, &mut pos)?;
    let _has_null = read_i32(src, &mut pos)?;
    let _element_oid = read_i32(src, &mut pos)?;

    let len = match ndim {
        0 => 0,
        1 => {
            let len = read_i32(src, &mut pos)?;
            let _lower_bound = read_i32(src, &mut pos)?;
            usize::try_from(len)
                .map_err(|_| TypeError::InvalidArray(format!("negative dimension {len}")))?
        }
        ndim if ndim > 1 => {
            return Err(TypeError::InvalidArray(format!(
                "{ndim} dimensions, only one is supported"
            )))
        }
        ndim => return Err(TypeError::InvalidArray(format!("invalid ndim {ndim}"))),
    };

    // len is untrusted, so elements grow as they are read
    let mut elements = Vec::new();
    for _ in 0..len {
        let element_len = read_i32(src, &mut pos)?;
        if element_len == -1 {
            elements.push(None);
            continue;
        }

        let element_len = usize::try_from(element_len).map_err(|_| {
            TypeError::InvalidArray(format!("invalid element length {element_len}"))
        })?;
        let element = src
            .get(pos..pos + element_len)
            .ok_or_else(|| TypeError::InvalidArray("unexpected end of data".to_owned()))?;
        pos += element_len;

        elements.push(Some(Cow::Borrowed(element)));
    }

    if pos != src.len() {
        return Err(TypeError::InvalidArray(format!(
            "{} trailing bytes",
            src.len() - pos
        )));
    }

    Ok(elements)
}

fn parse_text(src: &[u8]) -> Result<Vec<Option<Cow<'_, [u8]>>>> {
    let [b'{', inner @ .., b'}'] = src else {
        return Err(TypeError::InvalidArray(format!(
            "malformed array literal {:?}",
            String::from_utf8_lossy(src)
        )));
    };

    let mut elements = Vec::new();
    if inner.trim_ascii().is_empty() {
        return Ok(elements);
    }

    let mut pos = 0;
    loop {
        pos = skip_whitespace(inner, pos);

        match inner.get(pos) {
            Some(b'{') => {
                return Err(TypeError::InvalidArray(
                    "multi-dimensional arrays are not supported".to_owned(),
                ))
            }
            Some(b'"') => {
                let mut element = Vec::new();
                pos += 1;
                loop {
                    match inner.get(pos) {
                        Some(b'\\') => {
                            let escaped = inner.get(pos + 1).ok_or_else(|| {
                                TypeError::InvalidArray("unterminated escape".to_owned())
                            })?;
                            element.push(*escaped);
                            pos += 2;
                        }
                        Some(b'"') => {
                            pos += 1;
                            break;
                        }
                        Some(b) => {
                            element.push(*b);
                            pos += 1;
                        }
                        None => {
                            return Err(TypeError::InvalidArray(
                                "unterminated quoted element".to_owned(),
                            ))
                        }
                    }
                }
                elements.push(Some(Cow::Owned(element)));
            }
            _ => {
                let end = inner[pos..]
                    .iter()
                    .position(|b| *b == b',')
                    .map_or(inner.len(), |offset| pos + offset);
                let element = inner[pos..end].trim_ascii();

                if element.is_empty() {
                    return Err(TypeError::InvalidArray("empty element".to_owned()));
                }

                if element.eq_ignore_ascii_case(b"NULL") {
                    elements.push(None);
                } else {
                    elements.push(Some(Cow::Borrowed(element)));
                }
                pos = end;
            }
        }

        pos = skip_whitespace(inner, pos);

        match inner.get(pos) {
            Some(b',') => pos += 1,
            None => return Ok(elements),
            Some(b) => {
                return Err(TypeError::InvalidArray(format!(
                    "unexpected {:?} after element",
                    char::from(*b)
                )))
            }
        }
    }
}

fn skip_whitespace(src: &[u8], pos: usize) -> usize {
    src[pos..]
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .map_or(src.len(), |offset| pos + offset)
}

fn quote_element(text: &[u8], buf: &mut Vec<u8>) {
    let needs_quotes = text.is_empty()
        || text.eq_ignore_ascii_case(b"NULL")
        || text
            .iter()
            .any(|b| matches!(b, b'"' | b'\\' | b',' | b'{' | b'}') || b.is_ascii_whitespace());

    if !needs_quotes {
        buf.extend_from_slice(text);
        return;
    }

    buf.push(b'"');
    for b in text {
        if matches!(b, b'"' | b'\\') {
            buf.push(b'\\');
        }
        buf.push(*b);
    }
    buf.push(b'"');
}
