//! STRUCTURED-DATA: ordered `[SD-ID PARAM-NAME="PARAM-VALUE" ...]` groups.

use std::borrow::Cow;
use std::fmt::{self, Display, Write};

use crate::message::RawElement;
use crate::multimap::OrderedMultiMap;
use crate::{Error, Result, NILVALUE};

/// SD-NAME = 1*32PRINTUSASCII
pub const SD_NAME_MAX_LEN: usize = 32;

/// PRINTUSASCII except `=`, SP, `]` and `"`.
#[inline]
pub(crate) fn is_sd_name_byte(ch: u8) -> bool {
    (33..=126).contains(&ch) && ch != b'=' && ch != b']' && ch != b'"'
}

fn validate_sd_name(kind: &'static str, name: &str) -> Result<()> {
    if name.is_empty() || name.len() > SD_NAME_MAX_LEN || !name.bytes().all(is_sd_name_byte) {
        return Err(Error::InvalidSdName {
            kind,
            value: name.to_owned(),
        });
    }

    Ok(())
}

/// Escape `\`, `"` and `]` with a backslash, in one pass.
///
/// Every backslash is escaped, including one that arrived in front of an
/// ordinary character. The value survives a parse and serialize cycle but
/// the wire text may not: `t\u` is read as `t\u` and written as `t\\u`.
///
/// ```
/// use syslog5424::{escape_param_value, unescape_param_value};
///
/// assert_eq!(unescape_param_value(r"t\u"), r"t\u");
/// assert_eq!(escape_param_value(r"t\u"), r"t\\u");
/// ```
pub fn escape_param_value(value: &str) -> Cow<'_, str> {
    if !value.contains(['\\', '"', ']']) {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 4);
    for ch in value.chars() {
        if matches!(ch, '\\' | '"' | ']') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }

    Cow::Owned(escaped)
}

/// Reverse of [`escape_param_value`]. A backslash in front of anything else
/// than `\`, `"` or `]` is kept as it is.
pub fn unescape_param_value(value: &str) -> Cow<'_, str> {
    if !value.contains('\\') {
        return Cow::Borrowed(value);
    }

    let mut unescaped = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            unescaped.push(ch);
            continue;
        }

        match chars.next() {
            Some(next @ ('\\' | '"' | ']')) => unescaped.push(next),
            Some(next) => {
                unescaped.push('\\');
                unescaped.push(next);
            }
            None => unescaped.push('\\'),
        }
    }

    Cow::Owned(unescaped)
}

/// A PARAM-VALUE before escaping.
///
/// Every variant has one text form; two values are equal when their text
/// forms are, so `SdValue::Int(3)` equals the `"3"` read back off the wire.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum SdValue {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl SdValue {
    pub fn as_str(&self) -> Cow<'_, str> {
        match self {
            SdValue::Str(s) => Cow::Borrowed(s),
            other => Cow::Owned(other.to_string()),
        }
    }
}

impl Display for SdValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SdValue::Str(s) => f.write_str(s),
            SdValue::Int(i) => write!(f, "{i}"),
            SdValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl PartialEq for SdValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (SdValue::Str(a), SdValue::Str(b)) => a == b,
            (SdValue::Int(a), SdValue::Int(b)) => a == b,
            (SdValue::Bool(a), SdValue::Bool(b)) => a == b,
            _ => self.as_str() == other.as_str(),
        }
    }
}

impl Eq for SdValue {}

impl PartialEq<str> for SdValue {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for SdValue {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl From<&str> for SdValue {
    fn from(value: &str) -> Self {
        SdValue::Str(value.to_owned())
    }
}

impl From<String> for SdValue {
    fn from(value: String) -> Self {
        SdValue::Str(value)
    }
}

impl From<Cow<'_, str>> for SdValue {
    fn from(value: Cow<'_, str>) -> Self {
        SdValue::Str(value.into_owned())
    }
}

impl From<bool> for SdValue {
    fn from(value: bool) -> Self {
        SdValue::Bool(value)
    }
}

macro_rules! sd_value_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for SdValue {
                fn from(value: $ty) -> Self {
                    SdValue::Int(value as i64)
                }
            }
        )*
    };
}

sd_value_from_int!(i8, i16, i32, i64, u8, u16, u32);

/// One SD-PARAM, rendered as `name="escaped value"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SdParam<'a> {
    pub name: &'a str,
    pub value: &'a SdValue,
}

impl Display for SdParam<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)?;
        f.write_str("=\"")?;
        f.write_str(&escape_param_value(&self.value.as_str()))?;
        f.write_char('"')
    }
}

/// An SD-ELEMENT: an SD-ID and its parameters, duplicates included.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SdElement {
    id: String,
    params: OrderedMultiMap<String, SdValue>,
}

impl SdElement {
    /// Build an element from `(name, value)` pairs, either a sequence of
    /// tuples or a plain mapping.
    ///
    /// ```
    /// use syslog5424::SdElement;
    ///
    /// let element = SdElement::new("exampleSDID@32473", [("param1", 1), ("param2", 2)]).unwrap();
    /// assert_eq!(element.to_string(), r#"[exampleSDID@32473 param1="1" param2="2"]"#);
    /// ```
    pub fn new<I, K, V>(id: impl Into<String>, params: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<SdValue>,
    {
        let id = id.into();
        validate_sd_name("SD-ID", &id)?;

        let mut element = SdElement {
            id,
            params: OrderedMultiMap::new(),
        };
        for (name, value) in params {
            element.insert(name, value)?;
        }

        Ok(element)
    }

    /// Appends a parameter, keeping any earlier ones with the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<SdValue>) -> Result<()> {
        let name = name.into();
        validate_sd_name("PARAM-NAME", &name)?;
        self.params.insert(name, value.into());

        Ok(())
    }

    pub(crate) fn from_raw(raw: &RawElement<'_>) -> Self {
        let params = raw
            .params
            .iter()
            .map(|(name, value)| ((*name).to_owned(), unescape_param_value(value).into()))
            .collect();

        SdElement {
            id: raw.id.to_owned(),
            params,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn sd_params(&self) -> &OrderedMultiMap<String, SdValue> {
        &self.params
    }

    pub fn params(&self) -> impl Iterator<Item = SdParam<'_>> + '_ {
        self.params
            .all_items()
            .map(|(name, value)| SdParam { name, value })
    }

    /// First value of the parameter called `name`.
    pub fn get(&self, name: &str) -> Option<&SdValue> {
        self.params.get(name)
    }

    pub fn get_all<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a SdValue> + 'a {
        self.params.get_all(name)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl Display for SdElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('[')?;
        f.write_str(&self.id)?;
        for param in self.params() {
            write!(f, " {param}")?;
        }
        f.write_char(']')
    }
}

/// The STRUCTURED-DATA block. Renders as NILVALUE when empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StructuredData {
    elements: Vec<SdElement>,
}

impl StructuredData {
    pub fn new(elements: impl IntoIterator<Item = SdElement>) -> Self {
        StructuredData {
            elements: elements.into_iter().collect(),
        }
    }

    pub fn elements(&self) -> &[SdElement] {
        &self.elements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SdElement> {
        self.elements.iter()
    }

    /// The first element with the given SD-ID.
    pub fn find(&self, id: &str) -> Option<&SdElement> {
        self.elements.iter().find(|element| element.id == id)
    }

    pub fn push(&mut self, element: SdElement) {
        self.elements.push(element);
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl Display for StructuredData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.elements.is_empty() {
            return f.write_str(NILVALUE);
        }

        for element in &self.elements {
            write!(f, "{element}")?;
        }

        Ok(())
    }
}

impl FromIterator<SdElement> for StructuredData {
    fn from_iter<I: IntoIterator<Item = SdElement>>(iter: I) -> Self {
        StructuredData::new(iter)
    }
}

impl<'a, 'b> FromIterator<&'a RawElement<'b>> for StructuredData {
    fn from_iter<I: IntoIterator<Item = &'a RawElement<'b>>>(iter: I) -> Self {
        iter.into_iter().map(SdElement::from_raw).collect()
    }
}

impl<'a> IntoIterator for &'a StructuredData {
    type Item = &'a SdElement;
    type IntoIter = std::slice::Iter<'a, SdElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}
