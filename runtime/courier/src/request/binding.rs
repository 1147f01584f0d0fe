use std::borrow::Cow;
use std::fmt::{Display, Formatter};

use super::BindingValue;

/// Where a parameter ends up in the compiled request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    /// The query string.
    Query,
    /// A `{name}` placeholder in the path template.
    Route,
    /// A request header.
    Header,
    /// A field of a url-encoded or multipart form body.
    Form,
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Location::Query => "query",
            Location::Route => "route",
            Location::Header => "header",
            Location::Form => "form",
        };
        f.write_str(s)
    }
}

/// How enum variants are written.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum EnumMode {
    /// The discriminant, e.g. `2`.
    #[default]
    Numeric,
    /// The variant name, lowercased.
    StringLower,
    /// The variant name, uppercased.
    StringUpper,
}

/// How collections are written.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CollectionMode {
    /// A single `name=a,b,c` pair, using the binding separator.
    #[default]
    Concatenated,
    /// One `name=v` pair per element.
    Recursive,
    /// One `name[i]=v` pair per element.
    Indexed,
    /// One `name[]=v` pair per element.
    Unordered,
}

impl Display for CollectionMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CollectionMode::Concatenated => "concatenated",
            CollectionMode::Recursive => "recursive",
            CollectionMode::Indexed => "indexed",
            CollectionMode::Unordered => "unordered",
        };
        f.write_str(s)
    }
}

/// Per-binding encoding settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    pub enum_mode: EnumMode,
    pub collection_mode: CollectionMode,
    /// Joins the elements of a [`CollectionMode::Concatenated`] collection.
    pub separator: &'static str,
    /// The file name of a form part.
    pub file_name: Option<&'static str>,
    /// The content type of a form part.
    pub content_type: Option<&'static str>,
}

impl EncodeOptions {
    pub const DEFAULT: EncodeOptions = EncodeOptions {
        enum_mode: EnumMode::Numeric,
        collection_mode: CollectionMode::Concatenated,
        separator: ",",
        file_name: None,
        content_type: None,
    };

    pub const fn enum_mode(mut self, mode: EnumMode) -> Self {
        self.enum_mode = mode;
        self
    }

    pub const fn collection_mode(mut self, mode: CollectionMode) -> Self {
        self.collection_mode = mode;
        self
    }

    pub const fn separator(mut self, separator: &'static str) -> Self {
        self.separator = separator;
        self
    }

    pub const fn file_name(mut self, file_name: &'static str) -> Self {
        self.file_name = Some(file_name);
        self
    }

    pub const fn content_type(mut self, content_type: &'static str) -> Self {
        self.content_type = Some(content_type);
        self
    }
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Identifies a binding: two bindings with the same key can't coexist in a request.
///
/// Header names are case-insensitive, so they are lowercased in the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BindingKey {
    pub location: Location,
    pub name: Cow<'static, str>,
}

/// A named value bound to a [`Location`] of the request.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterBinding<'a> {
    location: Location,
    name: Cow<'static, str>,
    value: Option<BindingValue<'a>>,
    options: EncodeOptions,
    required: bool,
}

impl<'a> ParameterBinding<'a> {
    pub fn new(
        location: Location,
        name: impl Into<Cow<'static, str>>,
        value: Option<BindingValue<'a>>,
    ) -> Self {
        Self {
            location,
            name: name.into(),
            value,
            options: EncodeOptions::DEFAULT,
            required: false,
        }
    }

    pub fn query(name: impl Into<Cow<'static, str>>, value: Option<BindingValue<'a>>) -> Self {
        Self::new(Location::Query, name, value)
    }

    pub fn route(name: impl Into<Cow<'static, str>>, value: Option<BindingValue<'a>>) -> Self {
        Self::new(Location::Route, name, value)
    }

    pub fn header(name: impl Into<Cow<'static, str>>, value: Option<BindingValue<'a>>) -> Self {
        Self::new(Location::Header, name, value)
    }

    pub fn form(name: impl Into<Cow<'static, str>>, value: Option<BindingValue<'a>>) -> Self {
        Self::new(Location::Form, name, value)
    }

    pub fn with_options(mut self, options: EncodeOptions) -> Self {
        self.options = options;
        self
    }

    /// Fail compilation if the binding has no value.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> Option<&BindingValue<'a>> {
        self.value.as_ref()
    }

    pub fn options(&self) -> &EncodeOptions {
        &self.options
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn key(&self) -> BindingKey {
        let name = match self.location {
            Location::Header if self.name.bytes().any(|b| b.is_ascii_uppercase()) => {
                Cow::Owned(self.name.to_ascii_lowercase())
            }
            _ => self.name.clone(),
        };
        BindingKey {
            location: self.location,
            name,
        }
    }
}

/// Combine the bindings inherited from a parent descriptor with a descriptor's own.
///
/// An own binding replaces any earlier binding with the same [`BindingKey`], which is
/// dropped from its position: the survivor takes the position of the own binding.
/// The same rule applies to duplicates within `own`.
pub fn merge_bindings<'a>(
    inherited: Vec<ParameterBinding<'a>>,
    own: Vec<ParameterBinding<'a>>,
) -> Vec<ParameterBinding<'a>> {
    let mut merged = inherited;
    for binding in own {
        let key = binding.key();
        merged.retain(|b| b.key() != key);
        merged.push(binding);
    }
    merged
}
