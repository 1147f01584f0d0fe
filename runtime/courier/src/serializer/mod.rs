//! Serializers and the registry that decides which one handles a given type.
//!
//! # Sections
//!
//! - [The `Serializer` contract](#the-serializer-contract)
//! - [Resolution](#resolution)
//! - [Reconfiguration](#reconfiguration)
//!
//! # The `Serializer` contract
//!
//! A [`Serializer`] turns a value into bytes (outbound, request bodies) and bytes back
//! into a value (inbound, response bodies).
//! Serializers are shared across every in-flight request: they must not hold any per-call
//! mutable state.
//!
//! courier ships three implementations:
//!
//! - [`JsonSerializer`], the default for both directions;
//! - [`UrlEncodedSerializer`], for `application/x-www-form-urlencoded` payloads;
//! - [`PlainTextSerializer`], for scalar `text/plain` payloads in a configurable [`Charset`].
//!
//! # Resolution
//!
//! [`SerializerRegistry::resolve`] picks a serializer for a `(type, direction)` pair:
//!
//! 1. the serializer registered for that exact type and direction;
//! 2. the serializer registered for that type in both directions;
//! 3. the registry default for that direction.
//!
//! Resolution never fails.
//!
//! # Reconfiguration
//!
//! Serializers are immutable once registered.
//! [`SerializerRegistry::configure`] swaps every registered instance of a concrete serializer
//! type for a reconfigured copy.
use std::any::Any;
use std::io::Read;

use bytes::Bytes;
use serde::de::DeserializeOwned;

mod charset;
mod errors;
mod json;
mod registry;
mod text;
mod urlencoded;

pub use charset::Charset;
pub use errors::{FormatError, SerializeError, UnsupportedCharset};
pub use json::JsonSerializer;
pub use registry::{SerializerRegistry, TypeDirectionKey, TypeKey};
pub use text::PlainTextSerializer;
pub use urlencoded::UrlEncodedSerializer;

/// The flow a serializer is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Deserializing a response body.
    Inbound,
    /// Serializing a request body.
    Outbound,
}

/// The directions a serializer registration applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectionScope {
    /// The registration applies to both inbound and outbound payloads.
    Both,
    /// The registration only applies to response bodies.
    Inbound,
    /// The registration only applies to request bodies.
    Outbound,
}

impl From<Direction> for DirectionScope {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Inbound => DirectionScope::Inbound,
            Direction::Outbound => DirectionScope::Outbound,
        }
    }
}

/// The callback a [`Serializer`] drives when deserializing.
///
/// It receives a type-erased deserializer positioned at the start of the payload.
pub type DeserializeSink<'a> = dyn for<'de> FnMut(&mut dyn erased_serde::Deserializer<'de>) -> Result<(), erased_serde::Error>
    + 'a;

/// A wire format for request and response bodies.
///
/// The trait is object-safe: the registry stores serializers as `Arc<dyn Serializer>`.
/// Use [`<dyn Serializer>::deserialize`](trait.Serializer.html#method.deserialize) for
/// typed deserialization.
pub trait Serializer: Any + Send + Sync + std::fmt::Debug {
    /// The MIME type of the payloads produced by this serializer, e.g. `application/json`.
    ///
    /// It is used for the outgoing `Content-Type` header and to disambiguate the
    /// serializer for incoming responses.
    fn content_type(&self) -> &str;

    /// The text encoding used by this serializer, if it is a text format.
    ///
    /// Text formats default to UTF-8.
    fn charset(&self) -> Option<Charset> {
        Some(Charset::Utf8)
    }

    /// Serialize `value` into a payload.
    fn serialize(&self, value: &dyn erased_serde::Serialize) -> Result<Bytes, SerializeError>;

    /// Parse `input` and hand a deserializer over to `sink`.
    ///
    /// Any failure, either while reading the payload or inside `sink`, is reported as a
    /// [`FormatError`].
    fn deserialize_erased(
        &self,
        input: &mut dyn Read,
        sink: &mut DeserializeSink<'_>,
    ) -> Result<(), FormatError>;
}

impl dyn Serializer {
    /// Deserialize a value of type `T` from `input`.
    pub fn deserialize<T>(&self, mut input: impl Read) -> Result<T, FormatError>
    where
        T: DeserializeOwned,
    {
        let mut output = None;
        self.deserialize_erased(
            &mut input,
            &mut |deserializer: &mut dyn erased_serde::Deserializer<'_>| {
                output = Some(erased_serde::deserialize::<T>(deserializer)?);
                Ok(())
            },
        )
        .map_err(|e| e.for_type(std::any::type_name::<T>()))?;
        output.ok_or_else(|| {
            FormatError::new("the serializer never produced a value")
                .for_type(std::any::type_name::<T>())
        })
    }

    /// The value of the `Content-Type` header for payloads produced by this serializer,
    /// including the `charset` parameter for text formats.
    pub fn media_type(&self) -> String {
        match self.charset() {
            Some(charset) => format!("{}; charset={}", self.content_type(), charset),
            None => self.content_type().to_owned(),
        }
    }

    /// Returns `true` if the concrete type of this serializer is `S`.
    pub fn is<S: Serializer>(&self) -> bool {
        (self as &dyn Any).is::<S>()
    }

    /// Returns a reference to the concrete serializer, if it is of type `S`.
    pub fn downcast_ref<S: Serializer>(&self) -> Option<&S> {
        (self as &dyn Any).downcast_ref::<S>()
    }
}
