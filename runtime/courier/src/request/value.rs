use std::borrow::Cow;
use std::collections::{BTreeSet, VecDeque};

/// The value bound to a request parameter, before encoding.
///
/// Values borrow from the descriptor they were extracted from whenever possible.
#[derive(Debug, Clone, PartialEq)]
pub enum BindingValue<'a> {
    /// A string, a number, a boolean or a character.
    Scalar(Scalar<'a>),
    /// A variant of a fieldless enum.
    Enum(EnumVariant),
    /// A sequence of values, encoded according to the binding's
    /// [`CollectionMode`](crate::CollectionMode).
    Collection(Vec<BindingValue<'a>>),
    /// Raw bytes: base64-encoded, or sent as a binary part in a form.
    Bytes(Cow<'a, [u8]>),
    /// The textual representation of a structured value, see [`Representable`].
    Composite(Cow<'a, str>),
}

/// A scalar [`BindingValue`].
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar<'a> {
    Str(Cow<'a, str>),
    Bool(bool),
    Int(i128),
    UInt(u128),
    F32(f32),
    F64(f64),
    Char(char),
}

/// The symbolic name and the discriminant of an enum variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumVariant {
    pub name: &'static str,
    pub discriminant: i64,
}

impl<'a> BindingValue<'a> {
    /// A string scalar.
    pub fn str(value: impl Into<Cow<'a, str>>) -> Self {
        BindingValue::Scalar(Scalar::Str(value.into()))
    }

    /// Detach the value from the descriptor it borrows from.
    pub fn into_owned(self) -> BindingValue<'static> {
        match self {
            BindingValue::Scalar(Scalar::Str(s)) => {
                BindingValue::Scalar(Scalar::Str(Cow::Owned(s.into_owned())))
            }
            BindingValue::Scalar(Scalar::Bool(b)) => BindingValue::Scalar(Scalar::Bool(b)),
            BindingValue::Scalar(Scalar::Int(i)) => BindingValue::Scalar(Scalar::Int(i)),
            BindingValue::Scalar(Scalar::UInt(u)) => BindingValue::Scalar(Scalar::UInt(u)),
            BindingValue::Scalar(Scalar::F32(f)) => BindingValue::Scalar(Scalar::F32(f)),
            BindingValue::Scalar(Scalar::F64(f)) => BindingValue::Scalar(Scalar::F64(f)),
            BindingValue::Scalar(Scalar::Char(c)) => BindingValue::Scalar(Scalar::Char(c)),
            BindingValue::Enum(v) => BindingValue::Enum(v),
            BindingValue::Collection(items) => {
                BindingValue::Collection(items.into_iter().map(BindingValue::into_owned).collect())
            }
            BindingValue::Bytes(b) => BindingValue::Bytes(Cow::Owned(b.into_owned())),
            BindingValue::Composite(c) => BindingValue::Composite(Cow::Owned(c.into_owned())),
        }
    }
}

/// Types that can be bound to a request parameter.
///
/// `None` means "no value": the parameter is left out of the request.
/// Empty collections, and collections whose elements are all absent, have no value.
pub trait ToBindingValue {
    fn to_binding_value(&self) -> Option<BindingValue<'_>>;
}

/// Fieldless enums that can be sent either by name or by discriminant.
///
/// Derive it with `#[derive(courier::EnumValue)]`.
pub trait EnumValue {
    /// The symbolic name of the variant, before any case conversion.
    fn variant_name(&self) -> &'static str;
    /// The numeric value of the variant.
    fn discriminant(&self) -> i64;

    fn to_variant(&self) -> EnumVariant {
        EnumVariant {
            name: self.variant_name(),
            discriminant: self.discriminant(),
        }
    }
}

/// Structured values that travel as a single string, e.g. a `user:group` pair.
///
/// Implement it and invoke [`representable!`](crate::representable) to make the type
/// usable as a binding.
pub trait Representable {
    fn representation(&self) -> String;
}

/// Implement [`ToBindingValue`] for types that implement [`Representable`].
///
/// ```rust
/// use courier::{Representable, representable};
///
/// pub struct Credentials {
///     user: String,
///     group: String,
/// }
///
/// impl Representable for Credentials {
///     fn representation(&self) -> String {
///         format!("{}:{}", self.user, self.group)
///     }
/// }
///
/// representable!(Credentials);
/// ```
#[macro_export]
macro_rules! representable {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::ToBindingValue for $ty {
                fn to_binding_value(&self) -> ::core::option::Option<$crate::BindingValue<'_>> {
                    ::core::option::Option::Some($crate::BindingValue::Composite(
                        ::std::borrow::Cow::Owned($crate::Representable::representation(self)),
                    ))
                }
            }
        )+
    };
}

impl ToBindingValue for str {
    fn to_binding_value(&self) -> Option<BindingValue<'_>> {
        Some(BindingValue::str(self))
    }
}

impl ToBindingValue for String {
    fn to_binding_value(&self) -> Option<BindingValue<'_>> {
        Some(BindingValue::str(self.as_str()))
    }
}

impl ToBindingValue for Cow<'_, str> {
    fn to_binding_value(&self) -> Option<BindingValue<'_>> {
        Some(BindingValue::str(self.as_ref()))
    }
}

impl ToBindingValue for bool {
    fn to_binding_value(&self) -> Option<BindingValue<'_>> {
        Some(BindingValue::Scalar(Scalar::Bool(*self)))
    }
}

impl ToBindingValue for char {
    fn to_binding_value(&self) -> Option<BindingValue<'_>> {
        Some(BindingValue::Scalar(Scalar::Char(*self)))
    }
}

impl ToBindingValue for f32 {
    fn to_binding_value(&self) -> Option<BindingValue<'_>> {
        Some(BindingValue::Scalar(Scalar::F32(*self)))
    }
}

impl ToBindingValue for f64 {
    fn to_binding_value(&self) -> Option<BindingValue<'_>> {
        Some(BindingValue::Scalar(Scalar::F64(*self)))
    }
}

macro_rules! signed {
    ($($ty:ty),+) => {
        $(
            impl ToBindingValue for $ty {
                fn to_binding_value(&self) -> Option<BindingValue<'_>> {
                    Some(BindingValue::Scalar(Scalar::Int(i128::from(*self))))
                }
            }
        )+
    };
}

macro_rules! unsigned {
    ($($ty:ty),+) => {
        $(
            impl ToBindingValue for $ty {
                fn to_binding_value(&self) -> Option<BindingValue<'_>> {
                    Some(BindingValue::Scalar(Scalar::UInt(u128::from(*self))))
                }
            }
        )+
    };
}

signed!(i8, i16, i32, i64, i128);
unsigned!(u8, u16, u32, u64, u128);

impl ToBindingValue for isize {
    fn to_binding_value(&self) -> Option<BindingValue<'_>> {
        Some(BindingValue::Scalar(Scalar::Int(*self as i128)))
    }
}

impl ToBindingValue for usize {
    fn to_binding_value(&self) -> Option<BindingValue<'_>> {
        Some(BindingValue::Scalar(Scalar::UInt(*self as u128)))
    }
}

impl<T: ToBindingValue + ?Sized> ToBindingValue for &T {
    fn to_binding_value(&self) -> Option<BindingValue<'_>> {
        (**self).to_binding_value()
    }
}

impl<T: ToBindingValue + ?Sized> ToBindingValue for Box<T> {
    fn to_binding_value(&self) -> Option<BindingValue<'_>> {
        (**self).to_binding_value()
    }
}

impl<T: ToBindingValue> ToBindingValue for Option<T> {
    fn to_binding_value(&self) -> Option<BindingValue<'_>> {
        self.as_ref().and_then(T::to_binding_value)
    }
}

/// Collect the present elements of a sequence, if there is at least one.
fn collection<'a, T, I>(items: I) -> Option<BindingValue<'a>>
where
    T: ToBindingValue + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let values: Vec<_> = items
        .into_iter()
        .filter_map(T::to_binding_value)
        .collect();
    (!values.is_empty()).then_some(BindingValue::Collection(values))
}

impl<T: ToBindingValue> ToBindingValue for [T] {
    fn to_binding_value(&self) -> Option<BindingValue<'_>> {
        collection(self)
    }
}

impl<T: ToBindingValue, const N: usize> ToBindingValue for [T; N] {
    fn to_binding_value(&self) -> Option<BindingValue<'_>> {
        collection(self)
    }
}

impl<T: ToBindingValue> ToBindingValue for Vec<T> {
    fn to_binding_value(&self) -> Option<BindingValue<'_>> {
        collection(self)
    }
}

impl<T: ToBindingValue> ToBindingValue for VecDeque<T> {
    fn to_binding_value(&self) -> Option<BindingValue<'_>> {
        collection(self)
    }
}

impl<T: ToBindingValue> ToBindingValue for BTreeSet<T> {
    fn to_binding_value(&self) -> Option<BindingValue<'_>> {
        collection(self)
    }
}

/// Binary content.
///
/// `Vec<u8>` is a collection of numbers: use [`bytes::Bytes`] for payloads.
impl ToBindingValue for bytes::Bytes {
    fn to_binding_value(&self) -> Option<BindingValue<'_>> {
        Some(BindingValue::Bytes(Cow::Borrowed(&self[..])))
    }
}

#[cfg(feature = "time")]
mod time {
    use super::{BindingValue, ToBindingValue};

    // RFC 3339 for instants, ISO 8601 for civil dates and times.
    impl ToBindingValue for jiff::Timestamp {
        fn to_binding_value(&self) -> Option<BindingValue<'_>> {
            Some(BindingValue::str(self.to_string()))
        }
    }

    impl ToBindingValue for jiff::civil::Date {
        fn to_binding_value(&self) -> Option<BindingValue<'_>> {
            Some(BindingValue::str(self.to_string()))
        }
    }

    impl ToBindingValue for jiff::civil::DateTime {
        fn to_binding_value(&self) -> Option<BindingValue<'_>> {
            Some(BindingValue::str(self.to_string()))
        }
    }
}
