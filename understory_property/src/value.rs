// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dynamically typed property values.
//!
//! [`Value`] is a closed sum over the value types a property can declare, plus
//! [`Value::Invalid`], the "no value" sentinel. [`ValueType`] is the matching
//! type tag carried by a [`Property`](crate::Property).
//!
//! ## Conversions
//!
//! [`Value::convert`] defines which values are acceptable for a property whose
//! declared type differs from the value's own type:
//!
//! | From | To | Rule |
//! |---|---|---|
//! | any numeric or `Bool` | any numeric or `Bool` | range-checked; `Double` must be integral to become an integer; `Bool` maps to/from `0`/`1` (non-zero is `true`) |
//! | numeric, `Bool`, `Char`, `Url`, `Date`, `Time`, `DateTime` | `String` | textual form |
//! | `String` | numeric, `Bool`, `Char`, `Url`, `Date`, `Time`, `DateTime` | parsed; fails on malformed text |
//! | `String` | `Bytes`, `StringList` | UTF-8 bytes / single element list |
//! | `Bytes` | `String` | only valid UTF-8 |
//! | `DateTime` | `Date`, `Time` | component |
//! | `Date` | `DateTime` | at midnight |
//! | `Size` / `Rect` | `SizeF` / `RectF` | widened |
//! | `SizeF` / `RectF` | `Size` / `Rect` | only integral, in-range components |
//! | `Image` kinds | other `Image` kinds | retagged |
//!
//! [`Value::Invalid`] never converts.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::types::{
    BitArray, Color, CursorShape, FloatRect, Font, Image, ImageKind, IntRect, IntSize, Url,
};

/// ISO-8601 date format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// ISO-8601 time format; a fractional second is written only when non-zero.
pub const TIME_FORMAT: &str = "%H:%M:%S%.f";
/// ISO-8601 combined date and time format; a fractional second is written only
/// when non-zero.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// The declared type of a property.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// No type; used for category rows and for values that cannot be inferred.
    #[default]
    Unknown,
    /// `bool`.
    Bool,
    /// `i32`.
    Int,
    /// `u32`.
    UInt,
    /// `i64`.
    Int64,
    /// `u64`.
    UInt64,
    /// `f64`.
    Double,
    /// A single `char`.
    Char,
    /// UTF-8 text.
    String,
    /// A list of strings.
    StringList,
    /// Raw bytes.
    Bytes,
    /// Calendar date.
    Date,
    /// Wall-clock time.
    Time,
    /// Date and time without a zone.
    DateTime,
    /// [`Url`].
    Url,
    /// [`BitArray`].
    BitArray,
    /// [`IntSize`].
    Size,
    /// [`kurbo::Size`].
    SizeF,
    /// [`IntRect`].
    Rect,
    /// [`FloatRect`].
    RectF,
    /// [`Font`].
    Font,
    /// [`Color`].
    Color,
    /// [`Image`] of kind [`ImageKind::Image`].
    Image,
    /// [`Image`] of kind [`ImageKind::Pixmap`].
    Pixmap,
    /// [`Image`] of kind [`ImageKind::Bitmap`].
    Bitmap,
    /// [`Image`] of kind [`ImageKind::Icon`].
    Icon,
    /// [`CursorShape`].
    Cursor,
}

impl ValueType {
    /// Returns the type name used in diagnostics and by the image editor.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::UInt => "uint",
            Self::Int64 => "int64",
            Self::UInt64 => "uint64",
            Self::Double => "double",
            Self::Char => "char",
            Self::String => "String",
            Self::StringList => "StringList",
            Self::Bytes => "Bytes",
            Self::Date => "Date",
            Self::Time => "Time",
            Self::DateTime => "DateTime",
            Self::Url => "Url",
            Self::BitArray => "BitArray",
            Self::Size => "Size",
            Self::SizeF => "SizeF",
            Self::Rect => "Rect",
            Self::RectF => "RectF",
            Self::Font => "Font",
            Self::Color => "Color",
            Self::Image => "Image",
            Self::Pixmap => "Pixmap",
            Self::Bitmap => "Bitmap",
            Self::Icon => "Icon",
            Self::Cursor => "Cursor",
        }
    }

    /// Returns `true` for the numeric types and `Bool`.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::Bool | Self::Int | Self::UInt | Self::Int64 | Self::UInt64 | Self::Double
        )
    }

    /// Returns the image kind for the image types.
    #[must_use]
    pub const fn image_kind(self) -> Option<ImageKind> {
        match self {
            Self::Image => Some(ImageKind::Image),
            Self::Pixmap => Some(ImageKind::Pixmap),
            Self::Bitmap => Some(ImageKind::Bitmap),
            Self::Icon => Some(ImageKind::Icon),
            _ => None,
        }
    }

    /// Returns the default value of this type.
    ///
    /// `Unknown` and `Url` have no meaningful default and yield [`Value::Invalid`].
    #[must_use]
    pub fn default_value(self) -> Value {
        match self {
            Self::Unknown => Value::Invalid,
            Self::Bool => Value::Bool(false),
            Self::Int => Value::Int(0),
            Self::UInt => Value::UInt(0),
            Self::Int64 => Value::Int64(0),
            Self::UInt64 => Value::UInt64(0),
            Self::Double => Value::Double(0.0),
            Self::Char => Value::Char('\0'),
            Self::String => Value::String(String::new()),
            Self::StringList => Value::StringList(Vec::new()),
            Self::Bytes => Value::Bytes(Vec::new()),
            Self::Date => Value::Date(NaiveDate::default()),
            Self::Time => Value::Time(NaiveTime::default()),
            Self::DateTime => Value::DateTime(NaiveDateTime::default()),
            Self::Url => Value::Invalid,
            Self::BitArray => Value::BitArray(BitArray::default()),
            Self::Size => Value::Size(IntSize::default()),
            Self::SizeF => Value::SizeF(kurbo::Size::ZERO),
            Self::Rect => Value::Rect(IntRect::default()),
            Self::RectF => Value::RectF(FloatRect::ZERO),
            Self::Font => Value::Font(Font::default()),
            Self::Color => Value::Color(Color::default()),
            Self::Image | Self::Pixmap | Self::Bitmap | Self::Icon => {
                let kind = self.image_kind().unwrap_or_default();
                Value::Image(Image::empty(kind))
            }
            Self::Cursor => Value::Cursor(CursorShape::default()),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A dynamically typed property value.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// No value. Used for "differs across the selection" and for unset values.
    #[default]
    Invalid,
    /// `bool`.
    Bool(bool),
    /// `i32`.
    Int(i32),
    /// `u32`.
    UInt(u32),
    /// `i64`.
    Int64(i64),
    /// `u64`.
    UInt64(u64),
    /// `f64`.
    Double(f64),
    /// A single character.
    Char(char),
    /// UTF-8 text.
    String(String),
    /// A list of strings.
    StringList(Vec<String>),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// Calendar date.
    Date(NaiveDate),
    /// Wall-clock time.
    Time(NaiveTime),
    /// Date and time.
    DateTime(NaiveDateTime),
    /// URL.
    Url(Url),
    /// Bit sequence.
    BitArray(BitArray),
    /// Integer size.
    Size(IntSize),
    /// Floating-point size.
    SizeF(kurbo::Size),
    /// Integer rectangle.
    Rect(IntRect),
    /// Floating-point rectangle.
    RectF(FloatRect),
    /// Font.
    Font(Font),
    /// Color.
    Color(Color),
    /// Image, pixmap, bitmap or icon.
    Image(Image),
    /// Cursor shape.
    Cursor(CursorShape),
}

impl Value {
    /// Returns the runtime type of this value.
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Invalid => ValueType::Unknown,
            Self::Bool(_) => ValueType::Bool,
            Self::Int(_) => ValueType::Int,
            Self::UInt(_) => ValueType::UInt,
            Self::Int64(_) => ValueType::Int64,
            Self::UInt64(_) => ValueType::UInt64,
            Self::Double(_) => ValueType::Double,
            Self::Char(_) => ValueType::Char,
            Self::String(_) => ValueType::String,
            Self::StringList(_) => ValueType::StringList,
            Self::Bytes(_) => ValueType::Bytes,
            Self::Date(_) => ValueType::Date,
            Self::Time(_) => ValueType::Time,
            Self::DateTime(_) => ValueType::DateTime,
            Self::Url(_) => ValueType::Url,
            Self::BitArray(_) => ValueType::BitArray,
            Self::Size(_) => ValueType::Size,
            Self::SizeF(_) => ValueType::SizeF,
            Self::Rect(_) => ValueType::Rect,
            Self::RectF(_) => ValueType::RectF,
            Self::Font(_) => ValueType::Font,
            Self::Color(_) => ValueType::Color,
            Self::Image(image) => match image.kind() {
                ImageKind::Image => ValueType::Image,
                ImageKind::Pixmap => ValueType::Pixmap,
                ImageKind::Bitmap => ValueType::Bitmap,
                ImageKind::Icon => ValueType::Icon,
            },
            Self::Cursor(_) => ValueType::Cursor,
        }
    }

    /// Returns `false` only for [`Value::Invalid`].
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !matches!(self, Self::Invalid)
    }

    /// Returns `true` if [`Value::convert`] would succeed for `target`.
    #[must_use]
    pub fn can_convert(&self, target: ValueType) -> bool {
        self.convert(target).is_some()
    }

    /// Converts this value to `target` following the table in the module docs.
    ///
    /// Returns a clone when the value already has type `target`.
    #[must_use]
    pub fn convert(&self, target: ValueType) -> Option<Self> {
        let source = self.value_type();
        if source == ValueType::Unknown || target == ValueType::Unknown {
            return None;
        }
        if source == target {
            return Some(self.clone());
        }
        if source.is_numeric() && target.is_numeric() {
            return self.convert_numeric(target);
        }
        match (self, target) {
            (Self::String(text), _) => Self::parse_scalar(text, target),
            (Self::Bytes(bytes), ValueType::String) => {
                String::from_utf8(bytes.clone()).ok().map(Self::String)
            }
            (_, ValueType::String) => self.scalar_text().map(Self::String),
            (Self::DateTime(dt), ValueType::Date) => Some(Self::Date(dt.date())),
            (Self::DateTime(dt), ValueType::Time) => Some(Self::Time(dt.time())),
            (Self::Date(date), ValueType::DateTime) => {
                Some(Self::DateTime(date.and_time(NaiveTime::MIN)))
            }
            (Self::Size(size), ValueType::SizeF) => Some(Self::SizeF(kurbo::Size::new(
                f64::from(size.width),
                f64::from(size.height),
            ))),
            (Self::SizeF(size), ValueType::Size) => Some(Self::Size(IntSize::new(
                integral_i32(size.width)?,
                integral_i32(size.height)?,
            ))),
            (Self::Rect(rect), ValueType::RectF) => Some(Self::RectF(FloatRect::from(*rect))),
            (Self::RectF(rect), ValueType::Rect) => Some(Self::Rect(IntRect::new(
                integral_i32(rect.x)?,
                integral_i32(rect.y)?,
                integral_i32(rect.width)?,
                integral_i32(rect.height)?,
            ))),
            (Self::Image(image), _) => {
                let kind = target.image_kind()?;
                let mut retagged = image.clone();
                retagged.set_kind(kind);
                Some(Self::Image(retagged))
            }
            _ => None,
        }
    }

    fn as_f64(&self) -> Option<f64> {
        let value = match *self {
            Self::Bool(b) => f64::from(u8::from(b)),
            Self::Int(v) => f64::from(v),
            Self::UInt(v) => f64::from(v),
            Self::Int64(v) => v as f64,
            Self::UInt64(v) => v as f64,
            Self::Double(v) => v,
            _ => return None,
        };
        Some(value)
    }

    fn as_i128(&self) -> Option<i128> {
        match *self {
            Self::Bool(b) => Some(i128::from(b)),
            Self::Int(v) => Some(i128::from(v)),
            Self::UInt(v) => Some(i128::from(v)),
            Self::Int64(v) => Some(i128::from(v)),
            Self::UInt64(v) => Some(i128::from(v)),
            Self::Double(v) => {
                if v.is_finite() && v.fract() == 0.0 && v.abs() < 1.0e38 {
                    #[expect(
                        clippy::cast_possible_truncation,
                        reason = "checked integral and in range"
                    )]
                    let whole = v as i128;
                    Some(whole)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    fn convert_numeric(&self, target: ValueType) -> Option<Self> {
        match target {
            ValueType::Bool => self.as_f64().map(|v| Self::Bool(v != 0.0)),
            ValueType::Double => self.as_f64().map(Self::Double),
            ValueType::Int => self.as_i128().and_then(|v| i32::try_from(v).ok()).map(Self::Int),
            ValueType::UInt => self.as_i128().and_then(|v| u32::try_from(v).ok()).map(Self::UInt),
            ValueType::Int64 => self
                .as_i128()
                .and_then(|v| i64::try_from(v).ok())
                .map(Self::Int64),
            ValueType::UInt64 => self
                .as_i128()
                .and_then(|v| u64::try_from(v).ok())
                .map(Self::UInt64),
            _ => None,
        }
    }

    fn scalar_text(&self) -> Option<String> {
        Some(match self {
            Self::Bool(v) => v.to_string(),
            Self::Int(v) => v.to_string(),
            Self::UInt(v) => v.to_string(),
            Self::Int64(v) => v.to_string(),
            Self::UInt64(v) => v.to_string(),
            Self::Double(v) => v.to_string(),
            Self::Char(c) => c.to_string(),
            Self::Url(url) => url.as_str().to_owned(),
            Self::Date(date) => date.format(DATE_FORMAT).to_string(),
            Self::Time(time) => time.format(TIME_FORMAT).to_string(),
            Self::DateTime(dt) => dt.format(DATE_TIME_FORMAT).to_string(),
            _ => return None,
        })
    }

    fn parse_scalar(text: &str, target: ValueType) -> Option<Self> {
        let trimmed = text.trim();
        Some(match target {
            ValueType::Bool => {
                if trimmed.eq_ignore_ascii_case("true") {
                    Self::Bool(true)
                } else if trimmed.eq_ignore_ascii_case("false") {
                    Self::Bool(false)
                } else {
                    return None;
                }
            }
            ValueType::Int => Self::Int(trimmed.parse().ok()?),
            ValueType::UInt => Self::UInt(trimmed.parse().ok()?),
            ValueType::Int64 => Self::Int64(trimmed.parse().ok()?),
            ValueType::UInt64 => Self::UInt64(trimmed.parse().ok()?),
            ValueType::Double => Self::Double(trimmed.parse().ok()?),
            ValueType::Char => {
                let mut chars = text.chars();
                let c = chars.next()?;
                if chars.next().is_some() {
                    return None;
                }
                Self::Char(c)
            }
            ValueType::Bytes => Self::Bytes(text.as_bytes().to_vec()),
            ValueType::StringList => Self::StringList(vec![text.to_owned()]),
            ValueType::Url => Self::Url(Url::parse(text)?),
            ValueType::Date => Self::Date(NaiveDate::parse_from_str(trimmed, DATE_FORMAT).ok()?),
            ValueType::Time => Self::Time(NaiveTime::parse_from_str(trimmed, TIME_FORMAT).ok()?),
            ValueType::DateTime => Self::DateTime(
                NaiveDateTime::parse_from_str(trimmed, DATE_TIME_FORMAT).ok()?,
            ),
            _ => return None,
        })
    }
}

fn integral_i32(v: f64) -> Option<i32> {
    if v.is_finite() && v.fract() == 0.0 && v >= f64::from(i32::MIN) && v <= f64::from(i32::MAX) {
        #[expect(clippy::cast_possible_truncation, reason = "checked integral and in range")]
        let whole = v as i32;
        Some(whole)
    } else {
        None
    }
}

impl fmt::Display for Value {
    /// Generic textual form, used when no type-specific editor applies.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(text) = self.scalar_text() {
            return f.write_str(&text);
        }
        match self {
            Self::Invalid => Ok(()),
            Self::String(text) => f.write_str(text),
            Self::StringList(list) => f.write_str(&list.join("\n")),
            Self::Bytes(bytes) => f.write_str(&String::from_utf8_lossy(bytes)),
            Self::BitArray(bits) => {
                for bit in bits.iter() {
                    f.write_str(if bit { "1" } else { "0" })?;
                }
                Ok(())
            }
            Self::Size(size) => write!(f, "{}, {}", size.width, size.height),
            Self::SizeF(size) => write!(f, "{}, {}", size.width, size.height),
            Self::Rect(r) => write!(f, "{}, {}, {}, {}", r.x, r.y, r.width, r.height),
            Self::RectF(r) => write!(f, "{}, {}, {}, {}", r.x, r.y, r.width, r.height),
            Self::Font(font) => f.write_str(&font.family),
            Self::Color(c) => write!(f, "{}, {}, {}, ({})", c.r, c.g, c.b, c.a),
            Self::Image(image) => {
                let size = image.size();
                write!(f, "{} {}x{}", self.value_type(), size.width, size.height)
            }
            Self::Cursor(shape) => f.write_str(shape.name()),
            _ => Ok(()),
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_from! {
    bool => Bool,
    i32 => Int,
    u32 => UInt,
    i64 => Int64,
    u64 => UInt64,
    f64 => Double,
    char => Char,
    String => String,
    Vec<String> => StringList,
    Vec<u8> => Bytes,
    NaiveDate => Date,
    NaiveTime => Time,
    NaiveDateTime => DateTime,
    Url => Url,
    BitArray => BitArray,
    IntSize => Size,
    kurbo::Size => SizeF,
    IntRect => Rect,
    FloatRect => RectF,
    Font => Font,
    Color => Color,
    Image => Image,
    CursorShape => Cursor,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}
