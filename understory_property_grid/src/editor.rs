// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Editor protocol and type-driven editor dispatch.
//!
//! A [`PropertyEditor`] renders a value to text, parses text back, and advises
//! how the value should be edited (inline, through a modal picker, or from a
//! drop-down). The [`EditorRegistry`] is an ordered list of editors; resolution
//! returns the first one whose [`PropertyEditor::can_handle`] accepts the
//! context, falling back to [`DefaultEditor`]. Resolution never fails.

use std::any::{Any, TypeId};
use std::fmt;

use kurbo::Size;
use thiserror::Error;
use understory_property::{
    BitArray, Color, DATE_FORMAT, DATE_TIME_FORMAT, Font, Image, NaiveDate, NaiveDateTime,
    NaiveTime, TIME_FORMAT, Url, Value, ValueType,
};

use crate::context::PropertyContext;
use crate::editors::{
    BoolEditor, ColorEditor, CursorEditor, FontEditor, ImagesEditor, RectEditor, SizeEditor,
};

/// How a value should be edited.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum EditStyle {
    /// Inline text editing only.
    #[default]
    None,
    /// Inline text plus a button that opens a modal picker.
    Modal,
    /// A drop-down of choices.
    DropDown,
}

/// Content of a drop-down editor.
pub enum DropDown {
    /// A fixed list of values, rendered through the editor's `to_text`.
    Values(Vec<Value>),
    /// A host-specific popup payload, opaque to the grid.
    Custom(Box<dyn Any>),
}

impl fmt::Debug for DropDown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Values(values) => f.debug_tuple("Values").field(values).finish(),
            Self::Custom(_) => f.debug_tuple("Custom").finish_non_exhaustive(),
        }
    }
}

/// A small decoration shown next to a value.
///
/// Glyphs are descriptions, not pixels; the host paints them into the
/// decoration box configured on the grid.
#[derive(Clone, Debug, PartialEq)]
pub enum PreviewGlyph {
    /// A solid fill.
    Swatch(Color),
    /// A sample string rendered with a font.
    FontSample {
        /// The font to render with.
        font: Font,
        /// The text to render.
        sample: String,
    },
    /// An image scaled into the box.
    Image(Image),
}

impl PreviewGlyph {
    /// Returns the size this glyph occupies when drawn into `bounds`.
    ///
    /// Swatches and font samples fill the box. Images are scaled to fit,
    /// keeping their aspect ratio; an empty image occupies nothing.
    #[must_use]
    pub fn fitted_size(&self, bounds: Size) -> Size {
        match self {
            Self::Swatch(_) | Self::FontSample { .. } => bounds,
            Self::Image(image) => {
                let size = image.size();
                if size.is_empty() {
                    return Size::ZERO;
                }
                let (w, h) = (f64::from(size.width), f64::from(size.height));
                let scale = (bounds.width / w).min(bounds.height / h);
                Size::new(w * scale, h * scale)
            }
        }
    }
}

/// Text could not be turned into a value.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The text is not a valid rendering of the declared type.
    #[error("`{text}` is not a valid value for {value_type}")]
    InvalidText {
        /// The rejected input.
        text: String,
        /// The declared type it was parsed against.
        value_type: ValueType,
    },
    /// An editor-specific reason.
    #[error("{0}")]
    Message(String),
}

impl ParseError {
    pub(crate) fn invalid(text: &str, value_type: ValueType) -> Self {
        Self::InvalidText {
            text: text.to_owned(),
            value_type,
        }
    }
}

/// Host-supplied modal pickers.
///
/// Each method returns `None` when the user cancels; the default
/// implementations cancel immediately.
pub trait ModalPicker {
    /// Asks the user for a font, starting from `current`.
    fn pick_font(&mut self, current: &Font) -> Option<Font> {
        let _ = current;
        None
    }

    /// Asks the user for a color, starting from `current`.
    fn pick_color(&mut self, current: Color) -> Option<Color> {
        let _ = current;
        None
    }
}

/// A strategy that renders, parses and advises on editing a property value.
///
/// Only [`PropertyEditor::can_handle`] is required; the remaining methods
/// default to the generic behavior of [`DefaultEditor`].
pub trait PropertyEditor: Any {
    /// Returns `true` if this editor handles the context's property.
    fn can_handle(&self, context: &PropertyContext) -> bool;

    /// Renders the context's value as text.
    fn to_text(&self, context: &PropertyContext) -> String {
        format_value(context.value())
    }

    /// Parses `text` into a value of the context's declared type.
    ///
    /// The context is not modified; on error the caller keeps the old value.
    fn from_text(&self, text: &str, context: &PropertyContext) -> Result<Value, ParseError> {
        parse_value(text, context.property().value_type())
    }

    /// Advises how the value should be edited.
    fn edit_style(&self, context: &PropertyContext) -> EditStyle {
        let _ = context;
        EditStyle::None
    }

    /// Returns the drop-down content for [`EditStyle::DropDown`] editors.
    fn drop_down(&self, context: &PropertyContext) -> Option<DropDown> {
        let _ = context;
        None
    }

    /// Returns the decoration shown next to the value, if any.
    fn preview_glyph(&self, context: &PropertyContext) -> Option<PreviewGlyph> {
        let _ = context;
        None
    }

    /// Runs the modal picker for [`EditStyle::Modal`] editors.
    ///
    /// Returns the picked value, or `None` to keep the current one.
    fn on_modal_requested(
        &self,
        context: &PropertyContext,
        picker: &mut dyn ModalPicker,
    ) -> Option<Value> {
        let _ = (context, picker);
        None
    }
}

/// Generic editor used when no registered editor claims a property.
///
/// Text forms per declared type:
///
/// | Type | Text |
/// |---|---|
/// | numbers | decimal |
/// | `Bool` | `true` / `false`, parsed case-insensitively |
/// | `Char` | exactly one character |
/// | `Date`, `Time`, `DateTime` | ISO-8601, e.g. `2025-01-31T13:45:00.250`; no fraction when zero |
/// | `Bytes` | UTF-8 text |
/// | `StringList` | elements joined with `\n` |
/// | `Url` | the URL text |
/// | `BitArray` | hex of the bits packed 8 per byte, least significant bit first |
///
/// Any other type renders through [`Value`]'s `Display` and cannot be parsed.
///
/// Two forms do not survive a round trip unchanged:
///
/// - An empty `StringList` renders as `""`, which parses back as a list holding
///   one empty string.
/// - A `BitArray` whose length is not a multiple of 8 parses back padded with
///   clear bits to whole bytes.
#[derive(Copy, Clone, Debug, Default)]
pub struct DefaultEditor;

impl PropertyEditor for DefaultEditor {
    fn can_handle(&self, _context: &PropertyContext) -> bool {
        true
    }
}

pub(crate) fn format_value(value: &Value) -> String {
    match value {
        Value::Bytes(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        Value::BitArray(bits) => encode_hex(&bits.to_bytes()),
        other => other.to_string(),
    }
}

pub(crate) fn parse_value(text: &str, value_type: ValueType) -> Result<Value, ParseError> {
    let invalid = || ParseError::invalid(text, value_type);
    let trimmed = text.trim();
    let value = match value_type {
        ValueType::String => Value::String(text.to_owned()),
        ValueType::Int => Value::Int(trimmed.parse().map_err(|_| invalid())?),
        ValueType::UInt => Value::UInt(trimmed.parse().map_err(|_| invalid())?),
        ValueType::Int64 => Value::Int64(trimmed.parse().map_err(|_| invalid())?),
        ValueType::UInt64 => Value::UInt64(trimmed.parse().map_err(|_| invalid())?),
        ValueType::Double => Value::Double(trimmed.parse().map_err(|_| invalid())?),
        ValueType::Bool => Value::Bool(parse_bool(trimmed).ok_or_else(invalid)?),
        ValueType::Char => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Value::Char(c),
                _ => return Err(invalid()),
            }
        }
        ValueType::Date => Value::Date(
            NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| invalid())?,
        ),
        ValueType::Time => Value::Time(
            NaiveTime::parse_from_str(trimmed, TIME_FORMAT).map_err(|_| invalid())?,
        ),
        ValueType::DateTime => Value::DateTime(
            NaiveDateTime::parse_from_str(trimmed, DATE_TIME_FORMAT).map_err(|_| invalid())?,
        ),
        ValueType::Bytes => Value::Bytes(text.as_bytes().to_vec()),
        ValueType::StringList => Value::StringList(text.split('\n').map(str::to_owned).collect()),
        ValueType::Url => Value::Url(Url::parse(trimmed).ok_or_else(invalid)?),
        ValueType::BitArray => {
            let bytes = decode_hex(trimmed).ok_or_else(invalid)?;
            Value::BitArray(BitArray::from_bytes(&bytes))
        }
        _ => return Err(invalid()),
    };
    Ok(value)
}

pub(crate) fn parse_bool(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn encode_hex(bytes: &[u8]) -> String {
    const DIGITS: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(char::from(DIGITS[usize::from(byte >> 4)]));
        out.push(char::from(DIGITS[usize::from(byte & 0x0f)]));
    }
    out
}

/// Decodes an even-length, non-empty hex string.
fn decode_hex(text: &str) -> Option<Vec<u8>> {
    if text.is_empty() || !text.len().is_multiple_of(2) || !text.is_ascii() {
        return None;
    }
    text.as_bytes()
        .chunks(2)
        .map(|pair| {
            let hi = char::from(pair[0]).to_digit(16)?;
            let lo = char::from(pair[1]).to_digit(16)?;
            u8::try_from((hi << 4) | lo).ok()
        })
        .collect()
}

/// Ordered editor list with first-match resolution.
///
/// Editors are keyed by their Rust type; registering a second editor of a
/// type that is already present is ignored.
///
/// # Example
///
/// ```rust
/// use understory_property::{Property, Value, ValueType};
/// use understory_property_grid::{EditorRegistry, PropertyContext, PropertyEditor};
///
/// let registry = EditorRegistry::with_builtin_editors();
/// let ctx = PropertyContext::new(Property::new("on", ValueType::Bool), Value::Bool(true));
/// assert_eq!(registry.resolve(&ctx).to_text(&ctx), "true");
/// ```
pub struct EditorRegistry {
    editors: Vec<(TypeId, Box<dyn PropertyEditor>)>,
    fallback: DefaultEditor,
}

impl EditorRegistry {
    /// Creates an empty registry; every property resolves to [`DefaultEditor`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            editors: Vec::new(),
            fallback: DefaultEditor,
        }
    }

    /// Creates a registry holding the built-in editors, in this order:
    /// size, rect, font, color, images, cursor, bool.
    #[must_use]
    pub fn with_builtin_editors() -> Self {
        let mut registry = Self::new();
        registry.add::<SizeEditor>();
        registry.add::<RectEditor>();
        registry.add::<FontEditor>();
        registry.add::<ColorEditor>();
        registry.add::<ImagesEditor>();
        registry.add::<CursorEditor>();
        registry.add::<BoolEditor>();
        registry
    }

    /// Appends a default-constructed `E`. Returns `false` if `E` is already present.
    pub fn add<E: PropertyEditor + Default>(&mut self) -> bool {
        self.insert(E::default())
    }

    /// Appends `editor`. Returns `false` if an editor of the same type is already present.
    pub fn insert<E: PropertyEditor>(&mut self, editor: E) -> bool {
        let id = TypeId::of::<E>();
        if self.position(id).is_some() {
            return false;
        }
        tracing::debug!(editor = std::any::type_name::<E>(), "registered property editor");
        self.editors.push((id, Box::new(editor)));
        true
    }

    /// Replaces the `Old` editor with `editor`, keeping its position.
    ///
    /// Any other instance of `New` is removed first. Returns `false`, leaving
    /// the registry unchanged, if `Old` is not present.
    pub fn replace<Old: PropertyEditor, New: PropertyEditor>(&mut self, editor: New) -> bool {
        let old = TypeId::of::<Old>();
        let new = TypeId::of::<New>();
        if self.position(old).is_none() {
            return false;
        }
        if old != new {
            self.editors.retain(|(id, _)| *id != new);
        }
        let Some(index) = self.position(old) else {
            return false;
        };
        self.editors[index] = (new, Box::new(editor));
        tracing::debug!(
            old = std::any::type_name::<Old>(),
            new = std::any::type_name::<New>(),
            "replaced property editor"
        );
        true
    }

    /// Removes the `E` editor. Returns `false` if it was not present.
    pub fn remove<E: PropertyEditor>(&mut self) -> bool {
        match self.position(TypeId::of::<E>()) {
            Some(index) => {
                self.editors.remove(index);
                true
            }
            None => false,
        }
    }

    /// Returns `true` if an `E` editor is registered.
    #[must_use]
    pub fn contains<E: PropertyEditor>(&self) -> bool {
        self.position(TypeId::of::<E>()).is_some()
    }

    /// Returns the registration index of `E`.
    #[must_use]
    pub fn index_of<E: PropertyEditor>(&self) -> Option<usize> {
        self.position(TypeId::of::<E>())
    }

    /// Returns the number of registered editors (the fallback is not counted).
    #[must_use]
    pub fn len(&self) -> usize {
        self.editors.len()
    }

    /// Returns `true` if no editors are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.editors.is_empty()
    }

    /// Returns the first editor that handles `context`, or the default editor.
    #[must_use]
    pub fn resolve(&self, context: &PropertyContext) -> &dyn PropertyEditor {
        self.editors
            .iter()
            .map(|(_, editor)| editor.as_ref())
            .find(|editor| editor.can_handle(context))
            .unwrap_or(&self.fallback)
    }

    fn position(&self, id: TypeId) -> Option<usize> {
        self.editors.iter().position(|(existing, _)| *existing == id)
    }
}

impl Default for EditorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EditorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorRegistry")
            .field("editors", &self.editors.len())
            .field("fallback", &self.fallback)
            .finish()
    }
}
