// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Built-in editors for the geometry, font, color, image, cursor and boolean
//! value types.

use std::str::FromStr;

use understory_property::{
    Color, CursorShape, FloatRect, Font, FontSize, FontStyle, IntRect, IntSize, Value, ValueType,
};

use crate::context::PropertyContext;
use crate::editor::{
    DropDown, EditStyle, ModalPicker, ParseError, PreviewGlyph, PropertyEditor, parse_bool,
};

/// Sample text drawn by the font preview glyph.
pub const FONT_SAMPLE: &str = "Ab";

/// Splits `text` on commas into exactly `N` trimmed, parsed components.
fn components<T: FromStr, const N: usize>(
    text: &str,
    value_type: ValueType,
) -> Result<[T; N], ParseError> {
    let invalid = || ParseError::invalid(text, value_type);
    let parts: Vec<T> = text
        .split(',')
        .map(|part| part.trim().parse::<T>().map_err(|_| invalid()))
        .collect::<Result<_, _>>()?;
    parts.try_into().map_err(|_| invalid())
}

fn declared(context: &PropertyContext) -> ValueType {
    context.property().value_type()
}

/// Edits `Size` and `SizeF` values as `"w, h"`.
#[derive(Copy, Clone, Debug, Default)]
pub struct SizeEditor;

impl PropertyEditor for SizeEditor {
    fn can_handle(&self, context: &PropertyContext) -> bool {
        matches!(declared(context), ValueType::Size | ValueType::SizeF)
    }

    fn to_text(&self, context: &PropertyContext) -> String {
        match context.value() {
            Value::Size(size) => format!("{}, {}", size.width, size.height),
            Value::SizeF(size) => format!("{}, {}", size.width, size.height),
            _ => String::from("0, 0"),
        }
    }

    fn from_text(&self, text: &str, context: &PropertyContext) -> Result<Value, ParseError> {
        match declared(context) {
            ValueType::Size => {
                let [w, h] = components::<i32, 2>(text, ValueType::Size)?;
                Ok(Value::Size(IntSize::new(w, h)))
            }
            ValueType::SizeF => {
                let [w, h] = components::<f64, 2>(text, ValueType::SizeF)?;
                Ok(Value::SizeF(kurbo::Size::new(w, h)))
            }
            other => Err(ParseError::invalid(text, other)),
        }
    }
}

/// Edits `Rect` and `RectF` values as `"x, y, w, h"`.
#[derive(Copy, Clone, Debug, Default)]
pub struct RectEditor;

impl PropertyEditor for RectEditor {
    fn can_handle(&self, context: &PropertyContext) -> bool {
        matches!(declared(context), ValueType::Rect | ValueType::RectF)
    }

    fn to_text(&self, context: &PropertyContext) -> String {
        match context.value() {
            Value::Rect(r) => format!("{}, {}, {}, {}", r.x, r.y, r.width, r.height),
            Value::RectF(r) => format!("{}, {}, {}, {}", r.x, r.y, r.width, r.height),
            _ => String::from("0, 0, 0, 0"),
        }
    }

    fn from_text(&self, text: &str, context: &PropertyContext) -> Result<Value, ParseError> {
        match declared(context) {
            ValueType::Rect => {
                let [x, y, w, h] = components::<i32, 4>(text, ValueType::Rect)?;
                Ok(Value::Rect(IntRect::new(x, y, w, h)))
            }
            ValueType::RectF => {
                let [x, y, w, h] = components::<f64, 4>(text, ValueType::RectF)?;
                Ok(Value::RectF(FloatRect::new(x, y, w, h)))
            }
            other => Err(ParseError::invalid(text, other)),
        }
    }
}

/// Edits fonts as `family, <N>pt|<N>px[, key=value...]`.
///
/// Only attributes that differ from [`Font::default`] are written. When
/// parsing, family and size are required; trailing tokens that are unknown or
/// malformed are ignored. Family names containing commas do not round-trip.
#[derive(Copy, Clone, Debug, Default)]
pub struct FontEditor;

impl FontEditor {
    const WEIGHT: &'static str = "weight=";
    const STYLE: &'static str = "style=";
    const UNDERLINE: &'static str = "underline=";
    const STRIKE_OUT: &'static str = "strikeOut=";
    const KERNING: &'static str = "kerning=";

    /// Renders `font` in the editor's text form.
    #[must_use]
    pub fn format(font: &Font) -> String {
        let default = Font::default();
        let mut parts = vec![font.family.clone()];
        parts.push(match font.size {
            FontSize::Points(n) => format!("{n}pt"),
            FontSize::Pixels(n) => format!("{n}px"),
        });
        if font.weight != default.weight {
            parts.push(format!("{}{}", Self::WEIGHT, font.weight));
        }
        if font.style != default.style {
            parts.push(format!("{}{}", Self::STYLE, font.style.name()));
        }
        if font.underline != default.underline {
            parts.push(format!("{}{}", Self::UNDERLINE, font.underline));
        }
        if font.strike_out != default.strike_out {
            parts.push(format!("{}{}", Self::STRIKE_OUT, font.strike_out));
        }
        if font.kerning != default.kerning {
            parts.push(format!("{}{}", Self::KERNING, font.kerning));
        }
        parts.join(", ")
    }

    /// Parses the editor's text form.
    pub fn parse(text: &str) -> Result<Font, ParseError> {
        let mut parts = text.split(',').map(str::trim);
        let (Some(family), Some(size)) = (parts.next(), parts.next()) else {
            return Err(ParseError::Message(String::from(
                "invalid font format: missing family or size",
            )));
        };
        let size = if let Some(px) = size.strip_suffix("px") {
            px.trim().parse().map(FontSize::Pixels)
        } else {
            let pt = size.strip_suffix("pt").unwrap_or(size);
            pt.trim().parse().map(FontSize::Points)
        }
        .map_err(|_| ParseError::invalid(text, ValueType::Font))?;

        let mut font = Font::new(family, size);
        for token in parts {
            if let Some(weight) = token.strip_prefix(Self::WEIGHT) {
                if let Ok(weight) = weight.parse() {
                    font.weight = weight;
                }
            } else if let Some(style) = token.strip_prefix(Self::STYLE) {
                if let Some(style) = FontStyle::from_name(style) {
                    font.style = style;
                }
            } else if let Some(flag) = token.strip_prefix(Self::UNDERLINE) {
                font.underline = parse_flag(flag).unwrap_or(font.underline);
            } else if let Some(flag) = token.strip_prefix(Self::STRIKE_OUT) {
                font.strike_out = parse_flag(flag).unwrap_or(font.strike_out);
            } else if let Some(flag) = token.strip_prefix(Self::KERNING) {
                font.kerning = parse_flag(flag).unwrap_or(font.kerning);
            }
        }
        Ok(font)
    }
}

fn parse_flag(text: &str) -> Option<bool> {
    match text {
        "1" => Some(true),
        "0" => Some(false),
        other => parse_bool(other),
    }
}

impl PropertyEditor for FontEditor {
    fn can_handle(&self, context: &PropertyContext) -> bool {
        declared(context) == ValueType::Font
    }

    fn to_text(&self, context: &PropertyContext) -> String {
        match context.value() {
            Value::Font(font) => Self::format(font),
            _ => Self::format(&Font::default()),
        }
    }

    fn from_text(&self, text: &str, _context: &PropertyContext) -> Result<Value, ParseError> {
        Self::parse(text).map(Value::Font)
    }

    fn edit_style(&self, _context: &PropertyContext) -> EditStyle {
        EditStyle::Modal
    }

    fn preview_glyph(&self, context: &PropertyContext) -> Option<PreviewGlyph> {
        match context.value() {
            Value::Font(font) => Some(PreviewGlyph::FontSample {
                font: font.clone(),
                sample: String::from(FONT_SAMPLE),
            }),
            _ => None,
        }
    }

    fn on_modal_requested(
        &self,
        context: &PropertyContext,
        picker: &mut dyn ModalPicker,
    ) -> Option<Value> {
        let current = match context.value() {
            Value::Font(font) => font.clone(),
            _ => Font::default(),
        };
        picker.pick_font(&current).map(Value::Font)
    }
}

/// Edits colors as `"r, g, b, (a)"`; the alpha component may be omitted.
#[derive(Copy, Clone, Debug, Default)]
pub struct ColorEditor;

impl PropertyEditor for ColorEditor {
    fn can_handle(&self, context: &PropertyContext) -> bool {
        declared(context) == ValueType::Color
    }

    fn to_text(&self, context: &PropertyContext) -> String {
        let c = match context.value() {
            Value::Color(c) => *c,
            _ => Color::default(),
        };
        format!("{}, {}, {}, ({})", c.r, c.g, c.b, c.a)
    }

    fn from_text(&self, text: &str, _context: &PropertyContext) -> Result<Value, ParseError> {
        let stripped: String = text.chars().filter(|c| !matches!(c, '(' | ')')).collect();
        if let Ok([r, g, b, a]) = components::<u8, 4>(&stripped, ValueType::Color) {
            return Ok(Value::Color(Color::rgba(r, g, b, a)));
        }
        components::<u8, 3>(&stripped, ValueType::Color)
            .map(|[r, g, b]| Value::Color(Color::rgb(r, g, b)))
            .map_err(|_| ParseError::invalid(text, ValueType::Color))
    }

    fn edit_style(&self, _context: &PropertyContext) -> EditStyle {
        EditStyle::Modal
    }

    fn preview_glyph(&self, context: &PropertyContext) -> Option<PreviewGlyph> {
        match context.value() {
            Value::Color(c) => Some(PreviewGlyph::Swatch(*c)),
            _ => None,
        }
    }

    fn on_modal_requested(
        &self,
        context: &PropertyContext,
        picker: &mut dyn ModalPicker,
    ) -> Option<Value> {
        let current = match context.value() {
            Value::Color(c) => *c,
            _ => Color::default(),
        };
        picker.pick_color(current).map(Value::Color)
    }
}

/// Shows image, pixmap, bitmap and icon values by type name plus a preview.
///
/// The text form carries no pixels, so parsing the type name yields the
/// context's current value unchanged.
#[derive(Copy, Clone, Debug, Default)]
pub struct ImagesEditor;

impl PropertyEditor for ImagesEditor {
    fn can_handle(&self, context: &PropertyContext) -> bool {
        declared(context).image_kind().is_some()
    }

    fn to_text(&self, context: &PropertyContext) -> String {
        declared(context).name().to_owned()
    }

    fn from_text(&self, text: &str, context: &PropertyContext) -> Result<Value, ParseError> {
        let ty = declared(context);
        if text.trim() == ty.name() {
            Ok(context.value().clone())
        } else {
            Err(ParseError::invalid(text, ty))
        }
    }

    fn preview_glyph(&self, context: &PropertyContext) -> Option<PreviewGlyph> {
        match context.value() {
            Value::Image(image) if !image.is_null() => Some(PreviewGlyph::Image(image.clone())),
            _ => None,
        }
    }
}

/// Edits cursor shapes by symbolic name, such as `ArrowCursor`.
#[derive(Copy, Clone, Debug, Default)]
pub struct CursorEditor;

impl PropertyEditor for CursorEditor {
    fn can_handle(&self, context: &PropertyContext) -> bool {
        declared(context) == ValueType::Cursor
    }

    fn to_text(&self, context: &PropertyContext) -> String {
        match context.value() {
            Value::Cursor(shape) => shape.name().to_owned(),
            _ => CursorShape::default().name().to_owned(),
        }
    }

    fn from_text(&self, text: &str, _context: &PropertyContext) -> Result<Value, ParseError> {
        CursorShape::from_name(text.trim())
            .map(Value::Cursor)
            .ok_or_else(|| ParseError::invalid(text, ValueType::Cursor))
    }
}

/// Edits booleans through a `true` / `false` drop-down.
#[derive(Copy, Clone, Debug, Default)]
pub struct BoolEditor;

impl PropertyEditor for BoolEditor {
    fn can_handle(&self, context: &PropertyContext) -> bool {
        declared(context) == ValueType::Bool
    }

    fn to_text(&self, context: &PropertyContext) -> String {
        let on = matches!(context.value(), Value::Bool(true));
        String::from(if on { "true" } else { "false" })
    }

    fn from_text(&self, text: &str, _context: &PropertyContext) -> Result<Value, ParseError> {
        parse_bool(text.trim())
            .map(Value::Bool)
            .ok_or_else(|| ParseError::invalid(text, ValueType::Bool))
    }

    fn edit_style(&self, _context: &PropertyContext) -> EditStyle {
        EditStyle::DropDown
    }

    fn drop_down(&self, _context: &PropertyContext) -> Option<DropDown> {
        Some(DropDown::Values(vec![Value::Bool(true), Value::Bool(false)]))
    }
}
