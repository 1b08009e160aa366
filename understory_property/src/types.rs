// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Payload types carried by [`Value`](crate::Value).
//!
//! Floating-point sizes use [`kurbo::Size`] directly. Rectangles keep their
//! origin and extent as given, so [`FloatRect`] stands in for [`kurbo::Rect`],
//! whose corner form cannot hold an arbitrary `f64` width exactly.

use std::fmt;
use std::sync::Arc;

/// An integer width/height pair.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct IntSize {
    /// Horizontal extent.
    pub width: i32,
    /// Vertical extent.
    pub height: i32,
}

impl IntSize {
    /// Creates a new size.
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Returns `true` if either extent is zero or negative.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// An integer rectangle described by its origin and extent.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct IntRect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Horizontal extent.
    pub width: i32,
    /// Vertical extent.
    pub height: i32,
}

impl IntRect {
    /// Creates a new rectangle from origin and extent.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns the extent of the rectangle.
    #[must_use]
    pub const fn size(self) -> IntSize {
        IntSize::new(self.width, self.height)
    }
}

/// A floating-point rectangle described by its origin and extent.
///
/// Negative extents are kept as given rather than normalized.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FloatRect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl FloatRect {
    /// The empty rectangle at the origin.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Creates a new rectangle from origin and extent.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns the origin of the rectangle.
    #[must_use]
    pub const fn origin(self) -> kurbo::Point {
        kurbo::Point::new(self.x, self.y)
    }

    /// Returns the extent of the rectangle.
    #[must_use]
    pub const fn size(self) -> kurbo::Size {
        kurbo::Size::new(self.width, self.height)
    }

    /// Returns the rectangle in corner form, for drawing.
    #[must_use]
    pub fn to_kurbo(self) -> kurbo::Rect {
        kurbo::Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }
}

impl From<kurbo::Rect> for FloatRect {
    fn from(rect: kurbo::Rect) -> Self {
        Self::new(rect.x0, rect.y0, rect.x1 - rect.x0, rect.y1 - rect.y0)
    }
}

impl From<IntRect> for FloatRect {
    fn from(rect: IntRect) -> Self {
        Self::new(
            f64::from(rect.x),
            f64::from(rect.y),
            f64::from(rect.width),
            f64::from(rect.height),
        )
    }
}

/// An 8-bit-per-channel RGBA color.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel, `255` is opaque.
    pub a: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque red.
    pub const RED: Self = Self::rgb(255, 0, 0);
    /// Opaque green.
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    /// Opaque blue.
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    /// Creates an opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Creates a color with an explicit alpha channel.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Font size, either in points or in device pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FontSize {
    /// Size in typographic points.
    Points(i32),
    /// Size in device pixels.
    Pixels(i32),
}

impl Default for FontSize {
    fn default() -> Self {
        Self::Points(9)
    }
}

/// Slant of a font.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontStyle {
    /// Upright glyphs.
    #[default]
    Normal,
    /// Italic glyphs.
    Italic,
    /// Mechanically slanted glyphs.
    Oblique,
}

impl FontStyle {
    /// Returns the lowercase name used in text forms.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Italic => "italic",
            Self::Oblique => "oblique",
        }
    }

    /// Parses a style from its name (case-insensitive) or its ordinal (`0`, `1`, `2`).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        [Self::Normal, Self::Italic, Self::Oblique]
            .into_iter()
            .enumerate()
            .find(|(ordinal, style)| {
                style.name().eq_ignore_ascii_case(name) || ordinal.to_string() == name
            })
            .map(|(_, style)| style)
    }
}

/// A font request: family plus the attributes a property editor can round-trip.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Font {
    /// Family name.
    pub family: String,
    /// Point or pixel size.
    pub size: FontSize,
    /// CSS-style weight, `400` is regular and `700` is bold.
    pub weight: u16,
    /// Slant.
    pub style: FontStyle,
    /// Underline decoration.
    pub underline: bool,
    /// Strike-out decoration.
    pub strike_out: bool,
    /// Pair kerning.
    pub kerning: bool,
}

impl Font {
    /// Regular weight.
    pub const NORMAL_WEIGHT: u16 = 400;
    /// Bold weight.
    pub const BOLD_WEIGHT: u16 = 700;

    /// Creates a font with the given family and size and default attributes.
    #[must_use]
    pub fn new(family: impl Into<String>, size: FontSize) -> Self {
        Self {
            family: family.into(),
            size,
            ..Self::default()
        }
    }

    /// Returns a copy with the bold weight applied.
    #[must_use]
    pub fn bold(mut self) -> Self {
        self.weight = Self::BOLD_WEIGHT;
        self
    }
}

impl Default for Font {
    fn default() -> Self {
        Self {
            family: String::from("Sans Serif"),
            size: FontSize::default(),
            weight: Self::NORMAL_WEIGHT,
            style: FontStyle::Normal,
            underline: false,
            strike_out: false,
            kerning: true,
        }
    }
}

/// Which image flavor a value carries.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ImageKind {
    /// A CPU-side image.
    #[default]
    Image,
    /// A display-optimized image.
    Pixmap,
    /// A 1-bit image.
    Bitmap,
    /// A multi-resolution icon.
    Icon,
}

/// Decoded RGBA8 pixel data tagged with its [`ImageKind`].
///
/// Pixels are shared, so cloning an image is cheap.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Image {
    kind: ImageKind,
    size: IntSize,
    pixels: Arc<[u8]>,
}

impl Image {
    /// Creates an image from tightly packed RGBA8 rows.
    ///
    /// Returns `None` if `pixels` does not hold exactly `width * height * 4` bytes.
    #[must_use]
    pub fn from_rgba8(kind: ImageKind, width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        if pixels.len() != expected {
            return None;
        }
        Some(Self {
            kind,
            size: IntSize::new(i32::try_from(width).ok()?, i32::try_from(height).ok()?),
            pixels: pixels.into(),
        })
    }

    /// Creates an empty (zero-sized) image of the given kind.
    #[must_use]
    pub fn empty(kind: ImageKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Returns the image flavor.
    #[must_use]
    pub fn kind(&self) -> ImageKind {
        self.kind
    }

    /// Retags the image without touching its pixels.
    pub fn set_kind(&mut self, kind: ImageKind) {
        self.kind = kind;
    }

    /// Returns the pixel extent.
    #[must_use]
    pub fn size(&self) -> IntSize {
        self.size
    }

    /// Returns `true` if the image holds no pixels.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Returns the raw RGBA8 bytes.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

/// Standard mouse-cursor shapes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[allow(missing_docs, reason = "variant names are the documentation")]
pub enum CursorShape {
    #[default]
    Arrow,
    UpArrow,
    Cross,
    Wait,
    IBeam,
    SizeVertical,
    SizeHorizontal,
    SizeBackwardDiagonal,
    SizeForwardDiagonal,
    SizeAll,
    Blank,
    SplitVertical,
    SplitHorizontal,
    PointingHand,
    Forbidden,
    WhatsThis,
    Busy,
    OpenHand,
    ClosedHand,
    DragCopy,
    DragMove,
    DragLink,
}

impl CursorShape {
    /// Every shape, in declaration order.
    pub const ALL: [Self; 22] = [
        Self::Arrow,
        Self::UpArrow,
        Self::Cross,
        Self::Wait,
        Self::IBeam,
        Self::SizeVertical,
        Self::SizeHorizontal,
        Self::SizeBackwardDiagonal,
        Self::SizeForwardDiagonal,
        Self::SizeAll,
        Self::Blank,
        Self::SplitVertical,
        Self::SplitHorizontal,
        Self::PointingHand,
        Self::Forbidden,
        Self::WhatsThis,
        Self::Busy,
        Self::OpenHand,
        Self::ClosedHand,
        Self::DragCopy,
        Self::DragMove,
        Self::DragLink,
    ];

    /// Returns the symbolic name of the shape.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Arrow => "ArrowCursor",
            Self::UpArrow => "UpArrowCursor",
            Self::Cross => "CrossCursor",
            Self::Wait => "WaitCursor",
            Self::IBeam => "IBeamCursor",
            Self::SizeVertical => "SizeVerCursor",
            Self::SizeHorizontal => "SizeHorCursor",
            Self::SizeBackwardDiagonal => "SizeBDiagCursor",
            Self::SizeForwardDiagonal => "SizeFDiagCursor",
            Self::SizeAll => "SizeAllCursor",
            Self::Blank => "BlankCursor",
            Self::SplitVertical => "SplitVCursor",
            Self::SplitHorizontal => "SplitHCursor",
            Self::PointingHand => "PointingHandCursor",
            Self::Forbidden => "ForbiddenCursor",
            Self::WhatsThis => "WhatsThisCursor",
            Self::Busy => "BusyCursor",
            Self::OpenHand => "OpenHandCursor",
            Self::ClosedHand => "ClosedHandCursor",
            Self::DragCopy => "DragCopyCursor",
            Self::DragMove => "DragMoveCursor",
            Self::DragLink => "DragLinkCursor",
        }
    }

    /// Looks a shape up by its symbolic name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|shape| shape.name() == name)
    }
}

/// A packed sequence of bits.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct BitArray {
    bits: Vec<bool>,
}

impl BitArray {
    /// Creates a bit array of `len` cleared bits.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            bits: vec![false; len],
        }
    }

    /// Number of bits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Returns `true` if there are no bits.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Returns the bit at `index`, or `false` when out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> bool {
        self.bits.get(index).copied().unwrap_or(false)
    }

    /// Sets the bit at `index`; out-of-range indices are ignored.
    pub fn set(&mut self, index: usize, value: bool) {
        if let Some(bit) = self.bits.get_mut(index) {
            *bit = value;
        }
    }

    /// Iterates the bits in order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }

    /// Packs the bits 8 per byte, least significant bit first.
    ///
    /// A trailing partial byte is zero-padded.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bits
            .chunks(8)
            .map(|chunk| {
                chunk
                    .iter()
                    .enumerate()
                    .fold(0_u8, |byte, (i, &bit)| byte | (u8::from(bit) << i))
            })
            .collect()
    }

    /// Unpacks bytes produced by [`BitArray::to_bytes`]; the result is always a
    /// multiple of 8 bits long.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            bits: bytes
                .iter()
                .flat_map(|byte| (0..8).map(move |i| byte & (1 << i) != 0))
                .collect(),
        }
    }
}

impl FromIterator<bool> for BitArray {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self {
            bits: iter.into_iter().collect(),
        }
    }
}

/// A URL or URL reference, validated only lexically.
///
/// Relative references are accepted. When a scheme is present it must start
/// with an ASCII letter and contain only letters, digits, `+`, `-` and `.`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Url(String);

impl Url {
    /// Parses `text` as a URL.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        if text.is_empty() || text.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return None;
        }
        let scheme_end = text.find(':');
        let path_start = text.find(['/', '?', '#']);
        if let Some(end) = scheme_end {
            let is_scheme = path_start.is_none_or(|start| end < start);
            if is_scheme {
                let scheme = &text[..end];
                let mut chars = scheme.chars();
                let starts_alpha = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
                let rest_ok =
                    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
                if !starts_alpha || !rest_ok {
                    return None;
                }
            }
        }
        Some(Self(text.to_owned()))
    }

    /// Returns the URL text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the scheme, if the URL is absolute.
    #[must_use]
    pub fn scheme(&self) -> Option<&str> {
        let end = self.0.find(':')?;
        match self.0.find(['/', '?', '#']) {
            Some(start) if start < end => None,
            _ => Some(&self.0[..end]),
        }
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_rect_keeps_negative_extent() {
        let rect = FloatRect::new(10.0, 0.0, -4.0, 2.0);
        assert_eq!(rect.size(), kurbo::Size::new(-4.0, 2.0));
        assert_eq!(rect.to_kurbo(), kurbo::Rect::new(10.0, 0.0, 6.0, 2.0));
        assert_eq!(FloatRect::from(IntRect::new(10, 0, -4, 2)), rect);
        assert_eq!(FloatRect::from(rect.to_kurbo()), rect);
    }

    #[test]
    fn bit_array_packs_lsb_first() {
        let bits: BitArray = [true, false, false, false, false, false, false, true, true]
            .into_iter()
            .collect();
        assert_eq!(bits.to_bytes(), vec![0b1000_0001, 0b0000_0001]);

        let unpacked = BitArray::from_bytes(&[0b1000_0001]);
        assert_eq!(unpacked.len(), 8);
        assert!(unpacked.get(0));
        assert!(unpacked.get(7));
        assert!(!unpacked.get(3));
    }

    #[test]
    fn bit_array_set_ignores_out_of_range() {
        let mut bits = BitArray::new(4);
        bits.set(2, true);
        bits.set(10, true);
        assert_eq!(bits.iter().collect::<Vec<_>>(), vec![false, false, true, false]);
    }

    #[test]
    fn url_validation() {
        assert!(Url::parse("https://example.com/a?b#c").is_some());
        assert!(Url::parse("relative/path").is_some());
        assert!(Url::parse("").is_none());
        assert!(Url::parse("has space").is_none());
        assert!(Url::parse("1http://x").is_none());
        assert_eq!(
            Url::parse("mailto:someone@example.com").unwrap().scheme(),
            Some("mailto")
        );
        assert_eq!(Url::parse("a/b:c").unwrap().scheme(), None);
    }

    #[test]
    fn cursor_names_round_trip() {
        for shape in CursorShape::ALL {
            assert_eq!(CursorShape::from_name(shape.name()), Some(shape));
        }
        assert_eq!(CursorShape::from_name("NoSuchCursor"), None);
    }

    #[test]
    fn font_style_accepts_names_and_ordinals() {
        assert_eq!(FontStyle::from_name("Italic"), Some(FontStyle::Italic));
        assert_eq!(FontStyle::from_name("2"), Some(FontStyle::Oblique));
        assert_eq!(FontStyle::from_name("slanted"), None);
    }

    #[test]
    fn image_requires_matching_pixel_count() {
        assert!(Image::from_rgba8(ImageKind::Icon, 2, 2, vec![0; 16]).is_some());
        assert!(Image::from_rgba8(ImageKind::Icon, 2, 2, vec![0; 15]).is_none());
        assert!(Image::empty(ImageKind::Pixmap).is_null());
    }
}
