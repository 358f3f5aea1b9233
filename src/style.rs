//! Cell styling shared by the spreadsheet and print preview backends

use crate::constants::{DEFAULT_MARGIN, DEFAULT_PADDING};
use crate::sheet::FormatTag;

/// RGB color representation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Create a new RGB color (values should be 0.0-1.0)
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
        }
    }

    /// Create a color from `0xRRGGBB`
    pub fn hex(value: u32) -> Self {
        let channel = |shift: u32| ((value >> shift) & 0xff) as f32 / 255.0;
        Self::rgb(channel(16), channel(8), channel(0))
    }

    /// The color as `0xRRGGBB`
    pub fn to_hex(&self) -> u32 {
        let channel = |c: f32| (c * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    /// Black color
    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    /// White color
    pub fn white() -> Self {
        Self::rgb(1.0, 1.0, 1.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

/// Background of odd banded rows
pub const BG_COLOR_ODD: u32 = 0xf4f4f4;
/// Background of the actions sheet header row and the title
pub const BG_COLOR_HEADER: u32 = 0x0a5e43;
/// Background of action summary labels
pub const COLOR_LIGHT_HEADER: u32 = 0xf0f0f0;
/// Background of action summary page headers
pub const COLOR_PAGE_HEADER: u32 = 0x3c504a;

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    General,
    Left,
    Right,
}

/// Vertical text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAlignment {
    #[default]
    Bottom,
    Top,
    /// Justified, lines spread over the cell height
    Justify,
}

/// Padding for cells
#[derive(Debug, Clone, Copy)]
pub struct Padding {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Padding {
    /// Create uniform padding
    pub fn uniform(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

impl Default for Padding {
    fn default() -> Self {
        Self::uniform(DEFAULT_PADDING)
    }
}

/// Which cell edges get a thin border
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Borders {
    pub left: bool,
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
}

/// Visual properties of one format tag
#[derive(Debug, Clone, PartialEq)]
pub struct FormatSpec {
    pub font_size: Option<f64>,
    pub bold: bool,
    pub font_color: Option<Color>,
    pub background_color: Option<Color>,
    pub alignment: Alignment,
    pub vertical_alignment: VerticalAlignment,
    pub text_wrap: bool,
    pub borders: Borders,
    /// Excel number format, for dates
    pub num_format: Option<&'static str>,
}

impl Default for FormatSpec {
    fn default() -> Self {
        Self {
            font_size: None,
            bold: false,
            font_color: None,
            background_color: None,
            alignment: Alignment::General,
            vertical_alignment: VerticalAlignment::Bottom,
            text_wrap: false,
            borders: Borders::default(),
            num_format: None,
        }
    }
}

impl FormatSpec {
    /// Formatting registered for a tag
    pub fn for_tag(tag: FormatTag) -> Self {
        let white = Some(Color::white());
        match tag {
            FormatTag::HeaderRow => Self::header_row(),
            FormatTag::Title => Self {
                font_size: Some(24.0),
                ..Self::header_row()
            },
            FormatTag::SubTitle => Self {
                bold: true,
                font_size: Some(18.0),
                background_color: white,
                ..Default::default()
            },
            FormatTag::SubSubTitle => Self {
                font_size: Some(16.0),
                background_color: white,
                ..Default::default()
            },
            FormatTag::MetadataLabel => Self {
                bold: true,
                alignment: Alignment::Right,
                background_color: white,
                ..Default::default()
            },
            FormatTag::MetadataValue => Self {
                alignment: Alignment::Left,
                background_color: white,
                ..Default::default()
            },
            FormatTag::Date => Self {
                num_format: Some("d mmmm yyyy"),
                alignment: Alignment::Left,
                background_color: white,
                ..Default::default()
            },
            FormatTag::OddRow => Self {
                background_color: Some(Color::hex(BG_COLOR_ODD)),
                ..Default::default()
            },
            FormatTag::EvenRow => Self {
                background_color: white,
                ..Default::default()
            },
            FormatTag::AllRows => Self {
                vertical_alignment: VerticalAlignment::Top,
                text_wrap: true,
                ..Default::default()
            },
            FormatTag::ActionDigestValue | FormatTag::ActionDigestValueLong => Self {
                font_size: Some(8.0),
                vertical_alignment: VerticalAlignment::Justify,
                text_wrap: true,
                borders: Borders {
                    left: true,
                    top: false,
                    right: true,
                    bottom: true,
                },
                ..Default::default()
            },
            FormatTag::ActionDigestLabel => Self {
                font_size: Some(8.0),
                background_color: Some(Color::hex(COLOR_LIGHT_HEADER)),
                vertical_alignment: VerticalAlignment::Justify,
                text_wrap: true,
                borders: Borders {
                    left: true,
                    top: true,
                    right: true,
                    bottom: false,
                },
                ..Default::default()
            },
            FormatTag::ActionDigestPageHeader => Self {
                font_size: Some(10.0),
                bold: true,
                font_color: white,
                background_color: Some(Color::hex(COLOR_PAGE_HEADER)),
                vertical_alignment: VerticalAlignment::Justify,
                text_wrap: true,
                ..Default::default()
            },
        }
    }

    fn header_row() -> Self {
        Self {
            bold: true,
            font_color: Some(Color::white()),
            background_color: Some(Color::hex(BG_COLOR_HEADER)),
            ..Default::default()
        }
    }
}

/// Page geometry of the print preview
#[derive(Debug, Clone)]
pub struct PreviewStyle {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub padding: Padding,
    pub border_width: f32,
    pub border_color: Color,
    /// Font size for cells whose format has none
    pub default_font_size: f32,
}

impl Default for PreviewStyle {
    fn default() -> Self {
        Self {
            page_width: crate::constants::A4_WIDTH,
            page_height: crate::constants::A4_HEIGHT,
            margin: DEFAULT_MARGIN,
            padding: Padding::default(),
            border_width: 0.5,
            border_color: Color::black(),
            default_font_size: 10.0,
        }
    }
}
