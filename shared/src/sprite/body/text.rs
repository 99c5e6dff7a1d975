use tableau_serde::{DataBuffer, Serde, SerdeErr};

use crate::{
    math::Color,
    sprite::{dirty::DirtyState, writer::AttributeWriter},
    types::AttributeId,
};

pub(crate) const FONT_DIRTY: DirtyState = DirtyState::INTERNAL_A;
pub(crate) const TEXT_DIRTY: DirtyState = DirtyState::INTERNAL_B;
pub(crate) const LAYOUT_DIRTY: DirtyState = DirtyState::INTERNAL_C;

pub const FONTNAME_ATT: AttributeId = 80;
pub const TEXT_ATT: AttributeId = 81;
pub const LAYOUT_ATT: AttributeId = 82;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    fn to_wire(self) -> i32 {
        match self {
            Alignment::Left => 0,
            Alignment::Center => 1,
            Alignment::Right => 2,
            Alignment::Justify => 3,
        }
    }

    fn from_wire(value: i32) -> Result<Self, SerdeErr> {
        match value {
            0 => Ok(Alignment::Left),
            1 => Ok(Alignment::Center),
            2 => Ok(Alignment::Right),
            3 => Ok(Alignment::Justify),
            _ => Err(SerdeErr::InvalidDiscriminant {
                type_name: "Alignment",
                value: u32::from_ne_bytes(value.to_ne_bytes()),
            }),
        }
    }
}

/// A block of styled text. Shaping and rasterising happen on the render
/// side; only the inputs travel.
#[derive(Clone, Debug, PartialEq)]
pub struct Text {
    text: String,
    font: String,
    font_size: f32,
    leading: f32,
    text_color: Color,
    alignment: Alignment,
    resize_limit_width: f32,
    resize_limit_height: f32,
}

impl Default for Text {
    fn default() -> Self {
        Self {
            text: String::new(),
            font: "Sans".to_string(),
            font_size: 120.0,
            leading: 1.0,
            text_color: Color::WHITE,
            alignment: Alignment::Left,
            resize_limit_width: -1.0,
            resize_limit_height: -1.0,
        }
    }
}

impl Text {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn font(&self) -> &str {
        &self.font
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn leading(&self) -> f32 {
        self.leading
    }

    pub fn text_color(&self) -> Color {
        self.text_color
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    /// Wrapping limits; `-1.0` means unlimited
    pub fn resize_limit(&self) -> (f32, f32) {
        (self.resize_limit_width, self.resize_limit_height)
    }

    pub(crate) fn set_text(&mut self, text: &str) -> DirtyState {
        if self.text == text {
            return DirtyState::EMPTY;
        }
        self.text = text.to_string();
        TEXT_DIRTY
    }

    pub(crate) fn set_font(&mut self, font: &str, font_size: f32) -> DirtyState {
        if self.font == font && self.font_size == font_size {
            return DirtyState::EMPTY;
        }
        self.font = font.to_string();
        self.font_size = font_size;
        FONT_DIRTY
    }

    pub(crate) fn set_leading(&mut self, leading: f32) -> DirtyState {
        if self.leading == leading {
            return DirtyState::EMPTY;
        }
        self.leading = leading;
        FONT_DIRTY
    }

    pub(crate) fn set_text_color(&mut self, color: Color) -> DirtyState {
        if self.text_color == color {
            return DirtyState::EMPTY;
        }
        self.text_color = color;
        FONT_DIRTY
    }

    pub(crate) fn set_alignment(&mut self, alignment: Alignment) -> DirtyState {
        if self.alignment == alignment {
            return DirtyState::EMPTY;
        }
        self.alignment = alignment;
        FONT_DIRTY
    }

    pub(crate) fn set_resize_limit(&mut self, width: f32, height: f32) -> DirtyState {
        // anything below one pixel turns wrapping off
        let width = if width < 1.0 { -1.0 } else { width };
        let height = if height < 1.0 { -1.0 } else { height };
        if self.resize_limit_width == width && self.resize_limit_height == height {
            return DirtyState::EMPTY;
        }
        self.resize_limit_width = width;
        self.resize_limit_height = height;
        LAYOUT_DIRTY
    }

    pub(crate) fn dirty_slots() -> DirtyState {
        FONT_DIRTY | TEXT_DIRTY | LAYOUT_DIRTY
    }

    pub(crate) fn write_attributes(&self, writer: &mut AttributeWriter) {
        writer.write_group(TEXT_DIRTY, TEXT_ATT, |buffer| {
            buffer.add(&self.text);
        });
        writer.write_group(FONT_DIRTY, FONTNAME_ATT, |buffer| {
            buffer.add(&self.font);
            buffer.add(&self.font_size);
            buffer.add(&self.leading);
            buffer.add(&self.text_color);
            buffer.add(&self.alignment.to_wire());
        });
        writer.write_group(LAYOUT_DIRTY, LAYOUT_ATT, |buffer| {
            buffer.add(&self.resize_limit_width);
            buffer.add(&self.resize_limit_height);
        });
    }

    pub(crate) fn read_attribute(
        &mut self,
        attribute_id: AttributeId,
        buffer: &mut DataBuffer,
    ) -> Result<bool, SerdeErr> {
        match attribute_id {
            TEXT_ATT => {
                self.text = String::de(buffer)?;
            }
            FONTNAME_ATT => {
                self.font = String::de(buffer)?;
                self.font_size = f32::de(buffer)?;
                self.leading = f32::de(buffer)?;
                self.text_color = Color::de(buffer)?;
                self.alignment = Alignment::from_wire(i32::de(buffer)?)?;
            }
            LAYOUT_ATT => {
                let width = f32::de(buffer)?;
                let height = f32::de(buffer)?;
                self.set_resize_limit(width, height);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }
}
