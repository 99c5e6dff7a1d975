use tableau_serde::{DataBuffer, Serde, SerdeErr};

use crate::{
    math::{read_vec3, write_vec3, Color, Vec3},
    sprite::{dirty::DirtyState, writer::AttributeWriter},
    types::{AttributeId, SpriteId},
};

pub const PARENT_ATT: AttributeId = 2;
pub const SIZE_ATT: AttributeId = 3;
pub const FLAGS_ATT: AttributeId = 4;
pub const POSITION_ATT: AttributeId = 5;
pub const CENTER_ATT: AttributeId = 6;
pub const SCALE_ATT: AttributeId = 7;
pub const COLOR_ATT: AttributeId = 8;
pub const OPACITY_ATT: AttributeId = 9;
pub const ROTATION_ATT: AttributeId = 10;
pub const SORTING_ATT: AttributeId = 11;

/// First id available to sprite subtypes. Everything below belongs to the
/// base sprite.
pub const SUBTYPE_ATTRIBUTE_BASE: AttributeId = 80;

const VISIBLE_FLAG: u8 = 1 << 0;
const ENABLED_FLAG: u8 = 1 << 1;
const TRANSPARENT_FLAG: u8 = 1 << 2;

/// Base attributes every sprite carries
#[derive(Clone, Debug, PartialEq)]
pub struct SpriteAttributes {
    pub position: Vec3,
    pub scale: Vec3,
    /// Euler angles in degrees, applied X then Y then Z
    pub rotation: Vec3,
    /// Fraction of `size` used as the pivot
    pub center: Vec3,
    pub size: Vec3,
    pub color: Color,
    pub opacity: f32,
    pub visible: bool,
    pub enabled: bool,
    pub transparent: bool,
    pub z_level: f32,
    pub draw_sorted: bool,
}

impl Default for SpriteAttributes {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            scale: Vec3::ONE,
            rotation: Vec3::ZERO,
            center: Vec3::ZERO,
            size: Vec3::new(0.0, 0.0, 1.0),
            color: Color::WHITE,
            opacity: 1.0,
            visible: true,
            enabled: false,
            transparent: true,
            z_level: 0.0,
            draw_sorted: false,
        }
    }
}

impl SpriteAttributes {
    fn flags(&self) -> u8 {
        let mut flags = 0;
        if self.visible {
            flags |= VISIBLE_FLAG;
        }
        if self.enabled {
            flags |= ENABLED_FLAG;
        }
        if self.transparent {
            flags |= TRANSPARENT_FLAG;
        }
        flags
    }

    fn set_flags(&mut self, flags: u8) {
        self.visible = flags & VISIBLE_FLAG != 0;
        self.enabled = flags & ENABLED_FLAG != 0;
        self.transparent = flags & TRANSPARENT_FLAG != 0;
    }

    pub(crate) fn write(&self, parent: Option<SpriteId>, writer: &mut AttributeWriter) {
        if let Some(parent) = parent {
            writer.write_group(DirtyState::PARENT, PARENT_ATT, |buffer| {
                buffer.add(&parent);
            });
        }
        writer.write_group(DirtyState::SIZE, SIZE_ATT, |buffer| {
            write_vec3(buffer, self.size);
        });
        writer.write_group(DirtyState::FLAGS, FLAGS_ATT, |buffer| {
            buffer.add(&self.flags());
        });
        writer.write_group(DirtyState::POSITION, POSITION_ATT, |buffer| {
            write_vec3(buffer, self.position);
        });
        writer.write_group(DirtyState::CENTER, CENTER_ATT, |buffer| {
            write_vec3(buffer, self.center);
        });
        writer.write_group(DirtyState::SCALE, SCALE_ATT, |buffer| {
            write_vec3(buffer, self.scale);
        });
        writer.write_group(DirtyState::COLOR, COLOR_ATT, |buffer| {
            buffer.add(&self.color);
        });
        writer.write_group(DirtyState::OPACITY, OPACITY_ATT, |buffer| {
            buffer.add(&self.opacity);
        });
        writer.write_group(DirtyState::ROTATION, ROTATION_ATT, |buffer| {
            write_vec3(buffer, self.rotation);
        });
        writer.write_group(DirtyState::SORTING, SORTING_ATT, |buffer| {
            buffer.add(&self.z_level);
            buffer.add(&self.draw_sorted);
        });
    }

    /// Reads every base attribute except `PARENT_ATT`, which needs the tree.
    /// `Ok(false)` means the id is not a base attribute.
    pub(crate) fn read(
        &mut self,
        attribute_id: AttributeId,
        buffer: &mut DataBuffer,
    ) -> Result<bool, SerdeErr> {
        match attribute_id {
            SIZE_ATT => self.size = read_vec3(buffer)?,
            FLAGS_ATT => self.set_flags(u8::de(buffer)?),
            POSITION_ATT => self.position = read_vec3(buffer)?,
            CENTER_ATT => self.center = read_vec3(buffer)?,
            SCALE_ATT => self.scale = read_vec3(buffer)?,
            COLOR_ATT => self.color = Color::de(buffer)?,
            OPACITY_ATT => self.opacity = f32::de(buffer)?,
            ROTATION_ATT => self.rotation = read_vec3(buffer)?,
            SORTING_ATT => {
                self.z_level = f32::de(buffer)?;
                self.draw_sorted = bool::de(buffer)?;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }
}
