use tableau_serde::{ConstByteLength, DataBuffer, Serde, SerdeErr};

pub use glam::{EulerRot, Mat4, Vec3};

/// An opaque RGB colour with float channels in `0.0..=1.0`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

/// An RGB colour plus alpha
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorA {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ColorA {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgb(&self) -> Color {
        Color::new(self.r, self.g, self.b)
    }
}

impl From<Color> for ColorA {
    fn from(color: Color) -> Self {
        ColorA::new(color.r, color.g, color.b, 1.0)
    }
}

impl Serde for Color {
    fn ser(&self, buffer: &mut DataBuffer) {
        self.r.ser(buffer);
        self.g.ser(buffer);
        self.b.ser(buffer);
    }

    fn de(buffer: &mut DataBuffer) -> Result<Self, SerdeErr> {
        Ok(Color::new(f32::de(buffer)?, f32::de(buffer)?, f32::de(buffer)?))
    }

    fn byte_length(&self) -> usize {
        12
    }
}

impl ConstByteLength for Color {
    fn const_byte_length() -> usize {
        12
    }
}

impl Serde for ColorA {
    fn ser(&self, buffer: &mut DataBuffer) {
        self.r.ser(buffer);
        self.g.ser(buffer);
        self.b.ser(buffer);
        self.a.ser(buffer);
    }

    fn de(buffer: &mut DataBuffer) -> Result<Self, SerdeErr> {
        Ok(ColorA::new(
            f32::de(buffer)?,
            f32::de(buffer)?,
            f32::de(buffer)?,
            f32::de(buffer)?,
        ))
    }

    fn byte_length(&self) -> usize {
        16
    }
}

impl ConstByteLength for ColorA {
    fn const_byte_length() -> usize {
        16
    }
}

/// Newtype so `Vec3` can travel through a [`DataBuffer`]; glam's type is
/// foreign to this crate.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct WireVec3(pub Vec3);

impl Serde for WireVec3 {
    fn ser(&self, buffer: &mut DataBuffer) {
        self.0.x.ser(buffer);
        self.0.y.ser(buffer);
        self.0.z.ser(buffer);
    }

    fn de(buffer: &mut DataBuffer) -> Result<Self, SerdeErr> {
        Ok(WireVec3(Vec3::new(
            f32::de(buffer)?,
            f32::de(buffer)?,
            f32::de(buffer)?,
        )))
    }

    fn byte_length(&self) -> usize {
        12
    }
}

impl ConstByteLength for WireVec3 {
    fn const_byte_length() -> usize {
        12
    }
}

pub(crate) fn write_vec3(buffer: &mut DataBuffer, value: Vec3) {
    buffer.add(&WireVec3(value));
}

pub(crate) fn read_vec3(buffer: &mut DataBuffer) -> Result<Vec3, SerdeErr> {
    Ok(buffer.read::<WireVec3>()?.0)
}
