use std::fmt;
use std::ops::{Add, Sub};

use crate::error::ProtocolError;
use crate::io::{Reader, Writer};

/// Size of an encoded vector on the wire.
pub const VECTOR_SIZE: usize = 12;

/// A point or direction in the voice client's 3D audio space.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// World "up", used as the listener's top vector.
    pub const UP: Self = Self::new(0.0, 1.0, 0.0);

    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Reads `x`, `y` and `z`. Nothing is consumed if fewer than 12 bytes remain.
    pub fn read(r: &mut Reader) -> Result<Self, ProtocolError> {
        if r.remaining().len() < VECTOR_SIZE {
            return Err(ProtocolError::PacketTooShort {
                expected: r.position() + VECTOR_SIZE,
                got: r.position() + r.remaining().len(),
            });
        }
        Ok(Self {
            x: r.read_f32()?,
            y: r.read_f32()?,
            z: r.read_f32()?,
        })
    }

    pub fn write(self, w: &mut Writer) {
        w.write_f32(self.x);
        w.write_f32(self.y);
        w.write_f32(self.z);
    }
}

impl Sub for Vector3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Add for Vector3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl From<[f32; 3]> for Vector3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inequality_checks_every_component() {
        let base = Vector3::new(1.0, 2.0, 3.0);

        assert!(base == Vector3::new(1.0, 2.0, 3.0));
        assert!(base != Vector3::new(9.0, 2.0, 3.0));
        assert!(base != Vector3::new(1.0, 9.0, 3.0));
        assert!(base != Vector3::new(1.0, 2.0, 9.0));
    }

    #[test]
    fn subtraction_is_componentwise() {
        let delta = Vector3::new(5.0, -1.0, 2.5) - Vector3::new(2.0, 3.0, 0.5);
        assert_eq!(delta, Vector3::new(3.0, -4.0, 2.0));
    }

    #[test]
    fn length_of_unit_axes() {
        assert!((Vector3::UP.length() - 1.0).abs() < f32::EPSILON);
        assert!((Vector3::new(3.0, 4.0, 0.0).length() - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn display_renders_components() {
        assert_eq!(Vector3::new(1.5, -2.0, 0.0).to_string(), "(1.5, -2, 0)");
    }

    #[test]
    fn read_truncated_vector_fails_without_consuming() {
        let mut w = Writer::new();
        w.write_f32(1.0);
        w.write_f32(2.0);
        let bytes = w.into_vec();
        let mut r = Reader::new(&bytes);

        assert_eq!(
            Vector3::read(&mut r),
            Err(ProtocolError::PacketTooShort { expected: 12, got: 8 })
        );
        assert_eq!(r.position(), 0);
    }
}
