//! Math types shared by the VXL and HVA codecs.
//!
//! Provides a POD (Plain Old Data) 3x4 matrix matching the on-disk
//! transform layout, so the codecs can serialize it without pulling in a
//! linear-algebra dependency.

/// 3x4 affine transform matrix (row-major storage, POD type)
///
/// Stores 3 rows of a 4x4 affine matrix. The implicit 4th row is [0, 0, 0, 1].
/// Both the VXL limb tailer and the HVA frame data store this as 12
/// little-endian f32 values, row-major.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct Matrix3x4 {
    /// First row: [m00, m01, m02, tx]
    pub row0: [f32; 4],
    /// Second row: [m10, m11, m12, ty]
    pub row1: [f32; 4],
    /// Third row: [m20, m21, m22, tz]
    pub row2: [f32; 4],
}

impl Matrix3x4 {
    /// Serialized size in bytes (12 x f32)
    pub const SIZE: usize = 48;

    /// Identity transform (no rotation, no translation)
    pub const IDENTITY: Self = Self {
        row0: [1.0, 0.0, 0.0, 0.0],
        row1: [0.0, 1.0, 0.0, 0.0],
        row2: [0.0, 0.0, 1.0, 0.0],
    };

    /// Create from row arrays
    pub const fn from_rows(row0: [f32; 4], row1: [f32; 4], row2: [f32; 4]) -> Self {
        Self { row0, row1, row2 }
    }

    /// Convert to flat f32 array (row-major)
    pub fn to_array(&self) -> [f32; 12] {
        [
            self.row0[0],
            self.row0[1],
            self.row0[2],
            self.row0[3],
            self.row1[0],
            self.row1[1],
            self.row1[2],
            self.row1[3],
            self.row2[0],
            self.row2[1],
            self.row2[2],
            self.row2[3],
        ]
    }

    /// Create from flat f32 array (row-major)
    pub fn from_array(arr: [f32; 12]) -> Self {
        Self {
            row0: [arr[0], arr[1], arr[2], arr[3]],
            row1: [arr[4], arr[5], arr[6], arr[7]],
            row2: [arr[8], arr[9], arr[10], arr[11]],
        }
    }

    /// Write as 12 little-endian f32 values
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        for (i, v) in self.to_array().iter().enumerate() {
            bytes[i * 4..i * 4 + 4].copy_from_slice(&v.to_le_bytes());
        }
        bytes
    }

    /// Read from 12 little-endian f32 values
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        let mut arr = [0f32; 12];
        for (i, v) in arr.iter_mut().enumerate() {
            *v = f32::from_le_bytes([
                bytes[i * 4],
                bytes[i * 4 + 1],
                bytes[i * 4 + 2],
                bytes[i * 4 + 3],
            ]);
        }
        Some(Self::from_array(arr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let m = Matrix3x4::IDENTITY;
        assert_eq!(m.row0, [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(m.row1, [0.0, 1.0, 0.0, 0.0]);
        assert_eq!(m.row2, [0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_array_roundtrip() {
        let arr = [
            1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0,
        ];
        let m = Matrix3x4::from_array(arr);
        assert_eq!(m.to_array(), arr);
    }

    #[test]
    fn test_byte_roundtrip() {
        let m = Matrix3x4::from_rows(
            [1.0, 0.0, 0.0, 2.5],
            [0.0, 1.0, 0.0, -3.75],
            [0.0, 0.0, 1.0, 0.125],
        );
        let bytes = m.to_bytes();
        assert_eq!(bytes.len(), Matrix3x4::SIZE);
        assert_eq!(Matrix3x4::from_bytes(&bytes).unwrap(), m);
    }

    #[test]
    fn test_from_short_bytes() {
        assert!(Matrix3x4::from_bytes(&[0u8; 47]).is_none());
    }
}
