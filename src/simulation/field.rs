use bevy::prelude::*;

/// Number of `f32` channels stored per cell.
pub const FIELD_CHANNELS: usize = 4;

/// Bytes per cell when exported as an RGBA 32-bit float texel.
pub const BYTES_PER_CELL: usize = FIELD_CHANNELS * std::mem::size_of::<f32>();

/// One simulation cell.
///
/// The channel order is the texture contract with the compositor:
/// R = pressure, G = velocity, B = horizontal gradient, A = vertical gradient.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FieldCell {
    pub pressure: f32,
    pub velocity: f32,
    pub gradient_x: f32,
    pub gradient_y: f32,
}

impl FieldCell {
    pub const ZERO: Self = Self {
        pressure: 0.0,
        velocity: 0.0,
        gradient_x: 0.0,
        gradient_y: 0.0,
    };

    pub fn new(pressure: f32, velocity: f32, gradient_x: f32, gradient_y: f32) -> Self {
        Self {
            pressure,
            velocity,
            gradient_x,
            gradient_y,
        }
    }

    /// Channels in texture order.
    #[inline]
    pub fn as_rgba(&self) -> [f32; FIELD_CHANNELS] {
        [self.pressure, self.velocity, self.gradient_x, self.gradient_y]
    }

    pub fn is_rest(&self) -> bool {
        *self == Self::ZERO
    }
}

/// A 2D grid of [`FieldCell`]s
///
/// Stored row-major, indexed as `y * width + x`. Row 0 is displayed at the
/// top of the viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    dimensions: UVec2,
    cells: Vec<FieldCell>,
}

impl Field {
    /// Create a field at rest (every channel zero)
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width as usize) * (height as usize);
        Self {
            dimensions: UVec2::new(width, height),
            cells: vec![FieldCell::ZERO; size],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.dimensions.x
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.dimensions.y
    }

    #[inline]
    pub fn dimensions(&self) -> UVec2 {
        self.dimensions
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub(crate) fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.dimensions.x as usize) + (x as usize)
    }

    /// Cell at `(x, y)`, or `None` outside the grid.
    pub fn get(&self, x: u32, y: u32) -> Option<&FieldCell> {
        if x >= self.dimensions.x || y >= self.dimensions.y {
            return None;
        }
        self.cells.get(self.index(x, y))
    }

    pub fn get_mut(&mut self, x: u32, y: u32) -> Option<&mut FieldCell> {
        if x >= self.dimensions.x || y >= self.dimensions.y {
            return None;
        }
        let idx = self.index(x, y);
        self.cells.get_mut(idx)
    }

    /// Pressure at `(x, y)`, zero outside the grid.
    pub fn pressure(&self, x: u32, y: u32) -> f32 {
        self.get(x, y).map_or(0.0, |cell| cell.pressure)
    }

    pub fn cells(&self) -> &[FieldCell] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [FieldCell] {
        &mut self.cells
    }

    /// Return every cell to rest.
    pub fn clear(&mut self) {
        self.cells.fill(FieldCell::ZERO);
    }

    pub fn is_at_rest(&self) -> bool {
        self.cells.iter().all(FieldCell::is_rest)
    }

    /// Sum of squared pressure over the grid.
    pub fn pressure_energy(&self) -> f32 {
        self.cells.iter().map(|c| c.pressure * c.pressure).sum()
    }

    /// Largest absolute pressure in the grid.
    pub fn peak_pressure(&self) -> f32 {
        self.cells
            .iter()
            .fold(0.0f32, |peak, c| peak.max(c.pressure.abs()))
    }

    /// Write the field as tightly packed little-endian RGBA `f32` texels into `out`.
    ///
    /// `out` is resized to `len() * BYTES_PER_CELL` and reused across frames.
    pub fn write_rgba_f32_bytes(&self, out: &mut Vec<u8>) {
        out.clear();
        out.reserve(self.cells.len() * BYTES_PER_CELL);
        for cell in &self.cells {
            for channel in cell.as_rgba() {
                out.extend_from_slice(&channel.to_le_bytes());
            }
        }
    }

    pub fn to_rgba_f32_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        self.write_rgba_f32_bytes(&mut bytes);
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_creation() {
        let field = Field::new(8, 4);
        assert_eq!(field.len(), 32);
        assert_eq!(field.dimensions(), UVec2::new(8, 4));
        assert!(field.is_at_rest());
    }

    #[test]
    fn test_cell_indexing() {
        let mut field = Field::new(5, 3);
        *field.get_mut(4, 2).unwrap() = FieldCell::new(1.5, -0.5, 0.25, 0.125);

        assert_eq!(field.cells()[2 * 5 + 4].pressure, 1.5);
        assert_eq!(field.pressure(4, 2), 1.5);
        assert!(field.get(5, 0).is_none());
        assert!(field.get(0, 3).is_none());
        assert_eq!(field.pressure(9, 9), 0.0);
    }

    #[test]
    fn test_rgba_byte_layout() {
        let mut field = Field::new(2, 1);
        *field.get_mut(1, 0).unwrap() = FieldCell::new(1.0, 2.0, 3.0, 4.0);

        let bytes = field.to_rgba_f32_bytes();
        assert_eq!(bytes.len(), 2 * BYTES_PER_CELL);

        let texel: Vec<f32> = bytes[BYTES_PER_CELL..]
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();
        assert_eq!(texel, vec![1.0, 2.0, 3.0, 4.0]);
        assert!(bytes[..BYTES_PER_CELL].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_clear_and_energy() {
        let mut field = Field::new(3, 3);
        field.get_mut(1, 1).unwrap().pressure = 2.0;
        field.get_mut(0, 0).unwrap().pressure = -1.0;
        assert!((field.pressure_energy() - 5.0).abs() < 1e-6);
        assert_eq!(field.peak_pressure(), 2.0);

        field.clear();
        assert!(field.is_at_rest());
        assert_eq!(field.pressure_energy(), 0.0);
    }
}
