/// One depth value per pixel of the active render buffer. Smaller is nearer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DepthBuffer {
    width: u32,
    height: u32,
    values: Vec<f32>,
}

impl DepthBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let mut buffer = Self::default();
        buffer.reset(width, height);
        buffer
    }

    /// Resize to `width x height` and set every pixel to +infinity.
    pub fn reset(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.values.clear();
        self.values.resize(width as usize * height as usize, f32::INFINITY);
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// `None` outside the buffer.
    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.values[(y * self.width + x) as usize])
    }

    /// Callers pass coordinates already clamped to the buffer.
    pub(crate) fn set(&mut self, x: u32, y: u32, value: f32) {
        let i = (y * self.width + x) as usize;
        self.values[i] = value;
    }
}
