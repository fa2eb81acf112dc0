use thiserror::Error;

/// Everything that can go wrong while building scene data or rendering a frame.
///
/// None of these are recovered from inside the pipeline: a failing call
/// aborts and hands the error back to whoever drives the renderer.
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("texture dimensions must be non-zero, got {width}x{height}")]
    EmptyTexture { width: u32, height: u32 },

    #[error("expected {expected} pixels for the given dimensions, found {found}")]
    PixelCountMismatch { expected: usize, found: usize },

    #[error("index buffer length {0} is not a multiple of 3")]
    IndexBufferNotTriangles(usize),

    #[error("index [{index}] is not part of the vertex buffer ({vertex_count} vertices)")]
    IndexOutOfRange { index: usize, vertex_count: usize },

    #[error("expected {expected} per-triangle normals, found {found}")]
    NormalCountMismatch { expected: usize, found: usize },

    #[error("pixel at coordinates {x}, {y} is not in the {width}x{height} texture")]
    PixelOutOfBounds { x: u32, y: u32, width: u32, height: u32 },

    #[error("divide by zero: {0}")]
    DivideByZero(String),

    #[error("sample count must be greater than or equal to 1, received {0}")]
    InvalidSampleCount(u8),

    #[error("unknown draw mode {0:?} (expected \"fill\" or \"wireframe\")")]
    InvalidDrawMode(String),

    #[error("obj line {line}: {message}")]
    Obj { line: usize, message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, RasterError>;
