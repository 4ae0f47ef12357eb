/// Error types for configuration, color parsing and OBJ import
use std::fmt;

/// Rejected renderer configuration. Raised when a value is set, never mid-frame.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Field of view must lie strictly between 0 and 180 degrees
    FieldOfView(f32),
    /// Near plane must be finite and strictly positive
    NearPlane(f32),
    /// Far plane must be finite and strictly positive
    FarPlane(f32),
    /// Aspect ratio must be finite and strictly positive
    AspectRatio(f32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FieldOfView(v) => write!(f, "field of view must be in (0, 180) degrees, got {v}"),
            Self::NearPlane(v) => write!(f, "near plane must be > 0, got {v}"),
            Self::FarPlane(v) => write!(f, "far plane must be > 0, got {v}"),
            Self::AspectRatio(v) => write!(f, "aspect ratio must be > 0, got {v}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    InvalidHex(String),
}

impl fmt::Display for ColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidHex(s) => write!(f, "invalid hex color {s:?}"),
        }
    }
}

impl std::error::Error for ColorError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjError {
    /// A statement the parser recognised but couldn't read
    Syntax { line: usize, message: String },
    /// A face referenced a vertex that doesn't exist (1-based, as written)
    IndexOutOfRange { line: usize, index: i64, vertex_count: usize },
    /// A face with fewer than 3 corners
    DegenerateFace { line: usize, corners: usize },
}

impl fmt::Display for ObjError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax { line, message } => write!(f, "line {line}: {message}"),
            Self::IndexOutOfRange {
                line,
                index,
                vertex_count,
            } => write!(
                f,
                "line {line}: vertex index {index} out of range ({vertex_count} vertices defined)"
            ),
            Self::DegenerateFace { line, corners } => {
                write!(f, "line {line}: face has {corners} corners, need at least 3")
            }
        }
    }
}

impl std::error::Error for ObjError {}
