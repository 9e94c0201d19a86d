//! Error types for sphere-reveal.

use thiserror::Error;

/// Errors raised while bringing up the window, the GPU or the configuration.
///
/// Nothing in the per-frame path returns these: a frame that cannot acquire
/// a surface texture is skipped, and a missed click is simply a no-op.
#[derive(Error, Debug)]
pub enum Error {
    #[error("surface error: {0}")]
    Surface(String),

    #[error("no suitable GPU adapter found")]
    AdapterNotFound,

    #[error("device error: {0}")]
    Device(String),

    #[error("window error: {0}")]
    Window(String),

    #[error("event loop error: {0}")]
    EventLoop(String),

    #[error("scene has no sphere to draw")]
    MissingSphere,

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<wgpu::SurfaceError> for Error {
    fn from(e: wgpu::SurfaceError) -> Self {
        Error::Surface(e.to_string())
    }
}

impl From<wgpu::CreateSurfaceError> for Error {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        Error::Surface(e.to_string())
    }
}

impl From<wgpu::RequestDeviceError> for Error {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        Error::Device(e.to_string())
    }
}

impl From<winit::error::OsError> for Error {
    fn from(e: winit::error::OsError) -> Self {
        Error::Window(e.to_string())
    }
}

impl From<winit::error::EventLoopError> for Error {
    fn from(e: winit::error::EventLoopError) -> Self {
        Error::EventLoop(e.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(format!("failed to parse TOML: {e}"))
    }
}

/// Result type alias using the crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adapter_not_found_display() {
        assert_eq!(
            Error::AdapterNotFound.to_string(),
            "no suitable GPU adapter found"
        );
    }

    #[test]
    fn surface_display() {
        let err = Error::Surface("timeout".to_string());
        assert_eq!(err.to_string(), "surface error: timeout");
    }

    #[test]
    fn io_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.to_string(), "IO error: missing");
    }

    #[test]
    fn toml_error_becomes_config() {
        let parsed: std::result::Result<toml::Value, _> = toml::from_str("width = ");
        let err: Error = parsed.unwrap_err().into();
        assert!(matches!(err, Error::Config(_)));
    }
}
