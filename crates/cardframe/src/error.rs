/// Errors produced by the facade operations.
///
/// Detection failure on a preview frame is never an error; it resolves to a
/// negative [`crate::GuideResult`]. Only programmer-error-class invalid
/// input and a capture with no usable shape surface here.
#[derive(thiserror::Error, Debug)]
pub enum CardScanError {
    #[error("invalid image dimensions (width={width}, height={height})")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("invalid viewport size (width={width}, height={height})")]
    InvalidViewport { width: u32, height: u32 },

    #[error("no card-like shape found")]
    ShapeNotFound,
}
