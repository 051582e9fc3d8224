/// Why a photo record was rejected before layout.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PhotoError {
    #[error("photo {id} has invalid dimensions {width}x{height}")]
    InvalidDimensions { id: u64, width: u32, height: u32 },
    #[error("photo {id} has no original image url")]
    MissingOriginal { id: u64 },
}
