/// An error type for the io module.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    /// Error when the file does not exist.
    #[error("File does not exist: {0}")]
    FileDoesNotExist(std::path::PathBuf),

    /// Invalid file extension.
    #[error("File does not have a valid extension: {0}")]
    InvalidFileExtension(std::path::PathBuf),

    /// Error to open or manipulate the file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// Error to decode or encode the image.
    #[error("Failed to decode or encode the image. {0}")]
    ImageDecodeError(#[from] image::ImageError),

    /// The decoded color type has no pixel buffer counterpart.
    #[error("Unsupported decoded color type: {0}")]
    UnsupportedColorType(String),

    /// Error to create the pixel buffer.
    #[error("Failed to create pixel buffer. {0}")]
    ImageCreationError(#[from] convfilter_image::ImageError),
}
