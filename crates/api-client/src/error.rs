use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to complete the HTTP request: {0}")]
    Request(#[from] reqwest::Error),

    #[error("The data provider returned an error: {0}")]
    Provider(String),

    #[error("Failed to deserialize the API response: {0}")]
    Deserialization(String),

    #[error("Invalid data format from API: {0}")]
    InvalidData(String),
}
