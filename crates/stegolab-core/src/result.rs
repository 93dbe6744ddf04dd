use crate::StegoError;

pub type Result<T> = std::result::Result<T, StegoError>;
