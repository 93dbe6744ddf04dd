/// What an extracted payload looks like.
///
/// The container does not record whether text or binary data was hidden,
/// valid UTF-8 is treated as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Text,
    Binary,
}

impl PayloadKind {
    pub fn of(payload: &[u8]) -> Self {
        if std::str::from_utf8(payload).is_ok() {
            PayloadKind::Text
        } else {
            PayloadKind::Binary
        }
    }
}
