use std::fmt;

use zeroize::Zeroize;

/// Secret that seeds the position permutation and keys the encryption.
///
/// Empty strings are treated as no password. The secret is wiped when dropped and
/// masked in debug output.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct Password {
    secret: Option<String>,
}

impl Password {
    pub fn new(secret: impl Into<String>) -> Self {
        let secret = secret.into();
        Self {
            secret: (!secret.is_empty()).then_some(secret),
        }
    }

    pub fn get(&self) -> Option<&str> {
        self.secret.as_deref()
    }

    pub fn is_some(&self) -> bool {
        self.secret.is_some()
    }
}

impl Drop for Password {
    fn drop(&mut self) {
        if let Some(secret) = self.secret.as_mut() {
            secret.zeroize();
        }
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(secret) => f
                .debug_tuple("Password")
                .field(&format_args!("{}", "*".repeat(secret.chars().count())))
                .finish(),
            None => f.write_str("Password(None)"),
        }
    }
}

impl From<&str> for Password {
    fn from(secret: &str) -> Self {
        Self::new(secret)
    }
}

impl From<Option<String>> for Password {
    fn from(secret: Option<String>) -> Self {
        secret.map(Self::new).unwrap_or_default()
    }
}
