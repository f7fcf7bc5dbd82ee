use std::fmt;
use zeroize::Zeroizing;

/// A decrypted bearer credential.
///
/// The backing buffer is wiped on drop. `Debug` never prints the value, and there is
/// deliberately no `Display` impl; use [`Credential::expose`] at the point where the
/// token is written into an `Authorization` header.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(Zeroizing<String>);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Zeroizing::new(token.into()))
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}
