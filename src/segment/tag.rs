use std::fmt;
use std::sync::Arc;

/// Values that can be stored as a segment tag.
pub trait TagValue: fmt::Display + fmt::Debug + Send + Sync + 'static {}

impl<T: fmt::Display + fmt::Debug + Send + Sync + 'static> TagValue for T {}

/// An opaque annotation attached to a segment when it is created.
///
/// The topology engine never inspects a tag. It only hands it back in
/// boundary metadata and renders it as text in diagnostics.
#[derive(Clone)]
pub struct Tag(Arc<dyn TagValue>);

impl Tag {
    /// Wraps any displayable value.
    pub fn new(value: impl TagValue) -> Self {
        Self(Arc::new(value))
    }

    /// Returns `true` if both tags share the same underlying value.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Tag").field(&self.0).finish()
    }
}

impl From<&str> for Tag {
    fn from(value: &str) -> Self {
        Self::new(value.to_owned())
    }
}

impl From<String> for Tag {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
