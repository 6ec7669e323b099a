/// A request to be sent to the model provider.
///
/// The request carries one complete prompt. Whatever context the model
/// should see has already been folded into it by the caller.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModelRequest {
    /// The prompt text.
    pub prompt: String,
}

impl ModelRequest {
    /// Creates a request with the given prompt.
    #[inline]
    pub fn new<S: Into<String>>(prompt: S) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}
