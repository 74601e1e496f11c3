/// Capabilities / feature flags of a messenger implementation.
#[derive(Clone, Copy, Debug)]
pub struct MessagingCapabilities {
    pub supports_html: bool,
    pub max_message_len: usize,
}

impl MessagingCapabilities {
    /// Cut `text` to the messenger's length limit on a char boundary.
    pub fn clamp<'a>(&self, text: &'a str) -> &'a str {
        if text.len() <= self.max_message_len {
            return text;
        }
        let mut end = self.max_message_len;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        &text[..end]
    }
}
