use serde::Deserialize;

// Form payload for signing the guestbook. A missing field signs with empty content.
#[derive(Debug, Default, Deserialize)]
pub struct SignForm {
    #[serde(default)]
    pub content: String,
}
