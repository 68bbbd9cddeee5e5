//! Prompt engineering for tattoo designs

/// Wrap a user's description in the stencil template sent to the image model
pub fn engineer_prompt(user_prompt: &str) -> String {
    format!(
        "A professional tattoo design of {}. Clean black linework suitable for a \
         tattoo stencil, high contrast, isolated on a plain white background, \
         no text, no watermark.",
        user_prompt.trim()
    )
}

/// Assistant text returned alongside a generated design
pub fn reply_text(user_prompt: &str) -> String {
    format!(
        "Here is a tattoo design for \"{}\". Let me know if you'd like any changes!",
        user_prompt.trim()
    )
}
