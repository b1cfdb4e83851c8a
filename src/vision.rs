//! Choice-derived image generation
//!
//! The model API is an opaque collaborator behind `VisionClient`. The one
//! hard obligation here is the fallback: when the call fails for any reason,
//! image selection degrades to a deterministic pick from a fixed gallery so
//! the results screen always renders the same image for the same run.

use thiserror::Error;

/// Structured failure from the image generator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VisionError {
    /// The hosted model returned its payment-required status
    #[error("image generation requires payment")]
    PaymentRequired,
    /// Anything else: network, quota, malformed response
    #[error("image generation unavailable: {0}")]
    Unavailable(String),
}

/// The remote model seam
pub trait VisionClient {
    /// Returns a URL for the generated image
    fn generate(&mut self, prompt: &str) -> Result<String, VisionError>;
}

/// Fixed gallery used when generation fails
pub const FALLBACK_IMAGES: &[&str] = &[
    "/images/vision-metropolis.jpg",
    "/images/vision-green-fields.jpg",
    "/images/vision-tech-campus.jpg",
    "/images/vision-space-launch.jpg",
    "/images/vision-harbor.jpg",
];

/// Assemble the natural-language prompt from the run's choice labels
pub fn build_prompt(choices: &[String]) -> String {
    if choices.is_empty() {
        return "A hopeful vision of India's future in 2047, vibrant and photorealistic"
            .to_string();
    }
    format!(
        "A hopeful vision of India's future in 2047 shaped by {}, vibrant and photorealistic",
        choices.join(", ")
    )
}

/// Deterministic fallback pick: FNV-1a over the choice labels, mod gallery
/// size. The same choices always land on the same image.
pub fn fallback_image(choices: &[String]) -> &'static str {
    let mut hash: u64 = 0xcbf29ce484222325;
    for choice in choices {
        for byte in choice.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x100000001b3);
        }
        // Separator so ["ab"] and ["a","b"] differ
        hash = hash.wrapping_mul(0x100000001b3);
    }
    FALLBACK_IMAGES[(hash % FALLBACK_IMAGES.len() as u64) as usize]
}

/// Generate with graceful degradation: any client failure logs and falls
/// back; the caller always gets a usable URL.
pub fn image_for_choices(client: &mut dyn VisionClient, choices: &[String]) -> String {
    let prompt = build_prompt(choices);
    match client.generate(&prompt) {
        Ok(url) => url,
        Err(err) => {
            log::warn!("vision generation failed, using fallback: {err}");
            fallback_image(choices).to_string()
        }
    }
}
