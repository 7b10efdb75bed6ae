//! JSON envelope for HTTP-embedded consumption.

use serde::{Deserialize, Serialize};

/// Base64-embedded composite, `{ image_b64, w, h }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub image_b64: String,
    pub w: usize,
    pub h: usize,
}

impl Envelope {
    /// Wraps encoded image bytes.
    pub fn new(bytes: &[u8], width: usize, height: usize) -> Self {
        use base64::Engine as _;
        Self {
            image_b64: base64::engine::general_purpose::STANDARD.encode(bytes),
            w: width,
            h: height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Envelope;

    #[test]
    fn encodes_bytes_as_base64() {
        let env = Envelope::new(b"mock", 4, 2);
        assert_eq!(env.image_b64, "bW9jaw==");
        assert_eq!((env.w, env.h), (4, 2));
    }
}
