use base64::engine::general_purpose::STANDARD;
use base64::Engine;

const FALLBACK_MIME: &str = "application/octet-stream";

pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    let mime = mime.trim();
    let mime = if mime.is_empty() { FALLBACK_MIME } else { mime };
    let payload = STANDARD.encode(bytes);
    let mut out = String::with_capacity(mime.len() + payload.len() + 13);
    out.push_str("data:");
    out.push_str(mime);
    out.push_str(";base64,");
    out.push_str(&payload);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_png_header() {
        let url = encode_data_url("image/png", &[0x89, b'P', b'N', b'G']);
        assert_eq!(url, "data:image/png;base64,iVBORw==");
    }

    #[test]
    fn blank_mime_falls_back() {
        let url = encode_data_url("  ", b"hi");
        assert_eq!(url, "data:application/octet-stream;base64,aGk=");
    }
}
