use base64::Engine as _;

pub const SVG_MIME: &str = "image/svg+xml";

/// `data:image/svg+xml;base64,...` for inline embedding.
pub fn to_data_uri(svg: &str) -> String {
    let payload = base64::engine::general_purpose::STANDARD.encode(svg.as_bytes());
    format!("data:{SVG_MIME};base64,{payload}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_utf8_bytes() {
        assert_eq!(
            to_data_uri("<svg/>"),
            "data:image/svg+xml;base64,PHN2Zy8+"
        );
        let uri = to_data_uri("<svg>é</svg>");
        let payload = uri.strip_prefix("data:image/svg+xml;base64,").unwrap();
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(payload)
            .unwrap();
        assert_eq!(String::from_utf8(decoded).unwrap(), "<svg>é</svg>");
    }
}
