//! tus 1.0.0 core protocol: header names and values.

pub const TUS_VERSION: &str = "1.0.0";

pub const OFFSET_CONTENT_TYPE: &str = "application/offset+octet-stream";

/// Chunk sizes are kept to multiples of 256 KiB; some stream providers reject
/// any other size for non-final chunks.
pub const CHUNK_ALIGNMENT: usize = 256 * 1024;

pub const HEADER_TUS_RESUMABLE: &str = "Tus-Resumable";
pub const HEADER_UPLOAD_OFFSET: &str = "Upload-Offset";
pub const HEADER_UPLOAD_LENGTH: &str = "Upload-Length";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";

/// Rounds down to [`CHUNK_ALIGNMENT`], never below one alignment unit.
pub fn align_chunk_size(size: usize) -> usize {
    (size / CHUNK_ALIGNMENT).max(1) * CHUNK_ALIGNMENT
}

/// Length of the chunk that starts at `offset`.
pub fn chunk_len(offset: u64, total: u64, chunk_size: usize) -> usize {
    total.saturating_sub(offset).min(chunk_size as u64) as usize
}

/// Headers for the offset-negotiation `HEAD` request.
pub fn head_headers(extra: &[(String, String)]) -> Vec<(String, String)> {
    let mut headers = vec![(HEADER_TUS_RESUMABLE.to_string(), TUS_VERSION.to_string())];
    headers.extend(extra.iter().cloned());
    headers
}

/// Headers for a chunk `PATCH` starting at `offset`.
pub fn patch_headers(offset: u64, extra: &[(String, String)]) -> Vec<(String, String)> {
    let mut headers = vec![
        (HEADER_TUS_RESUMABLE.to_string(), TUS_VERSION.to_string()),
        (HEADER_UPLOAD_OFFSET.to_string(), offset.to_string()),
        (HEADER_CONTENT_TYPE.to_string(), OFFSET_CONTENT_TYPE.to_string()),
    ];
    headers.extend(extra.iter().cloned());
    headers
}

/// Case-insensitive lookup of a non-negative integer header.
///
/// `Ok(None)` if absent, `Err` with the raw value if present but malformed.
pub fn parse_u64_header(headers: &[(String, String)], name: &str) -> Result<Option<u64>, String> {
    let Some((_, value)) = headers.iter().find(|(k, _)| k.eq_ignore_ascii_case(name)) else {
        return Ok(None);
    };
    value
        .trim()
        .parse::<u64>()
        .map(Some)
        .map_err(|_| format!("invalid {name} header: {value:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    #[test]
    fn align_rounds_down_with_floor() {
        assert_eq!(align_chunk_size(CHUNK_ALIGNMENT * 3 + 17), CHUNK_ALIGNMENT * 3);
        assert_eq!(align_chunk_size(1), CHUNK_ALIGNMENT);
        assert_eq!(align_chunk_size(0), CHUNK_ALIGNMENT);
    }

    #[test]
    fn chunk_len_truncates_last_chunk() {
        assert_eq!(chunk_len(0, 10, 4), 4);
        assert_eq!(chunk_len(8, 10, 4), 2);
        assert_eq!(chunk_len(10, 10, 4), 0);
        assert_eq!(chunk_len(12, 10, 4), 0);
    }

    #[test]
    fn patch_headers_carry_offset() {
        let headers = patch_headers(1024, &[h("Authorization", "Bearer t")]);
        assert!(headers.contains(&h("Tus-Resumable", "1.0.0")));
        assert!(headers.contains(&h("Upload-Offset", "1024")));
        assert!(headers.contains(&h("Content-Type", OFFSET_CONTENT_TYPE)));
        assert!(headers.contains(&h("Authorization", "Bearer t")));
    }

    #[test]
    fn head_headers_carry_version() {
        assert_eq!(head_headers(&[]), vec![h("Tus-Resumable", "1.0.0")]);
    }

    #[test]
    fn parse_header_is_case_insensitive() {
        let headers = vec![h("upload-offset", " 42 ")];
        assert_eq!(parse_u64_header(&headers, HEADER_UPLOAD_OFFSET), Ok(Some(42)));
        assert_eq!(parse_u64_header(&headers, HEADER_UPLOAD_LENGTH), Ok(None));
    }

    #[test]
    fn parse_header_rejects_garbage() {
        let headers = vec![h("Upload-Offset", "-1")];
        assert!(parse_u64_header(&headers, HEADER_UPLOAD_OFFSET).is_err());
    }
}
