//! Minimal `multipart/form-data` encoding for the config upload.

const BASE_BOUNDARY: &str = "conveyor-config-boundary";

/// An encoded multipart body and the `Content-Type` header that goes with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartBody {
    pub content_type: String,
    pub body: Vec<u8>,
}

/// Encode a single form part named `name` holding `content`.
pub fn single_part(name: &str, part_content_type: &str, content: &str) -> MultipartBody {
    let mut boundary = BASE_BOUNDARY.to_string();
    while content.contains(&boundary) {
        boundary.push('-');
    }

    let mut body = String::with_capacity(content.len() + 256);
    body.push_str(&format!("--{boundary}\r\n"));
    body.push_str(&format!(
        "Content-Disposition: form-data; name=\"{name}\"\r\n"
    ));
    body.push_str(&format!("Content-Type: {part_content_type}\r\n\r\n"));
    body.push_str(content);
    body.push_str(&format!("\r\n--{boundary}--\r\n"));

    MultipartBody {
        content_type: format!("multipart/form-data; boundary={boundary}"),
        body: body.into_bytes(),
    }
}
