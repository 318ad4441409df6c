//! `multipart/form-data` encoding for image-bearing requests.

use bytes::{BufMut, Bytes, BytesMut};
use uuid::Uuid;

/// An in-memory form. `finish` yields the content type (with boundary) and
/// the encoded body.
#[derive(Debug, Clone)]
pub struct MultipartForm {
    boundary: String,
    body: BytesMut,
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::with_boundary(format!("Boundary-{}", Uuid::new_v4()))
    }

    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            body: BytesMut::new(),
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Add a non-file part with an explicit content type.
    pub fn part(mut self, name: &str, content_type: &str, data: &[u8]) -> Self {
        let name = escape_quoted(name);
        self.open_part(&format!("form-data; name=\"{name}\""), content_type);
        self.body.put_slice(data);
        self.body.put_slice(b"\r\n");
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, data: &[u8]) -> Self {
        let (name, file_name) = (escape_quoted(name), escape_quoted(file_name));
        self.open_part(
            &format!("form-data; name=\"{name}\"; filename=\"{file_name}\""),
            content_type,
        );
        self.body.put_slice(data);
        self.body.put_slice(b"\r\n");
        self
    }

    pub fn finish(mut self) -> (String, Bytes) {
        self.body
            .put_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        (
            format!("multipart/form-data; boundary={}", self.boundary),
            self.body.freeze(),
        )
    }

    fn open_part(&mut self, disposition: &str, content_type: &str) {
        let head = format!(
            "--{}\r\nContent-Disposition: {disposition}\r\nContent-Type: {content_type}\r\n\r\n",
            self.boundary
        );
        self.body.put_slice(head.as_bytes());
    }
}

/// Percent-encode the characters that would end a quoted `Content-Disposition`
/// parameter or start a new header line, as browsers do for form-data names.
fn escape_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => out.push_str("%22"),
            '\r' => out.push_str("%0D"),
            '\n' => out.push_str("%0A"),
            c => out.push(c),
        }
    }
    out
}
