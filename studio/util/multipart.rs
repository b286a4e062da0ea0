/// Minimal `multipart/form-data` parsing for the prediction form.

/// Returns the index of the first occurrence of `needle` in `haystack`.
pub fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Splits `haystack` on every occurrence of `needle`, returning the pieces
/// between occurrences (excluding the needle itself).
pub fn split_on<'a>(haystack: &'a [u8], needle: &[u8]) -> Vec<&'a [u8]> {
    let mut result = Vec::new();
    let mut start = 0;
    while start <= haystack.len() {
        if let Some(pos) = find_subsequence(&haystack[start..], needle) {
            result.push(&haystack[start..start + pos]);
            start += pos + needle.len();
        } else {
            result.push(&haystack[start..]);
            break;
        }
    }
    result
}

/// Extracts the boundary token from a Content-Type header value like
/// `multipart/form-data; boundary=----WebKitFormBoundaryXXX`.
pub fn extract_boundary(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .map(|s| s.trim())
        .find(|s| s.starts_with("boundary="))
        .map(|s| s["boundary=".len()..].trim_matches('"').to_owned())
        .filter(|b| !b.is_empty())
}

/// One part of a multipart body.
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    pub name: String,
    /// Set for file inputs, even when the browser sent an empty name.
    pub filename: Option<String>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    parts: Vec<Part>,
}

impl MultipartForm {
    pub fn parse(body: &[u8], boundary: &str) -> MultipartForm {
        let delimiter = format!("--{}", boundary);
        let sep = b"\r\n\r\n";
        let mut parts = Vec::new();

        for chunk in split_on(body, delimiter.as_bytes()) {
            let Some(sep_pos) = find_subsequence(chunk, sep) else { continue };
            let headers = String::from_utf8_lossy(&chunk[..sep_pos]);
            let Some(name) = disposition_param(&headers, "name") else { continue };
            let filename = disposition_param(&headers, "filename");
            let raw = &chunk[sep_pos + sep.len()..];
            let data = raw.strip_suffix(b"\r\n").unwrap_or(raw).to_vec();
            parts.push(Part { name, filename, data });
        }
        MultipartForm { parts }
    }

    /// Bytes of an uploaded file; `None` when no file was chosen.
    pub fn file(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|p| p.name == name && p.filename.is_some())
            .map(|p| p.data.as_slice())
            .filter(|d| !d.is_empty())
    }
}

/// Reads `key="..."` from a Content-Disposition header block.
fn disposition_param(headers: &str, key: &str) -> Option<String> {
    let needle = format!("{}=\"", key);
    let mut search = 0;
    while let Some(found) = headers[search..].find(&needle) {
        let pos = search + found;
        // `name=` also matches inside `filename=`.
        let standalone = pos == 0 || matches!(headers.as_bytes()[pos - 1], b' ' | b';');
        let rest = &headers[pos + needle.len()..];
        if standalone {
            let end = rest.find('"')?;
            return Some(rest[..end].to_owned());
        }
        search = pos + needle.len();
    }
    None
}
