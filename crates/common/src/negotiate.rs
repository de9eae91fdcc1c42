//! Response format negotiation shared by every service.
//!
//! A client gets JSON when its `Accept` header names `application/json` or the
//! `format` query parameter is `json`; everybody else gets HTML. Query parsing
//! is left to the HTTP layer, which hands over the decoded parameter.

/// Output representation chosen for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Html,
    Json,
}

impl Format {
    pub fn negotiate(accept: Option<&str>, format_param: Option<&str>) -> Self {
        let requested = format_param.map(|f| f.trim().eq_ignore_ascii_case("json")).unwrap_or(false);
        if requested || accept_prefers_json(accept) {
            Format::Json
        } else {
            Format::Html
        }
    }

    pub fn is_json(self) -> bool {
        matches!(self, Format::Json)
    }
}

fn accept_prefers_json(accept: Option<&str>) -> bool {
    accept
        .map(|h| {
            h.split(',')
                .map(|part| part.split(';').next().unwrap_or("").trim())
                .any(|media| media.eq_ignore_ascii_case("application/json"))
        })
        .unwrap_or(false)
}
