//! URL normalization for candidate identity.
//!
//! Two candidates are the same item when their normalized source URLs are
//! equal. Normalization is deliberately conservative: it only removes
//! differences that never change the addressed resource.

use ::url::Url;

const ARXIV_HOSTS: [&str; 2] = ["arxiv.org", "export.arxiv.org"];

/// Normalize a URL into a stable identity key.
///
/// - scheme and host lowercased, `http` upgraded to `https`
/// - leading `www.` removed from the host
/// - fragment and trailing slash dropped
/// - arXiv `/pdf/ID[.pdf]` and versioned `/abs/IDvN` collapse to `/abs/ID`
///
/// Input that does not parse as an absolute URL is trimmed and lowercased.
#[must_use]
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    let Ok(mut parsed) = Url::parse(trimmed) else {
        return trimmed.to_lowercase();
    };

    if parsed.scheme() == "http" && parsed.set_scheme("https").is_err() {
        return trimmed.to_lowercase();
    }

    if let Some(bare) = parsed
        .host_str()
        .and_then(|host| host.strip_prefix("www."))
        .map(str::to_owned)
    {
        if parsed.set_host(Some(&bare)).is_err() {
            return trimmed.to_lowercase();
        }
    }

    parsed.set_fragment(None);

    let is_arxiv = parsed
        .host_str()
        .is_some_and(|host| ARXIV_HOSTS.contains(&host));
    if is_arxiv {
        if let Some(path) = arxiv_abs_path(parsed.path()) {
            parsed.set_path(&path);
        }
        if parsed.set_host(Some("arxiv.org")).is_err() {
            return trimmed.to_lowercase();
        }
    }

    let path = parsed.path().to_string();
    if path.len() > 1 && path.ends_with('/') {
        parsed.set_path(path.trim_end_matches('/'));
    }

    let mut out = parsed.to_string();
    if parsed.query().is_none() && out.ends_with('/') {
        out.pop();
    }
    out
}

/// Map an arXiv paper path to its canonical, unversioned `/abs/` form.
fn arxiv_abs_path(path: &str) -> Option<String> {
    let rest = path
        .strip_prefix("/pdf/")
        .or_else(|| path.strip_prefix("/abs/"))?;
    let id = rest.trim_end_matches('/').trim_end_matches(".pdf");
    if id.is_empty() {
        return None;
    }
    Some(format!("/abs/{}", strip_arxiv_version(id)))
}

fn strip_arxiv_version(id: &str) -> &str {
    match id.rfind('v') {
        Some(pos)
            if pos > 0
                && pos + 1 < id.len()
                && id[pos + 1..].bytes().all(|b| b.is_ascii_digit()) =>
        {
            &id[..pos]
        }
        _ => id,
    }
}
