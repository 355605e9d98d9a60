//! Query-string helpers for redirect URLs.

/// Query parameter carrying a server message on redirects.
pub const MESSAGE_PARAM: &str = "message";

fn param_name(pair: &str) -> &str {
    pair.split_once('=').map_or(pair, |(name, _)| name)
}

fn join(path: &str, pairs: &[String]) -> String {
    if pairs.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{}", pairs.join("&"))
    }
}

/// Removes `message=` parameters from `link`.
///
/// Returns the cleaned link and the URL-decoded messages in query order.
pub fn check_message_in_url(link: &str) -> (String, Vec<String>) {
    let Some((path, query)) = link.split_once('?') else {
        return (link.to_string(), Vec::new());
    };
    let mut messages = Vec::new();
    let mut kept = Vec::new();
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        match pair.split_once('=') {
            Some((MESSAGE_PARAM, raw)) => {
                let decoded = urlencoding::decode(raw)
                    .map_or_else(|_| raw.to_string(), std::borrow::Cow::into_owned);
                messages.push(decoded);
            }
            _ => kept.push(pair.to_string()),
        }
    }
    (join(path, &kept), messages)
}

/// Sets `name=value` pairs on `link`.
///
/// A parameter already present is replaced in place; the rest are appended in
/// the given order. Empty entries are ignored.
pub fn add_param_to_url(link: &str, params: &[&str]) -> String {
    let (path, query) = link.split_once('?').unwrap_or((link, ""));
    let mut pairs: Vec<String> = query
        .split('&')
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();

    for param in params.iter().filter(|p| !p.is_empty()) {
        let name = param_name(param);
        match pairs.iter_mut().find(|p| param_name(p) == name) {
            Some(existing) => *existing = (*param).to_string(),
            None => pairs.push((*param).to_string()),
        }
    }
    join(path, &pairs)
}
