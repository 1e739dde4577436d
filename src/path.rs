//! Path normalization
//!
//! Maps whatever the browser or a link hands us (`/about.html`, `/church/index`,
//! `/marketplace/`) to the canonical key used by the route table.

const HTML_SUFFIX: &str = ".html";
const INDEX_SUFFIX: &str = "/index";

/// Normalize a raw URL path into its canonical route key.
///
/// One pass applies, in order: strip a trailing `.html`, collapse a trailing
/// `/index` to `/`, strip one trailing `/`, and map the empty string to `/`.
/// Passes repeat until the path stops changing, so the function is idempotent
/// for every input, including stacked suffixes such as `/a.html.html`.
///
/// # Example
///
/// ```
/// use portal_navigator::path::normalize;
///
/// assert_eq!(normalize("/about.html"), "/about");
/// assert_eq!(normalize("/about/index"), "/about");
/// assert_eq!(normalize(""), "/");
/// ```
pub fn normalize(path: &str) -> String {
    let mut current = normalize_once(path);
    loop {
        let next = normalize_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn normalize_once(path: &str) -> String {
    let path = path.strip_suffix(HTML_SUFFIX).unwrap_or(path);

    let mut out = match path.strip_suffix(INDEX_SUFFIX) {
        Some(prefix) => format!("{prefix}/"),
        None => path.to_string(),
    };

    if out.ends_with('/') {
        out.pop();
    }

    if out.is_empty() {
        out.push('/');
    }
    out
}

/// Check whether `path` is already in canonical form.
pub fn is_canonical(path: &str) -> bool {
    normalize(path) == path
}
