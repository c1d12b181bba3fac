//! Directory listing resolution for Apache-style index pages.

use reqwest::Url;

const RASTER_EXTENSIONS: &[&str] = &[".grib2", ".grb2", ".tif", ".tiff", ".png"];

/// Extract raster file links from an index page, most recent first.
///
/// Links whose file name contains `latest` sort first. The rest sort by
/// file name descending, which is newest first for MRMS names embedding
/// `YYYYMMDD-HHMMSS`. Equal names keep document order.
pub fn candidate_links(html: &str, base: &Url) -> Vec<Url> {
    let base = directory_url(base);

    let mut links: Vec<(String, Url)> = Vec::new();
    for href in extract_hrefs(html) {
        if !is_raster_file(href) {
            continue;
        }
        let Some(url) = resolve(&base, href) else {
            continue;
        };
        if links.iter().any(|(_, seen)| *seen == url) {
            continue;
        }
        let name = file_name(&url).to_string();
        links.push((name, url));
    }

    // Stable sort keeps document order for ties
    links.sort_by(|(a, _), (b, _)| {
        let a_latest = a.to_ascii_lowercase().contains("latest");
        let b_latest = b.to_ascii_lowercase().contains("latest");
        b_latest.cmp(&a_latest).then_with(|| b.cmp(a))
    });

    links.into_iter().map(|(_, url)| url).collect()
}

/// All double-quoted `href` attribute values, in document order.
fn extract_hrefs(html: &str) -> Vec<&str> {
    let lower = html.to_ascii_lowercase();
    let mut hrefs = Vec::new();
    let mut pos = 0;

    while let Some(found) = lower[pos..].find("href") {
        let mut i = pos + found + 4;
        pos = i;

        i = skip_whitespace(&lower, i);
        if !lower[i..].starts_with('=') {
            continue;
        }
        i = skip_whitespace(&lower, i + 1);
        if !lower[i..].starts_with('"') {
            continue;
        }
        let start = i + 1;
        let Some(len) = html[start..].find('"') else {
            break;
        };
        if len > 0 {
            hrefs.push(&html[start..start + len]);
        }
        pos = start + len + 1;
    }

    hrefs
}

fn skip_whitespace(s: &str, mut i: usize) -> usize {
    while s[i..].starts_with(|c: char| c.is_ascii_whitespace()) {
        i += 1;
    }
    i
}

/// Files only: no parent/directory links, no sort links, raster extension
/// with optional `.gz`.
fn is_raster_file(href: &str) -> bool {
    if href.starts_with('?') || href.starts_with('#') || href.ends_with('/') {
        return false;
    }
    if href.contains("Parent Directory") || href.starts_with("..") {
        return false;
    }

    let path = href.split(['?', '#']).next().unwrap_or(href);
    let lower = path.to_ascii_lowercase();
    let stem = lower.strip_suffix(".gz").unwrap_or(&lower);
    RASTER_EXTENSIONS.iter().any(|ext| stem.ends_with(ext))
}

/// Relative links resolve inside the listed directory, even when they
/// start with `/`.
fn resolve(base: &Url, href: &str) -> Option<Url> {
    let lower = href.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return Url::parse(href).ok();
    }
    base.join(href.trim_start_matches('/')).ok()
}

fn directory_url(base: &Url) -> Url {
    let mut dir = base.clone();
    if !dir.path().ends_with('/') {
        let path = format!("{}/", dir.path());
        dir.set_path(&path);
    }
    dir.set_query(None);
    dir.set_fragment(None);
    dir
}

fn file_name(url: &Url) -> &str {
    url.path().rsplit('/').next().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://mrms.ncep.noaa.gov/2D/ALASKA/BREF_1HR_MAX/").unwrap()
    }

    #[test]
    fn test_extract_hrefs_tolerates_spacing_and_case() {
        let html = r#"<A HREF = "a.tif">a</A><a href="b.png">b</a><a href=''>c</a>"#;
        assert_eq!(extract_hrefs(html), vec!["a.tif", "b.png"]);
    }

    #[test]
    fn test_is_raster_file() {
        assert!(is_raster_file("x.grib2.gz"));
        assert!(is_raster_file("X.TIF"));
        assert!(is_raster_file("x.grb2"));
        assert!(!is_raster_file("x.txt"));
        assert!(!is_raster_file("archive/"));
        assert!(!is_raster_file("?C=M;O=A"));
        assert!(!is_raster_file("../"));
        assert!(!is_raster_file("x.gz"));
    }

    #[test]
    fn test_base_without_trailing_slash() {
        let base = Url::parse("https://example.com/data").unwrap();
        let links = candidate_links(r#"<a href="a.tif">a</a>"#, &base);
        assert_eq!(links[0].as_str(), "https://example.com/data/a.tif");
    }

    #[test]
    fn test_leading_slash_stays_in_directory() {
        let links = candidate_links(r#"<a href="/a.tif">a</a>"#, &base());
        assert_eq!(
            links[0].as_str(),
            "https://mrms.ncep.noaa.gov/2D/ALASKA/BREF_1HR_MAX/a.tif"
        );
    }

    #[test]
    fn test_absolute_links_kept() {
        let html = r#"<a href="https://other.example.com/x/b.png">b</a>"#;
        let links = candidate_links(html, &base());
        assert_eq!(links[0].as_str(), "https://other.example.com/x/b.png");
    }

    #[test]
    fn test_duplicates_removed() {
        let html = r#"<a href="a.tif">a</a><a href="a.tif">a again</a>"#;
        assert_eq!(candidate_links(html, &base()).len(), 1);
    }
}
