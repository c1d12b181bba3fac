//! Directory listing resolution tests.

use radar_overlay::candidate_links;
use reqwest::Url;
use test_utils::MRMS_LISTING_HTML;

fn base() -> Url {
    Url::parse("https://mrms.ncep.noaa.gov/2D/ALASKA/BREF_1HR_MAX/").unwrap()
}

fn names(links: &[Url]) -> Vec<&str> {
    links
        .iter()
        .map(|u| u.path().rsplit('/').next().unwrap())
        .collect()
}

#[test]
fn test_mrms_listing_order() {
    let links = candidate_links(MRMS_LISTING_HTML, &base());

    assert_eq!(
        names(&links),
        vec![
            "MRMS_BREF_1HR_MAX.latest.grib2.gz",
            "MRMS_BREF_1HR_MAX_00.50_20240115-120200.grib2.gz",
            "MRMS_BREF_1HR_MAX_00.50_20240115-120000.grib2.gz",
        ]
    );
    assert_eq!(
        links[0].as_str(),
        "https://mrms.ncep.noaa.gov/2D/ALASKA/BREF_1HR_MAX/MRMS_BREF_1HR_MAX.latest.grib2.gz"
    );
}

#[test]
fn test_excludes_parent_directories_and_sort_links() {
    let links = candidate_links(MRMS_LISTING_HTML, &base());

    for link in &links {
        assert!(!link.path().ends_with('/'));
        assert!(link.query().is_none());
        assert!(!link.path().ends_with("README.txt"));
    }
}

#[test]
fn test_equal_names_keep_document_order() {
    let html = r#"
        <a href="b/x.tif">b</a>
        <a href="a/x.tif">a</a>
    "#;
    let links = candidate_links(html, &base());

    assert_eq!(links.len(), 2);
    assert!(links[0].path().ends_with("/b/x.tif"));
    assert!(links[1].path().ends_with("/a/x.tif"));
}

#[test]
fn test_no_candidates() {
    let html = r#"<a href="../">Parent Directory</a><a href="notes.txt">notes</a>"#;
    assert!(candidate_links(html, &base()).is_empty());
}

#[test]
fn test_mixed_extensions_accepted() {
    let html = r#"
        <a href="a.tif">a</a>
        <a href="b.TIFF">b</a>
        <a href="c.grb2">c</a>
        <a href="d.png.gz">d</a>
        <a href="e.zip">e</a>
    "#;
    assert_eq!(candidate_links(html, &base()).len(), 4);
}
