//! Common test fixtures for radar overlay tests.

/// Bounds as (south, west, north, east).
pub mod bounds {
    pub const ALASKA: (f64, f64, f64, f64) = (54.0, -180.0, 72.0, -130.0);
    pub const CONUS: (f64, f64, f64, f64) = (20.0, -130.0, 55.0, -60.0);
}

/// Apache-style directory listing, as served by the MRMS mirror.
pub const MRMS_LISTING_HTML: &str = r#"<html>
<head><title>Index of /2D/ALASKA/BREF_1HR_MAX</title></head>
<body>
<h1>Index of /2D/ALASKA/BREF_1HR_MAX</h1>
<pre><a href="?C=N;O=D">Name</a> <a href="?C=M;O=A">Last modified</a>
<a href="/2D/ALASKA/">Parent Directory</a>
<a href="archive/">archive/</a>
<a href="MRMS_BREF_1HR_MAX_00.50_20240115-120000.grib2.gz">MRMS_BREF_1HR_MAX_00.50_20240115-120000.grib2.gz</a>
<a href="MRMS_BREF_1HR_MAX_00.50_20240115-120200.grib2.gz">MRMS_BREF_1HR_MAX_00.50_20240115-120200.grib2.gz</a>
<a href="MRMS_BREF_1HR_MAX.latest.grib2.gz">MRMS_BREF_1HR_MAX.latest.grib2.gz</a>
<a href="README.txt">README.txt</a>
</pre>
</body>
</html>"#;

/// A style file holding one short three-stop ramp named "simple".
pub const SIMPLE_STYLE_JSON: &str = r##"{
  "version": "1.0",
  "styles": {
    "simple": {
      "name": "Simple",
      "description": "Three stop test ramp",
      "stops": [
        { "value": 10.0, "color": "#0000ff" },
        { "value": 30.0, "color": "#00ff00" },
        { "value": 50.0, "color": "#ff0000" }
      ]
    }
  }
}"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_has_latest() {
        assert!(MRMS_LISTING_HTML.contains(".latest.grib2.gz"));
    }
}
