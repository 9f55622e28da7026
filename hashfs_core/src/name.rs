//! Hashed file name layout.
//!
//! A hashed name carries the digest token as an extra dot-suffix in front of
//! the real extension: `css/main.css` becomes `css/main.<digest>.css`. A name
//! without an extension gets the token appended: `LICENSE` becomes
//! `LICENSE.<digest>`.

/// Returns the extension of the last path element, including its dot.
///
/// Empty when the last element has no dot. Only the final element is
/// considered, so `a.b/c` has no extension.
pub fn extension(path: &str) -> &str {
    for (i, c) in path.char_indices().rev() {
        match c {
            '.' => return &path[i..],
            '/' => break,
            _ => {}
        }
    }
    ""
}

/// Builds the hashed name for `plain` carrying the hex `digest` token.
pub fn hashed_path(plain: &str, digest: &str) -> String {
    let ext = extension(plain);
    let stem = &plain[..plain.len() - ext.len()];
    format!("{stem}.{digest}{ext}")
}

/// Splits a requested hashed name into the plain path it refers to and the
/// digest text it carries.
///
/// Returns `None` when the name has no dot-suffix at all. When the name has a
/// single dot-suffix, that suffix is taken to be the digest of an
/// extensionless file. The digest text is not checked here.
pub fn parse_hashed_path(requested: &str) -> Option<(String, &str)> {
    let ext = extension(requested);
    if ext.is_empty() {
        return None;
    }
    let rest = &requested[..requested.len() - ext.len()];
    let digest_ext = extension(rest);
    if digest_ext.is_empty() {
        return Some((rest.to_string(), &ext[1..]));
    }
    let stem = &rest[..rest.len() - digest_ext.len()];
    Some((format!("{stem}{ext}"), &digest_ext[1..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension() {
        assert_eq!(extension("main.css"), ".css");
        assert_eq!(extension("fonts/Inter.woff2"), ".woff2");
        assert_eq!(extension("archive.tar.gz"), ".gz");
        assert_eq!(extension("testdata/noext"), "");
        assert_eq!(extension("v1.2/readme"), "");
        assert_eq!(extension(".profile"), ".profile");
        assert_eq!(extension("trailing."), ".");
        assert_eq!(extension(""), "");
    }

    #[test]
    fn test_hashed_path() {
        assert_eq!(hashed_path("main.css", "a1b2c3d4"), "main.a1b2c3d4.css");
        assert_eq!(
            hashed_path("fonts/Inter-Bold.woff2", "deadbeef"),
            "fonts/Inter-Bold.deadbeef.woff2"
        );
        assert_eq!(hashed_path("archive.tar.gz", "beef"), "archive.tar.beef.gz");
        assert_eq!(hashed_path("testdata/noext", "abcd"), "testdata/noext.abcd");
        assert_eq!(hashed_path("v1.2/readme", "abcd"), "v1.2/readme.abcd");
    }

    #[test]
    fn test_parse_with_extension() {
        assert_eq!(
            parse_hashed_path("testdata/base.d476fb7b.ext"),
            Some(("testdata/base.ext".to_string(), "d476fb7b"))
        );
        assert_eq!(
            parse_hashed_path("archive.tar.beef.gz"),
            Some(("archive.tar.gz".to_string(), "beef"))
        );
    }

    #[test]
    fn test_parse_digest_only_suffix() {
        assert_eq!(
            parse_hashed_path("testdata/noext.d9d4e730"),
            Some(("testdata/noext".to_string(), "d9d4e730"))
        );
        // A plain name with one extension is read as an extensionless file
        // whose digest is the extension.
        assert_eq!(
            parse_hashed_path("testdata/base.ext"),
            Some(("testdata/base".to_string(), "ext"))
        );
    }

    #[test]
    fn test_parse_without_suffix() {
        assert_eq!(parse_hashed_path("testdata/noext"), None);
        assert_eq!(parse_hashed_path("v1.2/readme"), None);
        assert_eq!(parse_hashed_path(""), None);
    }

    #[test]
    fn test_parse_inverts_hashed_path() {
        for plain in ["a/b.c", "a/b", "x.tar.gz", "dir.d/file"] {
            let hashed = hashed_path(plain, "0123abcd");
            assert_eq!(
                parse_hashed_path(&hashed),
                Some((plain.to_string(), "0123abcd")),
                "{hashed}"
            );
        }
    }
}
