//! Location string handling
//!
//! A location is an absolute, forward-slash string under [`FILE_ROOT`].
//! Folders carry a trailing `/` so that `folder + relative` is always a valid
//! location for something inside the folder.

use crate::{Error, Result};

/// Root under which every file and folder location lives.
pub const FILE_ROOT: &str = "/file/";

/// Whether a location addresses a folder.
pub fn is_folder(location: &str) -> bool {
    location.ends_with('/')
}

/// Ensure a location carries the trailing folder separator.
pub fn as_folder(location: &str) -> String {
    if is_folder(location) {
        location.to_string()
    } else {
        format!("{}/", location)
    }
}

/// Strip the trailing folder separator, if any.
pub fn trim_folder(location: &str) -> &str {
    if location == "/" {
        location
    } else {
        location.trim_end_matches('/')
    }
}

/// Last segment of a location, without the trailing separator.
pub fn file_name(location: &str) -> Option<&str> {
    let trimmed = trim_folder(location);
    match trimmed.rsplit('/').next() {
        Some("") | None => None,
        Some(name) => Some(name),
    }
}

/// Location of the folder containing `location`.
///
/// Returns `None` for [`FILE_ROOT`] and anything outside it.
pub fn parent(location: &str) -> Option<String> {
    if !location.starts_with(FILE_ROOT) || location == FILE_ROOT {
        return None;
    }
    let trimmed = trim_folder(location);
    trimmed.rfind('/').map(|idx| trimmed[..=idx].to_string())
}

/// Segments of `location` below [`FILE_ROOT`].
pub fn segments(location: &str) -> Result<Vec<&str>> {
    let rest = location
        .strip_prefix(FILE_ROOT)
        .or_else(|| (location == trim_folder(FILE_ROOT)).then_some(""))
        .ok_or_else(|| Error::invalid_location(location, "not under the file root"))?;

    let mut out = Vec::new();
    for segment in rest.split('/').filter(|s| !s.is_empty()) {
        validate_name(segment).map_err(|reason| Error::invalid_location(location, reason))?;
        out.push(segment);
    }
    Ok(out)
}

/// Append a relative path to a folder location.
///
/// `.` segments are dropped. `..` segments are rejected rather than resolved:
/// a relative path may never climb out of the folder it is joined to.
pub fn join(folder: &str, relative: &str) -> Result<String> {
    let mut joined = as_folder(folder);
    let trailing = relative.ends_with('/');
    let parts: Vec<&str> = relative
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();

    for (idx, part) in parts.iter().enumerate() {
        if *part == ".." {
            return Err(Error::invalid_location(
                format!("{}{}", joined, relative),
                "parent segments are not allowed",
            ));
        }
        joined.push_str(part);
        if idx + 1 < parts.len() || trailing {
            joined.push('/');
        }
    }
    Ok(joined)
}

/// Check that a single name is usable as a location segment.
pub fn validate_name(name: &str) -> std::result::Result<(), String> {
    if name.is_empty() {
        return Err("name is empty".to_string());
    }
    if name == "." || name == ".." {
        return Err(format!("'{}' is a reserved name", name));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(format!("'{}' contains a path separator", name));
    }
    if name.contains('\0') {
        return Err("name contains a NUL byte".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/file/top/", Some("top"))]
    #[case("/file/top/sub/file.txt", Some("file.txt"))]
    #[case("/file/", Some("file"))]
    #[case("/", None)]
    fn test_file_name(#[case] location: &str, #[case] expected: Option<&str>) {
        assert_eq!(file_name(location), expected);
    }

    #[rstest]
    #[case("/file/top/sub/file.txt", Some("/file/top/sub/"))]
    #[case("/file/top/sub/", Some("/file/top/"))]
    #[case("/file/top/", Some("/file/"))]
    #[case("/file/", None)]
    #[case("/elsewhere/x", None)]
    fn test_parent(#[case] location: &str, #[case] expected: Option<&str>) {
        assert_eq!(parent(location).as_deref(), expected);
    }

    #[test]
    fn test_join_appends_relative_path() {
        assert_eq!(join("/file/top/", "sub/file.txt").unwrap(), "/file/top/sub/file.txt");
        assert_eq!(join("/file/top", "sub/").unwrap(), "/file/top/sub/");
        assert_eq!(join("/file/top/", "./a/./b").unwrap(), "/file/top/a/b");
    }

    #[test]
    fn test_join_empty_relative_is_folder_itself() {
        assert_eq!(join("/file/top/", "").unwrap(), "/file/top/");
    }

    #[test]
    fn test_join_rejects_parent_segments() {
        let err = join("/file/top/", "../secrets.txt").unwrap_err();
        assert!(matches!(err, Error::InvalidLocation { .. }));
    }

    #[test]
    fn test_segments() {
        assert_eq!(segments("/file/a/b/c.txt").unwrap(), vec!["a", "b", "c.txt"]);
        assert!(segments("/file/").unwrap().is_empty());
        assert!(segments("/file").unwrap().is_empty());
        assert!(segments("/other/a").is_err());
        assert!(segments("/file/a/../b").is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("project.json").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("..").is_err());
        assert!(validate_name("a/b").is_err());
    }
}
