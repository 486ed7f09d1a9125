/// Turn a user supplied name into something safe to use as a file stem.
///
/// Every character outside `[A-Za-z0-9]` becomes `_` and the result is
/// lower-cased, so `"My Setup!"` maps to `"my_setup_"`.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("Node Setup"), "node_setup");
        assert_eq!(sanitize_name("../etc/passwd"), "___etc_passwd");
        assert_eq!(sanitize_name("ABC123"), "abc123");
        assert_eq!(sanitize_name("示例"), "__");
        assert_eq!(sanitize_name(""), "");
    }
}
