use native_system::names::{classify, has_dot, is_valid_name, suffix, NameClass};

#[test]
fn test_valid_names() {
    assert!(is_valid_name(b"a"));
    assert!(is_valid_name(b"abcd"));
    assert!(is_valid_name(b"user.name"));
    assert!(is_valid_name(b"abcdefghij12"));

    assert!(!is_valid_name(b""));
    assert!(!is_valid_name(b"abcdefghij123"));
    assert!(!is_valid_name(b"trailing."));
    assert!(!is_valid_name(b"Upper"));
    assert!(!is_valid_name(b"zero0"));
    assert!(!is_valid_name(b"six6"));
}

#[test]
fn test_suffix() {
    assert_eq!(suffix(b"alice"), b"alice");
    assert_eq!(suffix(b"alice.bob"), b"bob");
    assert_eq!(suffix(b"a.b.com"), b"com");
    assert!(has_dot(b"a.b"));
    assert!(!has_dot(b"ab"));
}

#[test]
fn test_classify() {
    assert_eq!(classify(b"abcd"), Some(NameClass::Premium));
    assert_eq!(classify(b"abcdefghijk"), Some(NameClass::Premium));
    assert_eq!(classify(b"abcdefghijkl"), Some(NameClass::Regular));
    assert_eq!(classify(b"alice.bob"), Some(NameClass::Dotted));
    assert_eq!(classify(b"b."), None);
    assert_eq!(classify(b"abcdefghijklm"), None);
}
