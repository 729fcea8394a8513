//! Account name rules.
//!
//! Names are up to 12 characters from `.12345a-z` and may not end in a dot.
//! Everything after the last dot is the suffix; a name without dots is its
//! own suffix (a top-level name).

pub const MAX_NAME_LEN: usize = 12;

const NAME_CHARSET: &[u8] = b".12345abcdefghijklmnopqrstuvwxyz";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NameClass {
    /// Top-level and shorter than 12 characters: only obtainable by auction
    Premium,
    /// Top-level with exactly 12 characters: free for anyone
    Regular,
    /// Contains a dot: only the owner of the suffix may create it
    Dotted,
}

pub fn is_valid_name(name: &[u8]) -> bool {
    !name.is_empty()
        && name.len() <= MAX_NAME_LEN
        && name.last() != Some(&b'.')
        && name.iter().all(|c| NAME_CHARSET.contains(c))
}

pub fn has_dot(name: &[u8]) -> bool {
    name.contains(&b'.')
}

/// Returns the part after the last dot, or the whole name.
pub fn suffix(name: &[u8]) -> &[u8] {
    match name.iter().rposition(|c| *c == b'.') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

pub fn classify(name: &[u8]) -> Option<NameClass> {
    if !is_valid_name(name) {
        return None;
    }
    let class = if has_dot(name) {
        NameClass::Dotted
    } else if name.len() < MAX_NAME_LEN {
        NameClass::Premium
    } else {
        NameClass::Regular
    };
    Some(class)
}
