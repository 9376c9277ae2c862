//! Entry-name screening for names that are unsafe on some operating system.
//!
//! These checks run before path resolution. They reject names that a
//! particular platform would reinterpret (backslashes and look-alike slashes
//! become separators on Windows, device names open devices, trailing dots
//! are silently stripped), which the lexical root check alone cannot see.

use std::fmt;

/// Characters Windows refuses in file names.
const RESERVED_CHARS: [char; 7] = ['<', '>', ':', '"', '|', '?', '*'];

/// Characters that best-fit code page mapping can turn into separators.
const SEPARATOR_LOOKALIKES: [char; 6] = [
    '\u{2044}', // fraction slash
    '\u{2215}', // division slash
    '\u{29F8}', // big solidus
    '\u{29F9}', // big reverse solidus
    '\u{FF0F}', // fullwidth solidus
    '\u{FF3C}', // fullwidth reverse solidus
];

/// DOS device names, reserved with or without an extension.
const RESERVED_NAMES: [&str; 22] = [
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Why an entry was refused by the path guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnsafeReason {
    /// Entry name is empty.
    Empty,
    /// Entry name contains a control character (including NUL).
    ControlCharacter,
    /// Entry name contains `\` or a character that maps to a separator.
    SeparatorEquivalent(char),
    /// Entry name contains a character Windows forbids.
    ReservedCharacter(char),
    /// A path component is a reserved device name.
    ReservedName(String),
    /// A path component ends in `.` or a space.
    TrailingDotOrSpace(String),
    /// Entry name is an absolute path outside the root.
    AbsolutePath,
    /// Entry resolves outside the extraction root.
    EscapesRoot,
    /// Entry resolves to the extraction root itself.
    IsRoot,
    /// Entry is a symbolic link.
    Symlink,
    /// A directory on the entry's path inside the root is a symbolic link.
    LinkedAncestor,
}

impl fmt::Display for UnsafeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty entry name"),
            Self::ControlCharacter => write!(f, "control character in entry name"),
            Self::SeparatorEquivalent(c) => {
                write!(f, "separator-equivalent character {c:?} in entry name")
            }
            Self::ReservedCharacter(c) => write!(f, "reserved character {c:?} in entry name"),
            Self::ReservedName(name) => write!(f, "reserved device name {name:?}"),
            Self::TrailingDotOrSpace(name) => {
                write!(f, "component {name:?} ends with a dot or space")
            }
            Self::AbsolutePath => write!(f, "absolute path outside extraction root"),
            Self::EscapesRoot => write!(f, "resolves outside extraction root"),
            Self::IsRoot => write!(f, "resolves to the extraction root"),
            Self::Symlink => write!(f, "symbolic links are not extracted"),
            Self::LinkedAncestor => write!(f, "path passes through a symbolic link"),
        }
    }
}

impl std::error::Error for UnsafeReason {}

/// Screens a raw entry name as stored in the archive.
///
/// `..` and `.` components are allowed here; whether they escape is decided
/// by resolution against the root.
///
/// # Examples
///
/// ```
/// use sealpack_core::security::names::UnsafeReason;
/// use sealpack_core::security::names::check_entry_name;
///
/// assert!(check_entry_name("docs/readme.txt").is_ok());
/// assert!(check_entry_name("a/../b.txt").is_ok());
/// assert_eq!(
///     check_entry_name("evil\\..\\x"),
///     Err(UnsafeReason::SeparatorEquivalent('\\'))
/// );
/// assert!(check_entry_name("logs/CON.txt").is_err());
/// ```
pub fn check_entry_name(name: &str) -> Result<(), UnsafeReason> {
    if name.is_empty() {
        return Err(UnsafeReason::Empty);
    }

    for c in name.chars() {
        if c.is_control() {
            return Err(UnsafeReason::ControlCharacter);
        }
        if c == '\\' || SEPARATOR_LOOKALIKES.contains(&c) {
            return Err(UnsafeReason::SeparatorEquivalent(c));
        }
        if RESERVED_CHARS.contains(&c) {
            return Err(UnsafeReason::ReservedCharacter(c));
        }
    }

    for component in name.split('/') {
        if matches!(component, "" | "." | "..") {
            continue;
        }
        if is_reserved_device_name(component) {
            return Err(UnsafeReason::ReservedName(component.to_string()));
        }
        if component.ends_with('.') || component.ends_with(' ') {
            return Err(UnsafeReason::TrailingDotOrSpace(component.to_string()));
        }
    }

    Ok(())
}

fn is_reserved_device_name(component: &str) -> bool {
    let stem = component.split('.').next().unwrap_or(component).trim_end();
    RESERVED_NAMES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(stem))
}
