//! Listing line decoder.
//!
//! A listing line is `<hex identifier><space><repository-relative path>`,
//! the shape `git rev-list --objects` prints for blobs. The identifier has a
//! fixed width so it is split off by length and validated before anything
//! else is looked at; the path is then reduced to its base name.

use gawsh_types::{ContentId, ObjectRecord, TypeError};

use crate::error::MalformedReason;

/// Separator between the identifier and the path.
const SEPARATOR: char = ' ';

/// Decode one listing line (without its newline) into a record.
pub fn parse_record(line: &str, oid_length: usize) -> Result<ObjectRecord, MalformedReason> {
    let minimum = oid_length + SEPARATOR.len_utf8();
    if line.len() < minimum {
        return Err(MalformedReason::TooShort {
            minimum,
            actual: line.len(),
        });
    }

    // A multi-byte character straddling the identifier boundary means the
    // prefix cannot be hex.
    let Some((id_text, rest)) = line.split_at_checked(oid_length) else {
        return Err(first_non_hex(line, oid_length).into());
    };
    let id = ContentId::parse(id_text, oid_length)?;

    let mut rest = rest.chars();
    match rest.next() {
        Some(SEPARATOR) => {}
        Some(found) => return Err(MalformedReason::MissingSeparator { found }),
        None => return Err(MalformedReason::EmptyFilename),
    }

    let filename = basename(rest.as_str());
    if filename.is_empty() {
        return Err(MalformedReason::EmptyFilename);
    }
    ObjectRecord::new(id, filename).map_err(MalformedReason::from)
}

/// Last `/`-separated segment of a repository-relative path.
///
/// Git always uses `/` in listings, whatever the host platform.
pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn first_non_hex(line: &str, oid_length: usize) -> TypeError {
    line.char_indices()
        .take_while(|(offset, _)| *offset < oid_length)
        .find(|(_, c)| !c.is_ascii_hexdigit())
        .map(|(offset, found)| TypeError::InvalidHex { offset, found })
        .unwrap_or(TypeError::InvalidLength {
            expected: oid_length,
            actual: line.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const OID: &str = "f504bdfd6fee4f3fd29c0611d95b1ae24bd6e6cd";

    #[test]
    fn parses_nested_path_to_basename() {
        let rec = parse_record(&format!("{OID} src/bin/main.rs"), 40).unwrap();
        assert_eq!(rec.id.as_str(), OID);
        assert_eq!(rec.filename, "main.rs");
    }

    #[test]
    fn parses_top_level_path() {
        let rec = parse_record(&format!("{OID} README.md"), 40).unwrap();
        assert_eq!(rec.filename, "README.md");
    }

    #[test]
    fn keeps_spaces_inside_filename() {
        let rec = parse_record(&format!("{OID} docs/release notes.txt"), 40).unwrap();
        assert_eq!(rec.filename, "release notes.txt");
    }

    #[test]
    fn second_space_belongs_to_filename() {
        let rec = parse_record(&format!("{OID}  leading"), 40).unwrap();
        assert_eq!(rec.filename, " leading");
    }

    #[test]
    fn too_short_line() {
        let err = parse_record(&OID[..20], 40).unwrap_err();
        assert_eq!(
            err,
            MalformedReason::TooShort {
                minimum: 41,
                actual: 20
            }
        );
    }

    #[test]
    fn bare_identifier_is_too_short() {
        // `git rev-list --objects` prints commits without a path
        let err = parse_record(OID, 40).unwrap_err();
        assert!(matches!(err, MalformedReason::TooShort { .. }));
    }

    #[test]
    fn empty_line_is_too_short() {
        assert!(matches!(
            parse_record("", 40),
            Err(MalformedReason::TooShort { .. })
        ));
    }

    #[test]
    fn identifier_followed_by_space_only() {
        let err = parse_record(&format!("{OID} "), 40).unwrap_err();
        assert_eq!(err, MalformedReason::EmptyFilename);
    }

    #[test]
    fn missing_separator() {
        let err = parse_record(&format!("{OID}\tfoo.c"), 40).unwrap_err();
        assert_eq!(err, MalformedReason::MissingSeparator { found: '\t' });
    }

    #[test]
    fn identifier_too_long_hits_separator_check() {
        let err = parse_record(&format!("{OID}a foo.c"), 40).unwrap_err();
        assert_eq!(err, MalformedReason::MissingSeparator { found: 'a' });
    }

    #[test]
    fn non_hex_identifier() {
        let line = format!("{}z foo.c", &OID[..39]);
        let err = parse_record(&line, 40).unwrap_err();
        assert_eq!(
            err,
            MalformedReason::BadIdentifier(TypeError::InvalidHex {
                offset: 39,
                found: 'z'
            })
        );
    }

    #[test]
    fn multibyte_char_across_boundary() {
        let line = format!("{}é foo.c", &OID[..39]);
        let err = parse_record(&line, 40).unwrap_err();
        assert_eq!(
            err,
            MalformedReason::BadIdentifier(TypeError::InvalidHex {
                offset: 39,
                found: 'é'
            })
        );
    }

    #[test]
    fn directory_path_has_empty_basename() {
        let err = parse_record(&format!("{OID} src/"), 40).unwrap_err();
        assert_eq!(err, MalformedReason::EmptyFilename);
    }

    #[test]
    fn configured_length_is_respected() {
        let oid = "b".repeat(64);
        let rec = parse_record(&format!("{oid} a/b/c.py"), 64).unwrap();
        assert_eq!(rec.id.len(), 64);
        assert_eq!(rec.filename, "c.py");
    }

    #[test]
    fn basename_cases() {
        assert_eq!(basename("foo.c"), "foo.c");
        assert_eq!(basename("a/b/foo.c"), "foo.c");
        assert_eq!(basename("a/"), "");
    }

    proptest! {
        #[test]
        fn basename_ignores_leading_directories(
            oid in "[0-9a-f]{40}",
            dirs in proptest::collection::vec("[A-Za-z0-9_. -]{1,12}", 0..6),
            name in "[A-Za-z0-9_.-]{1,24}",
        ) {
            let mut path = dirs.join("/");
            if !path.is_empty() {
                path.push('/');
            }
            path.push_str(&name);

            let rec = parse_record(&format!("{oid} {path}"), 40).unwrap();
            prop_assert_eq!(rec.id.as_str(), oid.as_str());
            prop_assert_eq!(rec.filename, name);
        }

        #[test]
        fn short_lines_never_parse(line in "[0-9a-f ]{0,40}") {
            let is_too_short = matches!(
                parse_record(&line, 40),
                Err(MalformedReason::TooShort { .. })
            );
            prop_assert!(is_too_short);
        }
    }
}
