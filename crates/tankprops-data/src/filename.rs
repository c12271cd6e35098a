//! Filename metadata parsing.
//!
//! Data filenames are dash-separated:
//!
//! - `Data-BuiltIn-<author>-<gameversion>-<revision>.csv` for the primary
//!   dataset (5 parts),
//! - `Data-<property>-<language>-<author>-<gameversion>-<revision>.csv` for
//!   a property overlay (6 parts).
//!
//! The author, game version, and revision are always the last three parts,
//! so they are read from the end.

use tankprops_core::version::GameVersion;
use thiserror::Error;

/// Why a discovered file's name was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("it has the wrong number of filename parts")]
    WrongPartCount,
    #[error("it has too many filename parts for a BuiltIn data file")]
    BuiltInExtraParts,
    #[error("it has too few filename parts for a property data file")]
    PropertyMissingParts,
    #[error("it has an empty author part in the filename")]
    EmptyAuthor,
    #[error("it has an unparseable game version part in the filename: \"{0}\"")]
    BadGameVersion(String),
    #[error("it has an unparseable revision part in the filename: \"{0}\"")]
    BadRevision(String),
    #[error("it has an empty property name part in the filename")]
    EmptyProperty,
    #[error("its language part in the filename is not a 2-letter code: \"{0}\"")]
    BadLanguage(String),
}

/// The metadata carried by a well-formed data filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedName {
    BuiltIn {
        author: String,
        game_version: GameVersion,
        revision: u32,
    },
    Property {
        property: String,
        language: String,
        author: String,
        game_version: GameVersion,
        revision: u32,
    },
}

/// Parse one `Data-*.csv` filename. The caller guarantees the `Data-` prefix
/// and `.csv` extension via its discovery pattern.
pub fn parse_file_name(name: &str) -> Result<ParsedName, SkipReason> {
    let stem = name.strip_suffix(".csv").unwrap_or(name);
    let parts: Vec<&str> = stem.split('-').collect();

    if !(5..=6).contains(&parts.len()) {
        return Err(SkipReason::WrongPartCount);
    }
    let builtin = parts[1].eq_ignore_ascii_case("BuiltIn");
    if builtin && parts.len() != 5 {
        return Err(SkipReason::BuiltInExtraParts);
    }
    if parts.len() == 5 && !builtin {
        return Err(SkipReason::PropertyMissingParts);
    }

    let author = parts[parts.len() - 3].trim();
    if author.is_empty() {
        return Err(SkipReason::EmptyAuthor);
    }
    let version_part = parts[parts.len() - 2];
    let game_version: GameVersion = version_part
        .parse()
        .map_err(|_| SkipReason::BadGameVersion(version_part.to_string()))?;
    let revision_part = parts[parts.len() - 1];
    let revision: u32 = revision_part
        .parse()
        .map_err(|_| SkipReason::BadRevision(revision_part.to_string()))?;

    if builtin {
        return Ok(ParsedName::BuiltIn {
            author: author.to_string(),
            game_version,
            revision,
        });
    }

    let property = parts[1].trim();
    if property.is_empty() {
        return Err(SkipReason::EmptyProperty);
    }
    let language = parts[2].trim();
    if language.chars().count() != 2 {
        return Err(SkipReason::BadLanguage(language.to_string()));
    }
    Ok(ParsedName::Property {
        property: property.to_string(),
        language: language.to_string(),
        author: author.to_string(),
        game_version,
        revision,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_builtin_names() {
        let parsed = parse_file_name("Data-BuiltIn-Wargaming-0.7.1-3.csv").unwrap();
        assert_eq!(
            parsed,
            ParsedName::BuiltIn {
                author: "Wargaming".to_string(),
                game_version: "0.7.1".parse().unwrap(),
                revision: 3,
            }
        );
    }

    #[test]
    fn builtin_is_case_insensitive() {
        assert!(matches!(
            parse_file_name("Data-builtin-X-1.0-1.csv"),
            Ok(ParsedName::BuiltIn { .. })
        ));
    }

    #[test]
    fn parses_property_names() {
        let parsed = parse_file_name("Data-NameShort-ru-Romkyns-0.7.1-12.csv").unwrap();
        assert_eq!(
            parsed,
            ParsedName::Property {
                property: "NameShort".to_string(),
                language: "ru".to_string(),
                author: "Romkyns".to_string(),
                game_version: "0.7.1".parse().unwrap(),
                revision: 12,
            }
        );
    }

    #[test]
    fn author_and_property_are_trimmed() {
        let parsed = parse_file_name("Data- NameShort -ru- Romkyns -0.7.1-1.csv").unwrap();
        match parsed {
            ParsedName::Property {
                property, author, ..
            } => {
                assert_eq!(property, "NameShort");
                assert_eq!(author, "Romkyns");
            }
            other => panic!("expected a property name, got {other:?}"),
        }
    }

    // -----------------------------------------------------------------------
    // Rejections, one per reason
    // -----------------------------------------------------------------------

    #[test]
    fn wrong_part_count() {
        assert_eq!(
            parse_file_name("Data-NameShort-0.7.1-1.csv"),
            Err(SkipReason::WrongPartCount)
        );
        assert_eq!(
            parse_file_name("Data-A-B-C-D-E-F-1.csv"),
            Err(SkipReason::WrongPartCount)
        );
    }

    #[test]
    fn builtin_with_six_parts() {
        assert_eq!(
            parse_file_name("Data-BuiltIn-ru-X-0.7.1-1.csv"),
            Err(SkipReason::BuiltInExtraParts)
        );
    }

    #[test]
    fn property_with_five_parts() {
        assert_eq!(
            parse_file_name("Data-NameShort-X-0.7.1-1.csv"),
            Err(SkipReason::PropertyMissingParts)
        );
    }

    #[test]
    fn empty_author() {
        assert_eq!(
            parse_file_name("Data-NameShort-ru- -0.7.1-1.csv"),
            Err(SkipReason::EmptyAuthor)
        );
    }

    #[test]
    fn bad_game_version() {
        assert_eq!(
            parse_file_name("Data-NameShort-ru-X-seven-1.csv"),
            Err(SkipReason::BadGameVersion("seven".to_string()))
        );
    }

    #[test]
    fn bad_revision() {
        assert_eq!(
            parse_file_name("Data-NameShort-ru-X-0.7.1-new.csv"),
            Err(SkipReason::BadRevision("new".to_string()))
        );
    }

    #[test]
    fn empty_property() {
        assert_eq!(
            parse_file_name("Data- -ru-X-0.7.1-1.csv"),
            Err(SkipReason::EmptyProperty)
        );
    }

    #[test]
    fn bad_language_code() {
        assert_eq!(
            parse_file_name("Data-NameShort-rus-X-0.7.1-1.csv"),
            Err(SkipReason::BadLanguage("rus".to_string()))
        );
    }

    #[test]
    fn skip_reasons_render_with_detail() {
        let msg = SkipReason::BadGameVersion("seven".to_string()).to_string();
        assert!(msg.contains("seven"));
        let msg = SkipReason::BadLanguage("rus".to_string()).to_string();
        assert!(msg.contains("rus"));
    }
}
