//! Candidate and client inference from the parecer naming convention.
//!
//! Files are saved as `Parecer_<Client>_<Name parts...>_<YYYYMMDD>_<HHMM>.pdf`.
//! Older files may lack the prefix or the trailing date and time.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use recruta_config::ImportConfig;
use std::path::Path;

/// Naming convention knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameRules {
    pub prefix: String,
    pub delimiter: String,
}

impl Default for FilenameRules {
    fn default() -> Self {
        Self {
            prefix: "Parecer".to_string(),
            delimiter: "_".to_string(),
        }
    }
}

impl From<&ImportConfig> for FilenameRules {
    fn from(config: &ImportConfig) -> Self {
        Self {
            prefix: config.filename_prefix.clone(),
            delimiter: config.delimiter.clone(),
        }
    }
}

/// What a filename says about its document. Empty strings mean "not derivable".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilenameInference {
    pub client: String,
    pub name: String,
    pub timestamp: Option<NaiveDateTime>,
}

/// Derive client, candidate name and timestamp from a filename.
///
/// Segment count decides the layout: with four or more segments the last two
/// are date and time and never part of the name, whether or not they parse.
pub fn infer_from_filename(filename: &str, rules: &FilenameRules) -> FilenameInference {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("");

    let body = strip_prefix(stem, rules);

    let segments: Vec<&str> = if rules.delimiter.is_empty() {
        vec![body.trim()]
    } else {
        body.split(rules.delimiter.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    };

    let Some((client, rest)) = segments.split_first() else {
        return FilenameInference::default();
    };

    let (name_parts, timestamp) = if segments.len() >= 4 {
        let (name_parts, tail) = rest.split_at(rest.len() - 2);
        (name_parts, parse_timestamp(tail[0], tail[1]))
    } else {
        (rest, None)
    };

    FilenameInference {
        client: client.to_string(),
        name: join_name(name_parts),
        timestamp,
    }
}

fn strip_prefix<'a>(stem: &'a str, rules: &FilenameRules) -> &'a str {
    let prefix_len = rules.prefix.len();
    if prefix_len == 0 {
        return stem;
    }

    let head_matches = stem
        .get(..prefix_len)
        .map(|head| head.to_lowercase() == rules.prefix.to_lowercase())
        .unwrap_or(false);
    if !head_matches {
        return stem;
    }

    let rest = &stem[prefix_len..];
    if rest.is_empty() {
        return rest;
    }
    // "Pareceres_..." is not the prefix token
    match rest.strip_prefix(rules.delimiter.as_str()) {
        Some(after) if !rules.delimiter.is_empty() => after,
        _ => stem,
    }
}

fn parse_timestamp(date: &str, time: &str) -> Option<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(date, "%Y%m%d").ok()?;
    let time = NaiveTime::parse_from_str(time, "%H%M").ok()?;
    Some(date.and_time(time))
}

fn join_name(parts: &[&str]) -> String {
    parts
        .iter()
        .flat_map(|part| part.split('-'))
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn infer(filename: &str) -> FilenameInference {
        infer_from_filename(filename, &FilenameRules::default())
    }

    #[test]
    fn test_conventional_filename() {
        let inferred = infer("Parecer_Smartcitizen_Hendrik_Szeletzki_20251114_1719.pdf");
        assert_eq!(inferred.client, "Smartcitizen");
        assert_eq!(inferred.name, "Hendrik Szeletzki");

        let expected = NaiveDate::from_ymd_opt(2025, 11, 14)
            .unwrap()
            .and_hms_opt(17, 19, 0)
            .unwrap();
        assert_eq!(inferred.timestamp, Some(expected));
    }

    #[test]
    fn test_directory_and_prefix_case_are_ignored() {
        let inferred = infer("/inbox/2025/PARECER_Acme_Maria_Silva_20250102_0930.PDF");
        assert_eq!(inferred.client, "Acme");
        assert_eq!(inferred.name, "Maria Silva");
    }

    #[test]
    fn test_dashes_become_spaces() {
        let inferred = infer("Parecer_Acme_Ana-Paula_Souza-Lima_20250102_0930.pdf");
        assert_eq!(inferred.name, "Ana Paula Souza Lima");
    }

    #[test]
    fn test_short_filename_uses_all_segments_for_name() {
        let inferred = infer("Parecer_Acme_Maria.pdf");
        assert_eq!(inferred.client, "Acme");
        assert_eq!(inferred.name, "Maria");
        assert!(inferred.timestamp.is_none());

        let inferred = infer("Acme_Maria_Silva.pdf");
        assert_eq!(inferred.client, "Acme");
        assert_eq!(inferred.name, "Maria Silva");
    }

    #[test]
    fn test_invalid_date_is_still_excluded_from_name() {
        let inferred = infer("Parecer_Acme_Maria_Silva_2025XX14_9999.pdf");
        assert_eq!(inferred.name, "Maria Silva");
        assert!(inferred.timestamp.is_none());
    }

    #[test]
    fn test_empty_segments_dropped() {
        let inferred = infer("Parecer__Acme__Maria_Silva_20250102_0930.pdf");
        assert_eq!(inferred.client, "Acme");
        assert_eq!(inferred.name, "Maria Silva");
    }

    #[test]
    fn test_unconventional_filename_has_no_name() {
        let inferred = infer("scan001.pdf");
        assert_eq!(inferred.client, "scan001");
        assert!(inferred.name.is_empty());

        assert_eq!(infer("Parecer.pdf"), FilenameInference::default());
    }

    #[test]
    fn test_prefix_requires_delimiter() {
        let inferred = infer("Pareceres_Acme_Maria.pdf");
        assert_eq!(inferred.client, "Pareceres");
        assert_eq!(inferred.name, "Acme Maria");
    }

    #[test]
    fn test_custom_rules() {
        let rules = FilenameRules {
            prefix: "Avaliacao".to_string(),
            delimiter: "-".to_string(),
        };
        let inferred = infer_from_filename("Avaliacao-Globex-Joao-Souza.pdf", &rules);
        assert_eq!(inferred.client, "Globex");
        assert_eq!(inferred.name, "Joao Souza");
    }
}
