//! Label-based field extraction from parecer text.
//!
//! Single-line fields are found by label ("Cliente:", "Candidato:", ...) and
//! take the rest of the line. Narrative fields run from their heading up to
//! the next known heading. A miss leaves the field empty.

use crate::filename::{infer_from_filename, FilenameRules};
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;

/// Single-line fields recognised by label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineField {
    Client,
    JobTitle,
    CandidateName,
    Location,
    Age,
    SalaryExpectation,
    LinkedinUrl,
}

/// Label synonyms per field. New document layouts add synonyms here.
///
/// A synonym ending in `:` only matches when the colon is present, for
/// generic words that also open unrelated labels ("Nome do cliente").
pub static LINE_FIELDS: &[(LineField, &[&str])] = &[
    (LineField::Client, &["Cliente", "Empresa"]),
    (LineField::JobTitle, &["Cargo", "Vaga", "Posição", "Posicao"]),
    (
        LineField::CandidateName,
        &[
            "Nome do candidato",
            "Nome da candidata",
            "Candidato",
            "Candidata",
            "Nome:",
        ],
    ),
    (
        LineField::Location,
        &["Localização", "Localizacao", "Cidade", "Local"],
    ),
    (LineField::Age, &["Idade"]),
    (
        LineField::SalaryExpectation,
        &[
            "Pretensão salarial",
            "Pretensao salarial",
            "Expectativa salarial",
            "Pretensão",
            "Pretensao",
        ],
    ),
    (LineField::LinkedinUrl, &["LinkedIn", "Perfil LinkedIn"]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Summary,
    Analysis,
    Conclusion,
}

const SECTION_MARKERS: &[(Section, &str)] = &[
    (Section::Summary, r"resumo\s+profissional"),
    (Section::Analysis, r"an(?:á|a\x{0301}?)lise\s+de\s+perfil"),
    (Section::Conclusion, r"conclus(?:ã|a\x{0303}?)o"),
];

static LINE_PATTERNS: Lazy<Vec<(LineField, Regex)>> = Lazy::new(|| {
    LINE_FIELDS
        .iter()
        .map(|(field, synonyms)| {
            let mut synonyms = synonyms.to_vec();
            // Alternation is leftmost-first: longer labels must come first
            synonyms.sort_by_key(|s| std::cmp::Reverse(s.trim_end_matches(':').chars().count()));
            let alternation = synonyms
                .iter()
                .map(|s| {
                    let (label, colon) = match s.strip_suffix(':') {
                        Some(label) => (label, ":"),
                        None => (*s, ":?"),
                    };
                    format!(r"{}\b[ \t]*{}", regex::escape(label).replace(' ', r"\s+"), colon)
                })
                .collect::<Vec<_>>()
                .join("|");
            let pattern = format!(r"(?i)\b(?:{})[ \t]*([^\r\n]*)", alternation);
            (*field, Regex::new(&pattern).unwrap())
        })
        .collect()
});

static SECTION_PATTERNS: Lazy<Vec<(Section, Regex)>> = Lazy::new(|| {
    SECTION_MARKERS
        .iter()
        .map(|(section, marker)| {
            let pattern = format!(r"(?i)\b{}\b", marker);
            (*section, Regex::new(&pattern).unwrap())
        })
        .collect()
});

/// Fields pulled out of one parecer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    pub client: String,
    pub job_title: String,
    pub candidate_name: String,
    pub location: String,
    pub age: String,
    pub salary_expectation: String,
    pub linkedin_url: String,
    pub summary: String,
    pub analysis: String,
    pub conclusion: String,
    /// Date and time encoded in the filename, if any.
    pub timestamp: Option<NaiveDateTime>,
}

impl ExtractedFields {
    fn slot(&mut self, field: LineField) -> &mut String {
        match field {
            LineField::Client => &mut self.client,
            LineField::JobTitle => &mut self.job_title,
            LineField::CandidateName => &mut self.candidate_name,
            LineField::Location => &mut self.location,
            LineField::Age => &mut self.age,
            LineField::SalaryExpectation => &mut self.salary_expectation,
            LineField::LinkedinUrl => &mut self.linkedin_url,
        }
    }

    /// Whether the document names a candidate.
    pub fn has_candidate(&self) -> bool {
        !self.candidate_name.trim().is_empty()
    }
}

/// Extract every known field from `raw_text`.
///
/// Candidate name and client fall back to the filename convention when
/// their labels are missing.
pub fn extract_fields(raw_text: &str, source_filename: &str, rules: &FilenameRules) -> ExtractedFields {
    let mut fields = ExtractedFields::default();

    for (field, pattern) in LINE_PATTERNS.iter() {
        let found = pattern
            .captures_iter(raw_text)
            .find(|caps| caps.get(0).is_some_and(|m| !inside_url(raw_text, m.start())));
        if let Some(caps) = found {
            *fields.slot(*field) = caps
                .get(1)
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default();
        }
    }

    fields.summary = section_text(raw_text, Section::Summary);
    fields.analysis = section_text(raw_text, Section::Analysis);
    fields.conclusion = section_text(raw_text, Section::Conclusion);

    let inferred = infer_from_filename(source_filename, rules);
    if fields.candidate_name.is_empty() {
        fields.candidate_name = inferred.name;
    }
    if fields.client.is_empty() {
        fields.client = inferred.client;
    }
    fields.timestamp = inferred.timestamp;

    fields
}

/// Whether a label match at `start` is part of a host name or path.
fn inside_url(text: &str, start: usize) -> bool {
    matches!(text[..start].chars().next_back(), Some('.' | '/'))
}

fn section_text(text: &str, section: Section) -> String {
    let Some(start) = SECTION_PATTERNS
        .iter()
        .find(|(s, _)| *s == section)
        .and_then(|(_, pattern)| pattern.find(text))
    else {
        return String::new();
    };

    let body = &text[start.end()..];
    let end = SECTION_PATTERNS
        .iter()
        .filter_map(|(_, pattern)| pattern.find(body))
        .map(|m| m.start())
        .min()
        .unwrap_or(body.len());

    let block = body[..end].trim_start();
    block.strip_prefix(':').unwrap_or(block).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> ExtractedFields {
        extract_fields(text, "scan001.pdf", &FilenameRules::default())
    }

    #[test]
    fn test_basic_labels() {
        let fields = extract("Cliente: Acme Corp\nCargo: Analista\nCandidato: Maria Silva\n");
        assert_eq!(fields.client, "Acme Corp");
        assert_eq!(fields.job_title, "Analista");
        assert_eq!(fields.candidate_name, "Maria Silva");
    }

    #[test]
    fn test_labels_are_case_insensitive_and_colon_optional() {
        let text = "CLIENTE Globex\nidade: 31 anos\nLocalização:   Curitiba - PR  \n\
                    Pretensão salarial: R$ 8.000,00\nLinkedIn: https://linkedin.com/in/maria\n";
        let fields = extract(text);
        assert_eq!(fields.client, "Globex");
        assert_eq!(fields.age, "31 anos");
        assert_eq!(fields.location, "Curitiba - PR");
        assert_eq!(fields.salary_expectation, "R$ 8.000,00");
        assert_eq!(fields.linkedin_url, "https://linkedin.com/in/maria");
    }

    #[test]
    fn test_longer_synonym_wins() {
        let fields = extract("Nome do candidato: João Souza\n");
        assert_eq!(fields.candidate_name, "João Souza");
    }

    #[test]
    fn test_first_match_wins() {
        let fields = extract("Candidato: Maria Silva\nOutro candidato: Pedro\n");
        assert_eq!(fields.candidate_name, "Maria Silva");
    }

    #[test]
    fn test_label_inside_word_does_not_match() {
        let fields = extract("Clientela: varejo\nCliente: Acme Corp\n");
        assert_eq!(fields.client, "Acme Corp");
    }

    #[test]
    fn test_summary_stops_at_next_heading() {
        let text = "Resumo Profissional\n  Dez anos em engenharia de dados.\n\
                    Análise de Perfil\nPerfil analítico.\nConclusão: Recomendada.";
        let fields = extract(text);
        assert_eq!(fields.summary, "Dez anos em engenharia de dados.");
        assert_eq!(fields.analysis, "Perfil analítico.");
        assert_eq!(fields.conclusion, "Recomendada.");
    }

    #[test]
    fn test_section_markers_tolerate_accents_and_case() {
        let text = "RESUMO PROFISSIONAL: texto um\nANALISE DE PERFIL: texto dois\nconclusao: texto tres";
        let fields = extract(text);
        assert_eq!(fields.summary, "texto um");
        assert_eq!(fields.analysis, "texto dois");
        assert_eq!(fields.conclusion, "texto tres");
    }

    #[test]
    fn test_last_section_runs_to_end() {
        let fields = extract("Conclusão\nAprovada para a próxima etapa.\n\n");
        assert_eq!(fields.conclusion, "Aprovada para a próxima etapa.");
        assert!(fields.summary.is_empty());
    }

    #[test]
    fn test_misses_leave_fields_empty() {
        let fields = extract("Documento sem rótulos reconhecidos.");
        assert!(fields.job_title.is_empty());
        assert!(fields.age.is_empty());
        assert!(fields.summary.is_empty());
        assert!(!fields.has_candidate());
    }

    #[test]
    fn test_filename_fallback() {
        let fields = extract_fields(
            "Cargo: Analista\n",
            "Parecer_Smartcitizen_Hendrik_Szeletzki_20251114_1719.pdf",
            &FilenameRules::default(),
        );
        assert_eq!(fields.client, "Smartcitizen");
        assert_eq!(fields.candidate_name, "Hendrik Szeletzki");
        assert_eq!(fields.job_title, "Analista");
        assert!(fields.timestamp.is_some());
    }

    #[test]
    fn test_labels_take_precedence_over_filename() {
        let fields = extract_fields(
            "Cliente: Acme Corp\nCandidato: Maria Silva\n",
            "Parecer_Globex_Joao_Souza_20250101_0800.pdf",
            &FilenameRules::default(),
        );
        assert_eq!(fields.client, "Acme Corp");
        assert_eq!(fields.candidate_name, "Maria Silva");
        assert!(fields.timestamp.is_some());
    }

    #[test]
    fn test_generic_name_label_needs_colon() {
        let fields = extract("Nome do cliente: Acme Corp\nCandidato: Maria Silva\n");
        assert_eq!(fields.candidate_name, "Maria Silva");

        let fields = extract("Nome: Ana Lima\nEmpresa: Globex\n");
        assert_eq!(fields.candidate_name, "Ana Lima");
        assert_eq!(fields.client, "Globex");

        let fields = extract("Nome Ana Lima\n");
        assert!(!fields.has_candidate());
    }

    #[test]
    fn test_label_inside_url_is_ignored() {
        let fields = extract("Perfil: https://www.linkedin.com/in/maria\n");
        assert!(fields.linkedin_url.is_empty());

        let fields = extract("Site: https://www.linkedin.com/in/maria\nLinkedIn: linkedin.com/in/maria\n");
        assert_eq!(fields.linkedin_url, "linkedin.com/in/maria");
    }

    #[test]
    fn test_section_markers_accept_decomposed_accents() {
        let text = "Resumo Profissional\nTexto um.\nAna\u{301}lise de Perfil\nTexto dois.\n\
                    Conclusa\u{303}o: Recomendada.";
        let fields = extract(text);
        assert_eq!(fields.summary, "Texto um.");
        assert_eq!(fields.analysis, "Texto dois.");
        assert_eq!(fields.conclusion, "Recomendada.");
    }
}
