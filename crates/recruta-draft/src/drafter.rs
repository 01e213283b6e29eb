//! Drafting of the narrative sections of a parecer.

use crate::client::{HttpGenerator, TextGenerator};
use crate::error::{DraftError, DraftResult};
use recruta_config::GeneratorConfig;
use tracing::{debug, info, warn};

const MAX_NOTES_CHARS: usize = 4000;

/// What the recruiter knows about the candidate.
#[derive(Debug, Clone, Default)]
pub struct DraftInput {
    pub candidate_name: String,
    pub job_title: String,
    pub client_name: String,
    pub location: String,
    pub age: String,
    pub salary_expectation: String,
    /// Interview notes, résumé text, or an existing parecer.
    pub notes: String,
}

/// The three narrative sections of a parecer. Empty when drafting failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Narratives {
    pub summary: String,
    pub analysis: String,
    pub conclusion: String,
}

impl Narratives {
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty() && self.analysis.is_empty() && self.conclusion.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
enum Section {
    Summary,
    Analysis,
    Conclusion,
}

impl Section {
    fn heading(&self) -> &'static str {
        match self {
            Section::Summary => "Resumo Profissional",
            Section::Analysis => "Análise de Perfil",
            Section::Conclusion => "Conclusão",
        }
    }

    fn instruction(&self) -> &'static str {
        match self {
            Section::Summary => {
                "Escreva um resumo profissional de 3 a 4 frases com a trajetória, \
                 as principais experiências e competências do candidato."
            }
            Section::Analysis => {
                "Escreva uma análise de perfil de 4 a 6 frases avaliando a aderência \
                 do candidato à vaga, com pontos fortes e pontos de atenção."
            }
            Section::Conclusion => {
                "Escreva uma conclusão de 2 a 3 frases com a recomendação do consultor \
                 sobre o avanço do candidato no processo."
            }
        }
    }
}

/// Drafts parecer narratives one section at a time.
pub struct Drafter {
    generator: Box<dyn TextGenerator>,
}

impl Drafter {
    pub fn new(generator: Box<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Connect to the configured service.
    ///
    /// Errors mean drafting is unavailable; callers carry on without narratives.
    pub fn from_config(config: &GeneratorConfig) -> DraftResult<Self> {
        let generator = HttpGenerator::from_config(config)?;

        if !generator.is_available() {
            return Err(DraftError::ServerNotRunning {
                host: config.host.clone(),
            });
        }

        info!("Drafting with model {}", generator.model());
        Ok(Self::new(Box::new(generator)))
    }

    /// Draft all three sections. A section whose request fails is left empty.
    pub fn draft(&self, input: &DraftInput) -> Narratives {
        Narratives {
            summary: self.draft_section(Section::Summary, input),
            analysis: self.draft_section(Section::Analysis, input),
            conclusion: self.draft_section(Section::Conclusion, input),
        }
    }

    fn draft_section(&self, section: Section, input: &DraftInput) -> String {
        let prompt = build_prompt(section, input);

        match self.generator.generate(&prompt) {
            Ok(text) => {
                debug!("Drafted {}: {} chars", section.heading(), text.len());
                text.trim().to_string()
            }
            Err(e) => {
                warn!("Failed to draft {}: {}", section.heading(), e);
                String::new()
            }
        }
    }
}

fn build_prompt(section: Section, input: &DraftInput) -> String {
    let mut prompt = format!("{}\n\nSeção: {}\n", section.instruction(), section.heading());

    let facts = [
        ("Candidato", &input.candidate_name),
        ("Vaga", &input.job_title),
        ("Cliente", &input.client_name),
        ("Localização", &input.location),
        ("Idade", &input.age),
        ("Pretensão salarial", &input.salary_expectation),
    ];
    for (label, value) in facts {
        let value = value.trim();
        if !value.is_empty() {
            prompt.push_str(&format!("{}: {}\n", label, value));
        }
    }

    let notes = truncate_chars(input.notes.trim(), MAX_NOTES_CHARS);
    if !notes.is_empty() {
        prompt.push_str("\nAnotações do consultor:\n");
        prompt.push_str(notes);
        prompt.push('\n');
    }

    prompt.push_str("\nResponda apenas com o texto da seção, sem título.");
    prompt
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
