//! Immutable matrix and questionnaire catalog.
//!
//! The catalog holds every hand-authored table the core depends on: level
//! names, the 4 matrix sections, the 24 matrix columns and the 24 questions
//! with their possible-behavior counts. It is passed into the layout engine
//! and the reporter, never read from globals, so a deployment can swap in a
//! corrected table (see [`Catalog::load`]) without touching drawing code.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PanveError, Result};
use crate::responses::Responses;
use crate::types::*;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelInfo {
    pub level: Level,
    pub name: String,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionInfo {
    pub id: MatrixSection,
    pub name: String,
}

/// One communicative function drawn as a matrix column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub id: ColumnId,
    pub name: String,
    pub section: MatrixSection,
    pub levels: LevelSpan,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSpec {
    pub id: QuestionId,
    pub title: String,
    /// Theoretical maximum number of behaviors ("possible denominator").
    pub possible_behaviors: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub levels: Vec<LevelInfo>,
    pub sections: Vec<SectionInfo>,
    pub columns: Vec<ColumnSpec>,
    pub questions: Vec<QuestionSpec>,
}

// ── Built-in tables ─────────────────────────────────────────────────

const LEVEL_DESCRIPTIONS: [&str; 7] = [
    "Comportamento pré-intencional",
    "Comportamento intencional",
    "Comunicação não convencional",
    "Comunicação convencional",
    "Símbolos Concretos",
    "Símbolos Abstratos",
    "Linguagem",
];

/// (column id, name, matrix section), in drawing order.
const COLUMNS: [(&str, &str, MatrixSection); 24] = [
    ("A1", "Expressa desconforto", MatrixSection::Recusar),
    ("B1", "Protesta", MatrixSection::Recusar),
    ("C1", "Recusa rejeita", MatrixSection::Recusar),
    ("A2", "Expressa conforto", MatrixSection::Obter),
    ("B2", "Continua a ação", MatrixSection::Obter),
    ("B3", "Obtém Mais de Algo", MatrixSection::Obter),
    ("C2", "Solicita mais ação", MatrixSection::Obter),
    ("C3", "Solicita Nova Ação", MatrixSection::Obter),
    ("C4", "Solicita mais objeto", MatrixSection::Obter),
    ("C5", "Faz escolhas", MatrixSection::Obter),
    ("C6", "Solicita novo objeto", MatrixSection::Obter),
    ("C7", "Solicita Objetos Ausentes", MatrixSection::Obter),
    ("A3", "Expressa interesse em pessoas", MatrixSection::Social),
    ("B4", "Atrai a atenção", MatrixSection::Social),
    ("C8", "Solicita atenção", MatrixSection::Social),
    ("C9", "Demonstra afeição", MatrixSection::Social),
    ("C10", "Cumprimenta as pessoas", MatrixSection::Social),
    ("C11", "Oferece, Ações", MatrixSection::Social),
    ("C12", "Direciona sua atenção", MatrixSection::Social),
    ("C13", "Formas sociais educadas", MatrixSection::Social),
    ("C14", "Responde Sim/Não Perguntas", MatrixSection::Informacao),
    ("C15", "Faz perguntas", MatrixSection::Informacao),
    ("C16", "Nomeia Coisas/Pessoas", MatrixSection::Informacao),
    ("C17", "Faz Comentários", MatrixSection::Informacao),
];

/// (question id, title, possible behaviors), in canonical order.
const QUESTIONS: [(&str, &str, u32); 24] = [
    ("A.1", "Expressa incomodo", 5),
    ("A.2", "Expressa comodidade", 4),
    ("A.3", "Expressa interesse em outras pessoas", 6),
    ("B.1", "Protesto", 6),
    ("B.2", "Continua uma ação", 6),
    ("B.3", "Obtém mais de algo", 8),
    ("B.4", "Chama a atenção", 7),
    ("C.1", "Rejeita ou nega algo", 4),
    ("C.2", "Pede para continuar uma ação", 4),
    ("C.3", "Solicita Nova Ação", 4),
    ("C.4", "Solicita mais objeto", 4),
    ("C.5", "Faz escolhas", 4),
    ("C.6", "Solicita novo objeto", 4),
    ("C.7", "Solicita Objetos Ausentes", 4),
    ("C.8", "Solicita atenção", 4),
    ("C.9", "Demonstra afeição", 4),
    ("C.10", "Cumprimenta as pessoas", 4),
    ("C.11", "Oferece, Ações", 4),
    ("C.12", "Direciona sua atenção", 4),
    ("C.13", "Formas sociais educadas", 4),
    ("C.14", "Responde Sim/Não Perguntas", 4),
    ("C.15", "Faz perguntas", 4),
    ("C.16", "Nomeia Coisas/Pessoas", 4),
    ("C.17", "Faz Comentários", 4),
];

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl Catalog {
    /// The built-in PANVE catalog.
    pub fn standard() -> Self {
        let levels = Level::ALL
            .iter()
            .zip(LEVEL_DESCRIPTIONS)
            .map(|(level, description)| LevelInfo {
                level: *level,
                name: format!("Nível {}", level),
                description: description.to_string(),
            })
            .collect();

        let sections = MatrixSection::ALL
            .iter()
            .map(|s| SectionInfo {
                id: *s,
                name: s.display_name().to_string(),
            })
            .collect();

        let columns = COLUMNS
            .iter()
            .filter_map(|(id, name, section)| {
                let id = ColumnId::parse(id)?;
                Some(ColumnSpec {
                    id,
                    name: name.to_string(),
                    section: *section,
                    levels: id.section.level_span(),
                })
            })
            .collect();

        let questions = QUESTIONS
            .iter()
            .filter_map(|(id, title, possible)| {
                Some(QuestionSpec {
                    id: QuestionId::parse(id)?,
                    title: title.to_string(),
                    possible_behaviors: *possible,
                })
            })
            .collect();

        Self {
            levels,
            sections,
            columns,
            questions,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load and validate a catalog JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| PanveError::io(path, e))?;
        let catalog = Self::from_json_str(&json)?;
        tracing::info!(
            path = %path.display(),
            columns = catalog.columns.len(),
            questions = catalog.questions.len(),
            "loaded catalog"
        );
        Ok(catalog)
    }

    /// Reject duplicated ids and columns that cannot be resolved.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| {
            tracing::warn!("{}", msg);
            Err(PanveError::InvalidCatalog(msg))
        };

        let mut seen_levels = HashSet::new();
        for info in &self.levels {
            if !seen_levels.insert(info.level) {
                return invalid(format!("level {} listed twice", info.level));
            }
        }

        let mut seen_questions = HashSet::new();
        for q in &self.questions {
            if !seen_questions.insert(q.id) {
                return invalid(format!("question {} listed twice", q.id));
            }
        }

        let sections: HashSet<MatrixSection> = self.sections.iter().map(|s| s.id).collect();
        let mut seen_columns = HashSet::new();
        for col in &self.columns {
            if !seen_columns.insert(col.id) {
                return invalid(format!("column {} listed twice", col.id));
            }
            if !sections.contains(&col.section) {
                return invalid(format!(
                    "column {} belongs to undeclared section {}",
                    col.id,
                    col.section.as_str()
                ));
            }
            let span = col.id.section.level_span();
            if !span.contains(col.levels.first()) || !span.contains(col.levels.last()) {
                return invalid(format!(
                    "column {} spans levels {} outside section {} levels {}",
                    col.id,
                    col.levels,
                    col.id.section.letter(),
                    span
                ));
            }
            if !seen_questions.contains(&col.id.question_id()) {
                return invalid(format!(
                    "column {} has no question {}",
                    col.id,
                    col.id.question_id()
                ));
            }
        }
        Ok(())
    }

    pub fn level(&self, level: Level) -> Option<&LevelInfo> {
        self.levels.iter().find(|l| l.level == level)
    }

    pub fn column(&self, id: ColumnId) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// Columns of one matrix section, in catalog order.
    pub fn columns_in(&self, section: MatrixSection) -> impl Iterator<Item = &ColumnSpec> {
        self.columns.iter().filter(move |c| c.section == section)
    }

    pub fn question(&self, id: QuestionId) -> Option<&QuestionSpec> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Questions of one questionnaire section, in catalog order.
    pub fn questions_in(
        &self,
        section: QuestionnaireSection,
    ) -> impl Iterator<Item = &QuestionSpec> {
        self.questions.iter().filter(move |q| q.id.section == section)
    }

    pub fn possible_behaviors(&self, id: QuestionId) -> Option<u32> {
        self.question(id).map(|q| q.possible_behaviors)
    }

    /// Raw question ids in `responses` that this catalog does not know.
    /// Their answers are kept but never drawn or counted.
    pub fn unknown_question_ids<'r>(&self, responses: &'r Responses) -> Vec<&'r str> {
        let mut unknown = Vec::new();
        for section in QuestionnaireSection::ALL {
            for raw in responses.section(section).ids() {
                let known = QuestionId::parse(raw)
                    .filter(|id| id.section == section && id.to_string() == raw)
                    .and_then(|id| self.question(id))
                    .is_some();
                if !known {
                    unknown.push(raw);
                }
            }
        }
        unknown
    }

    /// Log one warning per question id that will be skipped.
    pub fn warn_unknown_questions(&self, responses: &Responses) {
        for raw in self.unknown_question_ids(responses) {
            tracing::warn!(question = raw, "skipping answers for unknown question");
        }
    }
}
