/// Language of the synthesized spoken description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultLanguage {
    En,
    Ru,
}

/// Bilingual location description produced by one successful inference call.
///
/// `en` and `ru` are non-empty on success; `sources` may be empty.
/// Immutable once created, held until a new analysis starts.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub en: String,
    pub ru: String,
    pub sources: Vec<SourceRef>,
}

impl AnalysisResult {
    pub fn text(&self, language: ResultLanguage) -> &str {
        match language {
            ResultLanguage::En => &self.en,
            ResultLanguage::Ru => &self.ru,
        }
    }

    /// Sources that carry a usable uri. Entries without one are skipped,
    /// never treated as an error.
    pub fn renderable_sources(&self) -> impl Iterator<Item = &SourceRef> {
        self.sources.iter().filter(|s| s.is_renderable())
    }
}

/// A grounding citation attached to an analysis result.
///
/// Both fields are optional even within a present variant; the model backend
/// sometimes returns chunks with a title but no uri.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceRef {
    Web {
        uri: Option<String>,
        title: Option<String>,
    },
    Maps {
        uri: Option<String>,
        title: Option<String>,
    },
}

impl SourceRef {
    pub fn uri(&self) -> Option<&str> {
        match self {
            Self::Web { uri, .. } | Self::Maps { uri, .. } => uri.as_deref(),
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Web { title, .. } | Self::Maps { title, .. } => title.as_deref(),
        }
    }

    pub fn is_renderable(&self) -> bool {
        self.uri().is_some_and(|u| !u.is_empty())
    }
}
