pub mod budget;
pub mod complex;
pub mod error;
pub mod options;
pub mod screen;
pub mod simple;
pub mod status;
pub mod word_complex;

pub use budget::SearchBudget;
pub use complex::{reduce_boundaries, CompositeMatcher};
pub use error::MatchError;
pub use options::MatchOptions;
pub use screen::{StopWords, TokenScreen};
pub use simple::LeafMatcher;
pub use status::MatchStatus;
pub use word_complex::{Side, Span, WordComplex};

use termgram_protocol::Sentence;
use termgram_registry::Registry;
use tracing::{debug, warn, Level};

/// Both collections found in one sentence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction<'a> {
    pub simple: Vec<WordComplex<'a>>,
    pub complex: Vec<WordComplex<'a>>,
}

impl<'a> Extraction<'a> {
    pub fn is_empty(&self) -> bool {
        self.simple.is_empty() && self.complex.is_empty()
    }
}

/// Runs the leaf pass and then the composite pass over sentences. Holds only
/// shared state, so one extractor can serve many threads.
#[derive(Debug, Clone)]
pub struct PhraseExtractor<'r> {
    registry: &'r Registry,
    options: MatchOptions,
    stop_words: StopWords,
}

impl<'r> PhraseExtractor<'r> {
    pub fn new(registry: &'r Registry, options: MatchOptions) -> Result<Self, MatchError> {
        options.validate()?;
        Ok(Self {
            registry,
            options,
            stop_words: StopWords::new(),
        })
    }

    pub fn with_stop_words(mut self, stop_words: StopWords) -> Self {
        self.stop_words = stop_words;
        self
    }

    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    pub fn extract<'s>(&self, sentence: &'s Sentence) -> Result<Extraction<'s>, MatchError>
    where
        'r: 's,
    {
        let span = tracing::span!(
            Level::DEBUG,
            "termgram.extract",
            document = %sentence.document,
            sentence = %sentence.id,
            tokens = sentence.len()
        );
        let _guard = span.enter();

        match self.run(sentence) {
            Ok(extraction) => {
                debug!(
                    simple = extraction.simple.len(),
                    complex = extraction.complex.len(),
                    "sentence_extracted"
                );
                Ok(extraction)
            }
            Err(err) => {
                warn!(
                    document = %sentence.document,
                    sentence = %sentence.id,
                    error = %err,
                    "sentence_aborted"
                );
                Err(err)
            }
        }
    }

    fn run<'s>(&self, sentence: &'s Sentence) -> Result<Extraction<'s>, MatchError>
    where
        'r: 's,
    {
        let mut budget = SearchBudget::from_options(&self.options);

        let simple = LeafMatcher::new(self.registry, &self.options, &self.stop_words).collect(sentence, &mut budget)?;
        let complex = CompositeMatcher::new(self.registry, &self.options, &self.stop_words).collect(
            sentence,
            &simple,
            &mut budget,
        )?;
        let complex = if self.options.validate_boundaries {
            reduce_boundaries(complex)
        } else {
            complex
        };

        debug!(steps = budget.steps(), "search finished");
        Ok(Extraction { simple, complex })
    }
}
