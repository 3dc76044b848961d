use termgram_protocol::{DocumentId, Sentence, SentenceId, Token};

/// Inclusive token range `[start, end]` inside a sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn at(index: usize) -> Self {
        Self::new(index, index)
    }

    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Direction of an outward walk from the head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Sentence position just outside `span` on this side, if the sentence has one.
    pub fn next_position(self, span: Span, sentence_len: usize) -> Option<usize> {
        match self {
            Side::Left => span.start.checked_sub(1),
            Side::Right => Some(span.end + 1).filter(|&next| next < sentence_len),
        }
    }

    /// Last component index this side walks to.
    pub fn boundary(self, pattern_len: usize) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => pattern_len.saturating_sub(1),
        }
    }

    /// Component one step further out. Callers stop at [`Side::boundary`].
    pub fn next_component(self, component: usize) -> usize {
        match self {
            Side::Left => component.saturating_sub(1),
            Side::Right => component + 1,
        }
    }
}

/// One phrase occurrence. Borrows tokens from the sentence and the pattern
/// name from the registry; cloning one is a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct WordComplex<'a> {
    pub span: Span,
    pub tokens: Vec<&'a Token>,
    pub text: String,
    pub pattern: &'a str,
    pub document: DocumentId,
    pub sentence: SentenceId,
    /// Sentence index of the head token, when the producing pass knows it.
    pub head: Option<usize>,
}

impl<'a> WordComplex<'a> {
    /// A one-token match anchored at `index`.
    pub fn anchor(sentence: &'a Sentence, index: usize, pattern: &'a str) -> Option<Self> {
        let token = sentence.tokens.get(index)?;
        Some(Self {
            span: Span::at(index),
            tokens: vec![token],
            text: token.text.clone(),
            pattern,
            document: sentence.document,
            sentence: sentence.id,
            head: Some(index),
        })
    }

    /// A copy of `base` re-labelled with another pattern.
    pub fn seeded(base: &WordComplex<'a>, pattern: &'a str) -> Self {
        Self {
            pattern,
            ..base.clone()
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Adds one token just outside the span.
    pub fn push(&mut self, side: Side, index: usize, token: &'a Token) {
        match side {
            Side::Left => {
                self.tokens.insert(0, token);
                self.text = format!("{} {}", token.text, self.text);
                self.span.start = index;
            }
            Side::Right => {
                self.tokens.push(token);
                self.text.push(' ');
                self.text.push_str(&token.text);
                self.span.end = index;
            }
        }
    }

    /// Takes over every token of an adjacent match in one step.
    pub fn absorb(&mut self, side: Side, other: &WordComplex<'a>) {
        match side {
            Side::Left => {
                self.tokens.splice(0..0, other.tokens.iter().copied());
                self.text = format!("{} {}", other.text, self.text);
                self.span.start = other.span.start;
            }
            Side::Right => {
                self.tokens.extend(other.tokens.iter().copied());
                self.text.push(' ');
                self.text.push_str(&other.text);
                self.span.end = other.span.end;
            }
        }
    }

    pub fn lemmas(&self) -> Vec<&'a str> {
        self.tokens.iter().map(|token| token.lemma()).collect()
    }

    /// Normalized form used to group occurrences of one phrase.
    pub fn key(&self) -> String {
        self.lemmas().join(" ")
    }

    /// Same pattern and same lemmas, wherever the two occur.
    pub fn same_phrase(&self, other: &WordComplex<'_>) -> bool {
        self.pattern == other.pattern && self.lemmas() == other.lemmas()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use termgram_protocol::{MorphTag, PartOfSpeech, Reading};

    fn sentence(words: &[(&str, &str)]) -> Sentence {
        let tokens = words
            .iter()
            .map(|(text, lemma)| Token::new(*text, vec![Reading::new(PartOfSpeech::Noun, MorphTag::default(), *lemma)]))
            .collect();
        Sentence::new(DocumentId(1), SentenceId(4), tokens)
    }

    #[test]
    fn test_growth_keeps_text_and_span() {
        let s = sentence(&[("больших", "большой"), ("домов", "дом"), ("города", "город")]);
        let mut wc = WordComplex::anchor(&s, 1, "С").unwrap();
        let before = wc.clone();

        wc.push(Side::Left, 0, &s.tokens[0]);
        wc.push(Side::Right, 2, &s.tokens[2]);

        assert_eq!(wc.span, Span::new(0, 2));
        assert_eq!(wc.text, "больших домов города");
        assert_eq!(wc.key(), "большой дом город");
        assert_eq!(wc.head, Some(1));
        assert_eq!(wc.sentence, SentenceId(4));

        // Snapshots taken earlier are untouched.
        assert_eq!(before.text, "домов");
        assert_eq!(before.span.len(), 1);
    }

    #[test]
    fn test_absorb_and_phrase_identity() {
        let s = sentence(&[("красивый", "красивый"), ("дом", "дом")]);
        let left = WordComplex::anchor(&s, 0, "Прил").unwrap();
        let mut wc = WordComplex::seeded(&WordComplex::anchor(&s, 1, "С").unwrap(), "Прил+С");
        wc.absorb(Side::Left, &left);

        assert_eq!(wc.span, Span::new(0, 1));
        assert_eq!(wc.text, "красивый дом");
        assert_eq!(wc.len(), 2);

        let other = sentence(&[("красивые", "красивый"), ("дома", "дом")]);
        let mut twin = WordComplex::seeded(&WordComplex::anchor(&other, 1, "С").unwrap(), "Прил+С");
        twin.absorb(Side::Left, &WordComplex::anchor(&other, 0, "Прил").unwrap());
        assert!(wc.same_phrase(&twin));
        assert_ne!(wc.text, twin.text);

        assert!(WordComplex::anchor(&s, 5, "С").is_none());
    }

    #[test]
    fn test_side_stepping() {
        assert_eq!(Side::Left.next_position(Span::at(0), 3), None);
        assert_eq!(Side::Right.next_position(Span::new(1, 2), 3), None);
        assert_eq!(Side::Right.next_position(Span::at(0), 3), Some(1));
        assert_eq!(Side::Left.boundary(4), 0);
        assert_eq!(Side::Right.boundary(4), 3);
        assert_eq!(Side::Left.next_component(2), 1);
    }
}
