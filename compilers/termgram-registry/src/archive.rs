use rkyv::ser::{serializers::AllocSerializer, Serializer};
use rkyv::AlignedVec;
use termgram_grammar::PatternSet;

use crate::error::GrammarError;

/// Serializes a pattern set into an rkyv archive.
pub fn encode_patterns(set: &PatternSet) -> Result<AlignedVec, GrammarError> {
    let mut serializer = AllocSerializer::<1024>::default();
    serializer
        .serialize_value(set)
        .map_err(|err| GrammarError::Archive(err.to_string()))?;
    Ok(serializer.into_serializer().into_inner())
}

/// Validates and deserializes an archive produced by [`encode_patterns`].
/// The bytes are copied into aligned storage first, so any slice works.
pub fn decode_patterns(bytes: &[u8]) -> Result<PatternSet, GrammarError> {
    let mut aligned = AlignedVec::with_capacity(bytes.len());
    aligned.extend_from_slice(bytes);
    rkyv::from_bytes::<PatternSet>(&aligned).map_err(|err| GrammarError::Archive(err.to_string()))
}
