//! Fixed-size record layout for one cache line

use super::OutputContext;

/// One cache line: a lookup key, an optional output context, and a score
///
/// Wide fields come first so the record packs into 32 bytes with no
/// padding. A NaN score marks the line as empty.
#[derive(Debug, Copy, Clone)]
#[repr(C)]
pub(super) struct CacheLine {
    /// Context offset half of the lookup key
    context_offset: i64,
    /// Offset of the recorded output context, negative if none
    output_context_offset: i64,
    /// Word half of the lookup key
    word: i32,
    /// Context order half of the lookup key
    context_order: i32,
    /// Order of the recorded output context
    output_context_order: i32,
    /// Cached score, NaN while the line is empty
    score: f32,
}

/// Lines must stay exactly 32 bytes wide
const _: () = assert!(std::mem::size_of::<CacheLine>() == 32);

impl CacheLine {
    /// A line that has never been written
    pub(super) const EMPTY: Self = Self {
        context_offset: -1,
        output_context_offset: -1,
        word: -1,
        context_order: -1,
        output_context_order: -1,
        score: f32::NAN,
    };

    /// Build an occupied line.
    ///
    /// Without an output context, both output fields are stored as -1.
    #[inline(always)]
    pub(super) fn new(
        context_offset: i64,
        context_order: i32,
        word: i32,
        score: f32,
        output_context: Option<&OutputContext>,
    ) -> Self {
        let output = output_context.copied().unwrap_or(OutputContext::NONE);
        Self {
            context_offset,
            output_context_offset: output.offset,
            word,
            context_order,
            output_context_order: output.order,
            score,
        }
    }

    /// Returns true if this line holds a score.
    #[inline(always)]
    pub(super) fn is_occupied(&self) -> bool {
        !self.score.is_nan()
    }

    /// Returns true if an output context was stored with the score.
    #[inline(always)]
    pub(super) fn has_output_context(&self) -> bool {
        self.output_context_offset >= 0
    }

    /// Compare the stored lookup key against a query.
    #[inline(always)]
    pub(super) fn matches(&self, context_offset: i64, context_order: i32, word: i32) -> bool {
        self.word == word
            && self.context_order == context_order
            && self.context_offset == context_offset
    }

    /// The stored score. NaN if the line is empty.
    #[inline(always)]
    pub(super) fn score(&self) -> f32 {
        self.score
    }

    /// The stored output context, which may be [`OutputContext::NONE`].
    #[inline(always)]
    pub(super) fn output_context(&self) -> OutputContext {
        OutputContext::new(self.output_context_order, self.output_context_offset)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_line() {
        let line = CacheLine::EMPTY;
        assert!(!line.is_occupied());
        assert!(!line.has_output_context());
        assert!(line.score().is_nan());
    }

    #[test]
    fn stored_fields() {
        let context = OutputContext::new(3, 1 << 40);
        let line = CacheLine::new(-7, 2, 9, 0.5, Some(&context));
        assert!(line.is_occupied());
        assert!(line.has_output_context());
        assert!(line.matches(-7, 2, 9));
        assert!(!line.matches(-7, 2, 8));
        assert!(!line.matches(-7, 3, 9));
        assert!(!line.matches(7, 2, 9));
        assert_eq!(line.output_context(), context);
        assert_eq!(line.score(), 0.5);
    }

    #[test]
    fn no_output_context() {
        let line = CacheLine::new(1, 1, 1, -2.0, None);
        assert!(!line.has_output_context());
        assert_eq!(line.output_context(), OutputContext::NONE);
    }
}
