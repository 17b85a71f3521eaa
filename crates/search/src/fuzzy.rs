use kinship_names::NameNormalizer;
use nucleo_matcher::pattern::{CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Matcher, Utf32String};

/// Highest bonus a birth place can contribute to a candidate score
pub const MAX_PLACE_SCORE: u32 = 15;

/// Fuzzy birth-place comparison using nucleo-matcher.
///
/// Both places are simplified first so that scripts and accents do not
/// matter; the raw nucleo score is scaled against the query matched with
/// itself.
pub struct PlaceScorer<'a> {
    normalizer: &'a NameNormalizer,
    matcher: Matcher,
}

impl<'a> PlaceScorer<'a> {
    pub fn new(normalizer: &'a NameNormalizer) -> Self {
        Self {
            normalizer,
            matcher: Matcher::new(nucleo_matcher::Config::DEFAULT),
        }
    }

    /// Score in `0..=MAX_PLACE_SCORE`
    pub fn score(&mut self, query: &str, candidate: &str) -> u32 {
        let query = self.normalizer.simplify(query);
        let candidate = self.normalizer.simplify(candidate);
        if query.is_empty() || candidate.is_empty() {
            return 0;
        }

        let pattern = Pattern::parse(&query, CaseMatching::Ignore, Normalization::Smart);

        let own = Utf32String::from(query.as_str());
        let Some(best) = pattern.score(own.slice(..), &mut self.matcher) else {
            return 0;
        };
        if best == 0 {
            return 0;
        }

        let haystack = Utf32String::from(candidate.as_str());
        let score = pattern
            .score(haystack.slice(..), &mut self.matcher)
            .unwrap_or(0)
            .min(best);

        score * MAX_PLACE_SCORE / best
    }
}
