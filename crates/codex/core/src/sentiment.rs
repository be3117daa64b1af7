//! How factions feel about each other.

use std::collections::{BTreeMap, BTreeSet};

/// Disposition of one faction toward another.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
pub enum Sentiment {
    Positive,
    Negative,
    #[default]
    Neutral,
}

/// A contradictory sentiment declaration, detected at build time.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("contradictory sentiment between `{a}` and `{b}`: {reason}")]
pub struct SentimentConflict {
    pub a: String,
    pub b: String,
    pub reason: &'static str,
}

impl SentimentConflict {
    fn new(a: &str, b: &str, reason: &'static str) -> Self {
        Self {
            a: a.to_string(),
            b: b.to_string(),
            reason,
        }
    }
}

/// Accumulates sentiment declarations, possibly from several chart records,
/// then validates them as a whole.
///
/// Validation runs in [`SentimentChartBuilder::build`] rather than on
/// insertion so the outcome does not depend on declaration order.
#[derive(Debug, Default)]
pub struct SentimentChartBuilder {
    mutual_pos: BTreeSet<(String, String)>,
    mutual_neg: BTreeSet<(String, String)>,
    onesided_neg: BTreeMap<String, BTreeSet<String>>,
}

impl SentimentChartBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares that `a` and `b` like each other (order irrelevant).
    pub fn mutual_pos(&mut self, a: &str, b: &str) {
        self.mutual_pos.insert(unordered(a, b));
    }

    /// Declares that `a` and `b` resent each other (order irrelevant).
    pub fn mutual_neg(&mut self, a: &str, b: &str) {
        self.mutual_neg.insert(unordered(a, b));
    }

    /// Declares that `feeler` resents `target`, with no reciprocity.
    pub fn onesided_neg(&mut self, feeler: &str, target: &str) {
        self.onesided_neg
            .entry(feeler.to_string())
            .or_default()
            .insert(target.to_string());
    }

    /// Validates the accumulated declarations and produces the queryable
    /// chart.
    pub fn build(self) -> Result<SentimentChart, SentimentConflict> {
        for (a, b) in self.mutual_pos.iter().chain(&self.mutual_neg) {
            if a == b {
                return Err(SentimentConflict::new(
                    a,
                    b,
                    "a faction cannot hold mutual sentiment with itself",
                ));
            }
        }
        for (feeler, targets) in &self.onesided_neg {
            if targets.contains(feeler) {
                return Err(SentimentConflict::new(
                    feeler,
                    feeler,
                    "a faction cannot resent itself",
                ));
            }
        }
        if let Some((a, b)) = self.mutual_pos.intersection(&self.mutual_neg).next() {
            return Err(SentimentConflict::new(
                a,
                b,
                "pair declared in both mutual_pos and mutual_neg",
            ));
        }
        for (a, b) in &self.mutual_neg {
            let onesided = |x: &str, y: &str| {
                self.onesided_neg
                    .get(x)
                    .is_some_and(|targets| targets.contains(y))
            };
            if onesided(a, b) || onesided(b, a) {
                return Err(SentimentConflict::new(
                    a,
                    b,
                    "mutual_neg pair also declared in onesided_neg",
                ));
            }
        }

        tracing::debug!(
            "sentiment chart: {} mutual pairs, {} one-sided feelers",
            self.mutual_pos.len() + self.mutual_neg.len(),
            self.onesided_neg.len()
        );

        let mut mutual = BTreeMap::new();
        for pair in self.mutual_pos {
            mutual.insert(pair, Sentiment::Positive);
        }
        for pair in self.mutual_neg {
            mutual.insert(pair, Sentiment::Negative);
        }
        Ok(SentimentChart {
            mutual,
            onesided_neg: self.onesided_neg,
        })
    }
}

/// The queryable faction sentiment relation.
///
/// Mutual declarations are symmetric; one-sided declarations are
/// directional. Any pair never mentioned is neutral.
#[derive(Debug, Default)]
pub struct SentimentChart {
    mutual: BTreeMap<(String, String), Sentiment>,
    onesided_neg: BTreeMap<String, BTreeSet<String>>,
}

impl SentimentChart {
    /// How `me` feels about `other`.
    pub fn sentiment(&self, me: &str, other: &str) -> Sentiment {
        if let Some(&sentiment) = self.mutual.get(&unordered(me, other)) {
            return sentiment;
        }
        if self
            .onesided_neg
            .get(me)
            .is_some_and(|targets| targets.contains(other))
        {
            return Sentiment::Negative;
        }
        Sentiment::Neutral
    }

    /// True when no sentiment was declared at all.
    pub fn is_empty(&self) -> bool {
        self.mutual.is_empty() && self.onesided_neg.is_empty()
    }
}

fn unordered(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutual_sentiment_is_symmetric() {
        let mut builder = SentimentChartBuilder::new();
        builder.mutual_pos("lumiere", "sherato");
        builder.mutual_neg("lumiere", "beasts");
        let chart = builder.build().unwrap();

        assert_eq!(chart.sentiment("lumiere", "sherato"), Sentiment::Positive);
        assert_eq!(chart.sentiment("sherato", "lumiere"), Sentiment::Positive);
        assert_eq!(chart.sentiment("beasts", "lumiere"), Sentiment::Negative);
    }

    #[test]
    fn onesided_sentiment_is_directional() {
        let mut builder = SentimentChartBuilder::new();
        builder.onesided_neg("lumiere", "inunus");
        let chart = builder.build().unwrap();

        assert_eq!(chart.sentiment("lumiere", "inunus"), Sentiment::Negative);
        assert_eq!(chart.sentiment("inunus", "lumiere"), Sentiment::Neutral);
    }

    #[test]
    fn unmentioned_pairs_are_neutral() {
        let chart = SentimentChartBuilder::new().build().unwrap();
        assert!(chart.is_empty());
        assert_eq!(chart.sentiment("anyone", "anybody"), Sentiment::Neutral);
    }

    #[test]
    fn contradictory_mutual_declarations_are_rejected() {
        let mut builder = SentimentChartBuilder::new();
        builder.mutual_pos("lumiere", "sherato");
        builder.mutual_neg("sherato", "lumiere");
        assert!(builder.build().is_err());
    }

    #[test]
    fn mutual_neg_overlapping_onesided_is_rejected() {
        let mut builder = SentimentChartBuilder::new();
        builder.mutual_neg("lumiere", "inunus");
        builder.onesided_neg("inunus", "lumiere");
        assert!(builder.build().is_err());
    }

    #[test]
    fn self_sentiment_is_rejected() {
        let mut builder = SentimentChartBuilder::new();
        builder.mutual_pos("lumiere", "lumiere");
        assert!(builder.build().is_err());

        let mut builder = SentimentChartBuilder::new();
        builder.onesided_neg("inunus", "inunus");
        assert!(builder.build().is_err());
    }

    #[test]
    fn conflict_detection_is_order_independent() {
        // onesided edge recorded before the mutual pair it contradicts
        let mut builder = SentimentChartBuilder::new();
        builder.onesided_neg("lumiere", "inunus");
        builder.mutual_neg("lumiere", "inunus");
        assert!(builder.build().is_err());
    }
}
