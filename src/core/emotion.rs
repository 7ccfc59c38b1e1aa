//! Emoji decoration of assistant replies.

use crate::core::sentiment::Sentiment;

const AFFIRMING_PREFIX: &str = "I'm glad to hear that!";
const SYMPATHETIC_PREFIX: &str = "Oh no, that sounds tough.";

fn glyph(shortcode: &str) -> &'static str {
    emojis::get_by_shortcode(shortcode)
        .map(|emoji| emoji.as_str())
        .unwrap_or_default()
}

pub fn sentiment_glyph(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => glyph("smile"),
        Sentiment::Negative => glyph("disappointed"),
        Sentiment::Neutral => glyph("neutral_face"),
    }
}

/// Text placed around a reply. Known before the reply streams in, so the
/// prefix can be shown while fragments arrive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decoration {
    pub prefix: Option<String>,
    pub suffix: Option<String>,
}

impl Decoration {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn for_sentiment(sentiment: Sentiment) -> Self {
        let glyph = sentiment_glyph(sentiment);
        match sentiment {
            Sentiment::Positive => Self {
                prefix: Some(format!("{glyph} {AFFIRMING_PREFIX} ")),
                suffix: None,
            },
            Sentiment::Negative => Self {
                prefix: Some(format!("{glyph} {SYMPATHETIC_PREFIX} ")),
                suffix: None,
            },
            Sentiment::Neutral => Self {
                prefix: None,
                suffix: Some(format!(" {glyph}")),
            },
        }
    }

    pub fn prefix(&self) -> &str {
        self.prefix.as_deref().unwrap_or_default()
    }

    pub fn suffix(&self) -> &str {
        self.suffix.as_deref().unwrap_or_default()
    }

    pub fn apply(&self, reply: &str) -> String {
        format!("{}{}{}", self.prefix(), reply, self.suffix())
    }
}

pub fn annotate(sentiment: Sentiment, reply: &str) -> String {
    Decoration::for_sentiment(sentiment).apply(reply)
}
