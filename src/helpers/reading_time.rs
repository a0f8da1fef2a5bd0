//! Reading time estimate

use crate::config::ReadingTimePolicy;
use crate::content::ContentSection;

/// Words in a section: its heading plus the plain text of its body
pub fn section_words(section: &ContentSection) -> usize {
    format!("{} {}", section.heading, section.body_text())
        .split_whitespace()
        .count()
}

/// Estimated minutes to read `sections`
///
/// Rounds up to whole minutes. Non-empty content always takes at least one
/// minute; no content takes zero. Both policies count words of the plain
/// text, so markup never adds to the estimate.
pub fn estimate(
    sections: &[ContentSection],
    words_per_minute: usize,
    policy: ReadingTimePolicy,
) -> usize {
    if sections.is_empty() {
        return 0;
    }

    let words = match policy {
        ReadingTimePolicy::Summed => sections.iter().map(section_words).sum(),
        ReadingTimePolicy::LastSection => sections
            .iter()
            .fold(0, |_previous, section| section_words(section)),
    };

    words.div_ceil(words_per_minute.max(1)).max(1)
}
