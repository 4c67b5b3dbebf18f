//! Seeded five-slot palette draft.
//!
//! Draw order is part of the contract: every draw advances the stream, so reordering the
//! steps changes every later pick.
use tracing::debug;

use crate::palette::{Mood, MoodPools, Palette, Rgb};
use crate::random::SeededRandom;

/// Season above which the palette opens on a dark anchor.
pub const DARK_SEASON_THRESHOLD: f64 = 0.6;
/// Entropy above which the last two slots are both vibrant.
pub const VIBRANT_ENTROPY_THRESHOLD: f64 = 0.5;

/// Drafts a palette from the default pools.
///
/// `sentiment` is accepted so callers can pass the full signal set, but it does not
/// influence the draft.
pub fn draft(season: f64, sentiment: f64, entropy: f64, rng: &mut SeededRandom) -> Palette {
    draft_from(&MoodPools::default(), season, sentiment, entropy, rng)
}

/// Drafts a palette from `pools`.
///
/// Slots, in draw order:
/// 0. dark anchor when `season > 0.6`, else light
/// 1. vibrant
/// 2. the opposite anchor of slot 0
/// 3. and 4. two vibrant when `entropy > 0.5`, else light then dark
pub fn draft_from(
    pools: &MoodPools,
    season: f64,
    sentiment: f64,
    entropy: f64,
    rng: &mut SeededRandom,
) -> Palette {
    let (first, third) = if season > DARK_SEASON_THRESHOLD {
        (Mood::Dark, Mood::Light)
    } else {
        (Mood::Light, Mood::Dark)
    };
    let tail = if entropy > VIBRANT_ENTROPY_THRESHOLD {
        [Mood::Vibrant, Mood::Vibrant]
    } else {
        [Mood::Light, Mood::Dark]
    };

    let order = [first, Mood::Vibrant, third, tail[0], tail[1]];
    let mut colors = [Rgb::default(); 5];
    for (slot, mood) in colors.iter_mut().zip(order) {
        *slot = pools.pick(mood, rng);
    }

    let palette = Palette(colors);
    debug!(
        "Drafted palette {} (season={season}, entropy={entropy}, sentiment={sentiment} unused).",
        palette
    );
    palette
}
