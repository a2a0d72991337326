//! Core card types: `CardKind`, `Card`, and the playability predicates.

use serde::{Deserialize, Serialize};

/// Unique card identity, monotonic per deck. Never reused within a session.
pub type CardId = u64;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardKind {
    Bomb,
    SeeFuture,
    Shuffle,
    Skip,
    Attack,
    Nope,
    Favor,
    Deactivate,
    TacoCat,
    RainbowCat,
    BeardCat,
    Cattermelon,
    HairyPotatoCat,
}

impl CardKind {
    /// Wild cat cards are only playable in matching groups of 2 or 3.
    pub fn is_wild(self) -> bool {
        matches!(
            self,
            CardKind::TacoCat
                | CardKind::RainbowCat
                | CardKind::BeardCat
                | CardKind::Cattermelon
                | CardKind::HairyPotatoCat
        )
    }

    /// Kinds a seat may lead a play with. Bombs only ever enter hands by
    /// drawing, Deactivates are consumed automatically on a bomb draw, and
    /// Nopes are spent inside the counter-play chain.
    pub fn is_playable(self) -> bool {
        !matches!(self, CardKind::Bomb | CardKind::Deactivate | CardKind::Nope)
    }
}

/// Immutable card identity. `id` is unique across everything a session's
/// deck ever mints.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub kind: CardKind,
}
