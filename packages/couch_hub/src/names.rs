//! Human-readable room names
//!
//! Rooms get pronounceable adjective-color-animal triples so a host screen
//! can show the code and players can type it. The generator makes no
//! uniqueness promise; the registry re-rolls on collision.

use rand::Rng;
use room_relay::NameGenerator;

const ADJECTIVES: &[&str] = &[
    "brave", "calm", "clever", "daring", "eager", "fancy", "gentle", "happy", "jolly", "keen",
    "lively", "lucky", "merry", "nimble", "plucky", "proud", "quick", "quiet", "sly", "snappy",
    "sturdy", "sunny", "swift", "witty",
];

const COLORS: &[&str] = &[
    "amber", "azure", "coral", "crimson", "golden", "indigo", "ivory", "jade", "lilac", "maroon",
    "olive", "pearl", "ruby", "sage", "scarlet", "silver", "teal", "violet",
];

const ANIMALS: &[&str] = &[
    "badger", "bison", "crane", "dingo", "falcon", "ferret", "gecko", "heron", "ibex", "lemur",
    "lynx", "marmot", "otter", "panda", "puffin", "raven", "stoat", "tapir", "toucan", "wombat",
];

/// Room-name generator handed to the relay hub.
pub fn room_names() -> NameGenerator {
    Box::new(|| {
        let mut rng = rand::rng();
        format!(
            "{}-{}-{}",
            ADJECTIVES[rng.random_range(0..ADJECTIVES.len())],
            COLORS[rng.random_range(0..COLORS.len())],
            ANIMALS[rng.random_range(0..ANIMALS.len())],
        )
    })
}
