//! Built-in game content
//!
//! Level layouts, the tile legend, the intro script and the trivia pool.
//! Sprite and sound ids are stable strings resolved by the presentation layer.
//!
//! Tile legend:
//!   '=' = Brick wall        '#' = Grass barrier
//!   '@' = Player spawn      '|' = Portal
//!   '^' = Key               '&' = Patrolling ghost
//!   ' ' = Empty

use crate::consts::{GHOST_SIZE, KEY_SIZE, PLAYER_SIZE};
use crate::sim::entity::EntityKind;
use crate::sim::patrol::BehaviorSpec;
use crate::sim::tilemap::{Archetype, Legend};

/// A level layout: rows of legend characters
pub type LevelMap = &'static [&'static str];

pub const LEVELS: &[LevelMap] = &[
    &[
        "====================",
        "=@                ^=",
        "=                  =",
        "=#####        #####=",
        "=#####         ####=",
        "=####   #    #  ###=",
        "=^          &      =",
        "=                  =",
        "=     ######      ^=",
        "=      #####       =",
        "=     #####        =",
        "=                  =",
        "=^             ####=",
        "=                  =",
        "=       ####       =",
        "=     & #  #      ^=",
        "=       ####       =",
        "=                  =",
        "=                  =",
        "=^    ###          =",
        "=    #####        |=",
        "====================",
    ],
    &[
        "====================",
        "=@                ^=",
        "=                  =",
        "=      ######      =",
        "=    ##      ##    =",
        "=   ##  ^#    ##   =",
        "=^   #        #    =",
        "=     #      #     =",
        "=      #    #     ^=",
        "=&                 =",
        "=####           ###=",
        "=               ###=",
        "=^                 =",
        "=       ####       =",
        "=     &##  ##     ^=",
        "=       ####       =",
        "=           &      =",
        "=                  =",
        "=                 |=",
        "====================",
    ],
    &[
        "====================",
        "=@                 =",
        "=      ^    ^      =",
        "=     #      #     =",
        "=    #        #    =",
        "=   #     &    #   =",
        "=   #          #   =",
        "=    #        #    =",
        "=     #      #     =",
        "=      #  ^ #      =",
        "=       #  #       =",
        "=   &    ##    &   =",
        "=        ##        =",
        "=       #  #       =",
        "=      #    #      =",
        "=     #      #     =",
        "=  ^ #        #    =",
        "=                  =",
        "=      ^   ^      |=",
        "====================",
    ],
];

pub mod sprites {
    pub const PLAYER: &str = "player";
    pub const INSTRUCTOR: &str = "instructor";
    pub const PORTAL: &str = "portal";
    pub const BRICK: &str = "grass";
    pub const GRASS: &str = "veggy";
    pub const GHOST: &str = "ghost";
    pub const KEY: &str = "key";

    /// Player animation names
    pub const ANIM_IDLE: &str = "idle";
    pub const ANIM_RUN: &str = "run";

    pub const ALL: &[&str] = &[PLAYER, INSTRUCTOR, PORTAL, BRICK, GRASS, GHOST, KEY];
}

pub mod sounds {
    pub const SCORE: &str = "score";
    pub const WON: &str = "won";
    pub const WEAK: &str = "weak";
    pub const PORTAL: &str = "portalsound";
    pub const BACKGROUND: &str = "backgroundaudio";

    pub const ALL: &[&str] = &[SCORE, WON, WEAK, PORTAL, BACKGROUND];
}

/// Post-effect shader id
pub const LIGHT_EFFECT: &str = "light";

pub const MENU_TITLE: &str = "Hidden Realms";
pub const START_LABEL: &str = "Start";
pub const WIN_TITLE: &str = "Know a Fact";
pub const PORTAL_LOCKED_HINT: &str = "collect all the keys!";

/// Legend used by the built-in levels
pub fn standard_legend(patrol_speed: f32) -> Legend {
    Legend::new()
        .with('=', Archetype::new(EntityKind::Wall, sprites::BRICK))
        .with('#', Archetype::new(EntityKind::Wall, sprites::GRASS))
        .with(
            '@',
            Archetype::new(EntityKind::Player, sprites::PLAYER)
                .with_size(PLAYER_SIZE)
                .dynamic(),
        )
        .with('|', Archetype::new(EntityKind::Portal, sprites::PORTAL))
        .with(
            '^',
            Archetype::new(EntityKind::Key, sprites::KEY).with_size(KEY_SIZE),
        )
        .with(
            '&',
            Archetype::new(EntityKind::Ghost, sprites::GHOST)
                .with_size(GHOST_SIZE)
                .with_behavior(BehaviorSpec::Patrol {
                    speed: patrol_speed,
                    direction: 1.0,
                }),
        )
}

/// Intro dialog: (speaker sprite, line)
pub const INTRO_SCRIPT: &[(&str, &str)] = &[
    (sprites::INSTRUCTOR, "Discover hidden facts in a mysterious realm.!"),
    (sprites::INSTRUCTOR, "Collect 6 keys 🔑 to unlock the portal."),
    (sprites::INSTRUCTOR, "Beware of ghosts 👻 that reset your progress!"),
    (sprites::INSTRUCTOR, "Navigate through stone walls and grass barriers."),
    (sprites::INSTRUCTOR, "Your light is your guide in the darkness."),
    (sprites::INSTRUCTOR, "Complete all levels to know the real fact."),
];

/// Shown one at a time on the win screen
pub const FACTS: &[&str] = &[
    "Traces of birch bark tar, believed to be the world's oldest chewing gum, were found in Finland dating back over 9,000 years. Apparently, our ancestors enjoyed a good chew too!",
    "Despite all the proposed explanations, the exact cause of hiccups remains a scientific mystery. They're usually harmless and short-lived, but can be quite annoying!",
    "While dreams can be very vivid and involve sounds, the actual dreaming process is silent. Any sounds you perceive are created by your brain after you wake up.",
    "Believe it or not, the world's largest living organism isn't an animal, but a fungus! The humongous fungus covers over 2,000 acres of forest in Oregon.",
    "There are actually different cloud types classified by their shape and altitude. Next time you're gazing at the sky, see if you can identify any cirrus, cumulus, or stratus clouds!",
    "Ever notice how a yawn from one person can make others yawn too? Scientists believe it's a social signal promoting empathy and group cohesion.",
    "Gold is one of the most malleable elements, meaning it can be hammered into thin sheets without breaking. This property makes it ideal for jewelry and other decorative items.",
    "The world's population is constantly growing, with estimates suggesting it will reach around 8 billion people by the end of 2024.",
    "Koalas have very similar ridged patterns on their paws as humans do on their fingers. Unfortunately, this wouldn't hold up in a courtroom (koala court presumably being much more chill).",
    "The population of the Earth is about the same as the number of chickens. That's a lot of clucking around!",
    "Butterflies taste with their feet. Imagine tiny taste buds on tiny little feet!",
    "Dolphins give each other names by whistling. Scientists believe these whistles are unique identifiers for each dolphin.",
    "A group of owls is called a parliament. Apparently, owls are very wise... and apparently very fond of debate?",
    "According to a survey, 41% of Americans believe Bigfoot is real. There you have it, folks - more people believe in Bigfoot than can correctly identify it on a map.",
];
