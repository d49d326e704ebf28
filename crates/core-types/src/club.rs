//! Static content for the club history page.

use serde::Serialize;

/// Paragraphs of the history page, in display order.
pub const CLUB_HISTORY: &[&str] = &[
    "Real Madrid Club de Fútbol is a football club based in Madrid, Spain, founded in 1902. \
     It has grown into one of the most successful and prestigious clubs in the world, \
     in Spain and internationally.",
    "The club has been home to some of the best footballers ever: Alfredo Di Stéfano, who led \
     it to five consecutive European Cups; Cristiano Ronaldo, its all-time top scorer; and \
     Zinedine Zidane, who won three consecutive Champions League titles as manager.",
    "Its supporters, Los Blancos, are spread across every corner of the globe.",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Achievement {
    pub title: &'static str,
    pub count: u32,
}

pub const ACHIEVEMENTS: &[Achievement] = &[
    Achievement {
        title: "La Liga Titles",
        count: 36,
    },
    Achievement {
        title: "UEFA Champions League Titles",
        count: 15,
    },
    Achievement {
        title: "Copa del Rey Titles",
        count: 20,
    },
    Achievement {
        title: "Supercopa de España Titles",
        count: 13,
    },
    Achievement {
        title: "UEFA Super Cups",
        count: 6,
    },
    Achievement {
        title: "UEFA Cups",
        count: 2,
    },
    Achievement {
        title: "Intercontinental Cups",
        count: 3,
    },
    Achievement {
        title: "FIFA Club World Cups",
        count: 5,
    },
    Achievement {
        title: "Copa Eva Duarte",
        count: 1,
    },
    Achievement {
        title: "Copa de la Liga",
        count: 1,
    },
    Achievement {
        title: "Latin Cups",
        count: 2,
    },
    Achievement {
        title: "Copa Iberoamericana",
        count: 1,
    },
];
