// Room catalog: the fixed price and label table behind every quote

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// Room types offered on the booking form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    Standard,
    Deluxe,
    Suite,
}

impl RoomType {
    pub const ALL: [RoomType; 3] = [RoomType::Standard, RoomType::Deluxe, RoomType::Suite];

    // Identifier used by the form's select element
    pub fn id(&self) -> &'static str {
        match self {
            RoomType::Standard => "standard",
            RoomType::Deluxe => "deluxe",
            RoomType::Suite => "suite",
        }
    }

    // Parses a select value. Blank or unknown identifiers mean "no room type chosen".
    pub fn from_form_value(value: &str) -> Option<Self> {
        value.trim().parse().ok()
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown room type: {0}")]
pub struct UnknownRoomType(pub String);

impl FromStr for RoomType {
    type Err = UnknownRoomType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoomType::ALL
            .into_iter()
            .find(|room| room.id() == s)
            .ok_or_else(|| UnknownRoomType(s.to_string()))
    }
}

// Nightly rate and display label for one room type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomRate {
    pub room_type: RoomType,
    pub price_per_night: u64,
    pub label: &'static str,
}

#[derive(Debug)]
pub struct RoomCatalog {
    rates: [RoomRate; 3],
}

static CATALOG: RoomCatalog = RoomCatalog {
    rates: [
        RoomRate {
            room_type: RoomType::Standard,
            price_per_night: 8_500,
            label: "Standard Room",
        },
        RoomRate {
            room_type: RoomType::Deluxe,
            price_per_night: 12_500,
            label: "Deluxe Room",
        },
        RoomRate {
            room_type: RoomType::Suite,
            price_per_night: 18_500,
            label: "Executive Suite",
        },
    ],
};

impl RoomCatalog {
    // Process-wide catalog, never mutated
    pub fn global() -> &'static RoomCatalog {
        &CATALOG
    }

    pub fn rate(&self, room_type: RoomType) -> &RoomRate {
        // `rates` is ordered like `RoomType::ALL`
        &self.rates[room_type as usize]
    }

    pub fn price_per_night(&self, room_type: RoomType) -> u64 {
        self.rate(room_type).price_per_night
    }

    pub fn label(&self, room_type: RoomType) -> &'static str {
        self.rate(room_type).label
    }

    pub fn rates(&self) -> impl Iterator<Item = &RoomRate> {
        self.rates.iter()
    }
}
