use super::model::{Catalog, Track, TrackId};

/// Tags offered as quick filters in the store header.
pub const FEATURED_TAGS: [&str; 4] = ["TRAP", "HIP-HOP", "PHONK", "DRILL"];

/// One shipped listing before it becomes a `Track`.
struct BeatRow {
    id: &'static str,
    title: &'static str,
    bpm: u32,
    key: &'static str,
    price: f64,
    /// Number of the SoundHelix demo song used as the preview.
    song: u32,
    artwork: &'static str,
    tags: &'static [&'static str],
    description: &'static str,
}

const BEATS: [BeatRow; 6] = [
    BeatRow {
        id: "1",
        title: "TIBERIUM RUSH",
        bpm: 145,
        key: "F# Min",
        price: 29.99,
        song: 1,
        artwork: "photo-1614613535308-eb5fbd3d2c17",
        tags: &["Trap", "Aggressive", "Industrial"],
        description: "Heavy-hitting munitions for the front lines. Distorted 808s and aggressive lead synths.",
    },
    BeatRow {
        id: "2",
        title: "GDI STRATEGY",
        bpm: 128,
        key: "C Maj",
        price: 34.99,
        song: 2,
        artwork: "photo-1514525253344-f814d871d111",
        tags: &["Hip-Hop", "Melodic", "Success"],
        description: "Triumphant brass sections and precision-engineered percussion. Command respect.",
    },
    BeatRow {
        id: "3",
        title: "NOD STEALTH",
        bpm: 160,
        key: "D# Min",
        price: 24.99,
        song: 3,
        artwork: "photo-1511671782779-c97d3d27a1d4",
        tags: &["Dark", "Phonk", "Aggressive"],
        description: "Cloaked in darkness. Fast high-hats and eerie atmospheric layers for late-night ops.",
    },
    BeatRow {
        id: "4",
        title: "ION CANNON",
        bpm: 140,
        key: "A Min",
        price: 49.99,
        song: 4,
        artwork: "photo-1598488035139-bdbb2231ce04",
        tags: &["Trap", "Space", "Future"],
        description: "Orbital strike of bass. Atmospheric textures combined with modern bounce.",
    },
    BeatRow {
        id: "5",
        title: "HARVESTER DRILL",
        bpm: 142,
        key: "E Min",
        price: 29.99,
        song: 5,
        artwork: "photo-1520523839897-bd0b52f945a0",
        tags: &["Drill", "Gritty", "UK"],
        description: "Technical high-hat patterns and sliding 808s engineered for the concrete jungle.",
    },
    BeatRow {
        id: "6",
        title: "COMMANDER PROTOCOL",
        bpm: 95,
        key: "G Min",
        price: 39.99,
        song: 6,
        artwork: "photo-1557683316-973673baf926",
        tags: &["Soulful", "Smooth", "Vinyl"],
        description: "Classic soulful groove with a tactical edge. Strategic sample flip for high-tier lyricism.",
    },
];

impl From<&BeatRow> for Track {
    fn from(row: &BeatRow) -> Self {
        Track {
            id: TrackId::new(row.id),
            title: row.title.to_string(),
            bpm: row.bpm,
            key: row.key.to_string(),
            price: row.price,
            preview: format!("SoundHelix-Song-{}.mp3", row.song),
            artwork: format!(
                "https://images.unsplash.com/{}?auto=format&fit=crop&q=80&w=800",
                row.artwork
            ),
            tags: row.tags.iter().map(|t| t.to_string()).collect(),
            description: row.description.to_string(),
        }
    }
}

impl Catalog {
    /// The store's shipped listing. Preview locators are relative to the media directory.
    pub fn builtin() -> Self {
        Self::from_validated(BEATS.iter().map(Track::from).collect())
    }
}
