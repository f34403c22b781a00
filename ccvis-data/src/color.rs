use serde::{Deserialize, Serialize};

/// RGBA colour as deck.gl expects it (`[r, g, b, a]`, 0-255).
pub type Rgba = [u8; 4];

/// Colour used for categories missing from a palette.
pub const NEUTRAL_GRAY: [u8; 3] = [128, 128, 128];

pub const MALE_COLOR: [u8; 3] = [0, 128, 255];
pub const FEMALE_COLOR: [u8; 3] = [255, 0, 128];

/// Fixed lookup from category label to colour, sharing one alpha.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryPalette {
    pub entries: Vec<PaletteEntry>,
    #[serde(default = "default_alpha")]
    pub alpha: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub category: String,
    pub color: [u8; 3],
}

fn default_alpha() -> u8 {
    200
}

impl CategoryPalette {
    pub fn new(entries: &[(&str, [u8; 3])], alpha: u8) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(category, color)| PaletteEntry {
                    category: category.to_string(),
                    color: *color,
                })
                .collect(),
            alpha,
        }
    }

    /// Colour for `category`, or `None` when it is not in the table.
    pub fn lookup(&self, category: &str) -> Option<Rgba> {
        let category = category.trim();
        self.entries
            .iter()
            .find(|e| e.category == category)
            .map(|e| self.with_alpha(e.color))
    }

    /// The neutral fallback at this palette's alpha.
    pub fn fallback(&self) -> Rgba {
        self.with_alpha(NEUTRAL_GRAY)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.category.as_str())
    }

    fn with_alpha(&self, [r, g, b]: [u8; 3]) -> Rgba {
        [r, g, b, self.alpha]
    }

    /// Uses of water recorded for a concession (`USO` column).
    pub fn water_use() -> Self {
        Self::new(
            &[
                ("AGRÍCOLA", [163, 229, 104]),
                ("PÚBLICO URBANO", [66, 165, 245]),
                ("INDUSTRIAL", [239, 83, 80]),
                ("PECUARIO", [255, 202, 40]),
                ("DOMÉSTICO", [171, 71, 188]),
                ("SERVICIOS", [38, 198, 218]),
                ("ACUACULTURA", [0, 137, 123]),
                ("GENERACIÓN DE ENERGÍA ELÉCTRICA", [255, 112, 67]),
                ("AGROINDUSTRIAL", [141, 110, 99]),
                ("COMERCIO", [120, 144, 156]),
                ("DIFERENTES USOS", [236, 64, 122]),
            ],
            200,
        )
    }

    /// Gender codes of the demographic point dataset (1 = male, 2 = female).
    pub fn gender() -> Self {
        Self::new(&[("1", MALE_COLOR), ("2", FEMALE_COLOR)], 255)
    }
}
