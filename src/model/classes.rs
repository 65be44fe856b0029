use serde::Serialize;

/// Number of class bands in a land-cover mask raster. Band `i` holds class `i`.
pub const CLASS_COUNT: usize = 7;

/// Land-cover classes stored as bands 1..=7 of a class raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[repr(u8)]
pub enum LandCoverClass {
    ImperviousSurfaces = 1,
    Agriculture = 2,
    Forest = 3,
    Wetlands = 4,
    Soil = 5,
    Water = 6,
    Snow = 7,
}

impl LandCoverClass {
    pub const ALL: [LandCoverClass; CLASS_COUNT] = [
        LandCoverClass::ImperviousSurfaces,
        LandCoverClass::Agriculture,
        LandCoverClass::Forest,
        LandCoverClass::Wetlands,
        LandCoverClass::Soil,
        LandCoverClass::Water,
        LandCoverClass::Snow,
    ];

    pub fn id(self) -> u8 {
        self as u8
    }

    /// Band index holding this class. Identical to the class id.
    pub fn band(self) -> usize {
        self.id() as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            LandCoverClass::ImperviousSurfaces => "Impervious surfaces",
            LandCoverClass::Agriculture => "Agriculture",
            LandCoverClass::Forest => "Forest",
            LandCoverClass::Wetlands => "Wetlands",
            LandCoverClass::Soil => "Soil",
            LandCoverClass::Water => "Water",
            LandCoverClass::Snow => "Snow",
        }
    }

    pub fn from_id(id: i64) -> Option<Self> {
        LandCoverClass::ALL.into_iter().find(|class| class.id() as i64 == id)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        LandCoverClass::ALL.into_iter().find(|class| class.name() == name)
    }

    /// Longer class description used in chart legends.
    pub fn legend_name(self) -> &'static str {
        match self {
            LandCoverClass::ImperviousSurfaces => "Impervious Surfaces",
            LandCoverClass::Forest => "Forest and Other Vegetation",
            LandCoverClass::Snow => "Ice and Snow",
            other => other.name(),
        }
    }

    /// Legend entry used by the evolution chart.
    pub fn chart_label(self) -> String {
        format!("Class {} - {}", self.id(), self.legend_name())
    }
}

/// Human readable name for a class id. Ids outside the registry get a generated label.
pub fn name_of(class_id: i64) -> String {
    match LandCoverClass::from_id(class_id) {
        Some(class) => class.name().to_string(),
        None => format!("Unknown Class ({})", class_id),
    }
}

pub fn id_of(name: &str) -> Option<u8> {
    LandCoverClass::from_name(name).map(LandCoverClass::id)
}
