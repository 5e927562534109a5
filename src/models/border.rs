//! Parcel border sides and the keyword classifier for border descriptions.

use serde::{Deserialize, Serialize};

/// One of the four sides of a parcel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderSide {
    North,
    South,
    East,
    West,
}

impl BorderSide {
    /// Get all sides in schema order
    pub fn all() -> &'static [BorderSide] {
        &[
            BorderSide::North,
            BorderSide::South,
            BorderSide::East,
            BorderSide::West,
        ]
    }

    /// Wire/column name of the free-text description for this side.
    ///
    /// The east side keeps its historical `East_order` spelling because the
    /// model was trained on columns derived from it.
    pub fn description_field(&self) -> &'static str {
        match self {
            BorderSide::North => "NorthBorder",
            BorderSide::South => "SouthBorder",
            BorderSide::East => "East_order",
            BorderSide::West => "WestBorder",
        }
    }

    /// Column holding the border length for this side
    pub fn length_field(&self) -> &'static str {
        match self {
            BorderSide::North => "LengthFromNorth",
            BorderSide::South => "LengthFromSouth",
            BorderSide::East => "LengthFromEast",
            BorderSide::West => "LengthFromWest",
        }
    }

    /// Categorical column holding the classified border type
    pub fn type_field(&self) -> &'static str {
        match self {
            BorderSide::North => "NorthBorder_Type",
            BorderSide::South => "SouthBorder_Type",
            BorderSide::East => "East_order_Type",
            BorderSide::West => "WestBorder_Type",
        }
    }
}

/// Category a border description resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BorderType {
    Street,
    Building,
    #[serde(rename = "Empty_Plot")]
    EmptyPlot,
    Alley,
    Parking,
    #[serde(rename = "Public_space")]
    PublicSpace,
    Other,
}

impl BorderType {
    /// Category label as used in the training data
    pub fn as_str(&self) -> &'static str {
        match self {
            BorderType::Street => "Street",
            BorderType::Building => "Building",
            BorderType::EmptyPlot => "Empty_Plot",
            BorderType::Alley => "Alley",
            BorderType::Parking => "Parking",
            BorderType::PublicSpace => "Public_space",
            BorderType::Other => "Other",
        }
    }

    /// Fitted encoder vocabulary
    pub fn vocabulary() -> &'static [&'static str] {
        &[
            "Street",
            "Building",
            "Empty_Plot",
            "Alley",
            "Parking",
            "Public_space",
            "Other",
        ]
    }
}

impl std::fmt::Display for BorderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword table, checked top to bottom. The first category with a keyword
/// contained in the description wins.
pub const BORDER_KEYWORDS: &[(BorderType, &[&str])] = &[
    (
        BorderType::Street,
        &["شارع", "طريق", "Street", "street", "شوارع", "شلرع", "نافذ", "شار ع"],
    ),
    (
        BorderType::Building,
        &[
            "مبنى",
            "منزل",
            "محل",
            "بناء",
            "بيت",
            "جار",
            "مزرعة",
            "Neighbor",
            "overnmental",
            "acility",
            "مسجد",
        ],
    ),
    (
        BorderType::EmptyPlot,
        &[
            "قطعه",
            "فضاء",
            "ساحة",
            "خالي",
            "ارض",
            "أرض",
            "قطعة",
            "part",
            "Part",
            "مخطط",
            "الارض",
            "رقم",
            "الــقـــطــعــة",
            "الـقـطـعـة",
            "فناء",
            "فسحة",
            "قطة",
            "القطع",
            "برحة",
        ],
    ),
    (BorderType::Alley, &["ممر", "مشاة", "lley"]),
    (BorderType::Parking, &["سيارات", "arking", "مواقف"]),
    (BorderType::PublicSpace, &["حديقة", "ميدان", "حديقه"]),
];

/// Classify a free-text border description.
///
/// Matching is a case-insensitive substring test; descriptions matching no
/// keyword are `Other`.
pub fn classify_border(description: &str) -> BorderType {
    let haystack = description.to_lowercase();
    for (border_type, keywords) in BORDER_KEYWORDS {
        if keywords
            .iter()
            .any(|keyword| haystack.contains(&keyword.to_lowercase()))
        {
            return *border_type;
        }
    }
    BorderType::Other
}
