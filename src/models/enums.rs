use serde::{Deserialize, Serialize};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(RiskLabel {
    Low => "Low",
    High => "High",
    Normal => "Normal",
});

str_enum!(HealthStatus {
    Excellent => "Excellent",
    Good => "Good",
    Fair => "Fair",
    Poor => "Poor",
});

// Order of declaration is lookup priority.
str_enum!(MatchTier {
    Exact => "exact",
    Code => "code",
    Unit => "unit",
    PartialCode => "partial_code",
    PartialUnit => "partial_unit",
    Name => "name",
});

str_enum!(RangeSource {
    InlineUpper => "inline_upper",
    InlineLower => "inline_lower",
    InlineBand => "inline_band",
    Everlab => "everlab",
});

impl MatchTier {
    /// Only code/unit tiers are trusted enough to threshold a value.
    pub fn can_classify(&self) -> bool {
        !matches!(self, Self::Name)
    }
}
