//! Human-readable names for the numeric codes carried by HK macro calls.
//!
//! The model keeps every code as an opaque number; these tables only decide
//! how a code is displayed. Unknown codes display as `Unknown (<n>)`.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! code_table {
    (
        $(#[$meta:meta])*
        $name:ident { $($code:literal => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i32);

        impl $name {
            /// Table label, or `None` when the code is not in the table
            pub fn label(&self) -> Option<&'static str> {
                match self.0 {
                    $($code => Some($label),)+
                    _ => None,
                }
            }

            pub fn is_known(&self) -> bool {
                self.label().is_some()
            }
        }

        impl From<f64> for $name {
            fn from(value: f64) -> Self {
                Self(value as i32)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self.label() {
                    Some(label) => write!(f, "{}", label),
                    None => write!(f, "Unknown ({})", self.0),
                }
            }
        }
    };
}

code_table! {
    /// Sheet material (first `HKLDB` argument)
    MaterialType {
        1 => "MS (Mild Steel)",
        2 => "STS (Stainless Steel)",
        3 => "AL (Aluminum)",
        4 => "BRASS",
        5 => "COPPER",
        9 => "USER",
    }
}

code_table! {
    /// Assist gas (third `HKLDB` argument)
    AssistGas {
        1 => "O2 (Oxygen)",
        2 => "N2 (Nitrogen)",
        3 => "AIR",
    }
}

code_table! {
    /// Piercing strategy of a contour (first `HKSTR` argument)
    PiercingType {
        0 => "No Piercing",
        1 => "Normal Piercing",
        4 => "User Defined",
        10 => "Shot Marking",
        11 => "Repeat Piercing",
    }
}

code_table! {
    /// Cutting strategy of a contour (second `HKSTR` argument)
    CuttingType {
        0 => "None",
        1 => "Normal Cutting",
        2 => "Pulse Cutting",
        10 => "Marking (Engraving)",
        11 => "Repeat Cutting",
    }
}

impl PiercingType {
    /// Remnant cuts and contours that continue a previous pierce
    pub const NONE: PiercingType = PiercingType(0);

    /// Whether the contour starts with a pierce at its piercing position
    pub fn pierces(&self) -> bool {
        self.0 > 0
    }
}

impl CuttingType {
    /// Marking passes engrave instead of cutting through
    pub fn is_marking(&self) -> bool {
        self.0 == 10
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_display_labels() {
        assert_eq!(MaterialType(2).to_string(), "STS (Stainless Steel)");
        assert_eq!(AssistGas(2).to_string(), "N2 (Nitrogen)");
        assert_eq!(PiercingType(10).to_string(), "Shot Marking");
        assert_eq!(CuttingType(2).to_string(), "Pulse Cutting");
    }

    #[test]
    fn test_unknown_codes_are_carried_through() {
        let material = MaterialType(42);
        assert!(!material.is_known());
        assert_eq!(material.to_string(), "Unknown (42)");
        assert_eq!(material.0, 42);
    }

    #[test]
    fn test_from_lenient_float() {
        assert_eq!(CuttingType::from(10.0), CuttingType(10));
        assert!(CuttingType::from(10.0).is_marking());
        assert!(!PiercingType::NONE.pierces());
        assert!(PiercingType::from(1.0).pierces());
    }

    #[test]
    fn test_codes_serialize_as_plain_numbers() {
        let json = serde_json::to_string(&AssistGas(3)).unwrap();
        assert_eq!(json, "3");
    }
}
