//! Facility types an Emergency Interim Housing site can host.
//!
//! # Examples
//! ```
//! use placewell_core::FacilityType;
//!
//! assert_eq!(FacilityType::EmergencyShelter.as_str(), "Emergency Shelter");
//! assert_eq!(
//!     "transitional-housing".parse::<FacilityType>(),
//!     Ok(FacilityType::TransitionalHousing)
//! );
//! ```

use crate::site::RadiusBand;

/// The closed set of facility types understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum FacilityType {
    /// Short-stay shelter operated under a temporary use permit.
    TemporaryShelter,
    /// Time-limited housing with a pathway to permanent placement.
    TransitionalHousing,
    /// Permanent housing paired with on-site services.
    SupportiveHousing,
    /// Immediate overnight shelter.
    EmergencyShelter,
}

impl FacilityType {
    /// Every facility type, in display order.
    pub const ALL: [Self; 4] = [
        Self::TemporaryShelter,
        Self::TransitionalHousing,
        Self::SupportiveHousing,
        Self::EmergencyShelter,
    ];

    /// Return the human-readable label.
    ///
    /// # Examples
    /// ```
    /// use placewell_core::FacilityType;
    ///
    /// assert_eq!(FacilityType::SupportiveHousing.as_str(), "Supportive Housing");
    /// ```
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TemporaryShelter => "Temporary Shelter",
            Self::TransitionalHousing => "Transitional Housing",
            Self::SupportiveHousing => "Supportive Housing",
            Self::EmergencyShelter => "Emergency Shelter",
        }
    }

    /// Service radius band operators typically plan for this facility type.
    #[must_use]
    pub const fn recommended_radius(&self) -> RadiusBand {
        match self {
            Self::TemporaryShelter => RadiusBand::new(2.0, 5.0),
            Self::TransitionalHousing => RadiusBand::new(3.0, 7.0),
            Self::SupportiveHousing => RadiusBand::new(5.0, 10.0),
            Self::EmergencyShelter => RadiusBand::new(1.0, 3.0),
        }
    }
}

impl std::fmt::Display for FacilityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FacilityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised: String = s
            .trim()
            .chars()
            .map(|ch| match ch {
                '-' | '_' => ' ',
                other => other.to_ascii_lowercase(),
            })
            .collect();
        match normalised.as_str() {
            "temporary shelter" => Ok(Self::TemporaryShelter),
            "transitional housing" => Ok(Self::TransitionalHousing),
            "supportive housing" => Ok(Self::SupportiveHousing),
            "emergency shelter" => Ok(Self::EmergencyShelter),
            _ => Err(format!("unknown facility type '{s}'")),
        }
    }
}
