//! Fixed vocabularies used by records.
//!
//! Each enum persists as its snake_case wire name and displays as a
//! human-readable label. `FromStr` accepts either form.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $($variant:ident => $wire:literal, $label:literal;)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Persisted name.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == s || v.label().eq_ignore_ascii_case(s))
                    .ok_or_else(|| {
                        let known: Vec<&str> = Self::ALL.iter().map(|v| v.as_str()).collect();
                        ValidationError::new(
                            $field,
                            format!("unknown value '{}' (expected one of: {})", s, known.join(", ")),
                        )
                    })
            }
        }
    };
}

vocabulary! {
    /// Insurance product a client holds or a sale covers.
    PlanType, "planType" {
        HealthPlan => "health_plan", "Health plan";
        DentalPlan => "dental_plan", "Dental plan";
        LifeInsurance => "life_insurance", "Life insurance";
        AutoInsurance => "auto_insurance", "Auto insurance";
        HomeInsurance => "home_insurance", "Home insurance";
        SpecialInsurance => "special_insurance", "Special insurance";
        Other => "other", "Other";
    }
}

vocabulary! {
    AppointmentKind, "type" {
        VehicleInspection => "vehicle_inspection", "Vehicle inspection";
        InsuranceInspection => "insurance_inspection", "Insurance inspection";
        DocumentDelivery => "document_delivery", "Document delivery";
        TrackerInstallation => "tracker_installation", "Tracker installation";
        TrackerReplacement => "tracker_replacement", "Tracker replacement";
        Other => "other", "Other";
    }
}

vocabulary! {
    /// Appointment lifecycle. Appointments are created `Scheduled` and no
    /// other transition exists yet.
    AppointmentStatus, "status" {
        Scheduled => "scheduled", "Scheduled";
    }
}

vocabulary! {
    SaleStatus, "status" {
        Pending => "pending", "Pending";
        Approved => "approved", "Approved";
        Cancelled => "cancelled", "Cancelled";
    }
}

vocabulary! {
    QuoteStatus, "status" {
        Pending => "pending", "Pending";
        Approved => "approved", "Approved";
        Rejected => "rejected", "Rejected";
        Expired => "expired", "Expired";
    }
}

impl Default for SaleStatus {
    fn default() -> Self {
        SaleStatus::Pending
    }
}

impl Default for QuoteStatus {
    fn default() -> Self {
        QuoteStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_wire_and_label() {
        assert_eq!("life_insurance".parse::<PlanType>().unwrap(), PlanType::LifeInsurance);
        assert_eq!("Life insurance".parse::<PlanType>().unwrap(), PlanType::LifeInsurance);
        assert_eq!("LIFE INSURANCE".parse::<PlanType>().unwrap(), PlanType::LifeInsurance);

        let err = "boat".parse::<PlanType>().unwrap_err();
        assert_eq!(err.field, "planType");
        assert!(err.message.contains("health_plan"));
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&SaleStatus::Cancelled).unwrap();
        assert_eq!(json, "\"cancelled\"");
        let back: AppointmentKind = serde_json::from_str("\"tracker_installation\"").unwrap();
        assert_eq!(back, AppointmentKind::TrackerInstallation);
    }

    #[test]
    fn appointment_status_has_single_state() {
        assert_eq!(AppointmentStatus::ALL, &[AppointmentStatus::Scheduled]);
        assert_eq!(AppointmentStatus::Scheduled.to_string(), "Scheduled");
    }
}
