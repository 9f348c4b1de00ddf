//! Status enums for various entities.

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown order status.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid order status: {0}")]
pub struct ParseStatusError(pub String);

/// Where an order is in its lifecycle.
///
/// The usual path is `pending -> whatsapp_sent -> confirmed -> delivered`,
/// but any status may be set from any other by the admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Placed by the customer, not yet contacted.
    #[default]
    Pending,
    /// Confirmation request sent over WhatsApp.
    WhatsappSent,
    /// Customer confirmed; stock has been reserved.
    Confirmed,
    /// Handed over to the customer.
    Delivered,
}

impl OrderStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::WhatsappSent,
        Self::Confirmed,
        Self::Delivered,
    ];

    /// Wire name (`whatsapp_sent`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::WhatsappSent => "whatsapp_sent",
            Self::Confirmed => "confirmed",
            Self::Delivered => "delivered",
        }
    }

    /// Display label (`WHATSAPP SENT`).
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::WhatsappSent => "WHATSAPP SENT",
            Self::Confirmed => "CONFIRMED",
            Self::Delivered => "DELIVERED",
        }
    }

    /// Orders in these states count towards revenue.
    #[must_use]
    pub const fn is_sale(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Delivered)
    }

    /// No further transitions are modelled after delivery.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "whatsapp_sent" => Ok(Self::WhatsappSent),
            "confirmed" => Ok(Self::Confirmed),
            "delivered" => Ok(Self::Delivered),
            _ => Err(ParseStatusError(s.to_owned())),
        }
    }
}
