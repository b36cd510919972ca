//! Emergency alert composition and delivery.
//!
//! The alert shares the user's position with their emergency contacts. The
//! address comes from a [`ReverseGeocodeGateway`] and degrades to
//! [`UNKNOWN_LOCATION`] when the lookup fails; delivery goes through a
//! [`NotificationChannel`].

use async_trait::async_trait;
use geo::Coord;
use log::{debug, warn};
use thiserror::Error;

use crate::gateway::ReverseGeocodeGateway;

/// Address used when reverse geocoding yields nothing.
pub const UNKNOWN_LOCATION: &str = "Unknown location";

/// Someone to notify in an emergency.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EmergencyContact {
    /// Display name. Blank names are left out of receipts.
    pub name: String,
    /// Phone number the channel delivers to.
    pub phone: String,
    /// Relationship to the user, e.g. `"Sister"`.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub relationship: Option<String>,
}

impl EmergencyContact {
    /// Contact with a name and phone number.
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            relationship: None,
        }
    }
}

/// Map link for `location`.
///
/// ```
/// use geo::Coord;
/// use safepath_core::map_link;
///
/// assert_eq!(
///     map_link(Coord { x: -0.09, y: 51.505 }),
///     "https://www.google.com/maps?q=51.505,-0.09"
/// );
/// ```
pub fn map_link(location: Coord<f64>) -> String {
    format!("https://www.google.com/maps?q={},{}", location.y, location.x)
}

/// A fully composed alert, ready for delivery.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AlertMessage {
    /// Name of the user raising the alert.
    pub user_name: String,
    /// Position being shared.
    pub location: Coord<f64>,
    /// Display address, or [`UNKNOWN_LOCATION`].
    pub address: String,
    /// Link opening `location` on a map.
    pub map_link: String,
}

impl AlertMessage {
    /// Plain-text body sent to each contact.
    pub fn body(&self) -> String {
        format!(
            "EMERGENCY ALERT\n\
             {user} has triggered an emergency alert from SafePath!\n\
             \n\
             Current location: {address}\n\
             View on map: {link}\n\
             \n\
             Please contact them immediately or alert authorities if needed.\n\
             This is an automated emergency message from SafePath.",
            user = self.user_name,
            address = self.address,
            link = self.map_link,
        )
    }
}

/// Build an alert for `user_name` at `location`.
///
/// A missing or blank `address` becomes [`UNKNOWN_LOCATION`].
pub fn compose_alert(user_name: &str, location: Coord<f64>, address: Option<&str>) -> AlertMessage {
    let address = address
        .map(str::trim)
        .filter(|address| !address.is_empty())
        .unwrap_or(UNKNOWN_LOCATION);
    AlertMessage {
        user_name: user_name.to_owned(),
        location,
        address: address.to_owned(),
        map_link: map_link(location),
    }
}

/// Acknowledgement returned by a [`NotificationChannel`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Ack {
    /// Number of contacts the message was handed to.
    pub delivered: usize,
}

/// Errors reported by a [`NotificationChannel`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationError {
    /// The channel refused or failed to send.
    #[error("notification channel failed: {message}")]
    Failed {
        /// Channel-provided detail.
        message: String,
    },
}

/// Delivers alerts to emergency contacts, e.g. by SMS.
#[async_trait(?Send)]
pub trait NotificationChannel {
    /// Send `message` to every contact in `contacts`.
    async fn send(
        &self,
        contacts: &[EmergencyContact],
        message: &AlertMessage,
    ) -> Result<Ack, NotificationError>;
}

/// Inputs for [`send_emergency_alert`].
#[derive(Debug, Clone, PartialEq)]
pub struct AlertRequest {
    /// Name shown in the alert.
    pub user_name: String,
    /// Current position, if the user has shared it.
    pub location: Option<Coord<f64>>,
    /// Contacts to notify.
    pub contacts: Vec<EmergencyContact>,
}

/// Errors returned by [`send_emergency_alert`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlertError {
    /// The user's location is unknown.
    #[error("share your location before sending an emergency alert")]
    MissingLocation,
    /// No emergency contacts are configured.
    #[error("no emergency contacts found; add contacts to your profile")]
    NoContacts,
    /// The notification channel failed.
    #[error("error sending emergency alert: {0}")]
    Delivery(#[from] NotificationError),
}

/// Outcome of a delivered alert.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AlertReceipt {
    /// The message that was sent.
    pub message: AlertMessage,
    /// Channel acknowledgement.
    pub ack: Ack,
    /// Human-readable confirmation naming the recipients.
    pub summary: String,
}

/// Reverse-geocode the user's position, compose the alert and send it.
///
/// # Errors
///
/// Returns [`AlertError::MissingLocation`] or [`AlertError::NoContacts`]
/// before any gateway is called, and [`AlertError::Delivery`] when the
/// channel fails. Reverse geocoding failures are logged and tolerated.
pub async fn send_emergency_alert(
    request: &AlertRequest,
    reverse_geocoder: &dyn ReverseGeocodeGateway,
    channel: &dyn NotificationChannel,
) -> Result<AlertReceipt, AlertError> {
    let location = request.location.ok_or(AlertError::MissingLocation)?;
    if request.contacts.is_empty() {
        return Err(AlertError::NoContacts);
    }

    let address = match reverse_geocoder.reverse_geocode(location).await {
        Ok(address) => Some(address),
        Err(error) => {
            warn!("reverse geocoding for alert failed: {error}");
            None
        }
    };
    let message = compose_alert(&request.user_name, location, address.as_deref());
    debug!(
        "sending emergency alert to {} contacts",
        request.contacts.len()
    );
    let ack = channel.send(&request.contacts, &message).await?;
    let summary = receipt_summary(&request.contacts);
    Ok(AlertReceipt {
        message,
        ack,
        summary,
    })
}

fn receipt_summary(contacts: &[EmergencyContact]) -> String {
    let names: Vec<&str> = contacts
        .iter()
        .map(|contact| contact.name.trim())
        .filter(|name| !name.is_empty())
        .collect();
    format!("EMERGENCY ALERT sent to {}", names.join(" and "))
}
