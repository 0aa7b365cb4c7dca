use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    #[default]
    Free,
    Year,
}

impl Plan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Free => "free",
            Plan::Year => "year",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Plan::Free => "Free",
            Plan::Year => "1-Year",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Plan::Free => "1-Day Chatbot Access",
            Plan::Year => "Full Access for 1 Year",
        }
    }
}

/// The signed-in user as handed to us by the auth side. Fields this frontend
/// doesn't know about are carried along in `extra` so that replacing the user
/// with a server response never loses anything.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct User {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            subscription: None,
            extra: Map::new(),
        }
    }

    /// A user without an email can't receive an OTP, so it counts as signed out.
    pub fn is_signed_in(&self) -> bool {
        !self.email.is_empty()
    }

    pub fn subscription_label(&self) -> &'static str {
        match self.subscription.as_deref() {
            Some("year") => Plan::Year.title(),
            _ => Plan::Free.title(),
        }
    }
}

// Response of GET /user-profile
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct UserProfile {
    #[serde(default)]
    pub subscription: Option<String>,
}

impl UserProfile {
    pub fn is_subscribed_for_year(&self) -> bool {
        self.subscription.as_deref() == Some(Plan::Year.as_str())
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SendOtpRequest {
    pub email: String,
    pub subscription: Plan,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ValidateOtpRequest {
    pub email: String,
    pub otp: String,
    pub subscription: Plan,
}
