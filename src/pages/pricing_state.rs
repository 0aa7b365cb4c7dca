use std::rc::Rc;
use yew::prelude::*;

use crate::profile::models::Plan;

pub const PROFILE_FETCH_ERROR: &str = "Error fetching user profile";
pub const ALREADY_SUBSCRIBED: &str = "You already have a 1-Year subscription.";
pub const OTP_SENT: &str = "OTP sent successfully. Check your email.";
pub const OTP_SEND_ERROR: &str = "Error while sending OTP";
pub const OTP_MISSING: &str = "Please enter the OTP";
pub const SUBSCRIPTION_UPDATED: &str = "Subscription updated successfully!";
pub const SUBSCRIPTION_UPDATE_ERROR: &str = "Error while updating subscription";
pub const LOGIN_HINT: &str = "Please log in or sign up to choose a plan";

/// Local state of the pricing page. Lives as long as the page is mounted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PricingState {
    pub selected: Plan,
    pub otp: String,
    pub status: String,
    pub otp_sent: bool,
    pub is_subscribed_for_year: bool,
    pub hovered: Option<Plan>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PricingAction {
    SelectPlan(Plan),
    Hover(Option<Plan>),
    SetOtp(String),
    ProfileLoaded { subscribed_for_year: bool },
    OtpSent,
    SetStatus(String),
}

impl PricingState {
    pub fn apply(&mut self, action: PricingAction) {
        match action {
            PricingAction::SelectPlan(plan) => {
                // A new selection always starts the OTP round over.
                self.selected = plan;
                self.otp_sent = false;
                self.status.clear();
            }
            PricingAction::Hover(plan) => self.hovered = plan,
            PricingAction::SetOtp(otp) => self.otp = otp,
            PricingAction::ProfileLoaded { subscribed_for_year } => {
                self.is_subscribed_for_year = subscribed_for_year;
            }
            PricingAction::OtpSent => {
                self.otp_sent = true;
                self.status = OTP_SENT.to_string();
            }
            PricingAction::SetStatus(status) => self.status = status,
        }
    }

    pub fn is_selected(&self, plan: Plan) -> bool {
        self.selected == plan
    }

    pub fn shows_login_hint(&self, plan: Plan, has_user: bool) -> bool {
        self.hovered == Some(plan) && !has_user
    }

    pub fn shows_send_otp(&self, has_user: bool) -> bool {
        self.selected == Plan::Year && !self.is_subscribed_for_year && has_user
    }

    pub fn send_otp_disabled(&self) -> bool {
        self.otp_sent
    }

    pub fn send_otp_label(&self) -> &'static str {
        if self.otp_sent {
            "OTP Sent"
        } else {
            "Send OTP"
        }
    }

    pub fn shows_otp_form(&self) -> bool {
        self.otp_sent
    }

    pub fn shows_status(&self) -> bool {
        !self.status.is_empty()
    }
}

impl Reducible for PricingState {
    type Action = PricingAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        next.apply(action);
        next.into()
    }
}
