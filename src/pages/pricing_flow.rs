use log::{error, info, warn};

use crate::api::{ApiError, SubscriptionApi};
use crate::pages::pricing_state::{
    PricingAction, PricingState, ALREADY_SUBSCRIBED, LOGIN_HINT, OTP_MISSING, OTP_SEND_ERROR,
    PROFILE_FETCH_ERROR, SUBSCRIPTION_UPDATED, SUBSCRIPTION_UPDATE_ERROR,
};
use crate::profile::models::{SendOtpRequest, User, ValidateOtpRequest};

#[derive(Clone, Debug, PartialEq)]
pub enum ConfirmOutcome {
    /// The backend accepted the OTP and sent back the updated user.
    Confirmed(User),
    Failed(String),
}

impl ConfirmOutcome {
    pub fn status(&self) -> String {
        match self {
            ConfirmOutcome::Confirmed(_) => SUBSCRIPTION_UPDATED.to_string(),
            ConfirmOutcome::Failed(status) => status.clone(),
        }
    }
}

// Server text is shown as is, everything else collapses into `fallback`.
fn status_for(err: &ApiError, fallback: &str) -> String {
    match err {
        ApiError::Rejected { message, .. } => format!("Error: {}", message),
        _ => fallback.to_string(),
    }
}

pub async fn load_subscription<A>(api: &A, email: &str) -> PricingAction
where
    A: SubscriptionApi + ?Sized,
{
    match api.fetch_profile(email.to_string()).await {
        Ok(profile) => {
            let subscribed_for_year = profile.is_subscribed_for_year();
            info!("Loaded profile for {} (yearly: {})", email, subscribed_for_year);
            PricingAction::ProfileLoaded { subscribed_for_year }
        }
        Err(e) => {
            error!("Failed to fetch profile for {}: {}", email, e);
            PricingAction::SetStatus(PROFILE_FETCH_ERROR.to_string())
        }
    }
}

pub async fn request_otp<A>(api: &A, state: &PricingState, user: Option<&User>) -> PricingAction
where
    A: SubscriptionApi + ?Sized,
{
    if state.is_subscribed_for_year {
        return PricingAction::SetStatus(ALREADY_SUBSCRIBED.to_string());
    }
    let Some(user) = user.filter(|u| u.is_signed_in()) else {
        warn!("OTP requested without a signed-in user");
        return PricingAction::SetStatus(LOGIN_HINT.to_string());
    };

    let request = SendOtpRequest {
        email: user.email.clone(),
        subscription: state.selected,
    };
    match api.send_otp(request).await {
        Ok(()) => {
            info!("OTP sent to {} for plan {}", user.email, state.selected.as_str());
            PricingAction::OtpSent
        }
        Err(e) => {
            error!("Sending OTP failed: {}", e);
            PricingAction::SetStatus(status_for(&e, OTP_SEND_ERROR))
        }
    }
}

pub async fn confirm_subscription<A>(
    api: &A,
    state: &PricingState,
    user: Option<&User>,
) -> ConfirmOutcome
where
    A: SubscriptionApi + ?Sized,
{
    if state.otp.is_empty() {
        return ConfirmOutcome::Failed(OTP_MISSING.to_string());
    }
    let Some(user) = user.filter(|u| u.is_signed_in()) else {
        warn!("Subscription confirmed without a signed-in user");
        return ConfirmOutcome::Failed(LOGIN_HINT.to_string());
    };

    let request = ValidateOtpRequest {
        email: user.email.clone(),
        otp: state.otp.clone(),
        subscription: state.selected,
    };
    match api.validate_otp(request).await {
        Ok(updated) => {
            info!("Subscription for {} updated to {}", user.email, state.selected.as_str());
            ConfirmOutcome::Confirmed(updated)
        }
        Err(e) => {
            error!("Validating OTP failed: {}", e);
            ConfirmOutcome::Failed(status_for(&e, SUBSCRIPTION_UPDATE_ERROR))
        }
    }
}

/// Hands a confirmed user to the session and leaves for the profile page.
/// Returns the status update for the page either way.
pub fn finish_confirm(
    outcome: ConfirmOutcome,
    on_user_change: impl FnOnce(User),
    navigate: impl FnOnce(),
) -> PricingAction {
    let status = outcome.status();
    if let ConfirmOutcome::Confirmed(updated) = outcome {
        on_user_change(updated);
        info!("Subscription confirmed, going to profile");
        navigate();
    }
    PricingAction::SetStatus(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockSubscriptionApi;
    use crate::profile::models::{Plan, UserProfile};
    use futures::executor::block_on;
    use std::cell::{Cell, RefCell};

    fn user() -> User {
        User::new("a@b.com")
    }

    fn year_state() -> PricingState {
        let mut state = PricingState::default();
        state.apply(PricingAction::SelectPlan(Plan::Year));
        state
    }

    fn rejected(message: &str) -> ApiError {
        ApiError::Rejected { status: 400, message: message.to_string() }
    }

    #[test]
    fn profile_with_yearly_subscription_hides_send_button() {
        let mut api = MockSubscriptionApi::new();
        api.expect_fetch_profile()
            .withf(|email| email == "a@b.com")
            .times(1)
            .returning(|_| Ok(UserProfile { subscription: Some("year".to_string()) }));

        let mut state = year_state();
        state.apply(block_on(load_subscription(&api, "a@b.com")));
        assert!(state.is_subscribed_for_year);
        assert!(!state.shows_send_otp(true));
    }

    #[test]
    fn profile_failure_sets_fetch_error() {
        for err in [ApiError::Network("offline".to_string()), rejected("nope"), ApiError::Decode("eof".to_string())] {
            let mut api = MockSubscriptionApi::new();
            api.expect_fetch_profile().times(1).returning(move |_| Err(err.clone()));

            let action = block_on(load_subscription(&api, "a@b.com"));
            assert_eq!(action, PricingAction::SetStatus(PROFILE_FETCH_ERROR.to_string()));
        }
    }

    #[test]
    fn already_subscribed_never_calls_backend() {
        let mut api = MockSubscriptionApi::new();
        api.expect_send_otp().never();

        let mut state = year_state();
        state.apply(PricingAction::ProfileLoaded { subscribed_for_year: true });
        let action = block_on(request_otp(&api, &state, Some(&user())));
        assert_eq!(action, PricingAction::SetStatus(ALREADY_SUBSCRIBED.to_string()));
    }

    #[test]
    fn request_otp_without_user_is_not_sent() {
        let mut api = MockSubscriptionApi::new();
        api.expect_send_otp().never();

        let action = block_on(request_otp(&api, &year_state(), None));
        assert_eq!(action, PricingAction::SetStatus(LOGIN_HINT.to_string()));
    }

    #[test]
    fn free_user_requests_yearly_otp() {
        let mut api = MockSubscriptionApi::new();
        api.expect_fetch_profile()
            .times(1)
            .returning(|_| Ok(UserProfile { subscription: Some("free".to_string()) }));
        api.expect_send_otp()
            .withf(|req| req.email == "a@b.com" && req.subscription == Plan::Year)
            .times(1)
            .returning(|_| Ok(()));

        let user = user();
        let mut state = PricingState::default();
        state.apply(block_on(load_subscription(&api, &user.email)));
        assert!(!state.is_subscribed_for_year);

        state.apply(PricingAction::SelectPlan(Plan::Year));
        state.apply(block_on(request_otp(&api, &state, Some(&user))));
        assert!(state.otp_sent);
        assert_eq!(state.status, crate::pages::pricing_state::OTP_SENT);
        assert!(state.shows_otp_form());
    }

    #[test]
    fn send_otp_failures_map_to_status() {
        let mut api = MockSubscriptionApi::new();
        api.expect_send_otp().times(1).returning(|_| Err(rejected("Too many requests")));
        let action = block_on(request_otp(&api, &year_state(), Some(&user())));
        assert_eq!(action, PricingAction::SetStatus("Error: Too many requests".to_string()));

        let mut api = MockSubscriptionApi::new();
        api.expect_send_otp()
            .times(1)
            .returning(|_| Err(ApiError::Network("offline".to_string())));
        let action = block_on(request_otp(&api, &year_state(), Some(&user())));
        assert_eq!(action, PricingAction::SetStatus(OTP_SEND_ERROR.to_string()));
    }

    #[test]
    fn empty_otp_never_calls_backend() {
        let mut api = MockSubscriptionApi::new();
        api.expect_validate_otp().never();

        let mut state = year_state();
        state.apply(PricingAction::OtpSent);
        let outcome = block_on(confirm_subscription(&api, &state, Some(&user())));
        assert_eq!(outcome, ConfirmOutcome::Failed(OTP_MISSING.to_string()));
    }

    #[test]
    fn confirm_returns_updated_user() {
        let mut api = MockSubscriptionApi::new();
        api.expect_validate_otp()
            .withf(|req| {
                req.email == "a@b.com" && req.otp == "123456" && req.subscription == Plan::Year
            })
            .times(1)
            .returning(|req| {
                let mut updated = User::new(req.email);
                updated.subscription = Some("year".to_string());
                Ok(updated)
            });

        let mut state = year_state();
        state.apply(PricingAction::OtpSent);
        state.apply(PricingAction::SetOtp("123456".to_string()));

        let outcome = block_on(confirm_subscription(&api, &state, Some(&user())));
        match &outcome {
            ConfirmOutcome::Confirmed(updated) => {
                assert_eq!(updated.email, "a@b.com");
                assert_eq!(updated.subscription.as_deref(), Some("year"));
            }
            other => panic!("expected confirmation, got {:?}", other),
        }
        assert_eq!(outcome.status(), SUBSCRIPTION_UPDATED);
    }

    #[test]
    fn confirm_failures_map_to_status() {
        let mut state = year_state();
        state.apply(PricingAction::SetOtp("000000".to_string()));

        let mut api = MockSubscriptionApi::new();
        api.expect_validate_otp().times(1).returning(|_| Err(rejected("Invalid OTP")));
        let outcome = block_on(confirm_subscription(&api, &state, Some(&user())));
        assert_eq!(outcome, ConfirmOutcome::Failed("Error: Invalid OTP".to_string()));

        let mut api = MockSubscriptionApi::new();
        api.expect_validate_otp()
            .times(1)
            .returning(|_| Err(ApiError::Decode("expected value".to_string())));
        let outcome = block_on(confirm_subscription(&api, &state, Some(&user())));
        assert_eq!(outcome, ConfirmOutcome::Failed(SUBSCRIPTION_UPDATE_ERROR.to_string()));
    }

    #[test]
    fn confirm_without_user_is_not_sent() {
        let mut api = MockSubscriptionApi::new();
        api.expect_validate_otp().never();

        let mut state = year_state();
        state.apply(PricingAction::SetOtp("123456".to_string()));
        let outcome = block_on(confirm_subscription(&api, &state, None));
        assert_eq!(outcome, ConfirmOutcome::Failed(LOGIN_HINT.to_string()));
    }

    #[test]
    fn empty_email_counts_as_signed_out() {
        let mut api = MockSubscriptionApi::new();
        api.expect_send_otp().never();
        api.expect_validate_otp().never();

        let nobody = User::new("");
        let action = block_on(request_otp(&api, &year_state(), Some(&nobody)));
        assert_eq!(action, PricingAction::SetStatus(LOGIN_HINT.to_string()));

        let mut state = year_state();
        state.apply(PricingAction::SetOtp("123456".to_string()));
        let outcome = block_on(confirm_subscription(&api, &state, Some(&nobody)));
        assert_eq!(outcome, ConfirmOutcome::Failed(LOGIN_HINT.to_string()));
    }

    #[test]
    fn unreadable_rejection_uses_generic_status() {
        let mut api = MockSubscriptionApi::new();
        api.expect_send_otp()
            .times(1)
            .returning(|_| Err(ApiError::Decode("body already used".to_string())));
        let action = block_on(request_otp(&api, &year_state(), Some(&user())));
        assert_eq!(action, PricingAction::SetStatus(OTP_SEND_ERROR.to_string()));
    }

    #[test]
    fn confirmed_subscription_replaces_user_and_navigates_once() {
        let mut updated = User::new("a@b.com");
        updated.subscription = Some("year".to_string());

        let received = RefCell::new(None);
        let navigations = Cell::new(0);
        let action = finish_confirm(
            ConfirmOutcome::Confirmed(updated.clone()),
            |user| *received.borrow_mut() = Some(user),
            || navigations.set(navigations.get() + 1),
        );

        assert_eq!(action, PricingAction::SetStatus(SUBSCRIPTION_UPDATED.to_string()));
        assert_eq!(received.into_inner(), Some(updated));
        assert_eq!(navigations.get(), 1);
    }

    #[test]
    fn failed_confirmation_keeps_user_and_page() {
        let user_changed = Cell::new(false);
        let navigated = Cell::new(false);
        let action = finish_confirm(
            ConfirmOutcome::Failed("Error: Invalid OTP".to_string()),
            |_| user_changed.set(true),
            || navigated.set(true),
        );

        assert_eq!(action, PricingAction::SetStatus("Error: Invalid OTP".to_string()));
        assert!(!user_changed.get());
        assert!(!navigated.get());
    }
}
