//! Protected-route guard decisions.
//!
//! Each guard maps the auth snapshot, the member profile and the requested
//! location to a [`GuardDecision`]. The auth and member stores live
//! elsewhere; these functions only branch on what they report.

use serde::{Deserialize, Serialize};

/// Login page path.
pub const LOGIN_PATH: &str = "/login";

/// Dashboard landing path.
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Onboarding redirect target.
pub const ONBOARDING_REDIRECT: &str = "/onboarding?workflow=onboarding";

/// Pricing redirect target.
pub const PRICING_REDIRECT: &str = "/pricing?workflow=onboarding";

/// Query parameter marking navigation that is part of the onboarding flow.
const WORKFLOW_PARAM: &str = "workflow";
const WORKFLOW_ONBOARDING: &str = "onboarding";

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// The auth store's observable flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSnapshot {
    pub loading: bool,
    pub is_authenticated: bool,
}

/// The signed-in member's workspace profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberProfile {
    #[serde(default)]
    pub workspace_plan: Option<String>,
    #[serde(default)]
    pub workspace_name: Option<String>,
    #[serde(default)]
    pub workspace_industry: Option<String>,
}

fn is_set(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

impl MemberProfile {
    pub fn has_plan(&self) -> bool {
        is_set(&self.workspace_plan)
    }

    /// Whether the workspace name and industry have both been filled in.
    pub fn has_workspace_details(&self) -> bool {
        is_set(&self.workspace_name) && is_set(&self.workspace_industry)
    }
}

/// Load state of the member profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "member", rename_all = "snake_case")]
pub enum MemberState {
    Loading,
    Loaded(Option<MemberProfile>),
}

impl MemberState {
    fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    fn profile(&self) -> Option<&MemberProfile> {
        match self {
            Self::Loaded(Some(profile)) => Some(profile),
            _ => None,
        }
    }
}

/// The location being navigated to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteLocation {
    pub path: String,
    /// Query string including the leading `?`, or empty.
    #[serde(default)]
    pub search: String,
}

impl RouteLocation {
    pub fn new(path: impl Into<String>, search: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            search: search.into(),
        }
    }

    /// `path + search`, the value preserved as `from` on login redirects.
    pub fn full_path(&self) -> String {
        format!("{}{}", self.path, self.search)
    }

    /// Whether this navigation is part of the onboarding workflow.
    ///
    /// The query string is percent-decoded; an undecodable one counts as
    /// not from onboarding.
    pub fn from_onboarding(&self) -> bool {
        serde_urlencoded::from_str::<Vec<(String, String)>>(self.search.trim_start_matches('?'))
            .unwrap_or_default()
            .iter()
            .any(|(k, v)| k == WORKFLOW_PARAM && v == WORKFLOW_ONBOARDING)
    }
}

// ---------------------------------------------------------------------------
// Decisions
// ---------------------------------------------------------------------------

/// Which protected area is being entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardKind {
    Dashboard,
    Onboarding,
    Generic,
}

/// What the router should do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum GuardDecision {
    /// Show the loading indicator.
    Loading,
    /// Navigate elsewhere. `from` is carried in navigation state.
    Redirect { to: String, from: Option<String> },
    /// Render the nested routes.
    Render,
}

impl GuardDecision {
    fn to_login(location: &RouteLocation) -> Self {
        Self::Redirect {
            to: LOGIN_PATH.to_string(),
            from: Some(location.full_path()),
        }
    }

    fn to(path: &str) -> Self {
        Self::Redirect {
            to: path.to_string(),
            from: None,
        }
    }
}

/// Evaluate the guard for `kind`.
pub fn evaluate(
    kind: GuardKind,
    auth: AuthSnapshot,
    member: &MemberState,
    location: &RouteLocation,
) -> GuardDecision {
    match kind {
        GuardKind::Dashboard => dashboard(auth, member, location),
        GuardKind::Onboarding => onboarding(auth, member, location),
        GuardKind::Generic => generic(auth, location),
    }
}

/// Gate for the dashboard area.
pub fn dashboard(
    auth: AuthSnapshot,
    member: &MemberState,
    location: &RouteLocation,
) -> GuardDecision {
    if auth.loading || member.is_loading() {
        return GuardDecision::Loading;
    }
    if !auth.is_authenticated {
        return GuardDecision::to_login(location);
    }

    let from_onboarding = location.from_onboarding();
    let profile = member.profile();
    let has_plan = profile.is_some_and(MemberProfile::has_plan);

    if has_plan && !from_onboarding && !profile.is_some_and(MemberProfile::has_workspace_details)
    {
        return GuardDecision::to(ONBOARDING_REDIRECT);
    }
    if !has_plan && !from_onboarding {
        return GuardDecision::to(PRICING_REDIRECT);
    }

    GuardDecision::Render
}

/// Gate for the onboarding page.
///
/// Members who finished onboarding are sent to the dashboard; members
/// without a plan are sent to pricing unless they arrive from that flow.
pub fn onboarding(
    auth: AuthSnapshot,
    member: &MemberState,
    location: &RouteLocation,
) -> GuardDecision {
    if auth.loading || member.is_loading() {
        return GuardDecision::Loading;
    }
    if !auth.is_authenticated {
        return GuardDecision::to_login(location);
    }

    let profile = member.profile();
    let has_plan = profile.is_some_and(MemberProfile::has_plan);

    if !has_plan && !location.from_onboarding() {
        return GuardDecision::to(PRICING_REDIRECT);
    }
    if has_plan && profile.is_some_and(MemberProfile::has_workspace_details) {
        return GuardDecision::to(DASHBOARD_PATH);
    }

    GuardDecision::Render
}

/// Gate for pages that only need a signed-in user.
pub fn generic(auth: AuthSnapshot, location: &RouteLocation) -> GuardDecision {
    if auth.loading {
        return GuardDecision::Loading;
    }
    if !auth.is_authenticated {
        return GuardDecision::to_login(location);
    }
    GuardDecision::Render
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signed_in() -> AuthSnapshot {
        AuthSnapshot {
            loading: false,
            is_authenticated: true,
        }
    }

    fn member(plan: Option<&str>, name: Option<&str>, industry: Option<&str>) -> MemberState {
        MemberState::Loaded(Some(MemberProfile {
            workspace_plan: plan.map(str::to_string),
            workspace_name: name.map(str::to_string),
            workspace_industry: industry.map(str::to_string),
        }))
    }

    fn complete_member() -> MemberState {
        member(Some("pro"), Some("Acme"), Some("saas"))
    }

    #[test]
    fn auth_loading_shows_indicator_regardless_of_authentication() {
        let location = RouteLocation::new("/dashboard", "");
        for is_authenticated in [true, false] {
            let auth = AuthSnapshot {
                loading: true,
                is_authenticated,
            };
            for kind in [GuardKind::Dashboard, GuardKind::Onboarding, GuardKind::Generic] {
                assert_eq!(
                    evaluate(kind, auth, &complete_member(), &location),
                    GuardDecision::Loading
                );
            }
        }
    }

    #[test]
    fn member_loading_shows_indicator_on_dashboard() {
        let location = RouteLocation::new("/dashboard", "");
        assert_eq!(
            dashboard(signed_in(), &MemberState::Loading, &location),
            GuardDecision::Loading
        );
    }

    #[test]
    fn generic_guard_ignores_member_loading() {
        let location = RouteLocation::new("/checkout", "");
        assert_eq!(
            evaluate(GuardKind::Generic, signed_in(), &MemberState::Loading, &location),
            GuardDecision::Render
        );
    }

    #[test]
    fn unauthenticated_redirects_to_login_with_origin() {
        let auth = AuthSnapshot::default();
        let location = RouteLocation::new("/dashboard", "?tab=pending");
        for kind in [GuardKind::Dashboard, GuardKind::Onboarding, GuardKind::Generic] {
            assert_eq!(
                evaluate(kind, auth, &MemberState::Loaded(None), &location),
                GuardDecision::Redirect {
                    to: "/login".into(),
                    from: Some("/dashboard?tab=pending".into()),
                }
            );
        }
    }

    #[test]
    fn plan_without_workspace_name_goes_to_onboarding() {
        let location = RouteLocation::new("/dashboard", "");
        assert_eq!(
            dashboard(signed_in(), &member(Some("pro"), Some(""), Some("saas")), &location),
            GuardDecision::Redirect {
                to: "/onboarding?workflow=onboarding".into(),
                from: None,
            }
        );
    }

    #[test]
    fn no_plan_goes_to_pricing() {
        let location = RouteLocation::new("/dashboard", "");
        assert_eq!(
            dashboard(signed_in(), &member(None, Some("Acme"), Some("saas")), &location),
            GuardDecision::Redirect {
                to: "/pricing?workflow=onboarding".into(),
                from: None,
            }
        );
        assert_eq!(
            dashboard(signed_in(), &MemberState::Loaded(None), &location),
            GuardDecision::Redirect {
                to: "/pricing?workflow=onboarding".into(),
                from: None,
            }
        );
    }

    #[test]
    fn arriving_from_onboarding_renders() {
        let location = RouteLocation::new("/dashboard", "?workflow=onboarding");
        assert_eq!(
            dashboard(signed_in(), &member(Some("pro"), None, None), &location),
            GuardDecision::Render
        );
        assert_eq!(
            dashboard(signed_in(), &member(None, None, None), &location),
            GuardDecision::Render
        );
    }

    #[test]
    fn complete_profile_renders_dashboard() {
        let location = RouteLocation::new("/dashboard", "");
        assert_eq!(
            dashboard(signed_in(), &complete_member(), &location),
            GuardDecision::Render
        );
    }

    #[test]
    fn onboarding_guard_sends_finished_members_to_dashboard() {
        let location = RouteLocation::new("/onboarding", "?workflow=onboarding");
        assert_eq!(
            onboarding(signed_in(), &complete_member(), &location),
            GuardDecision::Redirect {
                to: "/dashboard".into(),
                from: None,
            }
        );
        assert_eq!(
            onboarding(signed_in(), &member(Some("pro"), None, None), &location),
            GuardDecision::Render
        );
    }

    #[test]
    fn onboarding_guard_without_plan_goes_to_pricing() {
        let location = RouteLocation::new("/onboarding", "");
        assert_eq!(
            onboarding(signed_in(), &member(None, None, None), &location),
            GuardDecision::Redirect {
                to: "/pricing?workflow=onboarding".into(),
                from: None,
            }
        );
    }

    #[test]
    fn workflow_param_is_matched_anywhere_in_query() {
        assert!(RouteLocation::new("/x", "?a=1&workflow=onboarding").from_onboarding());
        assert!(!RouteLocation::new("/x", "?workflow=checkout").from_onboarding());
        assert!(!RouteLocation::new("/x", "").from_onboarding());
    }

    #[test]
    fn workflow_param_is_percent_decoded() {
        assert!(RouteLocation::new("/x", "?work%66low=onboard%69ng").from_onboarding());
        assert!(RouteLocation::new("/x", "?next=%2Fdashboard&workflow=onboarding").from_onboarding());
        assert!(!RouteLocation::new("/x", "?workflow=onboarding%20later").from_onboarding());
    }
}
