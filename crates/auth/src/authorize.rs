//! Access gate: pure decisions over the authorization state.
//!
//! - No IO
//! - No panics
//! - Unresolved state is answered with `Pending`, never with an error

use serde::Serialize;

use crate::{AuthorizationState, Role};

/// Gate outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Show the feature.
    Allow,
    /// Not signed in (redirect to login) or not privileged enough.
    Deny,
    /// Roles still resolving: show a neutral loading affordance.
    Pending,
}

/// Decide access for a hierarchical requirement.
///
/// `required = None` admits any signed-in user. Otherwise any assignment whose
/// role is equal to or more privileged than `required` admits
/// (`admin > manager > employee`).
pub fn decide(required: Option<Role>, state: &AuthorizationState) -> Decision {
    match state {
        AuthorizationState::Unresolved => Decision::Pending,
        AuthorizationState::Anonymous => Decision::Deny,
        AuthorizationState::Resolved(roles) => match required {
            None => Decision::Allow,
            Some(required) if roles.has_at_least(required) => Decision::Allow,
            Some(_) => Decision::Deny,
        },
    }
}

/// Decide access for a literal whitelist (no hierarchy).
///
/// An empty whitelist admits any signed-in user.
pub fn decide_exact(allowed: &[Role], state: &AuthorizationState) -> Decision {
    match state {
        AuthorizationState::Unresolved => Decision::Pending,
        AuthorizationState::Anonymous => Decision::Deny,
        AuthorizationState::Resolved(roles) => {
            if allowed.is_empty() || allowed.iter().any(|r| roles.has_exactly(*r)) {
                Decision::Allow
            } else {
                Decision::Deny
            }
        }
    }
}

/// Auditable explanation of a gate decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecisionExplanation {
    pub required: Option<Role>,
    pub decision: Decision,
    pub reason: String,
    pub roles_held: Vec<Role>,
}

/// Explain why [`decide`] answers the way it does.
pub fn explain_decision(required: Option<Role>, state: &AuthorizationState) -> DecisionExplanation {
    let decision = decide(required, state);
    let roles_held: Vec<Role> = state.roles().map(|r| r.roles().collect()).unwrap_or_default();

    let reason = match (state, decision, required) {
        (AuthorizationState::Unresolved, _, _) => "roles are still being resolved".to_string(),
        (AuthorizationState::Anonymous, _, _) => "no signed-in identity; sign in first".to_string(),
        (_, Decision::Allow, None) => "no role required; any signed-in user is admitted".to_string(),
        (AuthorizationState::Resolved(roles), Decision::Allow, Some(required)) => {
            format!("holds '{}' which satisfies required '{}'", roles.highest(), required)
        }
        (AuthorizationState::Resolved(roles), _, Some(required)) => {
            format!("highest role '{}' is below required '{}'", roles.highest(), required)
        }
        (AuthorizationState::Resolved(_), _, None) => "denied".to_string(),
    };

    DecisionExplanation {
        required,
        decision,
        reason,
        roles_held,
    }
}

/// Application entry points and the role each requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Dashboard,
    Profile,
    Employees,
    EmployeeDetail,
    Departments,
    Settings,
    UserManagement,
}

impl Route {
    pub const ALL: [Route; 7] = [
        Route::Dashboard,
        Route::Employees,
        Route::EmployeeDetail,
        Route::Departments,
        Route::Profile,
        Route::Settings,
        Route::UserManagement,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Dashboard => "/",
            Route::Profile => "/profile",
            Route::Employees => "/employees",
            Route::EmployeeDetail => "/employees/:id",
            Route::Departments => "/departments",
            Route::Settings => "/settings",
            Route::UserManagement => "/users",
        }
    }

    pub fn required_role(&self) -> Option<Role> {
        match self {
            Route::Dashboard | Route::Profile => None,
            Route::Employees | Route::EmployeeDetail | Route::Departments => Some(Role::Manager),
            Route::Settings | Route::UserManagement => Some(Role::Admin),
        }
    }

    pub fn decide(&self, state: &AuthorizationState) -> Decision {
        decide(self.required_role(), state)
    }
}

/// Routes currently allowed for `state`, in navigation order.
pub fn visible_routes(state: &AuthorizationState) -> Vec<Route> {
    Route::ALL
        .into_iter()
        .filter(|route| route.decide(state) == Decision::Allow)
        .collect()
}
