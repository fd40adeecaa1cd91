//! The seven business route groups and their mount prefixes.

use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::http::AppContext;

/// A route group owned by one business subdomain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteGroup {
    Auth,
    Profiles,
    Students,
    Services,
    Certification,
    Questions,
    TalentMarketplace,
}

impl RouteGroup {
    /// Every group, in mount order.
    pub const ALL: [RouteGroup; 7] = [
        RouteGroup::Auth,
        RouteGroup::Profiles,
        RouteGroup::Students,
        RouteGroup::Services,
        RouteGroup::Certification,
        RouteGroup::Questions,
        RouteGroup::TalentMarketplace,
    ];

    pub fn prefix(self) -> &'static str {
        match self {
            RouteGroup::Auth => "/api/auth",
            RouteGroup::Profiles => "/api/users",
            RouteGroup::Students => "/api/students",
            RouteGroup::Services => "/api/services",
            RouteGroup::Certification => "/api/certification",
            RouteGroup::Questions => "/api/questions",
            RouteGroup::TalentMarketplace => "/api/talent-marketplace",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RouteGroup::Auth => "auth",
            RouteGroup::Profiles => "profiles",
            RouteGroup::Students => "students",
            RouteGroup::Services => "services",
            RouteGroup::Certification => "certification",
            RouteGroup::Questions => "questions",
            RouteGroup::TalentMarketplace => "talent-marketplace",
        }
    }

    /// Router mounted when no business router has been plugged in.
    ///
    /// Answers `GET <prefix>` with a description of the group.
    pub fn default_router(self) -> Router<AppContext> {
        Router::new().route("/", get(move || describe(self)))
    }
}

#[derive(Debug, Serialize)]
struct GroupInfo {
    group: &'static str,
    prefix: &'static str,
}

async fn describe(group: RouteGroup) -> Json<GroupInfo> {
    Json(GroupInfo {
        group: group.name(),
        prefix: group.prefix(),
    })
}
