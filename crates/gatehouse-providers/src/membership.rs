// Organization / team membership gate.
//
// Policy evaluation is pure: it takes the decoded membership records and
// returns a `GateOutcome` describing what was found. Adapters fetch the
// records, log the outcome and hand a plain boolean back to their callers.

use std::collections::BTreeSet;
use std::fmt;
use std::future::Future;

use gatehouse_core::{ProviderError, Result};
use serde::Deserialize;

/// One entry of a "my organizations" listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Organization {
    pub login: String,
}

/// One entry of a "my teams" listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Team {
    #[serde(default)]
    pub name: String,
    pub slug: String,
    pub organization: Organization,
}

/// Org/team restriction. `team` is a comma-separated list of acceptable
/// slugs and only applies together with `org`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipPolicy {
    org: Option<String>,
    team: Option<String>,
}

impl MembershipPolicy {
    /// Empty strings mean "not set".
    pub fn new(org: &str, team: &str) -> Self {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Self {
            org: non_empty(org),
            team: non_empty(team),
        }
    }

    /// The required organization login.
    pub fn org(&self) -> Option<&str> {
        self.org.as_deref()
    }

    /// The raw comma-separated team slug list.
    pub fn team(&self) -> Option<&str> {
        self.team.as_deref()
    }

    /// Without an org there is nothing to check.
    pub fn is_enabled(&self) -> bool {
        self.org.is_some()
    }

    /// Whether the team listing, not the org listing, decides the gate.
    pub fn requires_team(&self) -> bool {
        self.org.is_some() && self.team.is_some()
    }

    /// Exact, case-sensitive match against each comma-separated slug.
    pub fn accepts_slug(&self, slug: &str) -> bool {
        self.team
            .as_deref()
            .map_or(false, |teams| teams.split(',').any(|t| t == slug))
    }

    /// Evaluate an org-only policy against the account's organizations.
    /// A denial lists every org that was present.
    pub fn check_orgs(&self, orgs: &[Organization]) -> GateOutcome {
        let Some(required) = self.org() else {
            return GateOutcome::Unrestricted;
        };

        if orgs.iter().any(|o| o.login == required) {
            return GateOutcome::Granted {
                org: required.to_string(),
                team: None,
            };
        }

        GateOutcome::Denied(Denial::MissingOrg {
            org: required.to_string(),
            present_orgs: orgs.iter().map(|o| o.login.clone()).collect(),
        })
    }

    /// Evaluate an org + team policy against the account's teams.
    ///
    /// Only teams owned by the required org count. When the account has no
    /// team in that org the denial reports the orgs seen instead, deduplicated
    /// and sorted.
    pub fn check_teams(&self, teams: &[Team]) -> GateOutcome {
        let Some(required) = self.org() else {
            return GateOutcome::Unrestricted;
        };

        let mut org_seen = false;
        let mut present_teams = Vec::new();
        for team in teams.iter().filter(|t| t.organization.login == required) {
            org_seen = true;
            if self.accepts_slug(&team.slug) {
                return GateOutcome::Granted {
                    org: required.to_string(),
                    team: Some(team.clone()),
                };
            }
            present_teams.push(team.slug.clone());
        }

        if org_seen {
            GateOutcome::Denied(Denial::MissingTeam {
                org: required.to_string(),
                team: self.team().unwrap_or_default().to_string(),
                present_teams,
            })
        } else {
            let present_orgs: BTreeSet<_> = teams
                .iter()
                .map(|t| t.organization.login.clone())
                .collect();
            GateOutcome::Denied(Denial::MissingOrg {
                org: required.to_string(),
                present_orgs: present_orgs.into_iter().collect(),
            })
        }
    }
}

/// Result of evaluating a policy against membership records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// No policy configured.
    Unrestricted,
    Granted { org: String, team: Option<Team> },
    Denied(Denial),
}

/// What was present when the gate denied access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    MissingOrg { org: String, present_orgs: Vec<String> },
    MissingTeam { org: String, team: String, present_teams: Vec<String> },
}

impl GateOutcome {
    /// `Unrestricted` counts as granted.
    pub fn is_granted(&self) -> bool {
        !matches!(self, GateOutcome::Denied(_))
    }
}

impl fmt::Display for GateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateOutcome::Unrestricted => write!(f, "No organization restriction configured"),
            GateOutcome::Granted { org, team: None } => write!(f, "Found Organization: {org:?}"),
            GateOutcome::Granted { org, team: Some(team) } => write!(
                f,
                "Found Organization:{org:?} Team:{:?} (Name:{:?})",
                team.slug, team.name
            ),
            GateOutcome::Denied(Denial::MissingOrg { org, present_orgs }) => {
                write!(f, "Missing Organization:{org:?} in {present_orgs:?}")
            }
            GateOutcome::Denied(Denial::MissingTeam { org, team, present_teams }) => write!(
                f,
                "Missing Team:{team:?} from Org:{org:?} in teams: {present_teams:?}"
            ),
        }
    }
}

/// Walk a paginated listing from page 1 until the first empty page.
///
/// At most `max_pages` non-empty pages are accepted. Page `max_pages + 1` is
/// still requested to see whether the listing ends there; only a non-empty
/// answer fails with `PaginationLimitExceeded`. Any page error aborts the
/// walk and the pages gathered so far are dropped.
pub async fn collect_pages<T, F, Fut>(
    endpoint: &str,
    max_pages: u32,
    mut fetch_page: F,
) -> Result<Vec<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let mut items = Vec::new();
    for page in 1..=max_pages {
        let batch = fetch_page(page).await?;
        if batch.is_empty() {
            return Ok(items);
        }
        items.extend(batch);
    }

    if fetch_page(max_pages.saturating_add(1)).await?.is_empty() {
        return Ok(items);
    }
    Err(ProviderError::PaginationLimitExceeded {
        endpoint: endpoint.to_string(),
        max_pages,
    })
}
