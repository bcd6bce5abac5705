//! Community service.

use agora_common::AppResult;
use agora_db::{entities::community_member::MemberRole, repositories::CommunityRepository};
use serde::Serialize;

/// A community the user belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunitySummary {
    pub community_id: i32,
    pub name: String,
    pub role: MemberRole,
    pub members_count: u64,
}

/// Community service for business logic.
#[derive(Clone)]
pub struct CommunityService {
    community_repo: CommunityRepository,
}

impl CommunityService {
    /// Create a new community service.
    #[must_use]
    pub const fn new(community_repo: CommunityRepository) -> Self {
        Self { community_repo }
    }

    /// Communities the user belongs to, highest role first, then by name.
    pub async fn my_communities(&self, user_id: i32) -> AppResult<Vec<CommunitySummary>> {
        let memberships = self.community_repo.memberships_of(user_id).await?;
        let ids: Vec<i32> = memberships.iter().map(|(c, _)| c.id).collect();
        let counts = self.community_repo.member_counts(&ids).await?;

        let mut summaries: Vec<CommunitySummary> = memberships
            .into_iter()
            .map(|(community, role)| CommunitySummary {
                community_id: community.id,
                members_count: counts.get(&community.id).copied().unwrap_or(0),
                name: community.name,
                role,
            })
            .collect();

        sort_by_role(&mut summaries);
        Ok(summaries)
    }
}

fn sort_by_role(summaries: &mut [CommunitySummary]) {
    summaries.sort_by(|a, b| a.role.cmp(&b.role).then_with(|| a.name.cmp(&b.name)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(name: &str, role: MemberRole) -> CommunitySummary {
        CommunitySummary {
            community_id: 0,
            name: name.to_string(),
            role,
            members_count: 1,
        }
    }

    #[test]
    fn test_role_precedence_then_name() {
        let mut summaries = vec![
            summary("zeta", MemberRole::Member),
            summary("beta", MemberRole::Moderator),
            summary("alpha", MemberRole::Member),
            summary("gamma", MemberRole::Admin),
            summary("delta", MemberRole::Reviewer),
        ];

        sort_by_role(&mut summaries);

        let names: Vec<&str> = summaries.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["gamma", "delta", "beta", "alpha", "zeta"]);
    }
}
