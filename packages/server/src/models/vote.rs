use common::Vote;

impl From<crate::entity::vote::Model> for Vote {
    fn from(m: crate::entity::vote::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            team_id: m.team_id,
            created_at: m.created_at,
        }
    }
}
